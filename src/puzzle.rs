//! # Puzzle builder
//!
//! [Puzzle] collects groups and constraints without asking the caller to decide at which depth a
//! constraint belongs. When the solver is built, each constraint is registered at the earliest
//! depth at which all of its roles are bound.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    ast::{GroupSpec, Predicate, Role},
    domain::Domain,
    roles::RoleStore,
    solver::{ConfigError, Solver},
    textual::Prettifier,
};

/// A puzzle under construction.
///
/// # Example
///
/// ```
/// use permsolve::{Domain, Predicate, Puzzle};
///
/// let mut p = Puzzle::new();
/// let houses = Domain::range(1, 3).unwrap();
/// let [cat, dog, fish] = p.group("pet", houses.clone(), ["cat", "dog", "fish"]).unwrap();
/// let [red, blue, green] = p.group("color", houses, ["red", "blue", "green"]).unwrap();
///
/// p.constrain(Predicate::eq(red, 1))
///     .constrain(Predicate::eq(green, 3))
///     .constrain(Predicate::eq(dog, blue))
///     .constrain(Predicate::eq(fish, green))
///     .constrain(Predicate::next_to(cat, dog));
///
/// let solver = p.solver().unwrap();
/// let solutions = solver.solve().collect::<Result<Vec<_>, _>>().unwrap();
/// assert_eq!(solutions.len(), 1);
/// assert_eq!(solutions[0].role_at("pet", 1), Some("cat"));
/// assert_eq!(solutions[0].role_at("color", 2), Some("blue"));
/// ```
#[derive(Debug, Default)]
pub struct Puzzle {
    roles: RoleStore,
    groups: Vec<GroupSpec>,
    constraints: Vec<Predicate>,
}

impl Puzzle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the next group. Groups are enumerated in declaration order, outermost first.
    pub fn group<const N: usize>(
        &mut self,
        name: &str,
        domain: Domain,
        role_names: [&str; N],
    ) -> Result<[Role; N], ConfigError> {
        let roles = self.add_group(name, domain, &role_names[..])?;
        let mut out = [Role::from_ord(0); N];
        out.copy_from_slice(&roles);
        Ok(out)
    }

    /// Like [Puzzle::group], for a number of roles only known at runtime.
    pub fn add_group<S: AsRef<str>>(
        &mut self,
        name: &str,
        domain: Domain,
        role_names: &[S],
    ) -> Result<Vec<Role>, ConfigError> {
        if self.groups.iter().any(|g| g.name == name) {
            return Err(ConfigError::DuplicateGroup {
                group: name.to_owned(),
            });
        }
        if role_names.len() != domain.len() {
            return Err(ConfigError::ArityMismatch {
                group: name.to_owned(),
                roles: role_names.len(),
                domain: domain.len(),
            });
        }

        let mut fresh = HashSet::with_capacity(role_names.len());
        for role_name in role_names {
            let role_name = role_name.as_ref();
            let first = match self.roles.get_named(role_name) {
                Some(existing) => self
                    .groups
                    .iter()
                    .find(|g| g.roles.contains(&existing))
                    .map(|g| g.name.as_str()),
                None if !fresh.insert(role_name) => Some(name),
                None => None,
            };
            if let Some(first) = first {
                return Err(ConfigError::DuplicateRole {
                    role: role_name.to_owned(),
                    first: first.to_owned(),
                    second: name.to_owned(),
                });
            }
        }

        let roles = role_names
            .iter()
            .map(|role_name| self.roles.get_or_insert_named(role_name.as_ref()))
            .collect::<Vec<_>>();

        self.groups
            .push(GroupSpec::new(name, domain, roles.clone()));
        Ok(roles)
    }

    /// Add a constraint. Its depth is decided by [Puzzle::solver].
    pub fn constrain(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.constraints.push(predicate.into());
        self
    }

    /// Look up a role by name.
    pub fn role(&self, name: &str) -> Option<Role> {
        self.roles.get_named(name)
    }

    pub fn roles(&self) -> &RoleStore {
        &self.roles
    }

    pub fn groups(&self) -> &[GroupSpec] {
        &self.groups
    }

    /// Constraints that have not been placed yet.
    pub fn constraints(&self) -> &[Predicate] {
        &self.constraints
    }

    /// Return a pretty-printer using the role names of this puzzle.
    pub fn pretty(&self) -> Prettifier {
        Prettifier::new(&self.roles)
    }

    /// Place every constraint at the earliest depth where all its roles are bound and build the
    /// solver. Constraints without any roles are checked at the first depth.
    pub fn solver(self) -> Result<Solver, ConfigError> {
        let Puzzle {
            roles,
            mut groups,
            constraints,
        } = self;

        let mut depth_of = vec![None; roles.len()];
        for (depth, group) in groups.iter().enumerate() {
            for role in &group.roles {
                depth_of[role.ord()] = Some(depth);
            }
        }

        for predicate in constraints {
            let mut depth = 0;
            for role in predicate.roles() {
                match depth_of.get(role.ord()).copied().flatten() {
                    Some(bound_at) => depth = depth.max(bound_at),
                    None => {
                        let pretty = Prettifier::new(&roles);
                        return Err(ConfigError::Unplaceable {
                            predicate: pretty.predicate_to_string(&predicate),
                            role: roles
                                .name(role)
                                .map_or_else(|| format!("${}", role.ord()), str::to_owned),
                        });
                    }
                }
            }
            let Some(group) = groups.get_mut(depth) else {
                return Err(ConfigError::NoGroups);
            };
            debug!(
                constraint = %Prettifier::new(&roles).predicate_to_string(&predicate),
                group = %group.name,
                depth,
                "constraint placed"
            );
            group.predicates.push(predicate);
        }

        Solver::new(roles, groups)
    }
}
