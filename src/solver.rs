//! # Nested permutation search
//!
//! The [Solver] enumerates one permutation per [GroupSpec] in depth order. After binding a group,
//! the predicates registered for that depth are checked, and the first failing predicate abandons
//! the branch before any deeper group is enumerated. This early pruning is what keeps the nominal
//! `(n!)^groups` search space tractable.
//!
//! The search is lazy: [Solver::solve] returns a [SolutionIter] that only does work when the next
//! solution is requested. Dropping it abandons the search.

#[cfg(test)]
mod test;

use std::{collections::HashMap, fmt, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::{Bindings, BoxError, GroupSpec, Role, Value},
    permute::Permutations,
    roles::RoleStore,
    solution::{GroupLayout, Layout, Solution},
    textual::Prettifier,
};

/// Problems with the shape of a puzzle, detected before the search starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("a puzzle needs at least one group")]
    NoGroups,
    #[error("group `{group}` is defined twice")]
    DuplicateGroup { group: String },
    #[error("group `{group}` names {roles} roles, but its domain has {domain} values")]
    ArityMismatch {
        group: String,
        roles: usize,
        domain: usize,
    },
    #[error("role `{role}` is bound by both `{first}` and `{second}`")]
    DuplicateRole {
        role: String,
        first: String,
        second: String,
    },
    #[error("role ${role} was not allocated in this puzzle")]
    UnknownRole { role: usize },
    #[error("constraint `{predicate}` in group `{group}` uses `{role}` before it is bound")]
    UnboundRole {
        predicate: String,
        group: String,
        role: String,
    },
    #[error("constraint `{predicate}` uses `{role}`, which no group binds")]
    Unplaceable { predicate: String, role: String },
}

/// Errors that abort a running search.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("constraint `{predicate}` failed")]
    Predicate {
        predicate: String,
        #[source]
        source: BoxError,
    },
}

/// A validated, ready to run puzzle.
///
/// # Example
///
/// ```
/// use permsolve::{Domain, GroupSpec, Predicate, RoleStore, Solver};
///
/// let mut roles = RoleStore::new();
/// let [a, b, c] = ["a", "b", "c"].map(|name| roles.get_or_insert_named(name));
/// let [x, y, z] = ["x", "y", "z"].map(|name| roles.get_or_insert_named(name));
/// let domain = Domain::range(1, 3).unwrap();
///
/// let solver = Solver::new(
///     roles,
///     vec![
///         GroupSpec::new("letters", domain.clone(), vec![a, b, c])
///             .when(Predicate::eq(a, 1))
///             .when(Predicate::next_to(b, a)),
///         GroupSpec::new("axes", domain, vec![x, y, z])
///             .when(Predicate::eq(x, c))
///             .when(Predicate::ne(y, 1)),
///     ],
/// )
/// .unwrap();
///
/// let solutions = solver.solve().collect::<Result<Vec<_>, _>>().unwrap();
/// assert_eq!(solutions.len(), 1);
/// assert_eq!(solutions[0].value_of("x"), Some(3));
/// assert_eq!(solutions[0].role_at("axes", 1), Some("z"));
/// ```
#[derive(Debug)]
pub struct Solver {
    roles: RoleStore,
    groups: Vec<GroupSpec>,
    layout: Rc<Layout>,
}

impl Solver {
    /// Validate the groups and build a solver.
    ///
    /// Every role must be bound by at most one group, every group must name exactly as many roles
    /// as its domain has values, and every predicate may only use roles bound at its own depth or
    /// before.
    pub fn new(roles: RoleStore, groups: Vec<GroupSpec>) -> Result<Solver, ConfigError> {
        if groups.is_empty() {
            return Err(ConfigError::NoGroups);
        }

        let role_name = |role: Role| roles.name(role).unwrap_or("?").to_owned();

        let mut positions: Vec<Option<(usize, usize)>> = vec![None; roles.len()];
        let mut seen_groups = HashMap::new();
        for (depth, group) in groups.iter().enumerate() {
            if seen_groups.insert(group.name.as_str(), depth).is_some() {
                return Err(ConfigError::DuplicateGroup {
                    group: group.name.clone(),
                });
            }
            if group.roles.len() != group.domain.len() {
                return Err(ConfigError::ArityMismatch {
                    group: group.name.clone(),
                    roles: group.roles.len(),
                    domain: group.domain.len(),
                });
            }
            for (position, role) in group.roles.iter().enumerate() {
                if !roles.contains(*role) {
                    return Err(ConfigError::UnknownRole { role: role.ord() });
                }
                if let Some((first, _)) = positions[role.ord()] {
                    return Err(ConfigError::DuplicateRole {
                        role: role_name(*role),
                        first: groups[first].name.clone(),
                        second: group.name.clone(),
                    });
                }
                positions[role.ord()] = Some((depth, position));
            }
        }

        let pretty = Prettifier::new(&roles);
        for (depth, group) in groups.iter().enumerate() {
            for predicate in &group.predicates {
                for role in predicate.roles() {
                    if !roles.contains(role) {
                        return Err(ConfigError::UnknownRole { role: role.ord() });
                    }
                    match positions[role.ord()] {
                        Some((bound_at, _)) if bound_at <= depth => {}
                        _ => {
                            return Err(ConfigError::UnboundRole {
                                predicate: pretty.predicate_to_string(predicate),
                                group: group.name.clone(),
                                role: role_name(role),
                            })
                        }
                    }
                }
            }
            debug!(
                depth,
                group = %group.name,
                predicates = group.predicates.len(),
                "group ready"
            );
        }

        let layout = Rc::new(Layout {
            names: roles.iter().map(|(_, name)| name.to_owned()).collect(),
            groups: groups
                .iter()
                .map(|g| GroupLayout {
                    name: g.name.clone(),
                    roles: g.roles.clone(),
                })
                .collect(),
            positions,
        });

        Ok(Solver {
            roles,
            groups,
            layout,
        })
    }

    /// Start a lazy search for all solutions.
    pub fn solve(&self) -> SolutionIter {
        SolutionIter {
            solver: self,
            frames: vec![self.groups[0].domain.permutations()],
            current: Vec::with_capacity(self.groups.len()),
            bindings: Bindings::new(self.roles.len()),
            stats: SearchStats::default(),
        }
    }

    pub fn roles(&self) -> &RoleStore {
        &self.roles
    }

    pub fn groups(&self) -> &[GroupSpec] {
        &self.groups
    }

    /// Return a pretty-printer using the role names of this solver.
    pub fn pretty(&self) -> Prettifier {
        Prettifier::new(&self.roles)
    }
}

/// Counters describing how much work a search has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Permutations bound to a group.
    pub candidates: u64,
    /// Candidates rejected by a predicate.
    pub pruned: u64,
    /// Predicate evaluations.
    pub evaluations: u64,
    /// Complete solutions found.
    pub solutions: u64,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} candidates, {} pruned, {} predicate evaluations, {} solutions",
            self.candidates, self.pruned, self.evaluations, self.solutions
        )
    }
}

/// Status of the solution iterator after performing a step.
///
/// See [SolutionIter::step].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A solution was found. Call [SolutionIter::get_solution] for obtaining it.
    Yield,
    /// A candidate was bound or a group was exhausted, but there is no solution yet.
    Continue,
    /// The search space is exhausted.
    Done,
}

/// Iterator over all solutions of a [Solver].
///
/// There are two ways of using this type:
/// 1. Via the iterator implementation, which returns every solution (or the error that ended the
///    search).
/// 2. Using [SolutionIter::step], which returns after every candidate. This makes it possible to
///    cancel a long search between any two candidates.
#[derive(Debug)]
pub struct SolutionIter<'s> {
    solver: &'s Solver,
    /// One permutation source per depth that is currently being enumerated.
    frames: Vec<Permutations<Value>>,
    /// The permutation bound at each depth above the innermost frame.
    current: Vec<Vec<Value>>,
    bindings: Bindings,
    stats: SearchStats,
}

impl<'s> SolutionIter<'s> {
    /// Bind the next candidate of the innermost group and check it.
    ///
    /// A predicate error discards all frames, so every later call returns [Step::Done].
    pub fn step(&mut self) -> Result<Step, SolveError> {
        let solver = self.solver;
        let Some(depth) = self.frames.len().checked_sub(1) else {
            return Ok(Step::Done);
        };
        let group = &solver.groups[depth];

        let Some(perm) = self.frames[depth].next() else {
            // group exhausted, backtrack to the previous depth
            self.frames.pop();
            self.current.truncate(depth);
            for role in &group.roles {
                self.bindings.unbind(*role);
            }
            if self.frames.is_empty() {
                debug!(stats = %self.stats, "search exhausted");
                return Ok(Step::Done);
            }
            return Ok(Step::Continue);
        };

        for (role, value) in group.roles.iter().zip(&perm) {
            self.bindings.bind(*role, *value);
        }
        self.current.truncate(depth);
        self.current.push(perm);
        self.stats.candidates += 1;

        for predicate in &group.predicates {
            self.stats.evaluations += 1;
            match predicate.test(&self.bindings) {
                Ok(true) => {}
                Ok(false) => {
                    self.stats.pruned += 1;
                    trace!(depth, group = %group.name, "branch pruned");
                    return Ok(Step::Continue);
                }
                Err(source) => {
                    self.frames.clear();
                    return Err(SolveError::Predicate {
                        predicate: solver.pretty().predicate_to_string(predicate),
                        source,
                    });
                }
            }
        }

        if depth + 1 == solver.groups.len() {
            self.stats.solutions += 1;
            trace!(solutions = self.stats.solutions, "solution found");
            Ok(Step::Yield)
        } else {
            self.frames
                .push(solver.groups[depth + 1].domain.permutations());
            Ok(Step::Continue)
        }
    }

    /// Obtain the current assignment.
    ///
    /// Only meaningful right after [SolutionIter::step] returned [Step::Yield].
    pub fn get_solution(&self) -> Solution {
        Solution::new(self.solver.layout.clone(), self.current.clone())
    }

    /// The work done so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

impl<'s> Iterator for SolutionIter<'s> {
    type Item = Result<Solution, SolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.step() {
                Ok(Step::Yield) => break Some(Ok(self.get_solution())),
                Ok(Step::Continue) => continue,
                Ok(Step::Done) => break None,
                Err(err) => break Some(Err(err)),
            }
        }
    }
}
