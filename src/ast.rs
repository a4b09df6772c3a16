//! # Puzzle building blocks
//!
//! Roles, terms, predicates and variable groups. A [GroupSpec] binds its roles positionally to
//! each permutation of its domain, and carries the predicates that are checked once that group
//! has been bound.

use std::fmt;

use crate::domain::Domain;

/// A single domain element, e.g. a house number.
pub type Value = i32;

/// Errors produced by custom predicates.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A named puzzle variable such as `english` or `zebra`.
///
/// Internally, roles are represented by numeric IDs handed out by a
/// [RoleStore](crate::roles::RoleStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role(usize);

impl Role {
    #[inline(always)]
    pub fn ord(self) -> usize {
        self.0
    }

    #[inline(always)]
    pub fn from_ord(ord: usize) -> Role {
        Role(ord)
    }

    /// The term `self + offset`.
    pub fn plus(self, offset: Value) -> Term {
        Term::Offset(self, i64::from(offset))
    }

    /// The term `self - offset`.
    pub fn minus(self, offset: Value) -> Term {
        Term::Offset(self, -i64::from(offset))
    }
}

/// A role was read before any group bound it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("role ${} is not bound", .0.ord())]
pub struct UnboundRole(pub Role);

/// The partial assignment visible to predicates while the search is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    values: Vec<Option<Value>>,
}

impl Bindings {
    pub fn new(num_roles: usize) -> Self {
        Self {
            values: vec![None; num_roles],
        }
    }

    /// The current value of `role`, if its group has been bound.
    pub fn get(&self, role: Role) -> Option<Value> {
        self.values.get(role.ord()).copied().flatten()
    }

    /// Like [Bindings::get], but usable with `?` inside custom predicates.
    pub fn value(&self, role: Role) -> Result<Value, UnboundRole> {
        self.get(role).ok_or(UnboundRole(role))
    }

    pub(crate) fn bind(&mut self, role: Role, value: Value) {
        self.values[role.ord()] = Some(value);
    }

    pub(crate) fn unbind(&mut self, role: Role) {
        self.values[role.ord()] = None;
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Role(Role),
    Const(Value),
    /// `role + offset`, wide enough to hold any difference of two values.
    Offset(Role, i64),
}

impl Term {
    /// The role this term depends on, if any.
    pub fn role(&self) -> Option<Role> {
        match *self {
            Term::Role(role) | Term::Offset(role, _) => Some(role),
            Term::Const(_) => None,
        }
    }

    /// Evaluate in `i64`, so offsets never wrap around at the ends of [Value].
    pub fn eval(&self, bindings: &Bindings) -> Result<i64, UnboundRole> {
        match *self {
            Term::Role(role) => bindings.value(role).map(i64::from),
            Term::Const(value) => Ok(i64::from(value)),
            Term::Offset(role, offset) => {
                Ok(i64::from(bindings.value(role)?).saturating_add(offset))
            }
        }
    }
}

impl From<Role> for Term {
    fn from(role: Role) -> Self {
        Term::Role(role)
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::Const(value)
    }
}

/// The built-in constraint shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// Both sides evaluate to the same value.
    Eq(Term, Term),
    /// The sides evaluate to different values.
    Ne(Term, Term),
    /// The absolute difference of the two values is one.
    NextTo(Role, Role),
    /// The role takes one of the listed values.
    OneOf(Role, Vec<Value>),
}

impl Relation {
    pub fn holds(&self, bindings: &Bindings) -> Result<bool, UnboundRole> {
        Ok(match self {
            Relation::Eq(lhs, rhs) => lhs.eval(bindings)? == rhs.eval(bindings)?,
            Relation::Ne(lhs, rhs) => lhs.eval(bindings)? != rhs.eval(bindings)?,
            Relation::NextTo(a, b) => {
                (i64::from(bindings.value(*a)?) - i64::from(bindings.value(*b)?)).abs() == 1
            }
            Relation::OneOf(role, values) => values.contains(&bindings.value(*role)?),
        })
    }

    fn roles(&self) -> Vec<Role> {
        match self {
            Relation::Eq(lhs, rhs) | Relation::Ne(lhs, rhs) => {
                lhs.role().into_iter().chain(rhs.role()).collect()
            }
            Relation::NextTo(a, b) => vec![*a, *b],
            Relation::OneOf(role, _) => vec![*role],
        }
    }
}

type CustomCheck = Box<dyn Fn(&Bindings) -> Result<bool, BoxError>>;

/// A boolean constraint over one or more roles.
///
/// # Examples
///
/// ```
/// use permsolve::ast::{Predicate, Role};
///
/// let green = Role::from_ord(0);
/// let ivory = Role::from_ord(1);
/// // The green house is immediately to the right of the ivory house.
/// let clue = Predicate::eq(green, ivory.plus(1));
/// assert_eq!(clue.roles(), vec![green, ivory]);
/// ```
pub struct Predicate {
    kind: PredicateKind,
}

enum PredicateKind {
    Relation(Relation),
    Custom {
        label: String,
        roles: Vec<Role>,
        check: CustomCheck,
    },
}

impl Predicate {
    pub fn relation(relation: Relation) -> Self {
        Self {
            kind: PredicateKind::Relation(relation),
        }
    }

    pub fn eq(lhs: impl Into<Term>, rhs: impl Into<Term>) -> Self {
        Self::relation(Relation::Eq(lhs.into(), rhs.into()))
    }

    pub fn ne(lhs: impl Into<Term>, rhs: impl Into<Term>) -> Self {
        Self::relation(Relation::Ne(lhs.into(), rhs.into()))
    }

    pub fn next_to(a: Role, b: Role) -> Self {
        Self::relation(Relation::NextTo(a, b))
    }

    pub fn one_of(role: Role, values: impl IntoIterator<Item = Value>) -> Self {
        Self::relation(Relation::OneOf(role, values.into_iter().collect()))
    }

    /// A constraint backed by an arbitrary closure.
    ///
    /// `roles` must list every role the closure reads; the solver uses it to decide when the
    /// predicate may be evaluated. An error returned by the closure aborts the search.
    pub fn custom<F>(label: impl Into<String>, roles: impl IntoIterator<Item = Role>, check: F) -> Self
    where
        F: Fn(&Bindings) -> Result<bool, BoxError> + 'static,
    {
        Self {
            kind: PredicateKind::Custom {
                label: label.into(),
                roles: roles.into_iter().collect(),
                check: Box::new(check),
            },
        }
    }

    /// All roles referenced by this predicate, in order of appearance.
    pub fn roles(&self) -> Vec<Role> {
        match &self.kind {
            PredicateKind::Relation(relation) => relation.roles(),
            PredicateKind::Custom { roles, .. } => roles.clone(),
        }
    }

    /// The built-in relation, or `None` for custom predicates.
    pub fn as_relation(&self) -> Option<&Relation> {
        match &self.kind {
            PredicateKind::Relation(relation) => Some(relation),
            PredicateKind::Custom { .. } => None,
        }
    }

    /// The label given to a custom predicate.
    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            PredicateKind::Relation(_) => None,
            PredicateKind::Custom { label, .. } => Some(label),
        }
    }

    pub fn test(&self, bindings: &Bindings) -> Result<bool, BoxError> {
        match &self.kind {
            PredicateKind::Relation(relation) => Ok(relation.holds(bindings)?),
            PredicateKind::Custom { check, .. } => check(bindings),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PredicateKind::Relation(relation) => f.debug_tuple("Predicate").field(relation).finish(),
            PredicateKind::Custom { label, roles, .. } => f
                .debug_struct("Predicate")
                .field("label", label)
                .field("roles", roles)
                .finish_non_exhaustive(),
        }
    }
}

impl From<Relation> for Predicate {
    fn from(relation: Relation) -> Self {
        Predicate::relation(relation)
    }
}

/// One variable group, i.e. one dimension of the puzzle.
///
/// The `k`-th role is bound to the `k`-th value of each permutation of `domain`. The predicates
/// are evaluated right after the group has been bound, so they may only refer to roles of this
/// group and of groups that come before it.
#[derive(Debug)]
pub struct GroupSpec {
    pub name: String,
    pub domain: Domain,
    pub roles: Vec<Role>,
    pub predicates: Vec<Predicate>,
}

impl GroupSpec {
    pub fn new(name: impl Into<String>, domain: Domain, roles: Vec<Role>) -> Self {
        Self {
            name: name.into(),
            domain,
            roles,
            predicates: vec![],
        }
    }

    /// Register another predicate at this group's depth.
    pub fn when(mut self, predicate: impl Into<Predicate>) -> Self {
        self.predicates.push(predicate.into());
        self
    }
}
