//! # Domains
//!
//! The set of values every role of a group ranges over, see [Domain].

use std::collections::HashSet;

use crate::{
    ast::Value,
    permute::{self, Permutations},
};

/// Reasons why a sequence of values is not a valid [Domain].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("a domain needs at least one value")]
    Empty,
    #[error("value {0} appears more than once in the domain")]
    Duplicate(Value),
    #[error("a domain has at most {} values, got {len}", Domain::MAX_LEN)]
    TooLarge { len: u64 },
}

/// A non-empty, ordered sequence of distinct values.
///
/// ```
/// use permsolve::domain::{Domain, DomainError};
///
/// let houses = Domain::range(1, 5).unwrap();
/// assert_eq!(houses.values(), &[1, 2, 3, 4, 5]);
/// assert_eq!(houses.permutations().count(), 120);
///
/// assert_eq!(Domain::new([1, 2, 1]), Err(DomainError::Duplicate(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    values: Vec<Value>,
}

impl Domain {
    /// Largest supported number of values. The permutation count of anything bigger does not
    /// fit into a `u64`.
    pub const MAX_LEN: usize = 20;

    pub fn new(values: impl IntoIterator<Item = Value>) -> Result<Self, DomainError> {
        let mut values = values.into_iter();
        let collected = values.by_ref().take(Self::MAX_LEN).collect::<Vec<_>>();
        let excess = values.count() as u64;
        if excess > 0 {
            return Err(DomainError::TooLarge {
                len: collected.len() as u64 + excess,
            });
        }
        let values = collected;
        if values.is_empty() {
            return Err(DomainError::Empty);
        }
        let mut seen = HashSet::with_capacity(values.len());
        for value in &values {
            if !seen.insert(*value) {
                return Err(DomainError::Duplicate(*value));
            }
        }
        Ok(Self { values })
    }

    /// The inclusive range `low..=high`.
    pub fn range(low: Value, high: Value) -> Result<Self, DomainError> {
        let len = i64::from(high) - i64::from(low) + 1;
        if len > Self::MAX_LEN as i64 {
            return Err(DomainError::TooLarge { len: len as u64 });
        }
        Self::new(low..=high)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`, domains are never empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: Value) -> bool {
        self.values.contains(&value)
    }

    /// Lazily enumerate all orderings of the domain.
    pub fn permutations(&self) -> Permutations<Value> {
        permute::permute(&self.values)
    }
}

impl TryFrom<Vec<Value>> for Domain {
    type Error = DomainError;

    fn try_from(values: Vec<Value>) -> Result<Self, Self::Error> {
        Domain::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        assert_eq!(Domain::new([]), Err(DomainError::Empty));
        assert_eq!(Domain::range(3, 1), Err(DomainError::Empty));
        assert_eq!(Domain::new([4, 2, 4]), Err(DomainError::Duplicate(4)));
        assert_eq!(Domain::try_from(vec![2, 1]).unwrap().values(), &[2, 1]);
    }

    #[test]
    fn size_is_bounded() {
        assert_eq!(Domain::range(1, 20).unwrap().len(), Domain::MAX_LEN);
        assert_eq!(Domain::range(1, 21), Err(DomainError::TooLarge { len: 21 }));
        assert_eq!(
            Domain::range(Value::MIN, Value::MAX),
            Err(DomainError::TooLarge { len: 1 << 32 })
        );
        assert_eq!(Domain::new(0..25), Err(DomainError::TooLarge { len: 25 }));
        assert_eq!(
            Domain::range(Value::MAX - 1, Value::MAX).unwrap().values(),
            &[Value::MAX - 1, Value::MAX]
        );
    }

    #[test]
    fn permutations_follow_domain_order() {
        let d = Domain::new([3, 1, 2]).unwrap();
        let first = d.permutations().next().unwrap();
        assert_eq!(first, vec![3, 1, 2]);
        assert_eq!(d.permutations().count(), 6);
        assert!(d.contains(2));
        assert!(!d.contains(4));
    }
}
