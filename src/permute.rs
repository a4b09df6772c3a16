//! # Permutations
//!
//! Removal-based permutation generation in two flavours: [permute_all] collects everything into a
//! vector, while [permute] returns a lazy [Permutations] iterator that only computes as many
//! arrangements as the caller asks for.
//!
//! Both produce permutations in the same order. At every level of the recursion the element at
//! position 0 is chosen first, then position 1, and so on. For sorted input this coincides with
//! lexicographic order.
//!
//! ```
//! use permsolve::permute::permute;
//!
//! let perms = permute(&['a', 'b', 'c']).collect::<Vec<_>>();
//! assert_eq!(perms.len(), 6);
//! assert_eq!(perms[0], vec!['a', 'b', 'c']);
//! assert_eq!(perms[1], vec!['a', 'c', 'b']);
//! assert_eq!(perms[5], vec!['c', 'b', 'a']);
//! ```


use std::iter::FusedIterator;

/// Return a copy of `items` with the element at `index` removed.
///
/// The input slice is left untouched, so the same sequence can be used for every index at one
/// recursion level.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    let mut rest = Vec::with_capacity(items.len().saturating_sub(1));
    rest.extend_from_slice(&items[..index]);
    rest.extend_from_slice(&items[index + 1..]);
    rest
}

/// Eagerly compute all permutations of `items`.
///
/// The result has `items.len()!` entries, so this is only sensible for short sequences. Use
/// [permute] for anything that might be abandoned early.
pub fn permute_all<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut result = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let rest = remove_at(items, index);
        for combo in permute_all(&rest) {
            let mut perm = Vec::with_capacity(items.len());
            perm.push(item.clone());
            perm.extend(combo);
            result.push(perm);
        }
    }
    result
}

/// Lazily enumerate all permutations of `items`.
///
/// The sequence is copied once up front; the caller's slice is never touched again.
pub fn permute<T: Clone>(items: &[T]) -> Permutations<T> {
    Permutations::new(items.to_vec())
}

/// Iterator over the permutations of a sequence, see [permute].
///
/// Instead of nesting one generator per recursion level, the iterator keeps an explicit stack of
/// frames. Frame `k` holds the elements still available at depth `k` and the index of the next
/// element to choose there. The chosen elements form the `prefix`, which always has one entry
/// less than there are frames.
#[derive(Debug, Clone)]
pub struct Permutations<T> {
    frames: Vec<Frame<T>>,
    prefix: Vec<T>,
}

#[derive(Debug, Clone)]
struct Frame<T> {
    /// Elements not yet placed in the prefix.
    rest: Vec<T>,
    /// Next position in `rest` to pick.
    next: usize,
}

impl<T: Clone> Permutations<T> {
    fn new(items: Vec<T>) -> Self {
        let capacity = items.len();
        Self {
            frames: vec![Frame {
                rest: items,
                next: 0,
            }],
            prefix: Vec::with_capacity(capacity),
        }
    }

    /// Drop the topmost frame together with the prefix element that led into it.
    fn pop_frame(&mut self) {
        self.frames.pop();
        if !self.frames.is_empty() {
            self.prefix.pop();
        }
    }
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.frames.last_mut()?;

            if top.rest.len() <= 1 {
                // base case: whatever is left completes the prefix
                let mut perm = Vec::with_capacity(self.prefix.len() + top.rest.len());
                perm.extend_from_slice(&self.prefix);
                perm.extend_from_slice(&top.rest);
                self.pop_frame();
                return Some(perm);
            }

            if top.next < top.rest.len() {
                let index = top.next;
                top.next += 1;
                let item = top.rest[index].clone();
                let rest = remove_at(&top.rest, index);
                self.prefix.push(item);
                self.frames.push(Frame { rest, next: 0 });
            } else {
                self.pop_frame();
            }
        }
    }
}

impl<T: Clone> FusedIterator for Permutations<T> {}

/// Number of permutations of `n` distinct elements, `None` on overflow.
pub fn count(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k))
}
