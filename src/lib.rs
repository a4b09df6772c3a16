//! # Permutation-based puzzle solving
//!
//! Permsolve solves logic grid puzzles, such as the famous [zebra
//! puzzle](https://en.wikipedia.org/wiki/Zebra_Puzzle), by brute force with aggressive pruning.
//!
//! A puzzle consists of a number of *groups* (colors, nationalities, pets, ...). Every group is a
//! list of roles that are assigned the values of a [Domain] (e.g. house numbers 1 to 5) in some
//! order, so each candidate assignment of a group is a permutation of the domain. The [Solver]
//! enumerates these permutations group by group in a nested fashion, and checks the constraints
//! ([Predicate]s) as soon as all roles they mention are bound. A branch is abandoned on the first
//! failing constraint, which makes the nominal `(5!)^5` search space of the zebra puzzle small
//! enough to exhaust in well under a second.
//!
//! Everything is lazy. Permutations are produced one at a time by [permute::permute], and
//! solutions one at a time by the [SolutionIter] returned from [Solver::solve]. Stopping the
//! iteration stops the search.
//!
//! # Example
//!
//! Four friends each sit on one of four chairs and each drink a different beverage.
//!
//! ```
//! use permsolve::{Domain, Predicate, Puzzle};
//!
//! let mut p = Puzzle::new();
//! let chairs = Domain::range(1, 4).unwrap();
//!
//! let [ann, ben, cid, dee] = p.group("friend", chairs.clone(), ["ann", "ben", "cid", "dee"]).unwrap();
//! let [tea, cola, milk, soda] = p.group("drink", chairs, ["tea", "cola", "milk", "soda"]).unwrap();
//!
//! // Ann sits on the first chair.
//! p.constrain(Predicate::eq(ann, 1));
//! // Ben sits directly right of the milk drinker.
//! p.constrain(Predicate::eq(ben, milk.plus(1)));
//! // Cid drinks cola and sits next to Dee.
//! p.constrain(Predicate::eq(cid, cola));
//! p.constrain(Predicate::next_to(cid, dee));
//! // Tea is drunk on chair 2, Dee does not sit on chair 4.
//! p.constrain(Predicate::eq(tea, 2));
//! p.constrain(Predicate::ne(dee, 4));
//! # let _ = soda;
//!
//! let solver = p.solver().unwrap();
//! let solutions = solver.solve().collect::<Result<Vec<_>, _>>().unwrap();
//! assert_eq!(solutions.len(), 1);
//! assert_eq!(solutions[0].role_at("friend", 2), Some("ben"));
//! assert_eq!(solutions[0].role_at("drink", 4), Some("cola"));
//! ```
//!
//! Puzzles can also be written down in a small textual syntax, see [textual::TextualPuzzle], and
//! the [zebra] module contains the classic instance.

pub mod ast;
pub mod domain;
pub mod permute;
pub mod puzzle;
pub mod roles;
pub mod solution;
pub mod solver;
pub mod textual;
pub mod zebra;

pub use ast::{GroupSpec, Predicate, Role, Value};
pub use domain::Domain;
pub use permute::{permute, permute_all};
pub use puzzle::Puzzle;
pub use roles::RoleStore;
pub use solution::Solution;
pub use solver::{ConfigError, SearchStats, SolutionIter, SolveError, Solver, Step};
