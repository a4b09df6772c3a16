//! # A textual puzzle syntax
//!
//! This module provides a small, Prolog-flavoured syntax for describing puzzles. See
//! [`TextualPuzzle`] for an example.

mod lexer;
mod parser;
mod pretty;

pub use lexer::Token;
pub use parser::{ParseError, ParseErrorKind};

use crate::{
    domain::Domain,
    puzzle::Puzzle,
    solver::{ConfigError, Solver},
};

pub use self::{parser::Parser, pretty::Prettifier};

/// A puzzle that can be described using a textual syntax.
///
/// Syntactic elements, each statement terminated by a dot:
/// - **Domains**: `domain 1..5.` or `domain 1, 2, 3.` sets the values for the groups that follow.
/// - **Groups**: `group color: red, green, ivory, yellow, blue.` declares the next group. Groups
///   are searched in the order in which they are declared.
/// - **Comparisons**: `english = red.`, `norwegian = 1.`, `green = ivory + 1.`, `ivory != 5.`
/// - **Adjacency**: `next_to(kools, horse).` holds when the values differ by exactly one.
/// - **Membership**: `one_of(milk, 2, 3, 4).`
///
/// Role and group names start with a lower case ASCII letter followed by letters, digits or
/// underscores. A `%` starts a comment that runs to the end of the line. Constraints may only
/// mention roles of groups declared above them; each constraint is checked as early in the search
/// as its roles allow.
///
/// # Example
///
/// ```
/// # use permsolve::textual::TextualPuzzle;
/// let mut p = TextualPuzzle::new();
/// p.load_str(
///     r#"
/// domain 1..3.
/// group person: alice, bob, carol.
/// group drink: tea, coffee, water.
/// alice = 1.
/// bob != 3.
/// coffee = carol.
/// next_to(tea, coffee).
/// "#,
/// )
/// .unwrap();
///
/// let solver = p.solver().unwrap();
/// let solution = solver.solve().next().unwrap().unwrap();
/// assert_eq!(solution.role_at("person", solution.value_of("water").unwrap()), Some("alice"));
/// ```
#[derive(Debug, Default)]
pub struct TextualPuzzle {
    puzzle: Puzzle,
    domain: Option<Domain>,
}

impl TextualPuzzle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load statements from a string. May be called repeatedly; the active domain carries over.
    pub fn load_str(&mut self, source: &str) -> Result<(), ParseError> {
        let mut parser = Parser::with_domain(&mut self.puzzle, self.domain.take());
        let result = parser.parse_statements_str(source);
        self.domain = parser.current_domain().cloned();
        result
    }

    /// Return a pretty-printer using the role names of this puzzle.
    pub fn pretty(&self) -> Prettifier {
        self.puzzle.pretty()
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Place the constraints and build a solver.
    pub fn solver(self) -> Result<Solver, ConfigError> {
        self.puzzle.solver()
    }
}

/// Parse a complete puzzle description.
pub fn parse_puzzle(source: &str) -> Result<Puzzle, ParseError> {
    let mut p = TextualPuzzle::new();
    p.load_str(source)?;
    Ok(p.puzzle)
}
