use std::iter::Peekable;

use logos::{Logos, Span, SpannedIter};

use crate::{
    ast::{Predicate, Relation, Role, Term, Value},
    domain::{Domain, DomainError},
    puzzle::Puzzle,
    solver::ConfigError,
};

use super::lexer::Token;

struct TokenStream<'a> {
    source: &'a str,
    lexer: Peekable<SpannedIter<'a, Token>>,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        let lexer = Token::lexer(source).spanned().peekable();

        Self { source, lexer }
    }

    pub fn next(&mut self) -> Option<(Result<Token, ()>, Span)> {
        self.lexer.next()
    }

    pub fn advance(&mut self) {
        self.lexer.next();
    }

    pub fn peek_token(&mut self) -> Option<Result<Token, ()>> {
        self.lexer.peek().map(|(tok, _)| tok).cloned()
    }

    pub fn slice(&self, span: Span) -> &'a str {
        &self.source[span]
    }

    pub fn eof(&self) -> Span {
        self.source.len()..self.source.len()
    }
}

/// A parse error originating from [`Parser`].
#[derive(Debug, thiserror::Error)]
#[error("{} at {}..{}", .kind, .span.start, .span.end)]
pub struct ParseError {
    /// The range in the source text where the error occurred.
    pub span: Span,
    /// The type of error that occurred.
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(span: Span, kind: ParseErrorKind) -> Self {
        Self { span, kind }
    }

    /// One-based line and column of the start of the error in `source`.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let before = &source[..self.span.start.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let col = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
        (line, col)
    }
}

/// The various types of parse errors reported by [`Parser`].
#[derive(Debug, thiserror::Error)]
pub enum ParseErrorKind {
    /// The parser reached the end of the input, but expected more tokens to follow.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// The parser encountered a token that doesn't belong in that place.
    #[error("unexpected token {0:?}")]
    UnexpectedToken(Token),
    /// The parser encountered input that could not be recognized as a token.
    #[error("unrecognized input")]
    UnrecognizedToken,
    /// A constraint mentions a role that no preceding group declares.
    #[error("unknown role `{0}`")]
    UnknownRole(String),
    /// A call-style constraint uses a name other than `next_to` or `one_of`.
    #[error("unknown constraint `{0}`")]
    UnknownConstraint(String),
    /// A group was declared before any `domain` statement.
    #[error("group declared before any domain")]
    NoDomain,
    #[error(transparent)]
    InvalidDomain(#[from] DomainError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ParseErrorKind {
    /// Translate an unexpected item in the token stream (either an unexpected token or a lexer
    /// error) into the matching [`ParseErrorKind`].
    pub fn unexpected(res: Result<Token, ()>) -> Self {
        match res {
            Ok(tok) => Self::UnexpectedToken(tok),
            Err(()) => Self::UnrecognizedToken,
        }
    }
}

/// A parser for the puzzle syntax of [TextualPuzzle](super::TextualPuzzle).
///
/// Groups are added to the puzzle as soon as they are parsed, so constraints can refer to the
/// roles of every group declared above them.
pub struct Parser<'p> {
    puzzle: &'p mut Puzzle,
    domain: Option<Domain>,
}

impl<'p> Parser<'p> {
    pub fn new(puzzle: &'p mut Puzzle) -> Self {
        Self {
            puzzle,
            domain: None,
        }
    }

    /// Continue with `domain` as the active domain, e.g. when loading a puzzle in several parts.
    pub fn with_domain(puzzle: &'p mut Puzzle, domain: Option<Domain>) -> Self {
        Self { puzzle, domain }
    }

    /// The domain the next `group` statement will use.
    pub fn current_domain(&self) -> Option<&Domain> {
        self.domain.as_ref()
    }

    // //////////////////////////////// PUBLIC PARSER ////////////////////////////////

    /// Parse zero or more statements and apply them to the puzzle.
    pub fn parse_statements_str(&mut self, source: &str) -> Result<(), ParseError> {
        let mut tokens = TokenStream::new(source);
        while tokens.peek_token().is_some() {
            self.parse_statement(&mut tokens)?;
        }
        Ok(())
    }

    /// Parse a single constraint without adding it to the puzzle.
    pub fn parse_constraint_str(&mut self, source: &str) -> Result<Predicate, ParseError> {
        let mut tokens = TokenStream::new(source);
        let predicate = self.parse_constraint(&mut tokens)?;
        self.expect_eof(&mut tokens)?;
        Ok(predicate)
    }

    // //////////////////////////////// PARSER INTERNALS ////////////////////////////////

    fn parse_statement(&mut self, tokens: &mut TokenStream) -> Result<(), ParseError> {
        match tokens.peek_token() {
            Some(Ok(Token::Domain)) => {
                tokens.advance();
                self.parse_domain(tokens)
            }
            Some(Ok(Token::Group)) => {
                tokens.advance();
                self.parse_group(tokens)
            }
            _ => {
                let predicate = self.parse_constraint(tokens)?;
                self.puzzle.constrain(predicate);
                Ok(())
            }
        }
    }

    fn parse_domain(&mut self, tokens: &mut TokenStream) -> Result<(), ParseError> {
        let (first, first_span) = self.parse_int(tokens)?;
        let mut end = first_span.end;
        let domain = if let Some(Ok(Token::Range)) = tokens.peek_token() {
            tokens.advance();
            let (last, last_span) = self.parse_int(tokens)?;
            end = last_span.end;
            Domain::range(first, last)
        } else {
            let mut values = vec![first];
            while let Some(Ok(Token::Comma)) = tokens.peek_token() {
                tokens.advance();
                let (value, span) = self.parse_int(tokens)?;
                end = span.end;
                values.push(value);
            }
            Domain::new(values)
        };
        self.expect_token(tokens, Token::Period)?;
        self.domain = Some(
            domain.map_err(|err| ParseError::new(first_span.start..end, err.into()))?,
        );
        Ok(())
    }

    fn parse_group(&mut self, tokens: &mut TokenStream) -> Result<(), ParseError> {
        let (name, name_span) = self.parse_ident(tokens)?;
        self.expect_token(tokens, Token::Colon)?;
        let mut roles = vec![self.parse_ident(tokens)?.0];
        loop {
            match self.next_token(tokens)? {
                (Ok(Token::Comma), _) => roles.push(self.parse_ident(tokens)?.0),
                (Ok(Token::Period), _) => break,
                (other, span) => return Err(ParseError::new(span, ParseErrorKind::unexpected(other))),
            }
        }

        let domain = self
            .domain
            .clone()
            .ok_or_else(|| ParseError::new(name_span.clone(), ParseErrorKind::NoDomain))?;
        self.puzzle
            .add_group(name, domain, &roles[..])
            .map_err(|err| ParseError::new(name_span, err.into()))?;
        Ok(())
    }

    fn parse_constraint(&mut self, tokens: &mut TokenStream) -> Result<Predicate, ParseError> {
        let predicate = match tokens.peek_token() {
            Some(Ok(Token::Ident)) => {
                let (name, span) = self.parse_ident(tokens)?;
                if let Some(Ok(Token::LParen)) = tokens.peek_token() {
                    tokens.advance();
                    self.parse_call(tokens, name, span)?
                } else {
                    let role = self.lookup_role(name, span)?;
                    let lhs = self.parse_offset(tokens, role)?;
                    self.parse_comparison(tokens, lhs)?
                }
            }
            _ => {
                let lhs = self.parse_term(tokens)?;
                self.parse_comparison(tokens, lhs)?
            }
        };
        self.expect_token(tokens, Token::Period)?;
        Ok(predicate)
    }

    /// Parses `= rhs` or `!= rhs` following the left-hand side of a comparison.
    fn parse_comparison(
        &mut self,
        tokens: &mut TokenStream,
        lhs: Term,
    ) -> Result<Predicate, ParseError> {
        match self.next_token(tokens)? {
            (Ok(Token::Eq), _) => Ok(Predicate::eq(lhs, self.parse_term(tokens)?)),
            (Ok(Token::Ne), _) => Ok(Predicate::ne(lhs, self.parse_term(tokens)?)),
            (other, span) => Err(ParseError::new(span, ParseErrorKind::unexpected(other))),
        }
    }

    /// Parses the arguments of `next_to(a, b)` or `one_of(a, 1, 2, ...)`.
    fn parse_call(
        &mut self,
        tokens: &mut TokenStream,
        name: &str,
        span: Span,
    ) -> Result<Predicate, ParseError> {
        let predicate = match name {
            "next_to" => {
                let a = self.parse_role(tokens)?;
                self.expect_token(tokens, Token::Comma)?;
                let b = self.parse_role(tokens)?;
                Predicate::next_to(a, b)
            }
            "one_of" => {
                let role = self.parse_role(tokens)?;
                let mut values = vec![];
                while let Some(Ok(Token::Comma)) = tokens.peek_token() {
                    tokens.advance();
                    values.push(self.parse_int(tokens)?.0);
                }
                Predicate::relation(Relation::OneOf(role, values))
            }
            other => {
                return Err(ParseError::new(
                    span,
                    ParseErrorKind::UnknownConstraint(other.to_owned()),
                ))
            }
        };
        self.expect_token(tokens, Token::RParen)?;
        Ok(predicate)
    }

    fn parse_term(&mut self, tokens: &mut TokenStream) -> Result<Term, ParseError> {
        match tokens.peek_token() {
            Some(Ok(Token::Ident)) => {
                let role = self.parse_role(tokens)?;
                self.parse_offset(tokens, role)
            }
            _ => Ok(Term::Const(self.parse_int(tokens)?.0)),
        }
    }

    /// Parses an optional `+ n` or `- n` after a role.
    fn parse_offset(&mut self, tokens: &mut TokenStream, role: Role) -> Result<Term, ParseError> {
        match tokens.peek_token() {
            Some(Ok(Token::Plus)) => {
                tokens.advance();
                Ok(role.plus(self.parse_int(tokens)?.0))
            }
            Some(Ok(Token::Minus)) => {
                tokens.advance();
                Ok(role.minus(self.parse_int(tokens)?.0))
            }
            _ => Ok(Term::Role(role)),
        }
    }

    fn parse_role(&mut self, tokens: &mut TokenStream) -> Result<Role, ParseError> {
        let (name, span) = self.parse_ident(tokens)?;
        self.lookup_role(name, span)
    }

    fn lookup_role(&self, name: &str, span: Span) -> Result<Role, ParseError> {
        self.puzzle
            .role(name)
            .ok_or_else(|| ParseError::new(span, ParseErrorKind::UnknownRole(name.to_owned())))
    }

    fn parse_ident<'a>(&mut self, tokens: &mut TokenStream<'a>) -> Result<(&'a str, Span), ParseError> {
        match self.next_token(tokens)? {
            (Ok(Token::Ident), span) => Ok((tokens.slice(span.clone()), span)),
            (other, span) => Err(ParseError::new(span, ParseErrorKind::unexpected(other))),
        }
    }

    /// Parses an integer with an optional leading minus sign.
    fn parse_int(&mut self, tokens: &mut TokenStream) -> Result<(Value, Span), ParseError> {
        match self.next_token(tokens)? {
            (Ok(Token::Int(value)), span) => Ok((value, span)),
            (Ok(Token::Minus), minus) => match self.next_token(tokens)? {
                (Ok(Token::Int(value)), span) => Ok((-value, minus.start..span.end)),
                (other, span) => Err(ParseError::new(span, ParseErrorKind::unexpected(other))),
            },
            (other, span) => Err(ParseError::new(span, ParseErrorKind::unexpected(other))),
        }
    }

    fn next_token(
        &mut self,
        tokens: &mut TokenStream,
    ) -> Result<(Result<Token, ()>, Span), ParseError> {
        tokens
            .next()
            .ok_or_else(|| ParseError::new(tokens.eof(), ParseErrorKind::UnexpectedEof))
    }

    fn expect_eof(&mut self, tokens: &mut TokenStream) -> Result<(), ParseError> {
        if let Some((other, span)) = tokens.next() {
            Err(ParseError::new(span, ParseErrorKind::unexpected(other)))
        } else {
            Ok(())
        }
    }

    fn expect_token(
        &mut self,
        tokens: &mut TokenStream,
        expected: Token,
    ) -> Result<Span, ParseError> {
        match self.next_token(tokens)? {
            (Ok(actual), span) if actual == expected => Ok(span),
            (other, span) => Err(ParseError::new(span, ParseErrorKind::unexpected(other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "
        % two houses
        domain 1..2.
        group pet: cat, dog.
        domain 1, 2.
        group drink: tea, milk.
        cat = 1.
        tea != cat.
        next_to(cat, tea).
        one_of(milk, 1).
    ";

    #[test]
    fn statements() {
        let mut p = Puzzle::new();
        Parser::new(&mut p).parse_statements_str(SMALL).unwrap();
        assert_eq!(p.groups().len(), 2);
        assert_eq!(p.constraints().len(), 4);
        let pretty = p.pretty();
        let rendered = p
            .constraints()
            .iter()
            .map(|c| pretty.predicate_to_string(c))
            .collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec!["cat = 1", "tea != cat", "next_to(cat, tea)", "one_of(milk, 1)"]
        );

        let solver = p.solver().unwrap();
        let solutions = solver.solve().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].value_of("tea"), Some(2));
    }

    #[test]
    fn offsets_and_negative_numbers() {
        let mut p = Puzzle::new();
        Parser::new(&mut p)
            .parse_statements_str("domain -1..1. group g: a, b, c.")
            .unwrap();
        let mut parser = Parser::new(&mut p);
        let c = parser.parse_constraint_str("a = b + 1.").unwrap();
        assert_eq!(p.pretty().predicate_to_string(&c), "a = b + 1");
        let mut parser = Parser::new(&mut p);
        let c = parser.parse_constraint_str("-1 != c - 2.").unwrap();
        assert_eq!(p.pretty().predicate_to_string(&c), "-1 != c - 2");
    }

    #[test]
    fn errors_have_spans() {
        let mut p = Puzzle::new();
        let err = Parser::new(&mut p)
            .parse_statements_str("group g: a.")
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NoDomain));
        assert_eq!(err.span, 6..7);

        let mut p = Puzzle::new();
        let source = "domain 1..2.\ngroup g: a, b.\na = zebra.";
        let err = Parser::new(&mut p).parse_statements_str(source).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnknownRole(ref name) if name == "zebra"));
        assert_eq!(err.line_col(source), (3, 5));

        let mut p = Puzzle::new();
        let err = Parser::new(&mut p)
            .parse_statements_str("domain 1, 1.")
            .unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::InvalidDomain(DomainError::Duplicate(1))
        ));

        let mut p = Puzzle::new();
        let err = Parser::new(&mut p)
            .parse_statements_str("domain 1..2147483647.")
            .unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::InvalidDomain(DomainError::TooLarge { len: 2147483647 })
        ));
        assert_eq!(err.span, 7..20);

        let mut p = Puzzle::new();
        let err = Parser::new(&mut p)
            .parse_statements_str("domain 1..2. group g: a, b, c.")
            .unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::Config(ConfigError::ArityMismatch { .. })
        ));

        let mut p = Puzzle::new();
        let err = Parser::new(&mut p)
            .parse_statements_str("domain 1..2. group g: a, b. left_of(a, b).")
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnknownConstraint(_)));

        let mut p = Puzzle::new();
        let err = Parser::new(&mut p)
            .parse_statements_str("domain 1..2")
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof));
    }
}
