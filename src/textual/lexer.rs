use logos::Logos;

use crate::ast::Value;

#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    #[token(".")]
    Period,

    #[token("..")]
    Range,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("=")]
    Eq,

    #[token("!=")]
    Ne,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("domain")]
    Domain,

    #[token("group")]
    Group,

    #[regex("[a-z][a-zA-Z_0-9]*")]
    Ident,

    #[regex("[0-9]+", |lex| lex.slice().parse().ok())]
    Int(Value),

    #[regex(r"%[^\n]*", logos::skip)]
    Comment,

    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,
}
