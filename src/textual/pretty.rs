use std::fmt::Write;

use crate::{
    ast::{GroupSpec, Predicate, Relation, Role, Term},
    roles::RoleStore,
};

/// A pretty-printer for constraints and groups using the syntax of
/// [TextualPuzzle](super::TextualPuzzle).
pub struct Prettifier<'a> {
    roles: &'a RoleStore,
}

impl<'a> Prettifier<'a> {
    pub fn new(roles: &'a RoleStore) -> Self {
        Self { roles }
    }

    pub fn predicate_to_string(&self, predicate: &Predicate) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.pretty_predicate(&mut out, predicate);
        out
    }

    pub fn group_to_string(&self, group: &GroupSpec) -> String {
        let mut out = String::new();
        let _ = self.pretty_group(&mut out, group);
        out
    }

    pub fn term_to_string(&self, term: &Term) -> String {
        let mut out = String::new();
        let _ = self.pretty_term(&mut out, term);
        out
    }

    /// Custom predicates are rendered as `label(role, ...)`.
    pub fn pretty_predicate<W: Write>(&self, writer: &mut W, predicate: &Predicate) -> std::fmt::Result {
        match predicate.as_relation() {
            Some(Relation::Eq(lhs, rhs)) => {
                self.pretty_term(writer, lhs)?;
                write!(writer, " = ")?;
                self.pretty_term(writer, rhs)
            }
            Some(Relation::Ne(lhs, rhs)) => {
                self.pretty_term(writer, lhs)?;
                write!(writer, " != ")?;
                self.pretty_term(writer, rhs)
            }
            Some(Relation::NextTo(a, b)) => {
                write!(writer, "next_to(")?;
                self.pretty_role(writer, *a)?;
                write!(writer, ", ")?;
                self.pretty_role(writer, *b)?;
                write!(writer, ")")
            }
            Some(Relation::OneOf(role, values)) => {
                write!(writer, "one_of(")?;
                self.pretty_role(writer, *role)?;
                for value in values {
                    write!(writer, ", {}", value)?;
                }
                write!(writer, ")")
            }
            None => {
                write!(writer, "{}(", predicate.label().unwrap_or("custom"))?;
                if let Some((first, rest)) = predicate.roles().split_first() {
                    self.pretty_role(writer, *first)?;
                    for role in rest {
                        write!(writer, ", ")?;
                        self.pretty_role(writer, *role)?;
                    }
                }
                write!(writer, ")")
            }
        }
    }

    pub fn pretty_term<W: Write>(&self, writer: &mut W, term: &Term) -> std::fmt::Result {
        match *term {
            Term::Role(role) => self.pretty_role(writer, role),
            Term::Const(value) => write!(writer, "{}", value),
            Term::Offset(role, offset) => {
                self.pretty_role(writer, role)?;
                if offset < 0 {
                    write!(writer, " - {}", offset.unsigned_abs())
                } else {
                    write!(writer, " + {}", offset)
                }
            }
        }
    }

    pub fn pretty_group<W: Write>(&self, writer: &mut W, group: &GroupSpec) -> std::fmt::Result {
        write!(writer, "group {}: ", group.name)?;
        for (index, role) in group.roles.iter().enumerate() {
            if index > 0 {
                write!(writer, ", ")?;
            }
            self.pretty_role(writer, *role)?;
        }
        write!(writer, ".")
    }

    pub fn pretty_role<W: Write>(&self, writer: &mut W, role: Role) -> std::fmt::Result {
        if let Some(name) = self.roles.name(role) {
            write!(writer, "{}", name)
        } else {
            write!(writer, "${}", role.ord())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;

    #[test]
    fn terms() {
        let mut roles = RoleStore::new();
        let green = roles.get_or_insert_named("green");
        let pretty = Prettifier::new(&roles);

        assert_eq!(pretty.term_to_string(&green.into()), "green");
        assert_eq!(pretty.term_to_string(&Term::Const(-3)), "-3");
        assert_eq!(pretty.term_to_string(&green.plus(1)), "green + 1");
        assert_eq!(pretty.term_to_string(&green.minus(2)), "green - 2");
        assert_eq!(
            pretty.term_to_string(&green.minus(Value::MIN)),
            "green + 2147483648"
        );
        assert_eq!(
            pretty.term_to_string(&Role::from_ord(5).plus(0)),
            "$5 + 0"
        );
    }

    #[test]
    fn custom_predicates_show_their_roles() {
        let mut roles = RoleStore::new();
        let a = roles.get_or_insert_named("a");
        let b = roles.get_or_insert_named("b");
        let pretty = Prettifier::new(&roles);
        let predicate = Predicate::custom("apart", [a, b], |_| Ok(true));
        assert_eq!(pretty.predicate_to_string(&predicate), "apart(a, b)");
    }
}
