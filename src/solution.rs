//! # Solutions
//!
//! A [Solution] is the permutation chosen for every group, together with enough layout
//! information to look values up by role name or roles up by value.

use std::{fmt, rc::Rc};

use crate::ast::{Role, Value};

/// Names and group membership of all roles, shared between a solver and its solutions.
#[derive(Debug)]
pub(crate) struct Layout {
    pub(crate) names: Vec<String>,
    pub(crate) groups: Vec<GroupLayout>,
    /// `(group index, position)` for every role ordinal, `None` for roles no group binds.
    pub(crate) positions: Vec<Option<(usize, usize)>>,
}

#[derive(Debug)]
pub(crate) struct GroupLayout {
    pub(crate) name: String,
    pub(crate) roles: Vec<Role>,
}

/// A complete assignment that satisfies every predicate.
///
/// Within each group, the values form a permutation of that group's domain.
#[derive(Clone)]
pub struct Solution {
    layout: Rc<Layout>,
    /// The chosen permutation per group, in group order.
    values: Vec<Vec<Value>>,
}

impl Solution {
    pub(crate) fn new(layout: Rc<Layout>, values: Vec<Vec<Value>>) -> Self {
        debug_assert_eq!(layout.groups.len(), values.len());
        Self { layout, values }
    }

    /// The value assigned to `role`.
    pub fn get(&self, role: Role) -> Option<Value> {
        let (group, position) = (*self.layout.positions.get(role.ord())?)?;
        self.values[group].get(position).copied()
    }

    /// The value assigned to the role called `name`.
    pub fn value_of(&self, name: &str) -> Option<Value> {
        let ord = self.layout.names.iter().position(|n| n == name)?;
        self.get(Role::from_ord(ord))
    }

    /// The role of group `group` that was assigned `value`, e.g. which nationality lives in house 3.
    pub fn role_at(&self, group: &str, value: Value) -> Option<&str> {
        let index = self.layout.groups.iter().position(|g| g.name == group)?;
        let position = self.values[index].iter().position(|v| *v == value)?;
        let role = self.layout.groups[index].roles[position];
        Some(self.layout.names[role.ord()].as_str())
    }

    /// All role names assigned `value`, one per group, in group order.
    pub fn roles_at(&self, value: Value) -> Vec<&str> {
        self.layout
            .groups
            .iter()
            .zip(&self.values)
            .filter_map(|(group, values)| {
                let position = values.iter().position(|v| *v == value)?;
                Some(self.layout.names[group.roles[position].ord()].as_str())
            })
            .collect()
    }

    /// Iterate over `(group, role, value)` triples in group order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Value)> {
        self.layout
            .groups
            .iter()
            .zip(&self.values)
            .flat_map(move |(group, values)| {
                group.roles.iter().zip(values).map(move |(role, value)| {
                    (
                        group.name.as_str(),
                        self.layout.names[role.ord()].as_str(),
                        *value,
                    )
                })
            })
    }

    /// The group names, in depth order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.layout.groups.iter().map(|g| g.name.as_str())
    }

    /// The permutation chosen for the group at `depth`.
    pub fn permutation(&self, depth: usize) -> Option<&[Value]> {
        self.values.get(depth).map(Vec::as_slice)
    }

    /// All distinct values, in ascending order.
    fn sorted_values(&self) -> Vec<Value> {
        let mut values = self.values.iter().flatten().copied().collect::<Vec<_>>();
        values.sort_unstable();
        values.dedup();
        values
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Solution {}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(_, role, value)| (role, value)))
            .finish()
    }
}

/// Renders the solution as a table with one row per value and one column per group.
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.sorted_values();
        let mut rows = vec![Vec::with_capacity(self.layout.groups.len() + 1)];
        rows[0].push(String::new());
        rows[0].extend(self.groups().map(str::to_owned));
        for value in &values {
            let mut row = vec![value.to_string()];
            for group in self.groups() {
                row.push(self.role_at(group, *value).unwrap_or("-").to_owned());
            }
            rows.push(row);
        }

        let columns = rows[0].len();
        let widths = (0..columns)
            .map(|c| rows.iter().map(|r| r[c].len()).max().unwrap_or(0))
            .collect::<Vec<_>>();

        for row in &rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Solution {
        let layout = Layout {
            names: ["cat", "dog", "tea", "milk", "ghost"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            groups: vec![
                GroupLayout {
                    name: "pet".into(),
                    roles: vec![Role::from_ord(0), Role::from_ord(1)],
                },
                GroupLayout {
                    name: "drink".into(),
                    roles: vec![Role::from_ord(2), Role::from_ord(3)],
                },
            ],
            positions: vec![Some((0, 0)), Some((0, 1)), Some((1, 0)), Some((1, 1)), None],
        };
        Solution::new(Rc::new(layout), vec![vec![2, 1], vec![1, 2]])
    }

    #[test]
    fn lookups() {
        let s = sample();
        assert_eq!(s.get(Role::from_ord(0)), Some(2));
        assert_eq!(s.value_of("milk"), Some(2));
        assert_eq!(s.value_of("ghost"), None);
        assert_eq!(s.value_of("nobody"), None);
        assert_eq!(s.role_at("pet", 1), Some("dog"));
        assert_eq!(s.role_at("drink", 1), Some("tea"));
        assert_eq!(s.role_at("car", 1), None);
        assert_eq!(s.roles_at(2), vec!["cat", "milk"]);
        assert_eq!(s.permutation(1), Some(&[1, 2][..]));
        assert_eq!(
            s.iter().collect::<Vec<_>>(),
            vec![
                ("pet", "cat", 2),
                ("pet", "dog", 1),
                ("drink", "tea", 1),
                ("drink", "milk", 2)
            ]
        );
    }

    #[test]
    fn table() {
        let table = sample().to_string();
        assert_eq!(table, "   pet  drink\n1  dog  tea\n2  cat  milk\n");
    }
}
