//! # Role names
//!
//! Roles are plain numeric IDs. The [RoleStore] hands them out and remembers which name belongs to
//! which ID.

use std::collections::HashMap;

use crate::ast::Role;

/// Bidirectional mapping between role names and [Role] IDs.
#[derive(Debug, Clone, Default)]
pub struct RoleStore {
    names: Vec<String>,
    lookup: HashMap<String, Role>,
}

impl RoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the role called `name`, allocating a fresh ID if the name hasn't been seen yet.
    pub fn get_or_insert_named(&mut self, name: &str) -> Role {
        if let Some(role) = self.lookup.get(name) {
            *role
        } else {
            let role = Role::from_ord(self.names.len());
            self.names.push(name.to_owned());
            self.lookup.insert(name.to_owned(), role);
            role
        }
    }

    pub fn get_named(&self, name: &str) -> Option<Role> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, role: Role) -> Option<&str> {
        self.names.get(role.ord()).map(String::as_str)
    }

    /// Whether `role` was allocated by this store.
    pub fn contains(&self, role: Role) -> bool {
        role.ord() < self.names.len()
    }

    /// Number of allocated roles.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(ord, name)| (Role::from_ord(ord), name.as_str()))
    }
}
