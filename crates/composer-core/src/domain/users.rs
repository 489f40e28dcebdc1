//! Registered participants.
//!
//! The user table knows *who* is in the session; it knows nothing about
//! placement.  A participant can stay registered without a slot for as long as
//! the topology has no room for them.
//!
//! # Ids versus keys
//!
//! Callers identify participants by a [`UserId`] they assign themselves.  The
//! table additionally stamps every registration with a private [`UserKey`],
//! and slots refer to users by key.  Keeping the two apart means a caller that
//! accidentally registers the same id twice gets two independent entries
//! instead of two entries aliasing the same slot.

use std::sync::Arc;

use crate::sink::OutputSink;

/// Caller-assigned participant identifier.
pub type UserId = u32;

/// Engine-assigned handle for one registration.  Never reused within an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserKey(u64);

/// One registered participant.
#[derive(Clone)]
pub struct User {
    pub key: UserKey,
    pub id: UserId,
    pub sink: Arc<dyn OutputSink>,
}

/// All registered participants in registration order.
///
/// Lookups by id return the earliest matching registration.
#[derive(Default)]
pub struct UserTable {
    users: Vec<User>,
    next_key: u64,
}

impl UserTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registration and returns its key.  Duplicate ids are accepted.
    pub fn insert(&mut self, id: UserId, sink: Arc<dyn OutputSink>) -> UserKey {
        let key = UserKey(self.next_key);
        self.next_key += 1;
        self.users.push(User { key, id, sink });
        key
    }

    /// Returns the earliest registration with the given id.
    pub fn find(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn get(&self, key: UserKey) -> Option<&User> {
        self.users.iter().find(|u| u.key == key)
    }

    /// Removes the earliest registration with the given id.
    pub fn remove(&mut self, id: UserId) -> Option<User> {
        let index = self.users.iter().position(|u| u.id == id)?;
        Some(self.users.remove(index))
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.find(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::mock::RecordingSink;

    fn sink() -> Arc<dyn OutputSink> {
        Arc::new(RecordingSink::new())
    }

    #[test]
    fn test_user_table_starts_empty() {
        let table = UserTable::new();
        assert!(table.is_empty());
        assert!(!table.contains(1));
    }

    #[test]
    fn test_insert_assigns_distinct_keys() {
        let mut table = UserTable::new();
        let a = table.insert(1, sink());
        let b = table.insert(2, sink());
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_are_kept_as_separate_registrations() {
        let mut table = UserTable::new();
        let first = table.insert(7, sink());
        let second = table.insert(7, sink());
        assert_ne!(first, second);
        assert_eq!(table.len(), 2);
        assert_eq!(table.find(7).map(|u| u.key), Some(first));
    }

    #[test]
    fn test_remove_takes_earliest_registration_first() {
        let mut table = UserTable::new();
        let first = table.insert(7, sink());
        let second = table.insert(7, sink());
        assert_eq!(table.remove(7).map(|u| u.key), Some(first));
        assert_eq!(table.find(7).map(|u| u.key), Some(second));
    }

    #[test]
    fn test_remove_unknown_id_returns_none() {
        let mut table = UserTable::new();
        table.insert(1, sink());
        assert!(table.remove(2).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_keys_are_not_reused_after_removal() {
        let mut table = UserTable::new();
        let a = table.insert(1, sink());
        table.remove(1);
        let b = table.insert(1, sink());
        assert_ne!(a, b);
        assert!(table.get(a).is_none());
        assert!(table.get(b).is_some());
    }
}
