use std::sync::Mutex;

use crate::{Completion, CoreError, User, UserDatabase};

/// In-memory user database. The collection is guarded by a mutex so the type
/// can be shared, but every call is short and synchronous.
pub struct InMemoryDatabase {
    users: Mutex<Vec<User>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDatabase for InMemoryDatabase {
    fn get_users(&self) -> Result<Vec<User>, CoreError> {
        tracing::debug!("connecting to database");
        let users = self
            .users
            .lock()
            .map_err(|_| CoreError::Database("mutex poisoned".into()))?;
        Ok(users.clone())
    }

    fn set_users(&self, users: Vec<User>, on_complete: Completion<'_>) -> Result<(), CoreError> {
        tracing::debug!(count = users.len(), "connecting to database");
        {
            let mut stored = self
                .users
                .lock()
                .map_err(|_| CoreError::Database("mutex poisoned".into()))?;
            stored.clone_from(&users);
        }
        // Lock released: the completion may read the database again.
        on_complete(&users);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let db = InMemoryDatabase::new();
        assert!(db.get_users().unwrap().is_empty());
    }

    #[test]
    fn set_overwrites_whole_collection() {
        let db = InMemoryDatabase::with_users(vec![User::new(0, "Harry"), User::new(1, "John")]);
        db.set_users(vec![User::new(2, "Ann")], &mut |_: &[User]| {})
            .unwrap();
        assert_eq!(db.get_users().unwrap(), vec![User::new(2, "Ann")]);
    }

    #[test]
    fn completion_runs_once_with_new_collection() {
        let db = InMemoryDatabase::new();
        let mut seen = Vec::new();
        db.set_users(vec![User::new(0, "Harry")], &mut |users: &[User]| {
            seen.push(users.to_vec())
        })
        .unwrap();
        assert_eq!(seen, vec![vec![User::new(0, "Harry")]]);
    }

    #[test]
    fn completion_can_read_back() {
        let db = InMemoryDatabase::new();
        let mut read_back = None;
        db.set_users(vec![User::new(3, "Kim")], &mut |_: &[User]| {
            read_back = Some(db.get_users().unwrap())
        })
        .unwrap();
        assert_eq!(read_back, Some(vec![User::new(3, "Kim")]));
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let db = InMemoryDatabase::with_users(vec![User::new(0, "Harry")]);
        let before = db.get_users().unwrap();
        db.set_users(Vec::new(), &mut |_: &[User]| {}).unwrap();
        assert_eq!(before, vec![User::new(0, "Harry")]);
        assert!(db.get_users().unwrap().is_empty());
    }
}
