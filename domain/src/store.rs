use serde_json::Value;

use crate::validate::{parse_user, parse_user_id};
use crate::{CoreError, User, UserDatabase, UserId};

/// Application service adding and removing users.
///
/// Holds nothing but the injected database. Every operation reads the current
/// collection, builds a new one and writes it back whole; the caller's
/// completion is handed to the database and runs before the operation returns.
pub struct UserStore<D: UserDatabase> {
    database: D,
}

impl<D: UserDatabase> UserStore<D> {
    pub fn new(database: D) -> Self {
        Self { database }
    }

    /// The injected database, for inspection.
    pub fn database(&self) -> &D {
        &self.database
    }

    pub fn into_database(self) -> D {
        self.database
    }

    /// Current collection, read straight from the database.
    pub fn users(&self) -> Result<Vec<User>, CoreError> {
        self.database.get_users()
    }

    /// Append `user` to the collection. Duplicate ids are allowed.
    pub fn add_user_with<F>(&self, user: User, mut on_complete: F) -> Result<(), CoreError>
    where
        F: FnMut(&[User]),
    {
        tracing::debug!(id = user.id, "adding user");
        let mut users = self.database.get_users()?;
        users.push(user);
        let count = users.len();
        self.database.set_users(users, &mut on_complete)?;
        tracing::info!(count, "user added");
        Ok(())
    }

    /// Drop every user whose id is `id`. The collection is written back even
    /// when nothing matched.
    pub fn remove_user_with<F>(&self, id: UserId, mut on_complete: F) -> Result<(), CoreError>
    where
        F: FnMut(&[User]),
    {
        tracing::debug!(id, "removing user");
        let before = self.database.get_users()?;
        let total = before.len();
        let users: Vec<User> = before.into_iter().filter(|u| u.id != id).collect();
        let removed = total - users.len();
        let count = users.len();
        self.database.set_users(users, &mut on_complete)?;
        tracing::info!(count, removed, "user removed");
        Ok(())
    }

    /// Like [`add_user_with`](Self::add_user_with), returning the collection
    /// the database delivered.
    pub fn add_user(&self, user: User) -> Result<Vec<User>, CoreError> {
        let mut delivered = Vec::new();
        self.add_user_with(user, |users| delivered = users.to_vec())?;
        Ok(delivered)
    }

    /// Like [`remove_user_with`](Self::remove_user_with), returning the
    /// collection the database delivered.
    pub fn remove_user(&self, id: UserId) -> Result<Vec<User>, CoreError> {
        let mut delivered = Vec::new();
        self.remove_user_with(id, |users| delivered = users.to_vec())?;
        Ok(delivered)
    }

    /// Add from an untyped value; rejected before the database is touched
    /// unless it is a user record.
    pub fn add_user_value<F>(&self, value: &Value, on_complete: F) -> Result<(), CoreError>
    where
        F: FnMut(&[User]),
    {
        let user = parse_user(value)?;
        self.add_user_with(user, on_complete)
    }

    /// Remove by an untyped id; rejected before the database is touched unless
    /// it is an integer.
    pub fn remove_user_value<F>(&self, value: &Value, on_complete: F) -> Result<(), CoreError>
    where
        F: FnMut(&[User]),
    {
        let id = parse_user_id(value)?;
        self.remove_user_with(id, on_complete)
    }
}
