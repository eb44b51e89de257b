//! Domain library for the user registry.
//!
//! Holds the user record, the database port (trait), the error type and the
//! store service that validates input and writes whole collections back
//! through the port. Adapters (in-memory database, test doubles) live under
//! [`adapters`]; IO concerns belong to the binaries.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier of a user. Uniqueness is not enforced.
pub type UserId = i64;

/// A registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new<S: Into<String>>(id: UserId, name: S) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{id: {}, name: {:?}}}", self.id, self.name)
    }
}

/// Completion handed to [`UserDatabase::set_users`]; invoked once, inline,
/// with the collection that was just stored.
pub type Completion<'a> = &'a mut dyn FnMut(&[User]);

/// Database port owning the current user collection.
///
/// Writes replace the whole collection; nothing is merged or mutated in place.
pub trait UserDatabase: Send + Sync {
    /// Snapshot of the current collection.
    fn get_users(&self) -> Result<Vec<User>, CoreError>;
    /// Overwrite the collection, then call `on_complete` before returning.
    fn set_users(&self, users: Vec<User>, on_complete: Completion<'_>) -> Result<(), CoreError>;
}

impl<D: UserDatabase + ?Sized> UserDatabase for &D {
    fn get_users(&self) -> Result<Vec<User>, CoreError> {
        (**self).get_users()
    }

    fn set_users(&self, users: Vec<User>, on_complete: Completion<'_>) -> Result<(), CoreError> {
        (**self).set_users(users, on_complete)
    }
}

impl<D: UserDatabase + ?Sized> UserDatabase for Arc<D> {
    fn get_users(&self) -> Result<Vec<User>, CoreError> {
        (**self).get_users()
    }

    fn set_users(&self, users: Vec<User>, on_complete: Completion<'_>) -> Result<(), CoreError> {
        (**self).set_users(users, on_complete)
    }
}

/// Core domain errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("database error: {0}")]
    Database(String),
}

/// Return a short about/version line for binaries to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{}", pkg, ver)
}

pub mod adapters;
pub mod store;
pub mod validate;
