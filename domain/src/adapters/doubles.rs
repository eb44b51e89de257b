//! Test doubles for the database port.
//!
//! [`SpyDatabase`] wraps a real database and records what the store asks of
//! it. [`StubDatabase`] replaces the database entirely with scripted answers,
//! so a test can force a particular read, a particular completion value, or a
//! failure.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{Completion, CoreError, User, UserDatabase};

fn poisoned<T>(_: T) -> CoreError {
    CoreError::Database("mutex poisoned".into())
}

/// Pass-through wrapper that counts calls and keeps every written collection.
pub struct SpyDatabase<D: UserDatabase> {
    inner: D,
    gets: AtomicUsize,
    sets: AtomicUsize,
    writes: Mutex<Vec<Vec<User>>>,
}

impl<D: UserDatabase> SpyDatabase<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }

    pub fn set_calls(&self) -> usize {
        self.sets.load(Ordering::Relaxed)
    }

    /// Collections passed to `set_users`, oldest first.
    pub fn writes(&self) -> Result<Vec<Vec<User>>, CoreError> {
        Ok(self.writes.lock().map_err(poisoned)?.clone())
    }

    pub fn reset(&self) -> Result<(), CoreError> {
        self.gets.store(0, Ordering::Relaxed);
        self.sets.store(0, Ordering::Relaxed);
        self.writes.lock().map_err(poisoned)?.clear();
        Ok(())
    }
}

impl<D: UserDatabase> UserDatabase for SpyDatabase<D> {
    fn get_users(&self) -> Result<Vec<User>, CoreError> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.inner.get_users()
    }

    fn set_users(&self, users: Vec<User>, on_complete: Completion<'_>) -> Result<(), CoreError> {
        self.sets.fetch_add(1, Ordering::Relaxed);
        self.writes.lock().map_err(poisoned)?.push(users.clone());
        self.inner.set_users(users, on_complete)
    }
}

#[derive(Default)]
struct StubState {
    stored: Vec<User>,
    queued_gets: VecDeque<Vec<User>>,
    yields: Option<Vec<User>>,
    failure: Option<String>,
    writes: Vec<Vec<User>>,
}

/// Scripted stand-in for a database.
///
/// Without any script it behaves like an empty in-memory database.
#[derive(Default)]
pub struct StubDatabase {
    state: Mutex<StubState>,
}

impl StubDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next unanswered `get_users` call.
    pub fn returns_on_next_get(&self, users: Vec<User>) -> Result<(), CoreError> {
        self.state
            .lock()
            .map_err(poisoned)?
            .queued_gets
            .push_back(users);
        Ok(())
    }

    /// Make `set_users` hand `users` to the completion instead of what was written.
    pub fn yields_on_set(&self, users: Vec<User>) -> Result<(), CoreError> {
        self.state.lock().map_err(poisoned)?.yields = Some(users);
        Ok(())
    }

    /// Fail every following call with `CoreError::Database(message)`.
    pub fn fail_with<S: Into<String>>(&self, message: S) -> Result<(), CoreError> {
        self.state.lock().map_err(poisoned)?.failure = Some(message.into());
        Ok(())
    }

    pub fn writes(&self) -> Result<Vec<Vec<User>>, CoreError> {
        Ok(self.state.lock().map_err(poisoned)?.writes.clone())
    }
}

impl UserDatabase for StubDatabase {
    fn get_users(&self) -> Result<Vec<User>, CoreError> {
        let mut state = self.state.lock().map_err(poisoned)?;
        if let Some(msg) = &state.failure {
            return Err(CoreError::Database(msg.clone()));
        }
        match state.queued_gets.pop_front() {
            Some(users) => Ok(users),
            None => Ok(state.stored.clone()),
        }
    }

    fn set_users(&self, users: Vec<User>, on_complete: Completion<'_>) -> Result<(), CoreError> {
        let delivered = {
            let mut state = self.state.lock().map_err(poisoned)?;
            if let Some(msg) = &state.failure {
                return Err(CoreError::Database(msg.clone()));
            }
            state.writes.push(users.clone());
            state.stored.clone_from(&users);
            state.yields.clone().unwrap_or(users)
        };
        on_complete(&delivered);
        Ok(())
    }
}
