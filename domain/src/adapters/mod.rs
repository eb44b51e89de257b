//! Adapters that live inside the domain crate for convenience.
//!
//! `memory_db` is the only database the registry ships with. `doubles` holds
//! the spy and stub databases the store tests are written against.

pub mod doubles;
pub mod memory_db;
