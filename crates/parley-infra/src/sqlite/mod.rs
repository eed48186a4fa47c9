//! SQLite persistence for Parley.

pub mod chat;
pub mod pool;
