//! Infrastructure layer for Parley.
//!
//! Contains implementations of the ports defined in `parley-core`:
//! SQLite storage and the Flowise-compatible chatflow engine client, plus
//! the config.toml loader.

pub mod config;
pub mod flowise;
pub mod sqlite;
