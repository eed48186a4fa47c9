//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley service:
//! Chat, ChatMessage, ChatflowSummary, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod chatflow;
pub mod config;
pub mod error;
