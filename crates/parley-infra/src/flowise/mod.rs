//! Flowise-compatible chatflow engine client.

pub mod client;
pub mod types;

pub use client::FlowiseClient;
