//! Chat domain logic: repository port, orchestration service, session
//! token derivation, and auto-naming.

pub mod naming;
pub mod repository;
pub mod service;
pub mod session;
