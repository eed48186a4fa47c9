//! Deterministic session token derivation.
//!
//! Every (user, chat) pair maps to one stable session token so that
//! repeated prediction calls for the same conversation land in the same
//! inference-side context. The token is a standard UUID v5 over a
//! namespace derived from a configurable secret and the seed
//! `"{user_id}:{chat_id}"` -- recomputed identically on every call, never
//! persisted, and independent of wall-clock time.

use uuid::Uuid;

/// Derive the session token for a (user, chat) pair.
///
/// The namespace secret is first folded into a namespace UUID, then the
/// seed is hashed under it. Malformed inputs are not an error: they simply
/// produce a token that matches no existing session, so the engine starts
/// a fresh context.
pub fn derive_session_id(namespace: &str, user_id: &str, chat_id: &Uuid) -> Uuid {
    let ns = Uuid::new_v5(&Uuid::NAMESPACE_OID, namespace.as_bytes());
    Uuid::new_v5(&ns, format!("{user_id}:{chat_id}").as_bytes())
}
