//! ChatflowProvider trait definition.
//!
//! This is the port through which the chat service reaches the external
//! chatflow execution engine. Uses native async fn in traits (RPITIT, Rust
//! 2024 edition). The concrete implementation lives in parley-infra
//! (`FlowiseClient`).

use parley_types::chatflow::{ChatflowSummary, PredictionInput};
use parley_types::error::ChatflowError;

/// Trait for chatflow engine backends.
///
/// `predict` returns the engine's reply as raw JSON: the engine's response
/// contract is unspecified, so shape interpretation is left to the
/// normalizer rather than baked into the transport.
pub trait ChatflowProvider: Send + Sync {
    /// Human-readable backend name (e.g., "flowise").
    fn name(&self) -> &str;

    /// Run one prediction against the given chatflow.
    fn predict(
        &self,
        chatflow_id: &str,
        input: &PredictionInput,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, ChatflowError>> + Send;

    /// List the chatflows the engine exposes.
    fn list_chatflows(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatflowSummary>, ChatflowError>> + Send;
}
