//! Chatflow engine types for Parley.
//!
//! These types model the data exchanged with the external chatflow
//! execution engine: the prediction input handed to the client adapter and
//! the reshaped chatflow listing returned to API consumers. The engine's
//! actual wire shapes live in `parley-infra`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input for one prediction call against a chatflow.
///
/// Built by the chat service from the user's prompt and the derived session
/// token; translated to the engine's wire shape by the infra adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionInput {
    pub question: String,
    /// Session token routing repeated calls to the same inference context.
    pub session_id: Uuid,
    /// Image sources as base64 data URIs or plain URLs, in upload order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl PredictionInput {
    pub fn new(question: impl Into<String>, session_id: Uuid) -> Self {
        Self {
            question: question.into(),
            session_id,
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

/// A chatflow as exposed by this service's listing endpoint.
///
/// Reshaped from the engine's listing: `description` defaults to empty,
/// `category` to "General", and every flow the service returns is callable,
/// so `deployed` is reported as true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatflowSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub deployed: bool,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "General".to_string()
}
