//! Wire types for the Flowise prediction and listing APIs.
//!
//! The engine's request shape uses camelCase field names; these structs own
//! that translation so the rest of the codebase never sees it. Uploads are
//! classified here: a `data:` URI is sent inline as a file upload, anything
//! else is passed as a URL reference.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use parley_types::chatflow::{ChatflowSummary, PredictionInput};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/prediction/{chatflow_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionBody {
    pub question: String,
    #[serde(rename = "overrideConfig")]
    pub override_config: OverrideConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uploads: Vec<Upload>,
}

impl PredictionBody {
    /// Translate a domain prediction input into the engine's wire shape.
    pub fn from_input(input: &PredictionInput) -> Self {
        Self {
            question: input.question.clone(),
            override_config: OverrideConfig {
                session_id: input.session_id.to_string(),
            },
            uploads: input
                .images
                .iter()
                .enumerate()
                .map(|(i, source)| Upload::from_image_source(source, i))
                .collect(),
        }
    }
}

/// Per-request engine overrides. Only the session id is pinned.
#[derive(Debug, Clone, Serialize)]
pub struct OverrideConfig {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// How an upload's `data` field should be interpreted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    /// Inline payload (base64 data URI).
    File,
    /// Reference the engine fetches itself.
    Url,
}

/// One image upload entry.
#[derive(Debug, Clone, Serialize)]
pub struct Upload {
    pub data: String,
    #[serde(rename = "type")]
    pub kind: UploadKind,
    pub name: String,
    pub mime: String,
}

impl Upload {
    /// Classify an image source (data URI or URL) into an upload entry.
    ///
    /// `index` is zero-based; generated names are one-based.
    pub fn from_image_source(source: &str, index: usize) -> Self {
        let kind = if source.starts_with("data:") {
            UploadKind::File
        } else {
            UploadKind::Url
        };
        Self {
            data: source.to_string(),
            kind,
            name: format!("image_{}.png", index + 1),
            mime: sniff_mime(source),
        }
    }

    /// Whether an inline payload decodes as base64.
    ///
    /// URL uploads trivially pass; a data URI with a garbled payload would
    /// be rejected by the engine, so the client logs it before sending.
    pub fn payload_is_valid_base64(&self) -> bool {
        if self.kind != UploadKind::File {
            return true;
        }
        match self.data.split_once("base64,") {
            Some((_, payload)) => BASE64.decode(payload).is_ok(),
            None => false,
        }
    }
}

/// MIME type from a `data:image/...` prefix, defaulting to `image/png`.
fn sniff_mime(source: &str) -> String {
    if let Some(rest) = source.strip_prefix("data:image/")
        && let Some(end) = rest.find(';')
    {
        return format!("image/{}", &rest[..end]);
    }
    "image/png".to_string()
}

/// One chatflow as returned by `GET /api/v1/chatflows`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatflowListing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ChatflowListing {
    /// Reshape into the summary this service exposes.
    ///
    /// Every flow the engine lists is callable, so `deployed` is true.
    pub fn into_summary(self) -> ChatflowSummary {
        ChatflowSummary {
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            deployed: true,
            category: self.category.unwrap_or_else(|| "General".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_data_uri_classified_as_file() {
        let upload = Upload::from_image_source("data:image/png;base64,iVBORw0KGgo=", 0);
        assert_eq!(upload.kind, UploadKind::File);
        assert_eq!(upload.mime, "image/png");
        assert_eq!(upload.name, "image_1.png");
    }

    #[test]
    fn test_plain_url_classified_as_url_with_default_mime() {
        let upload = Upload::from_image_source("https://example.com/cat.jpg", 1);
        assert_eq!(upload.kind, UploadKind::Url);
        assert_eq!(upload.mime, "image/png");
        assert_eq!(upload.name, "image_2.png");
    }

    #[test]
    fn test_jpeg_data_uri_mime_sniffed() {
        let upload = Upload::from_image_source("data:image/jpeg;base64,/9j/4AAQ", 0);
        assert_eq!(upload.kind, UploadKind::File);
        assert_eq!(upload.mime, "image/jpeg");
    }

    #[test]
    fn test_non_image_data_uri_defaults_mime() {
        let upload = Upload::from_image_source("data:application/pdf;base64,JVBE", 0);
        assert_eq!(upload.kind, UploadKind::File);
        assert_eq!(upload.mime, "image/png");
    }

    #[test]
    fn test_payload_base64_validation() {
        let good = Upload::from_image_source("data:image/png;base64,aGVsbG8=", 0);
        assert!(good.payload_is_valid_base64());

        let bad = Upload::from_image_source("data:image/png;base64,not base64!!", 0);
        assert!(!bad.payload_is_valid_base64());

        let url = Upload::from_image_source("https://example.com/a.png", 0);
        assert!(url.payload_is_valid_base64());
    }

    #[test]
    fn test_prediction_body_wire_shape() {
        let input = PredictionInput::new("why is the sky blue?", Uuid::nil())
            .with_images(vec!["data:image/png;base64,AAAA".to_string()]);
        let body = PredictionBody::from_input(&input);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["question"], "why is the sky blue?");
        assert_eq!(
            json["overrideConfig"]["sessionId"],
            Uuid::nil().to_string()
        );
        assert_eq!(json["uploads"][0]["type"], "file");
        assert_eq!(json["uploads"][0]["mime"], "image/png");
    }

    #[test]
    fn test_prediction_body_omits_empty_uploads() {
        let input = PredictionInput::new("hi", Uuid::nil());
        let body = PredictionBody::from_input(&input);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("uploads").is_none());
    }

    #[test]
    fn test_listing_reshape_defaults() {
        let listing: ChatflowListing = serde_json::from_str(
            r#"{"id": "cf-1", "name": "Math", "deployed": false, "flowData": "{}"}"#,
        )
        .unwrap();
        let summary = listing.into_summary();
        assert_eq!(summary.description, "");
        assert_eq!(summary.category, "General");
        assert!(summary.deployed);
    }
}
