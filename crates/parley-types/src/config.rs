//! Configuration types for Parley.
//!
//! `AppConfig` represents the top-level `config.toml` read from the data
//! directory. All fields have sensible defaults so the service starts with
//! no config file at all; only the chatflow endpoint normally needs to be
//! set for real deployments.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Parley service.
///
/// Loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chatflow: ChatflowConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Bind address for the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Connection settings for the external chatflow engine.
///
/// The API key is deliberately not part of this struct; it is resolved from
/// the `PARLEY_CHATFLOW_API_KEY` environment variable so it never lands in
/// a config file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatflowConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Flow used when neither the chat nor the request names one.
    #[serde(default)]
    pub default_chatflow_id: Option<String>,
    /// Flow ids exposed by the listing endpoint; empty means all.
    #[serde(default)]
    pub allowed_ids: Vec<String>,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ChatflowConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_chatflow_id: None,
            allowed_ids: Vec::new(),
        }
    }
}

/// Auto-naming behavior for new chats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Name given to freshly created chats; chats still carrying it are
    /// eligible for one-time auto-naming.
    #[serde(default = "default_chat_name")]
    pub default_name: String,
    /// Character budget for the derived name, before the ellipsis marker.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_chat_name() -> String {
    "New Chat".to_string()
}

fn default_max_chars() -> usize {
    50
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            default_name: default_chat_name(),
            max_chars: default_max_chars(),
        }
    }
}

/// Session token derivation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Namespace secret mixed into every derived session token. Changing it
    /// rotates all inference-side contexts at once.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "parley-session-v1".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.naming.default_name, "New Chat");
        assert_eq!(config.naming.max_chars, 50);
        assert!(config.chatflow.default_chatflow_id.is_none());
        assert!(config.chatflow.allowed_ids.is_empty());
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.namespace, "parley-session-v1");
    }

    #[test]
    fn test_app_config_deserialize_partial() {
        let config: AppConfig = toml::from_str(
            r#"
[server]
port = 9090

[chatflow]
base_url = "https://flows.internal"
default_chatflow_id = "467dc088-1ac6-4301-a19e-401c393898f9"
allowed_ids = ["467dc088-1ac6-4301-a19e-401c393898f9"]

[naming]
max_chars = 32
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.chatflow.base_url, "https://flows.internal");
        assert_eq!(config.chatflow.allowed_ids.len(), 1);
        assert_eq!(config.naming.max_chars, 32);
        assert_eq!(config.naming.default_name, "New Chat");
    }
}
