use thiserror::Error;

/// Errors from the chat send pathway and chat CRUD operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat not found")]
    NotFound,

    #[error("prompt is required")]
    EmptyPrompt,

    #[error("invalid chat name: {0}")]
    InvalidName(String),

    #[error("no chatflow configured for this chat")]
    MissingChatflow,

    #[error("chatflow error: {0}")]
    Chatflow(#[from] ChatflowError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors from the external chatflow engine.
#[derive(Debug, Error)]
pub enum ChatflowError {
    #[error("chatflow engine returned HTTP {status} {status_text}: {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chatflow_error_display_carries_status() {
        let err = ChatflowError::Http {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            body: "upstream drained".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("503"));
        assert!(s.contains("Service Unavailable"));
        assert!(s.contains("upstream drained"));
    }

    #[test]
    fn test_chat_error_from_chatflow() {
        let err: ChatError = ChatflowError::Transport("connection refused".to_string()).into();
        assert!(matches!(err, ChatError::Chatflow(_)));
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
