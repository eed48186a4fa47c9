//! Chat service orchestrating the send pathway and chat CRUD.
//!
//! ChatService coordinates the ChatRepository and the ChatflowProvider:
//! validating a send, deriving the session token, calling the engine,
//! normalizing the reply, persisting the user/assistant message pair, and
//! applying one-time auto-naming.

use chrono::Utc;
use parley_types::chat::{Chat, ChatMessage, ImageAttachment, MessageRole};
use parley_types::chatflow::{ChatflowSummary, PredictionInput};
use parley_types::config::NamingConfig;
use parley_types::error::{ChatError, RepositoryError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::naming::{derive_chat_name, should_auto_name};
use crate::chat::repository::ChatRepository;
use crate::chat::session::derive_session_id;
use crate::chatflow::normalize::normalize_reply;
use crate::chatflow::provider::ChatflowProvider;

/// Behavior knobs the service needs from the application config.
#[derive(Debug, Clone, Default)]
pub struct ChatServiceConfig {
    pub naming: NamingConfig,
    pub session_namespace: String,
    /// Flow used when neither the request nor the chat names one.
    pub default_chatflow_id: Option<String>,
    /// Flow ids exposed by the listing; empty means all.
    pub allowed_chatflow_ids: Vec<String>,
}

/// One inbound send, already parsed from the transport layer.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub chat_id: Uuid,
    pub prompt: String,
    /// Image sources (data URIs or URLs), in upload order.
    pub images: Vec<String>,
    /// Per-request chatflow override.
    pub chatflow_id: Option<String>,
}

/// Result of a successful send.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub user: ChatMessage,
    pub assistant: ChatMessage,
    /// New chat name, present only when auto-naming fired on this send.
    pub chat_name: Option<String>,
}

/// Orchestrates chat lifecycle, message persistence, and prediction calls.
///
/// Generic over `ChatRepository` and `ChatflowProvider` to maintain clean
/// architecture (parley-core never depends on parley-infra).
pub struct ChatService<C: ChatRepository, P: ChatflowProvider> {
    chat_repo: C,
    chatflow: P,
    config: ChatServiceConfig,
}

impl<C: ChatRepository, P: ChatflowProvider> ChatService<C, P> {
    pub fn new(chat_repo: C, chatflow: P, config: ChatServiceConfig) -> Self {
        Self {
            chat_repo,
            chatflow,
            config,
        }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    // --- Chat lifecycle ---

    /// Create an empty chat with the default name.
    pub async fn create_chat(
        &self,
        user_id: &str,
        chatflow_id: Option<String>,
    ) -> Result<Chat, ChatError> {
        let now = Utc::now();
        let chat = Chat {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            name: self.config.naming.default_name.clone(),
            chatflow_id,
            created_at: now,
            updated_at: now,
        };
        Ok(self.chat_repo.create_chat(&chat).await?)
    }

    /// Get a chat by id, scoped to its owner.
    pub async fn get_chat(&self, user_id: &str, chat_id: &Uuid) -> Result<Chat, ChatError> {
        self.chat_repo
            .get_chat(user_id, chat_id)
            .await?
            .ok_or(ChatError::NotFound)
    }

    /// List a user's chats, most recently updated first.
    pub async fn list_chats(
        &self,
        user_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Chat>, ChatError> {
        Ok(self.chat_repo.list_chats(user_id, limit, offset).await?)
    }

    /// Get messages for a chat the user owns, oldest first.
    pub async fn get_messages(
        &self,
        user_id: &str,
        chat_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        // Ownership check first: a foreign chat id reads as missing.
        self.get_chat(user_id, chat_id).await?;
        Ok(self.chat_repo.get_messages(chat_id, None, None).await?)
    }

    /// Manually rename a chat. Also ends auto-naming eligibility.
    pub async fn rename_chat(
        &self,
        user_id: &str,
        chat_id: &Uuid,
        name: &str,
    ) -> Result<Chat, ChatError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatError::InvalidName("name must not be empty".to_string()));
        }
        let mut chat = self.get_chat(user_id, chat_id).await?;
        chat.name = name.to_string();
        chat.updated_at = Utc::now();
        self.chat_repo.update_chat(&chat).await?;
        info!(chat_id = %chat_id, "chat renamed");
        Ok(chat)
    }

    /// Update the chat's chatflow association.
    pub async fn set_chatflow(
        &self,
        user_id: &str,
        chat_id: &Uuid,
        chatflow_id: Option<String>,
    ) -> Result<Chat, ChatError> {
        let mut chat = self.get_chat(user_id, chat_id).await?;
        chat.chatflow_id = chatflow_id;
        chat.updated_at = Utc::now();
        self.chat_repo.update_chat(&chat).await?;
        Ok(chat)
    }

    /// Delete a chat and its messages.
    pub async fn delete_chat(&self, user_id: &str, chat_id: &Uuid) -> Result<(), ChatError> {
        match self.chat_repo.delete_chat(user_id, chat_id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ChatError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    // --- Send pathway ---

    /// Send one user prompt through the chat's flow and persist the exchange.
    ///
    /// Nothing is persisted until the engine call succeeds, so a failed
    /// send leaves the chat untouched and the client free to resend the
    /// same prompt. On success exactly two messages are appended, user
    /// first, and the chat is auto-named if this was its first user
    /// message and the name was still the default.
    pub async fn send_message(
        &self,
        user_id: &str,
        request: SendRequest,
    ) -> Result<SendOutcome, ChatError> {
        if request.prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let mut chat = self.get_chat(user_id, &request.chat_id).await?;

        let chatflow_id = request
            .chatflow_id
            .or_else(|| chat.chatflow_id.clone())
            .or_else(|| self.config.default_chatflow_id.clone())
            .ok_or(ChatError::MissingChatflow)?;

        let session_id = derive_session_id(&self.config.session_namespace, user_id, &chat.id);
        let input = PredictionInput::new(request.prompt.clone(), session_id)
            .with_images(request.images.clone());

        info!(
            chat_id = %chat.id,
            chatflow_id = %chatflow_id,
            images = request.images.len(),
            "sending prediction"
        );
        let raw = self.chatflow.predict(&chatflow_id, &input).await?;
        let content = normalize_reply(&raw);

        let prior_user_messages = self.chat_repo.count_user_messages(&chat.id).await?;

        let user_message = ChatMessage {
            id: Uuid::now_v7(),
            chat_id: chat.id,
            role: MessageRole::User,
            content: request.prompt,
            created_at: Utc::now(),
            images: attachments_from(&request.images),
        };
        self.chat_repo.save_message(&user_message).await?;

        let assistant_message = ChatMessage {
            id: Uuid::now_v7(),
            chat_id: chat.id,
            role: MessageRole::Assistant,
            content,
            created_at: Utc::now(),
            images: None,
        };
        self.chat_repo.save_message(&assistant_message).await?;

        let chat_name = if should_auto_name(
            &chat.name,
            &self.config.naming.default_name,
            prior_user_messages,
        ) {
            let name = derive_chat_name(&user_message.content, self.config.naming.max_chars);
            info!(chat_id = %chat.id, name = %name, "chat auto-named");
            chat.name = name.clone();
            Some(name)
        } else {
            None
        };
        chat.updated_at = Utc::now();
        if let Err(e) = self.chat_repo.update_chat(&chat).await {
            // The exchange is already stored; a stale name is recoverable.
            warn!(chat_id = %chat.id, error = %e, "failed to update chat after send");
        }

        Ok(SendOutcome {
            user: user_message,
            assistant: assistant_message,
            chat_name,
        })
    }

    // --- Chatflow listing ---

    /// List chatflows from the engine, filtered by the configured allow-list.
    pub async fn list_chatflows(&self) -> Result<Vec<ChatflowSummary>, ChatError> {
        let flows = self.chatflow.list_chatflows().await?;
        if self.config.allowed_chatflow_ids.is_empty() {
            return Ok(flows);
        }
        Ok(flows
            .into_iter()
            .filter(|f| self.config.allowed_chatflow_ids.contains(&f.id))
            .collect())
    }
}

fn attachments_from(images: &[String]) -> Option<Vec<ImageAttachment>> {
    if images.is_empty() {
        return None;
    }
    Some(
        images
            .iter()
            .enumerate()
            .map(|(i, url)| ImageAttachment {
                name: format!("Image {}", i + 1),
                url: url.clone(),
            })
            .collect(),
    )
}
