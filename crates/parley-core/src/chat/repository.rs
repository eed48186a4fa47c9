//! ChatRepository trait definition.
//!
//! Provides CRUD operations for chats and their messages. Implementations
//! live in parley-infra (e.g., `SqliteChatRepository`). Uses native async fn
//! in traits (RPITIT, Rust 2024 edition).
//!
//! Chat lookups are scoped to the owning user: a chat id belonging to a
//! different user behaves exactly like a missing chat.

use parley_types::chat::{Chat, ChatMessage};
use parley_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat and message persistence.
pub trait ChatRepository: Send + Sync {
    /// Create a new chat.
    fn create_chat(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Get a chat by id, scoped to its owner.
    fn get_chat(
        &self,
        user_id: &str,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Update an existing chat (name, chatflow association, updated_at).
    fn update_chat(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List a user's chats, most recently updated first.
    fn list_chats(
        &self,
        user_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Chat>, RepositoryError>> + Send;

    /// Delete a chat and its messages, scoped to its owner.
    fn delete_chat(
        &self,
        user_id: &str,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message to a chat.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get messages for a chat, ordered by created_at ASC.
    fn get_messages(
        &self,
        chat_id: &Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Number of user-authored messages in a chat (drives auto-naming).
    fn count_user_messages(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;

    /// Count chats across all users.
    fn count_chats(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count messages across all chats.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
