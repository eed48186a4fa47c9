//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `parley-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reads through the
//! reader pool and writes through the single-connection writer.
//!
//! Image attachments are stored as a JSON column on `chat_messages` --
//! messages are always read whole, so there is nothing to join against.

use chrono::{DateTime, Utc};
use parley_core::chat::repository::ChatRepository;
use parley_types::chat::{Chat, ChatMessage, ImageAttachment, MessageRole};
use parley_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatRow {
    id: String,
    user_id: String,
    name: String,
    chatflow_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            chatflow_id: row.try_get("chatflow_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat id: {e}")))?;
        Ok(Chat {
            id,
            user_id: self.user_id,
            name: self.name,
            chatflow_id: self.chatflow_id,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct ChatMessageRow {
    id: String,
    chat_id: String,
    role: String,
    content: String,
    images: Option<String>,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            images: row.try_get("images")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let chat_id = Uuid::parse_str(&self.chat_id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let images: Option<Vec<ImageAttachment>> = self
            .images
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid images json: {e}")))?;

        Ok(ChatMessage {
            id,
            chat_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
            images,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn images_json(images: &Option<Vec<ImageAttachment>>) -> Result<Option<String>, RepositoryError> {
    images
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| RepositoryError::Query(format!("failed to encode images: {e}")))
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_chat(&self, chat: &Chat) -> Result<Chat, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chats (id, user_id, name, chatflow_id, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(chat.id.to_string())
        .bind(&chat.user_id)
        .bind(&chat.name)
        .bind(&chat.chatflow_id)
        .bind(format_datetime(&chat.created_at))
        .bind(format_datetime(&chat.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(chat.clone())
    }

    async fn get_chat(
        &self,
        user_id: &str,
        chat_id: &Uuid,
    ) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ? AND user_id = ?")
            .bind(chat_id.to_string())
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let chat_row =
                    ChatRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn update_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE chats
               SET name = ?, chatflow_id = ?, updated_at = ?
               WHERE id = ? AND user_id = ?"#,
        )
        .bind(&chat.name)
        .bind(&chat.chatflow_id)
        .bind(format_datetime(&chat.updated_at))
        .bind(chat.id.to_string())
        .bind(&chat.user_id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_chats(
        &self,
        user_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Chat>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM chats WHERE user_id = ? ORDER BY updated_at DESC");

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            let chat_row =
                ChatRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            chats.push(chat_row.into_chat()?);
        }

        Ok(chats)
    }

    async fn delete_chat(&self, user_id: &str, chat_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ? AND user_id = ?")
            .bind(chat_id.to_string())
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_messages (id, chat_id, role, content, images, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.chat_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(images_json(&message.images)?)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_messages(
        &self,
        chat_id: &Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        // UUIDv7 ids are time-ordered, so `id` breaks created_at ties.
        let mut sql = String::from(
            "SELECT * FROM chat_messages WHERE chat_id = ? ORDER BY created_at ASC, id ASC",
        );

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let rows = sqlx::query(&sql)
            .bind(chat_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn count_user_messages(&self, chat_id: &Uuid) -> Result<u32, RepositoryError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as cnt FROM chat_messages WHERE chat_id = ? AND role = 'user'",
        )
        .bind(chat_id.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u32)
    }

    async fn count_chats(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chats")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn repo() -> (tempfile::TempDir, SqliteChatRepository) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteChatRepository::new(pool))
    }

    fn sample_chat(user_id: &str) -> Chat {
        let now = Utc::now();
        Chat {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            name: "New Chat".to_string(),
            chatflow_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_message(chat_id: Uuid, role: MessageRole, content: &str) -> ChatMessage {
        ChatMessage {
            id: Uuid::now_v7(),
            chat_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
            images: None,
        }
    }

    #[tokio::test]
    async fn test_chat_roundtrip() {
        let (_dir, repo) = repo().await;
        let chat = sample_chat("user_a");
        repo.create_chat(&chat).await.unwrap();

        let loaded = repo.get_chat("user_a", &chat.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "New Chat");
        assert_eq!(loaded.user_id, "user_a");
        assert!(loaded.chatflow_id.is_none());
    }

    #[tokio::test]
    async fn test_get_chat_is_user_scoped() {
        let (_dir, repo) = repo().await;
        let chat = sample_chat("user_a");
        repo.create_chat(&chat).await.unwrap();

        assert!(repo.get_chat("user_b", &chat.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_chat_persists_name_and_chatflow() {
        let (_dir, repo) = repo().await;
        let mut chat = sample_chat("user_a");
        repo.create_chat(&chat).await.unwrap();

        chat.name = "Quantum tunneling explained...".to_string();
        chat.chatflow_id = Some("flow-1".to_string());
        chat.updated_at = Utc::now();
        repo.update_chat(&chat).await.unwrap();

        let loaded = repo.get_chat("user_a", &chat.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Quantum tunneling explained...");
        assert_eq!(loaded.chatflow_id.as_deref(), Some("flow-1"));
    }

    #[tokio::test]
    async fn test_update_missing_chat_is_not_found() {
        let (_dir, repo) = repo().await;
        let chat = sample_chat("user_a");
        let err = repo.update_chat(&chat).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_chats_most_recent_first() {
        let (_dir, repo) = repo().await;
        let mut first = sample_chat("user_a");
        first.updated_at = Utc::now() - chrono::Duration::minutes(5);
        let second = sample_chat("user_a");
        repo.create_chat(&first).await.unwrap();
        repo.create_chat(&second).await.unwrap();
        repo.create_chat(&sample_chat("user_b")).await.unwrap();

        let chats = repo.list_chats("user_a", None, None).await.unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].id, second.id);
    }

    #[tokio::test]
    async fn test_messages_ordered_and_images_roundtrip() {
        let (_dir, repo) = repo().await;
        let chat = sample_chat("user_a");
        repo.create_chat(&chat).await.unwrap();

        let mut user_msg = sample_message(chat.id, MessageRole::User, "look");
        user_msg.images = Some(vec![ImageAttachment {
            name: "Image 1".to_string(),
            url: "data:image/png;base64,AAAA".to_string(),
        }]);
        repo.save_message(&user_msg).await.unwrap();
        repo.save_message(&sample_message(chat.id, MessageRole::Assistant, "a cat"))
            .await
            .unwrap();

        let messages = repo.get_messages(&chat.id, None, None).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].images.as_ref().unwrap()[0].name, "Image 1");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert!(messages[1].images.is_none());
    }

    #[tokio::test]
    async fn test_count_user_messages_ignores_assistant() {
        let (_dir, repo) = repo().await;
        let chat = sample_chat("user_a");
        repo.create_chat(&chat).await.unwrap();

        assert_eq!(repo.count_user_messages(&chat.id).await.unwrap(), 0);
        repo.save_message(&sample_message(chat.id, MessageRole::User, "hi"))
            .await
            .unwrap();
        repo.save_message(&sample_message(chat.id, MessageRole::Assistant, "hello"))
            .await
            .unwrap();
        assert_eq!(repo.count_user_messages(&chat.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_chat_cascades_messages() {
        let (_dir, repo) = repo().await;
        let chat = sample_chat("user_a");
        repo.create_chat(&chat).await.unwrap();
        repo.save_message(&sample_message(chat.id, MessageRole::User, "hi"))
            .await
            .unwrap();

        repo.delete_chat("user_a", &chat.id).await.unwrap();

        assert!(repo.get_chat("user_a", &chat.id).await.unwrap().is_none());
        assert_eq!(repo.count_messages().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_foreign_chat_is_not_found() {
        let (_dir, repo) = repo().await;
        let chat = sample_chat("user_a");
        repo.create_chat(&chat).await.unwrap();

        let err = repo.delete_chat("user_b", &chat.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert!(repo.get_chat("user_a", &chat.id).await.unwrap().is_some());
    }
}
