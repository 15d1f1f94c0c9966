//! Database operations for design conversation messages.

use sqlx::PgPool;
use uuid::Uuid;

use aurelia_core::{DesignSessionId, MessageSender};

use super::RepositoryError;
use crate::models::DesignMessage;

/// Repository for conversation message database operations.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a message to a session's conversation.
    ///
    /// The per-session `seq` is assigned inside the INSERT, so replay order
    /// is deterministic even when two messages land within the same
    /// timestamp resolution.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add(
        &self,
        session_id: DesignSessionId,
        sender: MessageSender,
        body: &str,
        image_url: Option<&str>,
    ) -> Result<DesignMessage, RepositoryError> {
        let message = sqlx::query_as::<_, DesignMessage>(
            r"
            INSERT INTO design_messages (session_id, sender, body, image_url, seq)
            VALUES ($1, $2, $3, $4,
                    (SELECT COALESCE(MAX(seq), 0) + 1
                     FROM design_messages WHERE session_id = $1))
            RETURNING *
            ",
        )
        .bind(session_id)
        .bind(sender)
        .bind(body)
        .bind(image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(message)
    }

    /// Get all messages for a session in replay order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_session(
        &self,
        session_id: DesignSessionId,
    ) -> Result<Vec<DesignMessage>, RepositoryError> {
        let messages = sqlx::query_as::<_, DesignMessage>(
            r"
            SELECT * FROM design_messages
            WHERE session_id = $1
            ORDER BY seq ASC
            ",
        )
        .bind(session_id)
        .fetch_all(self.pool)
        .await?;

        Ok(messages)
    }

    /// Delete all messages belonging to a single session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_for_session(
        &self,
        session_id: DesignSessionId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM design_messages
            WHERE session_id = $1
            ",
        )
        .bind(session_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete all messages belonging to any of the given sessions.
    ///
    /// Used by the expiry sweeper: messages go first so the foreign-key
    /// relationship holds even without a database-level cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_for_sessions(
        &self,
        session_ids: &[DesignSessionId],
    ) -> Result<u64, RepositoryError> {
        let raw: Vec<Uuid> = session_ids.iter().map(|id| id.as_uuid()).collect();

        let result = sqlx::query(
            r"
            DELETE FROM design_messages
            WHERE session_id = ANY($1)
            ",
        )
        .bind(&raw)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
