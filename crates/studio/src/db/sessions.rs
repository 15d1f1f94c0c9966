//! Database operations for design sessions.
//!
//! Every session read and write is scoped by `(id, user_id)` so a customer
//! can never observe or mutate another customer's sessions. Absent and
//! not-owned are indistinguishable to callers.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use aurelia_core::{
    DesignSessionId, DesignStyle, DiamondOption, JewelryCategory, MetalType, UserId,
};

use super::RepositoryError;
use crate::lifecycle::MAX_FAVORITES;
use crate::models::DesignSession;

/// Parameters for creating a design session.
#[derive(Debug, Clone)]
pub struct NewDesignSession {
    pub user_id: UserId,
    pub category: JewelryCategory,
    pub metal_type: MetalType,
    pub style: DesignStyle,
    pub diamond_type: DiamondOption,
    pub description: String,
    pub reference_image_url: Option<String>,
    pub title: String,
    pub is_favorite: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Repository for design session database operations.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new design session.
    ///
    /// When `is_favorite` is requested the insert is guarded by the per-user
    /// favorite cap in the same statement; `None` means the cap was hit and
    /// nothing was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        params: NewDesignSession,
    ) -> Result<Option<DesignSession>, RepositoryError> {
        let session = sqlx::query_as::<_, DesignSession>(
            r"
            INSERT INTO design_sessions
                (user_id, category, metal_type, style, diamond_type, description,
                 reference_image_url, title, is_favorite, expires_at)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
            WHERE NOT $9
               OR (SELECT COUNT(*) FROM design_sessions
                   WHERE user_id = $1 AND is_favorite = TRUE) < $11
            RETURNING *
            ",
        )
        .bind(params.user_id)
        .bind(params.category)
        .bind(params.metal_type)
        .bind(params.style)
        .bind(params.diamond_type)
        .bind(&params.description)
        .bind(&params.reference_image_url)
        .bind(&params.title)
        .bind(params.is_favorite)
        .bind(params.expires_at)
        .bind(MAX_FAVORITES)
        .fetch_optional(self.pool)
        .await?;

        Ok(session)
    }

    /// Get a session scoped by owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        id: DesignSessionId,
        user_id: UserId,
    ) -> Result<Option<DesignSession>, RepositoryError> {
        let session = sqlx::query_as::<_, DesignSession>(
            r"
            SELECT * FROM design_sessions
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(session)
    }

    /// List a customer's sessions, most recent activity first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DesignSession>, RepositoryError> {
        let sessions = sqlx::query_as::<_, DesignSession>(
            r"
            SELECT * FROM design_sessions
            WHERE user_id = $1
            ORDER BY last_message_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(sessions)
    }

    /// Count a customer's favorited sessions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_favorites(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM design_sessions
            WHERE user_id = $1 AND is_favorite = TRUE
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Mark a session as favorite and clear its expiration.
    ///
    /// The per-user favorite cap is part of the UPDATE's WHERE clause, so the
    /// check and the write are a single statement and no interleaving of
    /// concurrent toggles can exceed the cap. Returns `false` when no row was
    /// updated (cap hit, already favorited, or not owned — the caller has
    /// already established existence).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_favorite(
        &self,
        id: DesignSessionId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE design_sessions
            SET is_favorite = TRUE, expires_at = NULL
            WHERE id = $1 AND user_id = $2 AND is_favorite = FALSE
              AND (SELECT COUNT(*) FROM design_sessions
                   WHERE user_id = $2 AND is_favorite = TRUE) < $3
            ",
        )
        .bind(id)
        .bind(user_id)
        .bind(MAX_FAVORITES)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Unmark a session as favorite and restore its expiration.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unmark_favorite(
        &self,
        id: DesignSessionId,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE design_sessions
            SET is_favorite = FALSE, expires_at = $3
            WHERE id = $1 AND user_id = $2 AND is_favorite = TRUE
            ",
        )
        .bind(id)
        .bind(user_id)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record conversation activity on a session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn touch_last_message(
        &self,
        id: DesignSessionId,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE design_sessions
            SET last_message_at = $2
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete a session scoped by owner.
    ///
    /// Returns `true` if the session was deleted, `false` if it didn't exist
    /// or was not owned. The caller must delete the session's messages first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_owned(
        &self,
        id: DesignSessionId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM design_sessions
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Select the ids of all expired, non-favorited sessions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<DesignSessionId>, RepositoryError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r"
            SELECT id FROM design_sessions
            WHERE is_favorite = FALSE AND expires_at < $1
            ",
        )
        .bind(now)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(DesignSessionId::new).collect())
    }

    /// Delete sessions by id. Used by the expiry sweeper after the sessions'
    /// messages have been removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_ids(&self, ids: &[DesignSessionId]) -> Result<u64, RepositoryError> {
        let raw: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();

        let result = sqlx::query(
            r"
            DELETE FROM design_sessions
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
