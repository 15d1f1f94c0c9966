//! Designer service for orchestrating AI design conversations.
//!
//! This service handles the complete flow of:
//! 1. Creating sessions from a design brief
//! 2. Saving user messages
//! 3. Building the designer prompt from session context and history
//! 4. Calling the generation backends
//! 5. Persisting generated images to object storage
//! 6. Saving assistant responses and touching session recency

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use aurelia_core::{
    DesignSessionId, DesignStyle, DiamondOption, JewelryCategory, MessageSender, MetalType, UserId,
};

use crate::db::{MessageRepository, NewDesignSession, RepositoryError, SessionRepository};
use crate::lifecycle;
use crate::models::{DesignMessage, DesignSession};
use crate::openai::{ChatTurn, OpenAiClient};
use crate::storage::StorageClient;

/// Fixed assistant reply used when the text backend fails. The turn still
/// completes and both message rows are persisted.
const FALLBACK_REPLY: &str =
    "I apologize, but I encountered an error while generating a response. Please try again.";

/// Errors that can occur in the designer service.
///
/// Generation-backend and storage failures never appear here: a turn degrades
/// (fallback text, missing image) instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum DesignerError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session absent or not owned by the requesting customer. The two cases
    /// are deliberately indistinguishable.
    #[error("session not found")]
    SessionNotFound,

    /// The customer already has the maximum number of favorited sessions.
    #[error("favorite limit exceeded")]
    FavoriteLimitExceeded,
}

/// A validated design brief for starting a session.
#[derive(Debug, Clone)]
pub struct DesignBrief {
    pub category: JewelryCategory,
    pub metal_type: MetalType,
    pub style: DesignStyle,
    pub diamond_type: DiamondOption,
    pub description: String,
    pub reference_image_url: Option<String>,
    pub is_favorite: bool,
}

/// One turn of conversation to execute.
#[derive(Debug, Clone)]
pub struct SendTurn {
    pub session_id: DesignSessionId,
    pub user_id: UserId,
    pub message: String,
    pub reference_image_url: Option<String>,
    /// True for the automatic first turn right after session creation; the
    /// designer persona then responds to the full brief rather than a
    /// follow-up question.
    pub is_initial: bool,
}

/// The assistant's side of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub message: String,
    pub image_url: Option<String>,
}

/// Designer service for orchestrating AI design conversations.
pub struct DesignerService<'a> {
    pool: &'a PgPool,
    openai: &'a OpenAiClient,
    storage: &'a StorageClient,
}

impl<'a> DesignerService<'a> {
    /// Create a new designer service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        openai: &'a OpenAiClient,
        storage: &'a StorageClient,
    ) -> Self {
        Self {
            pool,
            openai,
            storage,
        }
    }

    /// Create a new design session from a brief.
    ///
    /// A non-favorited session gets the standard TTL; a brief that requests
    /// immediate favorite status is subject to the per-customer cap.
    ///
    /// # Errors
    ///
    /// Returns `FavoriteLimitExceeded` if immediate favorite status was
    /// requested and the cap is reached, or a database error.
    #[instrument(skip(self, brief), fields(user_id = %user_id))]
    pub async fn start_session(
        &self,
        user_id: UserId,
        brief: DesignBrief,
    ) -> Result<DesignSession, DesignerError> {
        let now = Utc::now();
        let repo = SessionRepository::new(self.pool);

        let title = lifecycle::derived_title(brief.category, brief.metal_type, brief.style);
        let expires_at = if brief.is_favorite {
            None
        } else {
            Some(lifecycle::initial_expiration(now))
        };

        let session = repo
            .create(NewDesignSession {
                user_id,
                category: brief.category,
                metal_type: brief.metal_type,
                style: brief.style,
                diamond_type: brief.diamond_type,
                description: brief.description,
                reference_image_url: brief.reference_image_url,
                title,
                is_favorite: brief.is_favorite,
                expires_at,
            })
            .await?
            .ok_or(DesignerError::FavoriteLimitExceeded)?;

        info!(session_id = %session.id, "Design session created");
        Ok(session)
    }

    /// List a customer's sessions, most recent activity first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_sessions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DesignSession>, DesignerError> {
        let repo = SessionRepository::new(self.pool);
        Ok(repo.list_for_user(user_id).await?)
    }

    /// Get a session and its conversation, scoped by owner.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if absent or not owned, or a database error.
    pub async fn get_session(
        &self,
        session_id: DesignSessionId,
        user_id: UserId,
    ) -> Result<(DesignSession, Vec<DesignMessage>), DesignerError> {
        let sessions = SessionRepository::new(self.pool);
        let messages = MessageRepository::new(self.pool);

        let session = sessions
            .get_owned(session_id, user_id)
            .await?
            .ok_or(DesignerError::SessionNotFound)?;

        let history = messages.list_for_session(session_id).await?;

        Ok((session, history))
    }

    /// Toggle a session's favorite flag, returning the new state.
    ///
    /// Favoriting clears the expiration and is capped per customer; the cap
    /// check and the write are a single conditional UPDATE so concurrent
    /// toggles cannot exceed it. Unfavoriting restarts the TTL.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if absent or not owned,
    /// `FavoriteLimitExceeded` when the cap blocks favoriting, or a database
    /// error. On `FavoriteLimitExceeded` the session is unchanged.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn toggle_favorite(
        &self,
        session_id: DesignSessionId,
        user_id: UserId,
    ) -> Result<bool, DesignerError> {
        let repo = SessionRepository::new(self.pool);

        let session = repo
            .get_owned(session_id, user_id)
            .await?
            .ok_or(DesignerError::SessionNotFound)?;

        if session.is_favorite {
            repo.unmark_favorite(session_id, user_id, lifecycle::initial_expiration(Utc::now()))
                .await?;
            Ok(false)
        } else {
            let marked = repo.mark_favorite(session_id, user_id).await?;
            if !marked {
                // Existence was just established, so zero rows means the cap.
                return Err(DesignerError::FavoriteLimitExceeded);
            }
            Ok(true)
        }
    }

    /// Delete a session and its conversation, scoped by owner.
    ///
    /// Messages are removed before the session row so the foreign-key
    /// relationship holds even without a database-level cascade.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if absent or not owned, or a database error.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn delete_session(
        &self,
        session_id: DesignSessionId,
        user_id: UserId,
    ) -> Result<(), DesignerError> {
        let sessions = SessionRepository::new(self.pool);
        let messages = MessageRepository::new(self.pool);

        sessions
            .get_owned(session_id, user_id)
            .await?
            .ok_or(DesignerError::SessionNotFound)?;

        messages.delete_for_session(session_id).await?;
        sessions.delete_owned(session_id, user_id).await?;

        Ok(())
    }

    /// Execute one turn of conversation.
    ///
    /// After the user message is persisted the turn always completes: a text
    /// backend failure substitutes a fixed apology, an image backend or
    /// storage failure drops the image. Exactly two message rows (user +
    /// assistant) are appended per turn. Steps commit individually; the
    /// history is append-only, so a crash mid-turn leaves a prefix, never
    /// corruption.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if absent or not owned, or a database error.
    #[instrument(skip(self, turn), fields(session_id = %turn.session_id))]
    pub async fn send_message(&self, turn: SendTurn) -> Result<TurnReply, DesignerError> {
        let sessions = SessionRepository::new(self.pool);
        let messages = MessageRepository::new(self.pool);

        // Verify ownership before any write.
        let session = sessions
            .get_owned(turn.session_id, turn.user_id)
            .await?
            .ok_or(DesignerError::SessionNotFound)?;

        // Persist the incoming user message verbatim.
        messages
            .add(
                turn.session_id,
                MessageSender::User,
                &turn.message,
                turn.reference_image_url.as_deref(),
            )
            .await?;

        // Replay the full history (includes the message just saved).
        let history = messages.list_for_session(turn.session_id).await?;
        let turns = conversation_turns(&session, turn.is_initial, &history);

        let reply_body = match self.openai.complete_chat(turns).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Text generation failed, sending fallback reply");
                FALLBACK_REPLY.to_string()
            }
        };

        let image_url = self.generate_design_image(&session).await;

        let assistant = messages
            .add(
                turn.session_id,
                MessageSender::Assistant,
                &reply_body,
                image_url.as_deref(),
            )
            .await?;

        sessions
            .touch_last_message(turn.session_id, Utc::now())
            .await?;

        info!(
            message_id = %assistant.id,
            has_image = image_url.is_some(),
            "Design turn completed"
        );

        Ok(TurnReply {
            message: reply_body,
            image_url,
        })
    }

    /// Generate a concept image for the session and persist it to storage.
    ///
    /// Returns `None` on any failure; the turn proceeds without an image.
    async fn generate_design_image(&self, session: &DesignSession) -> Option<String> {
        let prompt = image_prompt(session);

        let transient_url = match self.openai.generate_image(&prompt).await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Image generation failed, continuing without image");
                return None;
            }
        };

        let bytes = match self.storage.fetch_transient(&transient_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Generated image fetch failed, continuing without image");
                return None;
            }
        };

        let path = format!(
            "{}/{}/{}.png",
            session.user_id,
            session.id,
            Uuid::new_v4()
        );

        match self.storage.upload_png(&path, bytes).await {
            Ok(public_url) => Some(public_url),
            Err(e) => {
                warn!(error = %e, "Generated image upload failed, continuing without image");
                None
            }
        }
    }
}

// =============================================================================
// Prompt Construction
// =============================================================================

/// System instruction for the designer persona, parameterized by the
/// session's attributes.
fn system_prompt(session: &DesignSession, is_initial: bool) -> String {
    let mut prompt = format!(
        "You are an expert jewelry designer specializing in {} design.",
        session.category.as_str()
    );

    if is_initial {
        let diamonds = if session.diamond_type.has_diamonds() {
            format!("with {} diamonds", session.diamond_type.as_str())
        } else {
            "without diamonds".to_string()
        };
        prompt.push_str(&format!(
            "\nThe customer wants to design a {} {} in {} {}.\n\
             Provide a detailed response about how you would design this piece, including:\n\
             1. The overall aesthetic and inspiration\n\
             2. Materials and craftsmanship details\n\
             3. Specific design elements that would make this piece unique\n\
             4. A brief description of how it would look when worn\n\
             Be creative, detailed, and professional. Use terminology that shows your \
             expertise in jewelry design.",
            session.style.as_str(),
            session.category.as_str(),
            session.metal_type.as_str(),
            diamonds,
        ));
    } else {
        prompt.push_str(&format!(
            "\nRespond to the customer's message in the context of their {} design in {}.\n\
             Be helpful, creative, and provide specific design suggestions when appropriate.",
            session.category.as_str(),
            session.metal_type.as_str(),
        ));
    }

    prompt
}

/// Convert the stored conversation into generation-backend turns, system
/// instruction first, history oldest-first.
fn conversation_turns(
    session: &DesignSession,
    is_initial: bool,
    history: &[DesignMessage],
) -> Vec<ChatTurn> {
    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.push(ChatTurn::system(system_prompt(session, is_initial)));

    for message in history {
        let turn = match message.sender {
            MessageSender::User => ChatTurn::user(message.body.clone()),
            MessageSender::Assistant => ChatTurn::assistant(message.body.clone()),
        };
        turns.push(turn);
    }

    turns
}

/// Image prompt derived from the session's attributes (not the running
/// conversation).
fn image_prompt(session: &DesignSession) -> String {
    let diamonds = if session.diamond_type.has_diamonds() {
        format!(" with {} diamonds", session.diamond_type.as_str())
    } else {
        String::new()
    };

    format!(
        "A professional, photorealistic image of a {} {} made of {}{}.",
        session.style.as_str(),
        session.category.as_str(),
        session.metal_type.as_str(),
        diamonds,
    )
}

#[cfg(test)]
mod tests {
    use aurelia_core::{DesignMessageId, SessionStatus};
    use chrono::Utc;

    use super::*;

    fn sample_session(diamond_type: DiamondOption) -> DesignSession {
        DesignSession {
            id: DesignSessionId::generate(),
            user_id: UserId::generate(),
            category: JewelryCategory::Ring,
            metal_type: MetalType::Gold,
            style: DesignStyle::Modern,
            diamond_type,
            description: "A simple modern gold band".to_string(),
            reference_image_url: None,
            title: "ring in gold (modern)".to_string(),
            status: SessionStatus::Active,
            is_favorite: false,
            expires_at: Some(Utc::now()),
            last_message_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    fn message(sender: MessageSender, body: &str, seq: i32) -> DesignMessage {
        DesignMessage {
            id: DesignMessageId::generate(),
            session_id: DesignSessionId::generate(),
            sender,
            body: body.to_string(),
            image_url: None,
            seq,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_system_prompt_mentions_category() {
        let prompt = system_prompt(&sample_session(DiamondOption::None), false);
        assert!(prompt.contains("expert jewelry designer"));
        assert!(prompt.contains("ring"));
    }

    #[test]
    fn test_initial_system_prompt_describes_full_brief() {
        let prompt = system_prompt(&sample_session(DiamondOption::Small), true);
        assert!(prompt.contains("modern ring in gold"));
        assert!(prompt.contains("with small diamonds"));
        assert!(prompt.contains("aesthetic and inspiration"));
    }

    #[test]
    fn test_initial_system_prompt_without_diamonds() {
        let prompt = system_prompt(&sample_session(DiamondOption::None), true);
        assert!(prompt.contains("without diamonds"));
    }

    #[test]
    fn test_conversation_turns_start_with_system_and_replay_in_order() {
        let session = sample_session(DiamondOption::None);
        let history = vec![
            message(MessageSender::User, "Make it wider", 1),
            message(MessageSender::Assistant, "A wider band suits this", 2),
            message(MessageSender::User, "And engraved", 3),
        ];

        let turns = conversation_turns(&session, false, &history);

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, "system");
        assert_eq!(turns[1].role, "user");
        assert_eq!(turns[1].content, "Make it wider");
        assert_eq!(turns[2].role, "assistant");
        assert_eq!(turns[3].content, "And engraved");
    }

    #[test]
    fn test_image_prompt_with_diamonds() {
        let prompt = image_prompt(&sample_session(DiamondOption::Multiple));
        assert_eq!(
            prompt,
            "A professional, photorealistic image of a modern ring made of gold with multiple diamonds."
        );
    }

    #[test]
    fn test_image_prompt_without_diamonds() {
        let prompt = image_prompt(&sample_session(DiamondOption::None));
        assert_eq!(
            prompt,
            "A professional, photorealistic image of a modern ring made of gold."
        );
    }

    #[test]
    fn test_fallback_reply_is_nonempty() {
        assert!(!FALLBACK_REPLY.is_empty());
    }
}
