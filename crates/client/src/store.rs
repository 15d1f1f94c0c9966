//! Session store: the single client-side source of truth for design sessions.
//!
//! The store holds the session list and the active conversation. Every
//! operation is one transport round trip followed by a local transition
//! applied only on success; a failed call leaves the state exactly as it
//! was. Operations are not debounced or serialized against each other --
//! callers issuing the same operation concurrently are responsible for
//! their own ordering.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use aurelia_core::{DesignSessionId, MessageSender};

use crate::api::{
    ApiError, ConversationMessage, DesignBrief, DesignSession, DesignerApi, TurnReply,
};

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure; the store state is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The operation needs an active conversation and none is open.
    #[error("no active session")]
    NoActiveSession,
}

/// The conversation currently open in the UI.
#[derive(Debug, Clone)]
pub struct ActiveConversation {
    /// The session being conversed in.
    pub session: DesignSession,
    /// Conversation history, oldest first. Turn results are appended as
    /// local echoes; the server rows replace them on the next open.
    pub messages: Vec<ConversationMessage>,
}

/// Client-side state container for the design studio.
pub struct SessionStore<A: DesignerApi> {
    api: A,
    sessions: Vec<DesignSession>,
    active: Option<ActiveConversation>,
}

impl<A: DesignerApi> SessionStore<A> {
    /// Create an empty store over the given transport.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self {
            api,
            sessions: Vec::new(),
            active: None,
        }
    }

    /// The session list, most recent activity first.
    #[must_use]
    pub fn sessions(&self) -> &[DesignSession] {
        &self.sessions
    }

    /// The active conversation, if one is open.
    #[must_use]
    pub const fn active(&self) -> Option<&ActiveConversation> {
        self.active.as_ref()
    }

    /// Reload the session list from the API.
    ///
    /// # Errors
    ///
    /// Returns a transport error; the list is unchanged on failure.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        let sessions = self.api.list_sessions().await?;
        self.sessions = sessions;
        Ok(())
    }

    /// Start a new design session and make it the active conversation.
    ///
    /// # Errors
    ///
    /// Returns a transport error (including the favorite-cap rejection);
    /// the store is unchanged on failure.
    pub async fn start_session(
        &mut self,
        brief: DesignBrief,
    ) -> Result<DesignSessionId, StoreError> {
        let session = self.api.start_session(&brief).await?;
        let id = session.id;

        self.sessions.insert(0, session.clone());
        self.active = Some(ActiveConversation {
            session,
            messages: Vec::new(),
        });

        Ok(id)
    }

    /// Open a session's conversation, replacing the active one.
    ///
    /// # Errors
    ///
    /// Returns a transport error; the previously active conversation (if
    /// any) stays open on failure.
    pub async fn open_session(&mut self, id: DesignSessionId) -> Result<(), StoreError> {
        let detail = self.api.get_session(id).await?;
        self.active = Some(ActiveConversation {
            session: detail.session,
            messages: detail.messages,
        });
        Ok(())
    }

    /// Send a message in the active conversation.
    ///
    /// The first message of a fresh conversation is flagged as the initial
    /// turn so the designer responds to the full brief. On success the user
    /// message and the assistant reply are appended as local echoes.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession` if no conversation is open, or a transport
    /// error; the conversation is unchanged on failure.
    pub async fn send_message(
        &mut self,
        message: &str,
        reference_image_url: Option<&str>,
    ) -> Result<(), StoreError> {
        let active = self.active.as_ref().ok_or(StoreError::NoActiveSession)?;
        let session_id = active.session.id;
        let is_initial = active.messages.is_empty();

        let reply = self
            .api
            .send_message(session_id, message, reference_image_url, is_initial)
            .await?;

        // Only mutate after the round trip succeeded.
        if let Some(active) = self.active.as_mut() {
            append_turn(active, message, reference_image_url, &reply);
            active.session.last_message_at = Utc::now();
        }

        Ok(())
    }

    /// Toggle a session's favorite flag, returning the new state.
    ///
    /// The local entry mirrors the new flag immediately; the recomputed
    /// expiration timestamp is server-side state and appears on the next
    /// [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns a transport error (including the favorite-cap rejection);
    /// the store is unchanged on failure.
    pub async fn toggle_favorite(&mut self, id: DesignSessionId) -> Result<bool, StoreError> {
        let is_favorite = self.api.toggle_favorite(id).await?;

        for session in &mut self.sessions {
            if session.id == id {
                session.is_favorite = is_favorite;
                session.expires_at = None;
            }
        }
        if let Some(active) = self.active.as_mut() {
            if active.session.id == id {
                active.session.is_favorite = is_favorite;
                active.session.expires_at = None;
            }
        }

        Ok(is_favorite)
    }

    /// Delete a session, closing its conversation if it was active.
    ///
    /// # Errors
    ///
    /// Returns a transport error; the store is unchanged on failure.
    pub async fn delete_session(&mut self, id: DesignSessionId) -> Result<(), StoreError> {
        self.api.delete_session(id).await?;

        self.sessions.retain(|session| session.id != id);
        if self
            .active
            .as_ref()
            .is_some_and(|active| active.session.id == id)
        {
            self.active = None;
        }

        Ok(())
    }
}

/// Append the user message and the assistant reply as local echo entries.
fn append_turn(
    active: &mut ActiveConversation,
    message: &str,
    reference_image_url: Option<&str>,
    reply: &TurnReply,
) {
    let next_seq = active.messages.last().map_or(1, |last| last.seq + 1);
    let now = Utc::now();

    active.messages.push(ConversationMessage {
        id: Uuid::new_v4(),
        sender: MessageSender::User,
        body: message.to_string(),
        image_url: reference_image_url.map(String::from),
        seq: next_seq,
        created_at: now,
    });
    active.messages.push(ConversationMessage {
        id: Uuid::new_v4(),
        sender: MessageSender::Assistant,
        body: reply.message.clone(),
        image_url: reply.image_url.clone(),
        seq: next_seq + 1,
        created_at: now,
    });
}
