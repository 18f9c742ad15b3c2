/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Application callback interface.
//!
//! This module defines the callback interface for handling FIX messages,
//! following the QuickFIX pattern with async support.

use async_trait::async_trait;
use rfqfix_core::error::MessageRejectError;
use rfqfix_session::SessionConfig;
use rfqfix_tagvalue::Message;

/// Session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId {
    /// BeginString (FIX version).
    pub begin_string: String,
    /// Sender CompID.
    pub sender_comp_id: String,
    /// Target CompID.
    pub target_comp_id: String,
    /// Optional sender sub ID.
    pub sender_sub_id: Option<String>,
    /// Optional target sub ID.
    pub target_sub_id: Option<String>,
}

impl SessionId {
    /// Creates a new session ID.
    #[must_use]
    pub fn new(
        begin_string: impl Into<String>,
        sender_comp_id: impl Into<String>,
        target_comp_id: impl Into<String>,
    ) -> Self {
        Self {
            begin_string: begin_string.into(),
            sender_comp_id: sender_comp_id.into(),
            target_comp_id: target_comp_id.into(),
            sender_sub_id: None,
            target_sub_id: None,
        }
    }

    /// Derives the session ID of a session configuration.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            begin_string: config.begin_string.clone(),
            sender_comp_id: config.sender_comp_id.to_string(),
            target_comp_id: config.target_comp_id.to_string(),
            sender_sub_id: config.sender_sub_id.clone(),
            target_sub_id: config.target_sub_id.clone(),
        }
    }

    /// Derives the session ID a message belongs to, seen from its receiver.
    ///
    /// The message's SenderCompID becomes our target and its TargetCompID
    /// our sender.
    #[must_use]
    pub fn from_inbound(message: &Message) -> Self {
        let field = |tag| message.header.get_str(tag).unwrap_or_default().to_string();
        Self {
            begin_string: field(8),
            sender_comp_id: field(56),
            target_comp_id: field(49),
            sender_sub_id: message.header.get_str(57).map(str::to_owned),
            target_sub_id: message.header.get_str(50).map(str::to_owned),
        }
    }

    /// Sets the sender sub ID.
    #[must_use]
    pub fn with_sender_sub_id(mut self, sub_id: impl Into<String>) -> Self {
        self.sender_sub_id = Some(sub_id.into());
        self
    }

    /// Sets the target sub ID.
    #[must_use]
    pub fn with_target_sub_id(mut self, sub_id: impl Into<String>) -> Self {
        self.target_sub_id = Some(sub_id.into());
        self
    }

    /// Returns the session ID as seen by the counterparty.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            begin_string: self.begin_string.clone(),
            sender_comp_id: self.target_comp_id.clone(),
            target_comp_id: self.sender_comp_id.clone(),
            sender_sub_id: self.target_sub_id.clone(),
            target_sub_id: self.sender_sub_id.clone(),
        }
    }

    /// Returns true if BeginString and both CompIDs match.
    #[must_use]
    pub fn same_comp_ids(&self, other: &Self) -> bool {
        self.begin_string == other.begin_string
            && self.sender_comp_id == other.sender_comp_id
            && self.target_comp_id == other.target_comp_id
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}->{}",
            self.begin_string, self.sender_comp_id, self.target_comp_id
        )
    }
}

/// Application callback interface for handling FIX messages.
///
/// Implement this trait to receive callbacks for session events
/// and message processing. The outbound hooks run synchronously while the
/// session stamps the message; the inbound hooks may await.
#[async_trait]
pub trait Application: Send + Sync {
    /// Called when a session starts on a new connection.
    ///
    /// # Arguments
    /// * `session_id` - The session identifier
    async fn on_create(&self, session_id: &SessionId);

    /// Called on successful logon.
    ///
    /// # Arguments
    /// * `session_id` - The session identifier
    async fn on_logon(&self, session_id: &SessionId);

    /// Called on logout or disconnect of a logged-on session.
    ///
    /// # Arguments
    /// * `session_id` - The session identifier
    async fn on_logout(&self, session_id: &SessionId);

    /// Called before sending an admin message.
    ///
    /// Allows modification of outgoing admin messages (Logon, Heartbeat, etc.).
    ///
    /// # Arguments
    /// * `message` - The message to be sent (mutable)
    /// * `session_id` - The session identifier
    fn to_admin(&self, _message: &mut Message, _session_id: &SessionId) {}

    /// Called for every inbound admin message the session has accepted.
    ///
    /// The Logon that completes the handshake arrives here before the
    /// session acts on it; rejecting it refuses the logon.
    ///
    /// # Returns
    /// `Ok(())` to accept, `Err(MessageRejectError)` to reject.
    #[allow(clippy::wrong_self_convention)]
    async fn from_admin(
        &self,
        message: &Message,
        session_id: &SessionId,
    ) -> Result<(), MessageRejectError>;

    /// Called before sending an application message.
    ///
    /// # Arguments
    /// * `message` - The message to be sent (mutable)
    /// * `session_id` - The session identifier
    fn to_app(&self, _message: &mut Message, _session_id: &SessionId) {}

    /// Called when an application message is received.
    ///
    /// # Returns
    /// `Ok(())` to accept, `Err(MessageRejectError)` to have the session
    /// answer with Reject or BusinessMessageReject.
    #[allow(clippy::wrong_self_convention)]
    async fn from_app(
        &self,
        message: &Message,
        session_id: &SessionId,
    ) -> Result<(), MessageRejectError>;
}

/// Default no-op application implementation.
#[derive(Debug, Default)]
pub struct NoOpApplication;

#[async_trait]
impl Application for NoOpApplication {
    async fn on_create(&self, _session_id: &SessionId) {}

    async fn on_logon(&self, _session_id: &SessionId) {}

    async fn on_logout(&self, _session_id: &SessionId) {}

    async fn from_admin(
        &self,
        _message: &Message,
        _session_id: &SessionId,
    ) -> Result<(), MessageRejectError> {
        Ok(())
    }

    async fn from_app(
        &self,
        _message: &Message,
        _session_id: &SessionId,
    ) -> Result<(), MessageRejectError> {
        Ok(())
    }
}
