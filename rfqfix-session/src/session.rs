/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Sans-IO FIX session driver.
//!
//! [`FixSession`] owns the protocol rules of one session: logon and logout
//! handshakes, heartbeats and TestRequests, sequence number checks, gap
//! detection and recovery through ResendRequest and SequenceReset. It never
//! touches a socket. Callers feed it inbound messages and timer ticks and
//! carry out the [`SessionAction`]s it returns.

use crate::config::SessionConfig;
use crate::heartbeat::{HeartbeatManager, generate_test_req_id};
use crate::sequence::{SeqCheck, SequenceManager};
use crate::state::{Active, Connecting, Disconnected, LogonSent, LogoutPending, Resending, Session};
use crate::tags;
use bytes::Bytes;
use rfqfix_core::error::{FixError, MessageRejectError, RejectReason, SessionError};
use rfqfix_core::message::MsgType;
use rfqfix_core::types::Timestamp;
use rfqfix_store::MessageStore;
use rfqfix_tagvalue::Message;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Hook applied to every outbound session-level message before it is stamped.
pub type AdminHook = Box<dyn Fn(&mut Message) + Send + Sync>;

/// Which side of the connection this session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Connects out and sends the first Logon.
    Initiator,
    /// Accepts connections and answers Logon.
    Acceptor,
}

/// Work the caller must carry out after feeding the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Write these bytes to the transport.
    Send(Bytes),
    /// Hand this message to the application.
    Deliver(Message),
    /// The logon handshake completed.
    LoggedOn,
    /// A logged-on session ended.
    LoggedOut,
    /// Close the transport.
    Disconnect(String),
}

#[derive(Debug)]
enum Lifecycle {
    Disconnected(Session<Disconnected>),
    Connecting(Session<Connecting>),
    LogonSent(Session<LogonSent>),
    Active(Session<Active>),
    Resending(Session<Resending>),
    LogoutPending(Session<LogoutPending>),
}

impl Lifecycle {
    fn name(&self) -> &'static str {
        match self {
            Self::Disconnected(s) => s.state_name(),
            Self::Connecting(s) => s.state_name(),
            Self::LogonSent(s) => s.state_name(),
            Self::Active(s) => s.state_name(),
            Self::Resending(s) => s.state_name(),
            Self::LogoutPending(s) => s.state_name(),
        }
    }

    fn is_logged_on(&self) -> bool {
        matches!(self, Self::Active(_) | Self::Resending(_))
    }

    fn disconnect(self) -> Self {
        Self::Disconnected(match self {
            Self::Disconnected(s) => s,
            Self::Connecting(s) => s.disconnect(),
            Self::LogonSent(s) => s.on_logon_reject(),
            Self::Active(s) => s.disconnect(),
            Self::Resending(s) => s.disconnect(),
            Self::LogoutPending(s) => s.on_logout_ack(),
        })
    }
}

/// Protocol driver for one FIX session.
pub struct FixSession {
    config: SessionConfig,
    role: Role,
    session_id: String,
    lifecycle: Lifecycle,
    sequences: SequenceManager,
    heartbeat: HeartbeatManager,
    store: Arc<dyn MessageStore>,
    /// Messages received ahead of a gap, keyed by MsgSeqNum.
    queue: BTreeMap<u64, Message>,
    sent_reset: bool,
    admin_hook: Option<AdminHook>,
}

impl fmt::Debug for FixSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixSession")
            .field("session_id", &self.session_id)
            .field("role", &self.role)
            .field("state", &self.lifecycle.name())
            .field("sequences", &self.sequences)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl FixSession {
    /// Creates a disconnected session whose sequence numbers come from `store`.
    #[must_use]
    pub fn new(config: SessionConfig, role: Role, store: Arc<dyn MessageStore>) -> Self {
        let session_id = format!(
            "{}:{}->{}",
            config.begin_string, config.sender_comp_id, config.target_comp_id
        );
        let sequences = SequenceManager::load(Arc::clone(&store));
        let heartbeat = HeartbeatManager::new(config.heartbeat_interval, Instant::now());
        Self {
            lifecycle: Lifecycle::Disconnected(Session::new(session_id.clone())),
            config,
            role,
            session_id,
            sequences,
            heartbeat,
            store,
            queue: BTreeMap::new(),
            sent_reset: false,
            admin_hook: None,
        }
    }

    /// Installs a hook run on outbound session-level messages.
    #[must_use]
    pub fn with_admin_hook(mut self, hook: AdminHook) -> Self {
        self.admin_hook = Some(hook);
        self
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the role of this session.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the session identifier used in logs.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the name of the current lifecycle state.
    #[must_use]
    pub fn state_name(&self) -> &'static str {
        self.lifecycle.name()
    }

    /// Returns true once the logon handshake completed and no logout started.
    #[must_use]
    pub fn is_logged_on(&self) -> bool {
        self.lifecycle.is_logged_on()
    }

    /// Returns true while the logon handshake is still outstanding.
    #[must_use]
    pub fn is_awaiting_logon(&self) -> bool {
        matches!(
            self.lifecycle,
            Lifecycle::Connecting(_) | Lifecycle::LogonSent(_)
        )
    }

    /// Returns the sequence number the next outbound message will carry.
    #[must_use]
    pub fn next_sender_seq(&self) -> u64 {
        self.sequences.next_sender().value()
    }

    /// Returns the sequence number expected on the next inbound message.
    #[must_use]
    pub fn next_target_seq(&self) -> u64 {
        self.sequences.next_target().value()
    }

    /// Returns the heartbeat interval in force.
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat.interval()
    }

    /// Marks the transport as connected.
    pub fn on_connect(&mut self, now: Instant) {
        if !matches!(self.lifecycle, Lifecycle::Disconnected(_)) {
            warn!(session = %self.session_id, state = self.state_name(), "connect on a live session");
            return;
        }
        self.transition(|l| match l {
            Lifecycle::Disconnected(s) => Lifecycle::Connecting(s.connect(now)),
            other => other,
        });
        self.heartbeat.reset(now);
        self.sent_reset = false;
        debug!(session = %self.session_id, "transport connected");
    }

    /// Sends the initiator Logon.
    ///
    /// # Errors
    /// `SessionError::InvalidState` unless this is an initiator in the
    /// Connecting state; store or encode failures otherwise.
    pub async fn logon(&mut self) -> Result<Vec<SessionAction>, FixError> {
        if self.role != Role::Initiator || !matches!(self.lifecycle, Lifecycle::Connecting(_)) {
            return Err(self.invalid_state("Connecting initiator"));
        }
        let reset = self.config.reset_on_logon;
        if reset {
            self.reset_sequences().await?;
            self.sent_reset = true;
        }
        let logon = self.logon_message(reset);
        let bytes = self.send_admin(logon).await?;
        let now = Instant::now();
        self.transition(|l| match l {
            Lifecycle::Connecting(s) => Lifecycle::LogonSent(s.send_logon(now)),
            other => other,
        });
        info!(session = %self.session_id, reset, "logon sent");
        Ok(vec![SessionAction::Send(bytes)])
    }

    /// Turns down an inbound Logon the application refused.
    ///
    /// Answers with a Logout carrying the refusal text and disconnects
    /// without completing the handshake.
    ///
    /// # Errors
    /// `SessionError::InvalidState` unless a Logon is awaited; store or
    /// encode failures.
    pub async fn refuse_logon(
        &mut self,
        err: &MessageRejectError,
    ) -> Result<Vec<SessionAction>, FixError> {
        if !self.is_awaiting_logon() {
            return Err(self.invalid_state("Connecting or LogonSent"));
        }
        let mut actions = Vec::new();
        let logout = self.logout_message(Some(err.text()));
        actions.push(SessionAction::Send(self.send_admin(logout).await?));
        warn!(session = %self.session_id, reason = %err, "logon refused");
        self.disconnect(format!("logon refused: {}", err.text()), &mut actions)
            .await?;
        Ok(actions)
    }

    /// Processes one inbound message.
    ///
    /// # Errors
    /// `SessionError::InvalidState` when no transport is connected; store or
    /// encode failures while answering.
    pub async fn on_message(&mut self, message: Message) -> Result<Vec<SessionAction>, FixError> {
        let mut actions = Vec::new();
        if matches!(self.lifecycle, Lifecycle::Disconnected(_)) {
            return Err(self.invalid_state("Connecting"));
        }
        self.heartbeat
            .on_message_received(Instant::now(), message.body.get_str(tags::TEST_REQ_ID));

        let msg_type = match message.msg_type() {
            Ok(msg_type) => msg_type,
            Err(err) => {
                warn!(session = %self.session_id, %err, "message without usable MsgType");
                if self.is_logged_on() {
                    actions.push(SessionAction::Send(self.reject(&message, &err).await?));
                } else {
                    self.disconnect(err.to_string(), &mut actions).await?;
                }
                return Ok(actions);
            }
        };

        let begin_string = message.begin_string().unwrap_or_default();
        if begin_string != self.config.begin_string {
            let text = format!("Incorrect BeginString {begin_string}");
            self.logout_and_disconnect(text, &mut actions).await?;
            return Ok(actions);
        }

        if !self.comp_ids_match(&message) {
            warn!(session = %self.session_id, "CompID problem");
            if self.is_logged_on() {
                let err = MessageRejectError::comp_id_problem();
                actions.push(SessionAction::Send(self.reject(&message, &err).await?));
            }
            self.logout_and_disconnect("CompID problem".to_string(), &mut actions)
                .await?;
            return Ok(actions);
        }

        let Some(seq) = message
            .header
            .get_str(tags::MSG_SEQ_NUM)
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|seq| *seq > 0)
        else {
            self.logout_and_disconnect("MsgSeqNum(34) missing or invalid".to_string(), &mut actions)
                .await?;
            return Ok(actions);
        };

        if self.is_awaiting_logon() {
            if msg_type == MsgType::Logon {
                self.on_logon(message, seq, &mut actions).await?;
            } else {
                let reason = format!("first message was {msg_type}, not Logon");
                self.disconnect(reason, &mut actions).await?;
            }
        } else {
            self.on_session_message(message, msg_type, seq, &mut actions)
                .await?;
        }
        Ok(actions)
    }

    /// Stamps, stores and encodes an outbound message.
    ///
    /// # Errors
    /// `SessionError::InvalidState` before logon; store or encode failures.
    pub async fn send(&mut self, mut message: Message) -> Result<Bytes, FixError> {
        if !self.is_logged_on() {
            return Err(self.invalid_state("Active"));
        }
        if message.is_admin()
            && let Some(hook) = &self.admin_hook
        {
            hook(&mut message);
        }
        self.stamp_and_store(message).await
    }

    /// Builds and sends the reject for `message`.
    ///
    /// Business-level reasons produce BusinessMessageReject (35=j), all
    /// others a session Reject (35=3).
    ///
    /// # Errors
    /// Store or encode failures.
    pub async fn reject(
        &mut self,
        message: &Message,
        err: &MessageRejectError,
    ) -> Result<Bytes, FixError> {
        let ref_seq = message.header.get_str(tags::MSG_SEQ_NUM);
        let ref_msg_type = message.header.get_str(tags::MSG_TYPE);
        let code = err.reason().code().to_string();

        let mut reject = if err.is_business() {
            let mut reject = Message::with_type(
                &self.config.begin_string,
                MsgType::BusinessMessageReject.as_str(),
            );
            if let Some(seq) = ref_seq {
                reject.body.set_str(tags::REF_SEQ_NUM, seq);
            }
            if let Some(msg_type) = ref_msg_type {
                reject.body.set_str(tags::REF_MSG_TYPE, msg_type);
            }
            reject.body.set_str(tags::BUSINESS_REJECT_REASON, &code);
            reject
        } else {
            let mut reject = self.admin_message(&MsgType::Reject);
            reject
                .body
                .set_str(tags::REF_SEQ_NUM, ref_seq.unwrap_or("0"));
            if let Some(tag) = err.ref_tag() {
                reject.body.set_str(tags::REF_TAG_ID, &tag.to_string());
            }
            if let Some(msg_type) = ref_msg_type {
                reject.body.set_str(tags::REF_MSG_TYPE, msg_type);
            }
            reject.body.set_str(tags::SESSION_REJECT_REASON, &code);
            reject
        };
        reject.body.set_str(tags::TEXT, err.text());

        info!(session = %self.session_id, ref_seq, reason = %err.reason(), "rejecting message");
        if err.is_business() {
            self.stamp_and_store(reject).await
        } else {
            self.send_admin(reject).await
        }
    }

    /// Drives timeouts, heartbeats and TestRequests.
    ///
    /// # Errors
    /// Store or encode failures.
    pub async fn on_timer(&mut self, now: Instant) -> Result<Vec<SessionAction>, FixError> {
        let mut actions = Vec::new();
        let deadline = match &self.lifecycle {
            Lifecycle::Connecting(s) => {
                Some((s.state().since, self.config.logon_timeout, "logon timeout"))
            }
            Lifecycle::LogonSent(s) => Some((s.sent_at(), self.config.logon_timeout, "logon timeout")),
            Lifecycle::LogoutPending(s) => {
                Some((s.sent_at(), self.config.logout_timeout, "logout timeout"))
            }
            _ => None,
        };
        if let Some((since, limit, reason)) = deadline {
            if now.saturating_duration_since(since) >= limit {
                self.disconnect(reason.to_string(), &mut actions).await?;
            }
            return Ok(actions);
        }
        if !self.is_logged_on() {
            return Ok(actions);
        }

        if self.heartbeat.is_timed_out(now) {
            let quiet = self.heartbeat.time_since_last_received(now);
            warn!(session = %self.session_id, quiet_ms = quiet.as_millis() as u64, "heartbeat timeout");
            self.disconnect("heartbeat timeout".to_string(), &mut actions)
                .await?;
        } else if self.heartbeat.should_send_test_request(now) {
            let test_req_id = generate_test_req_id();
            let mut test_request = self.admin_message(&MsgType::TestRequest);
            test_request.body.set_str(tags::TEST_REQ_ID, &test_req_id);
            actions.push(SessionAction::Send(self.send_admin(test_request).await?));
            debug!(session = %self.session_id, %test_req_id, "test request sent");
            self.heartbeat.on_test_request_sent(test_req_id, now);
        } else if self.heartbeat.should_send_heartbeat(now) {
            let heartbeat = self.admin_message(&MsgType::Heartbeat);
            actions.push(SessionAction::Send(self.send_admin(heartbeat).await?));
            self.heartbeat.on_message_sent(now);
        }
        Ok(actions)
    }

    /// Starts a logout, or simply disconnects before logon.
    ///
    /// # Errors
    /// Store or encode failures.
    pub async fn logout(&mut self, text: Option<&str>) -> Result<Vec<SessionAction>, FixError> {
        let mut actions = Vec::new();
        if !self.is_logged_on() {
            if !matches!(
                self.lifecycle,
                Lifecycle::Disconnected(_) | Lifecycle::LogoutPending(_)
            ) {
                self.disconnect("logout before logon".to_string(), &mut actions)
                    .await?;
            }
            return Ok(actions);
        }
        let logout = self.logout_message(text);
        actions.push(SessionAction::Send(self.send_admin(logout).await?));
        let now = Instant::now();
        self.transition(|l| match l {
            Lifecycle::Active(s) => Lifecycle::LogoutPending(s.initiate_logout(now)),
            Lifecycle::Resending(s) => Lifecycle::LogoutPending(s.initiate_logout(now)),
            other => other,
        });
        info!(session = %self.session_id, "logout sent");
        Ok(actions)
    }

    /// Records that the transport went away.
    ///
    /// # Errors
    /// Store failures when the configuration resets on disconnect.
    pub async fn on_disconnect(&mut self, reason: &str) -> Result<Vec<SessionAction>, FixError> {
        let mut actions = Vec::new();
        self.disconnect(reason.to_string(), &mut actions).await?;
        Ok(actions)
    }

    async fn on_logon(
        &mut self,
        message: Message,
        seq: u64,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), FixError> {
        let expects_reply = match (&self.lifecycle, self.role) {
            (Lifecycle::Connecting(_), Role::Acceptor) => Some(true),
            (Lifecycle::LogonSent(_), Role::Initiator) => Some(false),
            _ => None,
        };
        let Some(expects_reply) = expects_reply else {
            return self
                .disconnect("unexpected Logon".to_string(), actions)
                .await;
        };

        let heart_bt_int = message
            .body
            .get_str(tags::HEART_BT_INT)
            .and_then(|v| v.parse::<u64>().ok());
        if self.role == Role::Acceptor {
            match heart_bt_int {
                Some(secs) if secs > 0 => self.heartbeat.set_interval(Duration::from_secs(secs)),
                Some(_) => {}
                None => {
                    return self
                        .disconnect("HeartBtInt(108) missing".to_string(), actions)
                        .await;
                }
            }
        }

        let reset = message.body.get_str(tags::RESET_SEQ_NUM_FLAG) == Some("Y");
        if reset && !self.sent_reset {
            info!(session = %self.session_id, "counterparty requested sequence reset");
            match self.role {
                Role::Acceptor => self.reset_sequences().await?,
                Role::Initiator => self.sequences.set_target(1),
            }
        }

        let check = self.sequences.check(seq);
        if let SeqCheck::Duplicate { expected } = check {
            let reason = format!("MsgSeqNum too low, expecting {expected} but received {seq}");
            return self.disconnect(reason, actions).await;
        }

        if expects_reply {
            let reply = self.logon_message(reset);
            actions.push(SessionAction::Send(self.send_admin(reply).await?));
            self.sent_reset = reset;
        }
        self.transition(|l| match l {
            Lifecycle::Connecting(s) => Lifecycle::Active(s.accept_logon()),
            Lifecycle::LogonSent(s) => Lifecycle::Active(s.on_logon_ack()),
            other => other,
        });
        actions.push(SessionAction::LoggedOn);
        info!(
            session = %self.session_id,
            heartbeat_secs = self.heartbeat.interval().as_secs(),
            "logged on"
        );

        match check {
            SeqCheck::Gap { expected } => self.request_resend(expected, seq, message, actions).await,
            _ => {
                self.advance_target();
                Ok(())
            }
        }
    }

    async fn on_session_message(
        &mut self,
        message: Message,
        msg_type: MsgType,
        seq: u64,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), FixError> {
        let gap_fill = message.body.get_str(tags::GAP_FILL_FLAG) == Some("Y");
        if msg_type == MsgType::SequenceReset && !gap_fill {
            self.on_sequence_reset(&message, false, actions).await?;
            actions.push(SessionAction::Deliver(message));
            return self.drain_queue(actions).await;
        }

        match self.sequences.check(seq) {
            SeqCheck::InOrder => {}
            SeqCheck::Gap { expected } => {
                if msg_type == MsgType::ResendRequest {
                    self.on_resend_request(&message, actions).await?;
                }
                return self.request_resend(expected, seq, message, actions).await;
            }
            SeqCheck::Duplicate { expected } => {
                if message.header.get_str(tags::POSS_DUP_FLAG) == Some("Y") {
                    if !message.header.has(tags::ORIG_SENDING_TIME) {
                        let err =
                            MessageRejectError::required_tag_missing(tags::ORIG_SENDING_TIME);
                        actions.push(SessionAction::Send(self.reject(&message, &err).await?));
                        return Ok(());
                    }
                    debug!(session = %self.session_id, seq, expected, "ignoring possible duplicate");
                    return Ok(());
                }
                let reason = format!("MsgSeqNum too low, expecting {expected} but received {seq}");
                return self.logout_and_disconnect(reason, actions).await;
            }
        }

        if self.reject_bad_sending_time(&message, actions).await? {
            return Ok(());
        }

        self.process_in_order(message, msg_type, false, actions)
            .await?;
        self.drain_queue(actions).await
    }

    /// Handles a message whose MsgSeqNum is the expected one.
    async fn process_in_order(
        &mut self,
        message: Message,
        msg_type: MsgType,
        from_queue: bool,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), FixError> {
        if msg_type == MsgType::SequenceReset {
            self.on_sequence_reset(&message, true, actions).await?;
            actions.push(SessionAction::Deliver(message));
            return Ok(());
        }
        self.advance_target();

        match msg_type {
            MsgType::TestRequest => {
                let mut heartbeat = self.admin_message(&MsgType::Heartbeat);
                if let Some(id) = message.body.get_str(tags::TEST_REQ_ID) {
                    heartbeat.body.set_str(tags::TEST_REQ_ID, id);
                }
                actions.push(SessionAction::Send(self.send_admin(heartbeat).await?));
            }
            MsgType::ResendRequest if !from_queue => {
                self.on_resend_request(&message, actions).await?;
            }
            MsgType::Logout => {
                actions.push(SessionAction::Deliver(message));
                return self.on_logout(actions).await;
            }
            MsgType::Logon => {
                if !from_queue {
                    warn!(session = %self.session_id, "Logon on an established session ignored");
                }
                return Ok(());
            }
            _ => {}
        }
        actions.push(SessionAction::Deliver(message));
        Ok(())
    }

    async fn on_sequence_reset(
        &mut self,
        message: &Message,
        gap_fill: bool,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), FixError> {
        let expected = self.next_target_seq();
        let Some(new_seq) = message
            .body
            .get_str(tags::NEW_SEQ_NO)
            .and_then(|v| v.parse::<u64>().ok())
        else {
            let err = MessageRejectError::required_tag_missing(tags::NEW_SEQ_NO);
            actions.push(SessionAction::Send(self.reject(message, &err).await?));
            if gap_fill {
                self.advance_target();
            }
            return Ok(());
        };

        if new_seq > expected {
            info!(session = %self.session_id, gap_fill, from = expected, to = new_seq, "sequence reset");
            self.sequences.set_target(new_seq);
        } else if new_seq < expected {
            let err = MessageRejectError::value_is_incorrect(tags::NEW_SEQ_NO);
            actions.push(SessionAction::Send(self.reject(message, &err).await?));
            if gap_fill {
                self.advance_target();
            }
        }
        Ok(())
    }

    async fn on_resend_request(
        &mut self,
        message: &Message,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), FixError> {
        let parse = |tag| {
            message
                .body
                .get_str(tag)
                .and_then(|v| v.parse::<u64>().ok())
                .ok_or(tag)
        };
        let (begin, end) = match (parse(tags::BEGIN_SEQ_NO), parse(tags::END_SEQ_NO)) {
            (Ok(begin), Ok(end)) => (begin, end),
            (Err(tag), _) | (_, Err(tag)) => {
                let err = MessageRejectError::required_tag_missing(tag);
                actions.push(SessionAction::Send(self.reject(message, &err).await?));
                return Ok(());
            }
        };

        let last_sent = self.next_sender_seq().saturating_sub(1);
        let end = if end == 0 || end > last_sent { last_sent } else { end };
        if begin == 0 || begin > end {
            debug!(session = %self.session_id, begin, end, "nothing to resend");
            return Ok(());
        }
        info!(session = %self.session_id, begin, end, "resending messages");

        let stored = self.store.get_range(begin, end).await?;
        let mut gap_begin: Option<u64> = None;
        let mut next_seq = begin;
        for entry in stored {
            let original = Message::parse(&entry.bytes)
                .ok()
                .filter(|m| !m.is_admin());
            match original {
                Some(original) => {
                    let gap = gap_begin
                        .take()
                        .or_else(|| (next_seq < entry.seq_num).then_some(next_seq));
                    if let Some(from) = gap {
                        actions.push(SessionAction::Send(self.gap_fill(from, entry.seq_num)?));
                    }
                    actions.push(SessionAction::Send(self.resend(original)?));
                }
                None => {
                    gap_begin.get_or_insert(next_seq);
                }
            }
            next_seq = entry.seq_num + 1;
        }
        let gap = gap_begin.or_else(|| (next_seq <= end).then_some(next_seq));
        if let Some(from) = gap {
            actions.push(SessionAction::Send(self.gap_fill(from, end + 1)?));
        }
        Ok(())
    }

    async fn on_logout(&mut self, actions: &mut Vec<SessionAction>) -> Result<(), FixError> {
        if matches!(self.lifecycle, Lifecycle::LogoutPending(_)) {
            info!(session = %self.session_id, "logout acknowledged");
        } else {
            info!(session = %self.session_id, "logout requested by counterparty");
            let reply = self.logout_message(None);
            actions.push(SessionAction::Send(self.send_admin(reply).await?));
        }
        if self.config.reset_on_logout {
            self.reset_sequences().await?;
        }
        self.disconnect("logout".to_string(), actions).await
    }

    /// Queues a message received ahead of a gap and asks for the gap.
    async fn request_resend(
        &mut self,
        expected: u64,
        received: u64,
        message: Message,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), FixError> {
        self.queue.insert(received, message);
        let resend_range = match &self.lifecycle {
            Lifecycle::Resending(s) => Some((s.begin_seq(), s.end_seq())),
            _ => None,
        };
        if let Some((begin, end)) = resend_range {
            debug!(session = %self.session_id, received, begin, end, "queued during resend");
            if received > end + 1 {
                self.transition(|l| match l {
                    Lifecycle::Resending(s) => {
                        Lifecycle::Resending(s.resend_complete().start_resend(begin, received - 1))
                    }
                    other => other,
                });
            }
            return Ok(());
        }
        if !matches!(self.lifecycle, Lifecycle::Active(_)) {
            return Ok(());
        }

        let mut request = self.admin_message(&MsgType::ResendRequest);
        request.body.set_str(tags::BEGIN_SEQ_NO, &expected.to_string());
        request.body.set_str(tags::END_SEQ_NO, "0");
        actions.push(SessionAction::Send(self.send_admin(request).await?));
        self.transition(|l| match l {
            Lifecycle::Active(s) => Lifecycle::Resending(s.start_resend(expected, received - 1)),
            other => other,
        });
        info!(session = %self.session_id, expected, received, "sequence gap, resend requested");
        Ok(())
    }

    /// Processes queued messages that are now in sequence.
    async fn drain_queue(&mut self, actions: &mut Vec<SessionAction>) -> Result<(), FixError> {
        loop {
            if matches!(self.lifecycle, Lifecycle::Disconnected(_)) {
                self.queue.clear();
                return Ok(());
            }
            let next = self.next_target_seq();
            self.queue = self.queue.split_off(&next);
            let Some(message) = self.queue.remove(&next) else {
                break;
            };
            let Ok(msg_type) = message.msg_type() else {
                self.advance_target();
                continue;
            };
            debug!(session = %self.session_id, seq = next, "processing queued message");
            if self.reject_bad_sending_time(&message, actions).await? {
                continue;
            }
            self.process_in_order(message, msg_type, true, actions)
                .await?;
        }

        let next = self.next_target_seq();
        let done = matches!(&self.lifecycle, Lifecycle::Resending(s) if next > s.end_seq());
        if done {
            self.transition(|l| match l {
                Lifecycle::Resending(s) => Lifecycle::Active(s.resend_complete()),
                other => other,
            });
            info!(session = %self.session_id, "resend complete");
        }
        Ok(())
    }

    async fn logout_and_disconnect(
        &mut self,
        text: String,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), FixError> {
        if self.is_logged_on() {
            let logout = self.logout_message(Some(&text));
            actions.push(SessionAction::Send(self.send_admin(logout).await?));
        }
        self.disconnect(text, actions).await
    }

    async fn disconnect(
        &mut self,
        reason: String,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), FixError> {
        if matches!(self.lifecycle, Lifecycle::Disconnected(_)) {
            return Ok(());
        }
        let was_logged_on = matches!(
            self.lifecycle,
            Lifecycle::Active(_) | Lifecycle::Resending(_) | Lifecycle::LogoutPending(_)
        );
        self.transition(Lifecycle::disconnect);
        self.queue.clear();
        if self.config.reset_on_disconnect {
            self.reset_sequences().await?;
        }
        info!(session = %self.session_id, %reason, "session disconnected");
        if was_logged_on {
            actions.push(SessionAction::LoggedOut);
        }
        actions.push(SessionAction::Disconnect(reason));
        Ok(())
    }

    async fn reset_sequences(&mut self) -> Result<(), FixError> {
        self.store.reset().await?;
        self.sequences.reset();
        self.queue.clear();
        Ok(())
    }

    fn advance_target(&mut self) {
        self.sequences.advance_target();
    }

    fn transition(&mut self, f: impl FnOnce(Lifecycle) -> Lifecycle) {
        let placeholder = Lifecycle::Disconnected(Session::new(self.session_id.clone()));
        let current = std::mem::replace(&mut self.lifecycle, placeholder);
        self.lifecycle = f(current);
    }

    fn invalid_state(&self, expected: &str) -> FixError {
        SessionError::InvalidState {
            expected: expected.to_string(),
            current: self.state_name().to_string(),
        }
        .into()
    }

    fn comp_ids_match(&self, message: &Message) -> bool {
        message.header.get_str(tags::SENDER_COMP_ID) == Some(self.config.target_comp_id.as_str())
            && message.header.get_str(tags::TARGET_COMP_ID)
                == Some(self.config.sender_comp_id.as_str())
    }

    /// Rejects `message` if its SendingTime fails; true when it was rejected.
    async fn reject_bad_sending_time(
        &mut self,
        message: &Message,
        actions: &mut Vec<SessionAction>,
    ) -> Result<bool, FixError> {
        let Err(err) = self.check_sending_time(message) else {
            return Ok(false);
        };
        actions.push(SessionAction::Send(self.reject(message, &err).await?));
        if err.reason() == RejectReason::SendingTimeAccuracyProblem {
            self.logout_and_disconnect(err.text().to_string(), actions)
                .await?;
        } else {
            self.advance_target();
        }
        Ok(true)
    }

    fn check_sending_time(&self, message: &Message) -> Result<(), MessageRejectError> {
        let raw = message
            .header
            .get_str(tags::SENDING_TIME)
            .ok_or_else(|| MessageRejectError::required_tag_missing(tags::SENDING_TIME))?;
        let sent = Timestamp::parse_fix(raw)
            .map_err(|_| MessageRejectError::incorrect_data_format(tags::SENDING_TIME))?;
        if !self.config.check_latency {
            return Ok(());
        }
        let skew = Duration::from_millis(Timestamp::now().as_millis().abs_diff(sent.as_millis()));
        if skew > self.config.max_latency {
            return Err(MessageRejectError::new(
                RejectReason::SendingTimeAccuracyProblem,
                "SendingTime accuracy problem",
                Some(tags::SENDING_TIME),
            ));
        }
        Ok(())
    }

    fn admin_message(&self, msg_type: &MsgType) -> Message {
        Message::with_type(&self.config.begin_string, msg_type.as_str())
    }

    fn logon_message(&self, reset: bool) -> Message {
        let mut logon = self.admin_message(&MsgType::Logon);
        logon.body.set_str(tags::ENCRYPT_METHOD, "0");
        logon
            .body
            .set_str(tags::HEART_BT_INT, &self.heartbeat.interval().as_secs().to_string());
        if reset {
            logon.body.set_str(tags::RESET_SEQ_NUM_FLAG, "Y");
        }
        logon
    }

    fn logout_message(&self, text: Option<&str>) -> Message {
        let mut logout = self.admin_message(&MsgType::Logout);
        if let Some(text) = text {
            logout.body.set_str(tags::TEXT, text);
        }
        logout
    }

    fn stamp_header(&self, message: &mut Message, seq: u64) {
        let header = &mut message.header;
        header.set_str(tags::BEGIN_STRING, &self.config.begin_string);
        header.set_str(tags::SENDER_COMP_ID, self.config.sender_comp_id.as_str());
        header.set_str(tags::TARGET_COMP_ID, self.config.target_comp_id.as_str());
        if let Some(sub_id) = &self.config.sender_sub_id {
            header.set_str(tags::SENDER_SUB_ID, sub_id);
        }
        if let Some(sub_id) = &self.config.target_sub_id {
            header.set_str(tags::TARGET_SUB_ID, sub_id);
        }
        header.set_str(tags::MSG_SEQ_NUM, &seq.to_string());
        header.set_str(tags::SENDING_TIME, Timestamp::now().format_millis().as_str());
    }

    async fn send_admin(&mut self, mut message: Message) -> Result<Bytes, FixError> {
        if let Some(hook) = &self.admin_hook {
            hook(&mut message);
        }
        self.stamp_and_store(message).await
    }

    async fn stamp_and_store(&mut self, mut message: Message) -> Result<Bytes, FixError> {
        let seq = self.sequences.allocate_sender().value();
        self.stamp_header(&mut message, seq);
        let bytes = message.build()?;
        self.store.store(seq, &bytes).await?;
        self.heartbeat.on_message_sent(Instant::now());
        debug!(session = %self.session_id, seq, msg_type = message.header.get_str(tags::MSG_TYPE), "outbound");
        Ok(bytes)
    }

    /// Re-encodes a stored application message as a possible duplicate.
    fn resend(&mut self, mut message: Message) -> Result<Bytes, FixError> {
        if let Some(original) = message.header.get_str(tags::SENDING_TIME).map(str::to_owned) {
            message.header.set_str(tags::ORIG_SENDING_TIME, &original);
        }
        message.header.set_str(tags::POSS_DUP_FLAG, "Y");
        message
            .header
            .set_str(tags::SENDING_TIME, Timestamp::now().format_millis().as_str());
        self.heartbeat.on_message_sent(Instant::now());
        Ok(message.build()?)
    }

    /// SequenceReset-GapFill covering `begin..new_seq`, sent with MsgSeqNum `begin`.
    fn gap_fill(&mut self, begin: u64, new_seq: u64) -> Result<Bytes, FixError> {
        let mut gap_fill = self.admin_message(&MsgType::SequenceReset);
        if let Some(hook) = &self.admin_hook {
            hook(&mut gap_fill);
        }
        self.stamp_header(&mut gap_fill, begin);
        let sending_time = Timestamp::now().format_millis();
        gap_fill.header.set_str(tags::POSS_DUP_FLAG, "Y");
        gap_fill
            .header
            .set_str(tags::ORIG_SENDING_TIME, sending_time.as_str());
        gap_fill.body.set_str(tags::GAP_FILL_FLAG, "Y");
        gap_fill.body.set_str(tags::NEW_SEQ_NO, &new_seq.to_string());
        debug!(session = %self.session_id, begin, new_seq, "gap fill");
        self.heartbeat.on_message_sent(Instant::now());
        Ok(gap_fill.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfigBuilder;
    use rfqfix_store::MemoryStore;

    fn config() -> SessionConfig {
        SessionConfigBuilder::new()
            .sender_comp_id("BANK")
            .target_comp_id("CLIENT")
            .build()
            .unwrap()
    }

    fn inbound(msg_type: &str, seq: u64) -> Message {
        let mut message = Message::with_type("FIX.4.2", msg_type);
        message.header.set_str(49, "CLIENT");
        message.header.set_str(56, "BANK");
        message.header.set_str(34, &seq.to_string());
        message
            .header
            .set_str(52, Timestamp::now().format_millis().as_str());
        message
    }

    fn logon(seq: u64) -> Message {
        let mut message = inbound("A", seq);
        message.body.set_str(98, "0");
        message.body.set_str(108, "30");
        message
    }

    fn app(seq: u64) -> Message {
        let mut message = inbound("AH", seq);
        message.body.set_str(644, &format!("RFQ{seq}"));
        message
    }

    fn sent(actions: &[SessionAction]) -> Vec<Message> {
        actions
            .iter()
            .filter_map(|a| match a {
                SessionAction::Send(bytes) => Some(Message::parse(bytes).unwrap()),
                _ => None,
            })
            .collect()
    }

    fn delivered(actions: &[SessionAction]) -> Vec<String> {
        actions
            .iter()
            .filter_map(|a| match a {
                SessionAction::Deliver(m) => m.body.get_str(644).map(str::to_owned),
                _ => None,
            })
            .collect()
    }

    fn acceptor_with(store: Arc<MemoryStore>) -> FixSession {
        let mut session = FixSession::new(config(), Role::Acceptor, store);
        session.on_connect(Instant::now());
        session
    }

    async fn logged_on_acceptor() -> (FixSession, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mut session = acceptor_with(store.clone());
        session.on_message(logon(1)).await.unwrap();
        assert!(session.is_logged_on());
        (session, store)
    }

    #[tokio::test]
    async fn test_acceptor_logon_handshake() {
        let store = Arc::new(MemoryStore::new());
        let mut session = acceptor_with(store.clone());
        let actions = session.on_message(logon(1)).await.unwrap();

        let replies = sent(&actions);
        assert_eq!(replies.len(), 1);
        let reply = &replies[0];
        assert_eq!(reply.header.get_str(35), Some("A"));
        assert_eq!(reply.header.get_str(34), Some("1"));
        assert_eq!(reply.header.get_str(49), Some("BANK"));
        assert_eq!(reply.header.get_str(56), Some("CLIENT"));
        assert_eq!(reply.body.get_str(108), Some("30"));
        assert!(actions.contains(&SessionAction::LoggedOn));
        assert_eq!(session.state_name(), "Active");
        assert_eq!(session.next_target_seq(), 2);
        assert_eq!(session.next_sender_seq(), 2);
        assert_eq!(store.next_target_seq(), 2);
        assert!(store.contains(1));
    }

    #[tokio::test]
    async fn test_initiator_logon_handshake() {
        let store = Arc::new(MemoryStore::new());
        let mut session = FixSession::new(config(), Role::Initiator, store);
        session.on_connect(Instant::now());

        let actions = session.logon().await.unwrap();
        let logon_out = sent(&actions);
        assert_eq!(logon_out[0].header.get_str(35), Some("A"));
        assert_eq!(logon_out[0].body.get_str(98), Some("0"));
        assert_eq!(session.state_name(), "LogonSent");

        let actions = session.on_message(logon(1)).await.unwrap();
        assert_eq!(actions, vec![SessionAction::LoggedOn]);
        assert_eq!(session.state_name(), "Active");
    }

    #[tokio::test]
    async fn test_logon_requires_initiator() {
        let mut session = acceptor_with(Arc::new(MemoryStore::new()));
        assert!(session.logon().await.is_err());
    }

    #[tokio::test]
    async fn test_non_logon_first_disconnects() {
        let mut session = acceptor_with(Arc::new(MemoryStore::new()));
        let actions = session.on_message(app(1)).await.unwrap();
        assert!(matches!(actions.as_slice(), [SessionAction::Disconnect(_)]));
        assert_eq!(session.state_name(), "Disconnected");
    }

    #[tokio::test]
    async fn test_gap_queues_and_drains() {
        let (mut session, _) = logged_on_acceptor().await;

        let actions = session.on_message(app(4)).await.unwrap();
        let requests = sent(&actions);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header.get_str(35), Some("2"));
        assert_eq!(requests[0].body.get_str(7), Some("2"));
        assert_eq!(requests[0].body.get_str(16), Some("0"));
        assert!(delivered(&actions).is_empty());
        assert_eq!(session.state_name(), "Resending");

        let actions = session.on_message(app(2)).await.unwrap();
        assert_eq!(delivered(&actions), vec!["RFQ2"]);

        let actions = session.on_message(app(3)).await.unwrap();
        assert_eq!(delivered(&actions), vec!["RFQ3", "RFQ4"]);
        assert_eq!(session.next_target_seq(), 5);
        assert_eq!(session.state_name(), "Active");
    }

    #[tokio::test]
    async fn test_logon_gap_requests_resend() {
        let mut session = acceptor_with(Arc::new(MemoryStore::new()));
        let actions = session.on_message(logon(5)).await.unwrap();

        let out = sent(&actions);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].header.get_str(35), Some("A"));
        assert_eq!(out[1].header.get_str(35), Some("2"));
        assert_eq!(out[1].body.get_str(7), Some("1"));
        assert_eq!(out[1].body.get_str(16), Some("0"));
        assert!(actions.contains(&SessionAction::LoggedOn));
        assert_eq!(session.state_name(), "Resending");
        assert_eq!(session.next_target_seq(), 1);
    }

    #[tokio::test]
    async fn test_resend_request_with_gap_not_replayed() {
        let (mut session, _) = logged_on_acceptor().await;
        for id in ["Q1", "Q2"] {
            let mut report = Message::with_type("FIX.4.2", "AI");
            report.body.set_str(131, id);
            session.send(report).await.unwrap();
        }

        let mut request = inbound("2", 4);
        request.body.set_str(7, "2");
        request.body.set_str(16, "0");
        let out = sent(&session.on_message(request).await.unwrap());
        let types: Vec<_> = out.iter().map(|m| m.header.get_str(35).unwrap()).collect();
        assert_eq!(types, vec!["AI", "AI", "2"]);
        assert_eq!(out[2].body.get_str(7), Some("2"));
        assert_eq!(session.state_name(), "Resending");

        session.on_message(app(2)).await.unwrap();
        let actions = session.on_message(app(3)).await.unwrap();
        assert!(sent(&actions).is_empty());
        assert_eq!(delivered(&actions), vec!["RFQ3"]);
        assert!(actions.iter().any(
            |a| matches!(a, SessionAction::Deliver(m) if m.header.get_str(35) == Some("2"))
        ));
        assert_eq!(session.next_target_seq(), 5);
        assert_eq!(session.state_name(), "Active");
    }

    #[tokio::test]
    async fn test_reset_mode_drops_stale_queue() {
        let (mut session, _) = logged_on_acceptor().await;
        session.on_message(app(5)).await.unwrap();
        session.on_message(app(7)).await.unwrap();
        assert_eq!(session.state_name(), "Resending");

        let mut reset = inbound("4", 3);
        reset.body.set_str(36, "7");
        let actions = session.on_message(reset).await.unwrap();

        assert_eq!(delivered(&actions), vec!["RFQ7"]);
        assert_eq!(session.next_target_seq(), 8);
        assert_eq!(session.state_name(), "Active");
    }

    #[tokio::test]
    async fn test_queued_message_checks_sending_time() {
        let (mut session, _) = logged_on_acceptor().await;
        let mut stale = app(3);
        stale.header.remove(52);
        session.on_message(stale).await.unwrap();

        let actions = session.on_message(app(2)).await.unwrap();
        assert_eq!(delivered(&actions), vec!["RFQ2"]);
        let rejects = sent(&actions);
        assert_eq!(rejects.len(), 1);
        assert_eq!(rejects[0].header.get_str(35), Some("3"));
        assert_eq!(rejects[0].body.get_str(45), Some("3"));
        assert_eq!(rejects[0].body.get_str(371), Some("52"));
        assert_eq!(rejects[0].body.get_str(373), Some("1"));
        assert_eq!(session.next_target_seq(), 4);
        assert_eq!(session.state_name(), "Active");
    }

    #[tokio::test]
    async fn test_gap_fill_advances_and_drains() {
        let (mut session, _) = logged_on_acceptor().await;
        session.on_message(app(4)).await.unwrap();

        let mut gap_fill = inbound("4", 2);
        gap_fill.header.set_str(43, "Y");
        gap_fill.header.set_str(122, "20260127-08:00:00.000");
        gap_fill.body.set_str(123, "Y");
        gap_fill.body.set_str(36, "4");
        let actions = session.on_message(gap_fill).await.unwrap();

        assert_eq!(delivered(&actions), vec!["RFQ4"]);
        assert_eq!(session.next_target_seq(), 5);
        assert_eq!(session.state_name(), "Active");
    }

    #[tokio::test]
    async fn test_gap_fill_cannot_lower_sequence() {
        let (mut session, _) = logged_on_acceptor().await;

        let mut gap_fill = inbound("4", 2);
        gap_fill.body.set_str(123, "Y");
        gap_fill.body.set_str(36, "1");
        let actions = session.on_message(gap_fill).await.unwrap();

        let rejects = sent(&actions);
        assert_eq!(rejects[0].header.get_str(35), Some("3"));
        assert_eq!(rejects[0].body.get_str(373), Some("5"));
        assert_eq!(rejects[0].body.get_str(371), Some("36"));
        assert_eq!(session.next_target_seq(), 3);
    }

    #[tokio::test]
    async fn test_sequence_reset_mode_ignores_msg_seq_num() {
        let (mut session, _) = logged_on_acceptor().await;

        let mut reset = inbound("4", 9);
        reset.body.set_str(36, "10");
        let actions = session.on_message(reset).await.unwrap();

        assert!(sent(&actions).is_empty());
        assert!(matches!(
            actions.as_slice(),
            [SessionAction::Deliver(m)] if m.header.get_str(35) == Some("4")
        ));
        assert_eq!(session.next_target_seq(), 10);
    }

    #[tokio::test]
    async fn test_sequence_too_low() {
        let (mut session, _) = logged_on_acceptor().await;
        session.on_message(app(2)).await.unwrap();

        let mut dup = app(2);
        dup.header.set_str(43, "Y");
        dup.header.set_str(122, "20260127-08:00:00.000");
        let actions = session.on_message(dup).await.unwrap();
        assert!(actions.is_empty());
        assert!(session.is_logged_on());

        let actions = session.on_message(app(2)).await.unwrap();
        let logout = sent(&actions);
        assert_eq!(logout[0].header.get_str(35), Some("5"));
        assert_eq!(
            logout[0].body.get_str(58),
            Some("MsgSeqNum too low, expecting 3 but received 2")
        );
        assert!(actions.contains(&SessionAction::LoggedOut));
        assert!(matches!(actions.last(), Some(SessionAction::Disconnect(_))));
    }

    #[tokio::test]
    async fn test_resend_request_answers_with_gap_fill_and_poss_dup() {
        let (mut session, _) = logged_on_acceptor().await;
        for id in ["Q1", "Q2"] {
            let mut report = Message::with_type("FIX.4.2", "AI");
            report.body.set_str(131, id);
            session.send(report).await.unwrap();
        }

        let mut request = inbound("2", 2);
        request.body.set_str(7, "1");
        request.body.set_str(16, "0");
        let resent = sent(&session.on_message(request).await.unwrap());

        assert_eq!(resent.len(), 3);
        assert_eq!(resent[0].header.get_str(35), Some("4"));
        assert_eq!(resent[0].header.get_str(34), Some("1"));
        assert_eq!(resent[0].body.get_str(123), Some("Y"));
        assert_eq!(resent[0].body.get_str(36), Some("2"));

        assert_eq!(resent[1].header.get_str(35), Some("AI"));
        assert_eq!(resent[1].header.get_str(34), Some("2"));
        assert_eq!(resent[1].header.get_str(43), Some("Y"));
        assert!(resent[1].header.has(122));
        assert_eq!(resent[1].body.get_str(131), Some("Q1"));
        assert_eq!(resent[2].header.get_str(34), Some("3"));
        assert_eq!(session.next_sender_seq(), 4);
    }

    #[tokio::test]
    async fn test_test_request_echo() {
        let (mut session, _) = logged_on_acceptor().await;
        let mut request = inbound("1", 2);
        request.body.set_str(112, "PING");
        let replies = sent(&session.on_message(request).await.unwrap());

        assert_eq!(replies[0].header.get_str(35), Some("0"));
        assert_eq!(replies[0].body.get_str(112), Some("PING"));
    }

    #[tokio::test]
    async fn test_admin_messages_are_delivered() {
        let (mut session, _) = logged_on_acceptor().await;

        let actions = session.on_message(inbound("0", 2)).await.unwrap();
        assert!(matches!(
            actions.as_slice(),
            [SessionAction::Deliver(m)] if m.header.get_str(35) == Some("0")
        ));

        let mut request = inbound("1", 3);
        request.body.set_str(112, "PING");
        let actions = session.on_message(request).await.unwrap();
        assert_eq!(actions.len(), 2);
        assert!(matches!(&actions[1], SessionAction::Deliver(m) if m.body.get_str(112) == Some("PING")));
    }

    #[tokio::test]
    async fn test_refuse_logon() {
        let store = Arc::new(MemoryStore::new());
        let mut session = acceptor_with(store);
        let err = MessageRejectError::other("unknown counterparty");
        let actions = session.refuse_logon(&err).await.unwrap();

        let logout = sent(&actions);
        assert_eq!(logout.len(), 1);
        assert_eq!(logout[0].header.get_str(35), Some("5"));
        assert_eq!(logout[0].body.get_str(58), Some("unknown counterparty"));
        assert!(!actions.contains(&SessionAction::LoggedOn));
        assert!(matches!(actions.last(), Some(SessionAction::Disconnect(_))));
        assert_eq!(session.state_name(), "Disconnected");

        let (mut active, _) = logged_on_acceptor().await;
        assert!(active.refuse_logon(&err).await.is_err());
    }

    #[tokio::test]
    async fn test_counterparty_logout() {
        let (mut session, _) = logged_on_acceptor().await;
        let actions = session.on_message(inbound("5", 2)).await.unwrap();

        assert!(matches!(&actions[0], SessionAction::Deliver(m) if m.header.get_str(35) == Some("5")));
        assert_eq!(sent(&actions)[0].header.get_str(35), Some("5"));
        assert_eq!(actions[2], SessionAction::LoggedOut);
        assert!(matches!(actions[3], SessionAction::Disconnect(_)));
        assert_eq!(session.state_name(), "Disconnected");
    }

    #[tokio::test]
    async fn test_initiated_logout() {
        let (mut session, _) = logged_on_acceptor().await;
        let actions = session.logout(Some("end of day")).await.unwrap();
        assert_eq!(sent(&actions)[0].body.get_str(58), Some("end of day"));
        assert_eq!(session.state_name(), "LogoutPending");
        assert!(session.send(Message::with_type("FIX.4.2", "AI")).await.is_err());

        let actions = session.on_message(inbound("5", 2)).await.unwrap();
        assert!(sent(&actions).is_empty());
        assert!(matches!(&actions[0], SessionAction::Deliver(_)));
        assert_eq!(actions[1], SessionAction::LoggedOut);
        assert!(matches!(actions[2], SessionAction::Disconnect(_)));
    }

    #[tokio::test]
    async fn test_timer_heartbeat_test_request_and_timeout() {
        let (mut session, _) = logged_on_acceptor().await;
        let start = Instant::now();

        let actions = session.on_timer(start + Duration::from_secs(31)).await.unwrap();
        assert_eq!(sent(&actions)[0].header.get_str(35), Some("0"));

        let actions = session.on_timer(start + Duration::from_secs(37)).await.unwrap();
        let test_request = &sent(&actions)[0];
        assert_eq!(test_request.header.get_str(35), Some("1"));
        assert!(test_request.body.get_str(112).is_some());

        let actions = session.on_timer(start + Duration::from_secs(68)).await.unwrap();
        assert!(actions.contains(&SessionAction::LoggedOut));
        assert!(matches!(actions.last(), Some(SessionAction::Disconnect(r)) if r == "heartbeat timeout"));
    }

    #[tokio::test]
    async fn test_logon_timeout() {
        let mut session = FixSession::new(config(), Role::Initiator, Arc::new(MemoryStore::new()));
        session.on_connect(Instant::now());
        session.logon().await.unwrap();

        let actions = session
            .on_timer(Instant::now() + Duration::from_secs(11))
            .await
            .unwrap();
        assert_eq!(actions, vec![SessionAction::Disconnect("logon timeout".to_string())]);
    }

    #[tokio::test]
    async fn test_reject_session_and_business() {
        let (mut session, _) = logged_on_acceptor().await;
        let inbound_msg = app(2);

        let bytes = session
            .reject(&inbound_msg, &MessageRejectError::required_tag_missing(644))
            .await
            .unwrap();
        let reject = Message::parse(&bytes).unwrap();
        assert_eq!(reject.header.get_str(35), Some("3"));
        assert_eq!(reject.body.get_str(45), Some("2"));
        assert_eq!(reject.body.get_str(371), Some("644"));
        assert_eq!(reject.body.get_str(372), Some("AH"));
        assert_eq!(reject.body.get_str(373), Some("1"));

        let bytes = session
            .reject(&inbound_msg, &MessageRejectError::unsupported_message_type())
            .await
            .unwrap();
        let reject = Message::parse(&bytes).unwrap();
        assert_eq!(reject.header.get_str(35), Some("j"));
        assert_eq!(reject.body.get_str(372), Some("AH"));
        assert_eq!(reject.body.get_str(380), Some("3"));
        assert_eq!(reject.body.get_str(58), Some("Unsupported Message Type"));
    }

    #[tokio::test]
    async fn test_comp_id_problem() {
        let (mut session, _) = logged_on_acceptor().await;
        let mut message = app(2);
        message.header.set_str(49, "INTRUDER");
        let actions = session.on_message(message).await.unwrap();

        let out = sent(&actions);
        assert_eq!(out[0].header.get_str(35), Some("3"));
        assert_eq!(out[0].body.get_str(373), Some("9"));
        assert_eq!(out[1].header.get_str(35), Some("5"));
        assert!(matches!(actions.last(), Some(SessionAction::Disconnect(_))));
    }

    #[tokio::test]
    async fn test_reset_seq_num_flag_on_logon() {
        let store = Arc::new(MemoryStore::with_initial_seqs(5, 5));
        let mut session = acceptor_with(store.clone());
        let mut request = logon(1);
        request.body.set_str(141, "Y");
        let actions = session.on_message(request).await.unwrap();

        let reply = &sent(&actions)[0];
        assert_eq!(reply.header.get_str(34), Some("1"));
        assert_eq!(reply.body.get_str(141), Some("Y"));
        assert_eq!(session.next_target_seq(), 2);
        assert_eq!(store.next_sender_seq(), 2);
    }

    #[tokio::test]
    async fn test_admin_hook_applies_to_session_messages() {
        let store = Arc::new(MemoryStore::new());
        let mut session = FixSession::new(config(), Role::Acceptor, store)
            .with_admin_hook(Box::new(|m: &mut Message| m.body.set_str(58, "hooked")));
        session.on_connect(Instant::now());
        let actions = session.on_message(logon(1)).await.unwrap();
        assert_eq!(sent(&actions)[0].body.get_str(58), Some("hooked"));
    }
}
