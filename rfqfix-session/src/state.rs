/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Session state machine using the typestate pattern.
//!
//! Each lifecycle state is its own type carrying the data that only exists
//! in that state. Transitions consume the session and return it in the new
//! state, so an operation that is invalid for a state does not compile.

use std::time::Instant;

/// Marker trait for session states.
pub trait SessionState: private::Sealed {
    /// Human-readable state name.
    const NAME: &'static str;
}

mod private {
    pub trait Sealed {}
}

/// Disconnected state - no connection established.
#[derive(Debug, Clone, Copy)]
pub struct Disconnected;

impl private::Sealed for Disconnected {}
impl SessionState for Disconnected {
    const NAME: &'static str = "Disconnected";
}

/// Connecting state - transport is up, no Logon exchanged yet.
#[derive(Debug, Clone, Copy)]
pub struct Connecting {
    /// Time when the transport connected.
    pub since: Instant,
}

impl private::Sealed for Connecting {}
impl SessionState for Connecting {
    const NAME: &'static str = "Connecting";
}

/// LogonSent state - Logon message sent, awaiting response.
#[derive(Debug, Clone, Copy)]
pub struct LogonSent {
    /// Time when Logon was sent.
    pub sent_at: Instant,
}

impl private::Sealed for LogonSent {}
impl SessionState for LogonSent {
    const NAME: &'static str = "LogonSent";
}

/// Active state - session is fully established.
#[derive(Debug, Clone, Copy)]
pub struct Active;

impl private::Sealed for Active {}
impl SessionState for Active {
    const NAME: &'static str = "Active";
}

/// Resending state - waiting for the counterparty to fill a gap.
#[derive(Debug, Clone, Copy)]
pub struct Resending {
    /// First missing sequence number.
    pub begin_seq: u64,
    /// Last missing sequence number.
    pub end_seq: u64,
}

impl private::Sealed for Resending {}
impl SessionState for Resending {
    const NAME: &'static str = "Resending";
}

/// LogoutPending state - Logout sent, awaiting confirmation.
#[derive(Debug, Clone, Copy)]
pub struct LogoutPending {
    /// Time when Logout was sent.
    pub sent_at: Instant,
}

impl private::Sealed for LogoutPending {}
impl SessionState for LogoutPending {
    const NAME: &'static str = "LogoutPending";
}

/// Session wrapper with typestate for compile-time state checking.
///
/// The type parameter `S` represents the current session state.
#[derive(Debug)]
pub struct Session<S: SessionState> {
    /// Session identifier.
    session_id: String,
    /// Data of the current state.
    state: S,
}

impl<S: SessionState> Session<S> {
    /// Returns the session identifier.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the current state data.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Returns the name of the current state.
    #[must_use]
    pub const fn state_name(&self) -> &'static str {
        S::NAME
    }

    fn into_state<T: SessionState>(self, state: T) -> Session<T> {
        Session {
            session_id: self.session_id,
            state,
        }
    }
}

impl Session<Disconnected> {
    /// Creates a new disconnected session.
    ///
    /// # Arguments
    /// * `session_id` - Unique identifier for this session
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            state: Disconnected,
        }
    }

    /// Transitions to the Connecting state once the transport is up.
    #[must_use]
    pub fn connect(self, now: Instant) -> Session<Connecting> {
        self.into_state(Connecting { since: now })
    }
}

impl Session<Connecting> {
    /// Transitions to the LogonSent state after sending Logon.
    #[must_use]
    pub fn send_logon(self, now: Instant) -> Session<LogonSent> {
        self.into_state(LogonSent { sent_at: now })
    }

    /// Transitions straight to Active after answering a counterparty Logon.
    #[must_use]
    pub fn accept_logon(self) -> Session<Active> {
        self.into_state(Active)
    }

    /// Transitions back to Disconnected on connection failure.
    #[must_use]
    pub fn disconnect(self) -> Session<Disconnected> {
        self.into_state(Disconnected)
    }
}

impl Session<LogonSent> {
    /// Returns the time the Logon was sent.
    #[must_use]
    pub const fn sent_at(&self) -> Instant {
        self.state.sent_at
    }

    /// Transitions to Active state on successful Logon acknowledgement.
    #[must_use]
    pub fn on_logon_ack(self) -> Session<Active> {
        self.into_state(Active)
    }

    /// Transitions to Disconnected on Logon rejection or timeout.
    #[must_use]
    pub fn on_logon_reject(self) -> Session<Disconnected> {
        self.into_state(Disconnected)
    }
}

impl Session<Active> {
    /// Transitions to Resending state when a gap is detected.
    ///
    /// # Arguments
    /// * `begin_seq` - First missing sequence number
    /// * `end_seq` - Last missing sequence number
    #[must_use]
    pub fn start_resend(self, begin_seq: u64, end_seq: u64) -> Session<Resending> {
        self.into_state(Resending { begin_seq, end_seq })
    }

    /// Transitions to LogoutPending state.
    #[must_use]
    pub fn initiate_logout(self, now: Instant) -> Session<LogoutPending> {
        self.into_state(LogoutPending { sent_at: now })
    }

    /// Transitions to Disconnected on unexpected disconnect.
    #[must_use]
    pub fn disconnect(self) -> Session<Disconnected> {
        self.into_state(Disconnected)
    }
}

impl Session<Resending> {
    /// Returns the first missing sequence number.
    #[must_use]
    pub const fn begin_seq(&self) -> u64 {
        self.state.begin_seq
    }

    /// Returns the last missing sequence number.
    #[must_use]
    pub const fn end_seq(&self) -> u64 {
        self.state.end_seq
    }

    /// Transitions back to Active when resend is complete.
    #[must_use]
    pub fn resend_complete(self) -> Session<Active> {
        self.into_state(Active)
    }

    /// Transitions to LogoutPending while a resend is still outstanding.
    #[must_use]
    pub fn initiate_logout(self, now: Instant) -> Session<LogoutPending> {
        self.into_state(LogoutPending { sent_at: now })
    }

    /// Transitions to Disconnected on error.
    #[must_use]
    pub fn disconnect(self) -> Session<Disconnected> {
        self.into_state(Disconnected)
    }
}

impl Session<LogoutPending> {
    /// Returns the time the Logout was sent.
    #[must_use]
    pub const fn sent_at(&self) -> Instant {
        self.state.sent_at
    }

    /// Transitions to Disconnected on Logout acknowledgement.
    #[must_use]
    pub fn on_logout_ack(self) -> Session<Disconnected> {
        self.into_state(Disconnected)
    }

    /// Transitions to Disconnected on timeout.
    #[must_use]
    pub fn on_timeout(self) -> Session<Disconnected> {
        self.into_state(Disconnected)
    }
}
