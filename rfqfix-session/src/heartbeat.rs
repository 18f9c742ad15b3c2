/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Heartbeat and TestRequest management.
//!
//! This module handles FIX session heartbeat logic including:
//! - Sending heartbeats at configured intervals
//! - Sending TestRequest when the counterparty goes quiet
//! - Detecting heartbeat timeouts
//!
//! Every check takes the current [`Instant`] so the session driver can be
//! exercised with synthetic clocks.

use std::time::{Duration, Instant};

/// Manages heartbeat timing for a FIX session.
#[derive(Debug)]
pub struct HeartbeatManager {
    /// Heartbeat interval.
    interval: Duration,
    /// Time of last message sent.
    last_sent: Instant,
    /// Time of last message received.
    last_received: Instant,
    /// Pending TestRequest ID, if any.
    test_request_pending: Option<String>,
    /// Time when TestRequest was sent.
    test_request_sent_at: Option<Instant>,
}

impl HeartbeatManager {
    /// Creates a new heartbeat manager with the specified interval.
    ///
    /// # Arguments
    /// * `interval` - The heartbeat interval
    /// * `now` - Starting point for both send and receive clocks
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_sent: now,
            last_received: now,
            test_request_pending: None,
            test_request_sent_at: None,
        }
    }

    /// Records that a message was sent.
    #[inline]
    pub fn on_message_sent(&mut self, now: Instant) {
        self.last_sent = now;
    }

    /// Records that a message was received.
    ///
    /// Any inbound traffic proves the counterparty is alive, so a pending
    /// TestRequest is cleared. Returns true when `test_req_id` answers it.
    pub fn on_message_received(&mut self, now: Instant, test_req_id: Option<&str>) -> bool {
        self.last_received = now;

        let answered = matches!(
            (&self.test_request_pending, test_req_id),
            (Some(pending), Some(received)) if pending == received
        );
        self.test_request_pending = None;
        self.test_request_sent_at = None;
        answered
    }

    /// Checks if a heartbeat should be sent.
    ///
    /// A heartbeat should be sent if no message has been sent within the interval.
    #[must_use]
    pub fn should_send_heartbeat(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_sent) >= self.interval
    }

    /// Checks if a TestRequest should be sent.
    ///
    /// Fires when nothing has been received for 1.2 intervals and no
    /// TestRequest is outstanding.
    #[must_use]
    pub fn should_send_test_request(&self, now: Instant) -> bool {
        if self.test_request_pending.is_some() {
            return false;
        }

        now.saturating_duration_since(self.last_received) >= self.interval * 6 / 5
    }

    /// Checks if the session has timed out.
    ///
    /// A timeout occurs if a TestRequest was sent but nothing was received
    /// within one further interval.
    #[must_use]
    pub fn is_timed_out(&self, now: Instant) -> bool {
        self.test_request_sent_at
            .is_some_and(|sent_at| now.saturating_duration_since(sent_at) >= self.interval)
    }

    /// Records that a TestRequest was sent.
    ///
    /// # Arguments
    /// * `test_req_id` - The TestReqID that was sent
    /// * `now` - Send time
    pub fn on_test_request_sent(&mut self, test_req_id: String, now: Instant) {
        self.test_request_pending = Some(test_req_id);
        self.test_request_sent_at = Some(now);
        self.last_sent = now;
    }

    /// Returns the pending TestRequest ID, if any.
    #[must_use]
    pub fn pending_test_request(&self) -> Option<&str> {
        self.test_request_pending.as_deref()
    }

    /// Returns the time since the last message was received.
    #[must_use]
    pub fn time_since_last_received(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_received)
    }

    /// Returns the heartbeat interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Changes the heartbeat interval, e.g. to the HeartBtInt of a Logon.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Resets the manager state.
    pub fn reset(&mut self, now: Instant) {
        self.last_sent = now;
        self.last_received = now;
        self.test_request_pending = None;
        self.test_request_sent_at = None;
    }
}

/// Generates a unique TestReqID.
///
/// Uses the current timestamp in nanoseconds.
#[must_use]
pub fn generate_test_req_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    format!("TEST{nanos}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECS_30: Duration = Duration::from_secs(30);

    #[test]
    fn test_heartbeat_manager_new() {
        let mgr = HeartbeatManager::new(SECS_30, Instant::now());
        assert_eq!(mgr.interval(), SECS_30);
        assert!(mgr.pending_test_request().is_none());
    }

    #[test]
    fn test_should_send_heartbeat() {
        let start = Instant::now();
        let mut mgr = HeartbeatManager::new(SECS_30, start);
        assert!(!mgr.should_send_heartbeat(start + Duration::from_secs(29)));
        assert!(mgr.should_send_heartbeat(start + SECS_30));

        mgr.on_message_sent(start + SECS_30);
        assert!(!mgr.should_send_heartbeat(start + Duration::from_secs(45)));
    }

    #[test]
    fn test_should_send_test_request() {
        let start = Instant::now();
        let mut mgr = HeartbeatManager::new(SECS_30, start);
        assert!(!mgr.should_send_test_request(start + SECS_30));
        assert!(mgr.should_send_test_request(start + Duration::from_secs(36)));

        mgr.on_test_request_sent("TEST1".to_string(), start + Duration::from_secs(36));
        assert!(!mgr.should_send_test_request(start + Duration::from_secs(40)));
    }

    #[test]
    fn test_timeout_after_unanswered_test_request() {
        let start = Instant::now();
        let mut mgr = HeartbeatManager::new(SECS_30, start);
        let sent = start + Duration::from_secs(36);
        mgr.on_test_request_sent("TEST1".to_string(), sent);

        assert!(!mgr.is_timed_out(sent + Duration::from_secs(29)));
        assert!(mgr.is_timed_out(sent + SECS_30));
    }

    #[test]
    fn test_test_request_answered() {
        let start = Instant::now();
        let mut mgr = HeartbeatManager::new(SECS_30, start);

        mgr.on_test_request_sent("TEST123".to_string(), start);
        assert_eq!(mgr.pending_test_request(), Some("TEST123"));

        assert!(mgr.on_message_received(start + Duration::from_secs(1), Some("TEST123")));
        assert!(mgr.pending_test_request().is_none());
        assert!(!mgr.is_timed_out(start + Duration::from_secs(60)));
    }

    #[test]
    fn test_set_interval() {
        let start = Instant::now();
        let mut mgr = HeartbeatManager::new(SECS_30, start);
        mgr.set_interval(Duration::from_secs(5));
        assert!(mgr.should_send_heartbeat(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_generate_test_req_id() {
        let id = generate_test_req_id();
        assert!(id.starts_with("TEST"));
        assert!(id.len() > 4);
    }
}
