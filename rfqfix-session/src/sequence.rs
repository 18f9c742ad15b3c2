/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Sequence number management.
//!
//! [`SequenceManager`] keeps the two MsgSeqNum counters of a session and
//! writes every change through to its [`MessageStore`], so a reconnect
//! resumes where the last connection stopped.

use rfqfix_core::types::SeqNum;
use rfqfix_store::MessageStore;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Where an inbound MsgSeqNum falls relative to the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqCheck {
    /// Exactly the expected number.
    InOrder,
    /// Below the expected number: a duplicate or a counterparty fault.
    Duplicate {
        /// Number that was expected.
        expected: u64,
    },
    /// Above the expected number: messages are missing.
    Gap {
        /// First missing number.
        expected: u64,
    },
}

/// Sender and target counters of one session, persisted on every change.
pub struct SequenceManager {
    next_sender: AtomicU64,
    next_target: AtomicU64,
    store: Arc<dyn MessageStore>,
}

impl fmt::Debug for SequenceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceManager")
            .field("next_sender", &self.next_sender.load(Ordering::SeqCst))
            .field("next_target", &self.next_target.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl SequenceManager {
    /// Loads the counters held by `store`.
    #[must_use]
    pub fn load(store: Arc<dyn MessageStore>) -> Self {
        Self {
            next_sender: AtomicU64::new(store.next_sender_seq()),
            next_target: AtomicU64::new(store.next_target_seq()),
            store,
        }
    }

    /// MsgSeqNum the next outbound message will carry.
    #[inline]
    #[must_use]
    pub fn next_sender(&self) -> SeqNum {
        SeqNum::new(self.next_sender.load(Ordering::SeqCst))
    }

    /// MsgSeqNum expected on the next inbound message.
    #[inline]
    #[must_use]
    pub fn next_target(&self) -> SeqNum {
        SeqNum::new(self.next_target.load(Ordering::SeqCst))
    }

    /// Takes the next outbound number.
    pub fn allocate_sender(&self) -> SeqNum {
        let seq = self.next_sender.fetch_add(1, Ordering::SeqCst);
        self.store.set_next_sender_seq(seq + 1);
        SeqNum::new(seq)
    }

    /// Records that the expected inbound message was consumed.
    pub fn advance_target(&self) {
        let next = self.next_target.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.set_next_target_seq(next);
    }

    /// Moves the expected inbound number, as SequenceReset does.
    pub fn set_target(&self, seq: u64) {
        self.next_target.store(seq, Ordering::SeqCst);
        self.store.set_next_target_seq(seq);
    }

    /// Restarts both counters at 1.
    pub fn reset(&self) {
        self.next_sender.store(1, Ordering::SeqCst);
        self.next_target.store(1, Ordering::SeqCst);
        self.store.set_next_sender_seq(1);
        self.store.set_next_target_seq(1);
    }

    /// Classifies an inbound MsgSeqNum.
    #[must_use]
    pub fn check(&self, received: u64) -> SeqCheck {
        let expected = self.next_target.load(Ordering::SeqCst);
        match received.cmp(&expected) {
            std::cmp::Ordering::Equal => SeqCheck::InOrder,
            std::cmp::Ordering::Less => SeqCheck::Duplicate { expected },
            std::cmp::Ordering::Greater => SeqCheck::Gap { expected },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfqfix_store::MemoryStore;

    #[test]
    fn test_counters_write_through() {
        let store = Arc::new(MemoryStore::with_initial_seqs(7, 3));
        let sequences = SequenceManager::load(store.clone());
        assert_eq!(sequences.next_sender().value(), 7);
        assert_eq!(sequences.next_target().value(), 3);

        assert_eq!(sequences.allocate_sender().value(), 7);
        sequences.advance_target();
        assert_eq!(store.next_sender_seq(), 8);
        assert_eq!(store.next_target_seq(), 4);

        sequences.set_target(10);
        assert_eq!(store.next_target_seq(), 10);
    }

    #[test]
    fn test_check() {
        let sequences = SequenceManager::load(Arc::new(MemoryStore::new()));
        assert_eq!(sequences.check(1), SeqCheck::InOrder);

        sequences.set_target(5);
        assert_eq!(sequences.check(4), SeqCheck::Duplicate { expected: 5 });
        assert_eq!(sequences.check(5), SeqCheck::InOrder);
        assert_eq!(sequences.check(9), SeqCheck::Gap { expected: 5 });
    }

    #[test]
    fn test_reset() {
        let store = Arc::new(MemoryStore::with_initial_seqs(100, 200));
        let sequences = SequenceManager::load(store.clone());

        sequences.reset();
        assert_eq!(sequences.next_sender().value(), 1);
        assert_eq!(sequences.next_target().value(), 1);
        assert_eq!(store.next_sender_seq(), 1);
        assert_eq!(store.next_target_seq(), 1);
    }
}
