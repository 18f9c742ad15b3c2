/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! In-memory message store implementation.
//!
//! Nothing survives the process; this is the only store rfqfix ships.

use crate::traits::{MessageStore, StoredMessage};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use rfqfix_core::error::StoreError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// In-memory message store.
///
/// Messages live in a `BTreeMap` for ordered range queries.
#[derive(Debug)]
pub struct MemoryStore {
    /// Stored messages indexed by sequence number.
    messages: RwLock<BTreeMap<u64, Bytes>>,
    /// Next sender sequence number.
    next_sender_seq: AtomicU64,
    /// Next expected target sequence number.
    next_target_seq: AtomicU64,
    /// Creation time, renewed by `reset`.
    creation_time: RwLock<SystemTime>,
}

impl MemoryStore {
    /// Creates a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial_seqs(1, 1)
    }

    /// Creates a new memory store with initial sequence numbers.
    #[must_use]
    pub fn with_initial_seqs(sender_seq: u64, target_seq: u64) -> Self {
        Self {
            messages: RwLock::new(BTreeMap::new()),
            next_sender_seq: AtomicU64::new(sender_seq),
            next_target_seq: AtomicU64::new(target_seq),
            creation_time: RwLock::new(SystemTime::now()),
        }
    }

    /// Returns the number of stored messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.read().len()
    }

    /// Checks if a message with the given sequence number exists.
    #[must_use]
    pub fn contains(&self, seq_num: u64) -> bool {
        self.messages.read().contains_key(&seq_num)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn store(&self, seq_num: u64, message: &[u8]) -> Result<(), StoreError> {
        if seq_num == 0 {
            return Err(StoreError::StoreFailed {
                seq_num,
                reason: "sequence numbers start at 1".to_string(),
            });
        }
        self.messages
            .write()
            .insert(seq_num, Bytes::copy_from_slice(message));
        Ok(())
    }

    async fn get_range(&self, begin: u64, end: u64) -> Result<Vec<StoredMessage>, StoreError> {
        let end = if end == 0 { u64::MAX } else { end };
        if begin > end {
            return Ok(Vec::new());
        }

        Ok(self
            .messages
            .read()
            .range(begin..=end)
            .map(|(&seq_num, bytes)| StoredMessage {
                seq_num,
                bytes: bytes.clone(),
            })
            .collect())
    }

    fn next_sender_seq(&self) -> u64 {
        self.next_sender_seq.load(Ordering::SeqCst)
    }

    fn next_target_seq(&self) -> u64 {
        self.next_target_seq.load(Ordering::SeqCst)
    }

    fn set_next_sender_seq(&self, seq: u64) {
        self.next_sender_seq.store(seq, Ordering::SeqCst);
    }

    fn set_next_target_seq(&self, seq: u64) {
        self.next_target_seq.store(seq, Ordering::SeqCst);
    }

    async fn reset(&self) -> Result<(), StoreError> {
        self.messages.write().clear();
        self.next_sender_seq.store(1, Ordering::SeqCst);
        self.next_target_seq.store(1, Ordering::SeqCst);
        *self.creation_time.write() = SystemTime::now();
        Ok(())
    }

    fn creation_time(&self) -> SystemTime {
        *self.creation_time.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.next_sender_seq(), 1);
        assert_eq!(store.next_target_seq(), 1);
        assert_eq!(store.message_count(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_seq_zero() {
        let store = MemoryStore::new();
        assert!(store.store(0, b"msg").await.is_err());
        assert!(store.store(1, b"msg").await.is_ok());
        assert!(store.contains(1));
    }

    #[tokio::test]
    async fn test_memory_store_get_range() {
        let store = MemoryStore::new();
        for (seq, body) in [(1, "msg1"), (2, "msg2"), (3, "msg3"), (5, "msg5")] {
            store.store(seq, body.as_bytes()).await.unwrap();
        }

        let range = store.get_range(2, 5).await.unwrap();
        let seqs: Vec<u64> = range.iter().map(|m| m.seq_num).collect();
        assert_eq!(seqs, vec![2, 3, 5]);
        assert_eq!(range[0].bytes, Bytes::from_static(b"msg2"));

        let open_ended = store.get_range(3, 0).await.unwrap();
        assert_eq!(open_ended.len(), 2);

        assert!(store.get_range(6, 9).await.unwrap().is_empty());
        assert!(store.get_range(4, 4).await.unwrap().is_empty());
        assert!(store.get_range(5, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_sequence_numbers() {
        let store = MemoryStore::with_initial_seqs(10, 20);
        assert_eq!(store.next_sender_seq(), 10);
        assert_eq!(store.next_target_seq(), 20);

        store.set_next_sender_seq(11);
        assert_eq!(store.next_sender_seq(), 11);
    }

    #[tokio::test]
    async fn test_memory_store_reset() {
        let store = MemoryStore::new();
        let created = store.creation_time();

        store.store(1, b"msg1").await.unwrap();
        store.set_next_sender_seq(10);
        store.set_next_target_seq(20);

        store.reset().await.unwrap();

        assert_eq!(store.message_count(), 0);
        assert_eq!(store.next_sender_seq(), 1);
        assert_eq!(store.next_target_seq(), 1);
        assert!(store.creation_time() >= created);
        assert!(store.refresh().await.is_ok());
    }
}
