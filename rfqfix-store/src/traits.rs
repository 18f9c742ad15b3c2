/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message store trait definition.

use async_trait::async_trait;
use bytes::Bytes;
use rfqfix_core::error::StoreError;

/// An outbound message kept for resend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// MsgSeqNum the message was sent with.
    pub seq_num: u64,
    /// Complete encoded message.
    pub bytes: Bytes,
}

/// Storage for session sequence numbers and sent messages.
///
/// Sent messages are kept so a ResendRequest can be answered.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Stores an outgoing message for potential resend.
    ///
    /// # Errors
    /// Returns `StoreError` if the message cannot be stored.
    async fn store(&self, seq_num: u64, message: &[u8]) -> Result<(), StoreError>;

    /// Retrieves stored messages in `begin..=end`, ordered by sequence number.
    ///
    /// An `end` of 0 means no upper bound. Sequence numbers with nothing
    /// stored are simply absent from the result.
    ///
    /// # Errors
    /// Returns `StoreError` if messages cannot be retrieved.
    async fn get_range(&self, begin: u64, end: u64) -> Result<Vec<StoredMessage>, StoreError>;

    /// Returns the next sender sequence number.
    fn next_sender_seq(&self) -> u64;

    /// Returns the next expected target sequence number.
    fn next_target_seq(&self) -> u64;

    /// Sets the next sender sequence number.
    fn set_next_sender_seq(&self, seq: u64);

    /// Sets the next expected target sequence number.
    fn set_next_target_seq(&self, seq: u64);

    /// Clears all messages and resets both sequence numbers to 1.
    ///
    /// # Errors
    /// Returns `StoreError` if the reset fails.
    async fn reset(&self) -> Result<(), StoreError>;

    /// Returns the creation time of the session state.
    fn creation_time(&self) -> std::time::SystemTime;

    /// Reloads state from the backing storage, if any.
    ///
    /// # Errors
    /// Returns `StoreError` if the refresh fails.
    async fn refresh(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
