/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Tokio codec for FIX message framing.
//!
//! Frames are located from the BeginString and BodyLength prefix. A frame
//! whose body length or checksum does not verify is dropped with a warning,
//! the way FIX engines ignore garbled messages; errors that leave the stream
//! unsynchronised are returned to the caller.

use bytes::{BufMut, Bytes, BytesMut};
use rfqfix_core::error::{DecodeError, EncodeError};
use rfqfix_tagvalue::{Message, frame_length};
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

/// Errors that can occur during codec operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stream does not start with a valid FIX prefix.
    #[error("framing error: {0}")]
    Decode(#[from] DecodeError),

    /// Outbound message could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Message exceeds maximum size.
    #[error("message too large: {size} bytes exceeds maximum {max_size}")]
    MessageTooLarge {
        /// Actual message size.
        size: usize,
        /// Maximum allowed size.
        max_size: usize,
    },

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tokio codec for FIX message framing.
///
/// Decodes complete frames into [`Message`]s, validating BeginString,
/// BodyLength, and optionally Checksum.
#[derive(Debug, Clone)]
pub struct FixCodec {
    /// Maximum message size in bytes.
    max_message_size: usize,
    /// Whether to validate checksums.
    validate_checksum: bool,
}

impl FixCodec {
    /// Creates a new codec with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_message_size: 1024 * 1024,
            validate_checksum: true,
        }
    }

    /// Sets the maximum message size.
    #[must_use]
    pub const fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Sets whether to validate checksums.
    #[must_use]
    pub const fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }
}

impl Default for FixCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FixCodec {
    type Item = Message;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(total_length) = frame_length(src)? else {
                if src.len() > self.max_message_size {
                    return Err(CodecError::MessageTooLarge {
                        size: src.len(),
                        max_size: self.max_message_size,
                    });
                }
                return Ok(None);
            };

            if total_length > self.max_message_size {
                return Err(CodecError::MessageTooLarge {
                    size: total_length,
                    max_size: self.max_message_size,
                });
            }

            if src.len() < total_length {
                src.reserve(total_length - src.len());
                return Ok(None);
            }

            let frame = src.split_to(total_length);
            match Message::parse_with(&frame, self.validate_checksum) {
                Ok(message) => return Ok(Some(message)),
                Err(err) => {
                    warn!(%err, len = frame.len(), "dropping garbled message");
                }
            }
        }
    }
}

impl Encoder<Message> for FixCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = item.build()?;
        dst.reserve(bytes.len());
        dst.put_slice(&bytes);
        Ok(())
    }
}

impl Encoder<Bytes> for FixCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        dst.put_slice(&item);
        Ok(())
    }
}
