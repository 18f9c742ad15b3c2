/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Untyped FIX messages.
//!
//! This module provides:
//! - [`Message`]: Owned message split into header, body and trailer
//! - [`FixMessage`]: Trait implemented by typed message wrappers

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::fieldmap::FieldMap;
use bytes::Bytes;
use rfqfix_core::error::{DecodeError, EncodeError, MessageRejectError};
use rfqfix_core::message::{MsgType, RawMessage};
use std::fmt;

/// Standard header tags for FIX 4.2.
pub const HEADER_TAGS: &[u32] = &[
    8, 9, 35, 49, 56, 115, 128, 90, 91, 34, 50, 142, 57, 143, 116, 144, 129, 145, 43, 97, 52, 122,
    212, 213, 347, 369, 370,
];

/// Standard trailer tags.
pub const TRAILER_TAGS: &[u32] = &[93, 89, 10];

/// Returns true if `tag` belongs in the standard header.
#[inline]
#[must_use]
pub fn is_header_tag(tag: u32) -> bool {
    HEADER_TAGS.contains(&tag)
}

/// Returns true if `tag` belongs in the standard trailer.
#[inline]
#[must_use]
pub fn is_trailer_tag(tag: u32) -> bool {
    TRAILER_TAGS.contains(&tag)
}

/// An owned FIX message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Standard header fields.
    pub header: FieldMap,
    /// Message body fields.
    pub body: FieldMap,
    /// Standard trailer fields.
    pub trailer: FieldMap,
}

impl Message {
    /// Creates an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a message with BeginString and MsgType set.
    #[must_use]
    pub fn with_type(begin_string: &str, msg_type: &str) -> Self {
        let mut message = Self::new();
        message.header.set_str(8, begin_string);
        message.header.set_str(35, msg_type);
        message
    }

    /// Parses and validates one complete message.
    ///
    /// # Errors
    /// Returns `DecodeError` on framing, body length or checksum errors.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::parse_with(bytes, true)
    }

    /// Parses one complete message, optionally skipping checksum validation.
    ///
    /// # Errors
    /// Returns `DecodeError` on framing or body length errors.
    pub fn parse_with(bytes: &[u8], validate_checksum: bool) -> Result<Self, DecodeError> {
        let raw = Decoder::new(bytes)
            .with_checksum_validation(validate_checksum)
            .decode()?;
        Ok(Self::from_raw(&raw))
    }

    /// Copies a zero-copy view into an owned message.
    #[must_use]
    pub fn from_raw(raw: &RawMessage<'_>) -> Self {
        let mut message = Self::new();
        for field in raw.fields() {
            let value = Bytes::copy_from_slice(field.value);
            if is_header_tag(field.tag) {
                message.header.push_raw(field.tag, value);
            } else if is_trailer_tag(field.tag) {
                message.trailer.push_raw(field.tag, value);
            } else {
                message.body.push_raw(field.tag, value);
            }
        }
        message
    }

    /// Serializes the message.
    ///
    /// BeginString, BodyLength and MsgType come first, followed by the rest
    /// of the header, the body and the trailer. BodyLength and CheckSum are
    /// always recomputed.
    ///
    /// # Errors
    /// Returns `EncodeError::MissingRequiredField` if tag 8 or 35 is absent.
    pub fn build(&self) -> Result<Bytes, EncodeError> {
        let begin_string = self
            .header
            .get_str(8)
            .filter(|s| !s.is_empty())
            .ok_or(EncodeError::MissingRequiredField { tag: 8 })?;
        let msg_type = self
            .header
            .get_raw(35)
            .filter(|v| !v.is_empty())
            .ok_or(EncodeError::MissingRequiredField { tag: 35 })?;

        let mut encoder = Encoder::new(begin_string);
        encoder.put_raw(35, msg_type);
        for field in self.header.iter().filter(|f| !matches!(f.tag, 8 | 9 | 35)) {
            encoder.put_raw(field.tag, &field.value);
        }
        for field in self.body.iter() {
            encoder.put_raw(field.tag, &field.value);
        }
        for field in self.trailer.iter().filter(|f| f.tag != 10) {
            encoder.put_raw(field.tag, &field.value);
        }
        Ok(encoder.finish().freeze())
    }

    /// Returns the BeginString, if set.
    #[must_use]
    pub fn begin_string(&self) -> Option<&str> {
        self.header.get_str(8)
    }

    /// Returns the MsgType.
    ///
    /// # Errors
    /// `RequiredTagMissing` if tag 35 is absent, `InvalidMsgType` if empty.
    pub fn msg_type(&self) -> Result<MsgType, MessageRejectError> {
        let raw = self
            .header
            .get_str(35)
            .ok_or_else(|| MessageRejectError::required_tag_missing(35))?;
        if raw.is_empty() {
            return Err(MessageRejectError::invalid_msg_type());
        }
        Ok(MsgType::from(raw))
    }

    /// Returns true if the MsgType is a session-level message.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.msg_type().is_ok_and(|t| t.is_admin())
    }
}

impl fmt::Display for Message {
    /// Renders the message with `|` in place of SOH, for logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in self
            .header
            .iter()
            .chain(self.body.iter())
            .chain(self.trailer.iter())
        {
            write!(f, "{}={}|", field.tag, String::from_utf8_lossy(&field.value))?;
        }
        Ok(())
    }
}

/// Typed view over a [`Message`].
///
/// Implemented through `#[derive(FixMessage)]` by the generated message
/// types of a FIX version crate.
pub trait FixMessage: Sized {
    /// BeginString (tag 8) of the message.
    const BEGIN_STRING: &'static str;

    /// MsgType (tag 35) of the message.
    const MSG_TYPE: &'static str;

    /// Wraps an untyped message.
    fn from_message(message: Message) -> Self;

    /// Unwraps into the untyped message.
    fn to_message(self) -> Message;

    /// Borrows the untyped message.
    fn message(&self) -> &Message;

    /// Mutably borrows the untyped message.
    fn message_mut(&mut self) -> &mut Message;

    /// Creates an untyped message with this type's BeginString and MsgType.
    #[must_use]
    fn new_message() -> Message {
        Message::with_type(Self::BEGIN_STRING, Self::MSG_TYPE)
    }

    /// Serializes the wrapped message.
    ///
    /// # Errors
    /// Returns `EncodeError` if the header lacks BeginString or MsgType.
    fn build(&self) -> Result<Bytes, EncodeError> {
        self.message().build()
    }
}
