/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the rfqfix FIX engine.
//!
//! This module provides a unified error hierarchy using `thiserror`. Wire and
//! session failures have their own enums; field-level problems found while
//! reading a message are reported as [`MessageRejectError`], which carries the
//! FIX reject reason a counterparty should receive.

use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Result type alias using [`FixError`] as the error type.
pub type Result<T> = std::result::Result<T, FixError>;

/// Top-level error type for all rfqfix operations.
#[derive(Debug, Error)]
pub enum FixError {
    /// Error during message decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error during message encoding.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error in session layer operations.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Error in message store operations.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Message was rejected at field level.
    #[error("message rejected: {0}")]
    Reject(#[from] MessageRejectError),

    /// I/O error from underlying transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur during FIX message decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Message buffer is incomplete, need more data.
    #[error("incomplete message, need more data")]
    Incomplete,

    /// Invalid BeginString field (tag 8).
    #[error("invalid begin string: expected 8=FIX.x.y")]
    InvalidBeginString,

    /// Missing BodyLength field (tag 9).
    #[error("missing body length field (tag 9)")]
    MissingBodyLength,

    /// Invalid BodyLength value.
    #[error("invalid body length value")]
    InvalidBodyLength,

    /// BodyLength does not match the bytes between tag 9 and tag 10.
    #[error("body length mismatch: declared {declared}, actual {actual}")]
    BodyLengthMismatch {
        /// Declared BodyLength value.
        declared: usize,
        /// Number of body bytes actually present.
        actual: usize,
    },

    /// Missing MsgType field (tag 35).
    #[error("missing msg type field (tag 35)")]
    MissingMsgType,

    /// Invalid MsgType value.
    #[error("invalid msg type: {0}")]
    InvalidMsgType(String),

    /// Checksum mismatch between calculated and declared values.
    #[error("checksum mismatch: calculated {calculated}, declared {declared}")]
    ChecksumMismatch {
        /// Calculated checksum value.
        calculated: u8,
        /// Declared checksum value in message.
        declared: u8,
    },

    /// Invalid tag format (not a valid integer).
    #[error("invalid tag format: {0}")]
    InvalidTag(String),

    /// Missing required field.
    #[error("missing required field: tag {tag}")]
    MissingRequiredField {
        /// The tag number of the missing field.
        tag: u32,
    },

    /// Invalid field value for the expected type.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },

    /// Repeating group count mismatch.
    #[error("group count mismatch for tag {count_tag}: expected {expected}, found {actual}")]
    GroupCountMismatch {
        /// The tag containing the group count.
        count_tag: u32,
        /// Expected number of group entries.
        expected: u32,
        /// Actual number of group entries found.
        actual: u32,
    },

    /// Invalid UTF-8 in string field.
    #[error("invalid utf-8 in field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Message exceeds maximum allowed size.
    #[error("message too large: {size} bytes exceeds maximum {max_size}")]
    MessageTooLarge {
        /// Actual message size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max_size: usize,
    },
}

impl DecodeError {
    /// Returns the tag this error refers to, when there is one.
    #[must_use]
    pub const fn tag(&self) -> Option<u32> {
        match self {
            Self::MissingRequiredField { tag } | Self::InvalidFieldValue { tag, .. } => Some(*tag),
            Self::GroupCountMismatch { count_tag, .. } => Some(*count_tag),
            Self::MissingMsgType | Self::InvalidMsgType(_) => Some(35),
            Self::MissingBodyLength | Self::InvalidBodyLength => Some(9),
            Self::ChecksumMismatch { .. } => Some(10),
            _ => None,
        }
    }
}

/// Errors that occur during FIX message encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Missing required field during encoding.
    #[error("missing required field: tag {tag}")]
    MissingRequiredField {
        /// The tag number of the missing field.
        tag: u32,
    },

    /// Invalid field value for encoding.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },
}

/// Errors in FIX session layer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session is not in the correct state for the operation.
    #[error("invalid session state: expected {expected}, current {current}")]
    InvalidState {
        /// Expected state for the operation.
        expected: String,
        /// Current session state.
        current: String,
    },

    /// Logon was rejected by counterparty.
    #[error("logon rejected: {reason}")]
    LogonRejected {
        /// Reason for rejection.
        reason: String,
    },

    /// Heartbeat timeout - no response to TestRequest.
    #[error("heartbeat timeout after {elapsed_ms} milliseconds")]
    HeartbeatTimeout {
        /// Elapsed time in milliseconds since last message.
        elapsed_ms: u64,
    },

    /// Sequence number gap detected.
    #[error("sequence gap detected: expected {expected}, received {received}")]
    SequenceGap {
        /// Expected sequence number.
        expected: u64,
        /// Received sequence number.
        received: u64,
    },

    /// Sequence number too low (possible duplicate).
    #[error("sequence too low: expected >= {expected}, received {received}")]
    SequenceTooLow {
        /// Minimum expected sequence number.
        expected: u64,
        /// Received sequence number.
        received: u64,
    },

    /// BeginString or CompIDs do not belong to this session.
    #[error("message does not belong to session: {0}")]
    WrongSession(String),

    /// Session configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Errors in message store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Failed to store message.
    #[error("failed to store message seq={seq_num}: {reason}")]
    StoreFailed {
        /// Sequence number of the message.
        seq_num: u64,
        /// Reason for failure.
        reason: String,
    },

    /// Message not found in store.
    #[error("message not found: seq={seq_num}")]
    NotFound {
        /// Sequence number of the missing message.
        seq_num: u64,
    },

    /// Range of messages not available.
    #[error("messages not available for range: {range:?}")]
    RangeNotAvailable {
        /// The requested range of sequence numbers.
        range: Range<u64>,
    },
}

/// Reason attached to a [`MessageRejectError`].
///
/// Session-level reasons map to SessionRejectReason (tag 373) on a Reject
/// (35=3); business-level reasons map to BusinessRejectReason (tag 380) on a
/// BusinessMessageReject (35=j).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// 0: Invalid tag number.
    InvalidTagNumber,
    /// 1: Required tag missing.
    RequiredTagMissing,
    /// 2: Tag not defined for this message type.
    TagNotDefinedForThisMessageType,
    /// 3: Undefined tag.
    UndefinedTag,
    /// 4: Tag specified without a value.
    TagSpecifiedWithoutAValue,
    /// 5: Value is incorrect (out of range) for this tag.
    ValueIsIncorrect,
    /// 6: Incorrect data format for value.
    IncorrectDataFormat,
    /// 9: CompID problem.
    CompIdProblem,
    /// 10: SendingTime accuracy problem.
    SendingTimeAccuracyProblem,
    /// 11: Invalid MsgType.
    InvalidMsgType,
    /// 13: Tag appears more than once.
    TagAppearsMoreThanOnce,
    /// 16: Incorrect NumInGroup count for repeating group.
    IncorrectNumInGroupCount,
    /// Business 0: Other.
    Other,
    /// Business 3: Unsupported message type.
    UnsupportedMessageType,
    /// Business 5: Conditionally required field missing.
    ConditionallyRequiredFieldMissing,
}

impl RejectReason {
    /// Returns the numeric code sent on the wire.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidTagNumber | Self::Other => 0,
            Self::RequiredTagMissing => 1,
            Self::TagNotDefinedForThisMessageType => 2,
            Self::UndefinedTag | Self::UnsupportedMessageType => 3,
            Self::TagSpecifiedWithoutAValue => 4,
            Self::ValueIsIncorrect | Self::ConditionallyRequiredFieldMissing => 5,
            Self::IncorrectDataFormat => 6,
            Self::CompIdProblem => 9,
            Self::SendingTimeAccuracyProblem => 10,
            Self::InvalidMsgType => 11,
            Self::TagAppearsMoreThanOnce => 13,
            Self::IncorrectNumInGroupCount => 16,
        }
    }

    /// Returns true if this reason is reported with BusinessMessageReject.
    #[must_use]
    pub const fn is_business(self) -> bool {
        matches!(
            self,
            Self::Other | Self::UnsupportedMessageType | Self::ConditionallyRequiredFieldMissing
        )
    }

    const fn default_text(self) -> &'static str {
        match self {
            Self::InvalidTagNumber => "Invalid tag number",
            Self::RequiredTagMissing => "Required tag missing",
            Self::TagNotDefinedForThisMessageType => "Tag not defined for this message type",
            Self::UndefinedTag => "Undefined tag",
            Self::TagSpecifiedWithoutAValue => "Tag specified without a value",
            Self::ValueIsIncorrect => "Value is incorrect (out of range) for this tag",
            Self::IncorrectDataFormat => "Incorrect data format for value",
            Self::CompIdProblem => "CompID problem",
            Self::SendingTimeAccuracyProblem => "SendingTime accuracy problem",
            Self::InvalidMsgType => "Invalid MsgType",
            Self::TagAppearsMoreThanOnce => "Tag appears more than once",
            Self::IncorrectNumInGroupCount => "Incorrect NumInGroup count for repeating group",
            Self::Other => "Other",
            Self::UnsupportedMessageType => "Unsupported Message Type",
            Self::ConditionallyRequiredFieldMissing => "Conditionally Required Field Missing",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.default_text(), self.code())
    }
}

/// A message-level rejection.
///
/// Returned by typed accessors and by application callbacks. The session
/// layer turns it into a Reject or BusinessMessageReject for the counterparty.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{text}{}", ref_tag.map(|t| format!(", tag {t}")).unwrap_or_default())]
pub struct MessageRejectError {
    reason: RejectReason,
    text: String,
    ref_tag: Option<u32>,
}

impl MessageRejectError {
    /// Creates a rejection with the given reason, text and optional tag.
    #[must_use]
    pub fn new(reason: RejectReason, text: impl Into<String>, ref_tag: Option<u32>) -> Self {
        Self {
            reason,
            text: text.into(),
            ref_tag,
        }
    }

    fn with_reason(reason: RejectReason, ref_tag: Option<u32>) -> Self {
        Self::new(reason, reason.default_text(), ref_tag)
    }

    /// Required tag missing.
    #[must_use]
    pub fn required_tag_missing(tag: u32) -> Self {
        Self::with_reason(RejectReason::RequiredTagMissing, Some(tag))
    }

    /// Conditionally required field missing (business level).
    #[must_use]
    pub fn conditionally_required_field_missing(tag: u32) -> Self {
        Self::with_reason(RejectReason::ConditionallyRequiredFieldMissing, Some(tag))
    }

    /// Incorrect data format for value.
    #[must_use]
    pub fn incorrect_data_format(tag: u32) -> Self {
        Self::with_reason(RejectReason::IncorrectDataFormat, Some(tag))
    }

    /// Value is incorrect (out of range) for this tag.
    #[must_use]
    pub fn value_is_incorrect(tag: u32) -> Self {
        Self::with_reason(RejectReason::ValueIsIncorrect, Some(tag))
    }

    /// Tag not defined for this message type.
    #[must_use]
    pub fn tag_not_defined_for_message_type(tag: u32) -> Self {
        Self::with_reason(RejectReason::TagNotDefinedForThisMessageType, Some(tag))
    }

    /// Undefined tag.
    #[must_use]
    pub fn undefined_tag(tag: u32) -> Self {
        Self::with_reason(RejectReason::UndefinedTag, Some(tag))
    }

    /// Tag appears more than once.
    #[must_use]
    pub fn tag_appears_more_than_once(tag: u32) -> Self {
        Self::with_reason(RejectReason::TagAppearsMoreThanOnce, Some(tag))
    }

    /// Tag specified without a value.
    #[must_use]
    pub fn tag_specified_without_a_value(tag: u32) -> Self {
        Self::with_reason(RejectReason::TagSpecifiedWithoutAValue, Some(tag))
    }

    /// Incorrect NumInGroup count for repeating group.
    #[must_use]
    pub fn incorrect_num_in_group_count(tag: u32) -> Self {
        Self::with_reason(RejectReason::IncorrectNumInGroupCount, Some(tag))
    }

    /// Invalid MsgType.
    #[must_use]
    pub fn invalid_msg_type() -> Self {
        Self::with_reason(RejectReason::InvalidMsgType, Some(35))
    }

    /// CompID problem.
    #[must_use]
    pub fn comp_id_problem() -> Self {
        Self::with_reason(RejectReason::CompIdProblem, None)
    }

    /// Unsupported message type (business level).
    #[must_use]
    pub fn unsupported_message_type() -> Self {
        Self::with_reason(RejectReason::UnsupportedMessageType, None)
    }

    /// Free-text business rejection.
    #[must_use]
    pub fn other(text: impl Into<String>) -> Self {
        Self::new(RejectReason::Other, text, None)
    }

    /// Returns the reject reason.
    #[must_use]
    pub const fn reason(&self) -> RejectReason {
        self.reason
    }

    /// Returns the reject text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the tag that caused the rejection, if any.
    #[must_use]
    pub const fn ref_tag(&self) -> Option<u32> {
        self.ref_tag
    }

    /// Returns true if this is answered with BusinessMessageReject.
    #[must_use]
    pub const fn is_business(&self) -> bool {
        self.reason.is_business()
    }
}
