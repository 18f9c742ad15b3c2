/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Field types and traits for FIX protocol messages.
//!
//! This module provides:
//! - [`FieldTag`]: Type-safe wrapper for FIX field tag numbers
//! - [`FieldRef`]: Zero-copy reference to a field within a message buffer
//! - [`FieldValue`]: Enumeration of possible field value types
//! - [`FieldCodec`]: Value-level wire encoding for field value types
//! - [`FixField`]: Trait for typed field access

use crate::error::DecodeError;
use crate::types::{SeqNum, Side, Timestamp};
use bytes::Bytes;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// FIX field tag number.
///
/// Tags are positive integers that identify fields within a FIX message.
/// Standard tags are defined in the FIX specification (1-5000 range),
/// while user-defined tags use the 5001+ range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct FieldTag(u32);

impl FieldTag {
    /// Creates a new field tag.
    ///
    /// # Arguments
    /// * `tag` - The tag number (must be > 0)
    #[inline]
    #[must_use]
    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    /// Returns the raw tag number.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns true if this is a standard FIX tag (1-5000).
    #[inline]
    #[must_use]
    pub const fn is_standard(self) -> bool {
        self.0 >= 1 && self.0 <= 5000
    }

    /// Returns true if this is a user-defined tag (5001+).
    #[inline]
    #[must_use]
    pub const fn is_user_defined(self) -> bool {
        self.0 > 5000
    }
}

impl From<u32> for FieldTag {
    fn from(tag: u32) -> Self {
        Self(tag)
    }
}

impl From<FieldTag> for u32 {
    fn from(tag: FieldTag) -> Self {
        tag.0
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-copy reference to a field within a FIX message buffer.
///
/// This struct holds references to the original message buffer,
/// avoiding allocation during parsing.
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    /// The field tag number.
    pub tag: u32,
    /// Reference to the field value bytes (without delimiters).
    pub value: &'a [u8],
}

impl<'a> FieldRef<'a> {
    /// Creates a new field reference.
    ///
    /// # Arguments
    /// * `tag` - The field tag number
    /// * `value` - Reference to the value bytes
    #[inline]
    #[must_use]
    pub const fn new(tag: u32, value: &'a [u8]) -> Self {
        Self { tag, value }
    }

    /// Returns the field tag.
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> FieldTag {
        FieldTag(self.tag)
    }

    /// Returns the value as a string slice.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidUtf8` if the value is not valid UTF-8.
    pub fn as_str(&self) -> Result<&'a str, DecodeError> {
        std::str::from_utf8(self.value).map_err(DecodeError::from)
    }

    /// Returns the value as an owned String.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidUtf8` if the value is not valid UTF-8.
    pub fn to_string(&self) -> Result<String, DecodeError> {
        self.as_str().map(String::from)
    }

    /// Parses the value as the specified type.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if parsing fails.
    pub fn parse<T: FromStr>(&self) -> Result<T, DecodeError> {
        let s = self.as_str()?;
        s.parse().map_err(|_| DecodeError::InvalidFieldValue {
            tag: self.tag,
            reason: format!("failed to parse '{}' as {}", s, std::any::type_name::<T>()),
        })
    }

    /// Returns the value as a u64.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid integer.
    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        self.parse()
    }

    /// Returns the value as an i64.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid integer.
    pub fn as_i64(&self) -> Result<i64, DecodeError> {
        self.parse()
    }

    /// Returns the value as a Decimal.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid decimal.
    pub fn as_decimal(&self) -> Result<Decimal, DecodeError> {
        self.parse()
    }

    /// Returns the value as a bool (FIX uses 'Y'/'N').
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not 'Y' or 'N'.
    pub fn as_bool(&self) -> Result<bool, DecodeError> {
        match self.value {
            b"Y" => Ok(true),
            b"N" => Ok(false),
            _ => Err(DecodeError::InvalidFieldValue {
                tag: self.tag,
                reason: "expected 'Y' or 'N'".to_string(),
            }),
        }
    }

    /// Returns the value as a single character.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a single ASCII character.
    pub fn as_char(&self) -> Result<char, DecodeError> {
        if self.value.len() == 1 && self.value[0].is_ascii() {
            Ok(self.value[0] as char)
        } else {
            Err(DecodeError::InvalidFieldValue {
                tag: self.tag,
                reason: "expected single ASCII character".to_string(),
            })
        }
    }

    /// Returns the raw bytes of the value.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.value
    }

    /// Returns the length of the value in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns true if the value is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Enumeration of possible FIX field value types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// String value.
    String(String),
    /// Integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Decimal/float value.
    Decimal(Decimal),
    /// Boolean value (Y/N).
    Bool(bool),
    /// Single character value.
    Char(char),
    /// UTC timestamp value.
    Timestamp(Timestamp),
    /// Raw bytes (for data fields).
    Data(Bytes),
}

impl FieldValue {
    /// Returns the value as a string, if it is a String variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an Int variant.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a u64, if it is a UInt variant.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a Decimal, if it is a Decimal variant.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a bool, if it is a Bool variant.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a char, if it is a Char variant.
    #[must_use]
    pub const fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", if *v { "Y" } else { "N" }),
            Self::Char(c) => write!(f, "{}", c),
            Self::Timestamp(ts) => write!(f, "{}", ts),
            Self::Data(d) => write!(f, "<{} bytes>", d.len()),
        }
    }
}

/// Wire encoding of a field value type.
///
/// Implemented for every Rust type that backs a FIX field. The tag is only
/// used to label decode errors.
pub trait FieldCodec: Sized {
    /// Decodes a value from the raw field bytes.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the bytes are malformed.
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError>;

    /// Appends the wire form of the value to `buf`.
    fn encode_value(&self, buf: &mut Vec<u8>);
}

fn invalid(tag: u32, reason: impl Into<String>) -> DecodeError {
    DecodeError::InvalidFieldValue {
        tag,
        reason: reason.into(),
    }
}

impl FieldCodec for String {
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        FieldRef::new(tag, bytes).to_string()
    }

    fn encode_value(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl FieldCodec for u64 {
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        FieldRef::new(tag, bytes).as_u64()
    }

    fn encode_value(&self, buf: &mut Vec<u8>) {
        let mut fmt = itoa::Buffer::new();
        buf.extend_from_slice(fmt.format(*self).as_bytes());
    }
}

impl FieldCodec for i64 {
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        FieldRef::new(tag, bytes).as_i64()
    }

    fn encode_value(&self, buf: &mut Vec<u8>) {
        let mut fmt = itoa::Buffer::new();
        buf.extend_from_slice(fmt.format(*self).as_bytes());
    }
}

impl FieldCodec for Decimal {
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        FieldRef::new(tag, bytes).as_decimal()
    }

    fn encode_value(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.to_string().as_bytes());
    }
}

impl FieldCodec for bool {
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        FieldRef::new(tag, bytes).as_bool()
    }

    fn encode_value(&self, buf: &mut Vec<u8>) {
        buf.push(if *self { b'Y' } else { b'N' });
    }
}

impl FieldCodec for char {
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        FieldRef::new(tag, bytes).as_char()
    }

    fn encode_value(&self, buf: &mut Vec<u8>) {
        let mut tmp = [0u8; 4];
        buf.extend_from_slice(self.encode_utf8(&mut tmp).as_bytes());
    }
}

impl FieldCodec for SeqNum {
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        u64::decode_value(tag, bytes).map(SeqNum::new)
    }

    fn encode_value(&self, buf: &mut Vec<u8>) {
        self.value().encode_value(buf);
    }
}

impl FieldCodec for Timestamp {
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        let s = FieldRef::new(tag, bytes).as_str()?;
        Timestamp::parse_fix(s).map_err(|e| invalid(tag, format!("bad UTCTimestamp '{s}': {e}")))
    }

    fn encode_value(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.format_millis().as_bytes());
    }
}

impl FieldCodec for Side {
    fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        match bytes {
            [b] => Side::try_from(*b).map_err(|()| invalid(tag, "unknown side")),
            _ => Err(invalid(tag, "expected single character side")),
        }
    }

    fn encode_value(&self, buf: &mut Vec<u8>) {
        buf.push(*self as u8);
    }
}

/// Trait for typed FIX field access.
///
/// This trait is implemented by generated field types to provide
/// type-safe access to field values.
pub trait FixField: Sized {
    /// The tag number for this field.
    const TAG: u32;

    /// The Rust type for this field's value.
    type Value;

    /// Decodes the field value from a byte slice.
    ///
    /// # Errors
    /// Returns `DecodeError` if the value cannot be decoded.
    fn decode(bytes: &[u8]) -> Result<Self::Value, DecodeError>;

    /// Encodes the field value to bytes.
    fn encode(value: &Self::Value, buf: &mut Vec<u8>);
}
