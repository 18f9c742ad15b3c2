/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Zero-copy FIX message decoder.
//!
//! The decoder parses one tag=value message without allocating for field
//! values. Every returned field borrows from the input buffer.

use crate::checksum::{calculate_checksum, parse_checksum};
use memchr::memchr;
use rfqfix_core::error::DecodeError;
use rfqfix_core::field::FieldRef;
use rfqfix_core::message::{MsgType, RawMessage};
use smallvec::SmallVec;
use std::ops::Range;

/// SOH (Start of Header) delimiter used in FIX messages.
pub const SOH: u8 = 0x01;

/// Equals sign delimiter between tag and value.
pub const EQUALS: u8 = b'=';

/// Zero-copy FIX message decoder.
#[derive(Debug)]
pub struct Decoder<'a> {
    /// Input buffer.
    input: &'a [u8],
    /// Current position in the buffer.
    offset: usize,
    /// Whether to validate checksums.
    validate_checksum: bool,
}

impl<'a> Decoder<'a> {
    /// Creates a new decoder for the given input buffer.
    #[inline]
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            validate_checksum: true,
        }
    }

    /// Sets whether to validate checksums during decoding.
    #[inline]
    #[must_use]
    pub const fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }

    /// Decodes one complete FIX message starting at the current offset.
    ///
    /// BeginString, BodyLength and MsgType must be the first three fields.
    /// BodyLength must equal the byte count from the end of tag 9 up to
    /// `10=`, and the checksum is verified unless disabled.
    ///
    /// # Errors
    /// Returns `DecodeError` if the message is malformed or incomplete.
    pub fn decode(&mut self) -> Result<RawMessage<'a>, DecodeError> {
        let start_offset = self.offset;

        let begin_string_field = self.next_field().ok_or(DecodeError::Incomplete)?;
        if begin_string_field.tag != 8 || begin_string_field.is_empty() {
            return Err(DecodeError::InvalidBeginString);
        }
        let begin_string = self.last_value_range(&begin_string_field);

        let body_length_field = self.next_field().ok_or(DecodeError::MissingBodyLength)?;
        if body_length_field.tag != 9 {
            return Err(DecodeError::MissingBodyLength);
        }
        let body_length: usize = body_length_field
            .as_str()
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(DecodeError::InvalidBodyLength)?;

        let body_start = self.offset;

        let msg_type_field = self.next_field().ok_or(DecodeError::MissingMsgType)?;
        if msg_type_field.tag != 35 {
            return Err(DecodeError::MissingMsgType);
        }
        if msg_type_field.is_empty() {
            return Err(DecodeError::InvalidMsgType(String::new()));
        }
        let msg_type = MsgType::from(msg_type_field.as_str()?);

        let mut fields: SmallVec<[FieldRef<'a>; 32]> = SmallVec::new();
        fields.push(begin_string_field);
        fields.push(body_length_field);
        fields.push(msg_type_field);

        let (checksum_start, checksum_field) = loop {
            let field_start = self.offset;
            let field = self.next_field().ok_or(DecodeError::Incomplete)?;
            if field.tag == 10 {
                break (field_start, field);
            }
            fields.push(field);
        };

        let actual = checksum_start - body_start;
        if actual != body_length {
            return Err(DecodeError::BodyLengthMismatch {
                declared: body_length,
                actual,
            });
        }

        if self.validate_checksum {
            let declared =
                parse_checksum(checksum_field.value).ok_or_else(|| DecodeError::InvalidFieldValue {
                    tag: 10,
                    reason: "invalid checksum format".to_string(),
                })?;
            let calculated = calculate_checksum(&self.input[start_offset..checksum_start]);
            if calculated != declared {
                return Err(DecodeError::ChecksumMismatch {
                    calculated,
                    declared,
                });
            }
        }
        fields.push(checksum_field);

        Ok(RawMessage::new(
            &self.input[start_offset..self.offset],
            begin_string.start - start_offset..begin_string.end - start_offset,
            body_start - start_offset..checksum_start - start_offset,
            msg_type,
            fields,
        ))
    }

    /// Parses the next field from the buffer.
    ///
    /// Returns `None` if the buffer is exhausted, the next field is not
    /// terminated by SOH, or its tag is not a number.
    #[inline]
    pub fn next_field(&mut self) -> Option<FieldRef<'a>> {
        let remaining = self.input.get(self.offset..)?;
        if remaining.is_empty() {
            return None;
        }

        let eq_pos = memchr(EQUALS, remaining)?;
        let tag = parse_tag(&remaining[..eq_pos])?;

        let value_start = eq_pos + 1;
        let soh_pos = memchr(SOH, &remaining[value_start..])?;
        let value = &remaining[value_start..value_start + soh_pos];

        self.offset += value_start + soh_pos + 1;

        Some(FieldRef::new(tag, value))
    }

    /// Range of the value of the field just read by `next_field`.
    fn last_value_range(&self, field: &FieldRef<'a>) -> Range<usize> {
        let end = self.offset - 1;
        end - field.len()..end
    }

    /// Returns the current offset in the buffer.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the remaining bytes in the buffer.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.offset..).unwrap_or_default()
    }

    /// Returns true if the buffer has been fully consumed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.input.len()
    }
}

/// Longest BeginString value accepted while framing.
const MAX_BEGIN_STRING_LEN: usize = 16;

/// Most digits accepted in a BodyLength value.
const MAX_BODY_LENGTH_DIGITS: usize = 9;

/// Returns the total length of the first complete message in `buf`.
///
/// Only the BeginString and BodyLength prefix is inspected, so this is
/// suitable for stream framing. `Ok(None)` means more bytes are needed.
///
/// # Errors
/// Returns `DecodeError` if the prefix is not `8=...` followed by `9=<n>`,
/// or if either value runs longer than any valid FIX prefix.
pub fn frame_length(buf: &[u8]) -> Result<Option<usize>, DecodeError> {
    if buf.len() < 2 {
        return Ok(None);
    }
    if &buf[..2] != b"8=" {
        return Err(DecodeError::InvalidBeginString);
    }
    let Some(first_soh) = memchr(SOH, buf) else {
        if buf.len() > 2 + MAX_BEGIN_STRING_LEN {
            return Err(DecodeError::InvalidBeginString);
        }
        return Ok(None);
    };
    if first_soh > 2 + MAX_BEGIN_STRING_LEN {
        return Err(DecodeError::InvalidBeginString);
    }

    let body_len_start = first_soh + 1;
    if buf.len() < body_len_start + 2 {
        return Ok(None);
    }
    if &buf[body_len_start..body_len_start + 2] != b"9=" {
        return Err(DecodeError::MissingBodyLength);
    }
    let digits_start = body_len_start + 2;
    let Some(soh) = memchr(SOH, &buf[digits_start..]) else {
        if buf.len() - digits_start > MAX_BODY_LENGTH_DIGITS {
            return Err(DecodeError::InvalidBodyLength);
        }
        return Ok(None);
    };
    if soh == 0 || soh > MAX_BODY_LENGTH_DIGITS {
        return Err(DecodeError::InvalidBodyLength);
    }
    let body_len_end = digits_start + soh;

    let body_length: usize = std::str::from_utf8(&buf[digits_start..body_len_end])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(DecodeError::InvalidBodyLength)?;

    // 10=NNN<SOH>
    (body_len_end + 1)
        .checked_add(body_length)
        .and_then(|n| n.checked_add(7))
        .map(Some)
        .ok_or(DecodeError::InvalidBodyLength)
}

/// Parses a tag number from ASCII bytes.
#[inline]
fn parse_tag(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }

    bytes.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;

    fn heartbeat() -> Vec<u8> {
        let mut encoder = Encoder::new("FIX.4.2");
        encoder.put_str(35, "0");
        encoder.put_str(49, "BANK");
        encoder.finish().to_vec()
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag(b"8"), Some(8));
        assert_eq!(parse_tag(b"644"), Some(644));
        assert_eq!(parse_tag(b""), None);
        assert_eq!(parse_tag(b"12a"), None);
        assert_eq!(parse_tag(b"99999999999"), None);
    }

    #[test]
    fn test_next_field() {
        let input = b"8=FIX.4.2\x019=5\x0135=0\x01";
        let mut decoder = Decoder::new(input);

        let field = decoder.next_field().unwrap();
        assert_eq!(field.tag, 8);
        assert_eq!(field.as_str().unwrap(), "FIX.4.2");
        assert_eq!(decoder.next_field().unwrap().tag, 9);
        assert_eq!(decoder.next_field().unwrap().tag, 35);
        assert!(decoder.next_field().is_none());
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_decode_complete_message() {
        let bytes = heartbeat();
        let mut decoder = Decoder::new(&bytes);
        let raw = decoder.decode().unwrap();

        assert_eq!(raw.begin_string(), "FIX.4.2");
        assert_eq!(raw.msg_type(), &MsgType::Heartbeat);
        assert_eq!(raw.get_field_str(49), Some("BANK"));
        assert!(raw.get_field(10).is_some());
        assert_eq!(raw.len(), bytes.len());
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let input = b"8=FIX.4.2\x019=5\x0135=0\x0110=000\x01";
        let result = Decoder::new(input).decode();
        assert!(matches!(result, Err(DecodeError::ChecksumMismatch { .. })));

        let result = Decoder::new(input).with_checksum_validation(false).decode();
        assert!(result.is_ok());
    }

    #[test]
    fn test_decode_body_length_mismatch() {
        let input = b"8=FIX.4.2\x019=9\x0135=0\x0110=000\x01";
        let result = Decoder::new(input).with_checksum_validation(false).decode();
        assert_eq!(
            result.unwrap_err(),
            DecodeError::BodyLengthMismatch {
                declared: 9,
                actual: 5
            }
        );
    }

    #[test]
    fn test_decode_header_order() {
        let result = Decoder::new(b"9=5\x018=FIX.4.2\x01").decode();
        assert_eq!(result.unwrap_err(), DecodeError::InvalidBeginString);

        let result = Decoder::new(b"8=FIX.4.2\x0135=0\x01").decode();
        assert_eq!(result.unwrap_err(), DecodeError::MissingBodyLength);

        let result = Decoder::new(b"8=FIX.4.2\x019=5\x0149=X\x01").decode();
        assert_eq!(result.unwrap_err(), DecodeError::MissingMsgType);
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = heartbeat();
        let result = Decoder::new(&bytes[..bytes.len() - 4]).decode();
        assert_eq!(result.unwrap_err(), DecodeError::Incomplete);
    }

    #[test]
    fn test_frame_length() {
        let bytes = heartbeat();
        assert_eq!(frame_length(&bytes).unwrap(), Some(bytes.len()));
        assert_eq!(frame_length(&bytes[..5]).unwrap(), None);
        assert_eq!(
            frame_length(b"35=0\x01").unwrap_err(),
            DecodeError::InvalidBeginString
        );
        assert_eq!(
            frame_length(b"8=FIX.4.2\x019=x\x01").unwrap_err(),
            DecodeError::InvalidBodyLength
        );
    }

    #[test]
    fn test_frame_length_rejects_oversized_body_length() {
        assert_eq!(
            frame_length(b"8=FIX.4.2\x019=18446744073709551615\x0135=0\x01").unwrap_err(),
            DecodeError::InvalidBodyLength
        );
        assert_eq!(
            frame_length(b"8=FIX.4.2\x019=999999999\x0135=0\x01").unwrap(),
            Some(22 + 999_999_999 + 7)
        );
        assert_eq!(
            frame_length(b"8=FIX.4.2\x019=\x0135=0\x01").unwrap_err(),
            DecodeError::InvalidBodyLength
        );
    }

    #[test]
    fn test_frame_length_rejects_unterminated_prefix() {
        let mut begin_string = b"8=".to_vec();
        begin_string.extend_from_slice(&[b'A'; 64]);
        assert_eq!(
            frame_length(&begin_string).unwrap_err(),
            DecodeError::InvalidBeginString
        );

        assert_eq!(frame_length(b"8=FIX.4.2\x019=1234").unwrap(), None);
        assert_eq!(
            frame_length(b"8=FIX.4.2\x019=12345678901").unwrap_err(),
            DecodeError::InvalidBodyLength
        );
    }
}
