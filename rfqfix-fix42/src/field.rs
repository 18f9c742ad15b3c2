/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Typed FIX 4.2 fields.
//!
//! Each marker type binds a tag to its value type; use them with
//! `FieldMap::get::<F>()` and `FieldMap::set::<F>()`.

use rfqfix_derive::FixField;

/// QuoteReqID, tag 131.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 131, value = "String")]
pub struct QuoteReqId;

/// QuoteRequestRejectReason, tag 658.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 658, value = "crate::enums::QuoteRequestRejectReason")]
pub struct QuoteRequestRejectReason;

/// NoRelatedSym, tag 146.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 146, value = "u64")]
pub struct NoRelatedSym;

/// Symbol, tag 55.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 55, value = "String")]
pub struct Symbol;

/// Price, tag 44.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 44, value = "rust_decimal::Decimal")]
pub struct Price;

/// OrderQty, tag 38.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 38, value = "rust_decimal::Decimal")]
pub struct OrderQty;

/// Side, tag 54.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 54, value = "rfqfix_core::types::Side")]
pub struct Side;

/// QuoteRespID, tag 693.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 693, value = "String")]
pub struct QuoteRespId;

/// QuoteRespType, tag 694.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 694, value = "crate::enums::QuoteRespType")]
pub struct QuoteRespType;

/// QuoteID, tag 117.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 117, value = "String")]
pub struct QuoteId;

/// ValidUntilTime, tag 62.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 62, value = "rfqfix_core::types::Timestamp")]
pub struct ValidUntilTime;

/// ExpireTime, tag 126.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 126, value = "rfqfix_core::types::Timestamp")]
pub struct ExpireTime;

/// BidPx, tag 132.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 132, value = "rust_decimal::Decimal")]
pub struct BidPx;

/// OfferPx, tag 133.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 133, value = "rust_decimal::Decimal")]
pub struct OfferPx;

/// QuoteStatus, tag 297.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 297, value = "crate::enums::QuoteStatus")]
pub struct QuoteStatus;

/// QuoteRejectReason, tag 300.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 300, value = "crate::enums::QuoteRejectReason")]
pub struct QuoteRejectReason;

/// RFQReqID, tag 644.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 644, value = "String")]
pub struct RfqReqId;

/// Text, tag 58.
#[derive(Debug, Clone, Copy, FixField)]
#[fix(tag = 58, value = "String")]
pub struct Text;

#[cfg(test)]
mod tests {
    use super::*;
    use rfqfix_core::field::FixField;
    use rust_decimal::Decimal;

    #[test]
    fn test_field_tags() {
        assert_eq!(QuoteReqId::TAG, crate::tag::QUOTE_REQ_ID);
        assert_eq!(QuoteRespId::TAG, crate::tag::QUOTE_RESP_ID);
        assert_eq!(RfqReqId::TAG, crate::tag::RFQ_REQ_ID);
        assert_eq!(QuoteRequestRejectReason::TAG, crate::tag::QUOTE_REQUEST_REJECT_REASON);
    }

    #[test]
    fn test_decimal_field_codec() {
        let mut buf = Vec::new();
        Price::encode(&Decimal::new(10125, 2), &mut buf);
        assert_eq!(buf, b"101.25");
        assert_eq!(Price::decode(b"101.25").unwrap(), Decimal::new(10125, 2));
        assert!(OrderQty::decode(b"ten").is_err());
    }

    #[test]
    fn test_side_field_codec() {
        assert_eq!(Side::decode(b"2").unwrap(), rfqfix_core::types::Side::Sell);
        assert!(Side::decode(b"Z").is_err());
    }
}
