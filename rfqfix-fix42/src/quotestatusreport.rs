/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! QuoteStatusReport (AI).

use crate::enums::{QuoteRejectReason, QuoteStatus};
use crate::{field, tag, typed_route, with_scale};
use rfqfix_core::error::MessageRejectError;
use rfqfix_core::types::{Side, Timestamp};
use rfqfix_derive::FixMessage;
use rfqfix_engine::{MessageRoute, SessionId};
use rfqfix_tagvalue::{FixMessage, Message};
use rust_decimal::Decimal;

/// Status of a quote, sent in reply to a request or on a state change.
#[derive(Debug, Clone, PartialEq, Eq, FixMessage)]
#[fix(begin_string = "FIX.4.2", msg_type = "AI")]
pub struct QuoteStatusReport {
    message: Message,
}

impl QuoteStatusReport {
    /// Creates a QuoteStatusReport with its required fields.
    ///
    /// OrderQty is written with `order_qty_scale` fractional digits.
    #[must_use]
    pub fn new(
        quote_req_id: impl Into<String>,
        symbol: impl Into<String>,
        order_qty: Decimal,
        order_qty_scale: u32,
        valid_until_time: Timestamp,
        expire_time: Timestamp,
        quote_status: QuoteStatus,
    ) -> Self {
        let mut m = Self::from_message(Self::new_message());
        m.set_quote_req_id(quote_req_id);
        m.set_symbol(symbol);
        m.set_order_qty(order_qty, order_qty_scale);
        m.set_valid_until_time(valid_until_time);
        m.set_expire_time(expire_time);
        m.set_quote_status(quote_status);
        m
    }

    /// Sets OrderQty, tag 38, with `scale` fractional digits.
    pub fn set_order_qty(&mut self, value: Decimal, scale: u32) {
        self.message
            .body
            .set::<field::OrderQty>(&with_scale(value, scale));
    }

    /// Sets Side, tag 54.
    pub fn set_side(&mut self, v: Side) {
        self.message.body.set::<field::Side>(&v);
    }

    /// Sets Symbol, tag 55.
    pub fn set_symbol(&mut self, v: impl Into<String>) {
        self.message.body.set::<field::Symbol>(&v.into());
    }

    /// Sets ValidUntilTime, tag 62.
    pub fn set_valid_until_time(&mut self, v: Timestamp) {
        self.message.body.set::<field::ValidUntilTime>(&v);
    }

    /// Sets QuoteID, tag 117.
    pub fn set_quote_id(&mut self, v: impl Into<String>) {
        self.message.body.set::<field::QuoteId>(&v.into());
    }

    /// Sets ExpireTime, tag 126.
    pub fn set_expire_time(&mut self, v: Timestamp) {
        self.message.body.set::<field::ExpireTime>(&v);
    }

    /// Sets QuoteReqID, tag 131.
    pub fn set_quote_req_id(&mut self, v: impl Into<String>) {
        self.message.body.set::<field::QuoteReqId>(&v.into());
    }

    /// Sets BidPx, tag 132, with `scale` fractional digits.
    pub fn set_bid_px(&mut self, value: Decimal, scale: u32) {
        self.message.body.set::<field::BidPx>(&with_scale(value, scale));
    }

    /// Sets OfferPx, tag 133, with `scale` fractional digits.
    pub fn set_offer_px(&mut self, value: Decimal, scale: u32) {
        self.message
            .body
            .set::<field::OfferPx>(&with_scale(value, scale));
    }

    /// Sets QuoteStatus, tag 297.
    pub fn set_quote_status(&mut self, v: QuoteStatus) {
        self.message.body.set::<field::QuoteStatus>(&v);
    }

    /// Sets QuoteRejectReason, tag 300.
    pub fn set_quote_reject_reason(&mut self, v: QuoteRejectReason) {
        self.message.body.set::<field::QuoteRejectReason>(&v);
    }

    /// Gets OrderQty, tag 38.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_order_qty(&self) -> Result<Decimal, MessageRejectError> {
        self.message.body.get::<field::OrderQty>()
    }

    /// Gets Side, tag 54.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_side(&self) -> Result<Side, MessageRejectError> {
        self.message.body.get::<field::Side>()
    }

    /// Gets Symbol, tag 55.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_symbol(&self) -> Result<String, MessageRejectError> {
        self.message.body.get::<field::Symbol>()
    }

    /// Gets ValidUntilTime, tag 62.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_valid_until_time(&self) -> Result<Timestamp, MessageRejectError> {
        self.message.body.get::<field::ValidUntilTime>()
    }

    /// Gets QuoteID, tag 117.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_quote_id(&self) -> Result<String, MessageRejectError> {
        self.message.body.get::<field::QuoteId>()
    }

    /// Gets ExpireTime, tag 126.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_expire_time(&self) -> Result<Timestamp, MessageRejectError> {
        self.message.body.get::<field::ExpireTime>()
    }

    /// Gets QuoteReqID, tag 131.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_quote_req_id(&self) -> Result<String, MessageRejectError> {
        self.message.body.get::<field::QuoteReqId>()
    }

    /// Gets BidPx, tag 132.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_bid_px(&self) -> Result<Decimal, MessageRejectError> {
        self.message.body.get::<field::BidPx>()
    }

    /// Gets OfferPx, tag 133.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_offer_px(&self) -> Result<Decimal, MessageRejectError> {
        self.message.body.get::<field::OfferPx>()
    }

    /// Gets QuoteStatus, tag 297.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_quote_status(&self) -> Result<QuoteStatus, MessageRejectError> {
        self.message.body.get::<field::QuoteStatus>()
    }

    /// Gets QuoteRejectReason, tag 300.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_quote_reject_reason(&self) -> Result<QuoteRejectReason, MessageRejectError> {
        self.message.body.get::<field::QuoteRejectReason>()
    }

    /// Returns true if OrderQty is present, tag 38.
    #[must_use]
    pub fn has_order_qty(&self) -> bool {
        self.message.body.has(tag::ORDER_QTY)
    }

    /// Returns true if Side is present, tag 54.
    #[must_use]
    pub fn has_side(&self) -> bool {
        self.message.body.has(tag::SIDE)
    }

    /// Returns true if Symbol is present, tag 55.
    #[must_use]
    pub fn has_symbol(&self) -> bool {
        self.message.body.has(tag::SYMBOL)
    }

    /// Returns true if ValidUntilTime is present, tag 62.
    #[must_use]
    pub fn has_valid_until_time(&self) -> bool {
        self.message.body.has(tag::VALID_UNTIL_TIME)
    }

    /// Returns true if QuoteID is present, tag 117.
    #[must_use]
    pub fn has_quote_id(&self) -> bool {
        self.message.body.has(tag::QUOTE_ID)
    }

    /// Returns true if ExpireTime is present, tag 126.
    #[must_use]
    pub fn has_expire_time(&self) -> bool {
        self.message.body.has(tag::EXPIRE_TIME)
    }

    /// Returns true if QuoteReqID is present, tag 131.
    #[must_use]
    pub fn has_quote_req_id(&self) -> bool {
        self.message.body.has(tag::QUOTE_REQ_ID)
    }

    /// Returns true if BidPx is present, tag 132.
    #[must_use]
    pub fn has_bid_px(&self) -> bool {
        self.message.body.has(tag::BID_PX)
    }

    /// Returns true if OfferPx is present, tag 133.
    #[must_use]
    pub fn has_offer_px(&self) -> bool {
        self.message.body.has(tag::OFFER_PX)
    }

    /// Returns true if QuoteStatus is present, tag 297.
    #[must_use]
    pub fn has_quote_status(&self) -> bool {
        self.message.body.has(tag::QUOTE_STATUS)
    }

    /// Returns true if QuoteRejectReason is present, tag 300.
    #[must_use]
    pub fn has_quote_reject_reason(&self) -> bool {
        self.message.body.has(tag::QUOTE_REJECT_REASON)
    }
}

/// Routes QuoteStatusReport messages to `router`.
pub fn route<F>(router: F) -> (&'static str, &'static str, MessageRoute)
where
    F: Fn(QuoteStatusReport, &SessionId) -> Result<(), MessageRejectError> + Send + Sync + 'static,
{
    typed_route::<QuoteStatusReport, F>(router)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> QuoteStatusReport {
        QuoteStatusReport::new(
            "QR-1",
            "EUR/USD",
            Decimal::new(5, 0),
            2,
            Timestamp::parse_fix("20260127-10:15:30.000").unwrap(),
            Timestamp::parse_fix("20260127-10:20:00").unwrap(),
            QuoteStatus::Pending,
        )
    }

    #[test]
    fn test_new_sets_required_fields() {
        let report = report();
        assert_eq!(report.get_quote_req_id().unwrap(), "QR-1");
        assert_eq!(report.get_symbol().unwrap(), "EUR/USD");
        assert_eq!(report.get_order_qty().unwrap(), Decimal::new(500, 2));
        assert_eq!(report.get_quote_status().unwrap(), QuoteStatus::Pending);
        assert_eq!(
            report.message().body.get_str(tag::ORDER_QTY),
            Some("5.00")
        );
        assert_eq!(
            report.message().body.get_str(tag::EXPIRE_TIME),
            Some("20260127-10:20:00.000")
        );
        assert_eq!(
            report.get_valid_until_time().unwrap().format_millis().as_str(),
            "20260127-10:15:30.000"
        );
        assert!(!report.has_quote_id());
        assert!(!report.has_side());
    }

    #[test]
    fn test_optional_fields() {
        let mut report = report();
        report.set_quote_id("Q-7");
        report.set_side(Side::Sell);
        report.set_bid_px(Decimal::new(10850, 4), 4);
        report.set_offer_px(Decimal::new(10853, 4), 5);
        report.set_quote_reject_reason(QuoteRejectReason::InvalidBidAskSpread);

        assert_eq!(report.get_quote_id().unwrap(), "Q-7");
        assert_eq!(report.get_side().unwrap(), Side::Sell);
        assert_eq!(report.get_bid_px().unwrap(), Decimal::new(10850, 4));
        assert_eq!(report.message().body.get_str(tag::OFFER_PX), Some("1.08530"));
        assert_eq!(
            report.get_quote_reject_reason().unwrap(),
            QuoteRejectReason::InvalidBidAskSpread
        );
        assert!(report.has_bid_px() && report.has_offer_px());
    }

    #[test]
    fn test_timestamp_without_millis_is_read() {
        let mut report = report();
        report
            .message_mut()
            .body
            .set_str(tag::VALID_UNTIL_TIME, "20260127-11:00:00");
        let read = report.get_valid_until_time().unwrap();
        assert_eq!(read.format_millis().as_str(), "20260127-11:00:00.000");
    }

    #[test]
    fn test_route() {
        let (begin_string, msg_type, route) =
            route(|msg: QuoteStatusReport, _| msg.get_quote_status().map(|_| ()));
        assert_eq!((begin_string, msg_type), ("FIX.4.2", "AI"));
        let session_id = SessionId::new("FIX.4.2", "CLIENT", "BANK");
        assert!(route(report().message(), &session_id).is_ok());
        assert!(route(&QuoteStatusReport::new_message(), &session_id).is_err());
    }
}
