/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! QuoteRequestReject (AG).

use crate::enums::QuoteRequestRejectReason;
use crate::{field, tag, typed_route, with_scale};
use rfqfix_core::error::MessageRejectError;
use rfqfix_derive::FixMessage;
use rfqfix_engine::{MessageRoute, SessionId};
use rfqfix_tagvalue::{FixMessage, Group, GroupTemplate, Message, RepeatingGroup};
use rust_decimal::Decimal;

/// Refusal of a quote request.
#[derive(Debug, Clone, PartialEq, Eq, FixMessage)]
#[fix(begin_string = "FIX.4.2", msg_type = "AG")]
pub struct QuoteRequestReject {
    message: Message,
}

impl QuoteRequestReject {
    /// Creates a QuoteRequestReject with its required fields.
    #[must_use]
    pub fn new(quote_req_id: impl Into<String>, reason: QuoteRequestRejectReason) -> Self {
        let mut m = Self::from_message(Self::new_message());
        m.set_quote_req_id(quote_req_id);
        m.set_quote_request_reject_reason(reason);
        m
    }

    /// Sets QuoteReqID, tag 131.
    pub fn set_quote_req_id(&mut self, v: impl Into<String>) {
        self.message.body.set::<field::QuoteReqId>(&v.into());
    }

    /// Sets QuoteRequestRejectReason, tag 658.
    pub fn set_quote_request_reject_reason(&mut self, v: QuoteRequestRejectReason) {
        self.message.body.set::<field::QuoteRequestRejectReason>(&v);
    }

    /// Sets NoRelatedSym, tag 146.
    pub fn set_no_related_sym(&mut self, group: &NoRelatedSymRepeatingGroup) {
        self.message.body.set_group(&group.to_repeating_group());
    }

    /// Gets QuoteReqID, tag 131.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_quote_req_id(&self) -> Result<String, MessageRejectError> {
        self.message.body.get::<field::QuoteReqId>()
    }

    /// Gets QuoteRequestRejectReason, tag 658.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_quote_request_reject_reason(
        &self,
    ) -> Result<QuoteRequestRejectReason, MessageRejectError> {
        self.message.body.get::<field::QuoteRequestRejectReason>()
    }

    /// Gets NoRelatedSym, tag 146.
    ///
    /// # Errors
    /// Missing count field or entries that disagree with it.
    pub fn get_no_related_sym(&self) -> Result<NoRelatedSymRepeatingGroup, MessageRejectError> {
        let mut group = NoRelatedSymRepeatingGroup::repeating_group();
        self.message.body.get_group(&mut group)?;
        Ok(NoRelatedSymRepeatingGroup::from_repeating_group(&group))
    }

    /// Returns true if QuoteReqID is present, tag 131.
    #[must_use]
    pub fn has_quote_req_id(&self) -> bool {
        self.message.body.has(tag::QUOTE_REQ_ID)
    }

    /// Returns true if QuoteRequestRejectReason is present, tag 658.
    #[must_use]
    pub fn has_quote_request_reject_reason(&self) -> bool {
        self.message.body.has(tag::QUOTE_REQUEST_REJECT_REASON)
    }

    /// Returns true if NoRelatedSym is present, tag 146.
    #[must_use]
    pub fn has_no_related_sym(&self) -> bool {
        self.message.body.has(tag::NO_RELATED_SYM)
    }
}

/// Routes QuoteRequestReject messages to `router`.
pub fn route<F>(router: F) -> (&'static str, &'static str, MessageRoute)
where
    F: Fn(QuoteRequestReject, &SessionId) -> Result<(), MessageRejectError> + Send + Sync + 'static,
{
    typed_route::<QuoteRequestReject, F>(router)
}

/// One entry of the NoRelatedSym group, tag 146.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoRelatedSym {
    group: Group,
}

impl NoRelatedSym {
    /// Sets Symbol, tag 55.
    pub fn set_symbol(&mut self, v: impl Into<String>) {
        self.group.set::<field::Symbol>(&v.into());
    }

    /// Sets Price, tag 44, with `scale` fractional digits.
    pub fn set_price(&mut self, value: Decimal, scale: u32) {
        self.group.set::<field::Price>(&with_scale(value, scale));
    }

    /// Sets OrderQty, tag 38, with `scale` fractional digits.
    pub fn set_order_qty(&mut self, value: Decimal, scale: u32) {
        self.group.set::<field::OrderQty>(&with_scale(value, scale));
    }

    /// Gets Symbol, tag 55.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_symbol(&self) -> Result<String, MessageRejectError> {
        self.group.get::<field::Symbol>()
    }

    /// Gets Price, tag 44.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_price(&self) -> Result<Decimal, MessageRejectError> {
        self.group.get::<field::Price>()
    }

    /// Gets OrderQty, tag 38.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_order_qty(&self) -> Result<Decimal, MessageRejectError> {
        self.group.get::<field::OrderQty>()
    }

    /// Returns true if Symbol is present, tag 55.
    #[must_use]
    pub fn has_symbol(&self) -> bool {
        self.group.has(tag::SYMBOL)
    }

    /// Returns true if Price is present, tag 44.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.group.has(tag::PRICE)
    }

    /// Returns true if OrderQty is present, tag 38.
    #[must_use]
    pub fn has_order_qty(&self) -> bool {
        self.group.has(tag::ORDER_QTY)
    }
}

/// The NoRelatedSym repeating group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoRelatedSymRepeatingGroup {
    entries: Vec<NoRelatedSym>,
}

impl NoRelatedSymRepeatingGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns it for filling in.
    pub fn add(&mut self) -> &mut NoRelatedSym {
        let index = self.entries.len();
        self.entries.push(NoRelatedSym::default());
        &mut self.entries[index]
    }

    /// Returns the entry at `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&NoRelatedSym> {
        self.entries.get(i)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the group has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &NoRelatedSym> {
        self.entries.iter()
    }

    fn repeating_group() -> RepeatingGroup {
        RepeatingGroup::new(
            tag::NO_RELATED_SYM,
            GroupTemplate::new([tag::SYMBOL, tag::PRICE, tag::ORDER_QTY]),
        )
    }

    fn to_repeating_group(&self) -> RepeatingGroup {
        let mut group = Self::repeating_group();
        for entry in &self.entries {
            *group.add() = entry.group.clone();
        }
        group
    }

    fn from_repeating_group(group: &RepeatingGroup) -> Self {
        Self {
            entries: group
                .iter()
                .map(|g| NoRelatedSym { group: g.clone() })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfqfix_engine::MessageRouter;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_new_sets_required_fields() {
        let reject = QuoteRequestReject::new("QR-1", QuoteRequestRejectReason::NoInventory);
        assert_eq!(reject.get_quote_req_id().unwrap(), "QR-1");
        assert_eq!(
            reject.get_quote_request_reject_reason().unwrap(),
            QuoteRequestRejectReason::NoInventory
        );
        let message = reject.message();
        assert_eq!(message.header.get_str(tag::BEGIN_STRING), Some("FIX.4.2"));
        assert_eq!(message.header.get_str(tag::MSG_TYPE), Some("AG"));
        assert!(!reject.has_no_related_sym());
    }

    #[test]
    fn test_no_related_sym_group() {
        let mut reject = QuoteRequestReject::new("QR-2", QuoteRequestRejectReason::Other);
        let mut group = NoRelatedSymRepeatingGroup::new();
        let first = group.add();
        first.set_symbol("EUR/USD");
        first.set_price(Decimal::new(10852, 4), 4);
        first.set_order_qty(Decimal::new(1_000_000, 0), 0);
        group.add().set_symbol("GBP/USD");
        reject.set_no_related_sym(&group);

        assert!(reject.has_no_related_sym());
        let read = reject.get_no_related_sym().unwrap();
        assert_eq!(read.len(), 2);
        let first = read.get(0).unwrap();
        assert_eq!(first.get_symbol().unwrap(), "EUR/USD");
        assert_eq!(first.get_price().unwrap(), Decimal::new(10852, 4));
        assert_eq!(first.get_order_qty().unwrap(), Decimal::new(1_000_000, 0));
        let second = read.get(1).unwrap();
        assert!(second.has_symbol());
        assert!(!second.has_price());
        assert!(second.get_price().is_err());
        assert!(read.get(2).is_none());
    }

    #[test]
    fn test_group_survives_wire() {
        let mut reject = QuoteRequestReject::new("QR-3", QuoteRequestRejectReason::UnknownSymbol);
        let mut group = NoRelatedSymRepeatingGroup::new();
        group.add().set_symbol("XAU/USD");
        group.add().set_symbol("XAG/USD");
        reject.set_no_related_sym(&group);
        reject.message_mut().header.set_str(tag::SENDER_COMP_ID, "BANK");
        reject.message_mut().header.set_str(tag::TARGET_COMP_ID, "CLIENT");
        reject.message_mut().header.set_str(tag::MSG_SEQ_NUM, "4");

        let bytes = reject.build().unwrap();
        let parsed = QuoteRequestReject::from_message(Message::parse(&bytes).unwrap());
        let read = parsed.get_no_related_sym().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read.get(1).unwrap().get_symbol().unwrap(), "XAG/USD");
        assert_eq!(
            parsed.get_quote_request_reject_reason().unwrap(),
            QuoteRequestRejectReason::UnknownSymbol
        );
    }

    #[test]
    fn test_set_price_applies_scale() {
        let mut entry = NoRelatedSym::default();
        entry.set_price(Decimal::new(15, 1), 3);
        assert_eq!(entry.group.get_str(tag::PRICE), Some("1.500"));
    }

    #[test]
    fn test_route() {
        let called = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&called);
        let (begin_string, msg_type, _) = route(|_, _| Ok(()));
        assert_eq!((begin_string, msg_type), ("FIX.4.2", "AG"));

        let mut router = MessageRouter::new();
        router.add_route(route(move |msg: QuoteRequestReject, _| {
            assert_eq!(msg.get_quote_req_id()?, "QR-9");
            seen.store(true, Ordering::SeqCst);
            Ok(())
        }));

        let message = QuoteRequestReject::new("QR-9", QuoteRequestRejectReason::Pass).to_message();
        let session_id = SessionId::new("FIX.4.2", "CLIENT", "BANK");
        router.route(&message, &session_id).unwrap();
        assert!(called.load(Ordering::SeqCst));
    }
}
