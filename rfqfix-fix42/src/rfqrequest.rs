/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! RFQRequest (AH).

use crate::{field, tag, typed_route};
use rfqfix_core::error::MessageRejectError;
use rfqfix_derive::FixMessage;
use rfqfix_engine::{MessageRoute, SessionId};
use rfqfix_tagvalue::{FixMessage, Message};

/// Request for quote.
#[derive(Debug, Clone, PartialEq, Eq, FixMessage)]
#[fix(begin_string = "FIX.4.2", msg_type = "AH")]
pub struct RfqRequest {
    message: Message,
}

impl RfqRequest {
    /// Creates an RFQRequest with its required fields.
    #[must_use]
    pub fn new(rfq_req_id: impl Into<String>) -> Self {
        let mut m = Self::from_message(Self::new_message());
        m.set_rfq_req_id(rfq_req_id);
        m
    }

    /// Sets RFQReqID, tag 644.
    pub fn set_rfq_req_id(&mut self, v: impl Into<String>) {
        self.message.body.set::<field::RfqReqId>(&v.into());
    }

    /// Gets RFQReqID, tag 644.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_rfq_req_id(&self) -> Result<String, MessageRejectError> {
        self.message.body.get::<field::RfqReqId>()
    }

    /// Returns true if RFQReqID is present, tag 644.
    #[must_use]
    pub fn has_rfq_req_id(&self) -> bool {
        self.message.body.has(tag::RFQ_REQ_ID)
    }
}

/// Routes RFQRequest messages to `router`.
pub fn route<F>(router: F) -> (&'static str, &'static str, MessageRoute)
where
    F: Fn(RfqRequest, &SessionId) -> Result<(), MessageRejectError> + Send + Sync + 'static,
{
    typed_route::<RfqRequest, F>(router)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let mut rfq = RfqRequest::new("RFQ-1");
        assert!(rfq.has_rfq_req_id());
        assert_eq!(rfq.get_rfq_req_id().unwrap(), "RFQ-1");
        rfq.set_rfq_req_id("RFQ-2");
        assert_eq!(rfq.get_rfq_req_id().unwrap(), "RFQ-2");

        let message = rfq.to_message();
        assert_eq!(message.header.get_str(tag::BEGIN_STRING), Some("FIX.4.2"));
        assert_eq!(message.header.get_str(tag::MSG_TYPE), Some("AH"));
        assert_eq!(message.body.get_str(tag::RFQ_REQ_ID), Some("RFQ-2"));
    }

    #[test]
    fn test_from_message_is_infallible() {
        let rfq = RfqRequest::from_message(Message::new());
        assert!(!rfq.has_rfq_req_id());
        assert!(rfq.get_rfq_req_id().is_err());
    }

    #[test]
    fn test_wire_round_trip() {
        let mut rfq = RfqRequest::new("RFQ-3");
        rfq.message_mut().header.set_str(tag::SENDER_COMP_ID, "CLIENT");
        rfq.message_mut().header.set_str(tag::TARGET_COMP_ID, "BANK");
        rfq.message_mut().header.set_str(tag::MSG_SEQ_NUM, "2");
        let bytes = rfq.build().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("\x0135=AH\x01"));
        assert!(text.contains("\x01644=RFQ-3\x01"));

        let parsed = RfqRequest::from_message(Message::parse(&bytes).unwrap());
        assert_eq!(parsed.get_rfq_req_id().unwrap(), "RFQ-3");
    }

    #[test]
    fn test_route() {
        let (begin_string, msg_type, route) = route(|msg: RfqRequest, _| {
            if msg.get_rfq_req_id()?.is_empty() {
                return Err(MessageRejectError::value_is_incorrect(tag::RFQ_REQ_ID));
            }
            Ok(())
        });
        assert_eq!((begin_string, msg_type), ("FIX.4.2", "AH"));
        let session_id = SessionId::new("FIX.4.2", "BANK", "CLIENT");
        assert!(route(RfqRequest::new("RFQ-4").message(), &session_id).is_ok());
        assert!(route(RfqRequest::new("").message(), &session_id).is_err());
    }
}
