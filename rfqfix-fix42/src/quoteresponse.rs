/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! QuoteResponse (AJ).

use crate::enums::QuoteRespType;
use crate::{field, tag, typed_route};
use rfqfix_core::error::MessageRejectError;
use rfqfix_core::types::Side;
use rfqfix_derive::FixMessage;
use rfqfix_engine::{MessageRoute, SessionId};
use rfqfix_tagvalue::{FixMessage, Message};

/// A requester's answer to a quote.
#[derive(Debug, Clone, PartialEq, Eq, FixMessage)]
#[fix(begin_string = "FIX.4.2", msg_type = "AJ")]
pub struct QuoteResponse {
    message: Message,
}

impl QuoteResponse {
    /// Creates a QuoteResponse with its required fields.
    #[must_use]
    pub fn new(
        quote_resp_id: impl Into<String>,
        quote_resp_type: QuoteRespType,
        side: Side,
        symbol: impl Into<String>,
    ) -> Self {
        let mut m = Self::from_message(Self::new_message());
        m.set_quote_resp_id(quote_resp_id);
        m.set_quote_resp_type(quote_resp_type);
        m.set_side(side);
        m.set_symbol(symbol);
        m
    }

    /// Sets Side, tag 54.
    pub fn set_side(&mut self, v: Side) {
        self.message.body.set::<field::Side>(&v);
    }

    /// Sets Symbol, tag 55.
    pub fn set_symbol(&mut self, v: impl Into<String>) {
        self.message.body.set::<field::Symbol>(&v.into());
    }

    /// Sets QuoteRespID, tag 693.
    pub fn set_quote_resp_id(&mut self, v: impl Into<String>) {
        self.message.body.set::<field::QuoteRespId>(&v.into());
    }

    /// Sets QuoteRespType, tag 694.
    pub fn set_quote_resp_type(&mut self, v: QuoteRespType) {
        self.message.body.set::<field::QuoteRespType>(&v);
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

    /// Gets QuoteRespID, tag 693.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_quote_resp_id(&self) -> Result<String, MessageRejectError> {
        self.message.body.get::<field::QuoteRespId>()
    }

    /// Gets QuoteRespType, tag 694.
    ///
    /// # Errors
    /// Missing or malformed field.
    pub fn get_quote_resp_type(&self) -> Result<QuoteRespType, MessageRejectError> {
        self.message.body.get::<field::QuoteRespType>()
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

    /// Returns true if QuoteRespID is present, tag 693.
    #[must_use]
    pub fn has_quote_resp_id(&self) -> bool {
        self.message.body.has(tag::QUOTE_RESP_ID)
    }

    /// Returns true if QuoteRespType is present, tag 694.
    #[must_use]
    pub fn has_quote_resp_type(&self) -> bool {
        self.message.body.has(tag::QUOTE_RESP_TYPE)
    }
}

/// Routes QuoteResponse messages to `router`.
pub fn route<F>(router: F) -> (&'static str, &'static str, MessageRoute)
where
    F: Fn(QuoteResponse, &SessionId) -> Result<(), MessageRejectError> + Send + Sync + 'static,
{
    typed_route::<QuoteResponse, F>(router)
}
