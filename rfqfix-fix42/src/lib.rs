/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix FIX 4.2
//!
//! Typed FIX 4.2 quote-workflow messages.
//!
//! This crate provides:
//! - **Tags and fields**: [`tag`] constants and typed [`field`] markers
//! - **Enumerations**: [`enums`] for the enumerated quote fields
//! - **Messages**: [`quoterequestreject`] (AG), [`rfqrequest`] (AH),
//!   [`quotestatusreport`] (AI) and [`quoteresponse`] (AJ), each with
//!   `new`, accessors and a `route` adapter for
//!   [`rfqfix_engine::MessageRouter`]
//! - **Dictionary**: [`dictionary::dictionary`] for runtime validation
//!
//! ## Example
//!
//! ```rust
//! use rfqfix_fix42::rfqrequest::RfqRequest;
//! use rfqfix_tagvalue::FixMessage;
//!
//! let rfq = RfqRequest::new("RFQ-1");
//! assert_eq!(rfq.get_rfq_req_id().unwrap(), "RFQ-1");
//! let message = rfq.to_message();
//! assert_eq!(message.header.get_str(35), Some("AH"));
//! ```

pub mod dictionary;
pub mod enums;
pub mod field;
pub mod quoterequestreject;
pub mod quoteresponse;
pub mod quotestatusreport;
pub mod rfqrequest;
pub mod tag;

pub use enums::{QuoteRejectReason, QuoteRequestRejectReason, QuoteRespType, QuoteStatus};
pub use quoterequestreject::QuoteRequestReject;
pub use quoteresponse::QuoteResponse;
pub use quotestatusreport::QuoteStatusReport;
pub use rfqrequest::RfqRequest;

use rfqfix_core::error::MessageRejectError;
use rfqfix_engine::{MessageRoute, SessionId};
use rfqfix_tagvalue::{FixMessage, Message};
use rust_decimal::Decimal;

/// BeginString of every message in this crate.
pub const BEGIN_STRING: &str = "FIX.4.2";

/// Wraps a typed callback into a route for `M`.
pub(crate) fn typed_route<M, F>(router: F) -> (&'static str, &'static str, MessageRoute)
where
    M: FixMessage + 'static,
    F: Fn(M, &SessionId) -> Result<(), MessageRejectError> + Send + Sync + 'static,
{
    let route: MessageRoute = Box::new(move |message: &Message, session_id: &SessionId| {
        router(M::from_message(message.clone()), session_id)
    });
    (M::BEGIN_STRING, M::MSG_TYPE, route)
}

/// Rounds `value` to exactly `scale` fractional digits.
pub(crate) fn with_scale(value: Decimal, scale: u32) -> Decimal {
    let mut scaled = value;
    scaled.rescale(scale);
    scaled
}
