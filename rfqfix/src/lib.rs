/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix
//!
//! A FIX 4.2 engine for request-for-quote workflows.
//!
//! rfqfix implements the FIX tag=value wire format, the session layer and
//! typed accessors for the FIX 4.2 quote messages QuoteRequestReject (AG),
//! RFQRequest (AH), QuoteStatusReport (AI) and QuoteResponse (AJ).
//!
//! ## Features
//!
//! - **Zero-copy parsing**: Field values reference the original buffer
//! - **SIMD-accelerated**: Uses `memchr` for fast delimiter search
//! - **Type-safe**: Compile-time checked session states and message types
//! - **Recovery**: Gap detection, ResendRequest and SequenceReset handling
//! - **Async support**: Built on Tokio for networking
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rfqfix::prelude::*;
//!
//! let mut router = MessageRouter::new();
//! router.add_route(rfqrequest::route(|rfq, _session| {
//!     println!("RFQ {}", rfq.get_rfq_req_id()?);
//!     Ok(())
//! }));
//!
//! let engine = EngineBuilder::new()
//!     .with_application(MyDesk { router })
//!     .add_session(SessionConfig::new(
//!         CompId::new("BANK").unwrap(),
//!         CompId::new("CLIENT").unwrap(),
//!         "FIX.4.2",
//!     ))
//!     .build()?;
//! engine.accept(TcpListener::bind("0.0.0.0:9876").await?).await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Fundamental types, traits, and error definitions
//! - [`dictionary`]: FIX dictionaries and message validation
//! - [`tagvalue`]: Zero-copy tag=value encoding and decoding
//! - [`session`]: Session layer protocol implementation
//! - [`store`]: Message storage for resends
//! - [`transport`]: Tokio framing codec
//! - [`engine`]: Application callbacks, routing and connection handling
//! - [`fix42`]: Typed FIX 4.2 quote-workflow messages

pub mod core {
    //! Core types, traits, and error definitions.
    pub use rfqfix_core::*;
}

pub mod dictionary {
    //! FIX dictionaries and message validation.
    pub use rfqfix_dictionary::*;
}

pub mod tagvalue {
    //! Zero-copy tag=value encoding and decoding.
    pub use rfqfix_tagvalue::*;
}

pub mod session {
    //! Session layer protocol implementation.
    pub use rfqfix_session::*;
}

pub mod store {
    //! Message storage for resends.
    pub use rfqfix_store::*;
}

pub mod transport {
    //! Tokio framing codec.
    pub use rfqfix_transport::*;
}

pub mod engine {
    //! Application callbacks, routing and connection handling.
    pub use rfqfix_engine::*;
}

pub mod fix42 {
    //! Typed FIX 4.2 quote-workflow messages.
    pub use rfqfix_fix42::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use rfqfix_core::{
        CompId, DecodeError, EncodeError, FixError, FixField, MessageRejectError, MsgType,
        RejectReason, Result, SeqNum, SessionError, Side, StoreError, Timestamp,
    };

    // Dictionary
    pub use rfqfix_dictionary::{Dictionary, Version};

    // Tag-value encoding
    pub use rfqfix_tagvalue::{FieldMap, FixMessage, Group, Message, RepeatingGroup};

    // Session
    pub use rfqfix_session::{FixSession, Role, SessionAction, SessionConfig, SessionConfigBuilder};

    // Store
    pub use rfqfix_store::{MemoryStore, MessageStore};

    // Transport
    pub use rfqfix_transport::{CodecError, FixCodec};

    // Engine
    pub use rfqfix_engine::{
        Application, Engine, EngineBuilder, EngineError, MessageRouter, SessionHandle, SessionId,
    };

    // FIX 4.2 quote workflow
    pub use rfqfix_fix42::{
        QuoteRejectReason, QuoteRequestReject, QuoteRequestRejectReason, QuoteRespType,
        QuoteResponse, QuoteStatus, QuoteStatusReport, RfqRequest, quoterequestreject,
        quoteresponse, quotestatusreport, rfqrequest,
    };
}
