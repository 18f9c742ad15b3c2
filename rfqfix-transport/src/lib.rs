/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix Transport
//!
//! Network transport layer for the rfqfix FIX engine.
//!
//! This crate provides:
//! - **Codec**: Tokio codec that frames FIX messages on a byte stream and
//!   decodes them into [`Message`](rfqfix_tagvalue::Message)s

pub mod codec;

pub use codec::{CodecError, FixCodec};
