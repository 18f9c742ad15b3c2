/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix Tag-Value
//!
//! FIX tag=value encoding, decoding and the untyped message model.
//!
//! ## Features
//!
//! - **Zero-copy parsing**: [`Decoder`] field values reference the input buffer
//! - **Framing**: [`Encoder`] computes BodyLength and CheckSum
//! - **Message model**: [`Message`] with header/body/trailer [`FieldMap`]s and
//!   [`RepeatingGroup`]s
//! - **Typed messages**: the [`FixMessage`] trait

pub mod checksum;
pub mod decoder;
pub mod encoder;
pub mod fieldmap;
pub mod group;
pub mod message;

pub use checksum::calculate_checksum;
pub use decoder::{Decoder, frame_length};
pub use encoder::Encoder;
pub use fieldmap::{FieldMap, TagValue};
pub use group::{Group, GroupTemplate, RepeatingGroup};
pub use message::{FixMessage, Message};
pub use rfqfix_core::message::RawMessage;
