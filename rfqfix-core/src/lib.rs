/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix Core
//!
//! Core types, traits, and error definitions for the rfqfix FIX engine.
//!
//! This crate provides the fundamental building blocks used across all rfqfix crates:
//! - **Error types**: Unified error handling with `thiserror`, including
//!   [`MessageRejectError`] for field-level rejections
//! - **Field types**: `FieldTag`, `FieldValue`, the `FieldCodec` value codec
//!   and the `FixField` trait
//! - **Message types**: `MsgType` and the zero-copy `RawMessage`
//! - **Core types**: `SeqNum`, `Timestamp`, `CompId`, `Side`

pub mod error;
pub mod field;
pub mod message;
pub mod types;

pub use error::{
    DecodeError, EncodeError, FixError, MessageRejectError, RejectReason, Result, SessionError,
    StoreError,
};
pub use field::{FieldCodec, FieldRef, FieldTag, FieldValue, FixField};
pub use message::{MsgType, RawMessage};
pub use types::{CompId, SeqNum, Side, Timestamp};
