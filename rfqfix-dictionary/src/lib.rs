/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix Dictionary
//!
//! FIX data dictionary and runtime message validation.
//!
//! This crate provides:
//! - **Schema definitions**: Field, group and message definitions
//! - **Runtime validation**: [`Dictionary::validate`] checks a
//!   [`rfqfix_tagvalue::Message`] against the dictionary and reports the
//!   first problem as a `MessageRejectError`

pub mod schema;
pub mod validate;

pub use schema::{
    Dictionary, FieldDef, FieldRef, FieldType, GroupDef, MessageCategory, MessageDef, Version,
};
