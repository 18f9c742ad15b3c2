/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix Store
//!
//! Session state and outbound message storage.
//!
//! This crate provides:
//! - **MessageStore trait**: Abstract interface for sequence numbers and
//!   resendable messages
//! - **MemoryStore**: In-memory implementation

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{MessageStore, StoredMessage};
