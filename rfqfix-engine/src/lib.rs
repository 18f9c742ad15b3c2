/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix Engine
//!
//! Networked FIX engine for the rfqfix protocol implementation.
//!
//! This crate provides:
//! - **Engine**: Runs initiator and acceptor sessions over TCP
//! - **Application trait**: Callback interface for handling FIX messages
//! - **Message router**: Dispatch by BeginString and MsgType
//! - **Builder API**: Fluent configuration for engine setup

pub mod application;
pub mod builder;
pub mod engine;
pub mod error;
pub mod router;

pub use application::{Application, NoOpApplication, SessionId};
pub use builder::EngineBuilder;
pub use engine::{Command, Engine, SessionHandle};
pub use error::EngineError;
pub use router::{MessageRoute, MessageRouter};
