/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix Session
//!
//! FIX session layer protocol implementation for the rfqfix engine.
//!
//! This crate provides:
//! - **State machine**: Typestate-based session FSM with compile-time state checks
//! - **Sequence management**: Atomic sequence number handling backed by a store
//! - **Heartbeat handling**: Heartbeat/TestRequest logic
//! - **Recovery**: Gap detection, ResendRequest and SequenceReset processing
//! - **Driver**: [`FixSession`], a sans-IO protocol driver
//! - **Configuration**: Session configuration options

pub mod config;
pub mod heartbeat;
pub mod sequence;
pub mod session;
pub mod state;
pub mod tags;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use heartbeat::HeartbeatManager;
pub use sequence::{SeqCheck, SequenceManager};
pub use session::{AdminHook, FixSession, Role, SessionAction};
pub use state::{
    Active, Connecting, Disconnected, LogonSent, LogoutPending, Resending, Session, SessionState,
};
