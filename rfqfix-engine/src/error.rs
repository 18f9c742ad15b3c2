/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Engine error type.

use rfqfix_core::error::FixError;
use rfqfix_transport::CodecError;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while running sessions over the network.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Protocol, store or encoding failure inside a session.
    #[error(transparent)]
    Fix(#[from] FixError),

    /// Framing failure on the connection.
    #[error("transport error: {0}")]
    Codec(#[from] CodecError),

    /// Socket failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid engine setup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connecting did not complete in time.
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// The session task is no longer running.
    #[error("session {0} is not running")]
    SessionClosed(String),
}
