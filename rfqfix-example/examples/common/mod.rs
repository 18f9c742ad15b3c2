//! Shared settings for the quote workflow examples.
#![allow(dead_code)]

use rfqfix::prelude::{SessionConfig, SessionConfigBuilder, SessionId};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9876;
pub const FIX_VERSION: &str = "FIX.4.2";

/// Connection and identity settings, overridable through `FIX_*` variables.
#[derive(Debug, Clone)]
pub struct ExampleConfig {
    pub host: String,
    pub port: u16,
    pub sender_comp_id: String,
    pub target_comp_id: String,
    pub heartbeat_interval: u64,
}

impl ExampleConfig {
    pub fn acceptor() -> Self {
        Self::from_env("BANK", "CLIENT")
    }

    pub fn initiator() -> Self {
        Self::from_env("CLIENT", "BANK")
    }

    fn from_env(sender: &str, target: &str) -> Self {
        Self {
            host: std::env::var("FIX_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: std::env::var("FIX_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            sender_comp_id: std::env::var("FIX_SENDER").unwrap_or_else(|_| sender.to_string()),
            target_comp_id: std::env::var("FIX_TARGET").unwrap_or_else(|_| target.to_string()),
            heartbeat_interval: std::env::var("FIX_HEARTBEAT")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(30),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_config(&self) -> anyhow::Result<SessionConfig> {
        Ok(SessionConfigBuilder::new()
            .sender_comp_id(self.sender_comp_id.clone())
            .target_comp_id(self.target_comp_id.clone())
            .begin_string(FIX_VERSION)
            .heartbeat_interval(Duration::from_secs(self.heartbeat_interval))
            .build()?)
    }

    pub fn session_id(&self) -> anyhow::Result<SessionId> {
        Ok(SessionId::from_config(&self.session_config()?))
    }
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .try_init();
}
