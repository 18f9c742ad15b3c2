/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Engine builder for fluent configuration.
//!
//! This module provides a builder API for configuring FIX engines.

use crate::application::{Application, NoOpApplication, SessionId};
use crate::engine::{Engine, EngineSettings};
use crate::error::EngineError;
use rfqfix_dictionary::Dictionary;
use rfqfix_session::config::SessionConfig;
use rfqfix_store::{MemoryStore, MessageStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring a FIX engine.
pub struct EngineBuilder<A: Application = NoOpApplication> {
    /// Application callback handler.
    application: Arc<A>,
    /// Session configurations.
    sessions: Vec<SessionConfig>,
    /// Stores supplied for specific sessions.
    stores: HashMap<SessionId, Arc<dyn MessageStore>>,
    /// Dictionary inbound messages are validated against.
    dictionary: Option<Dictionary>,
    /// Connection and reconnection settings.
    settings: EngineSettings,
}

impl<A: Application> std::fmt::Debug for EngineBuilder<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("sessions", &self.sessions)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for EngineBuilder<NoOpApplication> {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder<NoOpApplication> {
    /// Creates a new engine builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            application: Arc::new(NoOpApplication),
            sessions: Vec::new(),
            stores: HashMap::new(),
            dictionary: None,
            settings: EngineSettings::default(),
        }
    }
}

impl<A: Application + 'static> EngineBuilder<A> {
    /// Sets the application callback handler.
    #[must_use]
    pub fn with_application<B: Application>(self, application: B) -> EngineBuilder<B> {
        EngineBuilder {
            application: Arc::new(application),
            sessions: self.sessions,
            stores: self.stores,
            dictionary: self.dictionary,
            settings: self.settings,
        }
    }

    /// Adds a session configuration.
    #[must_use]
    pub fn add_session(mut self, config: SessionConfig) -> Self {
        self.sessions.push(config);
        self
    }

    /// Uses `store` for the session identified by `session_id`.
    ///
    /// Sessions without an explicit store get a fresh [`MemoryStore`].
    #[must_use]
    pub fn with_store(mut self, session_id: SessionId, store: Arc<dyn MessageStore>) -> Self {
        self.stores.insert(session_id, store);
        self
    }

    /// Validates every inbound message against `dictionary` before the
    /// application sees it.
    ///
    /// A message that fails is answered with Reject instead of being
    /// delivered; a failing Logon is refused with Logout.
    #[must_use]
    pub fn with_dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.settings.connect_timeout = timeout;
        self
    }

    /// Sets the reconnect interval.
    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.settings.reconnect_interval = interval;
        self
    }

    /// Sets the maximum connect attempts.
    #[must_use]
    pub const fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.settings.max_reconnect_attempts = attempts;
        self
    }

    /// Returns the configured sessions.
    #[must_use]
    pub fn sessions(&self) -> &[SessionConfig] {
        &self.sessions
    }

    /// Returns the connection timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.settings.connect_timeout
    }

    /// Returns the reconnect interval.
    #[must_use]
    pub const fn reconnect_interval(&self) -> Duration {
        self.settings.reconnect_interval
    }

    /// Returns the maximum connect attempts.
    #[must_use]
    pub const fn max_reconnect_attempts(&self) -> u32 {
        self.settings.max_reconnect_attempts
    }

    /// Returns the application handler.
    #[must_use]
    pub fn application(&self) -> Arc<A> {
        Arc::clone(&self.application)
    }

    /// Builds the engine.
    ///
    /// # Errors
    /// `EngineError::Configuration` if no session is configured, two
    /// sessions share an ID, or zero connect attempts are allowed.
    pub fn build(self) -> Result<Engine<A>, EngineError> {
        if self.sessions.is_empty() {
            return Err(EngineError::Configuration(
                "at least one session is required".to_string(),
            ));
        }
        if self.settings.max_reconnect_attempts == 0 {
            return Err(EngineError::Configuration(
                "max_reconnect_attempts must be positive".to_string(),
            ));
        }

        let mut stores = self.stores;
        for config in &self.sessions {
            let id = SessionId::from_config(config);
            if self.sessions.iter().filter(|c| SessionId::from_config(c) == id).count() > 1 {
                return Err(EngineError::Configuration(format!("duplicate session {id}")));
            }
            stores
                .entry(id)
                .or_insert_with(|| Arc::new(MemoryStore::new()));
        }

        Ok(Engine::new(
            self.application,
            self.sessions,
            stores,
            self.dictionary,
            self.settings,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfqfix_core::types::CompId;

    fn config(sender: &str, target: &str) -> SessionConfig {
        SessionConfig::new(
            CompId::new(sender).unwrap(),
            CompId::new(target).unwrap(),
            "FIX.4.2",
        )
    }

    #[test]
    fn test_engine_builder_default() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.connect_timeout(), Duration::from_secs(30));
        assert_eq!(builder.max_reconnect_attempts(), 10);
        assert!(builder.sessions().is_empty());
    }

    #[test]
    fn test_engine_builder_with_session() {
        let builder = EngineBuilder::new()
            .add_session(config("BANK", "CLIENT"))
            .with_connect_timeout(Duration::from_secs(60))
            .with_reconnect_interval(Duration::from_secs(1));

        assert_eq!(builder.sessions().len(), 1);
        assert_eq!(builder.connect_timeout(), Duration::from_secs(60));
        assert_eq!(builder.reconnect_interval(), Duration::from_secs(1));

        let engine = builder.build().unwrap();
        let ids = engine.session_ids();
        assert_eq!(ids, vec![SessionId::new("FIX.4.2", "BANK", "CLIENT")]);
    }

    #[test]
    fn test_engine_builder_rejects_bad_setup() {
        assert!(matches!(
            EngineBuilder::new().build(),
            Err(EngineError::Configuration(_))
        ));

        let duplicate = EngineBuilder::new()
            .add_session(config("BANK", "CLIENT"))
            .add_session(config("BANK", "CLIENT"))
            .build();
        assert!(duplicate.is_err());

        let no_attempts = EngineBuilder::new()
            .add_session(config("BANK", "CLIENT"))
            .with_max_reconnect_attempts(0)
            .build();
        assert!(no_attempts.is_err());
    }
}
