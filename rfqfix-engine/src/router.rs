/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message routing by BeginString and MsgType.
//!
//! Typed message modules expose a `route` adapter returning
//! `(begin_string, msg_type, route)`; registering those with a
//! [`MessageRouter`] lets an [`Application`](crate::Application) dispatch
//! `from_app` to typed handlers.

use crate::application::SessionId;
use rfqfix_core::error::MessageRejectError;
use rfqfix_tagvalue::Message;
use std::collections::HashMap;
use std::fmt;

/// Callback invoked for one routed message.
pub type MessageRoute =
    Box<dyn Fn(&Message, &SessionId) -> Result<(), MessageRejectError> + Send + Sync>;

/// Dispatch table keyed by `(BeginString, MsgType)`.
#[derive(Default)]
pub struct MessageRouter {
    routes: HashMap<(String, String), MessageRoute>,
}

impl fmt::Debug for MessageRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRouter")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MessageRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route, replacing any previous one for the same key.
    pub fn add_route(
        &mut self,
        (begin_string, msg_type, route): (&str, &str, MessageRoute),
    ) -> &mut Self {
        self.routes
            .insert((begin_string.to_string(), msg_type.to_string()), route);
        self
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatches `message` to its route.
    ///
    /// # Errors
    /// Whatever the route returns; `UnsupportedMessageType` for an
    /// application message without a route. Session-level messages without
    /// a route are accepted.
    pub fn route(&self, message: &Message, session_id: &SessionId) -> Result<(), MessageRejectError> {
        let begin_string = message
            .begin_string()
            .ok_or_else(|| MessageRejectError::required_tag_missing(8))?;
        let msg_type = message.msg_type()?;

        let key = (begin_string.to_string(), msg_type.as_str().to_string());
        match self.routes.get(&key) {
            Some(route) => route(message, session_id),
            None if msg_type.is_admin() => Ok(()),
            None => Err(MessageRejectError::unsupported_message_type()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfqfix_core::error::RejectReason;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session_id() -> SessionId {
        SessionId::new("FIX.4.2", "BANK", "CLIENT")
    }

    #[test]
    fn test_route_dispatches_by_key() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let mut router = MessageRouter::new();
        router.add_route((
            "FIX.4.2",
            "AH",
            Box::new(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        ));
        assert_eq!(router.len(), 1);

        let message = Message::with_type("FIX.4.2", "AH");
        router.route(&message, &session_id()).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let other_version = Message::with_type("FIX.4.4", "AH");
        let err = router.route(&other_version, &session_id()).unwrap_err();
        assert_eq!(err.reason(), RejectReason::UnsupportedMessageType);
    }

    #[test]
    fn test_unrouted_admin_accepted() {
        let router = MessageRouter::new();
        let message = Message::with_type("FIX.4.2", "3");
        assert!(router.route(&message, &session_id()).is_ok());
    }

    #[test]
    fn test_route_error_propagates() {
        let mut router = MessageRouter::new();
        router.add_route((
            "FIX.4.2",
            "AJ",
            Box::new(|_, _| Err(MessageRejectError::required_tag_missing(693))),
        ));
        let err = router
            .route(&Message::with_type("FIX.4.2", "AJ"), &session_id())
            .unwrap_err();
        assert_eq!(err.ref_tag(), Some(693));
    }
}
