// ABOUTME: Shared application state for the sessiongate HTTP server.
// ABOUTME: Holds the session, the command runner, and the event feed mode chosen at startup.

use std::sync::Arc;

use sessiongate_core::{CommandRunner, Interpreter, Session};

use crate::config::EventFeedMode;

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub session: Arc<Session>,
    pub runner: Arc<dyn CommandRunner>,
    pub event_feed: EventFeedMode,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        session: Arc<Session>,
        runner: Arc<dyn CommandRunner>,
        event_feed: EventFeedMode,
    ) -> Self {
        Self {
            session,
            runner,
            event_feed,
        }
    }

    /// State backed by the built-in interpreter over `session`.
    pub fn with_interpreter(session: Arc<Session>, event_feed: EventFeedMode) -> Self {
        let runner = Arc::new(Interpreter::new(Arc::clone(&session)));
        Self::new(session, runner, event_feed)
    }
}
