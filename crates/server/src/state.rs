//! Shared application state for the Axum server.

use std::sync::Arc;

use herald_engine::handlers::TaskEventHandlers;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub handlers: Arc<TaskEventHandlers>,
}

impl AppState {
    pub fn new(handlers: Arc<TaskEventHandlers>) -> Self {
        Self { handlers }
    }
}
