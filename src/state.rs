//! Shared application state.

use crate::dispatcher::Dispatcher;

/// Handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}
