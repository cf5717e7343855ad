//! Shared application state for the payroll engine API.

use std::sync::Arc;

use crate::engine::ApprovalEngine;

/// Shared state passed to every handler.
///
/// The engine is wrapped in an `Arc`, so cloning the state is cheap.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<ApprovalEngine>,
}

impl AppState {
    /// Creates application state around the given engine.
    pub fn new(engine: Arc<ApprovalEngine>) -> Self {
        Self { engine }
    }

    /// Access to the approval engine.
    pub fn engine(&self) -> &ApprovalEngine {
        &self.engine
    }
}
