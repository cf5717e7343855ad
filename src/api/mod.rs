//! HTTP API for the payroll engine.
//!
//! This module provides the REST surface over the approval engine: entity
//! creation, the approval and settlement transitions, summaries, and the
//! notification endpoints.

pub mod handlers;
pub mod request;
pub mod response;
pub mod state;

pub use handlers::create_router;
pub use state::AppState;
