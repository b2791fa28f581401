//! HTTP API module for the benefit consolidation engine.
//!
//! A single chat ingress: trigger phrases run the consolidation, anything
//! else is passed through to the language model.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ChatRequest, TRIGGER_PHRASES, is_consolidation_request};
pub use response::{ApiError, ApiErrorResponse, ChatResponse, HealthResponse};
pub use state::AppState;
