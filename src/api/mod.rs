//! HTTP API module.
//!
//! Exposes the selection policy, the model table and the agent roster as a
//! small JSON API.

mod handlers;
mod server;
pub mod types;

pub use server::{create_router, run_server, AppState, RequestId, REQUEST_ID_HEADER};
pub use types::{CompareRequest, CompareResponse, ComparisonEntry, SelectionResponse};
