//! HTTP API module for the Shipping Cost Resolution Engine.
//!
//! This module provides the REST endpoints for computing shipping quotes
//! against the current configuration snapshot.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DimensionsRequest, QuoteItemRequest, QuoteRequest};
pub use response::ApiError;
pub use state::AppState;
