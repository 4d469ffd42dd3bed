//! Advisory HTTP adapter: DTOs, handlers and routes.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ChatResponse, ErrorResponse, HistoryResponse, ResetResponse};
pub use handlers::AdvisoryAppState;
pub use routes::routes as advisory_routes;
