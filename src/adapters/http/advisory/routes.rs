//! Route definitions for the advisory endpoints

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{chat, health, history, reset_session, AdvisoryAppState};

/// Create the advisory router with all endpoints
///
/// # Endpoints
///
/// - `POST /api/chat` - Run one conversational turn
/// - `POST /api/sessions/:id/reset` - Reset a session
/// - `GET /api/sessions/:id/history` - Read the turn log
/// - `GET /health` - Liveness probe
pub fn routes() -> Router<AdvisoryAppState> {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/api/sessions/:id/history", get(history))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_creates_valid_router() {
        // Ensures the route configuration compiles and creates a valid router
        let _routes = routes();
    }
}
