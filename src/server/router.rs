//! Route table for the catalog API

use crate::server::handlers::{AppState, health_check, list_plants, root, seed_plants};
use axum::{
    Router,
    routing::{get, post},
};

/// Build the catalog routes
///
/// - GET  /             - Liveness message
/// - GET  /health       - Health check
/// - GET  /plants       - Filtered, sorted, paginated listing
/// - POST /plants/seed  - Insert the sample catalog
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/plants", get(list_plants))
        .route("/plants/seed", post(seed_plants))
        .with_state(state)
}
