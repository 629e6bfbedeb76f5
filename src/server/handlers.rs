//! HTTP handlers for the catalog endpoints

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::core::{PaginatedPlants, PlantCatalog, PlantQueryParams, PlantifyError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: PlantCatalog,
}

/// Response for the seed endpoint
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub count: usize,
}

/// Liveness message
///
/// GET /
pub async fn root() -> &'static str {
    "Plantify API is running!"
}

/// Health check endpoint handler
///
/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "plantify"
    }))
}

/// List plants with filtering, sorting and pagination
///
/// GET /plants?page&limit&category&minPrice&maxPrice&rating&search&sort
///
/// Unparseable numbers, unknown sort keys and repeated keys are ignored
/// rather than rejected.
pub async fn list_plants(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PaginatedPlants>, PlantifyError> {
    let params: PlantQueryParams = pairs.into_iter().collect();
    let page = state.catalog.list(&params).await.inspect_err(|e| {
        tracing::error!(error = %e, "Error fetching plants");
    })?;

    Ok(Json(page))
}

/// Insert the built-in sample catalog
///
/// POST /plants/seed
///
/// Every call inserts the full sample list again.
pub async fn seed_plants(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SeedResponse>), PlantifyError> {
    let count = state.catalog.seed().await.inspect_err(|e| {
        tracing::error!(error = %e, "Error seeding plants");
    })?;

    Ok((
        StatusCode::CREATED,
        Json(SeedResponse {
            message: "Plants seeded successfully".to_string(),
            count,
        }),
    ))
}
