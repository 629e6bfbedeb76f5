//! Built-in sample catalog used by `POST /plants/seed`

use crate::core::plant::Plant;
use anyhow::{Result, anyhow};

const SEED_PLANTS_JSON: &str = include_str!("../data/plants.json");

/// Parse the sample catalog embedded in the binary
pub fn default_plants() -> Result<Vec<Plant>> {
    serde_json::from_str(SEED_PLANTS_JSON)
        .map_err(|e| anyhow!("Failed to parse embedded seed data: {}", e))
}
