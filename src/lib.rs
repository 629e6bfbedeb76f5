//! # Plantify
//!
//! HTTP API exposing a plant catalog stored in MongoDB.
//!
//! ## Endpoints
//!
//! - `GET /` - liveness message
//! - `GET /plants` - list plants with filtering, sorting and pagination
//! - `POST /plants/seed` - insert the built-in sample catalog
//!
//! ## Query parameters for `GET /plants`
//!
//! | Parameter | Effect |
//! |---|---|
//! | `category` | exact category match |
//! | `minPrice` / `maxPrice` | inclusive price bounds |
//! | `rating` | minimum rating |
//! | `search` | case-insensitive substring of the name |
//! | `sort` | `price-asc`, `price-desc` or `rating-desc` |
//! | `page` / `limit` | window, defaults 1 and 12 |
//!
//! Malformed values are ignored instead of rejected.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plantify::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_store(InMemoryPlantStore::with_plants(vec![
//!         Plant::new("Aloe", "succulent", 10.0, 4.0),
//!     ]))
//!     .build()?;
//! ```

pub mod config;
pub mod core;
pub mod seed;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        CompiledQuery, PaginatedPlants, Pagination, Plant, PlantCatalog, PlantFilter,
        PlantQueryParams, PlantStore, PlantifyError, SortDirection, SortField, SortSpec,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryPlantStore, MongoPlantStore};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};
}
