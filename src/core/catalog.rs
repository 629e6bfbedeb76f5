//! Catalog service: paginated listing and seeding

use crate::core::error::{PlantifyError, StorageError, StoreOperation};
use crate::core::plant::Plant;
use crate::core::query::{CompiledQuery, PaginatedPlants, PlantQueryParams};
use crate::core::store::PlantStore;
use std::sync::Arc;

/// Service answering catalog requests against a [`PlantStore`]
///
/// Cheap to clone; every clone shares the same store handle and seed list.
#[derive(Clone)]
pub struct PlantCatalog {
    store: Arc<dyn PlantStore>,
    seed: Arc<[Plant]>,
}

impl PlantCatalog {
    /// Create a catalog with an empty seed list
    pub fn new(store: Arc<dyn PlantStore>) -> Self {
        Self {
            store,
            seed: Arc::from(Vec::new()),
        }
    }

    /// Set the records inserted by [`PlantCatalog::seed`]
    pub fn with_seed(mut self, plants: Vec<Plant>) -> Self {
        self.seed = Arc::from(plants);
        self
    }

    /// Compile the query parameters and fetch one page
    pub async fn list(&self, params: &PlantQueryParams) -> Result<PaginatedPlants, PlantifyError> {
        let query = params.compile();
        tracing::debug!(?query, "Compiled plant query");
        self.fetch(&query).await
    }

    /// Count and fetch one page for an already compiled query
    ///
    /// The count ignores the window; both queries use the same filter.
    pub async fn fetch(&self, query: &CompiledQuery) -> Result<PaginatedPlants, PlantifyError> {
        let (total, plants) = tokio::try_join!(
            self.store.count(&query.filter),
            self.store.find(&query.filter, query.sort, query.pagination),
        )
        .map_err(|e| StorageError::new(StoreOperation::FetchPlants, &e))?;

        Ok(PaginatedPlants::new(plants, total, query.pagination))
    }

    /// Insert the seed list in one batch, returning the inserted count
    ///
    /// Not idempotent: every call inserts the full list again.
    pub async fn seed(&self) -> Result<usize, PlantifyError> {
        let count = self
            .store
            .insert_many(self.seed.to_vec())
            .await
            .map_err(|e| StorageError::new(StoreOperation::SeedPlants, &e))?;

        tracing::info!(count, "Seeded plant catalog");
        Ok(count)
    }
}
