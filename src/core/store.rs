//! Store trait for the plant collection

use crate::core::plant::Plant;
use crate::core::query::{Pagination, PlantFilter, SortSpec};
use anyhow::Result;
use async_trait::async_trait;

/// Document store holding the plant collection
///
/// Implementations translate the store-agnostic [`PlantFilter`] and
/// [`SortSpec`] into whatever their backend needs. Handles are shared by all
/// requests and must be safe to use concurrently.
#[async_trait]
pub trait PlantStore: Send + Sync {
    /// Count the records matching `filter`, ignoring any window
    async fn count(&self, filter: &PlantFilter) -> Result<u64>;

    /// Fetch one window of the records matching `filter`
    ///
    /// Records are ordered by `sort` (natural store order when `None`), the
    /// first `pagination.skip()` are dropped and at most `pagination.limit`
    /// are returned.
    async fn find(
        &self,
        filter: &PlantFilter,
        sort: Option<SortSpec>,
        pagination: Pagination,
    ) -> Result<Vec<Plant>>;

    /// Insert all records in one batch, returning how many were inserted
    async fn insert_many(&self, plants: Vec<Plant>) -> Result<usize>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<()>;
}
