//! Core module containing the catalog model, query compiler and service

pub mod catalog;
pub mod error;
pub mod plant;
pub mod query;
pub mod store;

pub use catalog::PlantCatalog;
pub use error::{ConfigError, PlantifyError, StorageError, StoreOperation};
pub use plant::Plant;
pub use query::{
    CompiledQuery, PaginatedPlants, Pagination, PlantFilter, PlantQueryParams, SortDirection,
    SortField, SortSpec,
};
pub use store::PlantStore;
