//! Server module exposing the catalog over HTTP
//!
//! [`ServerBuilder`] wires a [`PlantStore`](crate::core::PlantStore) into the
//! route table and applies CORS and request tracing.

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
