//! Plant catalog record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A plant stored in the catalog collection
///
/// Only the attributes the query layer filters and sorts on are typed. Any
/// other attribute of the stored document (description, image, stock, ...)
/// is kept in `extra` so records round-trip without loss.
///
/// The collection is written by other tools too, so a typed attribute may be
/// missing from a stored document. It stays absent in the response instead of
/// failing the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    /// Store-assigned identity, absent until the record is inserted
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Non-negative price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Rating in the 0-5 range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Plant {
    /// Create a plant with no store identity and no extra attributes
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64, rating: f64) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            category: Some(category.into()),
            price: Some(price),
            rating: Some(rating),
            extra: Map::new(),
        }
    }

    /// Attach an extra attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
