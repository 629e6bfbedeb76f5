//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides [`MongoPlantStore`], backed by one collection of a
//! `mongodb::Database`.
//!
//! # Query translation
//!
//! The store-agnostic [`PlantFilter`] becomes a single filter document:
//!
//! | Predicate | Filter document |
//! |---|---|
//! | category | `{ "category": <value> }` |
//! | min/max price | `{ "price": { "$gte": <min>, "$lte": <max> } }` |
//! | min rating | `{ "rating": { "$gte": <min> } }` |
//! | name | `{ "name": { "$regex": <escaped>, "$options": "i" } }` |
//!
//! # Serialization strategy
//!
//! Records go through `serde_json::Value` on their way to and from BSON. The
//! store-assigned `ObjectId` is exposed to clients as its hex string under
//! `_id`. `price` and `rating` stored as `Decimal128` are read back as plain
//! numbers. A stored document that still cannot be read as a plant is logged
//! and left out of the page.

use crate::core::plant::Plant;
use crate::core::query::{Pagination, PlantFilter, SortDirection, SortSpec};
use crate::core::store::PlantStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use serde_json::{Map, Value};

/// Largest skip the driver can encode (`skip` is sent as a signed 64-bit int)
const MAX_SKIP: u64 = i64::MAX as u64;

/// Attributes decoded as numbers whatever BSON numeric type stores them
const NUMERIC_FIELDS: [&str; 2] = ["price", "rating"];

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Translate a filter into a MongoDB filter document
fn filter_document(filter: &PlantFilter) -> Document {
    let mut query = Document::new();

    if let Some(category) = &filter.category {
        query.insert("category", category.as_str());
    }

    let mut price = Document::new();
    if let Some(min) = filter.min_price {
        price.insert("$gte", min);
    }
    if let Some(max) = filter.max_price {
        price.insert("$lte", max);
    }
    if !price.is_empty() {
        query.insert("price", price);
    }

    if let Some(min) = filter.min_rating {
        query.insert("rating", doc! { "$gte": min });
    }

    if let Some(pattern) = filter.name_pattern() {
        query.insert("name", doc! { "$regex": pattern, "$options": "i" });
    }

    query
}

/// Translate an ordering into a MongoDB sort document
///
/// Ties are broken by `_id` so consecutive pages never overlap.
fn sort_document(sort: SortSpec) -> Document {
    let direction = match sort.direction {
        SortDirection::Asc => 1,
        SortDirection::Desc => -1,
    };
    let field = sort.field.as_str();
    doc! { field: direction, "_id": 1 }
}

/// Convert a plant into a BSON document ready for insertion
fn plant_to_document(plant: &Plant) -> Result<Document> {
    let json =
        serde_json::to_value(plant).map_err(|e| anyhow!("Failed to serialize plant: {}", e))?;
    let bson = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    match bson {
        Bson::Document(d) => Ok(d),
        _ => Err(anyhow!("Expected BSON document, got non-object")),
    }
}

/// Convert a stored document back into a plant
///
/// An `ObjectId` identity is rendered as its hex string.
fn document_to_plant(mut doc: Document) -> Result<Plant> {
    if let Some(id) = doc.remove("_id") {
        let id = match id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        };
        doc.insert("_id", id);
    }

    let mut json = Bson::Document(doc).into_relaxed_extjson();
    if let Value::Object(fields) = &mut json {
        for key in NUMERIC_FIELDS {
            normalize_number(fields, key);
        }
    }

    serde_json::from_value(json)
        .map_err(|e| anyhow!("Failed to deserialize plant from document: {}", e))
}

/// Replace an extended-JSON number wrapper with a plain JSON number
///
/// `Decimal128` renders as `{"$numberDecimal": "12.50"}` and non-finite
/// doubles as `{"$numberDouble": "NaN"}`. Values with no finite JSON
/// representation are dropped, leaving the attribute absent.
fn normalize_number(fields: &mut Map<String, Value>, key: &str) {
    let Some(Value::Object(wrapper)) = fields.get(key) else {
        return;
    };

    let parsed = ["$numberDecimal", "$numberDouble"]
        .iter()
        .find_map(|tag| wrapper.get(*tag))
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<f64>().ok())
        .and_then(serde_json::Number::from_f64);

    match parsed {
        Some(number) => {
            fields.insert(key.to_string(), Value::Number(number));
        }
        None => {
            fields.remove(key);
        }
    }
}

/// Stable API v1, rejecting commands outside it and deprecated behavior
fn stable_api() -> ServerApi {
    ServerApi::builder()
        .version(ServerApiVersion::V1)
        .strict(true)
        .deprecation_errors(true)
        .build()
}

/// Driver-level skip and limit for a window
fn window(pagination: Pagination) -> (u64, i64) {
    let skip = pagination.skip().min(MAX_SKIP);
    let limit = i64::try_from(pagination.limit).unwrap_or(i64::MAX);
    (skip, limit)
}

// ---------------------------------------------------------------------------
// MongoPlantStore
// ---------------------------------------------------------------------------

/// Plant store backed by a MongoDB collection.
///
/// The driver's `Database` handle is internally pooled, so one store is
/// shared by every request.
///
/// # Example
///
/// ```rust,ignore
/// use plantify::storage::MongoPlantStore;
///
/// let store = MongoPlantStore::connect("mongodb://localhost:27017", "plantify", "plants").await?;
/// store.ping().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoPlantStore {
    client: Client,
    database: Database,
    collection_name: String,
}

impl MongoPlantStore {
    /// Create a store over an existing database handle
    pub fn new(client: Client, database: &str, collection: &str) -> Self {
        Self {
            database: client.database(database),
            client,
            collection_name: collection.to_string(),
        }
    }

    /// Build a client for `uri` pinned to Stable API v1 in strict mode
    ///
    /// No network traffic happens until the first operation; call
    /// [`PlantStore::ping`] to verify the connection.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| anyhow!("Failed to parse MongoDB connection string: {}", e))?;
        options.server_api = Some(stable_api());

        let client = Client::with_options(options)
            .map_err(|e| anyhow!("Failed to create MongoDB client: {}", e))?;

        Ok(Self::new(client, database, collection))
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(&self.collection_name)
    }
}

#[async_trait]
impl PlantStore for MongoPlantStore {
    async fn count(&self, filter: &PlantFilter) -> Result<u64> {
        self.collection()
            .count_documents(filter_document(filter))
            .await
            .map_err(|e| anyhow!("Failed to count plants: {}", e))
    }

    async fn find(
        &self,
        filter: &PlantFilter,
        sort: Option<SortSpec>,
        pagination: Pagination,
    ) -> Result<Vec<Plant>> {
        let (skip, limit) = window(pagination);
        let collection = self.collection();

        let mut action = collection
            .find(filter_document(filter))
            .skip(skip)
            .limit(limit);
        if let Some(sort) = sort {
            action = action.sort(sort_document(sort));
        }

        let cursor = action
            .await
            .map_err(|e| anyhow!("Failed to find plants: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect plants: {}", e))?;

        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                document_to_plant(doc)
                    .inspect_err(|e| tracing::warn!(error = %e, "Skipping unreadable plant"))
                    .ok()
            })
            .collect())
    }

    /// Insert all plants with one `insertMany`.
    ///
    /// An empty batch is a no-op; the server rejects empty inserts.
    async fn insert_many(&self, plants: Vec<Plant>) -> Result<usize> {
        if plants.is_empty() {
            return Ok(0);
        }

        let docs = plants
            .iter()
            .map(plant_to_document)
            .collect::<Result<Vec<_>>>()?;

        let result = self
            .collection()
            .insert_many(docs)
            .await
            .map_err(|e| anyhow!("Failed to insert plants: {}", e))?;

        Ok(result.inserted_ids.len())
    }

    /// Run `{ ping: 1 }` against the `admin` database.
    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| anyhow!("Failed to ping MongoDB: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::PlantQueryParams;
    use mongodb::bson::Decimal128;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    fn compile(params: PlantQueryParams) -> Document {
        filter_document(&params.filter())
    }

    // -----------------------------------------------------------------------
    // filter_document
    // -----------------------------------------------------------------------

    #[test]
    fn empty_filter_is_empty_document() {
        assert!(filter_document(&PlantFilter::default()).is_empty());
    }

    #[test]
    fn category_is_exact_match() {
        let doc = compile(PlantQueryParams {
            category: Some("succulent".to_string()),
            ..Default::default()
        });
        assert_eq!(doc, doc! { "category": "succulent" });
    }

    #[test]
    fn price_bounds_share_one_subdocument() {
        let doc = compile(PlantQueryParams {
            min_price: Some("5".to_string()),
            max_price: Some("20".to_string()),
            ..Default::default()
        });
        assert_eq!(doc, doc! { "price": { "$gte": 5.0, "$lte": 20.0 } });
    }

    #[test]
    fn only_max_price() {
        let doc = compile(PlantQueryParams {
            max_price: Some("9.99".to_string()),
            ..Default::default()
        });
        assert_eq!(doc, doc! { "price": { "$lte": 9.99 } });
    }

    #[test]
    fn rating_is_lower_bound() {
        let doc = compile(PlantQueryParams {
            rating: Some("4".to_string()),
            ..Default::default()
        });
        assert_eq!(doc, doc! { "rating": { "$gte": 4.0 } });
    }

    #[test]
    fn search_uses_escaped_case_insensitive_regex() {
        let doc = compile(PlantQueryParams {
            search: Some("fern+".to_string()),
            ..Default::default()
        });
        assert_eq!(doc, doc! { "name": { "$regex": r"fern\+", "$options": "i" } });
    }

    #[test]
    fn unparseable_min_price_is_omitted() {
        let doc = compile(PlantQueryParams {
            min_price: Some("abc".to_string()),
            ..Default::default()
        });
        assert!(doc.is_empty());
    }

    // -----------------------------------------------------------------------
    // sort_document
    // -----------------------------------------------------------------------

    #[test]
    fn sort_documents() {
        let sort = |key| sort_document(SortSpec::from_key(key).unwrap());
        assert_eq!(sort("price-asc"), doc! { "price": 1, "_id": 1 });
        assert_eq!(sort("price-desc"), doc! { "price": -1, "_id": 1 });
        assert_eq!(sort("rating-desc"), doc! { "rating": -1, "_id": 1 });
    }

    // -----------------------------------------------------------------------
    // document conversion
    // -----------------------------------------------------------------------

    #[test]
    fn plant_to_document_omits_missing_id() {
        let doc = plant_to_document(&Plant::new("Aloe", "succulent", 10.0, 4.0)).unwrap();
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("name").unwrap(), "Aloe");
        assert_eq!(doc.get_f64("price").unwrap(), 10.0);
    }

    #[test]
    fn plant_to_document_flattens_extra() {
        let plant = Plant::new("Aloe", "succulent", 10.0, 4.0).with_attribute("stock", json!(3));
        let doc = plant_to_document(&plant).unwrap();
        assert_eq!(doc.get_i64("stock").unwrap(), 3);
    }

    #[test]
    fn document_to_plant_renders_object_id_as_hex() {
        let oid = ObjectId::new();
        let doc = doc! {
            "_id": oid,
            "name": "Basil",
            "category": "herb",
            "price": 5,
            "rating": 3.5,
            "image": "basil.png"
        };

        let plant = document_to_plant(doc).unwrap();
        assert_eq!(plant.id, Some(oid.to_hex()));
        assert_eq!(plant.price, Some(5.0));
        assert_eq!(plant.rating, Some(3.5));
        assert_eq!(plant.extra["image"], "basil.png");
    }

    #[test]
    fn document_to_plant_tolerates_missing_rating() {
        let doc = doc! {
            "_id": ObjectId::new(),
            "name": "New",
            "category": "herb",
            "price": 3
        };

        let plant = document_to_plant(doc).unwrap();
        assert_eq!(plant.name.as_deref(), Some("New"));
        assert_eq!(plant.price, Some(3.0));
        assert_eq!(plant.rating, None);
    }

    #[test]
    fn document_to_plant_reads_decimal128_as_number() {
        let price: Decimal128 = "12.50".parse().unwrap();
        let doc = doc! {
            "_id": ObjectId::new(),
            "name": "Fern",
            "category": "foliage",
            "price": price,
            "rating": 4.5
        };

        let plant = document_to_plant(doc).unwrap();
        assert_eq!(plant.price, Some(12.5));
    }

    #[test]
    fn document_to_plant_drops_non_finite_numbers() {
        let doc = doc! { "name": "Odd", "price": f64::NAN, "rating": 4.0 };

        let plant = document_to_plant(doc).unwrap();
        assert_eq!(plant.price, None);
        assert_eq!(plant.rating, Some(4.0));
    }

    #[test]
    fn document_to_plant_wrong_type_is_error() {
        let doc = doc! { "_id": ObjectId::new(), "name": "Cheap", "price": "cheap" };
        let err = document_to_plant(doc).unwrap_err().to_string();
        assert!(err.contains("Failed to deserialize plant"), "got: {err}");
    }

    #[test]
    fn stable_api_is_strict_v1() {
        let api = stable_api();
        assert!(matches!(api.version, ServerApiVersion::V1));
        assert_eq!(api.strict, Some(true));
        assert_eq!(api.deprecation_errors, Some(true));
    }

    // -----------------------------------------------------------------------
    // window
    // -----------------------------------------------------------------------

    #[test]
    fn window_matches_pagination() {
        assert_eq!(window(Pagination { page: 3, limit: 10 }), (20, 10));
    }

    #[test]
    fn window_clamps_skip_to_driver_range() {
        let huge = Pagination {
            page: 1_000_000_000_000_000_000,
            limit: 12,
        };
        let (skip, limit) = window(huge);
        assert_eq!(skip, i64::MAX as u64);
        assert!(i64::try_from(skip).is_ok());
        assert_eq!(limit, 12);
    }
}
