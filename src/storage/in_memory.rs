//! In-memory implementation of PlantStore for testing and development

use crate::core::plant::Plant;
use crate::core::query::{Pagination, PlantFilter, SortDirection, SortField, SortSpec};
use crate::core::store::PlantStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

/// In-memory plant store
///
/// Records keep insertion order, which stands in for a document store's
/// natural order. Ids are assigned sequentially on insert. Uses RwLock for
/// thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryPlantStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    plants: Vec<Plant>,
    next_id: u64,
}

impl InMemoryPlantStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `plants`
    ///
    /// Records without an id get one assigned, as on insert.
    pub fn with_plants(plants: Vec<Plant>) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.write() {
            state.push_all(plants);
        }
        store
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.plants.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StoreState {
    fn push_all(&mut self, plants: Vec<Plant>) -> usize {
        let count = plants.len();
        for mut plant in plants {
            if plant.id.is_none() {
                self.next_id += 1;
                plant.id = Some(format!("{:024x}", self.next_id));
            }
            self.plants.push(plant);
        }
        count
    }
}

/// Predicate compiled from a [`PlantFilter`]
struct Matcher<'a> {
    filter: &'a PlantFilter,
    name: Option<Regex>,
}

impl<'a> Matcher<'a> {
    fn new(filter: &'a PlantFilter) -> Result<Self> {
        let name = filter
            .name_pattern()
            .map(|pattern| {
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| anyhow!("Invalid name pattern: {}", e))
            })
            .transpose()?;

        Ok(Self { filter, name })
    }

    fn matches(&self, plant: &Plant) -> bool {
        let f = self.filter;
        // a predicate on a missing attribute never matches
        f.category
            .as_ref()
            .is_none_or(|c| plant.category.as_ref() == Some(c))
            && f.min_price
                .is_none_or(|min| plant.price.is_some_and(|p| p >= min))
            && f.max_price
                .is_none_or(|max| plant.price.is_some_and(|p| p <= max))
            && f.min_rating
                .is_none_or(|min| plant.rating.is_some_and(|r| r >= min))
            && self.name.as_ref().is_none_or(|re| {
                plant.name.as_deref().is_some_and(|n| re.is_match(n))
            })
    }
}

/// Missing values order before every number, as they do in MongoDB
fn compare_values(x: Option<f64>, y: Option<f64>) -> Ordering {
    match (x, y) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (x, y) => x.is_some().cmp(&y.is_some()),
    }
}

fn compare(a: &Plant, b: &Plant, sort: SortSpec) -> Ordering {
    let (x, y) = match sort.field {
        SortField::Price => (a.price, b.price),
        SortField::Rating => (a.rating, b.rating),
    };
    match sort.direction {
        SortDirection::Asc => compare_values(x, y),
        SortDirection::Desc => compare_values(y, x),
    }
}

#[async_trait]
impl PlantStore for InMemoryPlantStore {
    async fn count(&self, filter: &PlantFilter) -> Result<u64> {
        let matcher = Matcher::new(filter)?;
        let state = self
            .state
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(state.plants.iter().filter(|p| matcher.matches(p)).count() as u64)
    }

    async fn find(
        &self,
        filter: &PlantFilter,
        sort: Option<SortSpec>,
        pagination: Pagination,
    ) -> Result<Vec<Plant>> {
        let matcher = Matcher::new(filter)?;
        let state = self
            .state
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matched: Vec<&Plant> = state.plants.iter().filter(|p| matcher.matches(p)).collect();
        if let Some(sort) = sort {
            // stable, so ties keep natural order
            matched.sort_by(|a, b| compare(a, b, sort));
        }

        let skip = usize::try_from(pagination.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(skip).take(limit).cloned().collect())
    }

    async fn insert_many(&self, plants: Vec<Plant>) -> Result<usize> {
        let mut state = self
            .state
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(state.push_all(plants))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
