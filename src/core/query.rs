//! Query compilation and pagination for the plant listing
//!
//! Query-string parameters arrive as optional strings and are compiled into a
//! store-agnostic [`PlantFilter`], an optional [`SortSpec`] and a
//! [`Pagination`] window. Compilation never fails: malformed input degrades to
//! "predicate omitted", "no explicit order" or the default window.

use crate::core::plant::Plant;
use serde::{Deserialize, Serialize};

/// Page used when `page` is missing or not a positive integer
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when `limit` is missing or not a positive integer
pub const DEFAULT_LIMIT: u64 = 12;

/// Raw query parameters for `GET /plants`
///
/// Every field is kept as the string the client sent so that parsing policy
/// lives in one place ([`PlantQueryParams::compile`]) instead of in the
/// extractor, which would reject the request on a bad number or a repeated
/// key. Built from the decoded key/value pairs with [`FromIterator`]; the
/// first occurrence of a key wins and unknown keys are ignored.
///
/// # Example
/// ```text
/// GET /plants?category=succulent&minPrice=5&maxPrice=20&sort=price-asc
/// GET /plants?search=fern&rating=4&page=2&limit=6
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlantQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub rating: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl PlantQueryParams {
    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "page" => &mut self.page,
            "limit" => &mut self.limit,
            "category" => &mut self.category,
            "minPrice" => &mut self.min_price,
            "maxPrice" => &mut self.max_price,
            "rating" => &mut self.rating,
            "search" => &mut self.search,
            "sort" => &mut self.sort,
            _ => return None,
        };
        Some(slot)
    }

    /// Compile the parameters into a filter, an optional sort and a window
    pub fn compile(&self) -> CompiledQuery {
        CompiledQuery {
            filter: self.filter(),
            sort: self.sort.as_deref().and_then(SortSpec::from_key),
            pagination: Pagination::from_raw(self.page.as_deref(), self.limit.as_deref()),
        }
    }

    /// Build the filter predicates from the query parameters
    pub fn filter(&self) -> PlantFilter {
        PlantFilter {
            category: non_empty(self.category.as_deref()),
            min_price: parse_lenient_f64(self.min_price.as_deref()),
            max_price: parse_lenient_f64(self.max_price.as_deref()),
            min_rating: parse_lenient_f64(self.rating.as_deref()),
            name_contains: non_empty(self.search.as_deref()),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for PlantQueryParams
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            if let Some(slot) = params.slot(key.as_ref()) {
                slot.get_or_insert_with(|| value.into());
            }
        }
        params
    }
}

/// Parse a decimal, treating anything unparseable as absent
///
/// This is intentionally lenient: `minPrice=abc` behaves exactly like no
/// `minPrice` at all and the caller gets no feedback. Surrounding whitespace
/// is ignored and non-finite values (`NaN`, `inf`) count as unparseable.
pub fn parse_lenient_f64(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse a strictly positive integer, treating anything else as absent
pub fn parse_positive_u64(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Conjunction of optional predicates over plant records
///
/// A `None` field means the predicate is absent. A filter with every field
/// `None` matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantFilter {
    /// Exact category match
    pub category: Option<String>,

    /// `price >= min_price`
    pub min_price: Option<f64>,

    /// `price <= max_price`
    pub max_price: Option<f64>,

    /// `rating >= min_rating`
    pub min_rating: Option<f64>,

    /// Case-insensitive substring of `name`, taken literally
    pub name_contains: Option<String>,
}

impl PlantFilter {
    /// Whether this filter matches every record
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_rating.is_none()
            && self.name_contains.is_none()
    }

    /// Regular expression for the name predicate with metacharacters escaped
    ///
    /// Stores that evaluate the predicate as a pattern match must use this
    /// instead of the raw search text.
    pub fn name_pattern(&self) -> Option<String> {
        self.name_contains.as_deref().map(regex::escape)
    }
}

/// Field a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    Rating,
}

impl SortField {
    /// Name of the field in stored documents
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Rating => "rating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Explicit ordering for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Map a `sort` query value to an ordering
    ///
    /// Recognized keys are `price-asc`, `price-desc` and `rating-desc`. Any
    /// other key yields `None`, leaving the store's natural order.
    pub fn from_key(key: &str) -> Option<Self> {
        let (field, direction) = match key {
            "price-asc" => (SortField::Price, SortDirection::Asc),
            "price-desc" => (SortField::Price, SortDirection::Desc),
            "rating-desc" => (SortField::Rating, SortDirection::Desc),
            _ => return None,
        };
        Some(Self { field, direction })
    }
}

/// Window of results requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (starts at 1)
    pub page: u64,

    /// Number of records per page (at least 1)
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Build a window from raw `page` and `limit` values
    ///
    /// Zero, negative and unparseable values fall back to the defaults, so
    /// the skip can never go negative and `limit` is never zero.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive_u64(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive_u64(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Number of matching records to drop before the page starts
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed to show `total` records
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Everything a store needs to answer one listing request
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub filter: PlantFilter,
    pub sort: Option<SortSpec>,
    pub pagination: Pagination,
}

/// Paginated listing response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedPlants {
    /// Records of the requested page, in listing order
    pub plants: Vec<Plant>,

    /// Number of records matching the filter, ignoring pagination
    pub total: u64,

    /// Requested page number
    pub page: u64,

    /// `ceil(total / limit)`
    pub total_pages: u64,
}

impl PaginatedPlants {
    pub fn new(plants: Vec<Plant>, total: u64, pagination: Pagination) -> Self {
        Self {
            plants,
            total,
            page: pagination.page,
            total_pages: pagination.total_pages(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> PlantQueryParams {
        pairs.iter().copied().collect()
    }

    // === Query compiler ===

    #[test]
    fn test_no_params_matches_everything() {
        let compiled = PlantQueryParams::default().compile();

        assert!(compiled.filter.is_empty());
        assert_eq!(compiled.sort, None);
        assert_eq!(compiled.pagination, Pagination::default());
    }

    #[test]
    fn test_repeated_key_keeps_first_value() {
        let params = params(&[
            ("sort", "price-asc"),
            ("sort", "price-desc"),
            ("page", "1"),
            ("page", "2"),
        ]);

        assert_eq!(params.sort.as_deref(), Some("price-asc"));
        assert_eq!(params.page.as_deref(), Some("1"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let compiled = params(&[("color", "green"), ("min_price", "5")]).compile();
        assert!(compiled.filter.is_empty());
    }

    #[test]
    fn test_all_predicates_compiled() {
        let filter = params(&[
            ("category", "succulent"),
            ("minPrice", "5"),
            ("maxPrice", "20.5"),
            ("rating", "4"),
            ("search", "aloe"),
        ])
        .filter();

        assert_eq!(
            filter,
            PlantFilter {
                category: Some("succulent".to_string()),
                min_price: Some(5.0),
                max_price: Some(20.5),
                min_rating: Some(4.0),
                name_contains: Some("aloe".to_string()),
            }
        );
    }

    #[test]
    fn test_empty_category_and_search_are_absent() {
        let filter = params(&[("category", ""), ("search", "")]).filter();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_unparseable_numbers_are_dropped() {
        let filter = params(&[("minPrice", "abc"), ("maxPrice", "12x"), ("rating", "")]).filter();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_unparseable_min_price_equals_missing_min_price() {
        let with_garbage = params(&[("category", "herb"), ("minPrice", "abc")]).compile();
        let without = params(&[("category", "herb")]).compile();
        assert_eq!(with_garbage, without);
    }

    #[test]
    fn test_price_bounds_are_independent() {
        let only_max = params(&[("maxPrice", "15")]).filter();
        assert_eq!(only_max.min_price, None);
        assert_eq!(only_max.max_price, Some(15.0));
    }

    #[test]
    fn test_search_pattern_is_escaped() {
        let filter = params(&[("search", "a.*(b")]).filter();
        assert_eq!(filter.name_contains.as_deref(), Some("a.*(b"));
        assert_eq!(filter.name_pattern().as_deref(), Some(r"a\.\*\(b"));
    }

    #[test]
    fn test_sort_keys() {
        assert_eq!(
            SortSpec::from_key("price-asc"),
            Some(SortSpec {
                field: SortField::Price,
                direction: SortDirection::Asc
            })
        );
        assert_eq!(
            SortSpec::from_key("price-desc"),
            Some(SortSpec {
                field: SortField::Price,
                direction: SortDirection::Desc
            })
        );
        assert_eq!(
            SortSpec::from_key("rating-desc"),
            Some(SortSpec {
                field: SortField::Rating,
                direction: SortDirection::Desc
            })
        );
        assert_eq!(SortSpec::from_key("rating-asc"), None);
        assert_eq!(SortSpec::from_key("PRICE-ASC"), None);
    }

    // === Lenient parsing ===

    #[test]
    fn test_parse_lenient_f64() {
        assert_eq!(parse_lenient_f64(Some("3.5")), Some(3.5));
        assert_eq!(parse_lenient_f64(Some(" 7 ")), Some(7.0));
        assert_eq!(parse_lenient_f64(Some("abc")), None);
        assert_eq!(parse_lenient_f64(Some("NaN")), None);
        assert_eq!(parse_lenient_f64(Some("inf")), None);
        assert_eq!(parse_lenient_f64(None), None);
    }

    #[test]
    fn test_parse_positive_u64() {
        assert_eq!(parse_positive_u64(Some("3")), Some(3));
        assert_eq!(parse_positive_u64(Some("0")), None);
        assert_eq!(parse_positive_u64(Some("-2")), None);
        assert_eq!(parse_positive_u64(Some("1.5")), None);
        assert_eq!(parse_positive_u64(None), None);
    }

    // === Pagination ===

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::from_raw(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 12);
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn test_pagination_skip() {
        let p = Pagination::from_raw(Some("3"), Some("10"));
        assert_eq!(p.skip(), 20);
    }

    #[test]
    fn test_non_positive_page_and_limit_are_clamped() {
        let p = Pagination::from_raw(Some("0"), Some("0"));
        assert_eq!(p, Pagination::default());

        let p = Pagination::from_raw(Some("-4"), Some("-1"));
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn test_huge_page_saturates() {
        let p = Pagination {
            page: u64::MAX,
            limit: 50,
        };
        assert_eq!(p.skip(), u64::MAX);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let p = Pagination::from_raw(None, Some("10"));
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
        assert_eq!(p.total_pages(145), 15);
    }

    #[test]
    fn test_envelope_uses_camel_case() {
        let envelope = PaginatedPlants::new(vec![], 25, Pagination { page: 2, limit: 12 });
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["total"], 25);
        assert_eq!(value["page"], 2);
        assert_eq!(value["totalPages"], 3);
        assert!(value["plants"].as_array().unwrap().is_empty());
    }
}
