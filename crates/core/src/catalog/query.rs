//! The product listing filter/sort pipeline.

use serde::Deserialize;

use super::ALL_CATEGORY;
use super::product::{Catalog, Product};

/// Listing sort order, from the `sort` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    NameAsc,
    RatingDesc,
}

impl SortOrder {
    /// Every order, as offered in the sort dropdown.
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::NameAsc,
        Self::RatingDesc,
    ];

    /// Parse the query parameter; unknown values fall back to `Default`.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "name-asc" => Self::NameAsc,
            "rating-desc" => Self::RatingDesc,
            _ => Self::Default,
        }
    }

    /// Query parameter value.
    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::RatingDesc => "rating-desc",
        }
    }

    /// Dropdown label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::NameAsc => "Name: A to Z",
            Self::RatingDesc => "Highest Rated",
        }
    }

    fn sort(self, products: &mut [&Product]) {
        match self {
            Self::Default => {}
            Self::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::NameAsc => products.sort_by_cached_key(|p| p.name.to_lowercase()),
            Self::RatingDesc => products.sort_by(|a, b| b.rating.cmp(&a.rating)),
        }
    }
}

/// Query string of the product listing page.
///
/// ```text
/// /products?category=Electronics&search=watch&sort=price-asc&featured=true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub featured: Option<String>,
}

impl ProductQuery {
    /// Active category, `All` when absent or blank.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(ALL_CATEGORY)
    }

    /// Trimmed search term, if any.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Requested sort order.
    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        self.sort.as_deref().map_or(SortOrder::Default, SortOrder::from_param)
    }

    /// Whether only featured products were requested.
    #[must_use]
    pub fn featured_only(&self) -> bool {
        self.featured.as_deref() == Some("true")
    }

    /// Run the pipeline: category, featured flag, search, then sort.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let featured_only = self.featured_only();
        let needle = self.search_term().map(str::to_lowercase);

        let mut products: Vec<&Product> = catalog
            .in_category(self.category())
            .filter(|p| !featured_only || p.featured)
            .filter(|p| {
                needle.as_deref().is_none_or(|n| {
                    p.name.to_lowercase().contains(n) || p.description.to_lowercase().contains(n)
                })
            })
            .collect();

        self.sort_order().sort(&mut products);
        products
    }
}
