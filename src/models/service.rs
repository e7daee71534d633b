use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, CategoryFilter};

/// Number of offerings shown per category group on the unfiltered landing view
pub const CATEGORY_PREVIEW_SIZE: usize = 4;

/// A bookable catalog offering. Immutable; the full set is seeded at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub duration: String,
    pub rating: f32,
    pub image_url: String,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub bestseller: bool,
}

/// Filters for querying the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilters {
    pub category: CategoryFilter,
    pub query: Option<String>,
}

/// Response model for catalog listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub services: Vec<ServiceOffering>,
    pub total_count: usize,
}

/// Response model for the category listing. Holds real categories only,
/// never the `All` filter sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

/// One category's slice of the landing view, truncated to the preview size.
/// `total_count` carries the untruncated size for the "show more" affordance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub services: Vec<ServiceOffering>,
    pub total_count: usize,
}

/// Response model for the grouped landing view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedCatalogResponse {
    pub groups: Vec<CategoryGroup>,
    pub preview_size: usize,
}

impl ServiceOffering {
    /// Check whether the offering matches the given filters: category must
    /// match exactly (or the filter is `All`), and a non-empty query must be
    /// a case-insensitive substring of the name or description.
    pub fn matches_filters(&self, filters: &CatalogFilters) -> bool {
        if !filters.category.matches(self.category) {
            return false;
        }

        match filters.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let query_lower = query.to_lowercase();
                self.name.to_lowercase().contains(&query_lower)
                    || self.description.to_lowercase().contains(&query_lower)
            }
        }
    }
}
