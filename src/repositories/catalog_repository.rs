use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::models::{CatalogFilters, Category, RepositoryResult, ServiceOffering};

use super::seed::seed_offerings;

/// Trait defining the interface for catalog data access operations
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Find all offerings matching the filters, in catalog order
    async fn find_all(&self, filters: CatalogFilters) -> RepositoryResult<Vec<ServiceOffering>>;

    /// Find an offering by its ID
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<ServiceOffering>>;

    /// Find offerings of one category, in catalog order
    async fn find_by_category(&self, category: Category) -> RepositoryResult<Vec<ServiceOffering>>;

    /// Check if an offering exists
    async fn exists(&self, id: &str) -> RepositoryResult<bool>;

    /// Count offerings matching the filters
    async fn count(&self, filters: Option<CatalogFilters>) -> RepositoryResult<usize>;
}

/// In-memory implementation of the CatalogRepository trait, backed by the
/// seed catalog. Offerings are immutable for the process lifetime.
pub struct InMemoryCatalogRepository {
    offerings: Vec<ServiceOffering>,
}

impl InMemoryCatalogRepository {
    /// Create a repository over the built-in seed catalog
    pub fn new() -> Self {
        Self {
            offerings: seed_offerings(),
        }
    }

    /// Create a repository over an explicit offering list
    pub fn with_offerings(offerings: Vec<ServiceOffering>) -> Self {
        Self { offerings }
    }
}

impl Default for InMemoryCatalogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    #[instrument(skip(self))]
    async fn find_all(&self, filters: CatalogFilters) -> RepositoryResult<Vec<ServiceOffering>> {
        let matches: Vec<ServiceOffering> = self
            .offerings
            .iter()
            .filter(|offering| offering.matches_filters(&filters))
            .cloned()
            .collect();

        debug!(count = matches.len(), "Catalog filter evaluated");
        Ok(matches)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<ServiceOffering>> {
        Ok(self
            .offerings
            .iter()
            .find(|offering| offering.id == id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_category(&self, category: Category) -> RepositoryResult<Vec<ServiceOffering>> {
        Ok(self
            .offerings
            .iter()
            .filter(|offering| offering.category == category)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self.offerings.iter().any(|offering| offering.id == id))
    }

    #[instrument(skip(self))]
    async fn count(&self, filters: Option<CatalogFilters>) -> RepositoryResult<usize> {
        match filters {
            Some(filters) => Ok(self
                .offerings
                .iter()
                .filter(|offering| offering.matches_filters(&filters))
                .count()),
            None => Ok(self.offerings.len()),
        }
    }
}
