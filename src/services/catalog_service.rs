use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    validate_service_id, CatalogFilters, Category, CategoryGroup, GroupedCatalogResponse,
    ServiceError, ServiceListResponse, ServiceOffering, ServiceResult, CATEGORY_PREVIEW_SIZE,
};
use crate::repositories::CatalogRepository;

/// Service for browsing the offering catalog
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    /// Create a new CatalogService
    pub fn new(repository: Arc<dyn CatalogRepository>) -> Self {
        Self { repository }
    }

    /// List offerings matching the filters, in catalog order
    #[instrument(skip(self), fields(filters = ?filters))]
    pub async fn list_services(&self, filters: CatalogFilters) -> ServiceResult<ServiceListResponse> {
        crate::info_with_trace!("Listing services with filters");

        let services = self.repository.find_all(filters).await?;
        let total_count = services.len();

        crate::info_with_trace!("Found {} services matching criteria", total_count);

        Ok(ServiceListResponse {
            services,
            total_count,
        })
    }

    /// Get a specific offering by ID
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_service(&self, id: &str) -> ServiceResult<ServiceOffering> {
        crate::info_with_trace!("Retrieving offering details");

        validate_service_id(id)?;

        match self.repository.find_by_id(id).await? {
            Some(offering) => {
                crate::info_with_trace!("Offering found successfully");
                Ok(offering)
            }
            None => {
                crate::warn_with_trace!("Offering not found");
                Err(ServiceError::OfferingNotFound { id: id.to_string() })
            }
        }
    }

    /// The fixed category list, in display order. Excludes the `All`
    /// filter sentinel.
    pub fn list_categories(&self) -> Vec<Category> {
        Category::ALL.to_vec()
    }

    /// Group the full catalog by category for the landing view: one group
    /// per category in display order, previewing the first offerings but
    /// reporting the true group size.
    #[instrument(skip(self))]
    pub async fn group_by_category(&self) -> ServiceResult<GroupedCatalogResponse> {
        crate::info_with_trace!("Grouping catalog by category");

        let all = self.repository.find_all(CatalogFilters::default()).await?;

        let mut groups = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let services: Vec<ServiceOffering> = all
                .iter()
                .filter(|offering| offering.category == category)
                .cloned()
                .collect();
            let total_count = services.len();
            let preview = services
                .into_iter()
                .take(CATEGORY_PREVIEW_SIZE)
                .collect();

            groups.push(CategoryGroup {
                category,
                services: preview,
                total_count,
            });
        }

        Ok(GroupedCatalogResponse {
            groups,
            preview_size: CATEGORY_PREVIEW_SIZE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryFilter, RepositoryError};
    use crate::repositories::seed::seed_offerings;
    use crate::repositories::CatalogRepository;
    use async_trait::async_trait;
    use mockall::mock;

    // Mock repository for testing
    mock! {
        TestCatalogRepository {}

        #[async_trait]
        impl CatalogRepository for TestCatalogRepository {
            async fn find_all(&self, filters: CatalogFilters) -> Result<Vec<ServiceOffering>, RepositoryError>;
            async fn find_by_id(&self, id: &str) -> Result<Option<ServiceOffering>, RepositoryError>;
            async fn find_by_category(&self, category: Category) -> Result<Vec<ServiceOffering>, RepositoryError>;
            async fn exists(&self, id: &str) -> Result<bool, RepositoryError>;
            async fn count(&self, filters: Option<CatalogFilters>) -> Result<usize, RepositoryError>;
        }
    }

    #[tokio::test]
    async fn test_list_services_success() {
        let mut mock_repo = MockTestCatalogRepository::new();
        let offerings = seed_offerings();
        let expected = offerings.clone();

        mock_repo
            .expect_find_all()
            .times(1)
            .returning(move |_| Ok(expected.clone()));

        let service = CatalogService::new(Arc::new(mock_repo));

        let result = service.list_services(CatalogFilters::default()).await;

        assert!(result.is_ok());
        let response = result.unwrap();
        assert_eq!(response.total_count, 19);
        assert_eq!(response.services[0].id, offerings[0].id);
    }

    #[tokio::test]
    async fn test_list_services_passes_filters_through() {
        let mut mock_repo = MockTestCatalogRepository::new();
        let filters = CatalogFilters {
            category: CategoryFilter::Category(Category::Plumbing),
            query: Some("tap".to_string()),
        };

        mock_repo
            .expect_find_all()
            .with(mockall::predicate::eq(filters.clone()))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let service = CatalogService::new(Arc::new(mock_repo));

        let response = service.list_services(filters).await.unwrap();
        assert_eq!(response.total_count, 0);
    }

    #[tokio::test]
    async fn test_get_service_success() {
        let mut mock_repo = MockTestCatalogRepository::new();
        let offering = seed_offerings().remove(0);
        let id = offering.id.clone();
        let found = offering.clone();

        mock_repo
            .expect_find_by_id()
            .with(mockall::predicate::eq(id.clone()))
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));

        let service = CatalogService::new(Arc::new(mock_repo));

        let result = service.get_service(&id).await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().name, offering.name);
    }

    #[tokio::test]
    async fn test_get_service_not_found() {
        let mut mock_repo = MockTestCatalogRepository::new();

        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = CatalogService::new(Arc::new(mock_repo));

        let result = service.get_service("zz-9").await;

        match result.unwrap_err() {
            ServiceError::OfferingNotFound { id } => assert_eq!(id, "zz-9"),
            other => panic!("Expected OfferingNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_service_rejects_malformed_id() {
        let mock_repo = MockTestCatalogRepository::new();
        let service = CatalogService::new(Arc::new(mock_repo));

        let result = service.get_service("").await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_get_service_surfaces_repository_errors() {
        let mut mock_repo = MockTestCatalogRepository::new();

        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Err(RepositoryError::ConnectionFailed));

        let service = CatalogService::new(Arc::new(mock_repo));

        let result = service.get_service("ac-1").await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::Repository { .. }
        ));
    }

    #[tokio::test]
    async fn test_list_categories_excludes_the_all_sentinel() {
        let service = CatalogService::new(Arc::new(MockTestCatalogRepository::new()));

        let categories = service.list_categories();

        assert_eq!(categories.len(), 5);
        assert_eq!(categories[0], Category::AcServices);
        assert_eq!(categories[4], Category::SmartHome);
    }

    #[tokio::test]
    async fn test_group_by_category_previews_with_true_totals() {
        let mut mock_repo = MockTestCatalogRepository::new();
        let offerings = seed_offerings();

        mock_repo
            .expect_find_all()
            .times(1)
            .returning(move |_| Ok(offerings.clone()));

        let service = CatalogService::new(Arc::new(mock_repo));

        let response = service.group_by_category().await.unwrap();

        assert_eq!(response.groups.len(), 5);
        assert_eq!(response.preview_size, CATEGORY_PREVIEW_SIZE);

        let ac_group = &response.groups[0];
        assert_eq!(ac_group.category, Category::AcServices);
        assert_eq!(ac_group.services.len(), 4);
        assert_eq!(ac_group.total_count, 5);

        let plumbing_group = &response.groups[1];
        assert_eq!(plumbing_group.services.len(), 4);
        assert_eq!(plumbing_group.total_count, 5);

        let smart_home_group = &response.groups[4];
        assert_eq!(smart_home_group.services.len(), 2);
        assert_eq!(smart_home_group.total_count, 2);
    }
}
