use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    CatalogFilters, GreetingResponse, RecommendRequest, RecommendationPayload,
    RecommendationResponse, ServiceOffering, ServiceResult, Validate, ASSISTANT_GREETING,
};
use crate::repositories::CatalogRepository;
use crate::services::RecommendationClient;

/// Service behind the recommendation assistant. Only input validation is
/// reported as an error; every downstream failure degrades to the fixed
/// fallback recommendation so the storefront keeps answering.
pub struct RecommendationService {
    catalog: Arc<dyn CatalogRepository>,
    client: Arc<dyn RecommendationClient>,
}

impl RecommendationService {
    /// Create a new RecommendationService
    pub fn new(catalog: Arc<dyn CatalogRepository>, client: Arc<dyn RecommendationClient>) -> Self {
        Self { catalog, client }
    }

    /// The assistant's opening message
    pub fn greeting(&self) -> GreetingResponse {
        GreetingResponse {
            greeting: ASSISTANT_GREETING.to_string(),
        }
    }

    /// Recommend an offering for a problem description. The recommended id
    /// is resolved against the catalog; an id the model invented is dropped
    /// while its explanation is kept.
    #[instrument(skip(self, request))]
    pub async fn recommend(
        &self,
        request: RecommendRequest,
    ) -> ServiceResult<RecommendationResponse> {
        crate::info_with_trace!("Generating service recommendation");

        request.validate()?;
        let query = request.query.trim();

        let offerings = match self.catalog.find_all(CatalogFilters::default()).await {
            Ok(offerings) => offerings,
            Err(e) => {
                crate::warn_with_trace!("Catalog unavailable for recommendation: {}", e);
                return Ok(RecommendationResponse::fallback());
            }
        };

        let prompt = build_prompt(query, &offerings);

        let reply = match self.client.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                crate::warn_with_trace!("Recommendation generation failed: {}", e);
                return Ok(RecommendationResponse::fallback());
            }
        };

        let payload: RecommendationPayload = match serde_json::from_str(&reply) {
            Ok(payload) => payload,
            Err(e) => {
                crate::warn_with_trace!("Recommendation reply did not decode: {}", e);
                return Ok(RecommendationResponse::fallback());
            }
        };

        let service = match &payload.recommended_service_id {
            Some(id) => {
                let found = offerings.iter().find(|offering| &offering.id == id).cloned();
                if found.is_none() {
                    crate::warn_with_trace!("Recommended service id {} is not in the catalog", id);
                }
                found
            }
            None => None,
        };

        Ok(RecommendationResponse {
            service_id: service.as_ref().map(|offering| offering.id.clone()),
            explanation: payload.explanation,
            service,
        })
    }
}

fn build_prompt(query: &str, offerings: &[ServiceOffering]) -> String {
    let service_list = offerings
        .iter()
        .map(|offering| {
            format!(
                "{}: {} ({} - {})",
                offering.id, offering.name, offering.category, offering.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert home services assistant for \"ElectraNow\". \
         We offer AC Services, Plumbing, Electrical, Appliances, and Smart Home solutions. \
         A user is describing a problem: \"{query}\". \
         Here is our list of services:\n{service_list}\n\
         Analyze the problem and recommend the BEST matching service ID from the list. \
         If the user asks for something we don't strictly have but is related \
         (e.g. \"my fridge is broken\"), check the Appliances category. \
         If no service matches well, or the query is unrelated, return null. \
         Also provide a short, helpful explanation (max 2 sentences) addressing the user \
         directly and aggressively selling the solution."
    )
}
