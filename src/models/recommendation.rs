use serde::{Deserialize, Serialize};

use super::ServiceOffering;

/// Greeting the assistant widget shows before the first exchange
pub const ASSISTANT_GREETING: &str =
    "Hi! I'm Sparky ⚡. Describe your electrical issue, and I'll suggest the right fix!";

/// Canned reply returned whenever the recommendation collaborator fails
pub const FALLBACK_EXPLANATION: &str =
    "I'm having trouble connecting to the grid right now. Please browse our services manually!";

/// Request model for a recommendation exchange
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub query: String,
}

/// Reply shape the generative model is asked to produce. The explanation is
/// required; a reply without one falls back. The id may be null or absent,
/// both meaning no recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationPayload {
    pub recommended_service_id: Option<String>,
    pub explanation: String,
}

/// Response model for a recommendation exchange. `service` carries the
/// resolved offering so clients act on the id, not on display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub service_id: Option<String>,
    pub explanation: String,
    pub service: Option<ServiceOffering>,
}

impl RecommendationResponse {
    /// The fixed degraded reply: no service, canned explanation
    pub fn fallback() -> Self {
        Self {
            service_id: None,
            explanation: FALLBACK_EXPLANATION.to_string(),
            service: None,
        }
    }
}

/// Response model republishing the widget greeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingResponse {
    pub greeting: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_decodes_with_service_id() {
        let payload: RecommendationPayload = serde_json::from_str(
            r#"{"recommendedServiceId": "el-2", "explanation": "A socket swap fits."}"#,
        )
        .unwrap();

        assert_eq!(payload.recommended_service_id.as_deref(), Some("el-2"));
        assert_eq!(payload.explanation, "A socket swap fits.");
    }

    #[test]
    fn test_payload_decodes_with_null_service_id() {
        let payload: RecommendationPayload = serde_json::from_str(
            r#"{"recommendedServiceId": null, "explanation": "Nothing in the catalog fits."}"#,
        )
        .unwrap();

        assert_eq!(payload.recommended_service_id, None);
    }

    #[test]
    fn test_payload_requires_an_explanation() {
        let missing_explanation: Result<RecommendationPayload, _> =
            serde_json::from_str(r#"{"recommendedServiceId": "el-2"}"#);
        assert!(missing_explanation.is_err());
    }

    #[test]
    fn test_payload_treats_absent_id_as_no_recommendation() {
        let payload: RecommendationPayload =
            serde_json::from_str(r#"{"explanation": "A socket swap fits."}"#).unwrap();

        assert_eq!(payload.recommended_service_id, None);
    }

    #[test]
    fn test_payload_rejects_ill_typed_fields() {
        let numeric_id: Result<RecommendationPayload, _> =
            serde_json::from_str(r#"{"recommendedServiceId": 7, "explanation": "x"}"#);
        assert!(numeric_id.is_err());
    }

    #[test]
    fn test_fallback_response_shape() {
        let response = RecommendationResponse::fallback();

        assert_eq!(response.service_id, None);
        assert!(response.service.is_none());
        assert_eq!(response.explanation, FALLBACK_EXPLANATION);
    }
}
