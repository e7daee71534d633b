use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use reqwest::Client;
use serde_json::json;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use electranow_rs::config::RecommendationConfig;
use electranow_rs::handlers::{
    api, cors_middleware, health_check, metrics_handler, request_validation_middleware,
    security_headers_middleware,
};
use electranow_rs::observability::{observability_middleware, BusinessTracingMiddleware, Metrics};
use electranow_rs::repositories::{InMemoryCatalogRepository, SessionStore};
use electranow_rs::services::{
    BookingService, CartService, CatalogService, GeminiClient, LogBookingDispatcher,
    RecommendationService,
};

pub const TEST_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Boots the real application router on an ephemeral port, with the
/// recommendation collaborator pointed at a local mock server.
pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    pub gemini: MockServer,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let gemini = MockServer::start().await;

        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let catalog_repository = Arc::new(InMemoryCatalogRepository::new());
        let session_store = Arc::new(SessionStore::new());

        let catalog_service = Arc::new(CatalogService::new(catalog_repository.clone()));
        let cart_service = Arc::new(CartService::new(
            catalog_repository.clone(),
            session_store.clone(),
        ));
        let dispatcher = Arc::new(LogBookingDispatcher::new(Duration::ZERO));
        let booking_service = Arc::new(BookingService::new(session_store.clone(), dispatcher));

        let recommendation_config = RecommendationConfig {
            api_key: "test-key".to_string(),
            endpoint: gemini.uri(),
            model: TEST_GEMINI_MODEL.to_string(),
            timeout_secs: 5,
        };
        let gemini_client = Arc::new(
            GeminiClient::new(&recommendation_config).expect("Failed to create gemini client"),
        );
        let recommendation_service = Arc::new(RecommendationService::new(
            catalog_repository.clone(),
            gemini_client,
        ));

        let tracing_middleware = Arc::new(BusinessTracingMiddleware::new(metrics.clone()));

        let metrics_for_middleware = metrics.clone();
        let app = Router::new()
            .route("/health/status", get(health_check))
            .route("/metrics", get(metrics_handler))
            .with_state(metrics)
            .merge(api::create_api_router(
                catalog_service,
                cart_service,
                booking_service,
                recommendation_service,
                tracing_middleware,
            ))
            .layer(axum::middleware::from_fn(security_headers_middleware))
            .layer(axum::middleware::from_fn(cors_middleware))
            .layer(axum::middleware::from_fn(request_validation_middleware))
            .layer(axum::middleware::from_fn(move |req, next| {
                observability_middleware(metrics_for_middleware.clone(), req, next)
            }));

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        let client = Client::new();

        Self {
            client,
            base_url,
            gemini,
        }
    }

    /// Stub a successful generateContent exchange returning the given payload
    pub async fn stub_recommendation(&self, service_id: Option<&str>, explanation: &str) {
        let payload = json!({
            "recommendedServiceId": service_id,
            "explanation": explanation,
        });
        let envelope = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": payload.to_string() }]
                }
            }]
        });

        Mock::given(method("POST"))
            .and(path(format!(
                "/v1beta/models/{}:generateContent",
                TEST_GEMINI_MODEL
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope))
            .mount(&self.gemini)
            .await;
    }

    /// Stub a failing generateContent exchange
    pub async fn stub_recommendation_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1beta/models/{}:generateContent",
                TEST_GEMINI_MODEL
            )))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.gemini)
            .await;
    }
}
