use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use electranow_rs::{
    handlers::{
        api, cors_middleware, health_check, metrics_handler, request_validation_middleware,
        security_headers_middleware,
    },
    init_observability,
    observability::{observability_middleware, BusinessTracingMiddleware, Metrics},
    repositories::{InMemoryCatalogRepository, SessionStore},
    services::{
        BookingService, CartService, CatalogService, GeminiClient, LogBookingDispatcher,
        RecommendationService,
    },
    shutdown_observability, Config,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment()?;
    println!("Configuration loaded successfully");

    // Initialize comprehensive observability
    init_observability(
        &config.observability.service_name,
        &config.observability.service_version,
        &config.observability.otlp_endpoint,
        config.observability.enable_json_logging,
    )?;

    info!("Starting electranow-rs service");
    info!(
        "Service: {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Recommendation model: {}", config.recommendation.model);
    info!(
        "Booking acknowledgement delay: {}ms",
        config.booking.ack_delay_ms
    );

    // Initialize metrics
    let metrics = Arc::new(Metrics::new()?);
    info!("Metrics initialized successfully");

    // Initialize the catalog and session stores
    let catalog_repository = Arc::new(InMemoryCatalogRepository::new());
    let session_store = Arc::new(SessionStore::new());
    info!("Catalog and session store initialized successfully");

    // Initialize services
    let catalog_service = Arc::new(CatalogService::new(catalog_repository.clone()));
    let cart_service = Arc::new(CartService::new(
        catalog_repository.clone(),
        session_store.clone(),
    ));
    let dispatcher = Arc::new(LogBookingDispatcher::new(config.booking.ack_delay()));
    let booking_service = Arc::new(BookingService::new(session_store.clone(), dispatcher));
    let gemini_client = Arc::new(GeminiClient::new(&config.recommendation)?);
    let recommendation_service = Arc::new(RecommendationService::new(
        catalog_repository.clone(),
        gemini_client,
    ));
    info!("Services initialized successfully");

    // Build the application router
    let tracing_middleware = Arc::new(BusinessTracingMiddleware::new(metrics.clone()));
    let app = create_app(
        metrics,
        catalog_service,
        cart_service,
        booking_service,
        recommendation_service,
        tracing_middleware,
        config.server.request_timeout(),
        config.server.max_request_size,
    );

    // Create socket address
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Server listening on {}", addr);

    // Create TCP listener
    let listener = TcpListener::bind(addr).await?;

    // Set up graceful shutdown
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Shutdown signal received");
        shutdown_observability().await;
    };

    // Start the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn create_app(
    metrics: Arc<Metrics>,
    catalog_service: Arc<CatalogService>,
    cart_service: Arc<CartService>,
    booking_service: Arc<BookingService>,
    recommendation_service: Arc<RecommendationService>,
    tracing_middleware: Arc<BusinessTracingMiddleware>,
    request_timeout: Duration,
    max_request_size: usize,
) -> Router {
    let metrics_for_middleware = metrics.clone();

    Router::new()
        // Health and metrics endpoints (with metrics state)
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        // API endpoints carry their own state
        .merge(api::create_api_router(
            catalog_service,
            cart_service,
            booking_service,
            recommendation_service,
            tracing_middleware,
        ))
        // Add middleware layers (order matters - outer to inner)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(request_validation_middleware))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(DefaultBodyLimit::max(max_request_size))
}
