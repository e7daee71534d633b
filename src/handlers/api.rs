use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::models::{
    AddCartItemRequest, AddCartItemResponse, BookingFlowResponse, CartResponse, CatalogFilters,
    CategoryListResponse, GreetingResponse, GroupedCatalogResponse, QuantityDeltaRequest,
    RecommendRequest, RecommendationResponse, ScheduleRequest, ServiceError, ServiceListResponse,
    ServiceOffering, SubmitBookingRequest,
};
use crate::observability::BusinessTracingMiddleware;
use crate::services::{BookingService, CartService, CatalogService, RecommendationService};

/// Shared application state containing all services
#[derive(Clone)]
pub struct ApiState {
    pub catalog_service: Arc<CatalogService>,
    pub cart_service: Arc<CartService>,
    pub booking_service: Arc<BookingService>,
    pub recommendation_service: Arc<RecommendationService>,
    pub tracing: Arc<BusinessTracingMiddleware>,
}

/// Query parameters for listing services
#[derive(Debug, Deserialize)]
pub struct ListServicesQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// Create API router with all endpoints
pub fn create_api_router(
    catalog_service: Arc<CatalogService>,
    cart_service: Arc<CartService>,
    booking_service: Arc<BookingService>,
    recommendation_service: Arc<RecommendationService>,
    tracing: Arc<BusinessTracingMiddleware>,
) -> Router {
    let state = ApiState {
        catalog_service,
        cart_service,
        booking_service,
        recommendation_service,
        tracing,
    };

    Router::new()
        // Catalog browsing endpoints (read-only)
        .route("/api/services", get(list_services))
        .route("/api/services/categories", get(list_categories))
        .route("/api/services/grouped", get(grouped_services))
        .route("/api/services/:service_id", get(get_service))
        // Cart management endpoints
        .route("/api/cart/:session_id", get(get_cart))
        .route("/api/cart/:session_id/items", post(add_cart_item))
        .route(
            "/api/cart/:session_id/items/:service_id",
            patch(update_cart_line).delete(remove_cart_line),
        )
        .route("/api/cart/:session_id/clear", post(clear_cart))
        // Booking flow endpoints
        .route("/api/booking/:session_id", get(get_booking))
        .route("/api/booking/:session_id/schedule", post(submit_schedule))
        .route("/api/booking/:session_id/back", post(booking_back))
        .route("/api/booking/:session_id/submit", post(submit_booking))
        .route("/api/booking/:session_id/reset", post(reset_booking))
        // Recommendation assistant endpoints
        .route("/api/recommendations", post(recommend))
        .route("/api/recommendations/greeting", get(recommendation_greeting))
        .with_state(state)
}

// =============================================================================
// CATALOG ENDPOINTS
// =============================================================================

/// List services with optional category and text filters
#[instrument(name = "list_services", skip(state), fields(
    category = query.category.as_deref(),
    q = query.q.as_deref(),
))]
pub async fn list_services(
    State(state): State<ApiState>,
    Query(query): Query<ListServicesQuery>,
) -> Result<Json<ServiceListResponse>, (StatusCode, Json<Value>)> {
    info!("Listing services with filters");

    let filters = match query_to_filters(query) {
        Ok(filters) => filters,
        Err(err) => {
            error!("Invalid query parameters: {}", err);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid query parameters",
                    "message": err,
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                })),
            ));
        }
    };

    let category_label = filters.category.to_string();
    match state
        .tracing
        .trace_catalog_operation(
            "list",
            Some(category_label.as_str()),
            state.catalog_service.list_services(filters),
        )
        .await
    {
        Ok(response) => {
            info!("Successfully listed {} services", response.total_count);
            Ok(Json(response))
        }
        Err(err) => {
            error!("Failed to list services: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Get a specific service offering by ID
#[instrument(name = "get_service", skip(state), fields(service_id = %service_id))]
pub async fn get_service(
    State(state): State<ApiState>,
    Path(service_id): Path<String>,
) -> Result<Json<ServiceOffering>, (StatusCode, Json<Value>)> {
    info!("Getting service with ID: {}", service_id);

    match state
        .tracing
        .trace_catalog_operation("get", None, state.catalog_service.get_service(&service_id))
        .await
    {
        Ok(offering) => {
            info!("Successfully retrieved service: {}", offering.name);
            Ok(Json(offering))
        }
        Err(err) => {
            error!("Failed to get service {}: {}", service_id, err);
            Err(service_error_to_response(err))
        }
    }
}

/// List the real categories, without the `All` filter sentinel
#[instrument(name = "list_categories", skip(state))]
pub async fn list_categories(
    State(state): State<ApiState>,
) -> Json<CategoryListResponse> {
    Json(CategoryListResponse {
        categories: state.catalog_service.list_categories(),
    })
}

/// Landing view: per-category preview groups with true totals
#[instrument(name = "grouped_services", skip(state))]
pub async fn grouped_services(
    State(state): State<ApiState>,
) -> Result<Json<GroupedCatalogResponse>, (StatusCode, Json<Value>)> {
    info!("Grouping catalog by category");

    match state
        .tracing
        .trace_catalog_operation("grouped", None, state.catalog_service.group_by_category())
        .await
    {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            error!("Failed to group catalog: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// CART ENDPOINTS
// =============================================================================

/// Get a session's cart
#[instrument(name = "get_cart", skip(state), fields(session_id = %session_id))]
pub async fn get_cart(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<Json<CartResponse>, (StatusCode, Json<Value>)> {
    info!("Getting cart for session: {}", session_id);

    match state
        .tracing
        .trace_cart_operation("get", Some(&session_id), state.cart_service.get_cart(&session_id))
        .await
    {
        Ok(cart) => {
            info!("Successfully retrieved cart with {} items", cart.total_items);
            Ok(Json(cart))
        }
        Err(err) => {
            error!("Failed to get cart for session {}: {}", session_id, err);
            Err(service_error_to_response(err))
        }
    }
}

/// Add one unit of a service to the cart
#[instrument(name = "add_cart_item", skip(state, request), fields(
    session_id = %session_id,
    service_id = %request.service_id,
))]
pub async fn add_cart_item(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Json(request): Json<AddCartItemRequest>,
) -> Result<(StatusCode, Json<AddCartItemResponse>), (StatusCode, Json<Value>)> {
    crate::info_with_trace!(
        "Adding service to cart for session: {}, service_id: {}",
        session_id,
        request.service_id
    );

    match state
        .tracing
        .trace_cart_operation(
            "add_item",
            Some(&session_id),
            state.cart_service.add_item(&session_id, request),
        )
        .await
    {
        Ok(response) => {
            crate::info_with_trace!("Successfully added service to cart");
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => {
            crate::error_with_trace!("Failed to add service to cart: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Adjust a cart line's quantity by a signed delta
#[instrument(name = "update_cart_line", skip(state, request), fields(
    session_id = %session_id,
    service_id = %service_id,
    delta = %request.delta,
))]
pub async fn update_cart_line(
    State(state): State<ApiState>,
    Path((session_id, service_id)): Path<(String, String)>,
    Json(request): Json<QuantityDeltaRequest>,
) -> Result<Json<CartResponse>, (StatusCode, Json<Value>)> {
    crate::info_with_trace!(
        "Adjusting cart line for session: {}, service_id: {}, delta: {}",
        session_id,
        service_id,
        request.delta
    );

    match state
        .tracing
        .trace_cart_operation(
            "apply_delta",
            Some(&session_id),
            state
                .cart_service
                .apply_delta(&session_id, &service_id, request.delta),
        )
        .await
    {
        Ok(cart) => {
            crate::info_with_trace!("Cart line adjustment handled");
            Ok(Json(cart))
        }
        Err(err) => {
            crate::error_with_trace!("Failed to adjust cart line: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Remove a line from the cart
#[instrument(name = "remove_cart_line", skip(state), fields(
    session_id = %session_id,
    service_id = %service_id,
))]
pub async fn remove_cart_line(
    State(state): State<ApiState>,
    Path((session_id, service_id)): Path<(String, String)>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    crate::info_with_trace!(
        "Removing cart line for session: {}, service_id: {}",
        session_id,
        service_id
    );

    match state
        .tracing
        .trace_cart_operation(
            "remove_item",
            Some(&session_id),
            state.cart_service.remove_item(&session_id, &service_id),
        )
        .await
    {
        Ok(()) => {
            crate::info_with_trace!("Successfully removed cart line");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            crate::error_with_trace!("Failed to remove cart line: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Clear all lines from the cart
#[instrument(name = "clear_cart", skip(state), fields(session_id = %session_id))]
pub async fn clear_cart(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Clearing cart for session: {}", session_id);

    match state
        .tracing
        .trace_cart_operation("clear", Some(&session_id), state.cart_service.clear(&session_id))
        .await
    {
        Ok(()) => {
            crate::info_with_trace!("Successfully cleared cart");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            crate::error_with_trace!("Failed to clear cart: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// BOOKING ENDPOINTS
// =============================================================================

/// Get the booking flow state for a session
#[instrument(name = "get_booking", skip(state), fields(session_id = %session_id))]
pub async fn get_booking(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<Json<BookingFlowResponse>, (StatusCode, Json<Value>)> {
    info!("Getting booking flow for session: {}", session_id);

    match state
        .tracing
        .trace_booking_operation("get", Some(&session_id), state.booking_service.get_flow(&session_id))
        .await
    {
        Ok(flow) => Ok(Json(flow)),
        Err(err) => {
            error!("Failed to get booking flow: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Accept schedule details and advance the flow
#[instrument(name = "submit_schedule", skip(state, request), fields(session_id = %session_id))]
pub async fn submit_schedule(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<BookingFlowResponse>, (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Submitting schedule for session: {}", session_id);

    match state
        .tracing
        .trace_booking_operation(
            "schedule",
            Some(&session_id),
            state.booking_service.submit_schedule(&session_id, request),
        )
        .await
    {
        Ok(flow) => {
            crate::info_with_trace!("Schedule accepted");
            Ok(Json(flow))
        }
        Err(err) => {
            crate::error_with_trace!("Failed to submit schedule: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Step back from the contact step to the schedule step
#[instrument(name = "booking_back", skip(state), fields(session_id = %session_id))]
pub async fn booking_back(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<Json<BookingFlowResponse>, (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Stepping booking flow back for session: {}", session_id);

    match state
        .tracing
        .trace_booking_operation("back", Some(&session_id), state.booking_service.step_back(&session_id))
        .await
    {
        Ok(flow) => Ok(Json(flow)),
        Err(err) => {
            crate::error_with_trace!("Failed to step booking flow back: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Submit the booking with contact details
#[instrument(name = "submit_booking", skip(state, request), fields(session_id = %session_id))]
pub async fn submit_booking(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Json(request): Json<SubmitBookingRequest>,
) -> Result<Json<BookingFlowResponse>, (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Submitting booking for session: {}", session_id);

    match state
        .tracing
        .trace_booking_operation(
            "submit",
            Some(&session_id),
            state.booking_service.submit(&session_id, request),
        )
        .await
    {
        Ok(flow) => {
            crate::info_with_trace!("Booking submitted");
            Ok(Json(flow))
        }
        Err(err) => {
            crate::error_with_trace!("Failed to submit booking: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Re-arm the booking flow for another booking
#[instrument(name = "reset_booking", skip(state), fields(session_id = %session_id))]
pub async fn reset_booking(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<Json<BookingFlowResponse>, (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Resetting booking flow for session: {}", session_id);

    match state
        .tracing
        .trace_booking_operation("reset", Some(&session_id), state.booking_service.reset(&session_id))
        .await
    {
        Ok(flow) => Ok(Json(flow)),
        Err(err) => {
            crate::error_with_trace!("Failed to reset booking flow: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// RECOMMENDATION ENDPOINTS
// =============================================================================

/// Recommend a service for a free-text problem description
#[instrument(name = "recommend", skip(state, request))]
pub async fn recommend(
    State(state): State<ApiState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationResponse>, (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Handling recommendation request");

    match state
        .tracing
        .trace_recommendation_request(state.recommendation_service.recommend(request))
        .await
    {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            crate::error_with_trace!("Failed to handle recommendation request: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// The assistant's greeting message
#[instrument(name = "recommendation_greeting", skip(state))]
pub async fn recommendation_greeting(State(state): State<ApiState>) -> Json<GreetingResponse> {
    Json(state.recommendation_service.greeting())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Convert query parameters to CatalogFilters
fn query_to_filters(query: ListServicesQuery) -> Result<CatalogFilters, String> {
    let mut filters = CatalogFilters::default();

    if let Some(category_str) = query.category {
        filters.category = category_str
            .parse()
            .map_err(|e| format!("Invalid category: {}", e))?;
    }

    filters.query = query.q;

    Ok(filters)
}

/// Convert ServiceError to HTTP response
fn service_error_to_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, message) = match err {
        ServiceError::OfferingNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::CartLineNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::InvalidCategory { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::ValidationError { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::EmptyCart { .. } => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::InvalidTransition { .. } => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::Repository { source } => match source {
            crate::models::RepositoryError::NotFound => {
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }
            crate::models::RepositoryError::ConnectionFailed => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Store access failed".to_string(),
            ),
            crate::models::RepositoryError::Timeout => {
                (StatusCode::REQUEST_TIMEOUT, "Request timeout".to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        },
        ServiceError::Configuration { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Configuration error".to_string(),
        ),
        ServiceError::ExternalService { .. } => (
            StatusCode::BAD_GATEWAY,
            "External service error".to_string(),
        ),
    };

    (
        status,
        Json(json!({
            "error": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
