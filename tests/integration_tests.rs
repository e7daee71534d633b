#![allow(clippy::needless_borrows_for_generic_args)]

use electranow_rs::models::{
    AddCartItemRequest, AddCartItemResponse, BookingFlowResponse, BookingStep, CartResponse,
    Category, CategoryListResponse, GroupedCatalogResponse, RecommendationResponse,
    ScheduleRequest, ServiceListResponse, ServiceOffering, SubmitBookingRequest, TimeSlot,
    ASSISTANT_GREETING, FALLBACK_EXPLANATION,
};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

mod common;
use common::*;

fn schedule_request() -> ScheduleRequest {
    ScheduleRequest {
        date: "2026-09-01".to_string(),
        time_slot: "14:00 - 16:00".to_string(),
        address: "12 MG Road, Indiranagar".to_string(),
    }
}

fn contact_request() -> SubmitBookingRequest {
    SubmitBookingRequest {
        name: "Asha Rao".to_string(),
        phone: "9876543210".to_string(),
        email: "asha@example.com".to_string(),
        notes: Some("Gate code 4411".to_string()),
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;

    let response = client
        .get(&format!("{}/health/status", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);

    // Middleware stamps every response
    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("Access-Control-Allow-Origin").unwrap(), "*");

    let health_response: serde_json::Value =
        response.json().await.expect("Failed to parse response");
    assert_eq!(health_response["status"], "healthy");
    assert_eq!(health_response["service"], "electranow-rs");

    // The request above must show up on the metrics endpoint
    let response = client
        .get(&format!("{}/metrics", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let metrics_text = response.text().await.expect("Failed to read metrics");
    assert!(metrics_text.contains("http_requests_total"));
}

#[tokio::test]
async fn test_catalog_endpoints() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;

    // Test listing the full catalog
    let response = client
        .get(&format!("{}/api/services", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let listing: ServiceListResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(listing.total_count, 19);
    assert_eq!(listing.services.len(), 19);

    // Test filtering by category
    let response = client
        .get(&format!("{}/api/services", base_url))
        .query(&[("category", "Electrical")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let listing: ServiceListResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(listing.total_count, 4);
    assert!(listing
        .services
        .iter()
        .all(|service| service.category == Category::Electrical));

    // Test text search across name and description
    let response = client
        .get(&format!("{}/api/services", base_url))
        .query(&[("q", "doorbell")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let listing: ServiceListResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(listing.total_count, 1);
    assert_eq!(listing.services[0].id, "sm-2");

    // Test combining category and text filters
    let response = client
        .get(&format!("{}/api/services", base_url))
        .query(&[("category", "Plumbing"), ("q", "tank")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let listing: ServiceListResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(listing.total_count, 1);
    assert_eq!(listing.services[0].id, "pl-3");

    // Test getting a single offering
    let response = client
        .get(&format!("{}/api/services/pl-2", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let offering: ServiceOffering = response.json().await.expect("Failed to parse response");
    assert_eq!(offering.name, "Intensive Drain Cleaning");
    assert_eq!(offering.price, dec!(499));
    assert!(offering.bestseller);

    // Test 404 for an unknown offering
    let response = client
        .get(&format!("{}/api/services/zz-9", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 404);

    // Test 400 for an unknown category
    let response = client
        .get(&format!("{}/api/services", base_url))
        .query(&[("category", "Gardening")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 400);
    let error: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(error["error"], "Invalid query parameters");
}

#[tokio::test]
async fn test_catalog_landing_views() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;

    // Categories endpoint returns the real categories, never "All"
    let response = client
        .get(&format!("{}/api/services/categories", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let categories: CategoryListResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(categories.categories, Category::ALL.to_vec());

    // Grouped view previews each category but reports true totals
    let response = client
        .get(&format!("{}/api/services/grouped", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let grouped: GroupedCatalogResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(grouped.preview_size, 4);
    assert_eq!(grouped.groups.len(), 5);

    let ac_group = &grouped.groups[0];
    assert_eq!(ac_group.category, Category::AcServices);
    assert_eq!(ac_group.services.len(), 4);
    assert_eq!(ac_group.total_count, 5);

    let smart_home_group = &grouped.groups[4];
    assert_eq!(smart_home_group.category, Category::SmartHome);
    assert_eq!(smart_home_group.services.len(), 2);
    assert_eq!(smart_home_group.total_count, 2);
}

#[tokio::test]
async fn test_cart_endpoints() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;
    let session_id = Uuid::new_v4().to_string();

    // An unknown session reads as an empty cart
    let response = client
        .get(&format!("{}/api/cart/{}", base_url, session_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let cart: CartResponse = response.json().await.expect("Failed to parse response");
    assert!(cart.lines.is_empty());
    assert_eq!(cart.total_items, 0);
    assert_eq!(cart.total_price, dec!(0));

    // First add reveals the cart
    let add_request = AddCartItemRequest {
        service_id: "pl-1".to_string(),
    };

    let response = client
        .post(&format!("{}/api/cart/{}/items", base_url, session_id))
        .json(&add_request)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 201);
    let added: AddCartItemResponse = response.json().await.expect("Failed to parse response");
    assert!(added.reveal_cart);
    assert_eq!(added.line.service_id, "pl-1");
    assert_eq!(added.line.quantity, 1);

    // Repeat add increments the existing line without a reveal
    let response = client
        .post(&format!("{}/api/cart/{}/items", base_url, session_id))
        .json(&add_request)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 201);
    let added: AddCartItemResponse = response.json().await.expect("Failed to parse response");
    assert!(!added.reveal_cart);
    assert_eq!(added.line.quantity, 2);
    assert_eq!(added.line.total_price, dec!(398));

    // Cart reflects enriched lines and totals
    let response = client
        .get(&format!("{}/api/cart/{}", base_url, session_id))
        .send()
        .await
        .expect("Failed to send request");

    let cart: CartResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].service_name, "Tap & Mixer Repair");
    assert_eq!(cart.total_items, 2);
    assert_eq!(cart.total_price, dec!(398));

    // Positive delta raises the quantity
    let response = client
        .patch(&format!(
            "{}/api/cart/{}/items/pl-1",
            base_url, session_id
        ))
        .json(&json!({"delta": 3}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let cart: CartResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(cart.lines[0].quantity, 5);
    assert_eq!(cart.total_price, dec!(995));

    // A delta that would drop below one unit is ignored
    let response = client
        .patch(&format!(
            "{}/api/cart/{}/items/pl-1",
            base_url, session_id
        ))
        .json(&json!({"delta": -10}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let cart: CartResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(cart.lines[0].quantity, 5);

    // Removing the line empties the cart
    let response = client
        .delete(&format!(
            "{}/api/cart/{}/items/pl-1",
            base_url, session_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 204);

    let response = client
        .get(&format!("{}/api/cart/{}", base_url, session_id))
        .send()
        .await
        .expect("Failed to send request");

    let cart: CartResponse = response.json().await.expect("Failed to parse response");
    assert!(cart.lines.is_empty());

    // Adding an unknown offering is rejected
    let response = client
        .post(&format!("{}/api/cart/{}/items", base_url, session_id))
        .json(&json!({"service_id": "zz-9"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 404);

    // Clear is idempotent
    let response = client
        .post(&format!("{}/api/cart/{}/clear", base_url, session_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
async fn test_booking_flow_endpoints() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;
    let session_id = Uuid::new_v4().to_string();

    // A fresh session starts at the schedule step
    let response = client
        .get(&format!("{}/api/booking/{}", base_url, session_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let flow: BookingFlowResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(flow.step, BookingStep::CollectingSchedule);
    assert!(flow.schedule.is_none());
    assert!(flow.confirmation.is_none());

    // Fill the cart so checkout has something to book
    for service_id in ["pl-1", "pl-1", "el-2"] {
        let response = client
            .post(&format!("{}/api/cart/{}/items", base_url, session_id))
            .json(&json!({"service_id": service_id}))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status().as_u16(), 201);
    }

    // Accepting the schedule advances to the contact step
    let response = client
        .post(&format!("{}/api/booking/{}/schedule", base_url, session_id))
        .json(&schedule_request())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let flow: BookingFlowResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(flow.step, BookingStep::CollectingContact);
    let schedule = flow.schedule.expect("Expected schedule details");
    assert_eq!(schedule.time_slot, TimeSlot::Afternoon);

    // Stepping back retains the accepted schedule as a draft
    let response = client
        .post(&format!("{}/api/booking/{}/back", base_url, session_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let flow: BookingFlowResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(flow.step, BookingStep::CollectingSchedule);
    assert!(flow.schedule.is_some());

    // Resubmit the schedule and complete the booking
    let response = client
        .post(&format!("{}/api/booking/{}/schedule", base_url, session_id))
        .json(&schedule_request())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .post(&format!("{}/api/booking/{}/submit", base_url, session_id))
        .json(&contact_request())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let flow: BookingFlowResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(flow.step, BookingStep::Submitted);
    let confirmation = flow.confirmation.expect("Expected confirmation");
    assert!(confirmation.booking_id.starts_with("BK"));
    assert_eq!(confirmation.date, "2026-09-01");
    assert_eq!(confirmation.time_slot, TimeSlot::Afternoon);
    assert_eq!(confirmation.total_items, 3);
    assert_eq!(confirmation.total_price, dec!(547));

    // Submission empties the cart
    let response = client
        .get(&format!("{}/api/cart/{}", base_url, session_id))
        .send()
        .await
        .expect("Failed to send request");

    let cart: CartResponse = response.json().await.expect("Failed to parse response");
    assert!(cart.lines.is_empty());

    // A submitted flow refuses another submit
    let response = client
        .post(&format!("{}/api/booking/{}/submit", base_url, session_id))
        .json(&contact_request())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 409);

    // Reset re-arms the flow for the next booking
    let response = client
        .post(&format!("{}/api/booking/{}/reset", base_url, session_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let flow: BookingFlowResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(flow.step, BookingStep::CollectingSchedule);
    assert!(flow.schedule.is_none());
    assert!(flow.confirmation.is_none());
}

#[tokio::test]
async fn test_booking_flow_guards() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;

    // Submitting before the schedule step is accepted is a conflict
    let session_id = Uuid::new_v4().to_string();
    let response = client
        .post(&format!("{}/api/booking/{}/submit", base_url, session_id))
        .json(&contact_request())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 409);

    // An unknown time slot is rejected
    let response = client
        .post(&format!("{}/api/booking/{}/schedule", base_url, session_id))
        .json(&json!({
            "date": "2026-09-01",
            "time_slot": "08:00 - 09:00",
            "address": "12 MG Road",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 400);

    // Submitting with an empty cart is refused and the step is kept
    let session_id = Uuid::new_v4().to_string();
    let response = client
        .post(&format!("{}/api/booking/{}/schedule", base_url, session_id))
        .json(&schedule_request())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .post(&format!("{}/api/booking/{}/submit", base_url, session_id))
        .json(&contact_request())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 409);
    let error: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(error["error"]
        .as_str()
        .expect("Expected error message")
        .contains("Cart is empty"));

    let response = client
        .get(&format!("{}/api/booking/{}", base_url, session_id))
        .send()
        .await
        .expect("Failed to send request");

    let flow: BookingFlowResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(flow.step, BookingStep::CollectingContact);

    // An invalid phone number is a validation error, not a conflict
    let response = client
        .post(&format!("{}/api/cart/{}/items", base_url, session_id))
        .json(&json!({"service_id": "el-2"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 201);

    let response = client
        .post(&format!("{}/api/booking/{}/submit", base_url, session_id))
        .json(&json!({
            "name": "Asha Rao",
            "phone": "12345",
            "email": "asha@example.com",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn test_recommendation_greeting_and_match() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;

    // The greeting is a fixed string served without the collaborator
    let response = client
        .get(&format!("{}/api/recommendations/greeting", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let greeting: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(greeting["greeting"], ASSISTANT_GREETING);

    // A recommended id resolves to the catalog offering
    test_env
        .stub_recommendation(Some("el-3"), "Book our full checkup before it gets worse!")
        .await;

    let response = client
        .post(&format!("{}/api/recommendations", base_url))
        .json(&json!({"query": "my wiring sparks when it rains"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let recommendation: RecommendationResponse =
        response.json().await.expect("Failed to parse response");
    assert_eq!(recommendation.service_id.as_deref(), Some("el-3"));
    assert_eq!(
        recommendation.explanation,
        "Book our full checkup before it gets worse!"
    );
    let service = recommendation.service.expect("Expected resolved offering");
    assert_eq!(service.name, "Full Home Electrical Checkup");
}

#[tokio::test]
async fn test_recommendation_drops_unknown_id() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;

    test_env
        .stub_recommendation(Some("zz-99"), "We have just the thing.")
        .await;

    let response = client
        .post(&format!("{}/api/recommendations", base_url))
        .json(&json!({"query": "mystery appliance hums"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let recommendation: RecommendationResponse =
        response.json().await.expect("Failed to parse response");
    assert_eq!(recommendation.service_id, None);
    assert!(recommendation.service.is_none());
    assert_eq!(recommendation.explanation, "We have just the thing.");
}

#[tokio::test]
async fn test_recommendation_falls_back_when_collaborator_fails() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;

    test_env.stub_recommendation_failure(500).await;

    let response = client
        .post(&format!("{}/api/recommendations", base_url))
        .json(&json!({"query": "geyser trips the breaker"}))
        .send()
        .await
        .expect("Failed to send request");

    // Collaborator failures degrade to the canned reply, not an error
    assert_eq!(response.status().as_u16(), 200);
    let recommendation: RecommendationResponse =
        response.json().await.expect("Failed to parse response");
    assert_eq!(recommendation.service_id, None);
    assert_eq!(recommendation.explanation, FALLBACK_EXPLANATION);

    // A blank query is still the caller's error
    let response = client
        .post(&format!("{}/api/recommendations", base_url))
        .json(&json!({"query": "   "}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn test_request_validation_middleware() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.client;
    let base_url = &test_env.base_url;
    let session_id = Uuid::new_v4().to_string();

    // Non-JSON payloads are refused before reaching handlers
    let response = client
        .post(&format!("{}/api/cart/{}/items", base_url, session_id))
        .header("content-type", "text/plain")
        .body("service_id=pl-1")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 415);

    // Oversized payloads are refused by announced length
    let oversized = vec![b' '; 2 * 1024 * 1024];
    let response = client
        .post(&format!("{}/api/cart/{}/items", base_url, session_id))
        .header("content-type", "application/json")
        .body(oversized)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 413);
}
