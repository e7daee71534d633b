// Services module - business logic layer

pub mod booking_dispatcher;
pub mod booking_service;
pub mod cart_service;
pub mod catalog_service;
pub mod recommendation_client;
pub mod recommendation_service;

pub use booking_dispatcher::{BookingDispatcher, LogBookingDispatcher};
pub use booking_service::BookingService;
pub use cart_service::CartService;
pub use catalog_service::CatalogService;
pub use recommendation_client::{GeminiClient, RecommendationClient};
pub use recommendation_service::RecommendationService;
