use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Prometheus metrics for the storefront. Each instance owns its registry,
/// so parallel tests never collide on metric registration.
pub struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_requests_in_flight: IntGaugeVec,
    catalog_operations_total: IntCounterVec,
    cart_operations_total: IntCounterVec,
    booking_operations_total: IntCounterVec,
    recommendation_requests_total: IntCounterVec,
}

impl Metrics {
    /// Create and register all storefront metrics
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            ),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let http_requests_in_flight = IntGaugeVec::new(
            Opts::new(
                "http_requests_in_flight",
                "Number of HTTP requests currently being served",
            ),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        let catalog_operations_total = IntCounterVec::new(
            Opts::new(
                "catalog_operations_total",
                "Total number of catalog operations",
            ),
            &["operation", "category", "status"],
        )?;
        registry.register(Box::new(catalog_operations_total.clone()))?;

        let cart_operations_total = IntCounterVec::new(
            Opts::new("cart_operations_total", "Total number of cart operations"),
            &["operation", "status"],
        )?;
        registry.register(Box::new(cart_operations_total.clone()))?;

        let booking_operations_total = IntCounterVec::new(
            Opts::new(
                "booking_operations_total",
                "Total number of booking flow operations",
            ),
            &["operation", "status"],
        )?;
        registry.register(Box::new(booking_operations_total.clone()))?;

        let recommendation_requests_total = IntCounterVec::new(
            Opts::new(
                "recommendation_requests_total",
                "Total number of recommendation requests",
            ),
            &["status"],
        )?;
        registry.register(Box::new(recommendation_requests_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            catalog_operations_total,
            cart_operations_total,
            booking_operations_total,
            recommendation_requests_total,
        })
    }

    /// Record a completed HTTP request
    pub fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        duration_seconds: f64,
    ) {
        self.http_requests_total
            .with_label_values(&[method, endpoint, &status_code.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint])
            .observe(duration_seconds);
    }

    /// Increment the in-flight gauge for a request
    pub fn increment_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .inc();
    }

    /// Decrement the in-flight gauge for a request
    pub fn decrement_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .dec();
    }

    /// Record a catalog operation
    pub fn record_catalog_operation(&self, operation: &str, category: Option<&str>, success: bool) {
        self.catalog_operations_total
            .with_label_values(&[operation, category.unwrap_or("all"), status_label(success)])
            .inc();
    }

    /// Record a cart operation
    pub fn record_cart_operation(&self, operation: &str, success: bool) {
        self.cart_operations_total
            .with_label_values(&[operation, status_label(success)])
            .inc();
    }

    /// Record a booking flow operation
    pub fn record_booking_operation(&self, operation: &str, success: bool) {
        self.booking_operations_total
            .with_label_values(&[operation, status_label(success)])
            .inc();
    }

    /// Record a recommendation request
    pub fn record_recommendation_request(&self, success: bool) {
        self.recommendation_requests_total
            .with_label_values(&[status_label(success)])
            .inc();
    }

    /// Encode all registered metrics in the Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }
}

fn status_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}
