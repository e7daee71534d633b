use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

use crate::models::{BookingRecord, ServiceResult};

/// Hand-off point for submitted bookings. The storefront only needs an
/// acknowledgment; what happens to the record afterwards is up to the
/// implementation.
#[async_trait]
pub trait BookingDispatcher: Send + Sync {
    /// Dispatch a submitted booking and wait for the acknowledgment
    async fn dispatch(&self, record: &BookingRecord) -> ServiceResult<()>;
}

/// Dispatcher that records the booking in the structured log and
/// acknowledges after a fixed delay. This is the storefront default; there
/// is no downstream fulfillment system to call.
pub struct LogBookingDispatcher {
    ack_delay: Duration,
}

impl LogBookingDispatcher {
    /// Create a dispatcher with the given acknowledgment delay
    pub fn new(ack_delay: Duration) -> Self {
        Self { ack_delay }
    }
}

#[async_trait]
impl BookingDispatcher for LogBookingDispatcher {
    #[instrument(skip(self, record), fields(booking_id = %record.booking_id))]
    async fn dispatch(&self, record: &BookingRecord) -> ServiceResult<()> {
        info!(
            booking_id = %record.booking_id,
            date = %record.details.schedule.date,
            time_slot = %record.details.schedule.time_slot,
            total_items = record.total_items,
            total_price = %record.total_price,
            line_count = record.lines.len(),
            "Booking dispatched"
        );

        sleep(self.ack_delay).await;

        info!(booking_id = %record.booking_id, "Booking acknowledged");
        Ok(())
    }
}
