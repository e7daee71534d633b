use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    parse_contact, parse_schedule, validate_session_id, BookingDetails, BookingFlow,
    BookingFlowResponse, BookingRecord, ScheduleRequest, ServiceError, ServiceResult,
    SubmitBookingRequest,
};
use crate::repositories::SessionStore;
use crate::services::BookingDispatcher;

/// Service driving the per-session booking flow. State transitions run
/// atomically inside the session store; the dispatch hand-off happens
/// between the schedule/contact checks and the final completion, outside
/// any lock.
pub struct BookingService {
    sessions: Arc<SessionStore>,
    dispatcher: Arc<dyn BookingDispatcher>,
}

impl BookingService {
    /// Create a new BookingService
    pub fn new(sessions: Arc<SessionStore>, dispatcher: Arc<dyn BookingDispatcher>) -> Self {
        Self {
            sessions,
            dispatcher,
        }
    }

    /// Get the booking flow for a session. An unknown session reads as a
    /// fresh flow at the schedule step.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get_flow(&self, session_id: &str) -> ServiceResult<BookingFlowResponse> {
        validate_session_id(session_id)?;

        match self.sessions.snapshot(session_id).await {
            Some(session) => Ok(flow_to_response(session_id, &session.booking)),
            None => Ok(flow_to_response(session_id, &BookingFlow::new())),
        }
    }

    /// Accept schedule details and advance the flow to the contact step
    #[instrument(skip(self, request), fields(session_id = %session_id))]
    pub async fn submit_schedule(
        &self,
        session_id: &str,
        request: ScheduleRequest,
    ) -> ServiceResult<BookingFlowResponse> {
        crate::info_with_trace!("Capturing booking schedule");

        validate_session_id(session_id)?;
        let schedule = parse_schedule(&request)?;

        let flow = self
            .sessions
            .with_session_mut(session_id, |session| {
                session.booking.submit_schedule(schedule)?;
                Ok::<_, ServiceError>(session.booking.clone())
            })
            .await?;

        Ok(flow_to_response(session_id, &flow))
    }

    /// Return from the contact step to the schedule step. The accepted
    /// schedule is retained as a draft.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn step_back(&self, session_id: &str) -> ServiceResult<BookingFlowResponse> {
        validate_session_id(session_id)?;

        let flow = self
            .sessions
            .with_session_mut(session_id, |session| {
                session.booking.step_back()?;
                Ok::<_, ServiceError>(session.booking.clone())
            })
            .await?;

        Ok(flow_to_response(session_id, &flow))
    }

    /// Submit the booking: validate the contact details, snapshot the cart
    /// into a booking record, dispatch it, then complete the flow and empty
    /// the cart once the dispatch is acknowledged.
    #[instrument(skip(self, request), fields(session_id = %session_id))]
    pub async fn submit(
        &self,
        session_id: &str,
        request: SubmitBookingRequest,
    ) -> ServiceResult<BookingFlowResponse> {
        crate::info_with_trace!("Submitting booking");

        validate_session_id(session_id)?;
        let contact = parse_contact(&request)?;

        let record = self
            .sessions
            .with_session_mut(session_id, |session| {
                let schedule = match &session.booking {
                    BookingFlow::CollectingContact { schedule } => schedule.clone(),
                    other => {
                        return Err(ServiceError::InvalidTransition {
                            from: other.step().to_string(),
                            action: "submit".to_string(),
                        })
                    }
                };

                if session.cart.is_empty() {
                    return Err(ServiceError::EmptyCart {
                        session_id: session.cart.session_id.clone(),
                    });
                }

                Ok(BookingRecord::new(
                    BookingDetails { schedule, contact },
                    session.cart.lines.clone(),
                ))
            })
            .await?;

        // The record is already in the log stream, so a failed
        // acknowledgment does not lose the booking.
        if let Err(e) = self.dispatcher.dispatch(&record).await {
            crate::warn_with_trace!("Booking dispatch failed: {}", e);
        }

        let confirmation = record.confirmation();
        let flow = self
            .sessions
            .with_session_mut(session_id, |session| {
                session.booking.complete(confirmation)?;
                session.cart.clear();
                Ok::<_, ServiceError>(session.booking.clone())
            })
            .await?;

        crate::info_with_trace!(
            "Booking {} submitted with {} items",
            record.booking_id,
            record.total_items
        );

        Ok(flow_to_response(session_id, &flow))
    }

    /// Re-arm the flow for a new booking. Legal from every step; the cart
    /// is left untouched.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn reset(&self, session_id: &str) -> ServiceResult<BookingFlowResponse> {
        validate_session_id(session_id)?;

        let flow = self
            .sessions
            .with_session_mut(session_id, |session| {
                session.booking.reset();
                session.booking.clone()
            })
            .await;

        crate::info_with_trace!("Booking flow reset");
        Ok(flow_to_response(session_id, &flow))
    }
}

fn flow_to_response(session_id: &str, flow: &BookingFlow) -> BookingFlowResponse {
    BookingFlowResponse {
        session_id: session_id.to_string(),
        step: flow.step(),
        schedule: flow.schedule().cloned(),
        confirmation: flow.confirmation().cloned(),
    }
}
