use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{CartLine, ServiceError, ServiceResult, TimeSlot};

/// Steps of the two-step booking form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    CollectingSchedule,
    CollectingContact,
    Submitted,
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStep::CollectingSchedule => write!(f, "collecting_schedule"),
            BookingStep::CollectingContact => write!(f, "collecting_contact"),
            BookingStep::Submitted => write!(f, "submitted"),
        }
    }
}

/// Schedule fields collected by the first booking step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDetails {
    pub date: String,
    pub time_slot: TimeSlot,
    pub address: String,
}

/// Contact fields collected by the second booking step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
}

/// The complete details of a finalized booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub schedule: ScheduleDetails,
    pub contact: ContactDetails,
}

/// A finalized booking: details plus the cart snapshot it was submitted
/// with. Handed to the downstream collaborator, never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking_id: String,
    pub details: BookingDetails,
    pub lines: Vec<CartLine>,
    pub total_items: u32,
    pub total_price: Decimal,
    pub submitted_at: DateTime<Utc>,
}

/// Confirmation surfaced after a successful submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub date: String,
    pub time_slot: TimeSlot,
    pub phone: String,
    pub total_items: u32,
    pub total_price: Decimal,
    pub submitted_at: DateTime<Utc>,
}

/// Request model for the first booking step. Fields default to empty so
/// missing-field submissions surface as validation errors, not decode errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time_slot: String,
    #[serde(default)]
    pub address: String,
}

/// Request model for the final booking step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitBookingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub notes: Option<String>,
}

/// Response model for booking flow reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingFlowResponse {
    pub session_id: String,
    pub step: BookingStep,
    pub schedule: Option<ScheduleDetails>,
    pub confirmation: Option<BookingConfirmation>,
}

/// The per-session booking form state machine:
/// `CollectingSchedule -> CollectingContact -> Submitted`. Schedule values
/// are retained across a step back; the confirmation rests in `Submitted`
/// until the flow is reset for the next booking.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingFlow {
    CollectingSchedule { draft: Option<ScheduleDetails> },
    CollectingContact { schedule: ScheduleDetails },
    Submitted { confirmation: BookingConfirmation },
}

impl Default for BookingFlow {
    fn default() -> Self {
        BookingFlow::new()
    }
}

impl BookingFlow {
    /// A fresh flow, resting at the schedule step with no draft
    pub fn new() -> Self {
        BookingFlow::CollectingSchedule { draft: None }
    }

    /// The step label for the current state
    pub fn step(&self) -> BookingStep {
        match self {
            BookingFlow::CollectingSchedule { .. } => BookingStep::CollectingSchedule,
            BookingFlow::CollectingContact { .. } => BookingStep::CollectingContact,
            BookingFlow::Submitted { .. } => BookingStep::Submitted,
        }
    }

    /// The schedule currently held by the flow, draft or accepted
    pub fn schedule(&self) -> Option<&ScheduleDetails> {
        match self {
            BookingFlow::CollectingSchedule { draft } => draft.as_ref(),
            BookingFlow::CollectingContact { schedule } => Some(schedule),
            BookingFlow::Submitted { .. } => None,
        }
    }

    /// The confirmation, present only while `Submitted`
    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        match self {
            BookingFlow::Submitted { confirmation } => Some(confirmation),
            _ => None,
        }
    }

    /// Accept the schedule and advance to the contact step
    pub fn submit_schedule(&mut self, schedule: ScheduleDetails) -> ServiceResult<()> {
        match self {
            BookingFlow::CollectingSchedule { .. } => {
                *self = BookingFlow::CollectingContact { schedule };
                Ok(())
            }
            other => Err(invalid_transition(other.step(), "submit_schedule")),
        }
    }

    /// Step back from the contact step, retaining the schedule as a draft
    pub fn step_back(&mut self) -> ServiceResult<()> {
        match self {
            BookingFlow::CollectingContact { schedule } => {
                let draft = Some(schedule.clone());
                *self = BookingFlow::CollectingSchedule { draft };
                Ok(())
            }
            other => Err(invalid_transition(other.step(), "step_back")),
        }
    }

    /// Finish the flow with the confirmation of a dispatched booking
    pub fn complete(&mut self, confirmation: BookingConfirmation) -> ServiceResult<()> {
        match self {
            BookingFlow::CollectingContact { .. } => {
                *self = BookingFlow::Submitted { confirmation };
                Ok(())
            }
            other => Err(invalid_transition(other.step(), "complete")),
        }
    }

    /// Re-arm the flow for the next booking, discarding drafts and any
    /// confirmation. Legal from every state.
    pub fn reset(&mut self) {
        *self = BookingFlow::new();
    }
}

fn invalid_transition(from: BookingStep, action: &str) -> ServiceError {
    ServiceError::InvalidTransition {
        from: from.to_string(),
        action: action.to_string(),
    }
}

impl BookingRecord {
    /// Assemble a record from accepted details and a cart snapshot
    pub fn new(details: BookingDetails, lines: Vec<CartLine>) -> Self {
        let total_items = lines.iter().map(|line| line.quantity).sum();
        let total_price = lines.iter().map(CartLine::total_price).sum();
        Self {
            booking_id: format!(
                "BK{}",
                Uuid::new_v4()
                    .simple()
                    .to_string()
                    .get(0..8)
                    .unwrap_or("00000000")
            ),
            details,
            lines,
            total_items,
            total_price,
            submitted_at: Utc::now(),
        }
    }

    /// The confirmation view for this record: the submitted date, time
    /// window, and phone number plus the order totals
    pub fn confirmation(&self) -> BookingConfirmation {
        BookingConfirmation {
            booking_id: self.booking_id.clone(),
            date: self.details.schedule.date.clone(),
            time_slot: self.details.schedule.time_slot,
            phone: self.details.contact.phone.clone(),
            total_items: self.total_items,
            total_price: self.total_price,
            submitted_at: self.submitted_at,
        }
    }
}
