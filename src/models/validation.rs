use super::{
    AddCartItemRequest, ContactDetails, RecommendRequest, ScheduleDetails, ScheduleRequest,
    SubmitBookingRequest, TimeSlot, ValidationError, ValidationResult,
};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MAX_SESSION_ID_LENGTH: usize = 100;
pub const MAX_SERVICE_ID_LENGTH: usize = 50;
pub const MAX_QUERY_LENGTH: usize = 500;
pub const MAX_CONTACT_NAME_LENGTH: usize = 100;
pub const MAX_ADDRESS_LENGTH: usize = 300;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NOTES_LENGTH: usize = 500;
pub const PHONE_DIGITS: usize = 10;

impl Validate for AddCartItemRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_service_id(&self.service_id)?;
        Ok(())
    }
}

impl Validate for ScheduleRequest {
    fn validate(&self) -> ValidationResult<()> {
        parse_schedule(self).map(|_| ())
    }
}

impl Validate for SubmitBookingRequest {
    fn validate(&self) -> ValidationResult<()> {
        parse_contact(self).map(|_| ())
    }
}

impl Validate for RecommendRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_query(&self.query)?;
        Ok(())
    }
}

/// Validate session ID format
pub fn validate_session_id(session_id: &str) -> ValidationResult<()> {
    let trimmed = session_id.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "session_id".to_string(),
        });
    }

    // Basic validation - should be alphanumeric with possible hyphens and underscores
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "session_id".to_string(),
            expected:
                "Session ID must contain only alphanumeric characters, hyphens, and underscores"
                    .to_string(),
        });
    }

    if trimmed.len() > MAX_SESSION_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "session_id".to_string(),
            max_length: MAX_SESSION_ID_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    Ok(())
}

/// Validate service offering ID format
pub fn validate_service_id(service_id: &str) -> ValidationResult<()> {
    let trimmed = service_id.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "service_id".to_string(),
        });
    }

    if trimmed.len() > MAX_SERVICE_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "service_id".to_string(),
            max_length: MAX_SERVICE_ID_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    // Catalog ids are short slugs like "ac-1" or "el-3"
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "service_id".to_string(),
            expected: "Service ID must contain only alphanumeric characters and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Validate a recommendation query
pub fn validate_query(query: &str) -> ValidationResult<()> {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "query".to_string(),
        });
    }

    if trimmed.len() > MAX_QUERY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max_length: MAX_QUERY_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    Ok(())
}

/// Validate the schedule step and parse it into accepted details. All three
/// fields must be present before the time slot is checked against the
/// offered windows.
pub fn parse_schedule(request: &ScheduleRequest) -> ValidationResult<ScheduleDetails> {
    let date = request.date.trim();
    let time_slot = request.time_slot.trim();
    let address = request.address.trim();

    let mut missing = Vec::new();
    if date.is_empty() {
        missing.push("date");
    }
    if time_slot.is_empty() {
        missing.push("time_slot");
    }
    if address.is_empty() {
        missing.push("address");
    }
    if !missing.is_empty() {
        return Err(ValidationError::AllFieldsRequired {
            missing: missing.join(", "),
        });
    }

    if address.len() > MAX_ADDRESS_LENGTH {
        return Err(ValidationError::TooLong {
            field: "address".to_string(),
            max_length: MAX_ADDRESS_LENGTH,
            actual_length: address.len(),
        });
    }

    let time_slot = time_slot
        .parse::<TimeSlot>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "time_slot".to_string(),
            expected: "One of the offered time windows (e.g. 09:00 - 11:00)".to_string(),
        })?;

    Ok(ScheduleDetails {
        date: date.to_string(),
        time_slot,
        address: address.to_string(),
    })
}

/// Validate the contact step and parse it into accepted details
pub fn parse_contact(request: &SubmitBookingRequest) -> ValidationResult<ContactDetails> {
    let name = request.name.trim();
    let phone = request.phone.trim();
    let email = request.email.trim();

    let mut missing = Vec::new();
    if name.is_empty() {
        missing.push("name");
    }
    if phone.is_empty() {
        missing.push("phone");
    }
    if email.is_empty() {
        missing.push("email");
    }
    if !missing.is_empty() {
        return Err(ValidationError::AllFieldsRequired {
            missing: missing.join(", "),
        });
    }

    if name.len() > MAX_CONTACT_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max_length: MAX_CONTACT_NAME_LENGTH,
            actual_length: name.len(),
        });
    }

    validate_phone(phone)?;
    validate_email(email)?;

    let notes = match &request.notes {
        Some(notes) => {
            let trimmed = notes.trim();
            if trimmed.len() > MAX_NOTES_LENGTH {
                return Err(ValidationError::TooLong {
                    field: "notes".to_string(),
                    max_length: MAX_NOTES_LENGTH,
                    actual_length: trimmed.len(),
                });
            }
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => None,
    };

    Ok(ContactDetails {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        notes,
    })
}

/// Validate phone number format
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let trimmed = phone.trim();

    if trimmed.len() != PHONE_DIGITS || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            expected: "Exactly 10 digits".to_string(),
        });
    }

    Ok(())
}

/// Validate email address shape
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let trimmed = email.trim();

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max_length: MAX_EMAIL_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    let well_formed = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain
                    .split_once('.')
                    .map(|(host, tail)| !host.is_empty() && !tail.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            expected: "name@domain.tld".to_string(),
        });
    }

    Ok(())
}
