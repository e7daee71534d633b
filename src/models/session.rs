use super::{BookingFlow, Cart};

/// Everything one browsing session owns: its cart and its booking flow.
/// Held by the session store only; never persisted.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: String,
    pub cart: Cart,
    pub booking: BookingFlow,
}

impl SessionState {
    pub fn new(session_id: String) -> Self {
        Self {
            cart: Cart::new(session_id.clone()),
            booking: BookingFlow::new(),
            session_id,
        }
    }
}
