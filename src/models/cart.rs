use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;

/// Shopping cart for a storefront session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub session_id: String,
    pub lines: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One (service, quantity) pairing in a cart. Quantity is always >= 1 while
/// the line exists; lines leave the cart only through explicit removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub service_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub added_at: DateTime<Utc>,
}

/// Request model for adding a service to the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItemRequest {
    pub service_id: String,
}

/// Request model for adjusting a line's quantity by a signed delta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityDeltaRequest {
    pub delta: i64,
}

/// Response model for cart reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub session_id: String,
    pub lines: Vec<CartLineResponse>,
    pub total_items: u32,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart line enriched with offering details for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineResponse {
    pub service_id: String,
    pub service_name: String,
    pub category: Category,
    pub image_url: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub added_at: DateTime<Utc>,
}

/// Response for an add-to-cart operation. `reveal_cart` is the UI-visibility
/// signal: true only when the add landed in a previously empty cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItemResponse {
    pub line: CartLineResponse,
    pub reveal_cart: bool,
}

impl Cart {
    /// Create a new empty cart for a session
    pub fn new(session_id: String) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add one unit of a service: a missing line is created with quantity 1,
    /// an existing line is incremented. Insertion order is preserved.
    /// Returns the touched line.
    pub fn add_item(&mut self, service_id: String, unit_price: Decimal) -> &CartLine {
        let index = match self
            .lines
            .iter()
            .position(|line| line.service_id == service_id)
        {
            Some(index) => {
                self.lines[index].quantity += 1;
                index
            }
            None => {
                self.lines.push(CartLine {
                    service_id,
                    quantity: 1,
                    unit_price,
                    added_at: Utc::now(),
                });
                self.lines.len() - 1
            }
        };
        self.updated_at = Utc::now();
        &self.lines[index]
    }

    /// Adjust a line's quantity by a signed delta. A result that would drop
    /// the quantity to 0 or below is a no-op: the line keeps its prior
    /// quantity and is never auto-removed. Returns whether anything changed.
    pub fn apply_delta(&mut self, service_id: &str, delta: i64) -> bool {
        let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.service_id == service_id)
        else {
            return false;
        };

        let adjusted = i64::from(line.quantity) + delta;
        if adjusted < 1 {
            return false;
        }

        line.quantity = adjusted as u32;
        self.updated_at = Utc::now();
        true
    }

    /// Remove a line from the cart
    pub fn remove_item(&mut self, service_id: &str) -> bool {
        let original_len = self.lines.len();
        self.lines.retain(|line| line.service_id != service_id);
        let removed = self.lines.len() != original_len;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Clear all lines from the cart
    pub fn clear(&mut self) {
        self.lines.clear();
        self.updated_at = Utc::now();
    }

    /// Total unit count across all lines
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Total price across all lines
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::total_price).sum()
    }

    /// Check if the cart is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a specific line from the cart
    pub fn get_line(&self, service_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.service_id == service_id)
    }

    /// Check if a specific service is in the cart
    pub fn contains_line(&self, service_id: &str) -> bool {
        self.lines.iter().any(|line| line.service_id == service_id)
    }

    /// Get the quantity of a specific line, 0 if absent
    pub fn line_quantity(&self, service_id: &str) -> u32 {
        self.get_line(service_id)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }
}

impl CartLine {
    /// Total price for this line (unit_price * quantity)
    pub fn total_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
