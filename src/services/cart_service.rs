use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    validate_service_id, validate_session_id, AddCartItemRequest, AddCartItemResponse, Cart,
    CartLineResponse, CartResponse, ServiceError, ServiceResult, Validate,
};
use crate::repositories::{CatalogRepository, SessionStore};

/// Service for per-session cart operations. Mutations run atomically inside
/// the session store; reads never create a session.
pub struct CartService {
    catalog: Arc<dyn CatalogRepository>,
    sessions: Arc<SessionStore>,
}

impl CartService {
    /// Create a new CartService
    pub fn new(catalog: Arc<dyn CatalogRepository>, sessions: Arc<SessionStore>) -> Self {
        Self { catalog, sessions }
    }

    /// Get the cart for a session. An unknown session reads as an empty cart.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get_cart(&self, session_id: &str) -> ServiceResult<CartResponse> {
        validate_session_id(session_id)?;

        match self.sessions.snapshot(session_id).await {
            Some(session) => self.cart_to_response(&session.cart).await,
            None => {
                let now = Utc::now();
                Ok(CartResponse {
                    session_id: session_id.to_string(),
                    lines: Vec::new(),
                    total_items: 0,
                    total_price: rust_decimal::Decimal::ZERO,
                    created_at: now,
                    updated_at: now,
                })
            }
        }
    }

    /// Add one unit of a service to the session's cart. The price is
    /// snapshotted from the catalog at add time. `reveal_cart` is true only
    /// when the add landed in a previously empty cart.
    #[instrument(skip(self, request), fields(session_id = %session_id, service_id = %request.service_id))]
    pub async fn add_item(
        &self,
        session_id: &str,
        request: AddCartItemRequest,
    ) -> ServiceResult<AddCartItemResponse> {
        crate::info_with_trace!("Adding service to cart");

        validate_session_id(session_id)?;
        request.validate()?;

        let offering = self
            .catalog
            .find_by_id(&request.service_id)
            .await?
            .ok_or_else(|| ServiceError::OfferingNotFound {
                id: request.service_id.clone(),
            })?;

        let (line, reveal_cart) = self
            .sessions
            .with_session_mut(session_id, |session| {
                let was_empty = session.cart.is_empty();
                let line = session
                    .cart
                    .add_item(offering.id.clone(), offering.price)
                    .clone();
                (line, was_empty)
            })
            .await;

        crate::info_with_trace!(
            "Cart line now at quantity {}, reveal_cart={}",
            line.quantity,
            reveal_cart
        );

        Ok(AddCartItemResponse {
            line: CartLineResponse {
                service_id: line.service_id,
                service_name: offering.name,
                category: offering.category,
                image_url: offering.image_url,
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.unit_price * rust_decimal::Decimal::from(line.quantity),
                added_at: line.added_at,
            },
            reveal_cart,
        })
    }

    /// Adjust a line's quantity by a signed delta. A delta that would drop
    /// the quantity below 1, or targets a missing line, leaves the cart
    /// unchanged. Returns the resulting cart view either way.
    #[instrument(skip(self), fields(session_id = %session_id, service_id = %service_id, delta = delta))]
    pub async fn apply_delta(
        &self,
        session_id: &str,
        service_id: &str,
        delta: i64,
    ) -> ServiceResult<CartResponse> {
        validate_session_id(session_id)?;
        validate_service_id(service_id)?;

        let (changed, cart) = self
            .sessions
            .with_session_mut(session_id, |session| {
                let changed = session.cart.apply_delta(service_id, delta);
                (changed, session.cart.clone())
            })
            .await;

        if changed {
            crate::info_with_trace!("Cart quantity adjusted");
        } else {
            crate::info_with_trace!("Quantity delta was a no-op");
        }

        self.cart_to_response(&cart).await
    }

    /// Remove a line from the session's cart. Removing a line that is not
    /// present is a no-op.
    #[instrument(skip(self), fields(session_id = %session_id, service_id = %service_id))]
    pub async fn remove_item(&self, session_id: &str, service_id: &str) -> ServiceResult<()> {
        validate_session_id(session_id)?;
        validate_service_id(service_id)?;

        let removed = self
            .sessions
            .with_session_mut(session_id, |session| session.cart.remove_item(service_id))
            .await;

        if removed {
            crate::info_with_trace!("Cart line removed");
        }

        Ok(())
    }

    /// Remove all lines from the session's cart
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn clear(&self, session_id: &str) -> ServiceResult<()> {
        validate_session_id(session_id)?;

        self.sessions
            .with_session_mut(session_id, |session| session.cart.clear())
            .await;

        crate::info_with_trace!("Cart cleared");
        Ok(())
    }

    /// Render a cart with its lines enriched from the catalog
    async fn cart_to_response(&self, cart: &Cart) -> ServiceResult<CartResponse> {
        let mut lines = Vec::with_capacity(cart.lines.len());
        for line in &cart.lines {
            let offering = self
                .catalog
                .find_by_id(&line.service_id)
                .await?
                .ok_or_else(|| ServiceError::OfferingNotFound {
                    id: line.service_id.clone(),
                })?;

            lines.push(CartLineResponse {
                service_id: line.service_id.clone(),
                service_name: offering.name,
                category: offering.category,
                image_url: offering.image_url,
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.total_price(),
                added_at: line.added_at,
            });
        }

        Ok(CartResponse {
            session_id: cart.session_id.clone(),
            lines,
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        })
    }
}
