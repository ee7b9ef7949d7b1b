//! Order service - turns a validated order request into a stored order.

use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::DocumentStore;
use crate::types::{NewOrder, Order, OrderStatus, StoreError};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("package not found: {0}")]
    PackageNotFound(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A validated order request.
///
/// `player_id` and `server_id` are already trimmed and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    pub player_id: String,
    pub server_id: String,
    pub package_id: String,
    pub contact_email: Option<String>,
}

/// Result of a successful order placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order_id: String,
    pub status: OrderStatus,
}

pub struct OrderService<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> OrderService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a pending order for the referenced package.
    ///
    /// The package's name, diamonds and price are copied into the order.
    /// Identical requests create separate orders.
    pub async fn create(&self, request: PlaceOrder) -> Result<PlacedOrder, OrderError> {
        let Ok(package_oid) = ObjectId::parse_str(&request.package_id) else {
            warn!(package_id = %request.package_id, "malformed package id");
            return Err(OrderError::PackageNotFound(request.package_id));
        };

        let package = self
            .store
            .find_package(&package_oid)
            .await?
            .ok_or_else(|| OrderError::PackageNotFound(request.package_id.clone()))?;

        let order = NewOrder::snapshot(
            &package,
            request.player_id,
            request.server_id,
            request.contact_email,
        );
        let id = self.store.insert_order(&order).await?;

        info!(
            order_id = %id,
            package = %package.name,
            diamonds = order.diamonds,
            "order created"
        );

        Ok(PlacedOrder {
            order_id: id.to_hex(),
            status: order.status,
        })
    }

    /// Fetch a stored order by id.
    pub async fn get(&self, order_id: &str) -> Result<Order, OrderError> {
        let oid = ObjectId::parse_str(order_id)
            .map_err(|_| OrderError::OrderNotFound(order_id.to_string()))?;

        self.store
            .find_order(&oid)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }
}
