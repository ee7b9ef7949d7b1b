use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Package;

/// Game identifier stamped on every order.
pub const GAME_MLBB: &str = "mlbb";

/// Order lifecycle status.
///
/// Orders are created as `Pending`; nothing in this service moves them on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Completed,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "completed" => Ok(OrderStatus::Completed),
            "failed" => Ok(OrderStatus::Failed),
            _ => Err(format!("unknown order status: {}", s)),
        }
    }
}

/// A stored order.
///
/// `package_name`, `diamonds` and `price` are a snapshot of the package
/// taken when the order was placed; later catalog changes do not reach them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub game: String,
    pub player_id: String,
    pub server_id: String,
    pub package_id: String,
    pub package_name: String,
    pub diamonds: i64,
    pub price: f64,
    pub contact_email: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub game: String,
    pub player_id: String,
    pub server_id: String,
    pub package_id: String,
    pub package_name: String,
    pub diamonds: i64,
    pub price: f64,
    pub contact_email: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// Build a pending order from a resolved package, copying its attributes.
    pub fn snapshot(
        package: &Package,
        player_id: String,
        server_id: String,
        contact_email: Option<String>,
    ) -> Self {
        Self {
            game: GAME_MLBB.to_string(),
            player_id,
            server_id,
            package_id: package.id.clone(),
            package_name: package.name.clone(),
            diamonds: package.diamonds,
            price: package.price,
            contact_email,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
