//! Request bodies and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orders::{PlaceOrder, PlacedOrder};
use crate::types::{OrderStatus, Package};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("contactEmail is not a valid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid request body: {0}")]
    Body(String),
}

/// Body of `POST /api/mlbb/order`.
///
/// Field names are camelCase; snake_case spellings are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(alias = "player_id")]
    pub player_id: String,
    #[serde(alias = "server_id")]
    pub server_id: String,
    #[serde(alias = "package_id")]
    pub package_id: String,
    #[serde(default, alias = "contact_email")]
    pub contact_email: Option<String>,
}

impl CreateOrderRequest {
    /// Trim and check every field, producing the service input.
    pub fn validate(self) -> Result<PlaceOrder, ValidationError> {
        let player_id = required(&self.player_id, "playerId")?;
        let server_id = required(&self.server_id, "serverId")?;
        let package_id = required(&self.package_id, "packageId")?;

        let contact_email = match self.contact_email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(email) if is_email(email) => Some(email.to_string()),
            Some(email) => return Err(ValidationError::InvalidEmail(email.to_string())),
        };

        Ok(PlaceOrder {
            player_id,
            server_id,
            package_id,
            contact_email,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(trimmed.to_string())
}

/// Loose email shape check: `local@domain.tld`, no whitespace.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty() || l.starts_with('-') || l.ends_with('-')) {
        return false;
    }

    // Punycode TLDs (`xn--p1ai`) carry digits and hyphens; require one letter.
    labels.last().is_some_and(|tld| {
        tld.len() >= 2
            && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && tld.chars().any(|c| c.is_ascii_alphabetic())
    })
}

/// Body of `POST /api/mlbb/order` responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub status: OrderStatus,
}

impl From<PlacedOrder> for CreateOrderResponse {
    fn from(placed: PlacedOrder) -> Self {
        Self {
            order_id: placed.order_id,
            status: placed.status,
        }
    }
}

/// Body of `GET /api/mlbb/packages` responses.
#[derive(Debug, Serialize)]
pub struct PackagesResponse {
    pub packages: Vec<Package>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(player: &str, server: &str, package: &str, email: Option<&str>) -> CreateOrderRequest {
        CreateOrderRequest {
            player_id: player.to_string(),
            server_id: server.to_string(),
            package_id: package.to_string(),
            contact_email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let order = request("  123 ", "\t45\n", " 65a1b2c3d4e5f6a7b8c9d0e1 ", Some(" a@b.co "))
            .validate()
            .unwrap();
        assert_eq!(order.player_id, "123");
        assert_eq!(order.server_id, "45");
        assert_eq!(order.package_id, "65a1b2c3d4e5f6a7b8c9d0e1");
        assert_eq!(order.contact_email.as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_validate_blank_fields() {
        assert_eq!(
            request("   ", "1", "x", None).validate(),
            Err(ValidationError::Missing("playerId"))
        );
        assert_eq!(
            request("1", "", "x", None).validate(),
            Err(ValidationError::Missing("serverId"))
        );
        assert_eq!(
            request("1", "2", " ", None).validate(),
            Err(ValidationError::Missing("packageId"))
        );
    }

    #[test]
    fn test_validate_empty_email_is_absent() {
        let order = request("1", "2", "x", Some("  ")).validate().unwrap();
        assert!(order.contact_email.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let err = request("1", "2", "x", Some("player.example.com"))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEmail(_)));
    }

    #[test]
    fn test_is_email() {
        for ok in ["player@example.com", "a.b+c@sub.example.org", "x@y.io"] {
            assert!(is_email(ok), "{ok}");
        }
        for bad in [
            "",
            "plain",
            "@example.com",
            "user@",
            "user@localhost",
            "user@@example.com",
            "us er@example.com",
            "user@example.c",
            "user@example..com",
            "user@-example.com",
            "user@example.123",
            "user@example.c_m",
        ] {
            assert!(!is_email(bad), "{bad}");
        }
    }

    #[test]
    fn test_is_email_punycode_tld() {
        assert!(is_email("user@example.xn--p1ai"));
        assert!(is_email("user@xn--80ak6aa92e.xn--p1ai"));
        let order = request("1", "2", "x", Some("player@shop.xn--p1ai"))
            .validate()
            .unwrap();
        assert_eq!(order.contact_email.as_deref(), Some("player@shop.xn--p1ai"));
    }

    #[test]
    fn test_request_accepts_snake_case() {
        let body = r#"{"player_id":"1","server_id":"2","package_id":"3","contact_email":null}"#;
        let parsed: CreateOrderRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.player_id, "1");
        assert!(parsed.contact_email.is_none());
    }

    #[test]
    fn test_response_shape() {
        let response = CreateOrderResponse {
            order_id: "65a1b2c3d4e5f6a7b8c9d0e1".to_string(),
            status: OrderStatus::Pending,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["orderId"], "65a1b2c3d4e5f6a7b8c9d0e1");
        assert_eq!(json["status"], "pending");
    }
}
