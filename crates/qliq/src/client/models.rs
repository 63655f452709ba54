//! Request and response payloads

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Servers send `null` for unset numbers and lists; read it as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Product name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Long description
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
}

/// One line of the shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart line identifier, used for removal
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Product on this line, when the server expands it
    #[serde(default)]
    pub product: Option<Product>,
    /// Number of units
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
}

impl CartItem {
    /// Price × quantity, zero if the product is not expanded.
    pub fn line_total(&self) -> f64 {
        let price = self.product.as_ref().map_or(0.0, |p| p.price);
        price * f64::from(self.quantity)
    }
}

/// Cart contents as returned by every cart endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    /// Cart lines
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<CartItem>,
}

impl CartState {
    /// Sum of all line totals.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across lines.
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A line of a past order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Ordered product, when expanded
    #[serde(default)]
    pub product: Option<Product>,
    /// Number of units
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
}

/// A past order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Payment transaction reference
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Creation timestamp, as sent by the server
    #[serde(default)]
    pub created_at: Option<String>,
    /// Payment state, e.g. `paid`
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Order total
    #[serde(default)]
    pub total: Option<f64>,
    /// Ordered lines
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
}

/// Checkout result. The server shape is open, so all fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Raw confirmation fields
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name
    pub name: String,
    /// Login address
    pub email: String,
    /// Code to share with new recruits
    #[serde(default)]
    pub referral_code: Option<String>,
    /// Commission earned from the downline
    #[serde(default, deserialize_with = "null_as_default")]
    pub commission_balance: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login: the bearer token plus whatever user summary the server
/// sends alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer credential
    pub token: String,
    /// Remaining response fields
    #[serde(flatten)]
    pub user: Map<String, Value>,
}

/// Account creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Login address
    pub email: String,
    /// Password
    pub password: String,
    /// Referral code of the recruiting member; the server spells it `referalCode`
    #[serde(rename = "referalCode")]
    pub referral_code: Option<String>,
}

impl RegisterRequest {
    /// Create a request without a referral code.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            referral_code: None,
        }
    }

    /// Attach a referral code. Blank codes are sent as `null`.
    pub fn with_referral_code(mut self, code: Option<&str>) -> Self {
        self.referral_code = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        self
    }

    /// Reject requests with an empty name, email or password.
    pub fn validate(&self) -> Result<(), ApiError> {
        let blank: Vec<&str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation {
                message: format!("required fields are empty: {}", blank.join(", ")),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_cart_total_ignores_missing_products() {
        let cart: CartState = serde_json::from_value(json!({
            "items": [
                { "_id": "c1", "product": { "_id": "p1", "name": "Tea", "price": 2.5 }, "quantity": 2 },
                { "_id": "c2", "quantity": 3 },
                { "_id": "c3", "product": { "_id": "p2", "name": "Mug" }, "quantity": 1 }
            ]
        }))
        .unwrap();
        assert_eq!(cart.total(), 5.0);
        assert_eq!(cart.unit_count(), 6);
    }

    #[test]
    fn test_cart_null_numbers_count_as_zero() {
        let cart: CartState = serde_json::from_value(json!({
            "items": [
                { "_id": "c1", "product": { "_id": "p1", "name": "Tea", "price": null }, "quantity": 1 },
                { "_id": "c2", "product": { "_id": "p2", "name": null, "price": 4.0 }, "quantity": null },
                { "_id": "c3", "product": { "_id": "p3", "name": "Mug", "price": 3.0 }, "quantity": 2 }
            ]
        }))
        .unwrap();
        assert_eq!(cart.items[0].line_total(), 0.0);
        assert_eq!(cart.items[1].quantity, 0);
        assert_eq!(cart.items[1].product.as_ref().unwrap().name, "");
        assert_eq!(cart.total(), 6.0);
        assert_eq!(cart.unit_count(), 3);
    }

    #[test]
    fn test_null_lists_and_balance_read_as_empty() {
        let cart: CartState = serde_json::from_value(json!({ "items": null })).unwrap();
        assert!(cart.is_empty());

        let profile: UserProfile = serde_json::from_value(json!({
            "name": "Ann", "email": "ann@x.io", "commissionBalance": null
        }))
        .unwrap();
        assert_eq!(profile.commission_balance, 0.0);
    }

    #[test]
    fn test_cart_without_items_field() {
        let cart: CartState = serde_json::from_value(json!({ "user": "u1" })).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_register_payload_spelling() {
        let req = RegisterRequest::new("Ann", "ann@x.io", "pw").with_referral_code(Some(" R42 "));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "name": "Ann", "email": "ann@x.io", "password": "pw", "referalCode": "R42" })
        );
    }

    #[test]
    fn test_blank_referral_code_sent_as_null() {
        let req = RegisterRequest::new("Ann", "ann@x.io", "pw").with_referral_code(Some("   "));
        assert_eq!(serde_json::to_value(&req).unwrap()["referalCode"], Value::Null);
    }

    #[test]
    fn test_register_validation_lists_blank_fields() {
        let err = RegisterRequest::new("", "ann@x.io", " ").validate().unwrap_err();
        match err {
            ApiError::Validation { message } => {
                assert_eq!(message, "required fields are empty: name, password")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_login_response_keeps_user_fields() {
        let res: LoginResponse =
            serde_json::from_value(json!({ "token": "abc", "name": "Ann", "role": "user" })).unwrap();
        assert_eq!(res.token, "abc");
        assert_eq!(res.user["name"], "Ann");
    }

    #[test]
    fn test_order_decodes_camel_case() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o1",
            "transactionId": "tx-9",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "paymentStatus": "paid",
            "total": 12.5,
            "items": [{ "product": { "_id": "p1", "name": "Tea", "price": 2.5 }, "quantity": 5 }]
        }))
        .unwrap();
        assert_eq!(order.transaction_id.as_deref(), Some("tx-9"));
        assert_eq!(order.payment_status.as_deref(), Some("paid"));
        assert_eq!(order.items.len(), 1);
    }
}
