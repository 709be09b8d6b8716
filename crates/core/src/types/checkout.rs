//! Checkout snapshot types returned by the checkout API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::Address;
use super::id::{CheckoutToken, LineItemId, ShippingRateId};

// =============================================================================
// Checkout
// =============================================================================

/// An in-progress order awaiting shipping and payment.
///
/// The server is the source of truth: every successful update returns a full
/// snapshot that replaces the local one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    /// Checkout token used in API paths.
    pub token: CheckoutToken,
    #[serde(default)]
    pub email: Option<String>,
    /// Whether any line item needs to be shipped.
    #[serde(default = "default_requires_shipping")]
    pub requires_shipping: bool,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    /// Currently selected shipping rate.
    #[serde(default)]
    pub shipping_rate: Option<ShippingRate>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub discount: Option<Discount>,
    #[serde(default)]
    pub gift_cards: Vec<GiftCard>,
    #[serde(default)]
    pub subtotal_price: Option<Decimal>,
    #[serde(default)]
    pub total_tax: Option<Decimal>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    /// Amount left to pay after gift cards.
    #[serde(default)]
    pub payment_due: Option<Decimal>,
    /// Order created on completion.
    #[serde(default)]
    pub order: Option<CheckoutOrder>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Web checkout URL, used as a fallback when wallet payment is unavailable.
    #[serde(default)]
    pub web_url: Option<String>,
}

const fn default_requires_shipping() -> bool {
    true
}

impl Checkout {
    /// Create an empty checkout for the given token.
    #[must_use]
    pub const fn new(token: CheckoutToken) -> Self {
        Self {
            token,
            email: None,
            requires_shipping: true,
            currency: None,
            shipping_address: None,
            billing_address: None,
            shipping_rate: None,
            line_items: Vec::new(),
            discount: None,
            gift_cards: Vec::new(),
            subtotal_price: None,
            total_tax: None,
            total_price: None,
            payment_due: None,
            order: None,
            completed_at: None,
            web_url: None,
        }
    }

    /// Whether the checkout has been turned into an order.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some() || self.order.is_some()
    }

    /// Sum of all line prices, before discounts.
    #[must_use]
    pub fn line_items_subtotal(&self) -> Decimal {
        self.line_items.iter().map(|line| line.line_price).sum()
    }

    /// Whether a non-zero discount currently applies.
    #[must_use]
    pub fn has_applicable_discount(&self) -> bool {
        self.discount
            .as_ref()
            .is_some_and(|d| d.applicable && !d.amount.is_zero())
    }
}

/// Order reference attached to a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOrder {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// Order status page.
    #[serde(default)]
    pub status_url: Option<String>,
}

// =============================================================================
// Line Items
// =============================================================================

/// A single line of the checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: Option<LineItemId>,
    pub variant_id: i64,
    #[serde(default)]
    pub title: String,
    pub quantity: u32,
    /// Unit price.
    pub price: Decimal,
    /// Unit price times quantity.
    pub line_price: Decimal,
}

// =============================================================================
// Shipping
// =============================================================================

/// A shipping option quoted for the checkout's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub id: ShippingRateId,
    pub title: String,
    pub price: Decimal,
    /// Earliest and latest delivery dates; may hold a single date.
    #[serde(default)]
    pub delivery_range: Option<Vec<DateTime<Utc>>>,
}

// =============================================================================
// Discounts & Gift Cards
// =============================================================================

/// Discount code applied to the checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(default)]
    pub code: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub applicable: bool,
}

/// Gift card applied to the checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCard {
    #[serde(default)]
    pub id: Option<i64>,
    /// Last four characters of the code, for display.
    pub last_characters: String,
    #[serde(default)]
    pub amount_used: Option<Decimal>,
    #[serde(default)]
    pub balance: Option<Decimal>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_snapshot() {
        let json = serde_json::json!({
            "token": "c1d2e3",
            "email": "buyer@example.com",
            "currency": "CAD",
            "requires_shipping": true,
            "shipping_rate": {
                "id": "canada_post-DOM.EP-10.00",
                "title": "Expedited Parcel",
                "price": "10.00",
                "delivery_range": ["2026-10-21T00:00:00Z", "2026-10-23T00:00:00Z"]
            },
            "line_items": [
                { "variant_id": 42, "title": "Pineapple", "quantity": 2, "price": "5.00", "line_price": "10.00" }
            ],
            "subtotal_price": "10.00",
            "total_tax": "1.30",
            "total_price": "21.30",
            "payment_due": "21.30",
            "completed_at": null
        });

        let checkout: Checkout = serde_json::from_value(json).unwrap();
        assert_eq!(checkout.token.as_str(), "c1d2e3");
        assert_eq!(checkout.line_items.len(), 1);
        assert_eq!(checkout.total_tax, Some(Decimal::new(130, 2)));
        assert_eq!(
            checkout
                .shipping_rate
                .as_ref()
                .and_then(|r| r.delivery_range.as_ref())
                .map(Vec::len),
            Some(2)
        );
        assert!(!checkout.is_completed());
    }

    #[test]
    fn test_missing_requires_shipping_defaults_to_true() {
        let checkout: Checkout = serde_json::from_value(serde_json::json!({ "token": "t" })).unwrap();
        assert!(checkout.requires_shipping);
        assert!(checkout.line_items.is_empty());
    }

    #[test]
    fn test_is_completed_with_order() {
        let mut checkout = Checkout::new(CheckoutToken::new("t"));
        checkout.order = Some(CheckoutOrder {
            id: 1001,
            name: Some("#1001".to_string()),
            status_url: None,
        });
        assert!(checkout.is_completed());
    }

    #[test]
    fn test_line_items_subtotal() {
        let mut checkout = Checkout::new(CheckoutToken::new("t"));
        for (variant_id, cents) in [(1, 1000), (2, 250)] {
            checkout.line_items.push(LineItem {
                id: None,
                variant_id,
                title: String::new(),
                quantity: 1,
                price: Decimal::new(cents, 2),
                line_price: Decimal::new(cents, 2),
            });
        }
        assert_eq!(checkout.line_items_subtotal(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_discount_applicability() {
        let mut checkout = Checkout::new(CheckoutToken::new("t"));
        assert!(!checkout.has_applicable_discount());

        checkout.discount = Some(Discount {
            code: Some("SUMMER".to_string()),
            amount: Decimal::ZERO,
            applicable: true,
        });
        assert!(!checkout.has_applicable_discount());

        checkout.discount = Some(Discount {
            code: Some("SUMMER".to_string()),
            amount: Decimal::new(500, 2),
            applicable: false,
        });
        assert!(!checkout.has_applicable_discount());

        checkout.discount = Some(Discount {
            code: Some("SUMMER".to_string()),
            amount: Decimal::new(500, 2),
            applicable: true,
        });
        assert!(checkout.has_applicable_discount());
    }
}
