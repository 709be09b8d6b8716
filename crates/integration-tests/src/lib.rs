//! Integration tests for the wallet checkout bridge.
//!
//! The tests run the real HTTP client against a `wiremock` server standing in
//! for the checkout API, so they need no network access or credentials.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wallet-checkout-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_api` - HTTP client behaviour per endpoint
//! - `wallet_flow` - Payment-sheet events end to end

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use wallet_checkout::{CheckoutClientConfig, ShopifyCheckoutClient};
use wallet_checkout_core::{Checkout, Contact, PersonName, PostalAddress};
use wiremock::MockServer;

/// Checkout token used by every fixture.
pub const CHECKOUT_TOKEN: &str = "9f4c2b1e7d";

/// API key configured on test clients.
pub const API_KEY: &str = "test-api-key";

/// Client configuration pointing at the mock server, with fast polling.
#[must_use]
pub fn client_config(server: &MockServer) -> CheckoutClientConfig {
    let mut config = CheckoutClientConfig::new(
        "naked-pineapple.myshopify.com",
        SecretString::from(API_KEY),
    );
    config.base_url = server.uri();
    config.timeout = Duration::from_secs(5);
    config.poll_interval = Duration::from_millis(10);
    config.max_poll_attempts = 3;
    config
}

/// HTTP client pointing at the mock server.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client(server: &MockServer) -> ShopifyCheckoutClient {
    ShopifyCheckoutClient::new(&client_config(server)).expect("Failed to build checkout client")
}

/// Path of a checkout endpoint, e.g. `checkout_path("/complete.json")`.
#[must_use]
pub fn checkout_path(suffix: &str) -> String {
    format!("/api/checkouts/{CHECKOUT_TOKEN}{suffix}")
}

// =============================================================================
// JSON Fixtures
// =============================================================================

#[must_use]
pub fn shop_json() -> Value {
    json!({
        "name": "Naked Pineapple",
        "domain": "nakedpineapple.co",
        "currency": "CAD",
        "money_format": "${{amount}}",
        "ships_to_countries": ["CA", "US"]
    })
}

/// A fresh single-item checkout with no address.
#[must_use]
pub fn checkout_json() -> Value {
    json!({
        "token": CHECKOUT_TOKEN,
        "requires_shipping": true,
        "currency": "CAD",
        "line_items": [{
            "id": "li-1",
            "variant_id": 39_412_345,
            "title": "Dried Pineapple",
            "quantity": 2,
            "price": "12.50",
            "line_price": "25.00"
        }],
        "subtotal_price": "25.00",
        "total_tax": "0.00",
        "total_price": "25.00",
        "payment_due": "25.00",
        "web_url": "https://nakedpineapple.co/checkouts/9f4c2b1e7d"
    })
}

/// The fixture checkout with fields merged over it.
#[must_use]
pub fn checkout_json_with(fields: Value) -> Value {
    let mut checkout = checkout_json();
    if let (Some(target), Value::Object(fields)) = (checkout.as_object_mut(), fields) {
        target.extend(fields);
    }
    checkout
}

#[must_use]
pub fn shipping_address_json() -> Value {
    json!({
        "first_name": "Dinosaur",
        "last_name": "Banana",
        "address1": "150 Elgin Street",
        "city": "Ottawa",
        "province": "ON",
        "zip": "K2P 1L4",
        "country_code": "CA"
    })
}

#[must_use]
pub fn rate_json(id: &str, title: &str, price: &str) -> Value {
    json!({ "id": id, "title": title, "price": price })
}

#[must_use]
pub fn rates_json() -> Value {
    json!({
        "shipping_rates": [
            rate_json("canada_post-DOM.RP-8.00", "Regular Parcel", "8.00"),
            rate_json("canada_post-DOM.EP-14.00", "Expedited Parcel", "14.00")
        ]
    })
}

/// The fixture checkout as a typed value.
///
/// # Panics
///
/// Panics if the fixture does not deserialize.
#[must_use]
#[allow(clippy::expect_used)]
pub fn checkout() -> Checkout {
    serde_json::from_value(checkout_json()).expect("Checkout fixture must deserialize")
}

/// A wallet contact with a complete Canadian address.
#[must_use]
pub fn contact() -> Contact {
    Contact {
        name: Some(PersonName {
            given_name: Some("Dinosaur".to_string()),
            family_name: Some("Banana".to_string()),
        }),
        postal_address: Some(PostalAddress {
            street: Some("150 Elgin Street".to_string()),
            city: Some("Ottawa".to_string()),
            state: Some("ON".to_string()),
            postal_code: Some("K2P 1L4".to_string()),
            country: Some("Canada".to_string()),
            iso_country_code: Some("CA".to_string()),
        }),
        email_address: Some("banana@example.com".to_string()),
        phone_number: Some("+1 613 555 0199".to_string()),
    }
}
