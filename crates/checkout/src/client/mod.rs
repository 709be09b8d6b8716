//! Checkout API clients.
//!
//! # Architecture
//!
//! - [`CheckoutClient`] is the seam the bridge talks to; it only describes the
//!   remote operations a wallet checkout needs.
//! - [`ShopifyCheckoutClient`] implements it over HTTP with `reqwest`.
//! - The server is the source of truth: every mutating call returns the full
//!   checkout snapshot it produced.
//!
//! # Example
//!
//! ```rust,ignore
//! use wallet_checkout::{CheckoutClient, CheckoutClientConfig, ShopifyCheckoutClient};
//!
//! let client = ShopifyCheckoutClient::new(&CheckoutClientConfig::from_env()?)?;
//!
//! let shop = client.fetch_shop().await?;
//! let rates = client.shipping_rates(&checkout.token).await?;
//! let checkout = client.update_shipping_line(&checkout.token, &rates[0].id).await?;
//! ```

mod shopify;

use std::future::Future;

use serde::Serialize;
use thiserror::Error;
use wallet_checkout_core::{
    Address, Checkout, CheckoutToken, PaymentToken, ShippingRate, ShippingRateId, Shop,
};

pub use shopify::ShopifyCheckoutClient;

/// Remote operations the wallet bridge performs against a checkout service.
///
/// Implementations must be cheap to share; the bridge holds one for its whole
/// lifetime. Errors are opaque to the bridge, which only records them.
pub trait CheckoutClient: Send + Sync {
    /// Error produced by this client.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch shop metadata.
    fn fetch_shop(&self) -> impl Future<Output = Result<Shop, Self::Error>> + Send;

    /// Apply a partial update and return the resulting checkout.
    fn update_checkout(
        &self,
        token: &CheckoutToken,
        update: CheckoutUpdate,
    ) -> impl Future<Output = Result<Checkout, Self::Error>> + Send;

    /// Replace the shipping address so rates and taxes are recalculated.
    fn update_shipping_address(
        &self,
        token: &CheckoutToken,
        address: &Address,
    ) -> impl Future<Output = Result<Checkout, Self::Error>> + Send {
        self.update_checkout(token, CheckoutUpdate::shipping_address(address.clone()))
    }

    /// Select a shipping rate.
    fn update_shipping_line(
        &self,
        token: &CheckoutToken,
        rate_id: &ShippingRateId,
    ) -> impl Future<Output = Result<Checkout, Self::Error>> + Send {
        self.update_checkout(token, CheckoutUpdate::shipping_rate(rate_id.clone()))
    }

    /// Shipping rates available for the checkout's current address.
    fn shipping_rates(
        &self,
        token: &CheckoutToken,
    ) -> impl Future<Output = Result<Vec<ShippingRate>, Self::Error>> + Send;

    /// Pay for the checkout with a wallet payment token.
    ///
    /// Waits while the payment is processing. The returned checkout may still
    /// be incomplete if processing did not finish in time.
    fn complete_checkout(
        &self,
        token: &CheckoutToken,
        payment_token: &PaymentToken,
    ) -> impl Future<Output = Result<Checkout, Self::Error>> + Send;
}

/// Fields to change on a checkout. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_rate_id: Option<ShippingRateId>,
    /// Lets the server accept redacted addresses for rate quotes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_addresses: Option<bool>,
}

impl CheckoutUpdate {
    /// Update only the shipping address, allowing a partial address.
    #[must_use]
    pub fn shipping_address(address: Address) -> Self {
        Self {
            shipping_address: Some(address),
            partial_addresses: Some(true),
            ..Self::default()
        }
    }

    /// Update only the selected shipping rate.
    #[must_use]
    pub fn shipping_rate(rate_id: ShippingRateId) -> Self {
        Self {
            shipping_rate_id: Some(rate_id),
            ..Self::default()
        }
    }

    /// Whether the update would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Errors that can occur when talking to the checkout API.
#[derive(Debug, Error)]
pub enum CheckoutApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Validation errors for the submitted checkout (HTTP 422).
    #[error("User errors: {0}")]
    UserErrors(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Header value could not be built from configuration.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Shipping rates were still being calculated after every poll.
    #[error("Shipping rates still pending after {attempts} attempts")]
    ShippingRatesPending { attempts: u32 },

    /// Payment was still processing after every poll and no checkout was returned.
    #[error("Checkout completion still pending after {attempts} attempts")]
    CompletionPending { attempts: u32 },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CheckoutApiError::Api {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not Found");

        let err = CheckoutApiError::ShippingRatesPending { attempts: 10 };
        assert_eq!(
            err.to_string(),
            "Shipping rates still pending after 10 attempts"
        );

        let err = CheckoutApiError::CompletionPending { attempts: 3 };
        assert_eq!(
            err.to_string(),
            "Checkout completion still pending after 3 attempts"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = CheckoutApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_shipping_address_update_serialization() {
        let update = CheckoutUpdate::shipping_address(Address {
            city: Some("Ottawa".to_string()),
            country_code: Some("CA".to_string()),
            ..Address::default()
        });

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({
                "shipping_address": { "city": "Ottawa", "country_code": "CA" },
                "partial_addresses": true
            })
        );
    }

    #[test]
    fn test_shipping_rate_update_serialization() {
        let update = CheckoutUpdate::shipping_rate(ShippingRateId::new("usps-Priority-7.35"));
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "shipping_rate_id": "usps-Priority-7.35" })
        );
        assert!(!update.is_empty());
        assert!(CheckoutUpdate::default().is_empty());
    }
}
