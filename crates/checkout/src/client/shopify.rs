//! Shopify checkout API client implementation.
//!
//! Talks to the shop's mobile checkout endpoints with `reqwest`:
//!
//! - `GET  /meta.json` - shop metadata
//! - `PATCH /api/checkouts/{token}.json` - update a checkout
//! - `GET  /api/checkouts/{token}.json` - poll a checkout while payment processes
//! - `GET  /api/checkouts/{token}/shipping_rates.json` - quote shipping rates
//! - `POST /api/checkouts/{token}/complete.json` - pay with a wallet token

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;
use wallet_checkout_core::{Checkout, CheckoutToken, PaymentToken, ShippingRate, Shop};

use super::{CheckoutApiError, CheckoutClient, CheckoutUpdate};
use crate::config::CheckoutClientConfig;

/// Payment token type understood by the checkout API for wallet payments.
const WALLET_PAYMENT_TYPE: &str = "apple_pay";

/// Header carrying the sales channel application ID.
const APP_ID_HEADER: &str = "x-shopify-app-id";

/// Maximum number of body characters included in logs and errors.
const BODY_PREVIEW_CHARS: usize = 500;

// =============================================================================
// ShopifyCheckoutClient
// =============================================================================

/// Client for the Shopify checkout API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ShopifyCheckoutClient {
    inner: Arc<ShopifyCheckoutClientInner>,
}

struct ShopifyCheckoutClientInner {
    client: reqwest::Client,
    base_url: Url,
    poll_interval: std::time::Duration,
    max_poll_attempts: u32,
}

#[derive(Deserialize)]
struct CheckoutEnvelope {
    checkout: Checkout,
}

#[derive(Deserialize)]
struct ShippingRatesEnvelope {
    shipping_rates: Vec<ShippingRate>,
}

impl ShopifyCheckoutClient {
    /// Create a new checkout API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or API key cannot be used, or if the
    /// HTTP client fails to build.
    pub fn new(config: &CheckoutClientConfig) -> Result<Self, CheckoutApiError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Basic {}", BASE64.encode(config.api_key.expose_secret()));
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| CheckoutApiError::InvalidHeader(format!("API key: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("wallet-checkout/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(app_id) = &config.app_id {
            headers.insert(
                APP_ID_HEADER,
                HeaderValue::from_str(app_id)
                    .map_err(|e| CheckoutApiError::InvalidHeader(format!("app ID: {e}")))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        // Url::join treats the last segment as a file unless it ends in '/'
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ShopifyCheckoutClientInner {
                client,
                base_url,
                poll_interval: config.poll_interval,
                max_poll_attempts: config.max_poll_attempts.max(1),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CheckoutApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn checkout_endpoint(
        &self,
        token: &CheckoutToken,
        suffix: &str,
    ) -> Result<Url, CheckoutApiError> {
        self.endpoint(&format!("api/checkouts/{token}{suffix}"))
    }

    /// Send a request and return the status and body of any non-error response.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), CheckoutApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CheckoutApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("errors").map(flatten_errors))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| preview(&body));
            debug!(errors = %message, "Checkout API rejected update");
            return Err(CheckoutApiError::UserErrors(message));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&body),
                "Checkout API returned non-success status"
            );
            return Err(CheckoutApiError::Api {
                status: status.as_u16(),
                message: preview(&body),
            });
        }

        Ok((status, body))
    }

    /// Send a request and decode its JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CheckoutApiError> {
        let (_, body) = self.send(request).await?;
        parse_body(&body)
    }
}

impl CheckoutClient for ShopifyCheckoutClient {
    type Error = CheckoutApiError;

    #[instrument(skip(self))]
    async fn fetch_shop(&self) -> Result<Shop, CheckoutApiError> {
        let url = self.endpoint("meta.json")?;
        let shop: Shop = self.send_json(self.inner.client.get(url)).await?;
        debug!(shop = %shop.name, "Fetched shop metadata");
        Ok(shop)
    }

    #[instrument(skip(self, update), fields(token = %token))]
    async fn update_checkout(
        &self,
        token: &CheckoutToken,
        update: CheckoutUpdate,
    ) -> Result<Checkout, CheckoutApiError> {
        let url = self.checkout_endpoint(token, ".json")?;
        let body = serde_json::json!({ "checkout": update });
        let envelope: CheckoutEnvelope = self
            .send_json(self.inner.client.patch(url).json(&body))
            .await?;
        Ok(envelope.checkout)
    }

    #[instrument(skip(self), fields(token = %token))]
    async fn shipping_rates(
        &self,
        token: &CheckoutToken,
    ) -> Result<Vec<ShippingRate>, CheckoutApiError> {
        let mut url = self.checkout_endpoint(token, "/shipping_rates.json")?;
        url.query_pairs_mut()
            .append_pair("checkout[partial_addresses]", "true");

        let attempts = self.inner.max_poll_attempts;
        for attempt in 1..=attempts {
            let (status, body) = self.send(self.inner.client.get(url.clone())).await?;

            // 202 means the rates are still being calculated
            if status == StatusCode::ACCEPTED {
                debug!(attempt, "Shipping rates pending");
                if attempt < attempts {
                    tokio::time::sleep(self.inner.poll_interval).await;
                }
                continue;
            }

            let envelope: ShippingRatesEnvelope = parse_body(&body)?;
            debug!(count = envelope.shipping_rates.len(), "Fetched shipping rates");
            return Ok(envelope.shipping_rates);
        }

        Err(CheckoutApiError::ShippingRatesPending { attempts })
    }

    #[instrument(skip(self, payment_token), fields(token = %token))]
    async fn complete_checkout(
        &self,
        token: &CheckoutToken,
        payment_token: &PaymentToken,
    ) -> Result<Checkout, CheckoutApiError> {
        let url = self.checkout_endpoint(token, "/complete.json")?;
        let body = serde_json::json!({
            "payment_token": {
                "payment_data": payment_token.payment_data,
                "type": WALLET_PAYMENT_TYPE,
            }
        });
        let (status, body) = self.send(self.inner.client.post(url).json(&body)).await?;

        // 202 means the payment is still processing; its body may be empty
        let mut latest = if status == StatusCode::ACCEPTED {
            serde_json::from_str::<CheckoutEnvelope>(&body)
                .ok()
                .map(|e| e.checkout)
        } else {
            Some(parse_body::<CheckoutEnvelope>(&body)?.checkout)
        };
        if let Some(checkout) = latest.take_if(|c| c.is_completed()) {
            return Ok(checkout);
        }

        let url = self.checkout_endpoint(token, ".json")?;
        let attempts = self.inner.max_poll_attempts;
        for attempt in 1..=attempts {
            tokio::time::sleep(self.inner.poll_interval).await;
            let (status, body) = self.send(self.inner.client.get(url.clone())).await?;

            if status == StatusCode::ACCEPTED {
                debug!(attempt, "Checkout completion pending");
                continue;
            }

            let envelope: CheckoutEnvelope = parse_body(&body)?;
            if envelope.checkout.is_completed() {
                debug!(attempt, "Checkout completed");
                return Ok(envelope.checkout);
            }
            debug!(attempt, "Checkout not completed yet");
            latest = Some(envelope.checkout);
        }

        latest.ok_or(CheckoutApiError::CompletionPending { attempts })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, CheckoutApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %preview(body),
            "Failed to parse checkout API response"
        );
        CheckoutApiError::Parse(e)
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Flatten a nested `errors` object into `"path.to.field: message"` entries.
fn flatten_errors(errors: &serde_json::Value) -> String {
    fn walk(value: &serde_json::Value, path: &mut Vec<String>, out: &mut Vec<String>) {
        match value {
            serde_json::Value::Object(map) => {
                if let Some(serde_json::Value::String(message)) = map.get("message") {
                    out.push(format_entry(path, message));
                    return;
                }
                for (key, child) in map {
                    path.push(key.clone());
                    walk(child, path, out);
                    path.pop();
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    walk(item, path, out);
                }
            }
            serde_json::Value::String(message) => out.push(format_entry(path, message)),
            _ => {}
        }
    }

    fn format_entry(path: &[String], message: &str) -> String {
        if path.is_empty() {
            message.to_string()
        } else {
            format!("{}: {message}", path.join("."))
        }
    }

    let mut out = Vec::new();
    walk(errors, &mut Vec::new(), &mut out);
    out.join("; ")
}
