//! Checkout API client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_SHOP_DOMAIN` - Shop domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_API_KEY` - Checkout API key issued for the mobile sales channel
//!
//! ## Optional
//! - `SHOPIFY_APP_ID` - Sales channel application ID
//! - `CHECKOUT_API_BASE_URL` - Override for the API origin (default: `https://{domain}`)
//! - `CHECKOUT_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `CHECKOUT_POLL_INTERVAL_MS` - Delay between shipping-rate polls (default: 500)
//! - `CHECKOUT_MAX_POLL_ATTEMPTS` - Shipping-rate polls before giving up (default: 10)

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout API client configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct CheckoutClientConfig {
    /// Shop domain (e.g., your-store.myshopify.com)
    pub shop_domain: String,
    /// API origin requests are sent to
    pub base_url: String,
    /// Checkout API key
    pub api_key: SecretString,
    /// Sales channel application ID
    pub app_id: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay between shipping-rate polls while rates are being calculated
    pub poll_interval: Duration,
    /// Maximum number of shipping-rate polls
    pub max_poll_attempts: u32,
}

impl std::fmt::Debug for CheckoutClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutClientConfig")
            .field("shop_domain", &self.shop_domain)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("app_id", &self.app_id)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .finish()
    }
}

impl CheckoutClientConfig {
    /// Build a configuration with default timeouts for the given shop.
    #[must_use]
    pub fn new(shop_domain: impl Into<String>, api_key: SecretString) -> Self {
        let shop_domain = shop_domain.into();
        Self {
            base_url: format!("https://{shop_domain}"),
            shop_domain,
            api_key,
            app_id: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required =
            |key: &str| lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let shop_domain = required("SHOPIFY_SHOP_DOMAIN")?;
        let api_key = SecretString::from(required("SHOPIFY_API_KEY")?);

        let mut config = Self::new(shop_domain, api_key);
        config.app_id = lookup("SHOPIFY_APP_ID");

        if let Some(base_url) = lookup("CHECKOUT_API_BASE_URL") {
            url::Url::parse(&base_url).map_err(|e| {
                ConfigError::InvalidEnvVar("CHECKOUT_API_BASE_URL".to_string(), e.to_string())
            })?;
            config.base_url = base_url;
        }

        if let Some(secs) = parse_optional::<u64>(&lookup, "CHECKOUT_HTTP_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(millis) = parse_optional::<u64>(&lookup, "CHECKOUT_POLL_INTERVAL_MS")? {
            config.poll_interval = Duration::from_millis(millis);
        }
        if let Some(attempts) = parse_optional::<u32>(&lookup, "CHECKOUT_MAX_POLL_ATTEMPTS")? {
            config.max_poll_attempts = attempts;
        }

        Ok(config)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, failing only when it is set but malformed.
fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CheckoutClientConfig::from_lookup(lookup_from(&[
            ("SHOPIFY_SHOP_DOMAIN", "naked-pineapple.myshopify.com"),
            ("SHOPIFY_API_KEY", "k3y"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://naked-pineapple.myshopify.com");
        assert_eq!(config.api_key.expose_secret(), "k3y");
        assert_eq!(config.app_id, None);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.max_poll_attempts, 10);
    }

    #[test]
    fn test_overrides() {
        let config = CheckoutClientConfig::from_lookup(lookup_from(&[
            ("SHOPIFY_SHOP_DOMAIN", "naked-pineapple.myshopify.com"),
            ("SHOPIFY_API_KEY", "k3y"),
            ("SHOPIFY_APP_ID", "8"),
            ("CHECKOUT_API_BASE_URL", "http://127.0.0.1:8080"),
            ("CHECKOUT_HTTP_TIMEOUT_SECS", "5"),
            ("CHECKOUT_POLL_INTERVAL_MS", "20"),
            ("CHECKOUT_MAX_POLL_ATTEMPTS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.app_id.as_deref(), Some("8"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_millis(20));
        assert_eq!(config.max_poll_attempts, 3);
    }

    #[test]
    fn test_missing_api_key() {
        let err = CheckoutClientConfig::from_lookup(lookup_from(&[(
            "SHOPIFY_SHOP_DOMAIN",
            "naked-pineapple.myshopify.com",
        )]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "SHOPIFY_API_KEY"));
    }

    #[test]
    fn test_invalid_number() {
        let err = CheckoutClientConfig::from_lookup(lookup_from(&[
            ("SHOPIFY_SHOP_DOMAIN", "naked-pineapple.myshopify.com"),
            ("SHOPIFY_API_KEY", "k3y"),
            ("CHECKOUT_MAX_POLL_ATTEMPTS", "many"),
        ]))
        .unwrap_err();

        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CHECKOUT_MAX_POLL_ATTEMPTS")
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = CheckoutClientConfig::from_lookup(lookup_from(&[
            ("SHOPIFY_SHOP_DOMAIN", "naked-pineapple.myshopify.com"),
            ("SHOPIFY_API_KEY", "k3y"),
            ("CHECKOUT_API_BASE_URL", "not a url"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = CheckoutClientConfig::new(
            "naked-pineapple.myshopify.com",
            SecretString::from("super_secret_api_key"),
        );

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("naked-pineapple.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
    }
}
