//! Wallet Checkout - payment-sheet bridge for the Shopify checkout API.
//!
//! A wallet payment sheet (Apple Pay and friends) raises events while the
//! buyer interacts with it. This crate relays those events to the checkout
//! API and answers with what the sheet needs to redraw itself.
//!
//! # Modules
//!
//! - [`bridge`] - [`WalletPayBridge`], one per checkout and sheet
//! - [`client`] - [`CheckoutClient`] seam and the HTTP implementation
//! - [`config`] - Client configuration from environment variables
//!
//! # Example
//!
//! ```rust,ignore
//! use wallet_checkout::{CheckoutClientConfig, ShopifyCheckoutClient, WalletPayBridge};
//!
//! let client = ShopifyCheckoutClient::new(&CheckoutClientConfig::from_env()?)?;
//! let mut bridge = WalletPayBridge::new(client, checkout);
//!
//! let update = bridge.shipping_address_selected(&input).await;
//! let status = bridge.payment_authorized(&payment).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bridge;
pub mod client;
pub mod config;

pub use bridge::{BridgeError, SheetUpdate, WalletPayBridge};
pub use client::{CheckoutApiError, CheckoutClient, CheckoutUpdate, ShopifyCheckoutClient};
pub use config::{CheckoutClientConfig, ConfigError};
