//! Wallet Checkout Core - Shared types library.
//!
//! This crate provides the types used by the `wallet-checkout` bridge:
//! checkout snapshots returned by the checkout API, the address model, the
//! contact records delivered by a wallet payment sheet, and the artifacts the
//! sheet displays (shipping methods, summary items, status codes).
//!
//! # Architecture
//!
//! The core crate contains only types and pure conversions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Tokens, addresses, contacts, checkouts, shops, and sheet types
//! - [`mapping`] - Contact record to [`Address`] conversion
//! - [`wallet`] - Checkout to summary items / shipping methods conversion

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod mapping;
pub mod types;
pub mod wallet;

pub use mapping::address_from_input;
pub use types::*;
