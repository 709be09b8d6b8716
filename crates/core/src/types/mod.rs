//! Core types for Wallet Checkout.
//!
//! This module provides plain data types for checkouts, addresses, contacts,
//! and payment-sheet artifacts.

pub mod address;
pub mod checkout;
pub mod contact;
pub mod id;
pub mod payment;
pub mod shop;
pub mod status;

pub use address::Address;
pub use checkout::{Checkout, CheckoutOrder, Discount, GiftCard, LineItem, ShippingRate};
pub use contact::{
    AddressInput, Contact, LegacyAddressRecord, PersonName, PostalAddress, legacy_keys,
};
pub use id::*;
pub use payment::{AuthorizedPayment, PaymentToken, ShippingMethod, SummaryItem};
pub use shop::Shop;
pub use status::AuthorizationStatus;
