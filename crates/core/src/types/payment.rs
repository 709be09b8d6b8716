//! Payment-sheet types: tokens, authorized payments, and sheet artifacts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contact::Contact;

/// Opaque proof of payment produced by the platform wallet.
///
/// `payment_data` is passed through to the checkout API untouched.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentToken {
    /// Encrypted payment data (base64).
    pub payment_data: String,
    #[serde(default)]
    pub transaction_identifier: Option<String>,
    /// Card network, e.g. "Visa".
    #[serde(default)]
    pub payment_network: Option<String>,
}

impl std::fmt::Debug for PaymentToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentToken")
            .field("payment_data", &"[REDACTED]")
            .field("transaction_identifier", &self.transaction_identifier)
            .field("payment_network", &self.payment_network)
            .finish()
    }
}

/// A payment the buyer authorized in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedPayment {
    pub token: PaymentToken,
    /// Full (unredacted) shipping contact.
    pub shipping_contact: Option<Contact>,
    pub billing_contact: Option<Contact>,
    /// Shipping method shown as selected when the buyer authorized.
    pub shipping_method: Option<ShippingMethod>,
}

/// A shipping option as presented in the payment sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    /// Shipping rate ID.
    pub identifier: String,
    pub label: String,
    pub amount: Decimal,
    /// Delivery estimate such as "2-4 days"; empty when unknown.
    pub detail: String,
}

/// A line in the payment sheet's order summary.
///
/// The last item of a summary is the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub label: String,
    pub amount: Decimal,
}

impl SummaryItem {
    /// Create a summary item.
    #[must_use]
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_token_debug_redacts_data() {
        let token = PaymentToken {
            payment_data: "eyJ2ZXJzaW9uIjoiRUNfdjEifQ==".to_string(),
            transaction_identifier: Some("abc123".to_string()),
            payment_network: Some("Visa".to_string()),
        };
        let debug = format!("{token:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("eyJ2ZXJzaW9u"));
        assert!(debug.contains("abc123"));
    }
}
