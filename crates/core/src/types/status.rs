//! Status codes reported back to the payment sheet.

use serde::{Deserialize, Serialize};

/// Outcome of a payment-sheet event, as the sheet understands it.
///
/// Mirrors the platform's authorization status codes. The sheet decides
/// whether to prompt the buyer again or dismiss based on this value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// The update or payment went through.
    Success,
    /// Generic failure. The detailed cause is kept by the caller.
    Failure,
    /// The shipping address cannot be served or is incomplete.
    InvalidShippingPostalAddress,
}

impl AuthorizationStatus {
    /// Whether this status lets the sheet proceed.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(AuthorizationStatus::Success.is_success());
        assert!(!AuthorizationStatus::Failure.is_success());
        assert!(!AuthorizationStatus::InvalidShippingPostalAddress.is_success());
    }

    #[test]
    fn test_serialization() {
        assert_eq!(
            serde_json::to_string(&AuthorizationStatus::InvalidShippingPostalAddress).unwrap(),
            "\"invalid_shipping_postal_address\""
        );
        assert_eq!(
            serde_json::from_str::<AuthorizationStatus>("\"failure\"").unwrap(),
            AuthorizationStatus::Failure
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let parsed = serde_json::from_str::<AuthorizationStatus>("\"invalid_shipping_contact\"");
        assert!(parsed.is_err());
    }
}
