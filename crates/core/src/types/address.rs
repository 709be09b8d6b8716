//! Mailing address type.

use serde::{Deserialize, Serialize};

/// A structured mailing address, as the checkout API stores it.
///
/// Every field is optional. Addresses built from a payment sheet before the
/// buyer authorizes are frequently partial (the platform redacts the street
/// and name until authorization), so nothing here is validated on
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// First street line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    /// Second street line (apartment, suite, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Province or state name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    /// Province or state code (e.g., "ON", "CA").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    /// Postal or ZIP code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// Country name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Address {
    /// Whether the address carries enough detail for the checkout API to
    /// quote shipping rates.
    ///
    /// A country is always required. United States addresses also need a ZIP
    /// code and a state.
    #[must_use]
    pub fn is_valid_for_shipping_rates(&self) -> bool {
        let country_code = non_empty(self.country_code.as_deref());
        let country = non_empty(self.country.as_deref());

        if country_code.is_none() && country.is_none() {
            return false;
        }

        let is_us = country_code.is_some_and(|c| c.eq_ignore_ascii_case("US"))
            || country.is_some_and(|c| c == "United States");
        if !is_us {
            return true;
        }

        let has_state = non_empty(self.province_code.as_deref()).is_some()
            || non_empty(self.province.as_deref()).is_some();
        non_empty(self.zip.as_deref()).is_some() && has_state
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
