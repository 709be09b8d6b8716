//! Shop reference data.

use serde::{Deserialize, Serialize};

/// Read-only shop metadata, as served by the shop's `meta.json` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    /// Display name, used as the payee label on the payment sheet.
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    /// ISO 4217 currency code.
    pub currency: String,
    #[serde(default)]
    pub money_format: Option<String>,
    /// ISO country codes the shop ships to. `"*"` means everywhere.
    #[serde(default)]
    pub ships_to_countries: Vec<String>,
}

impl Shop {
    /// Whether the shop ships to the given ISO country code.
    #[must_use]
    pub fn ships_to(&self, country_code: &str) -> bool {
        self.ships_to_countries
            .iter()
            .any(|c| c == "*" || c.eq_ignore_ascii_case(country_code))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ships_to() {
        let shop: Shop = serde_json::from_value(serde_json::json!({
            "name": "Naked Pineapple",
            "currency": "CAD",
            "ships_to_countries": ["CA", "US"]
        }))
        .unwrap();

        assert!(shop.ships_to("ca"));
        assert!(!shop.ships_to("GB"));
    }

    #[test]
    fn test_ships_everywhere() {
        let shop = Shop {
            name: "Shop".to_string(),
            domain: None,
            currency: "USD".to_string(),
            money_format: None,
            ships_to_countries: vec!["*".to_string()],
        };
        assert!(shop.ships_to("JP"));
    }
}
