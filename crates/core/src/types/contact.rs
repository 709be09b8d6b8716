//! Contact and address records handed over by the platform payment sheet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Keys used by [`LegacyAddressRecord`] address dictionaries.
pub mod legacy_keys {
    /// Street, possibly with several newline-separated lines.
    pub const STREET: &str = "Street";
    /// City.
    pub const CITY: &str = "City";
    /// State or province.
    pub const STATE: &str = "State";
    /// Postal code.
    pub const ZIP: &str = "ZIP";
    /// Country name.
    pub const COUNTRY: &str = "Country";
    /// ISO country code.
    pub const COUNTRY_CODE: &str = "CountryCode";
}

/// Structured person name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

/// Structured postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    /// Street lines separated by `\n`.
    pub street: Option<String>,
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    pub postal_code: Option<String>,
    /// Country display name.
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub iso_country_code: Option<String>,
}

/// A contact selected or authorized in the payment sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<PersonName>,
    pub postal_address: Option<PostalAddress>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
}

/// Key-value address book record used by older payment sheets.
///
/// Multi-value properties keep the platform's ordering; only the first entry
/// of each is ever read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAddressRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    /// Address dictionaries keyed by [`legacy_keys`].
    #[serde(default)]
    pub addresses: Vec<BTreeMap<String, String>>,
}

/// Address payload delivered when the buyer picks a shipping address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressInput {
    /// Structured contact.
    Contact(Contact),
    /// Key-value address book record.
    #[deprecated(note = "use `AddressInput::Contact`; legacy records are kept for older sheets")]
    Legacy(LegacyAddressRecord),
}

impl From<Contact> for AddressInput {
    fn from(contact: Contact) -> Self {
        Self::Contact(contact)
    }
}

#[allow(deprecated)]
impl From<LegacyAddressRecord> for AddressInput {
    fn from(record: LegacyAddressRecord) -> Self {
        Self::Legacy(record)
    }
}
