//! Conversion of payment-sheet contact records into [`Address`] values.
//!
//! Mapping is a field-by-field copy. Nothing is trimmed, re-cased, or
//! validated; absent fields stay `None`. The only structural step is splitting
//! the street on newlines into `address1` and `address2`.

use crate::types::contact::legacy_keys;
use crate::types::{Address, AddressInput, Contact, LegacyAddressRecord};

/// Map any supported address payload into an [`Address`].
#[must_use]
#[allow(deprecated)]
pub fn address_from_input(input: &AddressInput) -> Address {
    match input {
        AddressInput::Contact(contact) => Address::from(contact),
        AddressInput::Legacy(record) => Address::from(record),
    }
}

impl From<&Contact> for Address {
    fn from(contact: &Contact) -> Self {
        let name = contact.name.as_ref();
        let postal = contact.postal_address.as_ref();
        let (address1, address2) = split_street(postal.and_then(|p| p.street.as_deref()));

        Self {
            first_name: name.and_then(|n| n.given_name.clone()),
            last_name: name.and_then(|n| n.family_name.clone()),
            company: None,
            address1,
            address2,
            city: postal.and_then(|p| p.city.clone()),
            province: postal.and_then(|p| p.state.clone()),
            province_code: None,
            zip: postal.and_then(|p| p.postal_code.clone()),
            country: postal.and_then(|p| p.country.clone()),
            country_code: postal.and_then(|p| p.iso_country_code.clone()),
            phone: contact.phone_number.clone(),
        }
    }
}

impl From<&LegacyAddressRecord> for Address {
    fn from(record: &LegacyAddressRecord) -> Self {
        let fields = record.addresses.first();
        let field = |key: &str| fields.and_then(|f| f.get(key)).cloned();
        let street = fields.and_then(|f| f.get(legacy_keys::STREET));
        let (address1, address2) = split_street(street.map(String::as_str));

        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            company: None,
            address1,
            address2,
            city: field(legacy_keys::CITY),
            province: field(legacy_keys::STATE),
            province_code: None,
            zip: field(legacy_keys::ZIP),
            country: field(legacy_keys::COUNTRY),
            country_code: field(legacy_keys::COUNTRY_CODE),
            phone: record.phone_numbers.first().cloned(),
        }
    }
}

/// Split a multi-line street into its first two non-blank lines.
fn split_street(street: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(street) = street else {
        return (None, None);
    };
    let mut lines = street.lines().filter(|line| !line.trim().is_empty());
    let first = lines.next().map(str::to_owned);
    let second = lines.next().map(str::to_owned);
    (first, second)
}
