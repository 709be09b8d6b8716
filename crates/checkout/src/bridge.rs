//! Wallet payment-sheet bridge.
//!
//! Turns the three events a wallet payment sheet raises (shipping address
//! picked, shipping method picked, payment authorized) into checkout API
//! calls, and turns the results back into what the sheet can display: a
//! status code, shipping methods, and summary items.
//!
//! Failures never escape an event handler. They are kept in
//! [`WalletPayBridge::last_error`] and reported to the sheet as a status with
//! empty lists.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut bridge = WalletPayBridge::new(client, checkout);
//! bridge.prepare().await?;
//!
//! let update = bridge.shipping_address_selected(&AddressInput::Contact(contact)).await;
//! sheet.show(update.status, update.shipping_methods, update.summary_items);
//!
//! let status = bridge.payment_authorized(&payment).await;
//! ```

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use wallet_checkout_core::{
    Address, AddressInput, AuthorizationStatus, AuthorizedPayment, Checkout, CheckoutToken,
    ShippingMethod, ShippingRate, Shop, SummaryItem, address_from_input,
};

use crate::client::{CheckoutClient, CheckoutUpdate};

/// Why the most recent bridge operation failed.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The checkout service returned an error.
    #[error("Remote operation failed: {0}")]
    Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The address lacks the fields needed to quote shipping.
    #[error("Shipping address is incomplete")]
    IncompleteShippingAddress,

    /// The shop does not ship to the address's country.
    #[error("Shop does not ship to {0}")]
    UnsupportedCountry(String),

    /// The service quoted no shipping rates for the address.
    #[error("No shipping rates available for the shipping address")]
    NoShippingRates,

    /// The selected method does not match any quoted rate.
    #[error("Unknown shipping method: {0}")]
    UnknownShippingMethod(String),

    /// The service accepted the payment request but did not complete the checkout.
    #[error("Checkout {0} was not completed")]
    CheckoutNotCompleted(CheckoutToken),
}

impl BridgeError {
    fn remote<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Remote(Box::new(error))
    }

    /// Whether the failure came from the checkout service.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Status reported to the payment sheet for this failure.
    #[must_use]
    pub const fn sheet_status(&self) -> AuthorizationStatus {
        match self {
            Self::IncompleteShippingAddress
            | Self::UnsupportedCountry(_)
            | Self::NoShippingRates => AuthorizationStatus::InvalidShippingPostalAddress,
            Self::Remote(_) | Self::UnknownShippingMethod(_) | Self::CheckoutNotCompleted(_) => {
                AuthorizationStatus::Failure
            }
        }
    }
}

/// What the payment sheet should display after a shipping event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetUpdate {
    pub status: AuthorizationStatus,
    /// Shipping methods in server order.
    pub shipping_methods: Vec<ShippingMethod>,
    /// Order summary; the last item is the total.
    pub summary_items: Vec<SummaryItem>,
}

impl SheetUpdate {
    fn rejected(status: AuthorizationStatus) -> Self {
        Self {
            status,
            shipping_methods: Vec::new(),
            summary_items: Vec::new(),
        }
    }
}

// =============================================================================
// WalletPayBridge
// =============================================================================

/// Relays payment-sheet events for one checkout to a [`CheckoutClient`].
///
/// Every event handler takes `&mut self`: one bridge serves one sheet, and
/// the sheet never raises a new event before the previous one has been
/// answered.
pub struct WalletPayBridge<C> {
    client: C,
    checkout: Checkout,
    shop: Option<Shop>,
    shipping_rates: Vec<ShippingRate>,
    last_error: Option<BridgeError>,
}

impl<C: CheckoutClient> WalletPayBridge<C> {
    /// Create a bridge that fetches shop metadata on first use.
    #[must_use]
    pub const fn new(client: C, checkout: Checkout) -> Self {
        Self {
            client,
            checkout,
            shop: None,
            shipping_rates: Vec::new(),
            last_error: None,
        }
    }

    /// Create a bridge with shop metadata the caller already has.
    #[must_use]
    pub const fn with_shop(client: C, checkout: Checkout, shop: Shop) -> Self {
        Self {
            client,
            checkout,
            shop: Some(shop),
            shipping_rates: Vec::new(),
            last_error: None,
        }
    }

    /// Whether shop metadata is available.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.shop.is_some()
    }

    /// Fetch shop metadata if it is not loaded yet.
    ///
    /// Event handlers call this themselves; calling it up front only moves
    /// the fetch earlier. A failed fetch leaves the bridge unprepared, so the
    /// next call tries again.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Remote`] if the shop cannot be fetched.
    #[instrument(skip(self), fields(checkout = %self.checkout.token))]
    pub async fn prepare(&mut self) -> Result<&Shop, BridgeError> {
        let shop = match self.shop.take() {
            Some(shop) => shop,
            None => {
                debug!("Fetching shop metadata");
                self.client.fetch_shop().await.map_err(BridgeError::remote)?
            }
        };
        Ok(self.shop.insert(shop))
    }

    // =========================================================================
    // Payment-sheet events
    // =========================================================================

    /// The buyer authorized the payment.
    ///
    /// Copies the authorized contacts onto the checkout, then completes it
    /// with the payment token. Returns `Success` only when the service reports
    /// the checkout as completed.
    #[instrument(skip(self, payment), fields(checkout = %self.checkout.token))]
    pub async fn payment_authorized(
        &mut self,
        payment: &AuthorizedPayment,
    ) -> AuthorizationStatus {
        self.last_error = None;

        match self.complete_with_payment(payment).await {
            Ok(()) => {
                debug!("Checkout completed");
                AuthorizationStatus::Success
            }
            Err(error) => self.record(error),
        }
    }

    /// The buyer picked a different shipping method.
    ///
    /// On success the returned methods are the service's current rate list,
    /// which is authoritative over what the sheet showed before.
    #[instrument(
        skip(self, method),
        fields(checkout = %self.checkout.token, method = %method.identifier)
    )]
    pub async fn shipping_method_selected(&mut self, method: &ShippingMethod) -> SheetUpdate {
        self.last_error = None;

        match self.select_shipping_method(method).await {
            Ok(update) => update,
            Err(error) => SheetUpdate::rejected(self.record(error)),
        }
    }

    /// The buyer picked a shipping address or contact.
    ///
    /// Sends the mapped address, quotes rates for it, and selects the first
    /// rate so the summary includes shipping.
    #[instrument(skip(self, input), fields(checkout = %self.checkout.token))]
    pub async fn shipping_address_selected(&mut self, input: &AddressInput) -> SheetUpdate {
        self.last_error = None;

        match self.select_shipping_address(input).await {
            Ok(update) => update,
            Err(error) => {
                // The address was accepted, so the summary still reflects it
                let summary_items = match (&error, &self.shop) {
                    (BridgeError::NoShippingRates, Some(shop)) => {
                        self.checkout.summary_items(&shop.name)
                    }
                    _ => Vec::new(),
                };
                SheetUpdate {
                    summary_items,
                    ..SheetUpdate::rejected(self.record(error))
                }
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The checkout as last returned by the service.
    #[must_use]
    pub const fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Consume the bridge and return the checkout.
    #[must_use]
    pub fn into_checkout(self) -> Checkout {
        self.checkout
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    #[must_use]
    pub const fn shop(&self) -> Option<&Shop> {
        self.shop.as_ref()
    }

    /// Rates quoted for the current shipping address.
    #[must_use]
    pub fn shipping_rates(&self) -> &[ShippingRate] {
        &self.shipping_rates
    }

    /// Failure of the most recent operation, if it failed.
    #[must_use]
    pub const fn last_error(&self) -> Option<&BridgeError> {
        self.last_error.as_ref()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn record(&mut self, error: BridgeError) -> AuthorizationStatus {
        let status = error.sheet_status();
        warn!(error = %error, status = ?status, "Payment sheet event failed");
        self.last_error = Some(error);
        status
    }

    async fn shop_name(&mut self) -> Result<String, BridgeError> {
        Ok(self.prepare().await?.name.clone())
    }

    async fn complete_with_payment(
        &mut self,
        payment: &AuthorizedPayment,
    ) -> Result<(), BridgeError> {
        self.prepare().await?;

        let update = self.payment_update(payment);
        if !update.is_empty() {
            self.checkout = self
                .client
                .update_checkout(&self.checkout.token, update)
                .await
                .map_err(BridgeError::remote)?;
        }

        let completed = self
            .client
            .complete_checkout(&self.checkout.token, &payment.token)
            .await
            .map_err(BridgeError::remote)?;
        let is_completed = completed.is_completed();
        self.checkout = completed;

        if is_completed {
            Ok(())
        } else {
            Err(BridgeError::CheckoutNotCompleted(self.checkout.token.clone()))
        }
    }

    /// Checkout fields carried by an authorized payment.
    fn payment_update(&self, payment: &AuthorizedPayment) -> CheckoutUpdate {
        let shipping = payment.shipping_contact.as_ref();
        let billing = payment.billing_contact.as_ref();

        let email = shipping
            .and_then(|c| c.email_address.clone())
            .or_else(|| billing.and_then(|c| c.email_address.clone()));

        let shipping_address = shipping
            .filter(|_| self.checkout.requires_shipping)
            .map(Address::from);

        let authorized_rate = payment
            .shipping_method
            .as_ref()
            .and_then(|m| self.find_rate(&m.identifier))
            .map(|rate| rate.id.clone());
        let selected_rate = self.checkout.shipping_rate.as_ref().map(|r| r.id.clone());

        // A new shipping address clears the server's shipping line, so the
        // rate has to ride along with it.
        let shipping_rate_id = if shipping_address.is_some() {
            authorized_rate.or(selected_rate)
        } else {
            authorized_rate.filter(|id| Some(id) != selected_rate.as_ref())
        };

        CheckoutUpdate {
            email,
            shipping_address,
            billing_address: billing.map(Address::from),
            shipping_rate_id,
            partial_addresses: None,
        }
    }

    async fn select_shipping_method(
        &mut self,
        method: &ShippingMethod,
    ) -> Result<SheetUpdate, BridgeError> {
        let shop_name = self.shop_name().await?;

        if self.shipping_rates.is_empty() {
            self.shipping_rates = self
                .client
                .shipping_rates(&self.checkout.token)
                .await
                .map_err(BridgeError::remote)?;
        }

        let rate_id = self
            .find_rate(&method.identifier)
            .map(|rate| rate.id.clone())
            .ok_or_else(|| BridgeError::UnknownShippingMethod(method.identifier.clone()))?;

        self.checkout = self
            .client
            .update_shipping_line(&self.checkout.token, &rate_id)
            .await
            .map_err(BridgeError::remote)?;

        self.shipping_rates = self
            .client
            .shipping_rates(&self.checkout.token)
            .await
            .map_err(BridgeError::remote)?;

        Ok(self.sheet_update(&shop_name))
    }

    async fn select_shipping_address(
        &mut self,
        input: &AddressInput,
    ) -> Result<SheetUpdate, BridgeError> {
        let shop_name = self.shop_name().await?;

        let address = address_from_input(input);
        if !address.is_valid_for_shipping_rates() {
            return Err(BridgeError::IncompleteShippingAddress);
        }
        if let (Some(shop), Some(code)) = (&self.shop, address.country_code.as_deref())
            && !shop.ships_to_countries.is_empty()
            && !shop.ships_to(code)
        {
            return Err(BridgeError::UnsupportedCountry(code.to_string()));
        }

        self.checkout = self
            .client
            .update_shipping_address(&self.checkout.token, &address)
            .await
            .map_err(BridgeError::remote)?;
        self.shipping_rates.clear();

        self.shipping_rates = self
            .client
            .shipping_rates(&self.checkout.token)
            .await
            .map_err(BridgeError::remote)?;

        let first_rate = self
            .shipping_rates
            .first()
            .map(|rate| rate.id.clone())
            .ok_or(BridgeError::NoShippingRates)?;

        self.checkout = self
            .client
            .update_shipping_line(&self.checkout.token, &first_rate)
            .await
            .map_err(BridgeError::remote)?;

        Ok(self.sheet_update(&shop_name))
    }

    fn find_rate(&self, identifier: &str) -> Option<&ShippingRate> {
        self.shipping_rates
            .iter()
            .find(|rate| rate.id.as_str() == identifier)
    }

    fn sheet_update(&self, shop_name: &str) -> SheetUpdate {
        SheetUpdate {
            status: AuthorizationStatus::Success,
            shipping_methods: ShippingMethod::from_rates(&self.shipping_rates, Utc::now()),
            summary_items: self.checkout.summary_items(shop_name),
        }
    }
}
