//! Conversion of checkout snapshots into payment-sheet artifacts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{Checkout, ShippingMethod, ShippingRate, SummaryItem};

impl Checkout {
    /// Order summary lines for the payment sheet.
    ///
    /// The final line is the grand total, labelled with the shop name and
    /// carrying the payment due.
    #[must_use]
    pub fn summary_items(&self, shop_name: &str) -> Vec<SummaryItem> {
        let mut items = Vec::new();
        let has_discount = self.has_applicable_discount();

        if self.line_items.len() > 1 || has_discount {
            items.push(SummaryItem::new("CART TOTAL", self.line_items_subtotal()));
        }

        if has_discount && let Some(discount) = &self.discount {
            let label = match discount.code.as_deref() {
                Some(code) if !code.is_empty() => format!("DISCOUNT ({code})"),
                _ => "DISCOUNT".to_string(),
            };
            items.push(SummaryItem::new(label, -discount.amount));
        }

        items.push(SummaryItem::new(
            "SUBTOTAL",
            self.subtotal_price.unwrap_or(Decimal::ZERO),
        ));

        if let Some(rate) = &self.shipping_rate
            && rate.price > Decimal::ZERO
        {
            items.push(SummaryItem::new("SHIPPING", rate.price));
        }

        if let Some(tax) = self.total_tax
            && tax > Decimal::ZERO
        {
            items.push(SummaryItem::new("TAXES", tax));
        }

        for card in &self.gift_cards {
            let amount = card.amount_used.or(card.balance).unwrap_or(Decimal::ZERO);
            items.push(SummaryItem::new(
                format!("GIFT CARD (•••• {})", card.last_characters),
                -amount,
            ));
        }

        items.push(SummaryItem::new(
            shop_name,
            self.payment_due.unwrap_or(Decimal::ZERO),
        ));

        items
    }
}

impl ShippingMethod {
    /// Build the sheet representation of a shipping rate.
    ///
    /// `now` anchors the delivery estimate ("3 days", "2-5 days").
    #[must_use]
    pub fn from_rate(rate: &ShippingRate, now: DateTime<Utc>) -> Self {
        Self {
            identifier: rate.id.to_string(),
            label: rate.title.clone(),
            amount: rate.price,
            detail: delivery_detail(rate.delivery_range.as_deref(), now),
        }
    }

    /// Convert a list of rates, preserving order.
    #[must_use]
    pub fn from_rates(rates: &[ShippingRate], now: DateTime<Utc>) -> Vec<Self> {
        rates.iter().map(|rate| Self::from_rate(rate, now)).collect()
    }
}

fn delivery_detail(range: Option<&[DateTime<Utc>]>, now: DateTime<Utc>) -> String {
    let days_until = |date: &DateTime<Utc>| (*date - now).num_days().max(0);

    match range {
        Some([only]) => format_days(days_until(only)),
        Some([first, .., last]) => {
            let (first, last) = (days_until(first), days_until(last));
            if first == last {
                format_days(first)
            } else {
                format!("{first}-{last} days")
            }
        }
        _ => String::new(),
    }
}

fn format_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::{CheckoutToken, Discount, GiftCard, LineItem, ShippingRateId};

    fn line(variant_id: i64, cents: i64) -> LineItem {
        LineItem {
            id: None,
            variant_id,
            title: format!("Variant {variant_id}"),
            quantity: 1,
            price: Decimal::new(cents, 2),
            line_price: Decimal::new(cents, 2),
        }
    }

    fn rate(price_cents: i64, range: Option<Vec<DateTime<Utc>>>) -> ShippingRate {
        ShippingRate {
            id: ShippingRateId::new("canada_post-DOM.RP"),
            title: "Regular Parcel".to_string(),
            price: Decimal::new(price_cents, 2),
            delivery_range: range,
        }
    }

    fn labels(items: &[SummaryItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_single_item_summary() {
        let mut checkout = Checkout::new(CheckoutToken::new("t"));
        checkout.line_items.push(line(1, 1000));
        checkout.subtotal_price = Some(Decimal::new(1000, 2));
        checkout.payment_due = Some(Decimal::new(1000, 2));

        let items = checkout.summary_items("Naked Pineapple");
        assert_eq!(labels(&items), vec!["SUBTOTAL", "Naked Pineapple"]);
        assert_eq!(items.last().unwrap().amount, Decimal::new(1000, 2));
    }

    #[test]
    fn test_full_summary_order_and_signs() {
        let mut checkout = Checkout::new(CheckoutToken::new("t"));
        checkout.line_items = vec![line(1, 1000), line(2, 500)];
        checkout.discount = Some(Discount {
            code: Some("WELCOME".to_string()),
            amount: Decimal::new(200, 2),
            applicable: true,
        });
        checkout.subtotal_price = Some(Decimal::new(1300, 2));
        checkout.shipping_rate = Some(rate(499, None));
        checkout.total_tax = Some(Decimal::new(169, 2));
        checkout.gift_cards = vec![GiftCard {
            id: Some(7),
            last_characters: "4fe1".to_string(),
            amount_used: Some(Decimal::new(500, 2)),
            balance: Some(Decimal::new(2500, 2)),
        }];
        checkout.payment_due = Some(Decimal::new(1468, 2));

        let items = checkout.summary_items("Naked Pineapple");
        assert_eq!(
            labels(&items),
            vec![
                "CART TOTAL",
                "DISCOUNT (WELCOME)",
                "SUBTOTAL",
                "SHIPPING",
                "TAXES",
                "GIFT CARD (•••• 4fe1)",
                "Naked Pineapple",
            ]
        );
        assert_eq!(items[0].amount, Decimal::new(1500, 2));
        assert_eq!(items[1].amount, Decimal::new(-200, 2));
        assert_eq!(items[5].amount, Decimal::new(-500, 2));
        assert_eq!(items[6].amount, Decimal::new(1468, 2));
    }

    #[test]
    fn test_free_shipping_and_zero_tax_omitted() {
        let mut checkout = Checkout::new(CheckoutToken::new("t"));
        checkout.shipping_rate = Some(rate(0, None));
        checkout.total_tax = Some(Decimal::ZERO);

        let items = checkout.summary_items("Shop");
        assert_eq!(labels(&items), vec!["SUBTOTAL", "Shop"]);
        assert_eq!(items[0].amount, Decimal::ZERO);
        assert_eq!(items[1].amount, Decimal::ZERO);
    }

    #[test]
    fn test_discount_without_code() {
        let mut checkout = Checkout::new(CheckoutToken::new("t"));
        checkout.line_items.push(line(1, 1000));
        checkout.discount = Some(Discount {
            code: None,
            amount: Decimal::new(100, 2),
            applicable: true,
        });

        let items = checkout.summary_items("Shop");
        assert_eq!(labels(&items), vec!["CART TOTAL", "DISCOUNT", "SUBTOTAL", "Shop"]);
    }

    #[test]
    fn test_gift_card_falls_back_to_balance() {
        let mut checkout = Checkout::new(CheckoutToken::new("t"));
        checkout.gift_cards.push(GiftCard {
            id: None,
            last_characters: "0000".to_string(),
            amount_used: None,
            balance: Some(Decimal::new(300, 2)),
        });
        let items = checkout.summary_items("Shop");
        assert_eq!(items[1].amount, Decimal::new(-300, 2));
    }

    #[test]
    fn test_shipping_method_from_rate() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let range = vec![
            Utc.with_ymd_and_hms(2026, 10, 21, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 24, 12, 0, 0).unwrap(),
        ];

        let method = ShippingMethod::from_rate(&rate(1000, Some(range)), now);
        assert_eq!(method.identifier, "canada_post-DOM.RP");
        assert_eq!(method.label, "Regular Parcel");
        assert_eq!(method.amount, Decimal::new(1000, 2));
        assert_eq!(method.detail, "2-5 days");
    }

    #[test]
    fn test_delivery_detail_variants() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        let tomorrow = Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap();

        assert_eq!(delivery_detail(None, now), "");
        assert_eq!(delivery_detail(Some(&[]), now), "");
        assert_eq!(delivery_detail(Some(&[tomorrow]), now), "1 day");
        assert_eq!(delivery_detail(Some(&[tomorrow, tomorrow]), now), "1 day");
        // Dates in the past clamp to zero.
        assert_eq!(delivery_detail(Some(&[now - chrono::Duration::days(3)]), now), "0 days");
    }

    #[test]
    fn test_from_rates_preserves_order() {
        let now = Utc::now();
        let mut express = rate(2000, None);
        express.id = ShippingRateId::new("express");
        let methods = ShippingMethod::from_rates(&[rate(500, None), express], now);
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[1].identifier, "express");
    }
}
