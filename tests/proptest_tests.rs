#![cfg(feature = "ubl")]

use efatura::core::amounts::format_amount;
use efatura::ubl::{Language, LineAmounts, amount_to_words};
use efatura::{InvoiceLine, LineBuilder, LineKind};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn line(quantity_cents: i64, price_cents: i64, subtotal_cents: i64) -> InvoiceLine {
    let mut line = LineBuilder::new(decimal(quantity_cents), decimal(price_cents)).build();
    line.kind = LineKind::Item;
    line.subtotal = decimal(subtotal_cents);
    line.total = line.subtotal;
    line.tax_amount = None;
    line
}

proptest! {
    /// The formatter always produces exactly the requested number of
    /// fractional digits.
    #[test]
    fn format_amount_has_fixed_scale(cents in -1_000_000_000i64..1_000_000_000, digits in 0u32..6) {
        let formatted = format_amount(decimal(cents), digits);
        if digits == 0 {
            prop_assert!(!formatted.contains('.'));
        } else {
            let (_, fraction) = formatted.split_once('.').expect("fraction expected");
            prop_assert_eq!(fraction.len(), digits as usize);
        }
    }

    /// Reconstructed discounts are never negative, whatever the record
    /// store delivered.
    #[test]
    fn line_discount_never_negative(
        qty in 0i64..100_000,
        price in 0i64..10_000_000,
        subtotal in 0i64..100_000_000,
    ) {
        let derived = LineAmounts::compute(&line(qty, price, subtotal), 1);
        prop_assert!(derived.discount >= Decimal::ZERO);
        prop_assert!(derived.multiplier() >= Decimal::ZERO);
    }

    /// Spelled-out amounts never come out empty and always carry the
    /// currency label.
    #[test]
    fn spelled_amounts_are_total(cents in 0i64..1_000_000_000_000) {
        let spelled = amount_to_words(decimal(cents), "TRY", Language::Turkish);
        prop_assert!(spelled.starts_with("YALNIZ : "));
        prop_assert!(spelled.contains(" TL"));
        let english = amount_to_words(decimal(cents), "TRY", Language::English);
        prop_assert!(english.starts_with("ONLY : "));
    }
}
