//! Line-item synthesis: deep-copies the skeleton's single `InvoiceLine`
//! subtree once per billable line, fills it, and re-inserts the generated
//! set right after the monetary-total block so UBL element ordering holds.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::dom::Element;
use super::Namespaces;
use crate::core::amounts::{format_amount, PERCENT_DIGITS, PRICE_DIGITS, QUANTITY_DIGITS};
use crate::core::units::UNIT_PIECE;
use crate::core::{decimal_scale, EfaturaError, InvoiceLine};

/// Fallback item text for lines with no description and no product name.
const FALLBACK_ITEM_NAME: &str = "Ürün";

/// Derived per-line amounts, computed once and consumed by both the line
/// fill and the document-totals stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAmounts {
    /// 1-based position among billable lines.
    pub index: usize,
    /// Gross base: unit price × quantity.
    pub base: Decimal,
    /// Line net amount (subtotal after discount, before tax).
    pub net: Decimal,
    /// Line tax amount.
    pub tax: Decimal,
    /// Rate of the first applicable tax.
    pub percent: Decimal,
    /// Reconstructed discount, never negative.
    pub discount: Decimal,
}

impl LineAmounts {
    /// Reconstruct the line's derived amounts.
    ///
    /// The discount is the widest of the arithmetic difference
    /// (base − subtotal), the percentage discount, and the fixed per-unit
    /// discount, clamped at zero. The tax amount prefers the precomputed
    /// field and falls back to `total − subtotal`.
    pub fn compute(line: &InvoiceLine, index: usize) -> Self {
        let base = line.unit_price * line.quantity;
        let arithmetic = base - line.subtotal;
        let from_percent = line
            .discount_percent
            .map(|p| base * p / dec!(100))
            .unwrap_or_default();
        let from_fixed = line
            .discount_fixed
            .map(|f| f * line.quantity)
            .unwrap_or_default();
        let discount = arithmetic
            .max(from_percent)
            .max(from_fixed)
            .max(Decimal::ZERO);

        Self {
            index,
            base,
            net: line.subtotal,
            tax: line.tax_amount.unwrap_or(line.total - line.subtotal),
            percent: line.first_tax().map(|t| t.percent).unwrap_or_default(),
            discount,
        }
    }

    /// Discount-to-base ratio for `cbc:MultiplierFactorNumeric`.
    pub fn multiplier(&self) -> Decimal {
        if self.base.is_zero() {
            Decimal::ZERO
        } else {
            self.discount / self.base
        }
    }
}

/// Replace the skeleton's line set with one generated element per billable
/// line, inserted after `cac:LegalMonetaryTotal` in ascending order.
///
/// An invoice whose lines are all section/note markers yields a document
/// with zero `InvoiceLine` elements; rejecting that is the caller's
/// responsibility, not the synthesizer's.
pub(super) fn synthesize(
    ns: Namespaces,
    root: &mut Element,
    lines: &[&InvoiceLine],
    amounts: &[LineAmounts],
    currency: &str,
) -> Result<(), EfaturaError> {
    let template = root
        .find(&ns, "cac:InvoiceLine")
        .cloned()
        .ok_or_else(|| EfaturaError::Xml("skeleton has no InvoiceLine template".into()))?;
    root.remove_children(&ns, "cac:InvoiceLine");

    let anchor = root
        .position_of(&ns, "cac:LegalMonetaryTotal")
        .ok_or_else(|| EfaturaError::Xml("skeleton has no LegalMonetaryTotal block".into()))?;

    for (offset, (line, derived)) in lines.iter().zip(amounts).enumerate() {
        let mut element = template.clone();
        fill_line(ns, &mut element, line, derived, currency);
        root.insert_child(anchor + 1 + offset, element);
    }
    Ok(())
}

fn fill_line(
    ns: Namespaces,
    el: &mut Element,
    line: &InvoiceLine,
    derived: &LineAmounts,
    currency: &str,
) {
    let scale = decimal_scale(currency);

    set_text(ns, el, "cbc:ID", &derived.index.to_string());
    set_text(ns, el, "cbc:Note", line.display_name().unwrap_or(""));

    if let Some(qty) = el.find_mut(&ns, "cbc:InvoicedQuantity") {
        qty.set_text(&format_amount(line.quantity, QUANTITY_DIGITS));
        qty.set_attr("unitCode", line.unit_code.as_deref().unwrap_or(UNIT_PIECE));
    }

    set_amount(ns, el, "cbc:LineExtensionAmount", derived.net, scale, currency);

    // The allowance subtree is constructed fresh, not templated, and only
    // when there is an actual discount to report.
    if derived.discount > Decimal::ZERO {
        let allowance = build_allowance(derived, scale, currency);
        let at = el
            .position_of(&ns, "cbc:LineExtensionAmount")
            .map(|p| p + 1)
            .unwrap_or(el.children.len());
        el.insert_child(at, allowance);
    }

    set_amount(ns, el, "cac:TaxTotal/cbc:TaxAmount", derived.tax, scale, currency);
    set_amount(
        ns,
        el,
        "cac:TaxTotal/cac:TaxSubtotal/cbc:TaxableAmount",
        derived.net,
        scale,
        currency,
    );
    set_amount(
        ns,
        el,
        "cac:TaxTotal/cac:TaxSubtotal/cbc:TaxAmount",
        derived.tax,
        scale,
        currency,
    );
    set_text(
        ns,
        el,
        "cac:TaxTotal/cac:TaxSubtotal/cbc:CalculationSequenceNumeric",
        &derived.index.to_string(),
    );
    set_text(
        ns,
        el,
        "cac:TaxTotal/cac:TaxSubtotal/cbc:Percent",
        &format_amount(derived.percent, PERCENT_DIGITS),
    );

    // Exactly one tax-category block per line: the first applicable tax
    // wins, with the literal KDV fallback when none is recorded.
    let (tax_name, tax_code) = match line.first_tax() {
        Some(tax) => (tax.category_name(), tax.category_code()),
        None => ("KDV", "0015"),
    };
    set_text(
        ns,
        el,
        "cac:TaxTotal/cac:TaxSubtotal/cac:TaxCategory/cac:TaxScheme/cbc:Name",
        tax_name,
    );
    set_text(
        ns,
        el,
        "cac:TaxTotal/cac:TaxSubtotal/cac:TaxCategory/cac:TaxScheme/cbc:TaxTypeCode",
        tax_code,
    );

    let item_text = line.display_name().unwrap_or(FALLBACK_ITEM_NAME);
    set_text(ns, el, "cac:Item/cbc:Description", item_text);
    set_text(ns, el, "cac:Item/cbc:Name", item_text);

    set_amount(
        ns,
        el,
        "cac:Price/cbc:PriceAmount",
        line.unit_price,
        PRICE_DIGITS,
        currency,
    );
}

fn build_allowance(derived: &LineAmounts, scale: u32, currency: &str) -> Element {
    let mut allowance = Element::new("cac:AllowanceCharge");
    allowance.push_child(Element::with_text("cbc:ChargeIndicator", "false"));
    allowance.push_child(Element::with_text(
        "cbc:MultiplierFactorNumeric",
        format_amount(derived.multiplier(), QUANTITY_DIGITS),
    ));
    let mut amount = Element::with_text("cbc:Amount", format_amount(derived.discount, scale));
    amount.set_attr("currencyID", currency);
    allowance.push_child(amount);
    let mut base = Element::with_text("cbc:BaseAmount", format_amount(derived.base, scale));
    base.set_attr("currencyID", currency);
    allowance.push_child(base);
    allowance
}

fn set_text(ns: Namespaces, el: &mut Element, path: &str, value: &str) {
    if let Some(target) = el.find_mut(&ns, path) {
        target.set_text(value);
    }
}

fn set_amount(
    ns: Namespaces,
    el: &mut Element,
    path: &str,
    value: Decimal,
    digits: u32,
    currency: &str,
) {
    if let Some(target) = el.find_mut(&ns, path) {
        target.set_text(&format_amount(value, digits));
        target.set_attr("currencyID", currency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LineBuilder;
    use rust_decimal_macros::dec;

    #[test]
    fn discount_prefers_the_widest_source() {
        // Arithmetic difference 20, percentage 10% of 200 = 20, fixed 15.
        let line = LineBuilder::new(dec!(2), dec!(100))
            .discount_percent(dec!(10))
            .discount_fixed(dec!(7.5))
            .tax("KDV", "0015", dec!(20))
            .build();
        let derived = LineAmounts::compute(&line, 1);
        assert_eq!(derived.discount, dec!(20.00));
        assert_eq!(derived.net, dec!(180.00));
        assert_eq!(derived.multiplier(), dec!(0.1));
    }

    #[test]
    fn discount_never_negative() {
        // Subtotal larger than base (data drift) must clamp to zero.
        let line = LineBuilder::new(dec!(1), dec!(100))
            .amounts(dec!(120), dec!(24), dec!(144))
            .build();
        let derived = LineAmounts::compute(&line, 1);
        assert_eq!(derived.discount, Decimal::ZERO);
    }

    #[test]
    fn tax_falls_back_to_total_minus_subtotal() {
        let mut line = LineBuilder::new(dec!(1), dec!(100))
            .tax("KDV", "0015", dec!(20))
            .build();
        line.tax_amount = None;
        let derived = LineAmounts::compute(&line, 3);
        assert_eq!(derived.tax, dec!(20.00));
        assert_eq!(derived.index, 3);
    }

    #[test]
    fn zero_base_yields_zero_multiplier() {
        let line = LineBuilder::new(dec!(0), dec!(0)).build();
        let derived = LineAmounts::compute(&line, 1);
        assert_eq!(derived.multiplier(), Decimal::ZERO);
    }
}
