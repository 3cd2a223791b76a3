//! Document-level tax and monetary totals.
//!
//! The aggregates are the invoice's already-rounded amounts; the allowance
//! total reuses the per-line discount values computed by the synthesizer
//! instead of re-deriving them. The document tax subtotal reports the
//! first billable line's tax metadata — multi-rate invoices carry only the
//! first rate's label here.

use rust_decimal::Decimal;

use super::dom::Element;
use super::lines::LineAmounts;
use super::mapper::FieldMapper;
use crate::core::amounts::{format_amount, PERCENT_DIGITS};
use crate::core::{decimal_scale, Invoice, InvoiceLine};

pub(super) fn recalculate(
    fields: &mut FieldMapper,
    root: &mut Element,
    invoice: &Invoice,
    amounts: &[LineAmounts],
    first_line: Option<&InvoiceLine>,
) {
    let currency = invoice.currency_code.as_str();
    let scale = decimal_scale(currency);

    fields.set_amount(root, "cac:TaxTotal/cbc:TaxAmount", invoice.tax, scale, currency);
    fields.set_amount(
        root,
        "cac:TaxTotal/cac:TaxSubtotal/cbc:TaxableAmount",
        invoice.untaxed,
        scale,
        currency,
    );
    fields.set_amount(
        root,
        "cac:TaxTotal/cac:TaxSubtotal/cbc:TaxAmount",
        invoice.tax,
        scale,
        currency,
    );

    let first_tax = first_line.and_then(|l| l.first_tax());
    let percent = first_tax.map(|t| t.percent).unwrap_or_default();
    let (name, code) = match first_tax {
        Some(tax) => (tax.category_name(), tax.category_code()),
        None => ("KDV", "0015"),
    };
    fields.set_text(
        root,
        "cac:TaxTotal/cac:TaxSubtotal/cbc:Percent",
        &format_amount(percent, PERCENT_DIGITS),
    );
    fields.set_text(
        root,
        "cac:TaxTotal/cac:TaxSubtotal/cac:TaxCategory/cac:TaxScheme/cbc:Name",
        name,
    );
    fields.set_text(
        root,
        "cac:TaxTotal/cac:TaxSubtotal/cac:TaxCategory/cac:TaxScheme/cbc:TaxTypeCode",
        code,
    );

    let allowance_total: Decimal = amounts.iter().map(|a| a.discount).sum();

    fields.set_amount(
        root,
        "cac:LegalMonetaryTotal/cbc:LineExtensionAmount",
        invoice.untaxed,
        scale,
        currency,
    );
    fields.set_amount(
        root,
        "cac:LegalMonetaryTotal/cbc:TaxExclusiveAmount",
        invoice.untaxed,
        scale,
        currency,
    );
    fields.set_amount(
        root,
        "cac:LegalMonetaryTotal/cbc:TaxInclusiveAmount",
        invoice.total,
        scale,
        currency,
    );
    fields.set_amount(
        root,
        "cac:LegalMonetaryTotal/cbc:AllowanceTotalAmount",
        allowance_total,
        scale,
        currency,
    );
    fields.set_amount(
        root,
        "cac:LegalMonetaryTotal/cbc:PayableAmount",
        invoice.total,
        scale,
        currency,
    );
}
