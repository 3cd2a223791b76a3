use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ValidationError;
use super::types::*;

/// Validate an invoice before e-document generation.
/// Returns all validation errors found (not just the first).
///
/// The UBL generator assumes a validated aggregate and does not repeat
/// these checks; callers must gate generation on an empty result.
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Profile type and invoice type code are mandatory for documents
    // issued to a customer.
    if invoice.move_type.is_customer_facing() {
        if invoice.profile.is_none() {
            errors.push(ValidationError::new(
                "profile",
                "profile type is required for customer invoices",
            ));
        }
        if invoice.type_kind.is_none() {
            errors.push(ValidationError::new(
                "type_kind",
                "invoice type code is required for customer invoices",
            ));
        }
        if invoice.eligible_lines().next().is_none() {
            errors.push(ValidationError::new(
                "lines",
                "invoice must have at least one billable line",
            ));
        }
    }

    if invoice.currency_code.len() != 3 {
        errors.push(ValidationError::new(
            "currency_code",
            "currency code must be 3 characters (ISO 4217)",
        ));
    } else if !super::currencies::is_known_currency_code(&invoice.currency_code) {
        errors.push(ValidationError::new(
            "currency_code",
            format!(
                "currency code '{}' is not a known ISO 4217 code",
                invoice.currency_code
            ),
        ));
    }

    validate_party(&invoice.supplier, "supplier", &mut errors);
    validate_party(&invoice.customer, "customer", &mut errors);

    for (i, line) in invoice.lines.iter().enumerate() {
        validate_line(line, i, &mut errors);
    }

    errors
}

fn validate_party(party: &Party, field: &str, errors: &mut Vec<ValidationError>) {
    if party.name.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{field}.name"),
            "party name must not be empty",
        ));
    }
    if party.address.city.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{field}.address.city"),
            "city must not be empty",
        ));
    }
    if let Some(tax_id) = &party.tax_id {
        let expected = if party.is_company { 10 } else { 11 };
        if tax_id.len() != expected || !tax_id.chars().all(|c| c.is_ascii_digit()) {
            let scheme = party.id_scheme();
            errors.push(ValidationError::new(
                format!("{field}.tax_id"),
                format!("{scheme} must be {expected} digits"),
            ));
        }
    }
}

fn validate_line(line: &InvoiceLine, index: usize, errors: &mut Vec<ValidationError>) {
    if line.kind != LineKind::Item {
        return;
    }
    if let Some(pct) = line.discount_percent {
        if pct < Decimal::ZERO || pct > dec!(100) {
            errors.push(ValidationError::new(
                format!("lines[{index}].discount_percent"),
                "discount percentage must be between 0 and 100",
            ));
        }
    }
    for (t, tax) in line.taxes.iter().enumerate() {
        if tax.percent < Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("lines[{index}].taxes[{t}].percent"),
                "tax rate must not be negative",
            ));
        }
    }
    if let Some(unit) = &line.unit_code {
        if !super::units::is_known_unit_code(unit) {
            errors.push(ValidationError::new(
                format!("lines[{index}].unit_code"),
                format!("'{unit}' is not a known UN/CEFACT unit code"),
            ));
        }
    }
}
