use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::currencies::decimal_scale;
use super::error::EfaturaError;
use super::types::*;
use super::validation;

/// Builder for constructing validated invoice aggregates.
///
/// ```
/// use efatura::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = InvoiceBuilder::new("INV/001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .profile(ProfileType::TicariFatura)
///     .type_kind(InvoiceTypeKind::Satis)
///     .supplier(PartyBuilder::new("ACME A.Ş.", AddressBuilder::new("İstanbul", "Türkiye").build())
///         .tax_id("1234567890", true)
///         .build())
///     .customer(PartyBuilder::new("Müşteri Ltd.", AddressBuilder::new("Ankara", "Türkiye").build())
///         .build())
///     .add_line(LineBuilder::new(dec!(2), dec!(100))
///         .description("Danışmanlık")
///         .tax("KDV", "0015", dec!(20))
///         .build())
///     .build()
///     .unwrap();
/// ```
pub struct InvoiceBuilder {
    number: String,
    move_type: MoveType,
    profile: Option<ProfileType>,
    type_kind: Option<InvoiceTypeKind>,
    issue_date: NaiveDate,
    origin_reference: Option<String>,
    note: Option<String>,
    currency_code: String,
    supplier: Option<Party>,
    customer: Option<Party>,
    lines: Vec<InvoiceLine>,
    totals: Option<(Decimal, Decimal, Decimal)>,
}

impl InvoiceBuilder {
    pub fn new(number: impl Into<String>, issue_date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            move_type: MoveType::OutInvoice,
            profile: None,
            type_kind: None,
            issue_date,
            origin_reference: None,
            note: None,
            currency_code: "TRY".to_string(),
            supplier: None,
            customer: None,
            lines: Vec::new(),
            totals: None,
        }
    }

    pub fn move_type(mut self, move_type: MoveType) -> Self {
        self.move_type = move_type;
        self
    }

    pub fn profile(mut self, profile: ProfileType) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn type_kind(mut self, kind: InvoiceTypeKind) -> Self {
        self.type_kind = Some(kind);
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    pub fn origin_reference(mut self, reference: impl Into<String>) -> Self {
        self.origin_reference = Some(reference.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn supplier(mut self, party: Party) -> Self {
        self.supplier = Some(party);
        self
    }

    pub fn customer(mut self, party: Party) -> Self {
        self.customer = Some(party);
        self
    }

    pub fn add_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Override the derived aggregates with record-store values.
    pub fn totals(mut self, untaxed: Decimal, tax: Decimal, total: Decimal) -> Self {
        self.totals = Some((untaxed, tax, total));
        self
    }

    /// Build and validate the invoice. Aggregate amounts are derived from
    /// the billable lines unless explicitly overridden via [`totals`].
    ///
    /// [`totals`]: Self::totals
    pub fn build(self) -> Result<Invoice, EfaturaError> {
        let supplier = self
            .supplier
            .ok_or_else(|| EfaturaError::Validation("supplier party is required".into()))?;
        let customer = self
            .customer
            .ok_or_else(|| EfaturaError::Validation("customer party is required".into()))?;

        let scale = decimal_scale(&self.currency_code);
        let (untaxed, tax, total) = match self.totals {
            Some(t) => t,
            None => {
                let mut untaxed = Decimal::ZERO;
                let mut tax = Decimal::ZERO;
                for line in self.lines.iter().filter(|l| l.kind == LineKind::Item) {
                    untaxed += line.subtotal;
                    tax += line.tax_amount.unwrap_or(line.total - line.subtotal);
                }
                let untaxed = round(untaxed, scale);
                let tax = round(tax, scale);
                (untaxed, tax, untaxed + tax)
            }
        };

        let invoice = Invoice {
            number: self.number,
            move_type: self.move_type,
            profile: self.profile,
            type_kind: self.type_kind,
            issue_date: self.issue_date,
            origin_reference: self.origin_reference,
            note: self.note,
            currency_code: self.currency_code,
            untaxed,
            tax,
            total,
            supplier,
            customer,
            lines: self.lines,
        };

        let errors = validation::validate_invoice(&invoice);
        if errors.is_empty() {
            Ok(invoice)
        } else {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(EfaturaError::Validation(joined))
        }
    }
}

/// Builder for [`Party`].
pub struct PartyBuilder {
    party: Party,
}

impl PartyBuilder {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            party: Party {
                name: name.into(),
                tax_id: None,
                is_company: true,
                tax_office: None,
                address,
                contact: Contact::default(),
                website: None,
            },
        }
    }

    /// Tax identifier plus the company discriminator: VKN for companies,
    /// TCKN for individuals.
    pub fn tax_id(mut self, tax_id: impl Into<String>, is_company: bool) -> Self {
        self.party.tax_id = Some(tax_id.into());
        self.party.is_company = is_company;
        self
    }

    pub fn tax_office(mut self, office: impl Into<String>) -> Self {
        self.party.tax_office = Some(office.into());
        self
    }

    pub fn website(mut self, uri: impl Into<String>) -> Self {
        self.party.website = Some(uri.into());
        self
    }

    pub fn contact(
        mut self,
        phone: Option<String>,
        mobile: Option<String>,
        email: Option<String>,
    ) -> Self {
        self.party.contact = Contact {
            phone,
            mobile,
            email,
        };
        self
    }

    pub fn build(self) -> Party {
        self.party
    }
}

/// Builder for [`Address`].
pub struct AddressBuilder {
    address: Address,
}

impl AddressBuilder {
    pub fn new(city: impl Into<String>, country_name: impl Into<String>) -> Self {
        Self {
            address: Address {
                city: city.into(),
                country_name: country_name.into(),
                ..Address::default()
            },
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.address.street = Some(street.into());
        self
    }

    pub fn building_number(mut self, number: impl Into<String>) -> Self {
        self.address.building_number = Some(number.into());
        self
    }

    pub fn subdivision(mut self, subdivision: impl Into<String>) -> Self {
        self.address.subdivision = Some(subdivision.into());
        self
    }

    pub fn postal_code(mut self, code: impl Into<String>) -> Self {
        self.address.postal_code = Some(code.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.address.region = Some(region.into());
        self
    }

    pub fn build(self) -> Address {
        self.address
    }
}

/// Builder for [`InvoiceLine`].
///
/// Derives `subtotal`, `tax_amount` and `total` from quantity, unit price,
/// discounts, and tax rates; explicit record-store amounts can be set via
/// [`amounts`](Self::amounts).
pub struct LineBuilder {
    line: InvoiceLine,
    explicit_amounts: bool,
}

impl LineBuilder {
    pub fn new(quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            line: InvoiceLine {
                kind: LineKind::Item,
                description: None,
                product_name: None,
                quantity,
                unit_code: None,
                unit_price,
                subtotal: Decimal::ZERO,
                total: Decimal::ZERO,
                tax_amount: None,
                discount_percent: None,
                discount_fixed: None,
                taxes: Vec::new(),
            },
            explicit_amounts: false,
        }
    }

    /// A section or note marker row; never rendered as an `InvoiceLine`.
    pub fn marker(kind: LineKind, text: impl Into<String>) -> InvoiceLine {
        InvoiceLine {
            kind,
            description: Some(text.into()),
            product_name: None,
            quantity: Decimal::ZERO,
            unit_code: None,
            unit_price: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            total: Decimal::ZERO,
            tax_amount: None,
            discount_percent: None,
            discount_fixed: None,
            taxes: Vec::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.line.description = Some(text.into());
        self
    }

    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.line.product_name = Some(name.into());
        self
    }

    pub fn unit_code(mut self, code: impl Into<String>) -> Self {
        self.line.unit_code = Some(code.into());
        self
    }

    pub fn tax(mut self, name: impl Into<String>, code: impl Into<String>, percent: Decimal) -> Self {
        self.line.taxes.push(TaxDetail {
            name: Some(name.into()),
            code: Some(code.into()),
            percent,
            group: None,
        });
        self
    }

    pub fn add_tax(mut self, tax: TaxDetail) -> Self {
        self.line.taxes.push(tax);
        self
    }

    pub fn discount_percent(mut self, percent: Decimal) -> Self {
        self.line.discount_percent = Some(percent);
        self
    }

    pub fn discount_fixed(mut self, per_unit: Decimal) -> Self {
        self.line.discount_fixed = Some(per_unit);
        self
    }

    /// Set the already-rounded record-store amounts directly.
    pub fn amounts(mut self, subtotal: Decimal, tax: Decimal, total: Decimal) -> Self {
        self.line.subtotal = subtotal;
        self.line.tax_amount = Some(tax);
        self.line.total = total;
        self.explicit_amounts = true;
        self
    }

    pub fn build(mut self) -> InvoiceLine {
        if !self.explicit_amounts {
            let base = self.line.quantity * self.line.unit_price;
            let pct_discount = self
                .line
                .discount_percent
                .map(|p| base * p / dec!(100))
                .unwrap_or_default();
            let fixed_discount = self
                .line
                .discount_fixed
                .map(|f| f * self.line.quantity)
                .unwrap_or_default();
            let discount = pct_discount.max(fixed_discount).max(Decimal::ZERO);
            let subtotal = round(base - discount, 2);
            let tax: Decimal = self
                .line
                .taxes
                .iter()
                .map(|t| subtotal * t.percent / dec!(100))
                .sum();
            let tax = round(tax, 2);
            self.line.subtotal = subtotal;
            self.line.tax_amount = Some(tax);
            self.line.total = subtotal + tax;
        }
        self.line
    }
}

fn round(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}
