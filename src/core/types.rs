use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GİB profile types (`cbc:ProfileID`) governing downstream processing by
/// the tax authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileType {
    /// TICARIFATURA — commercial invoice (acceptance/rejection flow).
    TicariFatura,
    /// IHRACAT — export invoice.
    Ihracat,
    /// TEMELFATURA — basic invoice (no rejection flow).
    TemelFatura,
    /// YOLCUBERABERFATURA — tax-free invoice for accompanied goods.
    YolcuBeraberFatura,
    /// BEDELSIZIHRACAT — free-of-charge export.
    BedelsizIhracat,
    /// KAMU — public-sector invoice.
    Kamu,
    /// ENERJI — energy-sector invoice.
    Enerji,
    /// ILAC_TIBBICIHAZ — pharmaceuticals and medical devices.
    IlacTibbiCihaz,
    /// MIKROIHRACAT — micro-export invoice.
    MikroIhracat,
}

impl ProfileType {
    /// GİB profile identifier as written to `cbc:ProfileID`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TicariFatura => "TICARIFATURA",
            Self::Ihracat => "IHRACAT",
            Self::TemelFatura => "TEMELFATURA",
            Self::YolcuBeraberFatura => "YOLCUBERABERFATURA",
            Self::BedelsizIhracat => "BEDELSIZIHRACAT",
            Self::Kamu => "KAMU",
            Self::Enerji => "ENERJI",
            Self::IlacTibbiCihaz => "ILAC_TIBBICIHAZ",
            Self::MikroIhracat => "MIKROIHRACAT",
        }
    }

    /// Parse from the GİB profile identifier.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TICARIFATURA" => Some(Self::TicariFatura),
            "IHRACAT" => Some(Self::Ihracat),
            "TEMELFATURA" => Some(Self::TemelFatura),
            "YOLCUBERABERFATURA" => Some(Self::YolcuBeraberFatura),
            "BEDELSIZIHRACAT" => Some(Self::BedelsizIhracat),
            "KAMU" => Some(Self::Kamu),
            "ENERJI" => Some(Self::Enerji),
            "ILAC_TIBBICIHAZ" => Some(Self::IlacTibbiCihaz),
            "MIKROIHRACAT" => Some(Self::MikroIhracat),
            _ => None,
        }
    }
}

/// GİB invoice type codes (`cbc:InvoiceTypeCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceTypeKind {
    /// SATIS — sale.
    Satis,
    /// IADE — return/refund.
    Iade,
    /// IHRACKAYITLI — export-registered sale.
    IhracKayitli,
    /// KONAKLAMAVERGISI — accommodation tax invoice.
    KonaklamaVergisi,
    /// SGK — social security institution invoice.
    Sgk,
    /// TEVKIFATIADE — withholding return.
    TevkifatIade,
    /// SARJ — EV charging invoice.
    Sarj,
    /// SARJANLIK — instant EV charging invoice.
    SarjAnlik,
    /// TEKNOLOJIDESTEK — technology support invoice.
    TeknolojiDestek,
}

impl InvoiceTypeKind {
    /// GİB type identifier as written to `cbc:InvoiceTypeCode`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Satis => "SATIS",
            Self::Iade => "IADE",
            Self::IhracKayitli => "IHRACKAYITLI",
            Self::KonaklamaVergisi => "KONAKLAMAVERGISI",
            Self::Sgk => "SGK",
            Self::TevkifatIade => "TEVKIFATIADE",
            Self::Sarj => "SARJ",
            Self::SarjAnlik => "SARJANLIK",
            Self::TeknolojiDestek => "TEKNOLOJIDESTEK",
        }
    }

    /// Parse from the GİB type identifier.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SATIS" => Some(Self::Satis),
            "IADE" => Some(Self::Iade),
            "IHRACKAYITLI" => Some(Self::IhracKayitli),
            "KONAKLAMAVERGISI" => Some(Self::KonaklamaVergisi),
            "SGK" => Some(Self::Sgk),
            "TEVKIFATIADE" => Some(Self::TevkifatIade),
            "SARJ" => Some(Self::Sarj),
            "SARJANLIK" => Some(Self::SarjAnlik),
            "TEKNOLOJIDESTEK" => Some(Self::TeknolojiDestek),
            _ => None,
        }
    }
}

/// Accounting direction of the document. Only customer-facing moves
/// (`OutInvoice`, `OutRefund`) are eligible for e-invoice generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveType {
    OutInvoice,
    OutRefund,
    InInvoice,
    InRefund,
}

impl MoveType {
    /// True for documents issued to a customer.
    pub fn is_customer_facing(&self) -> bool {
        matches!(self, Self::OutInvoice | Self::OutRefund)
    }
}

/// The invoice aggregate consumed by the UBL generator.
///
/// Aggregate amounts are already rounded to the currency scale by the
/// record store (or by [`InvoiceBuilder`](super::InvoiceBuilder)); the
/// generator reuses them verbatim and never re-derives them from lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Document number (e.g. "ABC2024000000001"). May be empty for drafts.
    pub number: String,
    /// Accounting direction.
    pub move_type: MoveType,
    /// GİB profile type. Required for customer-facing moves.
    pub profile: Option<ProfileType>,
    /// GİB invoice type code. Required for customer-facing moves.
    pub type_kind: Option<InvoiceTypeKind>,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Free-text reference to the originating order, if any.
    pub origin_reference: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
    /// ISO 4217 currency code (e.g. "TRY").
    pub currency_code: String,
    /// Untaxed total (sum of line subtotals), currency scale.
    pub untaxed: Decimal,
    /// Total tax amount, currency scale.
    pub tax: Decimal,
    /// Grand total (untaxed + tax), currency scale.
    pub total: Decimal,
    /// Issuing (supplier) party.
    pub supplier: Party,
    /// Receiving (customer) party.
    pub customer: Party,
    /// Ordered invoice lines.
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    /// Lines that produce an `InvoiceLine` element — section and note
    /// markers are skipped.
    pub fn eligible_lines(&self) -> impl Iterator<Item = &InvoiceLine> {
        self.lines.iter().filter(|l| l.kind == LineKind::Item)
    }
}

/// Supplier or customer party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    /// Legal name.
    pub name: String,
    /// Tax identifier: 10-digit VKN for companies, 11-digit TCKN for
    /// individuals.
    pub tax_id: Option<String>,
    /// Discriminates the identification scheme: VKN when true, TCKN
    /// otherwise.
    pub is_company: bool,
    /// Tax office (vergi dairesi) name.
    pub tax_office: Option<String>,
    /// Postal address.
    pub address: Address,
    /// Contact information.
    pub contact: Contact,
    /// Website URI.
    pub website: Option<String>,
}

impl Party {
    /// `schemeID` value for the party-identification element.
    pub fn id_scheme(&self) -> &'static str {
        if self.is_company { "VKN" } else { "TCKN" }
    }

    /// Contact phone with landline-to-mobile fallback.
    pub fn phone(&self) -> Option<&str> {
        self.contact
            .phone
            .as_deref()
            .or(self.contact.mobile.as_deref())
    }
}

/// Postal address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    /// Street name.
    pub street: Option<String>,
    /// Building number (bina numarası).
    pub building_number: Option<String>,
    /// City subdivision / district (ilçe).
    pub subdivision: Option<String>,
    /// City (il).
    pub city: String,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Region.
    pub region: Option<String>,
    /// Country name (e.g. "Türkiye").
    pub country_name: String,
}

/// Contact information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    /// Landline phone.
    pub phone: Option<String>,
    /// Mobile phone, used when no landline is set.
    pub mobile: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// Kind of an invoice line. Only `Item` lines are rendered; `Section` and
/// `Note` rows exist for display purposes in the source ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineKind {
    #[default]
    Item,
    Section,
    Note,
}

/// A single invoice line.
///
/// `subtotal`, `total` and `tax_amount` are the already-rounded amounts
/// from the record store. Discount fields carry explicit presence instead
/// of sentinel values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Line kind — section/note markers are not rendered.
    pub kind: LineKind,
    /// Line description text.
    pub description: Option<String>,
    /// Linked product display name.
    pub product_name: Option<String>,
    /// Invoiced quantity.
    pub quantity: Decimal,
    /// UN/CEFACT unit code override; "C62" (piece) when absent.
    pub unit_code: Option<String>,
    /// Net unit price.
    pub unit_price: Decimal,
    /// Line subtotal after discounts, before tax.
    pub subtotal: Decimal,
    /// Line total including tax.
    pub total: Decimal,
    /// Precomputed line tax amount; `total - subtotal` when absent.
    pub tax_amount: Option<Decimal>,
    /// Percentage discount (0–100).
    pub discount_percent: Option<Decimal>,
    /// Fixed discount per unit.
    pub discount_fixed: Option<Decimal>,
    /// Applicable taxes; only the first drives the per-line tax-category
    /// metadata.
    pub taxes: Vec<TaxDetail>,
}

impl InvoiceLine {
    /// Display text for the line: description, falling back to the product
    /// name.
    pub fn display_name(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.product_name.as_deref().filter(|s| !s.is_empty()))
    }

    /// First applicable tax, the one reported in the line's tax category.
    pub fn first_tax(&self) -> Option<&TaxDetail> {
        self.taxes.first()
    }
}

/// A tax applied to an invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxDetail {
    /// Tax display name.
    pub name: Option<String>,
    /// 4-digit GİB tax type code (e.g. "0015" for KDV).
    pub code: Option<String>,
    /// Tax rate percentage.
    pub percent: Decimal,
    /// Tax-group override for the reported category name/code.
    pub group: Option<TaxGroup>,
}

/// Tax group carrying reporting overrides for its member taxes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxGroup {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl TaxDetail {
    /// Reported tax-category name: group override, then the tax's own name,
    /// then "KDV".
    pub fn category_name(&self) -> &str {
        self.group
            .as_ref()
            .and_then(|g| g.name.as_deref())
            .filter(|s| !s.is_empty())
            .or(self.name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("KDV")
    }

    /// Reported tax-type code: group override, then the tax's own code,
    /// then "0015".
    pub fn category_code(&self) -> &str {
        self.group
            .as_ref()
            .and_then(|g| g.code.as_deref())
            .filter(|s| !s.is_empty())
            .or(self.code.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("0015")
    }
}
