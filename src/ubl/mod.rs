//! UBL-TR 1.2 invoice XML generation by template merge.
//!
//! A packaged skeleton document (a valid, placeholder-filled UBL 2.1
//! Invoice with the Turkish customization) is parsed into a fresh mutable
//! tree per invoice, filled stage by stage, and serialized back to UTF-8:
//!
//! 1. [`Template`] — loads and parses the skeleton, never cached.
//! 2. Field mapper — header and party fields, by qualified path.
//! 3. Line synthesizer — one deep-copied `InvoiceLine` subtree per
//!    billable line.
//! 4. Totals recalculator — document tax and monetary totals.
//! 5. Optional XSLT embedding, then serialization.
//!
//! # Example
//!
//! ```no_run
//! use efatura::core::*;
//! use efatura::ubl::{self, RenderOptions};
//!
//! let invoice: Invoice = todo!(); // build via InvoiceBuilder
//! let output = ubl::to_ubl_xml(&invoice, &RenderOptions::default()).unwrap();
//! std::fs::write("fatura.xml", &output.xml).unwrap();
//! ```
//!
//! Re-rendering the same invoice varies only in the document UUID and the
//! issue-time-derived fields; everything else is byte-identical.

pub mod dom;
mod lines;
mod mapper;
mod template;
mod totals;
mod words;
mod xslt;

pub use lines::LineAmounts;
pub use mapper::MappingWarning;
pub use template::Template;
pub use words::{Language, amount_to_words};

use chrono::Local;

use crate::core::{EfaturaError, Invoice, InvoiceLine, XsltAttachment};
use dom::Element;
use mapper::FieldMapper;

/// UBL version written to `cbc:UBLVersionID`.
pub const UBL_VERSION_ID: &str = "2.1";

/// Turkish customization identifier written to `cbc:CustomizationID`.
pub const TR_CUSTOMIZATION_ID: &str = "TR1.2";

/// UBL-TR namespace URIs.
pub mod ubl_ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
    pub const CCTS: &str = "urn:un:unece:uncefact:documentation:2";
    pub const DS: &str = "http://www.w3.org/2000/09/xmldsig#";
    pub const EXT: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonExtensionComponents-2";
    pub const QDT: &str = "urn:oasis:names:specification:ubl:schema:xsd:QualifiedDataTypes-2";
    pub const UBLTR: &str = "urn:oasis:names:specification:ubl:schema:xsd:TurkishCustomizationExtensionComponents";
    pub const UDT: &str =
        "urn:un:unece:uncefact:data:specification:UnqualifiedDataTypesSchemaModule:2";
    pub const XADES: &str = "http://uri.etsi.org/01903/v1.3.2#";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}

static PREFIXES: &[(&str, &str)] = &[
    ("cac", ubl_ns::CAC),
    ("cbc", ubl_ns::CBC),
    ("ccts", ubl_ns::CCTS),
    ("ds", ubl_ns::DS),
    ("ext", ubl_ns::EXT),
    ("qdt", ubl_ns::QDT),
    ("ubltr", ubl_ns::UBLTR),
    ("udt", ubl_ns::UDT),
    ("xades", ubl_ns::XADES),
    ("xsi", ubl_ns::XSI),
];

static DECLARATIONS: &[(&str, &str)] = &[
    ("xmlns", ubl_ns::INVOICE),
    ("xmlns:cac", ubl_ns::CAC),
    ("xmlns:cbc", ubl_ns::CBC),
    ("xmlns:ccts", ubl_ns::CCTS),
    ("xmlns:ds", ubl_ns::DS),
    ("xmlns:ext", ubl_ns::EXT),
    ("xmlns:qdt", ubl_ns::QDT),
    ("xmlns:ubltr", ubl_ns::UBLTR),
    ("xmlns:udt", ubl_ns::UDT),
    ("xmlns:xades", ubl_ns::XADES),
    ("xmlns:xsi", ubl_ns::XSI),
];

/// The prefix-to-URI registry for qualified lookups and serialization.
///
/// Passed as an explicit value through every stage instead of living in
/// process-global XML-engine state, so concurrent renders cannot leak
/// prefixes into each other's output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Namespaces;

impl Namespaces {
    /// URI bound to a prefix, if registered.
    pub fn uri(&self, prefix: &str) -> Option<&'static str> {
        PREFIXES
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, uri)| *uri)
    }

    /// URI of the default (unprefixed) namespace.
    pub fn default_uri(&self) -> &'static str {
        ubl_ns::INVOICE
    }

    /// Split a qualified name into its namespace URI and local part.
    /// Unprefixed names resolve to the default namespace; unknown
    /// prefixes resolve to no URI.
    pub fn resolve<'q>(&self, qname: &'q str) -> (Option<&'static str>, &'q str) {
        match qname.split_once(':') {
            Some((prefix, local)) => (self.uri(prefix), local),
            None => (Some(self.default_uri()), qname),
        }
    }

    /// Namespace-aware name comparison. Falls back to literal comparison
    /// when either side carries an unregistered prefix.
    pub fn matches(&self, name: &str, query: &str) -> bool {
        match (self.resolve(name), self.resolve(query)) {
            ((Some(u1), l1), (Some(u2), l2)) => u1 == u2 && l1 == l2,
            _ => name == query,
        }
    }

    /// The `xmlns` attribute set applied to the root on serialization.
    pub fn declarations(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        DECLARATIONS.iter().copied()
    }
}

/// Per-render settings supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Language for the spelled-out amount reference.
    pub language: Language,
    /// Display name of the preparing user, written to the third note slot.
    pub preparer: Option<String>,
    /// Stylesheet to embed into the `XSLT` document reference.
    pub xslt: Option<XsltAttachment>,
    /// Use the draft placeholder instead of the document number in the
    /// stylesheet reference.
    pub draft: bool,
}

/// Result of a render: the serialized document plus any skeleton paths
/// that could not be mapped.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// UTF-8 XML bytes with declaration.
    pub xml: Vec<u8>,
    /// Qualified paths that resolved to nothing in the skeleton.
    pub warnings: Vec<MappingWarning>,
}

/// Generate a UBL-TR 1.2 invoice document from the packaged skeleton.
pub fn to_ubl_xml(invoice: &Invoice, options: &RenderOptions) -> Result<RenderOutput, EfaturaError> {
    to_ubl_xml_with_template(invoice, &Template::packaged(), options)
}

/// Generate a UBL-TR 1.2 invoice document from a caller-supplied skeleton.
///
/// The skeleton is authoritative on structure: the mapper only fills
/// existing elements and reports unmapped paths as warnings. Profile type
/// and invoice type code must already be present — validated upstream via
/// [`validate_invoice`](crate::core::validate_invoice) or
/// [`InvoiceBuilder::build`](crate::core::InvoiceBuilder::build).
pub fn to_ubl_xml_with_template(
    invoice: &Invoice,
    template: &Template,
    options: &RenderOptions,
) -> Result<RenderOutput, EfaturaError> {
    let profile = invoice.profile.ok_or_else(|| {
        EfaturaError::Validation("profile type is required for document generation".into())
    })?;
    let type_kind = invoice.type_kind.ok_or_else(|| {
        EfaturaError::Validation("invoice type code is required for document generation".into())
    })?;

    let ns = Namespaces;
    let mut root: Element = template.instantiate()?;
    let now = Local::now().naive_local();

    let eligible: Vec<&InvoiceLine> = invoice.eligible_lines().collect();
    // Single computation shared by the line fill and the totals stage.
    let line_amounts: Vec<LineAmounts> = eligible
        .iter()
        .enumerate()
        .map(|(i, line)| LineAmounts::compute(line, i + 1))
        .collect();

    let mut fields = FieldMapper::new(ns);
    mapper::populate_header(
        &mut fields,
        &mut root,
        invoice,
        mapper::HeaderFields {
            profile,
            type_kind,
            line_count: eligible.len(),
            now,
            options,
        },
    );
    mapper::populate_party(&mut fields, &mut root, mapper::PartySlot::Supplier, &invoice.supplier);
    mapper::populate_party(&mut fields, &mut root, mapper::PartySlot::Customer, &invoice.customer);
    mapper::populate_amount_words(&mut fields, &mut root, invoice, options.language);

    lines::synthesize(ns, &mut root, &eligible, &line_amounts, &invoice.currency_code)?;
    totals::recalculate(
        &mut fields,
        &mut root,
        invoice,
        &line_amounts,
        eligible.first().copied(),
    );

    if let Some(stylesheet) = &options.xslt {
        xslt::embed(ns, &mut root, invoice, stylesheet, options.draft);
    }

    let xml = dom::serialize(&root, &ns)?;
    Ok(RenderOutput {
        xml,
        warnings: fields.into_warnings(),
    })
}
