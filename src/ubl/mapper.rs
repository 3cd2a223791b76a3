//! Field mapping: fills skeleton leaves by qualified path.
//!
//! The skeleton is authoritative on structure. The mapper never creates
//! structural elements — it only fills existing ones. A path that resolves
//! to nothing is tolerated (schema drift), but each miss is recorded as a
//! [`MappingWarning`] and logged, instead of being silently swallowed.

use chrono::{NaiveDateTime, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::dom::{Element, Node};
use super::words::{self, Language};
use super::{Namespaces, RenderOptions, TR_CUSTOMIZATION_ID, UBL_VERSION_ID};
use crate::core::amounts::{format_amount, format_currency_amount};
use crate::core::{Invoice, InvoiceTypeKind, Party, ProfileType};

/// A skeleton path that resolved to nothing during field mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingWarning {
    /// Qualified path relative to the document root.
    pub path: String,
}

/// Writes invoice fields into the tree, collecting unmapped paths.
pub(super) struct FieldMapper {
    pub(super) ns: Namespaces,
    warnings: Vec<MappingWarning>,
}

impl FieldMapper {
    pub(super) fn new(ns: Namespaces) -> Self {
        Self {
            ns,
            warnings: Vec::new(),
        }
    }

    /// Overwrite the text of the element at `path`. Returns false (and
    /// records a warning) when the path does not resolve.
    pub(super) fn set_text(&mut self, root: &mut Element, path: &str, value: &str) -> bool {
        match root.find_mut(&self.ns, path) {
            Some(el) => {
                el.set_text(value);
                true
            }
            None => {
                self.miss(path);
                false
            }
        }
    }

    /// Overwrite an attribute of the element at `path`.
    pub(super) fn set_attr(
        &mut self,
        root: &mut Element,
        path: &str,
        name: &str,
        value: &str,
    ) -> bool {
        match root.find_mut(&self.ns, path) {
            Some(el) => {
                el.set_attr(name, value);
                true
            }
            None => {
                self.miss(path);
                false
            }
        }
    }

    /// Write a monetary amount: fixed-point text plus the `currencyID`
    /// attribute carrying the document currency.
    pub(super) fn set_amount(
        &mut self,
        root: &mut Element,
        path: &str,
        value: Decimal,
        digits: u32,
        currency: &str,
    ) -> bool {
        match root.find_mut(&self.ns, path) {
            Some(el) => {
                el.set_text(&format_amount(value, digits));
                el.set_attr("currencyID", currency);
                true
            }
            None => {
                self.miss(path);
                false
            }
        }
    }

    pub(super) fn into_warnings(self) -> Vec<MappingWarning> {
        self.warnings
    }

    fn miss(&mut self, path: &str) {
        log::warn!("skeleton path not found, field skipped: {path}");
        self.warnings.push(MappingWarning {
            path: path.to_string(),
        });
    }
}

/// Resolved header codes and per-render inputs for the header stage.
pub(super) struct HeaderFields<'a> {
    pub profile: ProfileType,
    pub type_kind: InvoiceTypeKind,
    pub line_count: usize,
    pub now: NaiveDateTime,
    pub options: &'a RenderOptions,
}

/// Populate document-level header fields.
///
/// The UUID is freshly generated and the issue time is taken from the
/// current clock on every render — both intentionally vary between
/// renders of the same invoice.
pub(super) fn populate_header(
    fields: &mut FieldMapper,
    root: &mut Element,
    invoice: &Invoice,
    header: HeaderFields<'_>,
) {
    fields.set_text(root, "cbc:UBLVersionID", UBL_VERSION_ID);
    fields.set_text(root, "cbc:CustomizationID", TR_CUSTOMIZATION_ID);
    fields.set_text(root, "cbc:ID", &invoice.number);
    fields.set_text(root, "cbc:ProfileID", header.profile.code());
    fields.set_text(root, "cbc:InvoiceTypeCode", header.type_kind.code());
    fields.set_text(root, "cbc:DocumentCurrencyCode", &invoice.currency_code);
    fields.set_text(root, "cbc:PaymentCurrencyCode", &invoice.currency_code);
    fields.set_text(root, "cbc:UUID", &Uuid::new_v4().to_string());
    fields.set_text(
        root,
        "cbc:IssueDate",
        &invoice.issue_date.format("%Y-%m-%d").to_string(),
    );
    fields.set_text(
        root,
        "cbc:IssueTime",
        &header.now.format("%H:%M:%S").to_string(),
    );
    fields.set_text(root, "cbc:LineCountNumeric", &header.line_count.to_string());

    // The order-reference block only exists when there is something to
    // reference; otherwise it is removed entirely, not left empty.
    match invoice.origin_reference.as_deref().filter(|s| !s.is_empty()) {
        Some(origin) => {
            fields.set_text(root, "cac:OrderReference/cbc:ID", origin);
            fields.set_text(
                root,
                "cac:OrderReference/cbc:IssueDate",
                &invoice.issue_date.format("%Y-%m-%d").to_string(),
            );
        }
        None => {
            root.remove_children(&fields.ns, "cac:OrderReference");
        }
    }

    let time_note = header.now.format("%H:%M:%S").to_string();
    let date_note = header.now.format("%d-%m-%Y").to_string();
    let preparer = header.options.preparer.clone().unwrap_or_default();
    fill_notes(fields, root, [&time_note, &date_note, &preparer]);
}

/// Fill the fixed note slots positionally and delete any further slots.
fn fill_notes(fields: &mut FieldMapper, root: &mut Element, values: [&str; 3]) {
    let ns = fields.ns;
    let positions: Vec<usize> = root
        .children
        .iter()
        .enumerate()
        .filter_map(|(i, node)| match node {
            Node::Element(e) if ns.matches(&e.name, "cbc:Note") => Some(i),
            _ => None,
        })
        .collect();

    for (slot, value) in values.iter().enumerate() {
        match positions.get(slot) {
            Some(&at) => {
                if let Node::Element(el) = &mut root.children[at] {
                    el.set_text(value);
                }
            }
            None => fields.miss(&format!("cbc:Note[{slot}]")),
        }
    }
    for &at in positions.iter().skip(3).rev() {
        root.children.remove(at);
    }
}

/// Which party container a [`Party`] is written into.
#[derive(Debug, Clone, Copy)]
pub(super) enum PartySlot {
    Supplier,
    Customer,
}

impl PartySlot {
    fn base(&self) -> &'static str {
        match self {
            Self::Supplier => "cac:AccountingSupplierParty/cac:Party",
            Self::Customer => "cac:AccountingCustomerParty/cac:Party",
        }
    }
}

/// Populate one party block: identification, name, address, tax office,
/// and contact details.
pub(super) fn populate_party(
    fields: &mut FieldMapper,
    root: &mut Element,
    slot: PartySlot,
    party: &Party,
) {
    let base = slot.base();

    fields.set_text(
        root,
        &format!("{base}/cbc:WebsiteURI"),
        party.website.as_deref().unwrap_or(""),
    );

    let id_path = format!("{base}/cac:PartyIdentification/cbc:ID");
    fields.set_text(root, &id_path, party.tax_id.as_deref().unwrap_or(""));
    // The scheme is derived from the party kind, never from user input.
    fields.set_attr(root, &id_path, "schemeID", party.id_scheme());

    fields.set_text(root, &format!("{base}/cac:PartyName/cbc:Name"), &party.name);

    let address = &party.address;
    fields.set_text(
        root,
        &format!("{base}/cac:PostalAddress/cbc:StreetName"),
        address.street.as_deref().unwrap_or(""),
    );
    fields.set_text(
        root,
        &format!("{base}/cac:PostalAddress/cbc:BuildingNumber"),
        address.building_number.as_deref().unwrap_or(""),
    );
    fields.set_text(
        root,
        &format!("{base}/cac:PostalAddress/cbc:CitySubdivisionName"),
        address.subdivision.as_deref().unwrap_or(""),
    );
    fields.set_text(
        root,
        &format!("{base}/cac:PostalAddress/cbc:CityName"),
        &address.city,
    );
    fields.set_text(
        root,
        &format!("{base}/cac:PostalAddress/cbc:PostalZone"),
        address.postal_code.as_deref().unwrap_or(""),
    );
    fields.set_text(
        root,
        &format!("{base}/cac:PostalAddress/cbc:Region"),
        address.region.as_deref().unwrap_or(""),
    );
    fields.set_text(
        root,
        &format!("{base}/cac:PostalAddress/cac:Country/cbc:Name"),
        &address.country_name,
    );

    fields.set_text(
        root,
        &format!("{base}/cac:PartyTaxScheme/cac:TaxScheme/cbc:Name"),
        party.tax_office.as_deref().unwrap_or(""),
    );

    fields.set_text(
        root,
        &format!("{base}/cac:Contact/cbc:Telephone"),
        party.phone().unwrap_or(""),
    );
    fields.set_text(
        root,
        &format!("{base}/cac:Contact/cbc:ElectronicMail"),
        party.contact.email.as_deref().unwrap_or(""),
    );
}

/// Fill the amount-in-words document references.
///
/// Reference blocks are located by their `DocumentType` discriminator:
/// `TR_NET_STR`/`TOTAL_NET_STR` receive the spelled-out payable amount,
/// `PAYABLEAMOUNT` the numeric total.
pub(super) fn populate_amount_words(
    fields: &mut FieldMapper,
    root: &mut Element,
    invoice: &Invoice,
    language: Language,
) {
    let ns = fields.ns;
    let spelled = words::amount_to_words(invoice.total, &invoice.currency_code, language);
    let numeric = format_currency_amount(invoice.total, &invoice.currency_code);
    let issue_date = invoice.issue_date;

    for node in root.children.iter_mut() {
        let Node::Element(block) = node else { continue };
        if !ns.matches(&block.name, "cac:AdditionalDocumentReference") {
            continue;
        }
        let doc_type = block
            .child(&ns, "cbc:DocumentType")
            .and_then(|d| d.text())
            .unwrap_or("")
            .to_string();
        match doc_type.as_str() {
            "TR_NET_STR" | "TOTAL_NET_STR" => {
                fill_reference(&ns, block, &spelled, issue_date);
            }
            "PAYABLEAMOUNT" => {
                fill_reference(&ns, block, &numeric, issue_date);
            }
            _ => {}
        }
    }
}

fn fill_reference(ns: &Namespaces, block: &mut Element, id: &str, issue_date: NaiveDate) {
    if let Some(el) = block.child_mut(ns, "cbc:ID") {
        el.set_text(id);
    }
    if let Some(el) = block.child_mut(ns, "cbc:IssueDate") {
        el.set_text(&issue_date.format("%Y-%m-%d").to_string());
    }
}
