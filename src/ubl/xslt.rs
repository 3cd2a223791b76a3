//! Optional stylesheet embedding.
//!
//! The integration configuration may carry an uploaded XSLT stylesheet
//! (base64-encoded). When present it is written into the
//! `AdditionalDocumentReference` block whose `DocumentType` is `XSLT`;
//! when absent the skeleton node is left untouched — never a failure.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::Namespaces;
use super::dom::{Element, Node};
use crate::core::{Invoice, XsltAttachment};

/// Placeholder reference id for documents that have no number yet.
const DRAFT_ID: &str = "TASLAK";

pub(super) fn embed(
    ns: Namespaces,
    root: &mut Element,
    invoice: &Invoice,
    stylesheet: &XsltAttachment,
    draft: bool,
) {
    if BASE64.decode(&stylesheet.content_base64).is_err() {
        log::warn!(
            "configured XSLT stylesheet '{}' is not valid base64, skipping embed",
            stylesheet.file_name
        );
        return;
    }

    let reference_id = if draft || invoice.number.is_empty() {
        DRAFT_ID
    } else {
        invoice.number.as_str()
    };
    let issue_date = invoice.issue_date.format("%Y-%m-%d").to_string();

    for node in root.children.iter_mut() {
        let Node::Element(block) = node else { continue };
        if !ns.matches(&block.name, "cac:AdditionalDocumentReference") {
            continue;
        }
        let is_xslt = block
            .child(&ns, "cbc:DocumentType")
            .and_then(|d| d.text())
            .is_some_and(|t| t == "XSLT");
        if !is_xslt {
            continue;
        }

        if let Some(id) = block.child_mut(&ns, "cbc:ID") {
            id.set_text(reference_id);
        }
        if let Some(date) = block.child_mut(&ns, "cbc:IssueDate") {
            date.set_text(&issue_date);
        }
        if let Some(binary) = block.find_mut(&ns, "cac:Attachment/cbc:EmbeddedDocumentBinaryObject")
        {
            binary.set_text(&stylesheet.content_base64);
            binary.set_attr("filename", &stylesheet.file_name);
            binary.set_attr("mimeCode", "application/xml");
            binary.set_attr("encodingCode", "Base64");
            binary.set_attr("characterSetCode", "UTF-8");
        }
        return;
    }
}
