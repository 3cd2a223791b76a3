use serde::{Deserialize, Serialize};

/// Integration channel the configuration record applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationKind {
    EFatura,
    EArsiv,
    EIrsaliye,
}

impl IntegrationKind {
    /// Numeric channel code used by the registry import records.
    pub fn code(&self) -> u8 {
        match self {
            Self::EFatura => 1,
            Self::EArsiv => 2,
            Self::EIrsaliye => 3,
        }
    }
}

/// E-invoice integration configuration.
///
/// One record per channel: service endpoint and credentials for the
/// taxpayer-registry SOAP service, the document numbering prefix, and the
/// optional uploaded XSLT stylesheet embedded into generated documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Channel this configuration applies to.
    pub kind: IntegrationKind,
    /// Numeric company code assigned by the integration provider.
    pub company_code: u32,
    /// SOAP API user name.
    pub api_user_name: String,
    /// SOAP API password.
    pub api_password: String,
    /// SOAP endpoint URL.
    pub web_service_url: Option<String>,
    /// 3-letter document numbering prefix.
    pub prefix: Option<String>,
    /// UBL version written to generated documents ("2.1").
    pub ubl_version: Option<String>,
    /// Customization identifier ("TR1.2").
    pub customization_id: Option<String>,
    /// Corporate code (şirket kodu) used for SOAP authentication.
    pub corporate_code: Option<String>,
    /// Uploaded XSLT stylesheet, base64-encoded.
    pub xslt_base64: Option<String>,
    /// File name of the uploaded stylesheet.
    pub xslt_file_name: Option<String>,
}

impl IntegrationConfig {
    /// The uploaded stylesheet as an embeddable attachment, when present.
    pub fn xslt_attachment(&self) -> Option<XsltAttachment> {
        let content = self.xslt_base64.as_deref()?.trim();
        if content.is_empty() {
            return None;
        }
        Some(XsltAttachment {
            content_base64: content.to_string(),
            file_name: self
                .xslt_file_name
                .clone()
                .unwrap_or_else(|| "fatura.xslt".to_string()),
        })
    }
}

/// A base64-encoded XSLT stylesheet ready for embedding into the
/// document's `AdditionalDocumentReference` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XsltAttachment {
    /// Base64-encoded stylesheet body.
    pub content_base64: String,
    /// Attachment file name.
    pub file_name: String,
}
