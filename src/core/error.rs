use thiserror::Error;

/// Errors that can occur during invoice validation, document generation,
/// or registry communication.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EfaturaError {
    /// Missing or unusable configuration: packaged template absent or
    /// unparsable, integration endpoint or credentials not set.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// One or more validation rules failed before generation was attempted.
    #[error("validation failed: {0}")]
    Validation(String),

    /// SOAP transport failure, non-successful service result, or an
    /// unparsable service response.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// XML serialization or parsing error.
    #[error("XML error: {0}")]
    Xml(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "customer.tax_id").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
