use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::IntegrationKind;

/// One taxpayer-registry entry, as returned by the GİB list and check
/// services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxpayerRecord {
    /// VKN or TCKN.
    pub tax_id: String,
    /// Registered e-invoice alias (posta kutusu).
    pub alias: Option<String>,
    /// Registry party type (e.g. "Özel", "Kamu").
    pub kind: Option<String>,
    /// Registered legal name.
    pub title: Option<String>,
    /// Registration timestamp.
    pub registered_at: Option<NaiveDateTime>,
    /// Alias creation timestamp.
    pub alias_created_at: Option<NaiveDateTime>,
    /// Integration channel the record was imported through.
    pub channel: Option<IntegrationKind>,
}

/// Upsert sink for registry imports.
///
/// The import is processed element-by-element; each parsed record is
/// handed to the store as soon as its closing tag is seen, so the full
/// registry never has to fit in memory.
pub trait TaxpayerStore {
    /// Insert the record, or update the existing entry with the same
    /// tax id (and alias, when set).
    fn upsert(&mut self, record: TaxpayerRecord);
}

/// In-memory store, keyed by tax id + alias.
impl TaxpayerStore for Vec<TaxpayerRecord> {
    fn upsert(&mut self, record: TaxpayerRecord) {
        let existing = self.iter_mut().find(|r| {
            r.tax_id == record.tax_id && (record.alias.is_none() || r.alias == record.alias)
        });
        match existing {
            Some(slot) => *slot = record,
            None => self.push(record),
        }
    }
}

/// Registration status reported by the check service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxpayerStatus {
    /// At least one registry entry exists for the queried id.
    Registered,
    /// The query succeeded but found no active registration.
    NotRegistered,
}

/// Structured result of a `CheckCustomerTaxId` call: machine-readable
/// status plus the human-readable summary shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxpayerCheck {
    pub status: TaxpayerStatus,
    pub summary: String,
    pub records: Vec<TaxpayerRecord>,
}
