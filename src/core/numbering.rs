use chrono::{Datelike, NaiveDate};

use super::error::EfaturaError;

/// Gapless e-invoice number sequence generator.
///
/// GİB document numbers are 16 characters: a 3-letter unit prefix, the
/// 4-digit issue year, and a 9-digit sequential counter, e.g.
/// `ABC2024000000001`. The counter restarts at 1 each year and must be
/// gapless within a prefix.
#[derive(Debug, Clone)]
pub struct InvoiceNumberSequence {
    prefix: String,
    year: i32,
    next_number: u64,
}

impl InvoiceNumberSequence {
    /// Create a new sequence starting at 1.
    ///
    /// The prefix must be exactly 3 ASCII alphanumeric characters, as
    /// registered with the integration provider.
    pub fn new(prefix: impl Into<String>, year: i32) -> Result<Self, EfaturaError> {
        Self::starting_at(prefix, year, 1)
    }

    /// Create a sequence continuing from a given counter value.
    pub fn starting_at(
        prefix: impl Into<String>,
        year: i32,
        next_number: u64,
    ) -> Result<Self, EfaturaError> {
        let prefix = prefix.into();
        if prefix.len() != 3 || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EfaturaError::Configuration(format!(
                "invoice number prefix '{prefix}' must be 3 ASCII alphanumeric characters"
            )));
        }
        Ok(Self {
            prefix: prefix.to_ascii_uppercase(),
            year,
            next_number,
        })
    }

    /// Generate the next document number, consuming a counter value.
    pub fn next_number(&mut self) -> String {
        let num = self.next_number;
        self.next_number += 1;
        format!("{}{}{:09}", self.prefix, self.year, num)
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> String {
        format!("{}{}{:09}", self.prefix, self.year, self.next_number)
    }

    /// Year the sequence currently issues for.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Next raw counter value.
    pub fn next_raw(&self) -> u64 {
        self.next_number
    }

    /// Advance to a new year, resetting the counter to 1.
    pub fn advance_year(&mut self, new_year: i32) -> Result<(), EfaturaError> {
        if new_year <= self.year {
            return Err(EfaturaError::Validation(format!(
                "new year {new_year} must be greater than current year {}",
                self.year
            )));
        }
        self.year = new_year;
        self.next_number = 1;
        Ok(())
    }

    /// Auto-advance the year if `date` falls in a later year.
    /// Returns true if the year was advanced.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        if date.year() > self.year {
            self.year = date.year();
            self.next_number = 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixteen_character_format() {
        let mut seq = InvoiceNumberSequence::new("ABC", 2024).unwrap();
        assert_eq!(seq.next_number(), "ABC2024000000001");
        assert_eq!(seq.next_number(), "ABC2024000000002");
        assert_eq!(seq.peek(), "ABC2024000000003");
        assert_eq!(seq.peek().len(), 16);
    }

    #[test]
    fn prefix_is_uppercased_and_validated() {
        let seq = InvoiceNumberSequence::new("abc", 2024).unwrap();
        assert_eq!(seq.peek(), "ABC2024000000001");
        assert!(InvoiceNumberSequence::new("AB", 2024).is_err());
        assert!(InvoiceNumberSequence::new("ABCD", 2024).is_err());
        assert!(InvoiceNumberSequence::new("A-1", 2024).is_err());
    }

    #[test]
    fn year_advance_resets_counter() {
        let mut seq = InvoiceNumberSequence::starting_at("ABC", 2024, 500).unwrap();
        assert_eq!(seq.next_number(), "ABC2024000000500");
        seq.advance_year(2025).unwrap();
        assert_eq!(seq.next_number(), "ABC2025000000001");
        assert!(seq.advance_year(2024).is_err());
    }

    #[test]
    fn auto_advance_on_new_year() {
        let mut seq = InvoiceNumberSequence::starting_at("ABC", 2024, 42).unwrap();
        let d = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert!(seq.auto_advance(d));
        assert_eq!(seq.next_raw(), 1);
        assert!(!seq.auto_advance(d));
    }
}
