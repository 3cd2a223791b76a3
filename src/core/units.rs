//! UN/CEFACT Recommendation 20 unit codes.
//!
//! The full Rec 20 list has ~2000 codes; this covers the subset that
//! appears on Turkish e-invoices. Lines without a custom unit code are
//! reported as [`UNIT_PIECE`].

/// UN/CEFACT code for "one (piece/unit)" — the default unit of measure.
pub const UNIT_PIECE: &str = "C62";

/// Check whether `code` is a known UN/CEFACT Rec 20 unit code.
pub fn is_known_unit_code(code: &str) -> bool {
    COMMON_UNIT_CODES.binary_search(&code).is_ok()
}

/// Sorted list of common unit codes. Sorted for binary search.
static COMMON_UNIT_CODES: &[&str] = &[
    "BX",  // Box
    "C62", // One (piece/unit)
    "CMT", // Centimetre
    "CS",  // Case
    "CT",  // Carton
    "D61", // Minute
    "DAY", // Day
    "DZN", // Dozen
    "GRM", // Gram
    "HUR", // Hour
    "KGM", // Kilogram
    "KWH", // Kilowatt-hour
    "LTR", // Litre
    "MGM", // Milligram
    "MLT", // Millilitre
    "MMT", // Millimetre
    "MON", // Month
    "MTK", // Square metre
    "MTQ", // Cubic metre
    "MTR", // Metre
    "NIU", // Number of units
    "PA",  // Packet
    "PK",  // Pack
    "PR",  // Pair
    "SET", // Set
    "TNE", // Tonne
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_is_known() {
        assert!(is_known_unit_code(UNIT_PIECE));
    }

    #[test]
    fn common_codes() {
        assert!(is_known_unit_code("KGM"));
        assert!(is_known_unit_code("HUR"));
        assert!(!is_known_unit_code("XXX"));
        assert!(!is_known_unit_code("c62"));
    }
}
