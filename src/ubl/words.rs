//! Spelled-out amounts for the textual-total document reference.
//!
//! GİB viewers print the payable amount in words, uppercase and
//! group-concatenated, e.g. `YALNIZ : İKİYÜZKIRK TL SIFIR Kr`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::core::decimal_scale;

/// Language the textual amount is rendered in, from the party's or the
/// acting user's preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Turkish,
    English,
}

/// Render an amount as words at the currency's decimal scale.
pub fn amount_to_words(amount: Decimal, currency: &str, language: Language) -> String {
    let scale = decimal_scale(currency);
    let rounded = amount
        .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    let major = rounded.trunc().to_u64().unwrap_or(0);
    let minor = ((rounded - rounded.trunc()) * Decimal::from(10u64.pow(scale)))
        .round()
        .to_u64()
        .unwrap_or(0);

    let (prefix, spell): (&str, fn(u64) -> String) = match language {
        Language::Turkish => ("YALNIZ : ", turkish),
        Language::English => ("ONLY : ", english),
    };
    let (major_label, minor_label) = if currency == "TRY" {
        ("TL", "Kr")
    } else {
        (currency, "CENT")
    };

    if scale == 0 {
        format!("{prefix}{} {major_label}", spell(major))
    } else {
        format!(
            "{prefix}{} {major_label} {} {minor_label}",
            spell(major),
            spell(minor)
        )
    }
}

const TR_ONES: [&str; 10] = [
    "", "BİR", "İKİ", "ÜÇ", "DÖRT", "BEŞ", "ALTI", "YEDİ", "SEKİZ", "DOKUZ",
];
const TR_TENS: [&str; 10] = [
    "", "ON", "YİRMİ", "OTUZ", "KIRK", "ELLİ", "ALTMIŞ", "YETMİŞ", "SEKSEN", "DOKSAN",
];
const TR_SCALES: [&str; 5] = ["", "BİN", "MİLYON", "MİLYAR", "TRİLYON"];

fn turkish(n: u64) -> String {
    if n == 0 {
        return "SIFIR".to_string();
    }
    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push((rest % 1000) as usize);
        rest /= 1000;
    }

    let mut out = String::new();
    for (idx, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        // "BİN", never "BİRBİN".
        if idx == 1 && group == 1 {
            out.push_str("BİN");
            continue;
        }
        let hundreds = group / 100;
        if hundreds == 1 {
            out.push_str("YÜZ");
        } else if hundreds > 1 {
            out.push_str(TR_ONES[hundreds]);
            out.push_str("YÜZ");
        }
        out.push_str(TR_TENS[(group / 10) % 10]);
        out.push_str(TR_ONES[group % 10]);
        out.push_str(TR_SCALES[idx]);
    }
    out
}

const EN_ONES: [&str; 20] = [
    "", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN", "ELEVEN",
    "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN", "EIGHTEEN", "NINETEEN",
];
const EN_TENS: [&str; 10] = [
    "", "", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];
const EN_SCALES: [&str; 5] = ["", "THOUSAND", "MILLION", "BILLION", "TRILLION"];

fn english(n: u64) -> String {
    if n == 0 {
        return "ZERO".to_string();
    }
    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push((rest % 1000) as usize);
        rest /= 1000;
    }

    let mut parts: Vec<String> = Vec::new();
    for (idx, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let mut words: Vec<&str> = Vec::new();
        let hundreds = group / 100;
        if hundreds > 0 {
            words.push(EN_ONES[hundreds]);
            words.push("HUNDRED");
        }
        let tail = group % 100;
        if tail >= 20 {
            words.push(EN_TENS[tail / 10]);
            if tail % 10 > 0 {
                words.push(EN_ONES[tail % 10]);
            }
        } else if tail > 0 {
            words.push(EN_ONES[tail]);
        }
        if !EN_SCALES[idx].is_empty() {
            words.push(EN_SCALES[idx]);
        }
        parts.push(words.join(" "));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn turkish_basics() {
        assert_eq!(turkish(0), "SIFIR");
        assert_eq!(turkish(7), "YEDİ");
        assert_eq!(turkish(40), "KIRK");
        assert_eq!(turkish(240), "İKİYÜZKIRK");
        assert_eq!(turkish(100), "YÜZ");
        assert_eq!(turkish(1000), "BİN");
        assert_eq!(turkish(1234), "BİNİKİYÜZOTUZDÖRT");
        assert_eq!(turkish(2_000_001), "İKİMİLYONBİR");
    }

    #[test]
    fn english_basics() {
        assert_eq!(english(0), "ZERO");
        assert_eq!(english(15), "FIFTEEN");
        assert_eq!(english(240), "TWO HUNDRED FORTY");
        assert_eq!(english(1_000), "ONE THOUSAND");
        assert_eq!(english(21_015), "TWENTY ONE THOUSAND FIFTEEN");
    }

    #[test]
    fn try_amount_in_words() {
        assert_eq!(
            amount_to_words(dec!(240.00), "TRY", Language::Turkish),
            "YALNIZ : İKİYÜZKIRK TL SIFIR Kr"
        );
        assert_eq!(
            amount_to_words(dec!(1234.56), "TRY", Language::Turkish),
            "YALNIZ : BİNİKİYÜZOTUZDÖRT TL ELLİALTI Kr"
        );
    }

    #[test]
    fn foreign_currency_uses_code_labels() {
        assert_eq!(
            amount_to_words(dec!(100.30), "USD", Language::English),
            "ONLY : ONE HUNDRED USD THIRTY CENT"
        );
        assert_eq!(
            amount_to_words(dec!(500), "JPY", Language::English),
            "ONLY : FIVE HUNDRED JPY"
        );
    }
}
