//! Stat Formatting
//!
//! Pure text formatting for the displayed statistics: en-US style
//! thousands grouping (up to three fraction digits, trailing zeros
//! trimmed), fixed 8-decimal prices with a currency prefix, and the
//! binary trend class derived from the percent-change sign.

use serde::{Deserialize, Serialize};

/// Directional state of the price-change indicator. Exactly two visual
/// states; zero counts as non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    NonNegative,
    Negative,
}

impl Trend {
    /// Derive the trend from the upstream percent-change string. The
    /// numeric value is read from the longest parsable prefix, so a
    /// trailing `%` or unit is ignored; a string with no numeric prefix
    /// at all falls to `Negative`, matching the page's original `>= 0`
    /// test failing on a non-number.
    #[must_use]
    pub fn from_percent(change: &str) -> Self {
        let non_negative = leading_number(change).map(|v| v >= 0.0).unwrap_or(false);
        if non_negative {
            Self::NonNegative
        } else {
            Self::Negative
        }
    }

    /// The color class applied on the page.
    #[must_use]
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::NonNegative => "text-green-500",
            Self::Negative => "text-red-500",
        }
    }
}

/// Parse the longest numeric prefix of a string, like `parseFloat`.
fn leading_number(raw: &str) -> Option<f64> {
    let mut text = raw.trim();
    while !text.is_empty() {
        if let Ok(value) = text.parse::<f64>() {
            return Some(value);
        }
        let cut = text
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        text = &text[..cut];
    }
    None
}

/// Insert thousands separators into a non-negative integer.
fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a count with thousands separators.
#[must_use]
pub fn format_count(count: u64) -> String {
    group_thousands(u128::from(count))
}

/// Format a number en-US style: separated thousands, at most three
/// fraction digits, trailing fraction zeros dropped.
#[must_use]
pub fn format_number(value: f64) -> String {
    let negative = value < 0.0;
    let scaled = (value.abs() * 1000.0).round() as u128;
    let int_part = scaled / 1000;
    let frac_part = scaled % 1000;

    let mut out = group_thousands(int_part);
    if frac_part != 0 {
        let mut frac = format!("{frac_part:03}");
        while frac.ends_with('0') {
            frac.pop();
        }
        out.push('.');
        out.push_str(&frac);
    }
    if negative {
        out.insert(0, '-');
    }
    out
}

/// Format a price string as `$` plus fixed 8-decimal precision.
/// Unparsable input yields `None`.
#[must_use]
pub fn format_price(raw: &str) -> Option<String> {
    raw.trim().parse::<f64>().ok().map(|v| format!("${v:.8}"))
}

/// Format a USD figure as `$` plus a thousands-grouped number.
/// Unparsable input yields `None`.
#[must_use]
pub fn format_usd(raw: &str) -> Option<String> {
    raw.trim().parse::<f64>().ok().map(|v| format!("${}", format_number(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grouping() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn number_fraction_handling() {
        assert_eq!(format_number(1234.0), "1,234");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(123456.789), "123,456.789");
        // Fractions beyond three digits are rounded.
        assert_eq!(format_number(0.12345), "0.123");
        assert_eq!(format_number(-9876.25), "-9,876.25");
    }

    #[test]
    fn price_is_fixed_eight_decimals() {
        assert_eq!(format_price("0.00001234").as_deref(), Some("$0.00001234"));
        assert_eq!(format_price("1.5").as_deref(), Some("$1.50000000"));
        assert_eq!(format_price("garbage"), None);
    }

    #[test]
    fn usd_figures() {
        assert_eq!(format_usd("98765.4").as_deref(), Some("$98,765.4"));
        assert_eq!(format_usd("1234567").as_deref(), Some("$1,234,567"));
        assert_eq!(format_usd(""), None);
    }

    #[test]
    fn trend_sign() {
        assert_eq!(Trend::from_percent("3.5"), Trend::NonNegative);
        assert_eq!(Trend::from_percent("0"), Trend::NonNegative);
        assert_eq!(Trend::from_percent("-3.5"), Trend::Negative);
        assert_eq!(Trend::from_percent("not a number"), Trend::Negative);
    }

    #[test]
    fn trend_reads_numeric_prefixes() {
        // A trailing unit is ignored, like the original parse.
        assert_eq!(Trend::from_percent("3.5%"), Trend::NonNegative);
        assert_eq!(Trend::from_percent("-3.5%"), Trend::Negative);
        assert_eq!(Trend::from_percent("  1.2e2 pts"), Trend::NonNegative);
        // No numeric prefix at all still falls to Negative.
        assert_eq!(Trend::from_percent("%3.5"), Trend::Negative);
        assert_eq!(Trend::from_percent(""), Trend::Negative);
    }

    #[test]
    fn trend_classes_are_exclusive() {
        assert_eq!(Trend::NonNegative.class_name(), "text-green-500");
        assert_eq!(Trend::Negative.class_name(), "text-red-500");
    }
}
