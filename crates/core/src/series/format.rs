//! Locale-aware display formatting for prices and changes.

use serde::{Deserialize, Serialize};

/// Shown wherever a value is not available.
pub const UNAVAILABLE: &str = "—";

/// Separators and affixes used when rendering numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberLocale {
    pub decimal_separator: char,
    /// `None` disables digit grouping.
    pub grouping_separator: Option<char>,
    /// Appended after a percentage, including any spacing.
    pub percent_suffix: String,
}

impl NumberLocale {
    pub fn en_us() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: Some(','),
            percent_suffix: "%".to_string(),
        }
    }

    pub fn de_de() -> Self {
        Self {
            decimal_separator: ',',
            grouping_separator: Some('.'),
            percent_suffix: "\u{a0}%".to_string(),
        }
    }

    pub fn fr_fr() -> Self {
        Self {
            decimal_separator: ',',
            grouping_separator: Some('\u{202f}'),
            percent_suffix: "\u{a0}%".to_string(),
        }
    }

    /// Look up a locale by tag (`en-US`, `de_DE`, `fr`). Unknown tags fall back to `en-US`.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "de" => Self::de_de(),
            "fr" => Self::fr_fr(),
            _ => Self::en_us(),
        }
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::en_us()
    }
}

/// Format a price with two fraction digits in the default locale.
pub fn format_price(value: f64) -> String {
    format_price_with(value, &NumberLocale::default())
}

/// Format a price with two fraction digits.
pub fn format_price_with(value: f64, locale: &NumberLocale) -> String {
    format_decimal(value, locale)
}

/// Format a fractional change as a percentage (`0.1` → `10.00%`) in the default locale.
pub fn format_percentage(value: f64) -> String {
    format_percentage_with(value, &NumberLocale::default())
}

/// Format a fractional change as a percentage with two fraction digits.
pub fn format_percentage_with(value: f64, locale: &NumberLocale) -> String {
    if !value.is_finite() {
        return UNAVAILABLE.to_string();
    }
    format!("{}{}", format_decimal(value * 100.0, locale), locale.percent_suffix)
}

/// Format an optional change, rendering `None` as [`UNAVAILABLE`].
pub fn format_change(change: Option<f64>, locale: &NumberLocale) -> String {
    match change {
        Some(value) => format_percentage_with(value, locale),
        None => UNAVAILABLE.to_string(),
    }
}

fn format_decimal(value: f64, locale: &NumberLocale) -> String {
    if !value.is_finite() {
        return UNAVAILABLE.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    // Values that round to zero lose their sign
    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(integer, locale.grouping_separator));
    out.push(locale.decimal_separator);
    out.push_str(fraction);
    out
}

fn group_digits(integer: &str, separator: Option<char>) -> String {
    let Some(separator) = separator else {
        return integer.to_string();
    };

    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(172.5), "172.50");
        assert_eq!(format_price(1234.5), "1,234.50");
        assert_eq!(format_price(1_234_567.891), "1,234,567.89");
        assert_eq!(format_price(-42.126), "-42.13");
    }

    #[test]
    fn test_format_price_drops_sign_of_rounded_zero() {
        assert_eq!(format_price(-0.001), "0.00");
        assert_eq!(format_price(-0.0), "0.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.1), "10.00%");
        assert_eq!(format_percentage(-0.0532), "-5.32%");
        assert_eq!(format_percentage(0.0), "0.00%");
        assert_eq!(format_percentage(12.5), "1,250.00%");
    }

    #[test]
    fn test_non_finite_is_unavailable() {
        assert_eq!(format_percentage(f64::INFINITY), UNAVAILABLE);
        assert_eq!(format_percentage(f64::NAN), UNAVAILABLE);
        assert_eq!(format_price(f64::NEG_INFINITY), UNAVAILABLE);
        assert_eq!(format_change(None, &NumberLocale::default()), UNAVAILABLE);
    }

    #[test]
    fn test_german_locale() {
        let locale = NumberLocale::de_de();
        assert_eq!(format_price_with(1234.5, &locale), "1.234,50");
        assert_eq!(format_percentage_with(0.1, &locale), "10,00\u{a0}%");
        assert_eq!(format_percentage_with(-0.0532, &locale), "-5,32\u{a0}%");
    }

    #[test]
    fn test_locale_without_grouping() {
        let locale = NumberLocale {
            grouping_separator: None,
            ..NumberLocale::en_us()
        };
        assert_eq!(format_price_with(1234567.0, &locale), "1234567.00");
    }

    #[test]
    fn test_locale_from_tag() {
        assert_eq!(NumberLocale::from_tag("de_DE.UTF-8"), NumberLocale::de_de());
        assert_eq!(NumberLocale::from_tag("fr-CA"), NumberLocale::fr_fr());
        assert_eq!(NumberLocale::from_tag("en-GB"), NumberLocale::en_us());
        assert_eq!(NumberLocale::from_tag(""), NumberLocale::en_us());
    }
}
