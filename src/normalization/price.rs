use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Ranking key given to records without a usable total so they sort last.
pub const UNRANKED_SENTINEL: f64 = 999_999.0;

static PRICE_RE: OnceLock<Regex> = OnceLock::new();

fn price_re() -> &'static Regex {
    PRICE_RE.get_or_init(|| Regex::new(r"[\d,]+\.\d{2}").expect("static price regex"))
}

/// Round to whole cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Extract the first `123.45`-style amount from a price label such as
/// `"$1,234.56 each"`. Thousands separators are dropped before matching;
/// labels without cents (e.g. `"$59"`) are rejected.
pub fn parse_price_text(input: &str) -> Option<f64> {
    let cleaned = input.replace(',', "");
    let m = price_re().find(&cleaned)?;
    m.as_str().parse::<f64>().ok()
}

/// Accepts numbers and numeric strings, as upstream JSON uses both.
/// `"NaN"`/`"inf"` strings are rejected.
pub fn value_as_f64(v: &Value) -> Option<f64> {
    let n = match v.as_f64() {
        Some(n) => n,
        None => v.as_str()?.trim().parse::<f64>().ok()?,
    };
    Some(n).filter(|n| n.is_finite())
}

/// Sort key for a total price: positive totals rank by value, anything else
/// (zero, negative, NaN) is pushed to the end.
pub fn ranking_key(total_price: f64) -> f64 {
    if total_price > 0.0 {
        total_price
    } else {
        UNRANKED_SENTINEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_dollar_labels() {
        assert_eq!(parse_price_text("$59.99"), Some(59.99));
        assert_eq!(parse_price_text("  $1,234.50 / each "), Some(1234.50));
        assert_eq!(parse_price_text("Price: 12.00 USD"), Some(12.0));
    }

    #[test]
    fn rejects_labels_without_cents() {
        assert_eq!(parse_price_text("$59"), None);
        assert_eq!(parse_price_text("Call for price"), None);
        assert_eq!(parse_price_text(""), None);
    }

    #[test]
    fn round2_rounds_to_cents() {
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(42.0), 42.0);
    }

    #[test]
    fn value_as_f64_accepts_strings_and_numbers() {
        assert_eq!(value_as_f64(&json!("12.50")), Some(12.5));
        assert_eq!(value_as_f64(&json!(7)), Some(7.0));
        assert_eq!(value_as_f64(&json!(3.25)), Some(3.25));
        assert_eq!(value_as_f64(&json!("n/a")), None);
        assert_eq!(value_as_f64(&json!(null)), None);
    }

    #[test]
    fn value_as_f64_rejects_non_finite_strings() {
        assert_eq!(value_as_f64(&json!("NaN")), None);
        assert_eq!(value_as_f64(&json!("inf")), None);
        assert_eq!(value_as_f64(&json!("-infinity")), None);
    }

    #[test]
    fn ranking_key_pushes_zero_to_end() {
        assert_eq!(ranking_key(59.99), 59.99);
        assert_eq!(ranking_key(0.0), UNRANKED_SENTINEL);
        assert_eq!(ranking_key(-1.0), UNRANKED_SENTINEL);
        assert_eq!(ranking_key(f64::NAN), UNRANKED_SENTINEL);
    }
}
