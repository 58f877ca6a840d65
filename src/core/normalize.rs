use num::bigint::{BigInt, BigUint};
use num::rational::Ratio;
use num::{Num, ToPrimitive};
use serde_json::Value;

/// Source field holding the raw wei-encoded vote weight.
pub const VOTES_FIELD: &str = "current_votes";
/// Derived column appended after the source columns.
pub const DECIMAL_COLUMN: &str = "current_votes_decimal";

const WEI_DECIMALS: usize = 18;
const HEX_PREFIX: &str = "0x";

/// Result of normalizing one `current_votes` value.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<'a> {
    Decimal(f64),
    PassThrough(&'a Value),
}

impl Normalized<'_> {
    pub fn render(&self) -> String {
        match self {
            Normalized::Decimal(value) => format_decimal(*value),
            Normalized::PassThrough(value) => render_cell(value),
        }
    }
}

/// Converts a `0x`-prefixed wei string into a decimal token amount.
///
/// Returns `None` when the prefix is missing or the digits are not valid
/// hexadecimal. The division by 10^18 is done exactly and only rounded once,
/// when converting to `f64`.
pub fn hex_to_decimal(raw: &str) -> Option<f64> {
    let digits = raw.strip_prefix(HEX_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let wei = BigUint::from_str_radix(digits, 16).ok()?;
    let scale = num::pow(BigUint::from(10u32), WEI_DECIMALS);
    Ratio::new(BigInt::from(wei), BigInt::from(scale)).to_f64()
}

/// Best-effort normalization of a record's vote field.
///
/// A missing field counts as `"0x0"`. Anything that is not a convertible hex
/// string is handed back untouched.
pub fn normalize_votes(value: Option<&Value>) -> Normalized<'_> {
    match value {
        None => Normalized::Decimal(0.0),
        Some(raw) => match raw.as_str().and_then(hex_to_decimal) {
            Some(decimal) => Normalized::Decimal(decimal),
            None => Normalized::PassThrough(raw),
        },
    }
}

/// Integral values keep a trailing `.0` so the column always reads as a float.
pub fn format_decimal(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Text of a single CSV cell for an arbitrary JSON value.
///
/// Numbers keep the exact text the API sent. Booleans are written `True`/`False`.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hex_to_decimal_whole_tokens() {
        assert_eq!(hex_to_decimal("0x3635c9adc5dea00000"), Some(1000.0));
        assert_eq!(hex_to_decimal("0xde0b6b3a7640000"), Some(1.0));
        assert_eq!(hex_to_decimal("0x0"), Some(0.0));
    }

    #[test]
    fn test_hex_to_decimal_fractional() {
        // 0.5 * 10^18
        assert_eq!(hex_to_decimal("0x6f05b59d3b20000"), Some(0.5));
        assert_eq!(hex_to_decimal("0x1"), Some(1e-18));
        // 62499999999999999488 wei rounds to the nearest f64
        assert_eq!(hex_to_decimal("0x3635c9adc5de9fe00"), Some(62.5));
    }

    #[test]
    fn test_hex_to_decimal_wider_than_u128() {
        // 2^256 - 1
        let max = format!("0x{}", "f".repeat(64));
        let value = hex_to_decimal(&max).unwrap();
        assert!((value - 1.157920892373162e59).abs() / value < 1e-12);
    }

    #[test]
    fn test_hex_to_decimal_rejects_malformed() {
        assert_eq!(hex_to_decimal("0xzz"), None);
        assert_eq!(hex_to_decimal("0x"), None);
        assert_eq!(hex_to_decimal("0x+1"), None);
        assert_eq!(hex_to_decimal("42"), None);
        assert_eq!(hex_to_decimal(""), None);
        assert_eq!(hex_to_decimal("0X10"), None);
    }

    #[test]
    fn test_normalize_passes_through_non_hex() {
        let plain = json!("42");
        assert_eq!(normalize_votes(Some(&plain)), Normalized::PassThrough(&plain));

        let empty = json!("");
        assert_eq!(normalize_votes(Some(&empty)), Normalized::PassThrough(&empty));

        let malformed = json!("0xzz");
        assert_eq!(
            normalize_votes(Some(&malformed)),
            Normalized::PassThrough(&malformed)
        );
        assert_eq!(normalize_votes(Some(&malformed)).render(), "0xzz");

        let null = Value::Null;
        assert_eq!(normalize_votes(Some(&null)).render(), "");

        let number = json!(7);
        assert_eq!(normalize_votes(Some(&number)).render(), "7");
    }

    #[test]
    fn test_normalize_missing_field_defaults_to_zero() {
        assert_eq!(normalize_votes(None), Normalized::Decimal(0.0));
        assert_eq!(normalize_votes(None).render(), "0.0");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1.0), "1.0");
        assert_eq!(format_decimal(0.0), "0.0");
        assert_eq!(format_decimal(1000.0), "1000.0");
        assert_eq!(format_decimal(0.25), "0.25");
        assert_eq!(format_decimal(1e21), "1000000000000000000000.0");
    }

    #[test]
    fn test_render_cell() {
        assert_eq!(render_cell(&json!("abc")), "abc");
        assert_eq!(render_cell(&json!(null)), "");
        assert_eq!(render_cell(&json!(true)), "True");
        assert_eq!(render_cell(&json!(false)), "False");
        assert_eq!(render_cell(&json!(12.5)), "12.5");
        assert_eq!(render_cell(&json!({"a": 1})), "{\"a\":1}");
    }

    #[test]
    fn test_render_cell_keeps_wide_integers_exact() {
        let record: Value =
            serde_json::from_str(r#"{"voting_power": 123456789012345678901234, "ratio": 0.10}"#)
                .unwrap();

        assert_eq!(render_cell(&record["voting_power"]), "123456789012345678901234");
        assert_eq!(render_cell(&record["ratio"]), "0.10");
    }
}
