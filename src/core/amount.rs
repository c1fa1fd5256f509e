//! Parsing of monetary amounts into exact decimals

use crate::core::error::ConversionError;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Values that can be read as an exact monetary amount.
pub trait ToAmount {
    fn to_amount(&self) -> Result<Decimal, ConversionError>;
}

/// Largest exponent magnitude accepted in scientific notation. Anything
/// beyond it cannot be held exactly in a `Decimal`.
const MAX_EXPONENT: i32 = 64;

/// Parses plain (`"12.50"`) and scientific (`"1.25e1"`) notation.
/// Surrounding whitespace is ignored.
///
/// Input that a `Decimal` cannot hold exactly (more than 28 fractional
/// digits, or too many significant digits) is rejected rather than rounded.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let plain = match trimmed.find(['e', 'E']) {
        Some(pos) => expand_exponent(&trimmed[..pos], &trimmed[pos + 1..])?,
        None => trimmed.to_string(),
    };

    let value = Decimal::from_str(&plain).ok()?;
    let rendered = if value.is_zero() {
        "0".to_string()
    } else {
        value.normalize().to_string()
    };
    (rendered == canonical_digits(&plain)).then_some(value)
}

/// Rewrites `mantissa`e`exponent` in plain positional notation.
fn expand_exponent(mantissa: &str, exponent: &str) -> Option<String> {
    let exponent: i32 = exponent.parse().ok()?;
    if exponent.abs() > MAX_EXPONENT {
        return None;
    }

    let (sign, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let all = format!("{int_part}{frac_part}");
    if all.is_empty() || !all.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let point = int_part.len() as i32 + exponent;
    let plain = if point <= 0 {
        format!("0.{}{all}", "0".repeat(point.unsigned_abs() as usize))
    } else if point as usize >= all.len() {
        format!("{all}{}", "0".repeat(point as usize - all.len()))
    } else {
        let (head, tail) = all.split_at(point as usize);
        format!("{head}.{tail}")
    };
    Some(format!("{sign}{plain}"))
}

/// Plain-notation text with redundant zeros, `+` and `_` removed, for
/// comparison against a normalized `Decimal`.
fn canonical_digits(plain: &str) -> String {
    let cleaned: String = plain.chars().filter(|c| *c != '_').collect();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(cleaned.as_str())),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = if int_part.is_empty() {
        "0".to_string()
    } else {
        int_part.to_string()
    };
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    if negative && out != "0" {
        out.insert(0, '-');
    }
    out
}

impl ToAmount for str {
    fn to_amount(&self) -> Result<Decimal, ConversionError> {
        parse_decimal(self).ok_or_else(|| ConversionError::invalid_amount(self))
    }
}

impl<T: ToAmount + ?Sized> ToAmount for &T {
    fn to_amount(&self) -> Result<Decimal, ConversionError> {
        (**self).to_amount()
    }
}

impl ToAmount for String {
    fn to_amount(&self) -> Result<Decimal, ConversionError> {
        self.as_str().to_amount()
    }
}

impl ToAmount for Decimal {
    fn to_amount(&self) -> Result<Decimal, ConversionError> {
        Ok(*self)
    }
}

macro_rules! impl_integer_amount {
    ($($ty:ty),*) => {
        $(
            impl ToAmount for $ty {
                fn to_amount(&self) -> Result<Decimal, ConversionError> {
                    Ok(Decimal::from(*self))
                }
            }
        )*
    };
}

impl_integer_amount!(i32, i64, u32, u64);

impl ToAmount for f64 {
    /// Uses the shortest representation that round-trips, so `0.1` reads
    /// as `0.1` rather than its binary expansion.
    fn to_amount(&self) -> Result<Decimal, ConversionError> {
        if !self.is_finite() {
            return Err(ConversionError::invalid_amount(self.to_string()));
        }
        let text = self.to_string();
        parse_decimal(&text).ok_or_else(|| ConversionError::invalid_amount(text))
    }
}

impl ToAmount for Value {
    fn to_amount(&self) -> Result<Decimal, ConversionError> {
        match self {
            Value::Number(n) => n.to_string().to_amount(),
            Value::String(s) => s.to_amount(),
            other => Err(ConversionError::invalid_amount(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_strings() {
        assert_eq!("10".to_amount().unwrap(), dec!(10));
        assert_eq!("  12.50 ".to_amount().unwrap(), dec!(12.50));
        assert_eq!("-3.25".to_amount().unwrap(), dec!(-3.25));
        assert_eq!("1.5e2".to_amount().unwrap(), dec!(150));
        assert_eq!(String::from("0.0001").to_amount().unwrap(), dec!(0.0001));
    }

    #[test]
    fn test_reject_malformed_strings() {
        for input in ["", "   ", "abc", "1.2.3", "12 EUR"] {
            let err = input.to_amount().unwrap_err();
            assert!(matches!(err, ConversionError::InvalidAmount { .. }), "{input}");
        }
    }

    #[test]
    fn test_reject_inexact_inputs() {
        for input in [
            "0.00000000000000000000000000000001",
            "0.12345678901234567890123456789",
            "123456789012345678901234567890123",
            "1e-40",
            "1.5e-28",
            "1e29",
            "1e100000",
        ] {
            let err = input.to_amount().unwrap_err();
            assert!(matches!(err, ConversionError::InvalidAmount { .. }), "{input}");
        }
        assert!(1e-30f64.to_amount().is_err());
    }

    #[test]
    fn test_boundary_inputs_are_exact() {
        assert_eq!(
            "0.0000000000000000000000000001".to_amount().unwrap(),
            Decimal::new(1, 28)
        );
        assert_eq!("1e-28".to_amount().unwrap(), Decimal::new(1, 28));
        assert_eq!("-2.50E+3".to_amount().unwrap(), dec!(-2500));
        assert_eq!(".5e1".to_amount().unwrap(), dec!(5));
        assert!("-0.000".to_amount().unwrap().is_zero());
        assert_eq!("12.50".to_amount().unwrap().to_string(), "12.50");
    }

    #[test]
    fn test_integers_and_floats() {
        assert_eq!(42i32.to_amount().unwrap(), dec!(42));
        assert_eq!((-7i64).to_amount().unwrap(), dec!(-7));
        assert_eq!(u64::MAX.to_amount().unwrap(), Decimal::from(u64::MAX));
        assert_eq!(0.1f64.to_amount().unwrap(), dec!(0.1));
        assert_eq!(2.5f64.to_amount().unwrap(), dec!(2.5));
    }

    #[test]
    fn test_non_finite_floats_are_invalid() {
        assert!(f64::NAN.to_amount().is_err());
        assert!(f64::INFINITY.to_amount().is_err());
        assert!(f64::NEG_INFINITY.to_amount().is_err());
    }

    #[test]
    fn test_json_values() {
        assert_eq!(json!(15).to_amount().unwrap(), dec!(15));
        assert_eq!(json!(0.91).to_amount().unwrap(), dec!(0.91));
        assert_eq!(json!("1.36").to_amount().unwrap(), dec!(1.36));

        for value in [json!({}), json!([1]), json!(null), json!(true)] {
            assert!(value.to_amount().is_err(), "{value}");
        }
    }

    #[test]
    fn test_error_message_names_input() {
        let err = "ten".to_amount().unwrap_err();
        assert_eq!(err.to_string(), "Unable to convert amount to Decimal: ten");
    }
}
