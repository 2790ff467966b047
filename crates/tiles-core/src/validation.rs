//! # Validation Module
//!
//! Numeric coercion and the few hard validation rules of the pipeline.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile app                                                   │
//! │  ├── Discount must not exceed price                                    │
//! │  └── Customer name / contact number present                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── parse_or_default: every loose number goes through ONE helper      │
//! │  │   bad input → default + NumericCoercionWarning (never fatal)        │
//! │  │   huge input → clamped + NumericCoercionWarning                     │
//! │  └── validate_cart_not_empty: the only hard rule                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend (order endpoint)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use serde_json::json;
//! use tiles_core::validation::parse_or_default;
//!
//! let (value, warning) = parse_or_default("box", Some(&json!("12")), 0.0);
//! assert_eq!(value, 12.0);
//! assert!(warning.is_none());
//!
//! let (value, warning) = parse_or_default("box", Some(&json!("twelve")), 0.0);
//! assert_eq!(value, 0.0);
//! assert!(warning.is_some());
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Coercion
// =============================================================================

/// Largest magnitude a coerced number may have: Rs 1 lakh crore for
/// amounts, the same for packing factors. Larger input is clamped.
pub const MAX_NUMERIC_INPUT: f64 = 1_000_000_000_000.0;

/// Largest magnitude of a box or piece count on one line.
pub const MAX_COUNT: i64 = 1_000_000;

/// A field that could not be read as a number, or was out of range, and was
/// replaced by a default or clamped value.
///
/// Non-fatal: the pipeline keeps going and the caller logs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericCoercionWarning {
    /// Field name as it appears in the app record (`box`, `unit_price`, ...).
    pub field: String,
    /// What the app actually sent, rendered as JSON.
    pub raw: String,
    /// The value used instead.
    pub fallback: f64,
}

impl std::fmt::Display for NumericCoercionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {} is not a usable number, using {}",
            self.field, self.raw, self.fallback
        )
    }
}

/// Reads a loose JSON value as a finite number.
///
/// ## Rules
/// - Missing, `null` or blank string → `default`, no warning
/// - JSON number → that number
/// - String → trimmed, thousands separators removed, then parsed
/// - Anything else (text, bool, array, NaN) → `default` + warning
/// - A magnitude above [`MAX_NUMERIC_INPUT`] → clamped + warning
///
/// The invalid-parse sentinel never leaks out: the returned value is always
/// finite and within the bound.
pub fn parse_or_default(
    field: &str,
    raw: Option<&Value>,
    default: f64,
) -> (f64, Option<NumericCoercionWarning>) {
    let parsed = match raw {
        None | Some(Value::Null) => return (default, None),
        Some(Value::String(s)) if s.trim().is_empty() => return (default, None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => clamp_reported(field, raw, v, MAX_NUMERIC_INPUT),
        _ => (default, Some(coercion_warning(field, raw, default))),
    }
}

/// Reads a box/piece count with integer-parse semantics.
///
/// Fractional counts are truncated toward zero (`"2.7"` → 2). Counts are
/// clamped to ±[`MAX_COUNT`] with a warning.
pub fn parse_count(field: &str, raw: Option<&Value>) -> (i64, Option<NumericCoercionWarning>) {
    let (value, warning) = parse_or_default(field, raw, 0.0);
    let (value, clamped) = clamp_reported(field, raw, value.trunc(), MAX_COUNT as f64);
    (value as i64, clamped.or(warning))
}

fn clamp_reported(
    field: &str,
    raw: Option<&Value>,
    value: f64,
    limit: f64,
) -> (f64, Option<NumericCoercionWarning>) {
    if value.abs() <= limit {
        return (value, None);
    }
    let clamped = value.clamp(-limit, limit);
    (clamped, Some(coercion_warning(field, raw, clamped)))
}

fn coercion_warning(field: &str, raw: Option<&Value>, fallback: f64) -> NumericCoercionWarning {
    NumericCoercionWarning {
        field: field.to_string(),
        raw: raw.map(Value::to_string).unwrap_or_default(),
        fallback,
    }
}

/// Reads a loose JSON value as display text.
///
/// Strings are trimmed, numbers are printed as-is, everything else is empty.
/// The app sends ids such as `bank_id` either way.
pub fn text_or_default(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Same as [`text_or_default`] but `None` for empty results.
pub fn text_or_none(raw: Option<&Value>) -> Option<String> {
    let text = text_or_default(raw);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parses a transaction date as sent by the backend or the app.
///
/// Accepts `YYYY-MM-DD` (API), `DD/MM/YYYY` (en-GB display) and
/// `DD-MM-YYYY`. Anything else is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // Backend timestamps look like "2024-05-01 10:22:11"; only the date matters.
    let date_part = raw.split_whitespace().next().unwrap_or(raw);
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that a cart has at least one line before it is totalled for
/// submission.
pub fn validate_cart_not_empty(line_count: usize) -> ValidationResult<()> {
    if line_count == 0 {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

/// Validates that a quotation document has something to print.
pub fn validate_document_not_empty(line_count: usize) -> ValidationResult<()> {
    if line_count == 0 {
        return Err(ValidationError::EmptyDocument);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_or_default_numbers_and_strings() {
        assert_eq!(parse_or_default("x", Some(&json!(2.5)), 0.0), (2.5, None));
        assert_eq!(parse_or_default("x", Some(&json!(" 10 ")), 0.0), (10.0, None));
        assert_eq!(parse_or_default("x", Some(&json!("1,250.50")), 0.0), (1250.5, None));
        assert_eq!(parse_or_default("x", Some(&json!(-3)), 0.0), (-3.0, None));
    }

    #[test]
    fn test_parse_or_default_missing_is_silent() {
        assert_eq!(parse_or_default("packing", None, 1.0), (1.0, None));
        assert_eq!(parse_or_default("packing", Some(&Value::Null), 1.0), (1.0, None));
        assert_eq!(parse_or_default("packing", Some(&json!("")), 1.0), (1.0, None));
    }

    #[test]
    fn test_parse_or_default_garbage_warns() {
        let (value, warning) = parse_or_default("unit_price", Some(&json!("abc")), 0.0);
        assert_eq!(value, 0.0);
        let warning = warning.expect("warning expected");
        assert_eq!(warning.field, "unit_price");
        assert_eq!(warning.raw, "\"abc\"");

        let (value, warning) = parse_or_default("packing", Some(&json!("NaN")), 1.0);
        assert_eq!(value, 1.0);
        assert!(warning.is_some());

        let (_, warning) = parse_or_default("box", Some(&json!([1, 2])), 0.0);
        assert!(warning.is_some());
    }

    #[test]
    fn test_parse_count_truncates() {
        assert_eq!(parse_count("box", Some(&json!("2.7"))).0, 2);
        assert_eq!(parse_count("pec", Some(&json!(-1.9))).0, -1);
        assert_eq!(parse_count("pec", None).0, 0);
    }

    #[test]
    fn test_out_of_range_numbers_are_clamped() {
        let (value, warning) = parse_or_default("unit_price", Some(&json!("1e18")), 0.0);
        assert_eq!(value, MAX_NUMERIC_INPUT);
        let warning = warning.expect("clamping is reported");
        assert_eq!(warning.fallback, MAX_NUMERIC_INPUT);
        assert_eq!(warning.raw, "\"1e18\"");

        let (value, warning) = parse_or_default("text1", Some(&json!(-5e15)), 0.0);
        assert_eq!(value, -MAX_NUMERIC_INPUT);
        assert!(warning.is_some());

        let (value, warning) = parse_or_default("unit_price", Some(&json!(1e12)), 0.0);
        assert_eq!(value, 1e12);
        assert!(warning.is_none());
    }

    #[test]
    fn test_parse_count_is_bounded() {
        let (count, warning) = parse_count("box", Some(&json!("1e19")));
        assert_eq!(count, MAX_COUNT);
        assert_eq!(warning.expect("clamping is reported").fallback, MAX_COUNT as f64);

        let (count, warning) = parse_count("pec", Some(&json!(-2_000_000)));
        assert_eq!(count, -MAX_COUNT);
        assert!(warning.is_some());

        assert_eq!(parse_count("box", Some(&json!(MAX_COUNT))), (MAX_COUNT, None));
    }

    #[test]
    fn test_text_or_default() {
        assert_eq!(text_or_default(Some(&json!(" Ali "))), "Ali");
        assert_eq!(text_or_default(Some(&json!(7))), "7");
        assert_eq!(text_or_default(None), "");
        assert_eq!(text_or_none(Some(&json!(""))), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_date("2024-05-01"), expected);
        assert_eq!(parse_date("01/05/2024"), expected);
        assert_eq!(parse_date("01-05-2024"), expected);
        assert_eq!(parse_date("2024-05-01 10:22:11"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(validate_cart_not_empty(0), Err(ValidationError::EmptyCart));
        assert!(validate_cart_not_empty(1).is_ok());
        assert_eq!(
            validate_document_not_empty(0),
            Err(ValidationError::EmptyDocument)
        );
    }
}
