//! Lenient readers for `GeoJSON` property values.
//!
//! Upstream files are written by several tools (the Open Charge Map export,
//! the optimizer's CSV-to-GeoJSON step), so the same field can arrive as a
//! number, a numeric string, an empty string, or `null`.

use serde_json::Value;

/// Reads a finite float. Numeric strings are parsed; `null`, empty strings,
/// and anything else yield `None`.
#[must_use]
pub fn value_f64(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Reads a non-negative integer count.
///
/// Fractional values are truncated and negative values clamp to zero.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn value_u32(value: Option<&Value>) -> Option<u32> {
    if let Some(Value::Number(n)) = value
        && let Some(u) = n.as_u64()
    {
        return Some(u32::try_from(u).unwrap_or(u32::MAX));
    }
    let f = value_f64(value)?;
    Some(f.clamp(0.0, f64::from(u32::MAX)).trunc() as u32)
}

/// Reads a signed integer, truncating fractional values.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn value_i64(value: Option<&Value>) -> Option<i64> {
    if let Some(Value::Number(n)) = value
        && let Some(i) = n.as_i64()
    {
        return Some(i);
    }
    value_f64(value).map(|f| f.trunc() as i64)
}

/// Reads a 1-based rank. Values below 1 mean "unranked" and yield `None`.
#[must_use]
pub fn value_rank(value: Option<&Value>) -> Option<u32> {
    value_i64(value)
        .filter(|rank| *rank >= 1)
        .and_then(|rank| u32::try_from(rank).ok())
}

/// Reads a boolean. Accepts JSON booleans and the strings `true`/`false`
/// in any case (Python's CSV writer emits `True`/`False`).
#[must_use]
pub fn value_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Reads an identifier. Strings are taken as-is (unless empty) and numbers
/// are rendered without a fractional part when they have none.
#[must_use]
pub fn value_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a non-empty trimmed string.
#[must_use]
pub fn value_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_numbers_and_numeric_strings() {
        assert_eq!(value_f64(Some(&json!(0.25))), Some(0.25));
        assert_eq!(value_f64(Some(&json!(" 1.5 "))), Some(1.5));
        assert_eq!(value_f64(Some(&json!(""))), None);
        assert_eq!(value_f64(Some(&Value::Null)), None);
        assert_eq!(value_f64(None), None);
    }

    #[test]
    fn counts_truncate_and_clamp() {
        assert_eq!(value_u32(Some(&json!(4))), Some(4));
        assert_eq!(value_u32(Some(&json!(2.9))), Some(2));
        assert_eq!(value_u32(Some(&json!(-3))), Some(0));
        assert_eq!(value_u32(Some(&json!("6"))), Some(6));
        assert_eq!(value_u32(Some(&Value::Null)), None);
    }

    #[test]
    fn explicit_zero_count_is_preserved() {
        assert_eq!(value_u32(Some(&json!(0))), Some(0));
    }

    #[test]
    fn ranks_below_one_are_unranked() {
        assert_eq!(value_rank(Some(&json!(3))), Some(3));
        assert_eq!(value_rank(Some(&json!("2"))), Some(2));
        assert_eq!(value_rank(Some(&json!(0))), None);
        assert_eq!(value_rank(Some(&json!(-1))), None);
        assert_eq!(value_rank(Some(&json!(0.5))), None);
        assert_eq!(value_rank(Some(&Value::Null)), None);
    }

    #[test]
    fn reads_python_booleans() {
        assert_eq!(value_bool(Some(&json!(true))), Some(true));
        assert_eq!(value_bool(Some(&json!("False"))), Some(false));
        assert_eq!(value_bool(Some(&json!("maybe"))), None);
    }

    #[test]
    fn reads_ids() {
        assert_eq!(value_id(Some(&json!(12345))), Some("12345".to_string()));
        assert_eq!(value_id(Some(&json!("cand_007"))), Some("cand_007".to_string()));
        assert_eq!(value_id(Some(&json!(""))), None);
    }
}
