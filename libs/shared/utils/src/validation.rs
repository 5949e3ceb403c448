// =====================================================================================
// FIELD VALIDATION - WIRE VALUE PARSING & FORMAT RULES
// =====================================================================================

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const INVALID_TIME: &str =
    "Time has wrong format. Use one of these formats instead: hh:mm[:ss[.uuuuuu]].";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_PHONE: &str =
    "Phone number must be entered in the format: '+999999999'. Up to 15 digits allowed.";

pub const EMAIL_MAX_LENGTH: usize = 254;
const EMAIL_ADDRESS_LIMIT: usize = 320;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone pattern compiles"));

// Dot-atom local part; hostname labels may not start or end with a hyphen.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+",
        r"[A-Za-z0-9-]{1,62}[A-Za-z0-9]$",
    ))
    .expect("email pattern compiles")
});

static TRAILING_ZERO_FRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.0*\s*$").expect("fraction pattern compiles"));

pub fn max_length_message(max: usize) -> String {
    format!("Ensure this field has no more than {} characters.", max)
}

pub fn check_max_length(text: &str, max: usize) -> Result<(), String> {
    if text.chars().count() > max {
        Err(max_length_message(max))
    } else {
        Ok(())
    }
}

/// Keep `value` when every check passed, otherwise return all of their
/// messages in order.
pub fn all_of<T>(
    value: T,
    checks: impl IntoIterator<Item = Result<(), String>>,
) -> Result<T, Vec<String>> {
    let messages: Vec<String> = checks.into_iter().filter_map(Result::err).collect();
    if messages.is_empty() {
        Ok(value)
    } else {
        Err(messages)
    }
}

/// Look up `name` in a request object. Absent keys and explicit nulls are both
/// rejected, with different messages.
pub fn required<'a>(body: &'a Map<String, Value>, name: &str) -> Result<&'a Value, String> {
    match body.get(name) {
        None => Err(REQUIRED.to_string()),
        Some(Value::Null) => Err(NOT_NULL.to_string()),
        Some(value) => Ok(value),
    }
}

/// Like [`required`] but an absent key yields `None` instead of an error.
pub fn optional<'a>(body: &'a Map<String, Value>, name: &str) -> Result<Option<&'a Value>, String> {
    match body.get(name) {
        None => Ok(None),
        Some(Value::Null) => Err(NOT_NULL.to_string()),
        Some(value) => Ok(Some(value)),
    }
}

/// Strings and numbers are accepted as text; the result is trimmed and must not
/// be blank.
pub fn parse_text(value: &Value, max_length: Option<usize>) -> Result<String, String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(INVALID_STRING.to_string()),
    };

    if text.is_empty() {
        return Err(NOT_BLANK.to_string());
    }

    if let Some(max) = max_length {
        check_max_length(&text, max)?;
    }

    Ok(text)
}

pub fn parse_integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole_f64_to_i64))
            .ok_or_else(|| INVALID_INTEGER.to_string()),
        Value::String(s) => TRAILING_ZERO_FRACTION
            .replace(s.trim(), "")
            .parse::<i64>()
            .map_err(|_| INVALID_INTEGER.to_string()),
        _ => Err(INVALID_INTEGER.to_string()),
    }
}

// `as` would saturate, so out-of-range floats are refused here.
fn whole_f64_to_i64(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63

    if f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

/// ISO `YYYY-MM-DD`.
pub fn parse_date(value: &Value) -> Result<NaiveDate, String> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .ok_or_else(|| INVALID_DATE.to_string())
}

/// `HH:MM`, `HH:MM:SS` or `HH:MM:SS.ffffff`.
pub fn parse_time(value: &Value) -> Result<NaiveTime, String> {
    let s = value.as_str().map(str::trim).ok_or_else(|| INVALID_TIME.to_string())?;

    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| INVALID_TIME.to_string())
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= EMAIL_ADDRESS_LIMIT && EMAIL_PATTERN.is_match(email)
}

pub fn validate_phone(phone: &str) -> Result<(), String> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(INVALID_PHONE.to_string())
    }
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(INVALID_EMAIL.to_string())
    }
}

/// Date granularity only: `today` itself is allowed.
pub fn is_not_in_past(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}
