//! Built-in validation rules.
//!
//! String rules treat non-string values as failures, except where noted.

use serde_json::Value;

use super::check::Validator;

fn as_text(value: &Value) -> Option<&str> {
    value.as_str()
}

/// Require a non-blank string.
pub fn not_blank(msg: impl Into<String>) -> Validator {
    Validator::rule(
        "not_blank",
        |v| as_text(v).is_some_and(|s| !s.trim().is_empty()),
        msg,
    )
}

/// Require minimum length (in characters).
pub fn min_length(min: usize, msg: impl Into<String>) -> Validator {
    Validator::rule(
        "min_length",
        move |v| as_text(v).is_some_and(|s| s.chars().count() >= min),
        msg,
    )
}

/// Require maximum length (in characters).
pub fn max_length(max: usize, msg: impl Into<String>) -> Validator {
    Validator::rule(
        "max_length",
        move |v| as_text(v).is_some_and(|s| s.chars().count() <= max),
        msg,
    )
}

/// Require the value to match a regex pattern.
pub fn pattern(pattern: &str, msg: impl Into<String>) -> Result<Validator, regex::Error> {
    let re = regex::Regex::new(pattern)?;
    Ok(Validator::rule(
        "pattern",
        move |v| as_text(v).is_some_and(|s| re.is_match(s)),
        msg,
    ))
}

/// Require a valid email address. Empty strings pass; combine with
/// [`not_blank`] to require a value.
pub fn email(msg: impl Into<String>) -> Validator {
    Validator::rule(
        "email",
        |v| match as_text(v) {
            Some("") => true,
            Some(s) => email_address::EmailAddress::is_valid(s),
            None => false,
        },
        msg,
    )
}

/// Require the value to equal `other`.
pub fn equals(other: Value, msg: impl Into<String>) -> Validator {
    Validator::rule("equals", move |v| v == &other, msg)
}

/// Require the value to contain a substring, ignoring case.
pub fn contains(substr: impl Into<String>, msg: impl Into<String>) -> Validator {
    let substr = substr.into().to_lowercase();
    Validator::rule(
        "contains",
        move |v| as_text(v).is_some_and(|s| s.to_lowercase().contains(&substr)),
        msg,
    )
}

/// Require an integer strictly greater than `min`.
///
/// Accepts JSON numbers and strings with a leading integer (`"28"`, `"28 years"`).
pub fn greater_than(min: i64, msg: impl Into<String>) -> Validator {
    Validator::rule(
        "greater_than",
        move |v| parse_leading_int(v).is_some_and(|n| n > min),
        msg,
    )
}

/// Require a checked checkbox.
pub fn checked(msg: impl Into<String>) -> Validator {
    Validator::rule("checked", |v| v.as_bool() == Some(true), msg)
}

/// Require a non-empty selection.
pub fn selected(msg: impl Into<String>) -> Validator {
    Validator::rule(
        "selected",
        |v| v.as_array().is_some_and(|items| !items.is_empty()),
        msg,
    )
}

fn parse_leading_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim_start();
            let end = s
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
                .map_or(s.len(), |(i, _)| i);
            s[..end].parse().ok()
        }
        _ => None,
    }
}
