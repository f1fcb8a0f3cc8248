//! Typed reads over the loose constraint mappings in rule definitions.
//!
//! Resolution never fails: an absent key or an override of the wrong type
//! falls back to the rule's hardcoded default. Mismatches are logged so
//! configuration typos stay visible, but the original behavior of silently
//! preferring the default is preserved.

use serde_json::Value;
use tracing::warn;

use super::domain::Constraints;

/// Integer override, or the default when absent or not an integer.
pub(crate) fn int_or(constraints: &Constraints, key: &str, default: i64) -> i64 {
    match constraints.get(key) {
        None => default,
        Some(Value::Number(number)) => match number.as_i64() {
            Some(value) => value,
            None => {
                warn!(key, "constraint override is not an integer, using default");
                default
            }
        },
        Some(_) => {
            warn!(key, "constraint override has wrong type, using default");
            default
        }
    }
}

/// Boolean override, or the default when absent or not a boolean.
pub(crate) fn bool_or(constraints: &Constraints, key: &str, default: bool) -> bool {
    match constraints.get(key) {
        None => default,
        Some(Value::Bool(value)) => *value,
        Some(_) => {
            warn!(key, "constraint override has wrong type, using default");
            default
        }
    }
}

/// Allowed leading characters for the phone-location rule.
///
/// Unlike the scalar resolvers this one does not fall back on malformed input:
/// a present-but-broken list makes the rule fail closed for every applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AreaCodes {
    Allowed(Vec<char>),
    Malformed,
}

impl AreaCodes {
    pub(crate) fn permits(&self, phone_number: &str) -> bool {
        match self {
            AreaCodes::Allowed(chars) => phone_number
                .chars()
                .next()
                .map(|first| chars.contains(&first))
                .unwrap_or(false),
            AreaCodes::Malformed => false,
        }
    }
}

/// Area-code override, the default set when absent, or `Malformed` when the
/// configured value is not a list of strings.
pub(crate) fn area_codes_or(
    constraints: &Constraints,
    key: &str,
    default: &[char],
) -> AreaCodes {
    let value = match constraints.get(key) {
        None => return AreaCodes::Allowed(default.to_vec()),
        Some(value) => value,
    };

    let items = match value {
        Value::Array(items) => items,
        _ => {
            warn!(key, "area code constraint is not a list, rule will fail closed");
            return AreaCodes::Malformed;
        }
    };

    let mut chars = Vec::new();
    for item in items {
        match item {
            // The legacy config built a regex character class from these
            // entries, so every character of every entry counts.
            Value::String(code) => chars.extend(code.chars()),
            _ => {
                warn!(key, "area code list holds a non-string, rule will fail closed");
                return AreaCodes::Malformed;
            }
        }
    }

    AreaCodes::Allowed(chars)
}
