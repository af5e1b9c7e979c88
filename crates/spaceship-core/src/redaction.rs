//! Sensitive data redaction for debug payload logging

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Replacement text for redacted values
pub const REDACTED: &str = "***";

static CREDENTIAL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn credential_regex() -> Option<&'static Regex> {
    CREDENTIAL_REGEX
        .get_or_init(|| {
            Regex::new(
                r#"(?i)(api[_-]?key|api[_-]?secret|auth[_-]?code|password|token)([=:\s]+)['"]?[^\s'",&]{3,}['"]?"#,
            )
            .ok()
        })
        .as_ref()
}

/// Redact `name=value` style credentials embedded in free text
pub fn redact_sensitive(input: &str) -> String {
    match credential_regex() {
        Some(regex) => regex
            .replace_all(input, format!("${{1}}${{2}}{}", REDACTED).as_str())
            .into_owned(),
        None => input.to_string(),
    }
}

/// Redact sensitive keys (and credentials inside strings) in a JSON value
pub fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *val = Value::String(REDACTED.to_string());
                } else {
                    redact_json_value(val);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                redact_json_value(item);
            }
        }
        Value::String(s) => {
            *s = redact_sensitive(s);
        }
        _ => {}
    }
}

/// Redacted copy of a payload, for logging
pub fn redacted(value: &Value) -> Value {
    let mut copy = value.clone();
    redact_json_value(&mut copy);
    copy
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    key.contains("key")
        || key.contains("secret")
        || key.contains("token")
        || key.contains("password")
        || key.contains("authcode")
        || key.contains("eppcode")
}
