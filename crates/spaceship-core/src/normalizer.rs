//! Input normalization applied before data reaches the provider
//!
//! Everything here is pure: domain canonicalization, phone formatting into
//! the provider's `+CC.NUMBER` form, contact validation, lifecycle status
//! mapping and expiration date parsing.

use crate::types::{ContactRecord, LifecycleStatus};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

static PHONE_PARTS_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static FORMATTED_PHONE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn phone_parts_regex() -> Option<&'static Regex> {
    PHONE_PARTS_REGEX
        .get_or_init(|| Regex::new(r"^\+(\d{1,3})(\d+)$").ok())
        .as_ref()
}

fn formatted_phone_regex() -> Option<&'static Regex> {
    FORMATTED_PHONE_REGEX
        .get_or_init(|| Regex::new(r"^\+\d{1,3}\.\d+$").ok())
        .as_ref()
}

/// Lowercase and trim a domain name
pub fn canonicalize_domain(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A canonical (trimmed, lowercase) domain name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    pub fn new(name: &str) -> Self {
        Self(canonicalize_domain(name))
    }

    /// Join a second-level label and a TLD
    pub fn from_parts(sld: &str, tld: &str) -> Self {
        Self::new(&format!("{}.{}", sld.trim(), tld.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Format a phone number as `+<cc>.<number>`.
///
/// Numbers already in that form are returned as-is. Otherwise everything but
/// digits and a leading `+` is stripped, a `+` is ensured, and the first one
/// to three digits become the country code. Input that does not fit is
/// returned stripped, never rejected.
pub fn format_phone_number(raw: &str) -> String {
    let raw = raw.trim();
    if formatted_phone_regex().is_some_and(|re| re.is_match(raw)) {
        return raw.to_string();
    }

    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let stripped = format!("+{}", digits);

    match phone_parts_regex().and_then(|re| re.captures(&stripped)) {
        Some(caps) => format!("+{}.{}", &caps[1], &caps[2]),
        None => stripped,
    }
}

/// Check required contact fields and normalize phone, fax and country.
///
/// Fails on the first empty required field in declared order.
pub fn validate_contact_data(record: &ContactRecord) -> Result<ContactRecord> {
    if let Some((field, _)) = record
        .required_fields()
        .into_iter()
        .find(|(_, value)| value.is_empty())
    {
        return Err(Error::missing_field(field));
    }

    let mut normalized = record.clone();
    normalized.phone = format_phone_number(&record.phone);
    normalized.fax = record
        .fax
        .as_deref()
        .filter(|fax| !fax.is_empty())
        .map(format_phone_number);
    normalized.country = record.country.to_uppercase();
    Ok(normalized)
}

/// Map a host lifecycle status onto the provider vocabulary.
///
/// Exact, case-sensitive lookup; unknown values map to `registered`.
pub fn map_lifecycle_status(host_status: &str) -> LifecycleStatus {
    match host_status {
        "Active" => LifecycleStatus::Registered,
        "Expired" => LifecycleStatus::Expired,
        "Cancelled" => LifecycleStatus::Deleted,
        "Pending" | "Pending Transfer" => LifecycleStatus::Pending,
        "Redemption" => LifecycleStatus::Redemption,
        _ => LifecycleStatus::Registered,
    }
}

/// Parse a provider expiration date; naive values are taken as UTC
pub fn parse_expiration_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Number nameserver hosts as `ns1`, `ns2`, ...
pub fn nameservers_to_map(hosts: &[String]) -> BTreeMap<String, String> {
    hosts
        .iter()
        .enumerate()
        .map(|(index, host)| (format!("ns{}", index + 1), host.clone()))
        .collect()
}
