//! Host-facing parameter mapping and result shaping
//!
//! The billing host hands every operation a flat key/value mapping and
//! expects either a success payload or `{"error": "<message>"}` back.
//! [`HostParams`] decodes that mapping leniently (hosts send numbers as
//! strings and checkboxes as `"on"`), and [`into_host_value`] converts an
//! operation result into the host's shape.

use crate::http::auth::{Credentials, DEFAULT_ENDPOINT};
use crate::normalizer::DomainName;
use crate::types::ContactRecord;
use crate::{Error, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use tracing::error;

/// Parameters supplied by the host for one invocation
#[derive(Clone, Default, PartialEq, Deserialize)]
pub struct HostParams {
    #[serde(rename = "APIKey", default, deserialize_with = "lenient_string")]
    pub api_key: Option<String>,
    #[serde(rename = "APISecret", default, deserialize_with = "lenient_string")]
    pub api_secret: Option<String>,
    #[serde(rename = "APIEndPoint", default, deserialize_with = "lenient_string")]
    pub api_endpoint: Option<String>,
    #[serde(rename = "DebugMode", default, deserialize_with = "lenient_bool")]
    pub debug_mode: bool,

    #[serde(default, deserialize_with = "lenient_string")]
    pub domainname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sld: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tld: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub ns1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ns2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ns3: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ns4: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ns5: Option<String>,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub regperiod: Option<u32>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub companyname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub postcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub countrycode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phonenumber: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phonecc: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub idprotection: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub eppcode: Option<String>,
}

impl HostParams {
    /// Decode host parameters from a JSON object
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::validation(format!("Invalid host parameters: {}", e)))
    }

    /// Credentials for this invocation; the endpoint defaults to production
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.api_key.clone().unwrap_or_default(),
            self.api_secret.clone().unwrap_or_default(),
            non_empty(&self.api_endpoint).unwrap_or(DEFAULT_ENDPOINT),
        )
    }

    /// Target domain: `domainname` when present, otherwise `sld` + `tld`
    pub fn domain(&self) -> Result<DomainName> {
        if let Some(name) = non_empty(&self.domainname) {
            return Ok(DomainName::new(name));
        }
        match (non_empty(&self.sld), non_empty(&self.tld)) {
            (Some(sld), Some(tld)) => Ok(DomainName::from_parts(sld, tld)),
            _ => Err(Error::Validation {
                field: Some("domainname".to_string()),
                message: "Missing required field: domainname".to_string(),
            }),
        }
    }

    /// `ns1`..`ns5` in order, blanks skipped, duplicates kept
    pub fn nameservers(&self) -> Vec<String> {
        [&self.ns1, &self.ns2, &self.ns3, &self.ns4, &self.ns5]
            .into_iter()
            .filter_map(non_empty)
            .map(str::to_string)
            .collect()
    }

    /// Registration period in years, default 1
    pub fn registration_years(&self) -> u32 {
        self.regperiod.filter(|years| *years > 0).unwrap_or(1)
    }

    pub fn epp_code(&self) -> String {
        self.eppcode.clone().unwrap_or_default()
    }

    /// Contact record built from the host's client details.
    ///
    /// Names default to `Unknown`, country to `US` and the dialing code to
    /// `1`. Missing required values stay empty so validation can name them.
    pub fn contact_record(&self) -> ContactRecord {
        let country = non_empty(&self.countrycode)
            .or_else(|| non_empty(&self.country))
            .unwrap_or("US")
            .to_uppercase();

        let digits: String = self
            .phonenumber
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let phone = if digits.is_empty() {
            String::new()
        } else {
            let cc = non_empty(&self.phonecc).unwrap_or("1").trim_start_matches('+');
            format!("+{}.{}", cc, digits)
        };

        ContactRecord {
            first_name: non_empty(&self.firstname).unwrap_or("Unknown").to_string(),
            last_name: non_empty(&self.lastname).unwrap_or("Unknown").to_string(),
            email: owned(&self.email),
            address1: owned(&self.address1),
            city: owned(&self.city),
            country,
            phone,
            organization: non_empty(&self.companyname).map(str::to_string),
            address2: non_empty(&self.address2).map(str::to_string),
            state_province: non_empty(&self.state).map(str::to_string),
            postal_code: non_empty(&self.postcode).map(str::to_string),
            fax: None,
        }
    }
}

impl fmt::Debug for HostParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostParams")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .field("api_endpoint", &self.api_endpoint)
            .field("debug_mode", &self.debug_mode)
            .field("domainname", &self.domainname)
            .field("sld", &self.sld)
            .field("tld", &self.tld)
            .field("nameservers", &self.nameservers())
            .field("regperiod", &self.regperiod)
            .field("idprotection", &self.idprotection)
            .field("eppcode", &self.eppcode.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn owned(value: &Option<String>) -> String {
    non_empty(value).unwrap_or_default().to_string()
}

// ---------------------------------------------------------------------------
// Lenient deserializers
// ---------------------------------------------------------------------------

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            return Err(de::Error::custom(format!(
                "expected a string, got {}",
                other
            )))
        }
    })
}

/// JSON booleans, or the strings `on`, `yes`, `1` and `true` (any case)
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "on" | "yes" | "1" | "true"
        ),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid period: {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid period: {}", s))),
        other => Err(de::Error::custom(format!("invalid period: {}", other))),
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Conversion of an operation's success value into the host payload
pub trait HostPayload {
    fn into_host_payload(self) -> Value;
}

impl HostPayload for Value {
    fn into_host_payload(self) -> Value {
        self
    }
}

/// Convert an operation result into the host's shape, logging failures
pub fn into_host_value<T: HostPayload>(result: Result<T>) -> Value {
    match result {
        Ok(payload) => payload.into_host_payload(),
        Err(err) => {
            error!(
                status_code = err.status_code(),
                kind = err.kind(),
                classification = %err.classification(),
                "{}",
                err
            );
            json!({ "error": err.to_string() })
        }
    }
}

// ---------------------------------------------------------------------------
// Module metadata
// ---------------------------------------------------------------------------

/// Module metadata reported to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleMetadata {
    #[serde(rename = "DisplayName")]
    pub display_name: &'static str,
    #[serde(rename = "APIVersion")]
    pub api_version: &'static str,
}

pub fn metadata() -> ModuleMetadata {
    ModuleMetadata {
        display_name: "Spaceship",
        api_version: "1.0.0",
    }
}

/// Input widget type of a configuration option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOptionType {
    Text,
    Password,
    YesNo,
}

/// One configuration option the host renders for administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigOption {
    #[serde(skip)]
    pub key: &'static str,
    pub friendly_name: &'static str,
    #[serde(rename = "Type")]
    pub kind: ConfigOptionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    pub description: &'static str,
    pub default: &'static str,
}

/// Configuration options, in display order
pub fn config_options() -> Vec<ConfigOption> {
    vec![
        ConfigOption {
            key: "APIKey",
            friendly_name: "API Key",
            kind: ConfigOptionType::Text,
            size: Some(50),
            description: "Enter your Spaceship API Key",
            default: "",
        },
        ConfigOption {
            key: "APISecret",
            friendly_name: "API Secret",
            kind: ConfigOptionType::Password,
            size: Some(50),
            description: "Enter your Spaceship API Secret",
            default: "",
        },
        ConfigOption {
            key: "APIEndPoint",
            friendly_name: "API Endpoint",
            kind: ConfigOptionType::Text,
            size: Some(50),
            description: "API endpoint URL",
            default: DEFAULT_ENDPOINT,
        },
        ConfigOption {
            key: "TestMode",
            friendly_name: "Test Mode",
            kind: ConfigOptionType::YesNo,
            size: None,
            description: "Enable test mode (sandbox)",
            default: "no",
        },
        ConfigOption {
            key: "DebugMode",
            friendly_name: "Debug Mode",
            kind: ConfigOptionType::YesNo,
            size: None,
            description: "Enable debug logging",
            default: "no",
        },
    ]
}

/// Configuration options keyed by host parameter name
pub fn config_options_value() -> Value {
    let mut map = serde_json::Map::new();
    map.insert(
        "FriendlyName".to_string(),
        json!({"Type": "System", "Value": metadata().display_name}),
    );
    for option in config_options() {
        map.insert(
            option.key.to_string(),
            serde_json::to_value(&option).unwrap_or(Value::Null),
        );
    }
    Value::Object(map)
}
