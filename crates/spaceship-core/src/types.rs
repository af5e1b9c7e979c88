//! Schema types for Spaceship API payloads
//!
//! Field names follow the provider's camelCase wire format. Response types
//! default every field so that partial bodies (and the `{"success": true}`
//! marker) still decode; request types serialize exactly what the provider
//! expects.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// EPP status flag that marks a domain as transfer-locked
pub const CLIENT_TRANSFER_PROHIBITED: &str = "clientTransferProhibited";

/// Nameserver provider value for host-supplied nameservers
pub const CUSTOM_NAMESERVER_PROVIDER: &str = "custom";

/// Nameserver provider value for Spaceship-managed DNS
pub const BASIC_NAMESERVER_PROVIDER: &str = "basic";

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Domain info
// ---------------------------------------------------------------------------

/// Domain details as returned by `GET domains/{domain}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainInfo {
    pub name: String,
    pub unicode_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_premium: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub auto_renew: bool,
    pub registration_date: Option<String>,
    pub expiration_date: Option<String>,
    pub lifecycle_status: Option<String>,
    pub verification_status: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub epp_statuses: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub suspensions: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub privacy_protection: PrivacyProtection,
    #[serde(deserialize_with = "null_as_default")]
    pub nameservers: NameserverConfig,
    pub contacts: Option<Value>,
}

impl DomainInfo {
    /// Whether the registry-level transfer lock is set
    pub fn is_transfer_locked(&self) -> bool {
        self.epp_statuses
            .iter()
            .any(|status| status == CLIENT_TRANSFER_PROHIBITED)
    }
}

/// WHOIS privacy state of a domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyProtection {
    pub level: Option<String>,
    pub user_consent: Option<bool>,
    pub contact_form: Option<bool>,
}

/// Nameserver configuration, used both in responses and in update requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NameserverConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub hosts: Vec<String>,
}

impl NameserverConfig {
    /// Update payload assigning host-supplied nameservers
    pub fn custom(hosts: Vec<String>) -> Self {
        Self {
            provider: Some(CUSTOM_NAMESERVER_PROVIDER.to_string()),
            hosts,
        }
    }
}

/// One page of `GET domains`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainList {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<DomainInfo>,
    pub total: u64,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Provider lifecycle status vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Registered,
    Expired,
    Deleted,
    Pending,
    Redemption,
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Registered => "registered",
            LifecycleStatus::Expired => "expired",
            LifecycleStatus::Deleted => "deleted",
            LifecycleStatus::Pending => "pending",
            LifecycleStatus::Redemption => "redemption",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// Contact record sent to `PUT contacts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address1: String,
    pub city: String,
    pub country: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
}

impl ContactRecord {
    /// Required fields in declared order, paired with their wire names
    pub fn required_fields(&self) -> [(&'static str, &str); 7] {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("address1", &self.address1),
            ("city", &self.city),
            ("country", &self.country),
            ("phone", &self.phone),
        ]
    }
}

/// Response of `PUT contacts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedContact {
    pub contact_id: Option<String>,
}

/// Contact identifiers for the four domain roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRoles {
    pub registrant: String,
    pub admin: String,
    pub tech: String,
    pub billing: String,
    #[serde(default)]
    pub attributes: Vec<Value>,
}

impl ContactRoles {
    /// Use one contact for every role
    pub fn single(contact_id: &str) -> Self {
        Self {
            registrant: contact_id.to_string(),
            admin: contact_id.to_string(),
            tech: contact_id.to_string(),
            billing: contact_id.to_string(),
            attributes: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Registration, transfer, renewal
// ---------------------------------------------------------------------------

/// WHOIS privacy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    Public,
    High,
}

impl PrivacyLevel {
    /// `high` when the host requested ID protection, `public` otherwise
    pub fn from_id_protection(enabled: bool) -> Self {
        if enabled {
            PrivacyLevel::High
        } else {
            PrivacyLevel::Public
        }
    }
}

/// Privacy settings embedded in registration and transfer requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub level: PrivacyLevel,
    pub user_consent: bool,
}

/// Body of `POST domains/{domain}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDomainRequest {
    pub auto_renew: bool,
    pub years: u32,
    pub privacy_protection: PrivacySettings,
    pub contacts: ContactRoles,
}

/// Body of `POST domains/{domain}/transfer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDomainRequest {
    pub auto_renew: bool,
    pub privacy_protection: PrivacySettings,
    pub contacts: ContactRoles,
    pub auth_code: String,
}

/// Body of `POST domains/{domain}/renew`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewDomainRequest {
    pub years: u32,
    pub current_expiration_date: String,
}

// ---------------------------------------------------------------------------
// Small preference payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRenewRequest {
    pub is_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLockRequest {
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPreferenceRequest {
    pub privacy_level: PrivacyLevel,
    pub user_consent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailProtectionRequest {
    pub contact_form: bool,
}

/// Response of `GET domains/{domain}/transfer/auth-code`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthCode {
    pub auth_code: Option<String>,
    pub expires: Option<String>,
}

/// Glue record configuration for `PUT domains/{domain}/personal-nameservers/{host}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalNameserver {
    pub host: String,
    pub ips: Vec<String>,
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Body of `POST domains/available`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub domains: Vec<String>,
}

/// Availability of a single name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainAvailability {
    pub domain: String,
    pub result: String,
    #[serde(deserialize_with = "null_as_default")]
    pub premium_pricing: Vec<Value>,
}

impl DomainAvailability {
    pub fn is_available(&self) -> bool {
        self.result == "available"
    }
}

/// Response of `POST domains/available`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityBatch {
    #[serde(deserialize_with = "null_as_default")]
    pub domains: Vec<DomainAvailability>,
}

// ---------------------------------------------------------------------------
// Listing and DNS
// ---------------------------------------------------------------------------

/// Paging for list endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub take: u32,
    pub skip: u32,
    /// Sort keys; sent as a repeated `orderBy` parameter
    pub order_by: Vec<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            take: 50,
            skip: 0,
            order_by: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("take".to_string(), self.take.to_string()),
            ("skip".to_string(), self.skip.to_string()),
        ];
        pairs.extend(
            self.order_by
                .iter()
                .map(|key| ("orderBy".to_string(), key.clone())),
        );
        pairs
    }
}

/// Body of `PUT dns/records/{domain}`; records are passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDnsRecordsRequest {
    pub force: bool,
    pub items: Vec<Value>,
}

/// One page of `GET dns/records/{domain}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsRecordList {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Value>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_domain_info_decoding() {
        let info: DomainInfo = serde_json::from_value(json!({
            "name": "example.com",
            "expirationDate": "2026-05-01T10:00:00.000Z",
            "lifecycleStatus": "registered",
            "verificationStatus": "success",
            "eppStatuses": ["clientTransferProhibited"],
            "privacyProtection": {"level": "high", "contactForm": true},
            "nameservers": {"provider": "custom", "hosts": ["ns1.x.com", "ns2.x.com"]},
            "unknownField": 42
        }))
        .unwrap();

        assert_eq!(info.name, "example.com");
        assert!(info.is_transfer_locked());
        assert_eq!(info.privacy_protection.level.as_deref(), Some("high"));
        assert_eq!(info.privacy_protection.contact_form, Some(true));
        assert_eq!(info.nameservers.hosts.len(), 2);
    }

    #[test]
    fn test_domain_info_tolerates_nulls_and_marker() {
        let info: DomainInfo = serde_json::from_value(json!({
            "name": "example.com",
            "eppStatuses": null,
            "nameservers": null,
            "privacyProtection": null
        }))
        .unwrap();
        assert!(!info.is_transfer_locked());
        assert!(info.nameservers.hosts.is_empty());

        let marker: DomainInfo = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(marker, DomainInfo::default());
    }

    #[test]
    fn test_register_request_wire_format() {
        let request = RegisterDomainRequest {
            auto_renew: false,
            years: 2,
            privacy_protection: PrivacySettings {
                level: PrivacyLevel::from_id_protection(true),
                user_consent: true,
            },
            contacts: ContactRoles::single("c-1"),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "autoRenew": false,
                "years": 2,
                "privacyProtection": {"level": "high", "userConsent": true},
                "contacts": {
                    "registrant": "c-1",
                    "admin": "c-1",
                    "tech": "c-1",
                    "billing": "c-1",
                    "attributes": []
                }
            })
        );
    }

    #[test]
    fn test_contact_record_omits_absent_optionals() {
        let record = ContactRecord {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address1: "1 Main St".to_string(),
            city: "London".to_string(),
            country: "GB".to_string(),
            phone: "+44.2071234567".to_string(),
            postal_code: Some("N1".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["postalCode"], "N1");
        assert!(value.get("organization").is_none());
        assert!(value.get("fax").is_none());
    }

    #[test]
    fn test_nameserver_update_payload() {
        let payload = NameserverConfig::custom(vec!["ns1.x.com".into(), "ns2.x.com".into()]);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"provider": "custom", "hosts": ["ns1.x.com", "ns2.x.com"]})
        );
    }

    #[test]
    fn test_list_query_pairs() {
        let query = ListQuery {
            take: 10,
            skip: 20,
            order_by: vec!["name".to_string()],
        };
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("take".to_string(), "10".to_string()),
                ("skip".to_string(), "20".to_string()),
                ("orderBy".to_string(), "name".to_string()),
            ]
        );
    }

    #[test]
    fn test_lifecycle_status_wire_names() {
        assert_eq!(
            serde_json::to_value(LifecycleStatus::Redemption).unwrap(),
            json!("redemption")
        );
        assert_eq!(LifecycleStatus::Deleted.to_string(), "deleted");
    }
}
