//! Registrar operations composed from Spaceship API calls
//!
//! Each operation takes the host's parameters, normalizes them, runs one or
//! more sequential API calls and returns a typed outcome. Outcomes convert to
//! the host's payload shape through [`HostPayload`].
//!
//! Contacts created before a later step fails are left in place; the provider
//! has no transactional API for them.

use crate::host::{HostParams, HostPayload};
use crate::http::{ClientConfig, SpaceshipClient, TimeoutConfig};
use crate::normalizer::{
    nameservers_to_map, parse_expiration_date, validate_contact_data, DomainName,
};
use crate::types::{
    ContactRoles, DomainAvailability, NameserverConfig, PrivacyLevel, PrivacySettings,
    RegisterDomainRequest, RenewDomainRequest, TransferDomainRequest, BASIC_NAMESERVER_PROVIDER,
};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{debug, error, info, instrument, warn, Span};

/// Fixed answer for deletion requests
pub const DELETE_UNSUPPORTED: &str = "Domain deletion must be done directly in Spaceship account";

const INVALID_EXPIRATION: &str = "Invalid expiration date format.";

/// Per-invocation orchestrator settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrarSettings {
    pub timeouts: TimeoutConfig,
    /// Debug payload logging; also enabled by the host's `DebugMode`
    pub debug: bool,
    /// Fail registration when the follow-up nameserver call fails
    pub strict_nameservers: bool,
}

/// Runs registrar operations against one Spaceship account
#[derive(Debug, Clone)]
pub struct Registrar {
    client: SpaceshipClient,
    settings: RegistrarSettings,
}

impl Registrar {
    /// Build a registrar from the host's credentials.
    ///
    /// Fails with `API credentials are missing.` when the key, secret or
    /// endpoint is empty.
    pub fn from_params(params: &HostParams, settings: RegistrarSettings) -> Result<Self> {
        let config = ClientConfig::default()
            .with_timeouts(settings.timeouts)
            .with_debug(settings.debug || params.debug_mode);
        let client = SpaceshipClient::new(params.credentials(), config)?;
        Ok(Self::new(client, settings))
    }

    pub fn new(client: SpaceshipClient, settings: RegistrarSettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &SpaceshipClient {
        &self.client
    }

    pub fn settings(&self) -> &RegistrarSettings {
        &self.settings
    }

    /// Create a contact, register the domain with it in every role, then
    /// assign nameservers when at least two were supplied
    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn register_domain(&self, params: &HostParams) -> Result<RegistrationOutcome> {
        let domain = target_domain(params)?;
        let contact_id = self.create_contact(params).await?;

        let request = RegisterDomainRequest {
            auto_renew: false,
            years: params.registration_years(),
            privacy_protection: privacy_settings(params.idprotection),
            contacts: ContactRoles::single(&contact_id),
        };
        self.client.register_domain(domain.as_str(), &request).await?;
        info!(contact_id = %contact_id, years = request.years, "Domain registration submitted");

        let nameservers = self
            .assign_nameservers(&domain, params.nameservers())
            .await?;

        Ok(RegistrationOutcome {
            domain,
            contact_id,
            nameservers,
        })
    }

    /// Create a contact and request an inbound transfer with the EPP code
    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn transfer_domain(&self, params: &HostParams) -> Result<TransferOutcome> {
        let domain = target_domain(params)?;
        let contact_id = self.create_contact(params).await?;

        let request = TransferDomainRequest {
            auto_renew: false,
            privacy_protection: privacy_settings(params.idprotection),
            contacts: ContactRoles::single(&contact_id),
            auth_code: params.epp_code(),
        };
        self.client.transfer_domain(domain.as_str(), &request).await?;
        info!(contact_id = %contact_id, "Domain transfer submitted");

        Ok(TransferOutcome { domain, contact_id })
    }

    /// Renew against the expiration date the provider currently reports
    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn renew_domain(&self, params: &HostParams) -> Result<RenewalOutcome> {
        let domain = target_domain(params)?;
        let info = self.client.get_domain_info(domain.as_str()).await?;

        let current_expiration_date = info
            .expiration_date
            .filter(|date| !date.trim().is_empty())
            .ok_or_else(|| Error::protocol("No expiration date returned from API"))?;

        let request = RenewDomainRequest {
            years: params.registration_years(),
            current_expiration_date,
        };
        self.client.renew_domain(domain.as_str(), &request).await?;
        info!(years = request.years, "Domain renewal submitted");

        Ok(RenewalOutcome {
            domain,
            years: request.years,
            previous_expiration_date: request.current_expiration_date,
        })
    }

    /// Report the provider's expiration date for the host's records
    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn sync(&self, params: &HostParams) -> Result<SyncStatus> {
        let domain = target_domain(params)?;
        let info = self.client.get_domain_info(domain.as_str()).await?;

        let expiry_date = info
            .expiration_date
            .as_deref()
            .and_then(parse_expiration_date)
            .ok_or_else(|| Error::date_format(INVALID_EXPIRATION))?;

        Ok(SyncStatus {
            expiry_date: expiry_date.date_naive(),
            active: true,
            expired: false,
        })
    }

    /// Fetch domain details and reshape them into a [`DomainStatus`].
    ///
    /// An unparseable expiration date is logged and left unset.
    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn get_domain_information(&self, params: &HostParams) -> Result<DomainStatus> {
        let domain = target_domain(params)?;
        let info = self.client.get_domain_info(domain.as_str()).await?;

        let expiry_date = match info.expiration_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let parsed = parse_expiration_date(raw);
                if parsed.is_none() {
                    error!(expiration_date = raw, "Invalid expiration date format");
                }
                parsed
            }
            _ => None,
        };

        Ok(DomainStatus {
            domain: info.name.clone(),
            nameservers: nameservers_to_map(&info.nameservers.hosts),
            registration_status: info
                .verification_status
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            transfer_lock: info.is_transfer_locked(),
            expiry_date,
            restorable: info.lifecycle_status.as_deref() == Some("redemption"),
            id_protection: info.privacy_protection.level.as_deref() == Some("high"),
            dns_management: info.nameservers.provider.as_deref()
                == Some(BASIC_NAMESERVER_PROVIDER),
            email_forwarding: info.privacy_protection.contact_form.unwrap_or(false),
        })
    }

    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn get_registrar_lock(&self, params: &HostParams) -> Result<LockState> {
        let domain = target_domain(params)?;
        let info = self.client.get_domain_info(domain.as_str()).await?;
        Ok(LockState::from_locked(info.is_transfer_locked()))
    }

    /// Flip the transfer lock.
    ///
    /// Reads the current state and writes its negation, so two concurrent
    /// toggles can both act on the same stale read.
    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn save_registrar_lock(&self, params: &HostParams) -> Result<LockChange> {
        let domain = target_domain(params)?;
        let info = self.client.get_domain_info(domain.as_str()).await?;
        let previous = LockState::from_locked(info.is_transfer_locked());
        let current = previous.toggled();

        self.client
            .update_transfer_lock(domain.as_str(), current.is_locked())
            .await?;
        info!(previous = %previous, current = %current, "Transfer lock updated");

        Ok(LockChange { previous, current })
    }

    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn get_nameservers(&self, params: &HostParams) -> Result<NameserverMap> {
        let domain = target_domain(params)?;
        let info = self.client.get_domain_info(domain.as_str()).await?;
        Ok(NameserverMap(nameservers_to_map(&info.nameservers.hosts)))
    }

    /// Replace the domain's nameservers with the host-supplied set.
    ///
    /// Returns the hosts the provider echoed, or the submitted ones when the
    /// provider answered without a payload.
    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn save_nameservers(&self, params: &HostParams) -> Result<NameserverMap> {
        let domain = target_domain(params)?;
        let hosts = params.nameservers();
        if hosts.is_empty() {
            return Err(Error::validation("No nameservers provided"));
        }

        let echoed = self
            .client
            .update_nameservers(domain.as_str(), &NameserverConfig::custom(hosts.clone()))
            .await?;

        let applied = if echoed.hosts.is_empty() {
            hosts
        } else {
            echoed.hosts
        };
        Ok(NameserverMap(nameservers_to_map(&applied)))
    }

    #[instrument(skip_all, fields(domain = tracing::field::Empty))]
    pub async fn get_epp_code(&self, params: &HostParams) -> Result<EppCode> {
        let domain = target_domain(params)?;
        let auth = self.client.get_auth_code(domain.as_str()).await?;
        auth.auth_code
            .map(|eppcode| EppCode { eppcode })
            .ok_or_else(|| Error::protocol("No auth code returned from API"))
    }

    /// Availability of one or more names; one name uses the single-domain
    /// endpoint, several use the bulk endpoint
    #[instrument(skip(self), fields(count = domains.len()))]
    pub async fn check_availability(&self, domains: &[String]) -> Result<Vec<DomainAvailability>> {
        match domains {
            [] => Err(Error::validation("No domains provided")),
            [domain] => Ok(vec![self.client.check_domain_availability(domain).await?]),
            _ => Ok(self.client.check_domains_availability(domains).await?.domains),
        }
    }

    async fn create_contact(&self, params: &HostParams) -> Result<String> {
        let contact = validate_contact_data(&params.contact_record())?;
        let saved = self
            .client
            .save_contact_details(&contact)
            .await
            .map_err(|e| e.with_context("Failed to create contact"))?;

        let contact_id = saved
            .contact_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::protocol("No contact ID returned from API"))?;
        debug!(contact_id = %contact_id, "Contact created");
        Ok(contact_id)
    }

    async fn assign_nameservers(
        &self,
        domain: &DomainName,
        hosts: Vec<String>,
    ) -> Result<NameserverAssignment> {
        if hosts.len() < 2 {
            return Ok(NameserverAssignment::Skipped);
        }

        match self
            .client
            .update_nameservers(domain.as_str(), &NameserverConfig::custom(hosts.clone()))
            .await
        {
            Ok(_) => Ok(NameserverAssignment::Assigned(hosts)),
            Err(err) if self.settings.strict_nameservers => {
                Err(err.with_context("Failed to set nameservers"))
            }
            Err(err) => {
                warn!(
                    status_code = err.status_code(),
                    "Nameserver assignment failed after registration: {}",
                    err
                );
                Ok(NameserverAssignment::Failed(err.to_string()))
            }
        }
    }
}

/// Deletion is not offered through the API
pub fn request_delete() -> Result<Value> {
    Err(Error::unsupported(DELETE_UNSUPPORTED))
}

/// TLD pricing is not synced from the provider
pub fn get_tld_pricing() -> Result<Value> {
    Ok(Value::Array(Vec::new()))
}

fn target_domain(params: &HostParams) -> Result<DomainName> {
    let domain = params.domain()?;
    Span::current().record("domain", domain.as_str());
    Ok(domain)
}

fn privacy_settings(id_protection: bool) -> PrivacySettings {
    PrivacySettings {
        level: PrivacyLevel::from_id_protection(id_protection),
        user_consent: true,
    }
}

fn success() -> Value {
    json!({ "success": true })
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to the nameservers supplied with a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameserverAssignment {
    /// Fewer than two nameservers were supplied
    Skipped,
    Assigned(Vec<String>),
    /// The domain was registered but the nameserver call failed
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub domain: DomainName,
    pub contact_id: String,
    pub nameservers: NameserverAssignment,
}

impl HostPayload for RegistrationOutcome {
    fn into_host_payload(self) -> Value {
        match self.nameservers {
            NameserverAssignment::Failed(message) => json!({
                "success": true,
                "warning": format!("Nameservers could not be set: {}", message),
            }),
            _ => success(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub domain: DomainName,
    pub contact_id: String,
}

impl HostPayload for TransferOutcome {
    fn into_host_payload(self) -> Value {
        success()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewalOutcome {
    pub domain: DomainName,
    pub years: u32,
    pub previous_expiration_date: String,
}

impl HostPayload for RenewalOutcome {
    fn into_host_payload(self) -> Value {
        success()
    }
}

/// Expiry information reported by a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    pub expiry_date: NaiveDate,
    pub active: bool,
    pub expired: bool,
}

impl HostPayload for SyncStatus {
    fn into_host_payload(self) -> Value {
        json!({
            "expirydate": self.expiry_date.format("%Y-%m-%d").to_string(),
            "active": self.active,
            "expired": self.expired,
        })
    }
}

/// Domain details in the host's vocabulary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStatus {
    pub domain: String,
    pub nameservers: BTreeMap<String, String>,
    pub registration_status: String,
    pub transfer_lock: bool,
    pub expiry_date: Option<DateTime<Utc>>,
    pub restorable: bool,
    pub id_protection: bool,
    pub dns_management: bool,
    pub email_forwarding: bool,
}

impl HostPayload for DomainStatus {
    fn into_host_payload(self) -> Value {
        serde_json::to_value(&self).unwrap_or_else(|e| json!({ "error": e.to_string() }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocked,
}

impl LockState {
    pub fn from_locked(locked: bool) -> Self {
        if locked {
            LockState::Locked
        } else {
            LockState::Unlocked
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked)
    }

    pub fn toggled(&self) -> Self {
        Self::from_locked(!self.is_locked())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Locked => "locked",
            LockState::Unlocked => "unlocked",
        }
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HostPayload for LockState {
    fn into_host_payload(self) -> Value {
        Value::String(self.as_str().to_string())
    }
}

/// Result of a lock toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockChange {
    pub previous: LockState,
    pub current: LockState,
}

impl HostPayload for LockChange {
    fn into_host_payload(self) -> Value {
        success()
    }
}

/// Nameservers keyed `ns1`, `ns2`, ...
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameserverMap(pub BTreeMap<String, String>);

impl HostPayload for NameserverMap {
    fn into_host_payload(self) -> Value {
        Value::Object(
            self.0
                .into_iter()
                .map(|(key, host)| (key, Value::String(host)))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EppCode {
    pub eppcode: String,
}

impl HostPayload for EppCode {
    fn into_host_payload(self) -> Value {
        json!({ "eppcode": self.eppcode })
    }
}

impl HostPayload for Vec<DomainAvailability> {
    fn into_host_payload(self) -> Value {
        Value::Array(
            self.into_iter()
                .map(|entry| {
                    json!({
                        "domain": entry.domain,
                        "available": entry.is_available(),
                        "result": entry.result,
                    })
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::into_host_value;

    #[test]
    fn test_missing_credentials() {
        let params = HostParams::from_value(json!({"APIKey": "k", "APISecret": ""})).unwrap();
        let err = Registrar::from_params(&params, RegistrarSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "API credentials are missing.");
    }

    #[test]
    fn test_debug_mode_is_invocation_scoped() {
        let params =
            HostParams::from_value(json!({"APIKey": "k", "APISecret": "s", "DebugMode": "on"}))
                .unwrap();
        let registrar = Registrar::from_params(&params, RegistrarSettings::default()).unwrap();
        assert!(registrar.client().config().debug);

        let params = HostParams::from_value(json!({"APIKey": "k", "APISecret": "s"})).unwrap();
        let registrar = Registrar::from_params(&params, RegistrarSettings::default()).unwrap();
        assert!(!registrar.client().config().debug);
    }

    #[test]
    fn test_request_delete_and_pricing() {
        assert_eq!(
            into_host_value(request_delete()),
            json!({"error": DELETE_UNSUPPORTED})
        );
        assert_eq!(into_host_value(get_tld_pricing()), json!([]));
    }

    #[test]
    fn test_registration_payload_with_warning() {
        let outcome = RegistrationOutcome {
            domain: DomainName::new("example.com"),
            contact_id: "c-1".to_string(),
            nameservers: NameserverAssignment::Failed("Invalid host".to_string()),
        };
        assert_eq!(
            outcome.into_host_payload(),
            json!({"success": true, "warning": "Nameservers could not be set: Invalid host"})
        );
    }

    #[test]
    fn test_sync_payload() {
        let status = SyncStatus {
            expiry_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            active: true,
            expired: false,
        };
        assert_eq!(
            status.into_host_payload(),
            json!({"expirydate": "2026-05-01", "active": true, "expired": false})
        );
    }

    #[test]
    fn test_lock_state() {
        assert_eq!(LockState::Locked.toggled(), LockState::Unlocked);
        assert_eq!(LockState::from_locked(false).into_host_payload(), json!("unlocked"));
    }

    #[test]
    fn test_nameserver_map_payload() {
        let map = NameserverMap(nameservers_to_map(&["a.x.com".to_string()]));
        assert_eq!(map.into_host_payload(), json!({"ns1": "a.x.com"}));
    }
}
