//! Spaceship API client
//!
//! One async method per provider endpoint. Every method issues exactly one
//! request: there are no retries, no backoff and no caching. Domain path
//! parameters are canonicalized before they reach the URL.

use crate::http::auth::Credentials;
use crate::http::builder::RequestBuilder;
use crate::http::error::{body_read_error, transport_error};
use crate::http::normalizer::{decode, is_payloadless, normalize_response, success_marker};
use crate::http::timeout::TimeoutConfig;
use crate::normalizer::canonicalize_domain;
use crate::redaction::{redact_sensitive, redacted};
use crate::types::{
    AuthCode, AutoRenewRequest, AvailabilityBatch, AvailabilityRequest, ContactRecord,
    ContactRoles, DnsRecordList, DomainAvailability, DomainInfo, DomainList,
    EmailProtectionRequest, ListQuery, NameserverConfig, PersonalNameserver, PrivacyLevel,
    PrivacyPreferenceRequest, RegisterDomainRequest, RenewDomainRequest, SaveDnsRecordsRequest,
    SavedContact, TransferDomainRequest, TransferLockRequest,
};
use crate::{Error, Result};
use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Per-invocation client configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub timeouts: TimeoutConfig,
    /// Log request and response payloads (redacted) at DEBUG
    pub debug: bool,
}

impl ClientConfig {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }
}

/// Authenticated client for the Spaceship REST API
#[derive(Debug, Clone)]
pub struct SpaceshipClient {
    client: ReqwestClient,
    request_builder: RequestBuilder,
    config: ClientConfig,
}

impl SpaceshipClient {
    /// Create a client; fails when credentials are missing or timeouts are invalid
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        credentials.validate()?;
        config.timeouts.validate()?;

        let client = ReqwestClient::builder()
            .connect_timeout(config.timeouts.connect_timeout)
            .timeout(config.timeouts.request_timeout)
            .user_agent(format!("spaceship-core/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            request_builder: RequestBuilder::new(credentials),
            config,
        })
    }

    /// Create with default timeouts and debug logging off
    pub fn with_default_config(credentials: Credentials) -> Result<Self> {
        Self::new(credentials, ClientConfig::default())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute one request against an endpoint-relative path and normalize
    /// the response
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value> {
        let request = self.request_builder.build_request(
            &self.client,
            method.clone(),
            path,
            query,
            body.as_ref(),
        )?;

        if self.config.debug {
            let payload = body.as_ref().map(redacted).unwrap_or(Value::Null);
            debug!(
                method = %method,
                url = %request.url(),
                payload = %payload,
                "Spaceship API request"
            );
        }

        let response = self.client.execute(request).await.map_err(transport_error)?;
        let status = response.status();

        if is_payloadless(status) {
            if self.config.debug {
                debug!(status = status.as_u16(), "Spaceship API response without payload");
            }
            return Ok(success_marker());
        }

        let text = response
            .text()
            .await
            .map_err(|e| body_read_error(status, e))?;
        if self.config.debug {
            debug!(
                status = status.as_u16(),
                body = %redact_body(&text),
                "Spaceship API response"
            );
        }

        normalize_response(status, &text)
    }

    async fn send<B: Serialize>(&self, method: Method, path: &str, payload: &B) -> Result<Value> {
        let body = serde_json::to_value(payload)
            .map_err(|e| Error::protocol(format!("Failed to encode request payload: {}", e)))?;
        self.execute(method, path, &[], Some(body)).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.execute(Method::GET, path, &[], None).await
    }

    // -----------------------------------------------------------------------
    // Domains
    // -----------------------------------------------------------------------

    pub async fn get_domain_info(&self, domain: &str) -> Result<DomainInfo> {
        decode(self.get(&domain_path(domain, "")).await?)
    }

    pub async fn register_domain(
        &self,
        domain: &str,
        request: &RegisterDomainRequest,
    ) -> Result<Value> {
        self.send(Method::POST, &domain_path(domain, ""), request).await
    }

    pub async fn transfer_domain(
        &self,
        domain: &str,
        request: &TransferDomainRequest,
    ) -> Result<Value> {
        self.send(Method::POST, &domain_path(domain, "/transfer"), request)
            .await
    }

    pub async fn renew_domain(&self, domain: &str, request: &RenewDomainRequest) -> Result<Value> {
        self.send(Method::POST, &domain_path(domain, "/renew"), request)
            .await
    }

    /// Replace the nameserver configuration; returns the configuration the
    /// provider echoed back (empty when it answered without a payload)
    pub async fn update_nameservers(
        &self,
        domain: &str,
        nameservers: &NameserverConfig,
    ) -> Result<NameserverConfig> {
        decode(
            self.send(Method::PUT, &domain_path(domain, "/nameservers"), nameservers)
                .await?,
        )
    }

    pub async fn update_auto_renew(&self, domain: &str, enabled: bool) -> Result<Value> {
        let request = AutoRenewRequest { is_enabled: enabled };
        self.send(Method::PUT, &domain_path(domain, "/autorenew"), &request)
            .await
    }

    pub async fn check_domain_availability(&self, domain: &str) -> Result<DomainAvailability> {
        decode(self.get(&domain_path(domain, "/available")).await?)
    }

    pub async fn check_domains_availability(
        &self,
        domains: &[String],
    ) -> Result<AvailabilityBatch> {
        let request = AvailabilityRequest {
            domains: domains.iter().map(|d| canonicalize_domain(d)).collect(),
        };
        decode(self.send(Method::POST, "domains/available", &request).await?)
    }

    pub async fn update_contacts(&self, domain: &str, contacts: &ContactRoles) -> Result<Value> {
        self.send(Method::PUT, &domain_path(domain, "/contacts"), contacts)
            .await
    }

    pub async fn get_auth_code(&self, domain: &str) -> Result<AuthCode> {
        decode(self.get(&domain_path(domain, "/transfer/auth-code")).await?)
    }

    pub async fn update_transfer_lock(&self, domain: &str, locked: bool) -> Result<Value> {
        let request = TransferLockRequest { is_locked: locked };
        self.send(Method::PUT, &domain_path(domain, "/transfer/lock"), &request)
            .await
    }

    pub async fn get_transfer_details(&self, domain: &str) -> Result<Value> {
        self.get(&domain_path(domain, "/transfer")).await
    }

    pub async fn update_privacy_preference(
        &self,
        domain: &str,
        level: PrivacyLevel,
        user_consent: bool,
    ) -> Result<Value> {
        let request = PrivacyPreferenceRequest {
            privacy_level: level,
            user_consent,
        };
        self.send(
            Method::PUT,
            &domain_path(domain, "/privacy/preference"),
            &request,
        )
        .await
    }

    pub async fn update_email_protection_preference(
        &self,
        domain: &str,
        contact_form: bool,
    ) -> Result<Value> {
        let request = EmailProtectionRequest { contact_form };
        self.send(
            Method::PUT,
            &domain_path(domain, "/privacy/email-protection-preference"),
            &request,
        )
        .await
    }

    /// Restore a domain in redemption; sent without a body
    pub async fn restore_domain(&self, domain: &str) -> Result<Value> {
        self.execute(Method::POST, &domain_path(domain, "/restore"), &[], None)
            .await
    }

    // -----------------------------------------------------------------------
    // Personal nameservers
    // -----------------------------------------------------------------------

    pub async fn get_personal_nameservers(&self, domain: &str) -> Result<Value> {
        self.get(&domain_path(domain, "/personal-nameservers")).await
    }

    pub async fn update_personal_nameserver(
        &self,
        domain: &str,
        nameserver: &PersonalNameserver,
    ) -> Result<Value> {
        let path = domain_path(
            domain,
            &format!("/personal-nameservers/{}", canonicalize_domain(&nameserver.host)),
        );
        self.send(Method::PUT, &path, nameserver).await
    }

    pub async fn delete_personal_nameserver(&self, domain: &str, host: &str) -> Result<Value> {
        let path = domain_path(
            domain,
            &format!("/personal-nameservers/{}", canonicalize_domain(host)),
        );
        self.execute(Method::DELETE, &path, &[], None).await
    }

    pub async fn list_domains(&self, query: &ListQuery) -> Result<DomainList> {
        decode(
            self.execute(Method::GET, "domains", &query.to_query_pairs(), None)
                .await?,
        )
    }

    // -----------------------------------------------------------------------
    // Contacts
    // -----------------------------------------------------------------------

    pub async fn save_contact_details(&self, contact: &ContactRecord) -> Result<SavedContact> {
        decode(self.send(Method::PUT, "contacts", contact).await?)
    }

    pub async fn get_contact_details(&self, contact_id: &str) -> Result<Value> {
        self.get(&format!("contacts/{}", contact_id.trim())).await
    }

    pub async fn save_contact_attributes(&self, attributes: &Value) -> Result<Value> {
        self.send(Method::PUT, "contacts/attributes", attributes)
            .await
    }

    pub async fn get_contact_attributes(&self, contact_id: &str) -> Result<Value> {
        self.get(&format!("contacts/attributes/{}", contact_id.trim()))
            .await
    }

    // -----------------------------------------------------------------------
    // DNS records
    // -----------------------------------------------------------------------

    pub async fn list_dns_records(&self, domain: &str, query: &ListQuery) -> Result<DnsRecordList> {
        let path = format!("dns/records/{}", canonicalize_domain(domain));
        decode(
            self.execute(Method::GET, &path, &query.to_query_pairs(), None)
                .await?,
        )
    }

    /// Write records; `force` overrides the provider's conflict protection
    pub async fn save_dns_records(
        &self,
        domain: &str,
        records: Vec<Value>,
        force: bool,
    ) -> Result<Value> {
        let path = format!("dns/records/{}", canonicalize_domain(domain));
        let request = SaveDnsRecordsRequest {
            force,
            items: records,
        };
        self.send(Method::PUT, &path, &request).await
    }

    pub async fn delete_dns_records(&self, domain: &str, records: &[Value]) -> Result<Value> {
        let path = format!("dns/records/{}", canonicalize_domain(domain));
        self.send(Method::DELETE, &path, &records).await
    }
}

fn domain_path(domain: &str, suffix: &str) -> String {
    format!("domains/{}{}", canonicalize_domain(domain), suffix)
}

fn redact_body(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => redacted(&value).to_string(),
        Err(_) => redact_sensitive(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::auth::DEFAULT_ENDPOINT;

    #[test]
    fn test_client_requires_credentials() {
        let err = SpaceshipClient::with_default_config(Credentials::new("", "s", DEFAULT_ENDPOINT))
            .unwrap_err();
        assert_eq!(err.to_string(), "API credentials are missing.");
    }

    #[test]
    fn test_client_rejects_invalid_timeouts() {
        let config = ClientConfig::default().with_timeouts(TimeoutConfig::from_secs(10, 0));
        let err = SpaceshipClient::new(Credentials::new("k", "s", DEFAULT_ENDPOINT), config)
            .unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_client_keeps_config() {
        let config = ClientConfig::default().with_debug(true);
        let client =
            SpaceshipClient::new(Credentials::new("k", "s", DEFAULT_ENDPOINT), config).unwrap();
        assert!(client.config().debug);
    }

    #[test]
    fn test_domain_path_is_canonical() {
        assert_eq!(domain_path(" Example.COM ", "/renew"), "domains/example.com/renew");
        assert_eq!(domain_path("example.com", ""), "domains/example.com");
    }

    #[test]
    fn test_debug_body_redaction() {
        let out = redact_body(r#"{"authCode":"EPP-SECRET","expires":"2026-01-01"}"#);
        assert!(!out.contains("EPP-SECRET"));
        assert!(out.contains("2026-01-01"));
        assert_eq!(redact_body("plain text"), "plain text");
    }
}
