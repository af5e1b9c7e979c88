//! End-to-end registrar operations against a mocked Spaceship API

use httpmock::prelude::*;
use serde_json::{json, Value};
use spaceship_core::registrar::{get_tld_pricing, request_delete, LockState};
use spaceship_core::{
    into_host_value, HostParams, NameserverAssignment, Registrar, RegistrarSettings,
};

fn params(server: &MockServer, extra: Value) -> HostParams {
    let mut base = json!({
        "APIKey": "key-123",
        "APISecret": "secret-456",
        "APIEndPoint": server.url("/api/v1"),
        "domainname": "Example.COM",
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": "ada@example.com",
        "address1": "1 Main St",
        "city": "London",
        "countrycode": "gb",
        "phonenumber": "20 7123 4567",
        "phonecc": "44"
    });
    if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }
    HostParams::from_value(base).unwrap()
}

fn registrar(params: &HostParams, settings: RegistrarSettings) -> Registrar {
    Registrar::from_params(params, settings).unwrap()
}

fn expected_contact() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "address1": "1 Main St",
        "city": "London",
        "country": "GB",
        "phone": "+44.2071234567"
    })
}

#[tokio::test]
async fn test_register_domain_full_flow() {
    let server = MockServer::start_async().await;
    let contact = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/v1/contacts")
                .json_body(expected_contact());
            then.status(200).json_body(json!({"contactId": "c-42"}));
        })
        .await;
    let register = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/domains/example.com")
                .json_body(json!({
                    "autoRenew": false,
                    "years": 2,
                    "privacyProtection": {"level": "high", "userConsent": true},
                    "contacts": {
                        "registrant": "c-42",
                        "admin": "c-42",
                        "tech": "c-42",
                        "billing": "c-42",
                        "attributes": []
                    }
                }));
            then.status(202);
        })
        .await;
    let nameservers = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/v1/domains/example.com/nameservers")
                .json_body(json!({"provider": "custom", "hosts": ["ns1.x.com", "ns2.x.com"]}));
            then.status(200)
                .json_body(json!({"provider": "custom", "hosts": ["ns1.x.com", "ns2.x.com"]}));
        })
        .await;

    let params = params(
        &server,
        json!({"regperiod": "2", "idprotection": "on", "ns1": "ns1.x.com", "ns2": "ns2.x.com"}),
    );
    let outcome = registrar(&params, RegistrarSettings::default())
        .register_domain(&params)
        .await
        .unwrap();

    contact.assert_async().await;
    register.assert_async().await;
    nameservers.assert_async().await;
    assert_eq!(outcome.contact_id, "c-42");
    assert_eq!(
        outcome.nameservers,
        NameserverAssignment::Assigned(vec!["ns1.x.com".into(), "ns2.x.com".into()])
    );
    assert_eq!(into_host_value(Ok(outcome)), json!({"success": true}));
}

#[tokio::test]
async fn test_register_skips_nameservers_below_two() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/contacts");
            then.status(200).json_body(json!({"contactId": "c-1"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/domains/example.com");
            then.status(202);
        })
        .await;
    let nameservers = server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/domains/example.com/nameservers");
            then.status(200);
        })
        .await;

    let params = params(&server, json!({"ns1": "ns1.x.com"}));
    let outcome = registrar(&params, RegistrarSettings::default())
        .register_domain(&params)
        .await
        .unwrap();

    nameservers.assert_hits_async(0).await;
    assert_eq!(outcome.nameservers, NameserverAssignment::Skipped);
}

#[tokio::test]
async fn test_register_nameserver_failure_is_observable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/contacts");
            then.status(200).json_body(json!({"contactId": "c-1"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/domains/example.com");
            then.status(202);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/domains/example.com/nameservers");
            then.status(422).json_body(json!({"detail": "Invalid nameserver"}));
        })
        .await;

    let params = params(&server, json!({"ns1": "ns1.x.com", "ns2": "bad"}));

    let outcome = registrar(&params, RegistrarSettings::default())
        .register_domain(&params)
        .await
        .unwrap();
    assert_eq!(
        into_host_value(Ok(outcome)),
        json!({"success": true, "warning": "Nameservers could not be set: Invalid nameserver"})
    );

    let strict = RegistrarSettings {
        strict_nameservers: true,
        ..Default::default()
    };
    let err = registrar(&params, strict)
        .register_domain(&params)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert_eq!(err.to_string(), "Failed to set nameservers: Invalid nameserver");
}

#[tokio::test]
async fn test_contact_failure_aborts_registration() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/contacts");
            then.status(422).json_body(json!({"detail": "Invalid email address"}));
        })
        .await;
    let register = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/domains/example.com");
            then.status(202);
        })
        .await;

    let params = params(&server, json!({}));
    let result = registrar(&params, RegistrarSettings::default())
        .register_domain(&params)
        .await;

    register.assert_hits_async(0).await;
    assert_eq!(
        into_host_value(result),
        json!({"error": "Failed to create contact: Invalid email address"})
    );
}

#[tokio::test]
async fn test_missing_contact_id() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/contacts");
            then.status(204);
        })
        .await;

    let params = params(&server, json!({}));
    let err = registrar(&params, RegistrarSettings::default())
        .register_domain(&params)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No contact ID returned from API");
    assert_eq!(err.kind(), "protocol");
}

#[tokio::test]
async fn test_invalid_contact_never_reaches_provider() {
    let server = MockServer::start_async().await;
    let contact = server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/contacts");
            then.status(200).json_body(json!({"contactId": "c-1"}));
        })
        .await;

    let params = params(&server, json!({"email": "", "city": ""}));
    let err = registrar(&params, RegistrarSettings::default())
        .register_domain(&params)
        .await
        .unwrap_err();

    contact.assert_hits_async(0).await;
    assert_eq!(err.to_string(), "Missing required field: email");
}

#[tokio::test]
async fn test_transfer_domain_payload() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/contacts");
            then.status(200).json_body(json!({"contactId": "c-7"}));
        })
        .await;
    let transfer = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/domains/example.com/transfer")
                .json_body(json!({
                    "autoRenew": false,
                    "privacyProtection": {"level": "public", "userConsent": true},
                    "contacts": {
                        "registrant": "c-7",
                        "admin": "c-7",
                        "tech": "c-7",
                        "billing": "c-7",
                        "attributes": []
                    },
                    "authCode": "EPP-SECRET"
                }));
            then.status(202);
        })
        .await;

    let params = params(&server, json!({"eppcode": "EPP-SECRET"}));
    let outcome = registrar(&params, RegistrarSettings::default())
        .transfer_domain(&params)
        .await
        .unwrap();

    transfer.assert_async().await;
    assert_eq!(outcome.contact_id, "c-7");
}

#[tokio::test]
async fn test_renew_sends_current_expiration() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/domains/example.com");
            then.status(200).json_body(json!({
                "name": "example.com",
                "expirationDate": "2026-05-01T10:00:00.000Z"
            }));
        })
        .await;
    let renew = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/domains/example.com/renew")
                .json_body(json!({
                    "years": 3,
                    "currentExpirationDate": "2026-05-01T10:00:00.000Z"
                }));
            then.status(202);
        })
        .await;

    let params = params(&server, json!({"regperiod": 3}));
    let outcome = registrar(&params, RegistrarSettings::default())
        .renew_domain(&params)
        .await
        .unwrap();

    renew.assert_async().await;
    assert_eq!(outcome.years, 3);
    assert_eq!(into_host_value(Ok(outcome)), json!({"success": true}));
}

#[tokio::test]
async fn test_sync_reports_expiry() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/domains/example.com");
            then.status(200)
                .json_body(json!({
                    "name": "example.com",
                    "expirationDate": "2027-01-15T08:30:00Z"
                }));
        })
        .await;

    let params = params(&server, json!({}));
    let result = registrar(&params, RegistrarSettings::default())
        .sync(&params)
        .await;
    assert_eq!(
        into_host_value(result),
        json!({"expirydate": "2027-01-15", "active": true, "expired": false})
    );
}

#[tokio::test]
async fn test_sync_with_unparseable_date() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/domains/example.com");
            then.status(200)
                .json_body(json!({"name": "example.com", "expirationDate": "not-a-date"}));
        })
        .await;

    let params = params(&server, json!({}));
    let result = registrar(&params, RegistrarSettings::default())
        .sync(&params)
        .await;
    assert_eq!(
        into_host_value(result),
        json!({"error": "Invalid expiration date format."})
    );
}

#[tokio::test]
async fn test_domain_information_reshaping() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/domains/example.com");
            then.status(200).json_body(json!({
                "name": "example.com",
                "expirationDate": "garbage",
                "lifecycleStatus": "redemption",
                "verificationStatus": "success",
                "eppStatuses": ["clientTransferProhibited", "clientDeleteProhibited"],
                "privacyProtection": {"level": "high", "contactForm": true},
                "nameservers": {"provider": "basic", "hosts": ["a.ns.com", "b.ns.com"]}
            }));
        })
        .await;

    let params = params(&server, json!({}));
    let status = registrar(&params, RegistrarSettings::default())
        .get_domain_information(&params)
        .await
        .unwrap();

    assert_eq!(status.domain, "example.com");
    assert_eq!(status.registration_status, "success");
    assert!(status.transfer_lock);
    assert!(status.restorable);
    assert!(status.id_protection);
    assert!(status.dns_management);
    assert!(status.email_forwarding);
    assert!(status.expiry_date.is_none());
    assert_eq!(status.nameservers.get("ns2").map(String::as_str), Some("b.ns.com"));
}

#[tokio::test]
async fn test_domain_information_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/domains/example.com");
            then.status(404).json_body(json!({"detail": "Domain not found"}));
        })
        .await;

    let params = params(&server, json!({}));
    let err = registrar(&params, RegistrarSettings::default())
        .get_domain_information(&params)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_string(), "Domain not found");
}

#[tokio::test]
async fn test_lock_query_and_toggle() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/domains/example.com");
            then.status(200).json_body(json!({
                "name": "example.com",
                "eppStatuses": ["clientTransferProhibited"]
            }));
        })
        .await;
    let lock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/v1/domains/example.com/transfer/lock")
                .json_body(json!({"isLocked": false}));
            then.status(204);
        })
        .await;

    let params = params(&server, json!({}));
    let registrar = registrar(&params, RegistrarSettings::default());

    let state = registrar.get_registrar_lock(&params).await.unwrap();
    assert_eq!(state, LockState::Locked);
    assert_eq!(into_host_value(Ok(state)), json!("locked"));

    let change = registrar.save_registrar_lock(&params).await.unwrap();
    lock.assert_async().await;
    assert_eq!(change.current, LockState::Unlocked);
    assert_eq!(into_host_value(Ok(change)), json!({"success": true}));
}

#[tokio::test]
async fn test_nameserver_query_and_save() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/domains/example.com");
            then.status(200).json_body(json!({
                "name": "example.com",
                "nameservers": {"provider": "custom", "hosts": ["ns1.a.com", "ns2.a.com"]}
            }));
        })
        .await;
    let save = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/v1/domains/example.com/nameservers")
                .json_body(json!({
                    "provider": "custom",
                    "hosts": ["ns1.b.com", "ns2.b.com", "ns3.b.com"]
                }));
            then.status(204);
        })
        .await;

    let query = params(&server, json!({}));
    let registrar = registrar(&query, RegistrarSettings::default());
    let current = registrar.get_nameservers(&query).await.unwrap();
    assert_eq!(
        into_host_value(Ok(current)),
        json!({"ns1": "ns1.a.com", "ns2": "ns2.a.com"})
    );

    let update = params(
        &server,
        json!({"ns1": "ns1.b.com", "ns2": "ns2.b.com", "ns3": "ns3.b.com", "ns4": ""}),
    );
    let saved = registrar.save_nameservers(&update).await.unwrap();
    save.assert_async().await;
    assert_eq!(saved.0.len(), 3);
    assert_eq!(saved.0.get("ns3").map(String::as_str), Some("ns3.b.com"));
}

#[tokio::test]
async fn test_save_nameservers_requires_one() {
    let server = MockServer::start_async().await;
    let params = params(&server, json!({}));
    let err = registrar(&params, RegistrarSettings::default())
        .save_nameservers(&params)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No nameservers provided");
    assert_eq!(err.kind(), "validation");
}

#[tokio::test]
async fn test_epp_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/domains/example.com/transfer/auth-code");
            then.status(200).json_body(json!({"authCode": "Xy9#secret"}));
        })
        .await;

    let params = params(&server, json!({}));
    let result = registrar(&params, RegistrarSettings::default())
        .get_epp_code(&params)
        .await;
    assert_eq!(into_host_value(result), json!({"eppcode": "Xy9#secret"}));
}

#[tokio::test]
async fn test_single_and_bulk_availability() {
    let server = MockServer::start_async().await;
    let single = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/domains/free.com/available");
            then.status(200)
                .json_body(json!({"domain": "free.com", "result": "available"}));
        })
        .await;
    let bulk = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/domains/available")
                .json_body(json!({"domains": ["free.com", "taken.com"]}));
            then.status(200).json_body(json!({"domains": [
                {"domain": "free.com", "result": "available"},
                {"domain": "taken.com", "result": "taken"}
            ]}));
        })
        .await;

    let params = params(&server, json!({}));
    let registrar = registrar(&params, RegistrarSettings::default());

    let one = registrar
        .check_availability(&["free.com".to_string()])
        .await
        .unwrap();
    assert!(one[0].is_available());

    let many = registrar
        .check_availability(&["free.com".to_string(), "taken.com".to_string()])
        .await
        .unwrap();
    assert_eq!(
        into_host_value(Ok(many)),
        json!([
            {"domain": "free.com", "available": true, "result": "available"},
            {"domain": "taken.com", "available": false, "result": "taken"}
        ])
    );

    single.assert_async().await;
    bulk.assert_async().await;
    assert!(registrar.check_availability(&[]).await.is_err());
}

#[tokio::test]
async fn test_fixed_answers() {
    assert_eq!(
        into_host_value(request_delete()),
        json!({"error": "Domain deletion must be done directly in Spaceship account"})
    );
    assert_eq!(into_host_value(get_tld_pricing()), json!([]));
}
