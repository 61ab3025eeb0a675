//! End-to-end authorization flow: issue a credential, present it through
//! each event shape, and check the decision against a configured route table.

use std::time::Duration;

use serde_json::json;

use portcullis::authz::errors::AuthzError;
use portcullis::authz;
use portcullis::authz::types::{AuthEvent, Effect, RouteTable};
use portcullis::token::{self, IssueRequest};

const SECRET: &str = "integration-secret-0123456789abcdef0123456789abcdef";

fn issue(subject: &str, role: &str) -> String {
    let request = IssueRequest {
        subject: subject.into(),
        role: role.into(),
        name: Some("Grace Hopper".into()),
        email: Some("grace@example.com".into()),
        document: None,
    };
    token::issue(&request, SECRET, Duration::from_secs(300)).unwrap()
}

fn arn(method: &str, path: &str) -> String {
    format!("arn:aws:execute-api:us-east-1:123456789012:abc123/prod/{method}{path}")
}

fn token_event(token: &str, resource: &str) -> AuthEvent {
    serde_json::from_value(json!({
        "kind": "token",
        "authorizationToken": format!("Bearer {token}"),
        "resource": resource
    }))
    .unwrap()
}

#[test]
fn token_event_flow_allows_matching_role() {
    let table = RouteTable::from_json(
        r#"{
            "GET:/v1/customers/*": "employee",
            "POST:/v1/orders": ["employee", "customer"]
        }"#,
    )
    .unwrap();

    let event = token_event(
        &issue("emp-1", "employee"),
        &arn("GET", "/v1/customers/12345678901"),
    );
    let decision = authz::authorize(&event, &table, SECRET).unwrap();
    assert_eq!(decision.effect, Effect::Allow);
    assert_eq!(decision.principal_id, "emp-1");
    assert_eq!(decision.context["email"], "grace@example.com");
    // Absent document claim surfaces as an empty string.
    assert_eq!(decision.context["document"], "");
}

#[test]
fn token_event_flow_denies_wrong_role() {
    let table = RouteTable::from_json(r#"{"GET:/v1/customers/*": "employee"}"#).unwrap();

    let event = token_event(
        &issue("cust-1", "customer"),
        &arn("GET", "/v1/customers/12345678901"),
    );
    let err = authz::authorize(&event, &table, SECRET).unwrap_err();
    assert!(matches!(err, AuthzError::InsufficientRole { .. }));
}

#[test]
fn generic_event_flow_with_query_parameter() {
    let table = RouteTable::from_json(r#"{"DELETE:/v1/orders/*": "employee"}"#).unwrap();

    let event: AuthEvent = serde_json::from_value(json!({
        "headers": {},
        "body": null,
        "queryParameters": { "token": issue("emp-2", "employee") },
        "resource": arn("DELETE", "/v1/orders/42")
    }))
    .unwrap();

    let decision = authz::authorize(&event, &table, SECRET).unwrap();
    assert_eq!(decision.effect, Effect::Allow);
}

#[test]
fn generic_event_flow_with_string_body() {
    let table = RouteTable::default();
    let body = json!({ "token": issue("cust-2", "customer") }).to_string();

    let event: AuthEvent = serde_json::from_value(json!({
        "headers": {},
        "body": body,
        "resource": arn("POST", "/v1/orders")
    }))
    .unwrap();

    assert!(authz::authorize(&event, &table, SECRET).is_ok());
}

#[test]
fn prefix_pattern_protects_subtree() {
    let table = RouteTable::from_json(r#"{"GET:/v1/orders/*": "employee"}"#).unwrap();

    // Matches deep under the prefix and at the prefix itself.
    for path in ["/v1/orders/customers/123", "/v1/orders/555", "/v1/orders"] {
        let event = token_event(&issue("cust-3", "customer"), &arn("GET", path));
        let err = authz::authorize(&event, &table, SECRET).unwrap_err();
        assert!(
            matches!(err, AuthzError::InsufficientRole { .. }),
            "expected denial for {path}"
        );
    }

    // A sibling route is unrestricted.
    let event = token_event(&issue("cust-3", "customer"), &arn("GET", "/v1/products/abc"));
    assert!(authz::authorize(&event, &table, SECRET).is_ok());
}

#[test]
fn expired_credential_is_rejected() {
    let request = IssueRequest {
        subject: "emp-9".into(),
        role: "employee".into(),
        name: None,
        email: None,
        document: None,
    };
    let token = token::issue(&request, SECRET, Duration::from_secs(0)).unwrap();
    std::thread::sleep(Duration::from_millis(1100));

    let event = token_event(&token, &arn("GET", "/v1/orders"));
    let err = authz::authorize(&event, &RouteTable::default(), SECRET).unwrap_err();
    assert!(matches!(err, AuthzError::InvalidCredential(_)));
}

#[test]
fn malformed_route_table_falls_open() {
    let table = RouteTable::from_config(Some("definitely not json"));
    let event = token_event(
        &issue("cust-4", "customer"),
        &arn("GET", "/v1/customers/12345678901"),
    );
    // The same request a well-formed table would deny is allowed here.
    assert!(authz::authorize(&event, &table, SECRET).is_ok());
}
