//! Extraction of the bearer credential from an inbound event.

use serde_json::Value;

use crate::authz::types::{AuthEvent, RequestEvent};

const BEARER_PREFIX: &str = "Bearer ";

// The three conventional capitalizations seen from upstream proxies.
const AUTH_HEADERS: &[&str] = &["Authorization", "authorization", "AUTHORIZATION"];

/// Locate the bearer credential in an event, trying sources in priority
/// order: the legacy authorization field, the `Authorization` header, a
/// `token` field in the JSON body, then a `token` query parameter. Returns
/// the first non-empty match. No side effects; a malformed JSON body counts
/// as "no token from that source" and the scan continues.
pub fn locate_credential(event: &AuthEvent) -> Option<String> {
    match event {
        AuthEvent::Token(e) => {
            let token = e
                .authorization_token
                .strip_prefix(BEARER_PREFIX)
                .unwrap_or(&e.authorization_token);
            non_empty(token)
        }
        AuthEvent::Request(e) => from_header(e)
            .or_else(|| from_body(e))
            .or_else(|| from_query(e)),
    }
}

fn from_header(event: &RequestEvent) -> Option<String> {
    let value = AUTH_HEADERS.iter().find_map(|name| event.headers.get(*name))?;
    non_empty(value.strip_prefix(BEARER_PREFIX)?)
}

fn from_body(event: &RequestEvent) -> Option<String> {
    let body = event.body.as_ref()?;
    let decoded;
    let object = match body {
        // A string body holds encoded JSON and needs one decode step.
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => {
                decoded = value;
                &decoded
            }
            Err(err) => {
                tracing::debug!(error = %err, "Request body is not valid JSON; skipping");
                return None;
            }
        },
        other => other,
    };
    non_empty(object.get("token")?.as_str()?)
}

fn from_query(event: &RequestEvent) -> Option<String> {
    non_empty(event.query_parameters.as_ref()?.get("token")?)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
