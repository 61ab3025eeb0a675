//! HS256 credential verification and issuance.
//!
//! Verification is the hot path: every authorization decision decodes one
//! token. Issuance backs the login flow and the test suite. The signing
//! secret is always passed in by the caller (see `secrets::SecretProvider`);
//! this module performs no retrieval.

use std::time::{Duration, SystemTime};

use josekit::jws::{JwsHeader, HS256};
use josekit::jwt::{self, JwtPayload, JwtPayloadValidator};
use serde_json::json;

use crate::authz::errors::AuthzError;
use crate::errors::GateError;

/// Decoded, verified payload of a credential. Immutable; lives for the
/// duration of one authorization decision.
#[derive(Debug, Clone)]
pub struct Claims {
    pub subject: String,
    /// Caller role. Optional on the wire; its absence is rejected at
    /// decision time, not here.
    pub role: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// National identity document number, when the caller is a customer.
    pub document: Option<String>,
    pub issued_at: Option<SystemTime>,
    pub expires_at: Option<SystemTime>,
}

impl Claims {
    fn from_payload(payload: &JwtPayload) -> Result<Self, AuthzError> {
        let subject = payload
            .subject()
            .ok_or_else(|| AuthzError::InvalidCredential("missing `sub` claim".into()))?
            .to_string();

        let string_claim = |name: &str| {
            payload
                .claim(name)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            subject,
            role: string_claim("role"),
            name: string_claim("name"),
            email: string_claim("email"),
            document: string_claim("document"),
            issued_at: payload.issued_at(),
            expires_at: payload.expires_at(),
        })
    }
}

/// Verify `token` against `secret` (HS256 signature plus expiry) and decode
/// its claims. Any structural, signature, or time-validity failure maps to
/// `InvalidCredential`; the detail string stays in internal diagnostics.
pub fn verify(token: &str, secret: &str) -> Result<Claims, AuthzError> {
    let verifier = HS256
        .verifier_from_bytes(secret.as_bytes())
        .map_err(|e| AuthzError::InvalidCredential(e.to_string()))?;
    let (payload, _header) = jwt::decode_with_verifier(token, &verifier)
        .map_err(|e| AuthzError::InvalidCredential(e.to_string()))?;

    let mut validator = JwtPayloadValidator::new();
    validator.set_base_time(SystemTime::now());
    validator
        .validate(&payload)
        .map_err(|e| AuthzError::InvalidCredential(e.to_string()))?;

    Claims::from_payload(&payload)
}

/// Attributes baked into a newly issued credential.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub subject: String,
    pub role: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub document: Option<String>,
}

/// Sign a fresh HS256 credential valid for `ttl`.
pub fn issue(request: &IssueRequest, secret: &str, ttl: Duration) -> Result<String, GateError> {
    let now = SystemTime::now();

    let mut payload = JwtPayload::new();
    payload.set_subject(request.subject.as_str());
    payload.set_issued_at(&now);
    payload.set_expires_at(&(now + ttl));
    payload.set_claim("role", Some(json!(request.role)))?;
    if let Some(name) = &request.name {
        payload.set_claim("name", Some(json!(name)))?;
    }
    if let Some(email) = &request.email {
        payload.set_claim("email", Some(json!(email)))?;
    }
    if let Some(document) = &request.document {
        payload.set_claim("document", Some(json!(document)))?;
    }

    let mut header = JwsHeader::new();
    header.set_token_type("JWT");
    header.set_algorithm("HS256");

    let signer = HS256.signer_from_bytes(secret.as_bytes())?;
    let token = jwt::encode_with_signer(&payload, &header, &signer)?;
    Ok(token)
}
