use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::authz::errors::AuthzError;

// ---------- Inbound event shapes ----------

/// An inbound authorization event. Two shapes exist in the wild: a legacy
/// token-kind event carrying a single opaque authorization string, and a
/// generic request event carrying headers, body, and query parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthEvent {
    Token(TokenEvent),
    Request(RequestEvent),
}

impl AuthEvent {
    /// The resource descriptor of the operation being authorized.
    pub fn resource(&self) -> &str {
        match self {
            AuthEvent::Token(e) => &e.resource,
            AuthEvent::Request(e) => &e.resource,
        }
    }
}

/// Marker for the legacy event shape; only `"token"` is accepted, so a
/// generic event without the field falls through to `RequestEvent` during
/// untagged deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TokenKind {
    #[serde(rename = "token")]
    Token,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEvent {
    pub kind: TokenKind,
    pub authorization_token: String,
    pub resource: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEvent {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Raw request body: a JSON object, a string holding encoded JSON, or null.
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub query_parameters: Option<HashMap<String, String>>,
    pub resource: String,
}

// ---------- Route table ----------

/// Role(s) a route entry requires: a single role or an ordered list of
/// acceptable roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRequirement {
    One(String),
    AnyOf(Vec<String>),
}

impl RoleRequirement {
    pub fn permits(&self, role: &str) -> bool {
        match self {
            RoleRequirement::One(required) => required == role,
            RoleRequirement::AnyOf(required) => required.iter().any(|r| r == role),
        }
    }
}

/// Mapping from `"METHOD:pattern"` keys to required role(s).
///
/// Iteration order is a configuration contract: during the pattern-scan tier
/// the first matching entry wins, so overlapping patterns must be ordered
/// most-specific-first by the table's author. The engine does not rank
/// specificity itself. The table is read-only input; it is never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable(IndexMap<String, RoleRequirement>);

impl RouteTable {
    /// Strict parse of a route-table JSON blob.
    pub fn from_json(blob: &str) -> Result<Self, AuthzError> {
        serde_json::from_str(blob).map_err(|e| AuthzError::ConfigurationError(e.to_string()))
    }

    /// Parse the configured route table, degrading to an empty table on any
    /// failure. An empty table restricts nothing, so this is an explicit
    /// fail-open trade-off: a malformed table keeps routes available rather
    /// than denying every request. The failure is logged, never raised.
    pub fn from_config(blob: Option<&str>) -> Self {
        let Some(blob) = blob else {
            return Self::default();
        };
        match Self::from_json(blob) {
            Ok(table) => {
                tracing::info!(entries = table.len(), "Loaded route table");
                table
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "Route table is unparsable; continuing with no restrictions (fail-open)"
                );
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&RoleRequirement> {
        self.0.get(key)
    }

    /// Entries in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RoleRequirement)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------- Outcome ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Terminal output of an authorization decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDecision {
    pub principal_id: String,
    pub effect: Effect,
    /// The original resource descriptor, verbatim.
    pub resource: String,
    /// Caller attributes forwarded to the backend. Values are always
    /// strings; absent optional claims appear as `""`, never null.
    pub context: HashMap<String, String>,
}
