use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use miette::Diagnostic;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AuthzError {
    #[error("no bearer credential found in request")]
    #[diagnostic(
        code(portcullis::authz::missing_credential),
        help("Supply a credential via the Authorization header, a `token` body field, or a `token` query parameter")
    )]
    MissingCredential,

    #[error("credential rejected: {0}")]
    #[diagnostic(code(portcullis::authz::invalid_credential))]
    InvalidCredential(String),

    #[error("malformed resource descriptor: {0}")]
    #[diagnostic(
        code(portcullis::authz::malformed_resource),
        help("Expected scheme:partition:service:region:account:api-id/stage/METHOD/path...")
    )]
    MalformedResource(String),

    #[error("verified credential carries no role claim")]
    #[diagnostic(code(portcullis::authz::role_missing))]
    RoleMissingInClaims,

    #[error("role `{role}` may not invoke {method} {path}")]
    #[diagnostic(code(portcullis::authz::insufficient_role))]
    InsufficientRole {
        role: String,
        method: String,
        path: String,
    },

    #[error("route table configuration is invalid: {0}")]
    #[diagnostic(
        code(portcullis::authz::configuration),
        help("The route table must be a JSON object mapping \"METHOD:pattern\" to a role or list of roles")
    )]
    ConfigurationError(String),
}

/// The boundary contract: every authorization failure collapses into one
/// opaque 401 response. The specific kind and detail stay in internal
/// diagnostics only - verification internals must never leak to callers.
impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Authorization failed");
        let body = json!({ "message": "Unauthorized" });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
