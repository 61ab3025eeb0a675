//! HTTP front door: the request adapter that feeds raw events into the
//! authorization engine and exposes the login flow. Every authorization
//! failure leaves this layer as one opaque 401; the specific reason is
//! logged internally only.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use miette::IntoDiagnostic;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::authz::types::AuthEvent;
use crate::authz::{self, RouteTable};
use crate::identity::IdentityBackend;
use crate::secrets::SecretProvider;
use crate::settings::Settings;
use crate::token::{self, IssueRequest};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub route_table: Arc<RouteTable>,
    pub secrets: Arc<dyn SecretProvider>,
    pub identity: Arc<dyn IdentityBackend>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/authorize", post(handle_authorize))
        .route("/v1/login", post(handle_login))
        .route("/healthz", get(health))
        .with_state(state)
}

pub async fn serve(state: AppState) -> miette::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        state.settings.server.host, state.settings.server.port
    )
    .parse()
    .into_diagnostic()?;

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

async fn handle_authorize(
    State(state): State<AppState>,
    Json(event): Json<AuthEvent>,
) -> impl IntoResponse {
    let secret = state.secrets.jwt_secret();
    match authz::authorize(&event, &state.route_table, &secret) {
        Ok(decision) => Json(decision).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
    pub expires_in: u64,
}

async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    let (profile, role, subject) = if let Some(document) = &request.document {
        match state.identity.customer_by_document(document).await {
            Ok(Some(profile)) => (profile, "customer", document.clone()),
            Ok(None) => return login_rejected("unknown customer"),
            Err(e) => return login_failed(e),
        }
    } else if let Some(email) = &request.email {
        match state.identity.employee_by_email(email).await {
            Ok(Some(profile)) => (profile, "employee", email.clone()),
            Ok(None) => return login_rejected("unknown employee"),
            Err(e) => return login_failed(e),
        }
    } else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Either `document` or `email` is required" })),
        )
            .into_response();
    };

    let ttl = Duration::from_secs(state.settings.auth.token_ttl_secs);
    let issue_request = IssueRequest {
        subject,
        role: role.to_string(),
        name: Some(profile.name),
        email: profile.email,
        document: profile.document,
    };

    match token::issue(&issue_request, &state.secrets.jwt_secret(), ttl) {
        Ok(token) => Json(LoginResponse {
            token,
            role: role.to_string(),
            expires_in: ttl.as_secs(),
        })
        .into_response(),
        Err(e) => login_failed(e),
    }
}

fn login_rejected(reason: &str) -> axum::response::Response {
    tracing::info!(reason, "Login rejected");
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Login failed" })),
    )
        .into_response()
}

fn login_failed(error: crate::errors::GateError) -> axum::response::Response {
    tracing::error!(error = %error, "Login flow error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
