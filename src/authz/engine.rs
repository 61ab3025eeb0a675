//! The authorization decision itself: credential to verdict.

use std::collections::HashMap;

use crate::authz::errors::AuthzError;
use crate::authz::locate::locate_credential;
use crate::authz::resolver::resolve;
use crate::authz::resource::parse_descriptor;
use crate::authz::types::{AuthEvent, Effect, PolicyDecision, RouteTable};
use crate::token::{self, Claims};

/// Authorize one inbound event against the route table.
///
/// Pure apart from reading the clock during verification: identical inputs
/// yield identical decisions, so a front door may safely cache results.
/// Every decision is independent; there is no shared mutable state.
///
/// A route with no matching table entry carries no restriction and is
/// **allowed** for any authenticated caller with a role claim (fail-open).
pub fn authorize(
    event: &AuthEvent,
    table: &RouteTable,
    secret: &str,
) -> Result<PolicyDecision, AuthzError> {
    let credential = locate_credential(event).ok_or(AuthzError::MissingCredential)?;
    let claims = token::verify(&credential, secret)?;
    let target = parse_descriptor(event.resource())?;

    // A credential without a role can never satisfy a restriction, so it is
    // rejected even on unrestricted routes.
    let role = claims
        .role
        .as_deref()
        .ok_or(AuthzError::RoleMissingInClaims)?;

    if let Some(requirement) = resolve(table, &target.method, &target.path) {
        if !requirement.permits(role) {
            return Err(AuthzError::InsufficientRole {
                role: role.to_string(),
                method: target.method,
                path: target.path,
            });
        }
    }

    tracing::debug!(
        subject = %claims.subject,
        role,
        method = %target.method,
        path = %target.path,
        "Request authorized"
    );

    Ok(decision(&claims, event.resource()))
}

fn decision(claims: &Claims, resource: &str) -> PolicyDecision {
    let attr = |value: &Option<String>| value.clone().unwrap_or_default();
    let context = HashMap::from([
        ("id".to_string(), claims.subject.clone()),
        ("role".to_string(), attr(&claims.role)),
        ("name".to_string(), attr(&claims.name)),
        ("email".to_string(), attr(&claims.email)),
        ("document".to_string(), attr(&claims.document)),
    ]);

    PolicyDecision {
        principal_id: claims.subject.clone(),
        effect: Effect::Allow,
        resource: resource.to_string(),
        context,
    }
}
