//! Parsing of resource descriptors into a (method, path) route target.

use crate::authz::errors::AuthzError;

/// The parsed target of an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    /// Upper-case HTTP method, e.g. `GET`.
    pub method: String,
    /// Absolute path, e.g. `/v1/orders/555`. `/` for a bare stage root.
    pub path: String,
}

const METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "ANY",
];

/// Parse a resource descriptor of the form
/// `scheme:partition:service:region:account:api-id/stage/METHOD/path...`.
///
/// Exactly one positional convention is supported: the method sits in the
/// third slash-delimited segment, immediately after the api-id/stage pair.
/// Descriptors following the other historical convention (method one segment
/// later) are rejected rather than guessed at, because their third segment is
/// not a recognized HTTP method.
pub fn parse_descriptor(descriptor: &str) -> Result<RouteTarget, AuthzError> {
    let fields: Vec<&str> = descriptor.splitn(6, ':').collect();
    if fields.len() != 6 || fields[5].is_empty() {
        return Err(AuthzError::MalformedResource(format!(
            "expected 6 colon-delimited fields, got `{descriptor}`"
        )));
    }

    let segments: Vec<&str> = fields[5].split('/').collect();
    if segments.len() < 3 {
        return Err(AuthzError::MalformedResource(format!(
            "expected api-id/stage/METHOD/... in `{}`",
            fields[5]
        )));
    }

    let method = segments[2];
    if !METHODS.contains(&method) {
        return Err(AuthzError::MalformedResource(format!(
            "`{method}` is not an HTTP method; the method must follow the stage segment"
        )));
    }

    let mut path = String::from("/");
    path.push_str(&segments[3..].join("/"));

    Ok(RouteTarget {
        method: method.to_string(),
        path,
    })
}
