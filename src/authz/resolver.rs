//! Tiered lookup of the role(s) required to invoke a route.

use crate::authz::normalize::normalize_path;
use crate::authz::types::{RoleRequirement, RouteTable};

/// Resolve the role requirement for `(method, path)` against the table.
///
/// Tiers, first match wins:
/// 1. exact key `METHOD:path`;
/// 2. normalized key `METHOD:normalize(path)`;
/// 3. scan of pattern entries in table order: a trailing `/*` is a prefix
///    match against the normalized path, any other pattern is matched
///    segment-wise (`*` = exactly one segment) against both the raw and the
///    normalized path.
///
/// `None` means "no restriction", which callers must treat as **allow**.
/// This fail-open behavior is deliberate: an empty, absent, or non-matching
/// table keeps routes available. Authoring a table therefore means listing
/// every route that needs protection, most-specific entries first.
pub fn resolve<'t>(
    table: &'t RouteTable,
    method: &str,
    path: &str,
) -> Option<&'t RoleRequirement> {
    if table.is_empty() {
        return None;
    }

    if let Some(requirement) = table.get(&format!("{method}:{path}")) {
        return Some(requirement);
    }

    let normalized = normalize_path(path);
    if let Some(requirement) = table.get(&format!("{method}:{normalized}")) {
        return Some(requirement);
    }

    for (key, requirement) in table.iter() {
        let Some((entry_method, pattern)) = key.split_once(':') else {
            continue;
        };
        if entry_method != method {
            continue;
        }
        if matches_pattern(pattern, path, &normalized) {
            return Some(requirement);
        }
    }

    None
}

fn matches_pattern(pattern: &str, raw: &str, normalized: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix("/*") {
        let prefix = normalize_path(prefix);
        return normalized == prefix
            || normalized
                .strip_prefix(&prefix)
                .is_some_and(|rest| rest.starts_with('/'));
    }
    segments_match(pattern, raw) || segments_match(pattern, normalized)
}

/// Segment-wise wildcard match: `*` matches exactly one arbitrary segment
/// and never crosses `/`. An explicit matcher rather than a regex compiled
/// from the table keeps externally configured patterns from smuggling in
/// metacharacters.
fn segments_match(pattern: &str, candidate: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut candidate_segments = candidate.split('/');
    loop {
        match (pattern_segments.next(), candidate_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(c)) => {
                if p != "*" && p != c {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
