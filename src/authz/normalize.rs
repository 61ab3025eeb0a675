//! Path normalization: rewrite dynamic path segments into a canonical
//! wildcard form so that `/v1/orders/42` and `/v1/orders/97` both resolve
//! through the single table entry `/v1/orders/*`.

/// Replace every dynamic segment of `path` with `*`.
///
/// A segment is dynamic iff it matches one of exactly three rules, and these
/// rules are the complete classification criteria (this is a heuristic, not a
/// schema-driven classifier):
/// 1. all ASCII digits (integer id);
/// 2. canonical UUID form, 8-4-4-4-12 hex groups, case-insensitive;
/// 3. alphanumeric-only and longer than 10 characters (opaque hash/slug).
///
/// Pure and deterministic; idempotent, since `*` matches none of the rules.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if is_dynamic_segment(segment) {
                "*"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn is_dynamic_segment(segment: &str) -> bool {
    if segment.is_empty() {
        return false;
    }
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    if is_uuid(segment) {
        return true;
    }
    segment.len() > 10 && segment.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Canonical UUID: five hyphen-separated groups of hex digits with lengths
/// 8-4-4-4-12.
fn is_uuid(segment: &str) -> bool {
    const GROUP_LENGTHS: [usize; 5] = [8, 4, 4, 4, 12];
    let groups: Vec<&str> = segment.split('-').collect();
    if groups.len() != GROUP_LENGTHS.len() {
        return false;
    }
    groups.iter().zip(GROUP_LENGTHS).all(|(group, expected)| {
        group.len() == expected && group.bytes().all(|b| b.is_ascii_hexdigit())
    })
}
