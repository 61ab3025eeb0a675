//! Request authorization: credential extraction and verification feeding a
//! tiered route-policy lookup.
//!
//! The one rule worth restating up front: resolution is **fail-open**. A
//! route with no matching table entry - including the case of an empty or
//! unparsable table - is allowed for any authenticated caller. Protecting a
//! route means listing it in the table; see [`resolver::resolve`].

pub mod engine;
pub mod errors;
pub mod locate;
pub mod normalize;
pub mod resolver;
pub mod resource;
pub mod types;

pub use engine::authorize;
pub use errors::AuthzError;
pub use types::{AuthEvent, Effect, PolicyDecision, RoleRequirement, RouteTable};
