//! Portcullis - request authorization engine
//!
//! This library verifies bearer credentials and decides, from a configurable
//! route table, whether the caller's role may invoke the target route.
//! It exposes all modules for testing purposes.

pub mod authz;
pub mod errors;
pub mod identity;
pub mod secrets;
pub mod settings;
pub mod token;
pub mod web;
