//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, auth types)
//! - `user` - The logical user identity and its background profile
//! - `dashboard` - Dashboard view types and the offline momentum formula

pub mod dashboard;
pub mod foundation;
pub mod user;
