//! Attune client core - identity reconciliation and resilient dashboards.
//!
//! Keeps a single current user consistent across a remote auth session and a
//! local snapshot, and assembles the progress dashboard from the metrics
//! backend with a fallback to locally recorded check-ins.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
