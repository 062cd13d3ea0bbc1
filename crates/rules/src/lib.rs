//! Placement rule engine: accepts or rejects a candidate cell.
//!
//! # Invariants
//! - Evaluation never mutates the registry.
//! - Restricted cells reject regardless of registry state.

mod rules;

pub use rules::{Rejection, RestrictedZones, RuleSet};
