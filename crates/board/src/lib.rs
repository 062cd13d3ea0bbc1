//! Placement registry: authoritative record of which object occupies which cell.
//!
//! # Invariants
//! - At most one live placement per grid cell.
//! - All mutations flow through explicit operations and produce an event.

pub mod registry;

pub use registry::{BoardError, BoardEvent, PlacedObject, PlacementRegistry};
