//! Grid snapping: maps ground-plane points to discrete grid cells.
//!
//! # Invariants
//! - Snapping is pure and never fails.
//! - Cell centers sit half a cell off the grid lines, never on a boundary.

mod grid;

pub use grid::GridSpec;

pub fn crate_info() -> &'static str {
    "gridplace-grid v0.1.0"
}
