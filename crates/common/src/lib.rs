//! Shared types for the gridplace workspace.

mod types;

pub use types::{GridCell, InstanceHandle, PlacementId};
