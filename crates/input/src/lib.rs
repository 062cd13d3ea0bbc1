//! Pointer input: raw window events and pixel-to-NDC conversion.
//!
//! # Invariants
//! - Handlers consume [`PointerEvent`]s, never windowing-library events.

pub mod pointer;

pub use pointer::{PointerEvent, Viewport};

pub fn crate_info() -> &'static str {
    "gridplace-input v0.1.0"
}
