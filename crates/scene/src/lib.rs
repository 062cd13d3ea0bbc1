//! Scene adapter: the boundary between the placement core and a rendering engine.
//!
//! # Invariants
//! - The placement core reaches rendering state only through [`SceneAdapter`].
//! - Renderers read scene state; they never mutate it.
//!
//! # Workaround
//! Ships a headless in-memory scene and a debug text renderer in place of a
//! GPU backend. The trait is stable; a real engine binding implements the
//! same interface without changing consumers.

mod adapter;
mod camera;
mod renderer;

pub use adapter::{HeadlessScene, SceneAdapter, SceneInstance};
pub use camera::{CameraState, GroundPlane, Ray};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "gridplace-scene v0.1.0"
}
