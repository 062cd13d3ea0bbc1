use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A raw window event the placement session reacts to.
///
/// Coordinates are window pixels with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Pointer moved to a new position.
    Move { x: f32, y: f32 },
    /// Primary button pressed.
    Down,
    /// Double click.
    DoubleClick,
    /// Window resized.
    Resize { width: u32, height: u32 },
    /// Drag that orbits the camera, in pixels of pointer travel.
    Orbit { dx: f32, dy: f32 },
}

/// Window size in pixels, used to normalize pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert a pixel position to normalized device coordinates.
    ///
    /// X runs from -1 at the left edge to 1 at the right; Y from 1 at the top
    /// to -1 at the bottom.
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        Vec2::new(x / w * 2.0 - 1.0, -(y / h) * 2.0 + 1.0)
    }

    /// Pixel position of a point in normalized device coordinates.
    pub fn from_ndc(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
        )
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Orbit angles in radians for a drag of `(dx, dy)` pixels. Dragging
    /// the full window height turns the camera once around.
    pub fn orbit_angles(&self, dx: f32, dy: f32) -> (f32, f32) {
        let per_pixel = std::f32::consts::TAU / self.height.max(1) as f32;
        (-dx * per_pixel, dy * per_pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_origin() {
        let vp = Viewport::new(800, 600);
        assert_eq!(vp.to_ndc(400.0, 300.0), Vec2::ZERO);
    }

    #[test]
    fn corners_map_to_unit_square() {
        let vp = Viewport::new(800, 600);
        assert_eq!(vp.to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn from_ndc_inverts_to_ndc() {
        let vp = Viewport::new(1280, 720);
        let px = vp.from_ndc(Vec2::new(0.5, -0.25));
        let back = vp.to_ndc(px.x, px.y);
        assert!((back - Vec2::new(0.5, -0.25)).length() < 1e-6);
    }

    #[test]
    fn zero_sized_viewport_does_not_divide_by_zero() {
        let vp = Viewport::new(0, 0);
        assert!(vp.to_ndc(0.0, 0.0).is_finite());
        assert_eq!(vp.aspect(), 1.0);
    }

    #[test]
    fn orbit_angles_scale_with_height() {
        let vp = Viewport::new(1280, 720);
        let (yaw, pitch) = vp.orbit_angles(0.0, 720.0);
        assert_eq!(yaw, 0.0);
        assert!((pitch - std::f32::consts::TAU).abs() < 1e-5);
        let (yaw, _) = vp.orbit_angles(360.0, 0.0);
        assert!((yaw + std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn events_parse_from_yaml() {
        let yaml = "- { event: move, x: 10, y: 20 }\n- event: down\n- event: double_click\n- { event: resize, width: 640, height: 480 }\n- { event: orbit, dx: -12, dy: 3.5 }\n";
        let events: Vec<PointerEvent> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            events,
            vec![
                PointerEvent::Move { x: 10.0, y: 20.0 },
                PointerEvent::Down,
                PointerEvent::DoubleClick,
                PointerEvent::Resize {
                    width: 640,
                    height: 480
                },
                PointerEvent::Orbit { dx: -12.0, dy: 3.5 },
            ]
        );
    }
}
