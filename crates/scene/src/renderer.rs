use crate::adapter::HeadlessScene;
use crate::camera::{CameraState, GroundPlane};
use gridplace_common::GridCell;
use gridplace_grid::GridSpec;
use std::collections::HashSet;

/// Everything a frame needs besides the scene itself.
#[derive(Debug, Clone, Default)]
pub struct RenderView {
    pub camera: CameraState,
    pub grid: GridSpec,
    /// Cells drawn as restricted.
    pub restricted: Vec<GridCell>,
}

/// Renderer-agnostic interface.
///
/// A renderer reads the scene and a view once per frame and produces
/// output. It never mutates the scene or placement state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> Self::Output;
}

/// Debug text renderer: draws the grid as a character map.
///
/// Legend: `.` empty, `o` placed instance, `x` restricted, `+` highlight on
/// an empty cell, `@` highlight on an occupied cell. Rows run from the
/// lowest Z to the highest, columns from the lowest X.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> String {
        let grid = &view.grid;
        let occupied: HashSet<GridCell> = scene
            .visible()
            .map(|(_, inst)| grid.snap(inst.position))
            .collect();
        let restricted: HashSet<GridCell> = view.restricted.iter().copied().collect();
        let highlight = grid.snap(scene.highlight());

        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene ({}x{} grid, {} instances, {} extent={:.1}) ===\n",
            grid.divisions(),
            grid.divisions(),
            occupied.len(),
            GroundPlane::NAME,
            scene.ground().extent(),
        ));
        let cam = &view.camera;
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            cam.eye.x, cam.eye.y, cam.eye.z, cam.target.x, cam.target.y, cam.target.z, cam.fov_degrees
        ));

        let mut row_z = None;
        for cell in grid.cells() {
            if row_z.is_some_and(|z| z != cell.z) {
                out.push('\n');
            }
            row_z = Some(cell.z);
            let ch = match (cell == highlight, occupied.contains(&cell)) {
                (true, true) => '@',
                (true, false) => '+',
                (false, true) => 'o',
                (false, false) if restricted.contains(&cell) => 'x',
                (false, false) => '.',
            };
            out.push(ch);
        }
        out.push('\n');
        out
    }
}
