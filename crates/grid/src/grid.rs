use glam::{Vec2, Vec3};
use gridplace_common::GridCell;
use serde::{Deserialize, Serialize};

/// Fixed-size square grid centered on the world origin.
///
/// Points on the ground plane are assigned to cells by flooring their XZ
/// position divided by `cell_size`. A grid with `divisions = 12` and unit
/// cells spans `[-6, 6)` on both axes and holds cell indices `-6..=5`.
///
/// Only even division counts tile the extent exactly with origin-aligned
/// cells; see [`GridSpec::check_divisions`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    divisions: u32,
    cell_size: f32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            divisions: 12,
            cell_size: 1.0,
        }
    }
}

impl GridSpec {
    /// Largest supported number of divisions per side.
    pub const MAX_DIVISIONS: u32 = 4096;

    /// Reason a division count cannot form a grid, if any.
    pub fn check_divisions(divisions: u32) -> Result<(), &'static str> {
        if divisions == 0 {
            Err("grid_divisions must be at least 2")
        } else if divisions % 2 != 0 {
            Err("grid_divisions must be even")
        } else if divisions > Self::MAX_DIVISIONS {
            Err("grid_divisions exceeds the supported maximum of 4096")
        } else {
            Ok(())
        }
    }

    /// Create a grid with the given number of divisions per side and cell size.
    pub fn new(divisions: u32, cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            divisions,
            cell_size,
        }
    }

    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    /// Cell size used for this grid.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Side length of the whole grid in world units.
    pub fn extent(&self) -> f32 {
        self.divisions as f32 * self.cell_size
    }

    /// Convert a ground-plane point to the cell containing it.
    pub fn snap(&self, pos: Vec3) -> GridCell {
        GridCell {
            x: (pos.x / self.cell_size).floor() as i32,
            z: (pos.z / self.cell_size).floor() as i32,
        }
    }

    /// World-space center of a cell at ground height.
    pub fn cell_center(&self, cell: GridCell) -> Vec3 {
        Vec3::new(
            (cell.x as f32 + 0.5) * self.cell_size,
            0.0,
            (cell.z as f32 + 0.5) * self.cell_size,
        )
    }

    /// Distance between two cell centers measured in cells, independent of
    /// `cell_size`.
    pub fn cell_distance(&self, a: GridCell, b: GridCell) -> f32 {
        let dx = (i64::from(a.x) - i64::from(b.x)) as f32;
        let dz = (i64::from(a.z) - i64::from(b.z)) as f32;
        Vec2::new(dx, dz).length()
    }

    /// Whether the cell's center lies inside the grid extent.
    pub fn contains(&self, cell: GridCell) -> bool {
        let half = self.extent() * 0.5;
        let c = self.cell_center(cell);
        c.x > -half && c.x < half && c.z > -half && c.z < half
    }

    /// All cells of the grid, row by row (Z outer, X inner).
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let half_cells = i32::try_from(self.divisions / 2 + 1).unwrap_or(i32::MAX);
        (-half_cells..=half_cells)
            .flat_map(move |z| (-half_cells..=half_cells).map(move |x| GridCell::new(x, z)))
            .filter(move |c| self.contains(*c))
    }

    /// Number of cells inside the grid.
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }
}
