use gridplace_board::{BoardError, PlacementRegistry};
use gridplace_common::{GridCell, PlacementId};
use gridplace_grid::GridSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Why a candidate cell refused a placement.
///
/// Rejections are ordinary outcomes of user input, not failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(GridCell),
    #[error("cell {cell} is already occupied by placement {by:?}")]
    Occupied { cell: GridCell, by: PlacementId },
    #[error("cell {cell} is {distance:.2} cells from the object at {neighbor}, closer than {threshold:.2}")]
    TooClose {
        cell: GridCell,
        neighbor: GridCell,
        distance: f32,
        threshold: f32,
    },
    #[error("cell {0} is in a restricted zone")]
    Restricted(GridCell),
    #[error("prototype is not available yet")]
    PrototypeUnavailable,
}

impl From<BoardError> for Rejection {
    fn from(e: BoardError) -> Self {
        match e {
            BoardError::CellOccupied { cell, existing } => Self::Occupied { cell, by: existing },
        }
    }
}

/// Fixed set of cells that never accept a placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestrictedZones(BTreeSet<GridCell>);

impl RestrictedZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.0.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<GridCell> for RestrictedZones {
    fn from_iter<I: IntoIterator<Item = GridCell>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Placement rules evaluated against a candidate cell.
///
/// Checks run in a fixed order and stop at the first failure:
/// bounds, occupancy, proximity (when a threshold is set), restriction.
#[derive(Debug, Clone)]
pub struct RuleSet {
    grid: GridSpec,
    proximity_threshold: Option<f32>,
    restricted: RestrictedZones,
}

impl RuleSet {
    /// Bounds and occupancy only: the rules of the plain demo.
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            proximity_threshold: None,
            restricted: RestrictedZones::new(),
        }
    }

    /// Reject cells whose center is closer than `threshold` to any placed object.
    /// The threshold is measured in cells, so it keeps its meaning when
    /// `cell_size` changes.
    pub fn with_proximity(mut self, threshold: f32) -> Self {
        self.proximity_threshold = Some(threshold);
        self
    }

    pub fn with_restricted(mut self, restricted: RestrictedZones) -> Self {
        self.restricted = restricted;
        self
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn proximity_threshold(&self) -> Option<f32> {
        self.proximity_threshold
    }

    pub fn restricted(&self) -> &RestrictedZones {
        &self.restricted
    }

    /// Decide whether `cell` accepts a new placement given the current registry.
    pub fn evaluate(&self, cell: GridCell, registry: &PlacementRegistry) -> Result<(), Rejection> {
        if !self.grid.contains(cell) {
            return Err(Rejection::OutOfBounds(cell));
        }

        if let Some(existing) = registry.get(cell) {
            return Err(Rejection::Occupied {
                cell,
                by: existing.id,
            });
        }

        if let Some(threshold) = self.proximity_threshold {
            // Linear scan; the registry holds at most one object per cell.
            for placed in registry.iter() {
                let distance = self.grid.cell_distance(cell, placed.cell);
                if distance < threshold {
                    return Err(Rejection::TooClose {
                        cell,
                        neighbor: placed.cell,
                        distance,
                        threshold,
                    });
                }
            }
        }

        if self.restricted.contains(cell) {
            return Err(Rejection::Restricted(cell));
        }

        Ok(())
    }
}
