use gridplace_assets::Prototype;
use gridplace_board::{BoardError, PlacedObject, PlacementRegistry};
use gridplace_common::{GridCell, PlacementId};
use gridplace_grid::GridSpec;
use gridplace_scene::SceneAdapter;

/// A placement edit that can be applied and reversed.
///
/// Each command carries enough context to undo itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    /// Object placed on a cell. Undo = remove it.
    Place { id: PlacementId, cell: GridCell },
    /// Object removed from a cell. Undo = place it again under the same id.
    Remove { id: PlacementId, cell: GridCell },
}

impl EditCommand {
    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match *self {
            Self::Place { id, cell } => Self::Remove { id, cell },
            Self::Remove { id, cell } => Self::Place { id, cell },
        }
    }
}

/// The pieces of state an edit touches.
pub struct EditTarget<'a, S: SceneAdapter> {
    pub registry: &'a mut PlacementRegistry,
    pub scene: &'a mut S,
    pub grid: &'a GridSpec,
    pub prototype: &'a Prototype,
}

/// Undo/redo history for placements and removals.
///
/// Rule checks happen before an edit reaches the editor; the editor only
/// keeps the registry and the scene in step and records what happened.
#[derive(Debug, Default)]
pub struct Editor {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone the prototype onto `cell` and push to the undo stack.
    pub fn place<S: SceneAdapter>(
        &mut self,
        target: EditTarget<'_, S>,
        cell: GridCell,
    ) -> Result<PlacedObject, BoardError> {
        let placed = spawn(target, PlacementId::new(), cell)?;
        self.undo_stack.push(EditCommand::Place {
            id: placed.id,
            cell,
        });
        self.redo_stack.clear();
        Ok(placed)
    }

    /// Remove the object at `cell` and push to the undo stack.
    /// Returns `None` when the cell is empty; nothing is recorded then.
    pub fn remove<S: SceneAdapter>(
        &mut self,
        registry: &mut PlacementRegistry,
        scene: &mut S,
        cell: GridCell,
    ) -> Option<PlacedObject> {
        let removed = despawn(registry, scene, cell)?;
        self.undo_stack.push(EditCommand::Remove {
            id: removed.id,
            cell,
        });
        self.redo_stack.clear();
        Some(removed)
    }

    /// Undo the last edit. Returns true if an edit was undone.
    pub fn undo<S: SceneAdapter>(&mut self, target: EditTarget<'_, S>) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        apply_command(target, &cmd.inverse());
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the last undone edit. Returns true if an edit was redone.
    pub fn redo<S: SceneAdapter>(&mut self, target: EditTarget<'_, S>) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        apply_command(target, &cmd);
        self.undo_stack.push(cmd);
        true
    }

    /// Number of edits on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of edits on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

fn spawn<S: SceneAdapter>(
    target: EditTarget<'_, S>,
    id: PlacementId,
    cell: GridCell,
) -> Result<PlacedObject, BoardError> {
    if let Some(existing) = target.registry.get(cell) {
        return Err(BoardError::CellOccupied {
            cell,
            existing: existing.id,
        });
    }
    let handle = target.scene.clone_instance(target.prototype);
    let placed = target.registry.place_with_id(id, cell, handle)?;
    target
        .scene
        .add_to_scene(handle, target.grid.cell_center(cell));
    Ok(placed)
}

fn despawn<S: SceneAdapter>(
    registry: &mut PlacementRegistry,
    scene: &mut S,
    cell: GridCell,
) -> Option<PlacedObject> {
    let removed = registry.remove_at(cell)?;
    scene.remove_from_scene(removed.handle);
    Some(removed)
}

fn apply_command<S: SceneAdapter>(target: EditTarget<'_, S>, cmd: &EditCommand) {
    match *cmd {
        EditCommand::Place { id, cell } => {
            if let Err(e) = spawn(target, id, cell) {
                tracing::warn!("edit replay failed: {e}");
            }
        }
        EditCommand::Remove { cell, .. } => {
            despawn(target.registry, target.scene, cell);
        }
    }
}
