use gridplace_common::{GridCell, InstanceHandle, PlacementId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// An event record produced by every mutation to the registry.
///
/// The event log is the foundation for replay and undo/redo. Each event
/// captures enough information to reconstruct or reverse the mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// An object was placed on a cell.
    Placed {
        id: PlacementId,
        cell: GridCell,
        handle: InstanceHandle,
    },
    /// An object was removed. Carries its data for undo support.
    Removed {
        id: PlacementId,
        cell: GridCell,
        handle: InstanceHandle,
    },
}

/// A placed object: the record of one visual instance occupying one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub id: PlacementId,
    pub cell: GridCell,
    pub handle: InstanceHandle,
}

/// Errors from registry mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell {cell} is already occupied by placement {existing:?}")]
    CellOccupied {
        cell: GridCell,
        existing: PlacementId,
    },
}

/// Insertion-ordered registry of placed objects, unique by cell.
///
/// Entries are stored under a monotonically increasing sequence number so
/// iteration follows insertion order; a cell index gives direct lookup.
/// Placed objects are immutable: there is no move or update.
#[derive(Debug, Clone, Default)]
pub struct PlacementRegistry {
    entries: BTreeMap<u64, PlacedObject>,
    by_cell: HashMap<GridCell, u64>,
    next_seq: u64,
    /// Append-only event log of all mutations.
    event_log: Vec<BoardEvent>,
}

impl PlacementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of placed objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[BoardEvent] {
        &self.event_log
    }

    /// Placed objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedObject> {
        self.entries.values()
    }

    /// Cells currently occupied, in insertion order.
    pub fn cells(&self) -> Vec<GridCell> {
        self.iter().map(|p| p.cell).collect()
    }

    /// Whether an object occupies `cell`.
    pub fn contains(&self, cell: GridCell) -> bool {
        self.by_cell.contains_key(&cell)
    }

    /// The object occupying `cell`, if any.
    pub fn get(&self, cell: GridCell) -> Option<&PlacedObject> {
        self.by_cell.get(&cell).and_then(|seq| self.entries.get(seq))
    }

    /// Record a new placement at the end of the registry.
    pub fn place(
        &mut self,
        cell: GridCell,
        handle: InstanceHandle,
    ) -> Result<PlacedObject, BoardError> {
        self.place_with_id(PlacementId::new(), cell, handle)
    }

    /// Record a placement with a specific id (used for replay/undo).
    pub fn place_with_id(
        &mut self,
        id: PlacementId,
        cell: GridCell,
        handle: InstanceHandle,
    ) -> Result<PlacedObject, BoardError> {
        if let Some(existing) = self.get(cell) {
            return Err(BoardError::CellOccupied {
                cell,
                existing: existing.id,
            });
        }
        let placed = PlacedObject { id, cell, handle };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(seq, placed);
        self.by_cell.insert(cell, seq);
        self.event_log.push(BoardEvent::Placed { id, cell, handle });
        Ok(placed)
    }

    /// Remove the object at `cell`. Returns the record if one existed.
    ///
    /// Disposing the visual instance is the caller's job; the returned
    /// record carries its handle.
    pub fn remove_at(&mut self, cell: GridCell) -> Option<PlacedObject> {
        let seq = self.by_cell.remove(&cell)?;
        let removed = self.entries.remove(&seq)?;
        self.event_log.push(BoardEvent::Removed {
            id: removed.id,
            cell: removed.cell,
            handle: removed.handle,
        });
        Some(removed)
    }

    /// Reconstruct a registry from a sequence of events (for replay).
    pub fn replay(events: &[BoardEvent]) -> Self {
        let mut registry = Self::new();
        for event in events {
            match event {
                BoardEvent::Placed { id, cell, handle } => {
                    if registry.place_with_id(*id, *cell, *handle).is_err() {
                        tracing::warn!(%cell, "replay skipped placement on occupied cell");
                    }
                }
                BoardEvent::Removed { cell, .. } => {
                    registry.remove_at(*cell);
                }
            }
        }
        registry.event_log.clear();
        registry
    }

    /// Compute a deterministic hash of the registry for comparison.
    /// Covers ids, cells and handles in insertion order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for placed in self.iter() {
            mix(&mut h, placed.id.0.as_bytes());
            mix(&mut h, &placed.cell.x.to_le_bytes());
            mix(&mut h, &placed.cell.z.to_le_bytes());
            mix(&mut h, &placed.handle.0.to_le_bytes());
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: i32, z: i32) -> GridCell {
        GridCell::new(x, z)
    }

    #[test]
    fn registry_starts_empty() {
        let r = PlacementRegistry::new();
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
    }

    #[test]
    fn place_and_remove() {
        let mut r = PlacementRegistry::new();
        let placed = r.place(cell(0, 0), InstanceHandle(1)).unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r.get(cell(0, 0)), Some(&placed));

        let removed = r.remove_at(cell(0, 0)).unwrap();
        assert_eq!(removed, placed);
        assert!(r.is_empty());
        assert!(!r.contains(cell(0, 0)));
    }

    #[test]
    fn duplicate_cell_is_refused() {
        let mut r = PlacementRegistry::new();
        let first = r.place(cell(2, 3), InstanceHandle(1)).unwrap();
        let err = r.place(cell(2, 3), InstanceHandle(2)).unwrap_err();
        assert_eq!(
            err,
            BoardError::CellOccupied {
                cell: cell(2, 3),
                existing: first.id
            }
        );
        assert_eq!(r.len(), 1);
        assert_eq!(r.get(cell(2, 3)).unwrap().handle, InstanceHandle(1));
    }

    #[test]
    fn remove_unoccupied_is_noop() {
        let mut r = PlacementRegistry::new();
        r.place(cell(0, 0), InstanceHandle(1)).unwrap();
        assert!(r.remove_at(cell(1, 1)).is_none());
        assert_eq!(r.len(), 1);
        // only the placement was logged
        assert_eq!(r.events().len(), 1);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut r = PlacementRegistry::new();
        r.place(cell(5, 5), InstanceHandle(1)).unwrap();
        r.place(cell(-3, 0), InstanceHandle(2)).unwrap();
        r.place(cell(0, 1), InstanceHandle(3)).unwrap();
        r.remove_at(cell(-3, 0));
        r.place(cell(-3, 0), InstanceHandle(4)).unwrap();
        assert_eq!(r.cells(), vec![cell(5, 5), cell(0, 1), cell(-3, 0)]);
    }

    #[test]
    fn events_are_recorded() {
        let mut r = PlacementRegistry::new();
        r.place(cell(0, 0), InstanceHandle(1)).unwrap();
        r.place(cell(1, 0), InstanceHandle(2)).unwrap();
        r.remove_at(cell(0, 0));
        assert_eq!(r.events().len(), 3);
        assert!(matches!(r.events()[2], BoardEvent::Removed { .. }));
    }

    #[test]
    fn drain_events_clears_log() {
        let mut r = PlacementRegistry::new();
        r.place(cell(0, 0), InstanceHandle(1)).unwrap();
        let events = r.drain_events();
        assert_eq!(events.len(), 1);
        assert!(r.events().is_empty());
    }

    #[test]
    fn replay_equivalence() {
        let mut r = PlacementRegistry::new();
        for i in 0..10 {
            r.place(cell(i - 5, i % 3), InstanceHandle(i as u64)).unwrap();
        }
        for i in (0..10).step_by(3) {
            r.remove_at(cell(i - 5, i % 3));
        }
        r.place(cell(-5, 0), InstanceHandle(99)).unwrap();

        let replayed = PlacementRegistry::replay(r.events());
        assert_eq!(replayed.len(), r.len());
        assert_eq!(replayed.cells(), r.cells());
        assert_eq!(replayed.state_hash(), r.state_hash());
        assert!(replayed.events().is_empty());
    }

    #[test]
    fn state_hash_differs_on_content() {
        let mut a = PlacementRegistry::new();
        let mut b = PlacementRegistry::new();
        let id = PlacementId::new();
        a.place_with_id(id, cell(0, 0), InstanceHandle(1)).unwrap();
        b.place_with_id(id, cell(0, 1), InstanceHandle(1)).unwrap();
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
