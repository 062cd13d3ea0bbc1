use crate::camera::{CameraState, GroundPlane};
use glam::{Vec2, Vec3};
use gridplace_assets::Prototype;
use gridplace_common::InstanceHandle;
use std::collections::BTreeMap;

/// Boundary to the rendering engine.
///
/// The placement core talks to the scene only through this trait: it never
/// touches rendering state directly, and the scene never mutates placement
/// state.
pub trait SceneAdapter {
    /// Cast a ray through `ndc` and return the hit on the ground surface.
    fn cast_ray(&self, ndc: Vec2, camera: &CameraState) -> Option<Vec3>;

    /// Create a new renderable instance from the prototype, not yet in the scene.
    fn clone_instance(&mut self, prototype: &Prototype) -> InstanceHandle;

    /// Position an instance and make it visible.
    fn add_to_scene(&mut self, handle: InstanceHandle, position: Vec3);

    /// Remove an instance from the scene and dispose it.
    fn remove_from_scene(&mut self, handle: InstanceHandle);

    /// Move the cell highlight indicator.
    fn set_highlight(&mut self, position: Vec3);
}

/// A renderable instance held by [`HeadlessScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneInstance {
    pub prototype: String,
    pub position: Vec3,
    pub visible: bool,
}

/// In-memory scene adapter: a workaround for a GPU backend.
///
/// Ray casts hit a single named ground plane; instances are plain records.
/// Counters expose how often instances were added and disposed so callers
/// can check that nothing leaks.
#[derive(Debug, Clone)]
pub struct HeadlessScene {
    ground: GroundPlane,
    instances: BTreeMap<InstanceHandle, SceneInstance>,
    next_handle: u64,
    highlight: Vec3,
    added: usize,
    removed: usize,
}

impl HeadlessScene {
    /// Scene with a ground plane of the given side length.
    pub fn new(ground_extent: f32) -> Self {
        Self {
            ground: GroundPlane::new(ground_extent),
            instances: BTreeMap::new(),
            next_handle: 1,
            highlight: Vec3::new(0.5, 0.0, 0.5),
            added: 0,
            removed: 0,
        }
    }

    pub fn ground(&self) -> &GroundPlane {
        &self.ground
    }

    pub fn highlight(&self) -> Vec3 {
        self.highlight
    }

    pub fn instance(&self, handle: InstanceHandle) -> Option<&SceneInstance> {
        self.instances.get(&handle)
    }

    /// Instances currently visible, in handle order.
    pub fn visible(&self) -> impl Iterator<Item = (InstanceHandle, &SceneInstance)> {
        self.instances
            .iter()
            .filter(|(_, inst)| inst.visible)
            .map(|(h, inst)| (*h, inst))
    }

    /// Instances cloned and not yet disposed, visible or not.
    pub fn live_count(&self) -> usize {
        self.instances.len()
    }

    /// Total `add_to_scene` calls.
    pub fn added_count(&self) -> usize {
        self.added
    }

    /// Total `remove_from_scene` calls that disposed an instance.
    pub fn removed_count(&self) -> usize {
        self.removed
    }
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new(12.0)
    }
}

impl SceneAdapter for HeadlessScene {
    fn cast_ray(&self, ndc: Vec2, camera: &CameraState) -> Option<Vec3> {
        let ray = camera.ray_from_ndc(ndc);
        self.ground.intersect(&ray)
    }

    fn clone_instance(&mut self, prototype: &Prototype) -> InstanceHandle {
        let handle = InstanceHandle(self.next_handle);
        self.next_handle += 1;
        self.instances.insert(
            handle,
            SceneInstance {
                prototype: prototype.name.clone(),
                position: Vec3::ZERO,
                visible: false,
            },
        );
        handle
    }

    fn add_to_scene(&mut self, handle: InstanceHandle, position: Vec3) {
        let Some(inst) = self.instances.get_mut(&handle) else {
            tracing::warn!(%handle, "add_to_scene for unknown instance");
            return;
        };
        inst.position = position;
        inst.visible = true;
        self.added += 1;
    }

    fn remove_from_scene(&mut self, handle: InstanceHandle) {
        if self.instances.remove(&handle).is_some() {
            self.removed += 1;
        } else {
            tracing::warn!(%handle, "remove_from_scene for unknown instance");
        }
    }

    fn set_highlight(&mut self, position: Vec3) {
        self.highlight = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_add_remove_lifecycle() {
        let mut scene = HeadlessScene::default();
        let proto = Prototype::default_marker();
        let h = scene.clone_instance(&proto);
        assert_eq!(scene.live_count(), 1);
        assert_eq!(scene.visible().count(), 0);

        scene.add_to_scene(h, Vec3::new(0.5, 0.0, 0.5));
        let inst = scene.instance(h).unwrap();
        assert!(inst.visible);
        assert_eq!(inst.position, Vec3::new(0.5, 0.0, 0.5));
        assert_eq!(inst.prototype, "marker_sphere");

        scene.remove_from_scene(h);
        assert_eq!(scene.live_count(), 0);
        assert_eq!(scene.added_count(), 1);
        assert_eq!(scene.removed_count(), 1);
    }

    #[test]
    fn handles_are_unique() {
        let mut scene = HeadlessScene::default();
        let proto = Prototype::default_marker();
        let a = scene.clone_instance(&proto);
        let b = scene.clone_instance(&proto);
        assert_ne!(a, b);
    }

    #[test]
    fn removing_unknown_handle_is_ignored() {
        let mut scene = HeadlessScene::default();
        scene.remove_from_scene(InstanceHandle(42));
        assert_eq!(scene.removed_count(), 0);
    }

    #[test]
    fn cast_ray_uses_ground_plane() {
        let scene = HeadlessScene::default();
        let cam = CameraState::default();
        assert!(scene.cast_ray(Vec2::ZERO, &cam).is_some());
        // the top edge of the view lands far outside the grid
        assert!(scene.cast_ray(Vec2::new(0.0, 1.0), &cam).is_none());
    }

    #[test]
    fn highlight_moves() {
        let mut scene = HeadlessScene::default();
        scene.set_highlight(Vec3::new(-2.5, 0.0, 3.5));
        assert_eq!(scene.highlight(), Vec3::new(-2.5, 0.0, 3.5));
    }
}
