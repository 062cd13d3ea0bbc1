use crate::config::{ConfigError, SessionConfig};
use crate::editor::{EditTarget, Editor};
use glam::{Vec2, Vec3};
use gridplace_assets::{AssetError, Prototype, PrototypeSlot};
use gridplace_board::{PlacedObject, PlacementRegistry};
use gridplace_common::GridCell;
use gridplace_grid::GridSpec;
use gridplace_input::{PointerEvent, Viewport};
use gridplace_rules::{Rejection, RuleSet};
use gridplace_scene::{CameraState, RenderView, SceneAdapter};

/// What a handled event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The highlight moved to this cell.
    Highlighted(GridCell),
    Placed(PlacedObject),
    Rejected(Rejection),
    Removed(PlacedObject),
    Resized(Viewport),
    /// The camera orbited; the eye is now here.
    Orbited(Vec3),
    /// Nothing to do: pointer off the ground, or no object to remove.
    Ignored,
}

/// Application state of one placement editor.
///
/// Owns the registry, the rules, the prototype and the pointer state. Event
/// handlers borrow the session and a scene adapter explicitly; nothing is
/// shared through globals.
pub struct PlacementSession {
    grid: GridSpec,
    rules: RuleSet,
    registry: PlacementRegistry,
    editor: Editor,
    prototype: PrototypeSlot,
    camera: CameraState,
    viewport: Viewport,
    highlight: GridCell,
    /// Ground hit of the most recent pointer move, if it hit the ground.
    last_hit: Option<Vec3>,
}

impl PlacementSession {
    /// Create a session from a validated configuration. The prototype
    /// starts out pending; see [`PlacementSession::resolve_prototype`].
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut camera = config.camera;
        camera.resize(config.viewport.width, config.viewport.height);
        Ok(Self {
            grid: config.grid(),
            rules: config.rules(),
            registry: PlacementRegistry::new(),
            editor: Editor::new(),
            prototype: PrototypeSlot::Pending,
            camera,
            viewport: config.viewport,
            highlight: GridCell::new(0, 0),
            last_hit: None,
        })
    }

    /// Create a session and load its prototype right away.
    /// A failed load is logged and leaves placement disabled.
    pub fn with_prototype(config: &SessionConfig) -> Result<Self, ConfigError> {
        let mut session = Self::new(config)?;
        session.resolve_prototype(config.load_prototype());
        Ok(session)
    }

    /// Store the result of loading the placement prototype.
    pub fn resolve_prototype(&mut self, result: Result<Prototype, AssetError>) {
        self.prototype.resolve(result);
    }

    pub fn prototype(&self) -> &PrototypeSlot {
        &self.prototype
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn registry(&self) -> &PlacementRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Cell under the highlight indicator.
    pub fn highlight(&self) -> GridCell {
        self.highlight
    }

    pub fn last_hit(&self) -> Option<Vec3> {
        self.last_hit
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// View for a renderer: camera, grid and restricted cells.
    pub fn render_view(&self) -> RenderView {
        RenderView {
            camera: self.camera,
            grid: self.grid,
            restricted: self.rules.restricted().iter().collect(),
        }
    }

    /// Dispatch one pointer or window event.
    pub fn handle<S: SceneAdapter>(&mut self, event: PointerEvent, scene: &mut S) -> Outcome {
        let _span = tracing::info_span!("pointer_event", ?event).entered();
        match event {
            PointerEvent::Move { x, y } => self.pointer_move(x, y, scene),
            PointerEvent::Down => self.pointer_down(scene),
            PointerEvent::DoubleClick => self.double_click(scene),
            PointerEvent::Resize { width, height } => self.resize(width, height),
            PointerEvent::Orbit { dx, dy } => self.orbit(dx, dy),
        }
    }

    /// Ray cast the pointer against the ground and move the highlight.
    pub fn pointer_move<S: SceneAdapter>(&mut self, x: f32, y: f32, scene: &mut S) -> Outcome {
        let ndc = self.viewport.to_ndc(x, y);
        self.last_hit = scene.cast_ray(ndc, &self.camera);
        let Some(hit) = self.last_hit else {
            return Outcome::Ignored;
        };
        let cell = self.grid.snap(hit);
        if cell != self.highlight {
            tracing::debug!(%cell, "highlight moved");
        }
        self.highlight = cell;
        scene.set_highlight(self.grid.cell_center(cell));
        Outcome::Highlighted(cell)
    }

    /// Try to place the prototype on the highlighted cell.
    pub fn pointer_down<S: SceneAdapter>(&mut self, scene: &mut S) -> Outcome {
        if self.last_hit.is_none() {
            return Outcome::Ignored;
        }
        let cell = self.highlight;
        let Some(prototype) = self.prototype.ready() else {
            tracing::debug!(%cell, "placement refused: prototype not ready");
            return Outcome::Rejected(Rejection::PrototypeUnavailable);
        };
        if let Err(rejection) = self.rules.evaluate(cell, &self.registry) {
            tracing::debug!("placement refused: {rejection}");
            return Outcome::Rejected(rejection);
        }
        let target = EditTarget {
            registry: &mut self.registry,
            scene,
            grid: &self.grid,
            prototype,
        };
        match self.editor.place(target, cell) {
            Ok(placed) => {
                tracing::info!(%cell, id = %placed.id.short(), "placed");
                Outcome::Placed(placed)
            }
            Err(e) => Outcome::Rejected(e.into()),
        }
    }

    /// Remove the object on the highlighted cell, if any.
    pub fn double_click<S: SceneAdapter>(&mut self, scene: &mut S) -> Outcome {
        if self.last_hit.is_none() {
            return Outcome::Ignored;
        }
        let cell = self.highlight;
        let Some(placed) = self.editor.remove(&mut self.registry, scene, cell) else {
            return Outcome::Ignored;
        };
        tracing::info!(%cell, id = %placed.id.short(), "removed");
        Outcome::Removed(placed)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Outcome {
        self.viewport = Viewport::new(width, height);
        self.camera.resize(width, height);
        Outcome::Resized(self.viewport)
    }

    /// Orbit the camera by a drag of `(dx, dy)` pixels.
    ///
    /// The ground under the pointer changes, so the last hit is dropped and
    /// clicks are ignored until the next pointer move.
    pub fn orbit(&mut self, dx: f32, dy: f32) -> Outcome {
        let (d_yaw, d_pitch) = self.viewport.orbit_angles(dx, dy);
        self.camera.orbit(d_yaw, d_pitch);
        self.last_hit = None;
        tracing::debug!(eye = %self.camera.eye, "camera orbited");
        Outcome::Orbited(self.camera.eye)
    }

    /// Undo the last placement or removal.
    pub fn undo<S: SceneAdapter>(&mut self, scene: &mut S) -> bool {
        let Some(prototype) = self.prototype.ready() else {
            tracing::debug!("undo unavailable: prototype not ready");
            return false;
        };
        let target = EditTarget {
            registry: &mut self.registry,
            scene,
            grid: &self.grid,
            prototype,
        };
        self.editor.undo(target)
    }

    /// Redo the last undone edit.
    pub fn redo<S: SceneAdapter>(&mut self, scene: &mut S) -> bool {
        let Some(prototype) = self.prototype.ready() else {
            tracing::debug!("redo unavailable: prototype not ready");
            return false;
        };
        let target = EditTarget {
            registry: &mut self.registry,
            scene,
            grid: &self.grid,
            prototype,
        };
        self.editor.redo(target)
    }

    /// Pixel position where a world point appears, or `None` when it is
    /// behind the camera.
    pub fn screen_position(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.camera.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
        Some(self.viewport.from_ndc(ndc))
    }

    /// Move the pointer over the center of `cell`.
    pub fn hover_cell<S: SceneAdapter>(&mut self, cell: GridCell, scene: &mut S) -> Outcome {
        match self.screen_position(self.grid.cell_center(cell)) {
            Some(px) => self.pointer_move(px.x, px.y, scene),
            None => {
                self.last_hit = None;
                Outcome::Ignored
            }
        }
    }
}
