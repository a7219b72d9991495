//! Per-frame glue between the planetary model, the camera, and whatever is
//! feeding in input. Nothing in here knows about windows or GPUs, so the
//! whole frame loop can run headless.

use std::collections::HashSet;

use rand::Rng;

use crate::camera::{Camera, CameraMode, MoveKey};
use crate::error::GenerationError;
use crate::model::generation::{generate, DrawableDescriptor, GenerationPolicy};
use crate::model::orrery::{BodyID, Drawable, OrbitRing, Orrery};
use crate::settings::Settings;

/// World units the free camera moves per second of held key.
pub const MOVE_SPEED: f32 = 5.0;

const DEFAULT_VIEWPORT: (u32, u32) = (800, 600);

/// Input gathered over one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Wall-clock seconds since the last frame
    pub dt: f64,
    /// Mouse-look deltas, already scaled down from pixels
    pub rotation: (f32, f32),
    pub held_keys: HashSet<MoveKey>,
}

/// Which body the orbit camera is riding along with.
#[derive(Debug, Clone)]
pub struct CameraFocus {
    focus_points: Vec<BodyID>,
    focus_idx: usize,
}

impl CameraFocus {
    /// Starts on the first body that isn't the root, or on the root if it's
    /// all alone.
    pub fn new(orrery: &Orrery) -> Self {
        let focus_points: Vec<BodyID> = orrery.bodies().map(|(id, _)| id).collect();
        let focus_idx = focus_points
            .iter()
            .position(|id| Some(*id) != orrery.root())
            .unwrap_or(0);

        CameraFocus {
            focus_points,
            focus_idx,
        }
    }

    pub fn next(&mut self) {
        let num_bodies = self.focus_points.len();
        if num_bodies > 0 {
            self.focus_idx = (self.focus_idx + 1) % num_bodies;
        }
    }

    pub fn prev(&mut self) {
        let num_bodies = self.focus_points.len();
        if num_bodies > 0 {
            self.focus_idx = (self.focus_idx + num_bodies - 1) % num_bodies;
        }
    }

    pub fn point(&self) -> Option<BodyID> {
        self.focus_points.get(self.focus_idx).copied()
    }
}

pub struct FrameDriver {
    // -- model --
    orrery: Orrery,
    drawables: Vec<DrawableDescriptor>,
    time: f64,
    generation: u64,
    // -- camera --
    camera: Camera,
    focus: CameraFocus,
    // -- config --
    settings: Settings,
}

impl FrameDriver {
    /// Builds the system `settings` asks for, with the RNG it describes.
    pub fn new(settings: Settings) -> Result<Self, GenerationError> {
        let mut rng = settings.rng();
        Self::with_rng(settings, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(
        settings: Settings,
        rng: &mut R,
    ) -> Result<Self, GenerationError> {
        let system = generate(settings.policy(), rng)?;

        let (width, height) = DEFAULT_VIEWPORT;
        let mut camera = Camera::new(width, height, settings.near, settings.far);
        camera.set_mode(settings.camera_mode());

        let mut driver = FrameDriver {
            focus: CameraFocus::new(&system.orrery),
            orrery: system.orrery,
            drawables: system.drawables,
            time: 0.0,
            generation: 0,
            camera,
            settings,
        };
        driver.orrery.advance(0.0);
        driver.resolve_camera();
        Ok(driver)
    }

    /// Throws out the current system and builds a new one. If generation
    /// fails, nothing changes.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        policy: GenerationPolicy,
        rng: &mut R,
    ) -> Result<(), GenerationError> {
        let system = match generate(policy, rng) {
            Ok(system) => system,
            Err(err) => {
                log::warn!("Couldn't generate {:?}, keeping the old system: {}", policy, err);
                return Err(err);
            }
        };

        self.orrery = system.orrery;
        self.drawables = system.drawables;
        self.orrery.advance(0.0);
        self.time = 0.0;
        self.generation += 1;

        self.focus = CameraFocus::new(&self.orrery);
        self.camera.reset_orbit();
        self.resolve_camera();
        Ok(())
    }

    /// Moves over to new settings, doing only what the changes call for.
    /// The system is rebuilt first; if that fails, none of the new settings
    /// take effect.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<(), GenerationError> {
        if self.settings.system_differs(&settings) {
            let mut rng = settings.rng();
            self.regenerate(settings.policy(), &mut rng)?;
        }

        let old = std::mem::replace(&mut self.settings, settings);

        if (old.near, old.far) != (self.settings.near, self.settings.far) {
            self.camera
                .set_clip_planes(self.settings.near, self.settings.far);
        }

        let mode = self.settings.camera_mode();
        if old.camera_mode() != mode {
            log::info!("Camera mode: {:?}", mode);
            self.camera.set_mode(mode);
            self.resolve_camera();
        }

        Ok(())
    }

    /// One frame: camera input first, then the model steps forward, then the
    /// orbit camera catches up with wherever its body went.
    pub fn tick(&mut self, input: &FrameInput) {
        self.camera
            .move_camera(&input.held_keys, input.dt as f32 * MOVE_SPEED);
        self.camera.rotate_camera(input.rotation.0, input.rotation.1);

        if !self.settings.paused {
            let dt = input.dt * self.settings.time_scale;
            self.orrery.advance(dt);
            self.time += dt;
        }

        self.resolve_camera();
    }

    fn resolve_camera(&mut self) {
        let focused = match self.focus.point() {
            Some(id) if self.orrery.contains(id) => id,
            _ => {
                log::warn!("Lost track of the focused body, starting over");
                self.focus = CameraFocus::new(&self.orrery);
                self.camera.reset_orbit();
                match self.focus.point() {
                    Some(id) => id,
                    None => return,
                }
            }
        };

        let model = self.orrery.get_body(focused).model_matrix();
        self.camera.resolve_orbit_world_state(&model);
    }

    pub fn focus_next(&mut self) {
        self.focus.next();
        self.on_focus_changed();
    }

    pub fn focus_prev(&mut self) {
        self.focus.prev();
        self.on_focus_changed();
    }

    fn on_focus_changed(&mut self) {
        self.camera.reset_orbit();
        self.resolve_camera();
        if let Some(id) = self.focus.point() {
            log::info!("Focused on {:?}", id);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    pub fn collect_drawables(&self) -> Vec<Drawable> {
        self.orrery.collect_drawables()
    }

    /// Orbit rings, or nothing if they're switched off.
    pub fn visible_orbit_rings(&self) -> Vec<OrbitRing> {
        if self.settings.show_orbits {
            self.orrery.collect_orbit_rings()
        } else {
            vec![]
        }
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    pub fn drawables(&self) -> &[DrawableDescriptor] {
        &self.drawables
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn focused_body(&self) -> Option<BodyID> {
        self.focus.point()
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera.mode()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Simulated seconds since the current system was built.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Bumped every time the system is rebuilt, so views know to rebuild
    /// their scene objects.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
