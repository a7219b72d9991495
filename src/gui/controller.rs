use std::collections::HashSet;
use std::time::Instant;

use kiss3d::event::{Action, Event, Key, MouseButton, WindowEvent};
use nalgebra::Vector2;

use crate::camera::MoveKey;
use crate::driver::{FrameDriver, FrameInput};
use crate::settings::{Settings, MAX_BODY_COUNT};

// Key config, all in one place
const KEY_PREV_FOCUS: Key = Key::Q;
const KEY_NEXT_FOCUS: Key = Key::E;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_TOGGLE_PAUSE: Key = Key::P;
const KEY_CAMERA_SWAP: Key = Key::C;
const KEY_TOGGLE_ORBITS: Key = Key::O;
const KEY_REGENERATE: Key = Key::G;
const KEY_TOGGLE_PROCEDURAL: Key = Key::M;
const KEY_MORE_BODIES: Key = Key::Equals;
const KEY_FEWER_BODIES: Key = Key::Minus;

const MOVE_KEYS: [(Key, MoveKey); 6] = [
    (Key::W, MoveKey::Forward),
    (Key::S, MoveKey::Backward),
    (Key::A, MoveKey::Left),
    (Key::D, MoveKey::Right),
    (Key::Space, MoveKey::Up),
    (Key::LControl, MoveKey::Down),
];

// Pixels of mouse drag per unit of camera rotation
const DRAG_DIVISOR: f32 = 120.0;
// Long stalls (dragging the window, etc) shouldn't teleport everything
const MAX_FRAME_TIME: f64 = 0.25;

pub struct Controller {
    // What the user has asked for. Handed to the driver after each batch of
    // events.
    settings: Settings,
    // -- per-frame input --
    held_keys: HashSet<MoveKey>,
    dragging: bool,
    last_cursor_pos: Option<Vector2<f32>>,
    rotation: Vector2<f32>,
    last_frame: Instant,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
        }
    }
}

impl Controller {
    pub fn new(settings: Settings) -> Self {
        Controller {
            settings,
            held_keys: HashSet::new(),
            dragging: false,
            last_cursor_pos: None,
            rotation: Vector2::zeros(),
            last_frame: Instant::now(),
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, driver: &mut FrameDriver) {
        match event.value {
            WindowEvent::Key(KEY_NEXT_FOCUS, Action::Press, _) => driver.focus_next(),
            WindowEvent::Key(KEY_PREV_FOCUS, Action::Press, _) => driver.focus_prev(),
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                self.settings.time_scale *= 2.0;
                log::info!("Time scale is {}x", self.settings.time_scale);
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                self.settings.time_scale /= 2.0;
                log::info!("Time scale is {}x", self.settings.time_scale);
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.settings.paused = !self.settings.paused;
            }
            WindowEvent::Key(KEY_CAMERA_SWAP, Action::Press, _) => {
                self.settings.orbit_camera = !self.settings.orbit_camera;
            }
            WindowEvent::Key(KEY_TOGGLE_ORBITS, Action::Press, _) => {
                self.settings.show_orbits = !self.settings.show_orbits;
            }
            WindowEvent::Key(KEY_REGENERATE, Action::Press, _) => {
                self.settings.seed = Some(rand::random());
            }
            WindowEvent::Key(KEY_TOGGLE_PROCEDURAL, Action::Press, _) => {
                self.settings.procedural = !self.settings.procedural;
            }
            WindowEvent::Key(KEY_MORE_BODIES, Action::Press, _) => {
                self.settings.body_count = (self.settings.body_count + 1).min(MAX_BODY_COUNT);
            }
            WindowEvent::Key(KEY_FEWER_BODIES, Action::Press, _) => {
                self.settings.body_count = self.settings.body_count.saturating_sub(1).max(1);
            }
            WindowEvent::Key(key, action, _) => {
                if let Some(&(_, move_key)) = MOVE_KEYS.iter().find(|(k, _)| *k == key) {
                    match action {
                        Action::Press => self.held_keys.insert(move_key),
                        Action::Release => self.held_keys.remove(&move_key),
                    };
                }
            }
            WindowEvent::MouseButton(MouseButton::Button1, action, _) => {
                self.dragging = action == Action::Press;
            }
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);
                if let (true, Some(last_pos)) = (self.dragging, self.last_cursor_pos) {
                    self.rotation += (curr_pos - last_pos) / DRAG_DIVISOR;
                }
                self.last_cursor_pos = Some(curr_pos);
            }
            WindowEvent::FramebufferSize(w, h) => driver.resize(w, h),
            _ => {}
        }
    }

    /// Pushes any settings changes over to the driver. If it can't take
    /// them, we go back to whatever it's actually running.
    pub fn sync_settings(&mut self, driver: &mut FrameDriver) {
        if &self.settings == driver.settings() {
            return;
        }
        if let Err(err) = driver.apply_settings(self.settings.clone()) {
            log::error!("Settings rejected: {}", err);
            self.settings = driver.settings().clone();
        }
    }

    /// Everything that happened since the last call, as one frame's worth of
    /// input.
    pub fn take_frame_input(&mut self) -> FrameInput {
        let dt = self.last_frame.elapsed().as_secs_f64().min(MAX_FRAME_TIME);
        self.last_frame = Instant::now();

        let rotation = std::mem::replace(&mut self.rotation, Vector2::zeros());
        FrameInput {
            dt,
            rotation: (rotation.x, rotation.y),
            held_keys: self.held_keys.clone(),
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}
