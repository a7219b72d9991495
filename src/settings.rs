use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::CameraMode;
use crate::model::generation::GenerationPolicy;
pub use crate::model::generation::MAX_BODY_COUNT;

pub const DEFAULT_BODY_COUNT: usize = 8;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;
pub const DEFAULT_RING_SEGMENTS: usize = 128;

/// Everything the user can change about the running simulation.
///
/// These are only looked at on frame boundaries: the frame driver compares
/// each new value to the last one and does whatever the difference calls for.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    // -- system --
    pub procedural: bool,
    pub body_count: usize,
    pub seed: Option<u64>,
    // -- camera --
    pub orbit_camera: bool,
    pub near: f32,
    pub far: f32,
    // -- display --
    pub show_orbits: bool,
    pub ring_segments: usize,
    // -- time --
    pub time_scale: f64,
    pub paused: bool,
}

impl Settings {
    pub fn policy(&self) -> GenerationPolicy {
        if self.procedural {
            GenerationPolicy::Procedural {
                body_count: self.body_count,
            }
        } else {
            GenerationPolicy::Solar
        }
    }

    pub fn camera_mode(&self) -> CameraMode {
        if self.orbit_camera {
            CameraMode::Orbit
        } else {
            CameraMode::Free
        }
    }

    /// A fresh RNG for generation. Seeded runs come out the same every time.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Whether going from `self` to `other` means building a new system.
    /// The body count only matters for procedural systems.
    pub fn system_differs(&self, other: &Settings) -> bool {
        self.policy() != other.policy() || self.seed != other.seed
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            procedural: false,
            body_count: DEFAULT_BODY_COUNT,
            seed: None,
            orbit_camera: false,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            show_orbits: true,
            ring_segments: DEFAULT_RING_SEGMENTS,
            time_scale: 1.0,
            paused: false,
        }
    }
}

/// Command line options shared by the viewer and the headless CLI.
#[derive(Debug, Clone, Parser)]
#[command(about = "A toy orrery: nested circular orbits around a sun")]
pub struct Args {
    /// Make up a random system instead of using the solar system
    #[arg(long)]
    pub procedural: bool,
    /// Number of bodies in a procedural system, sun included (1 to 64)
    #[arg(long = "bodies", default_value_t = DEFAULT_BODY_COUNT)]
    pub body_count: usize,
    /// Seed for the random parts of generation
    #[arg(long)]
    pub seed: Option<u64>,
    /// Start with the camera riding along with a body
    #[arg(long)]
    pub orbit_camera: bool,
    /// Don't draw orbit paths
    #[arg(long)]
    pub hide_orbits: bool,
    #[arg(long, default_value_t = DEFAULT_NEAR)]
    pub near: f32,
    #[arg(long, default_value_t = DEFAULT_FAR)]
    pub far: f32,
    /// Line segments per orbit ring
    #[arg(long, default_value_t = DEFAULT_RING_SEGMENTS)]
    pub ring_segments: usize,
    /// Simulated seconds per real second
    #[arg(long, default_value_t = 1.0)]
    pub time_scale: f64,
    #[arg(long)]
    pub paused: bool,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Settings {
            procedural: args.procedural,
            body_count: args.body_count,
            seed: args.seed,
            orbit_camera: args.orbit_camera,
            near: args.near,
            far: args.far,
            show_orbits: !args.hide_orbits,
            ring_segments: args.ring_segments.max(1),
            time_scale: args.time_scale,
            paused: args.paused,
        }
    }
}
