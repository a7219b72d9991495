//! Builds planetary systems, either from a table of the real solar system or
//! from a random recipe. Randomness always comes in from the caller, so a
//! seeded `Rng` reproduces the same system.

use rand::Rng;

use crate::error::GenerationError;
use crate::model::orrery::{BodyKind, DrawableHandle, Orrery};

mod procedural;
mod solar;

pub use procedural::{generate_procedural_system, MAX_BODY_COUNT};
pub use solar::{
    generate_solar_system, scale_diameter, scale_orbital_radius, scale_velocity, SOLAR_SYSTEM,
};

/// Moons are this fraction of their parent, both in diameter and in orbit
/// radius.
pub const MOON_FRACTION: f64 = 0.2;
pub const MOON_ORBIT_VELOCITY: f64 = 2.0;
pub const MOON_SPIN_VELOCITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPolicy {
    Solar,
    Procedural { body_count: usize },
}

/// What the renderer needs to know to make a drawable for one body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawableDescriptor {
    pub handle: DrawableHandle,
    pub kind: BodyKind,
    /// Texture slot for table-driven systems, `kind.index()` otherwise
    pub type_index: usize,
    /// Whether to use an image texture rather than a procedural color
    pub textured: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratedSystem {
    pub orrery: Orrery,
    pub drawables: Vec<DrawableDescriptor>,
}

pub fn generate<R: Rng + ?Sized>(
    policy: GenerationPolicy,
    rng: &mut R,
) -> Result<GeneratedSystem, GenerationError> {
    let system = match policy {
        GenerationPolicy::Solar => generate_solar_system(rng)?,
        GenerationPolicy::Procedural { body_count } => generate_procedural_system(body_count, rng)?,
    };
    log::info!(
        "Generated {:?} system: {} bodies, {} moons",
        policy,
        system.orrery.num_bodies(),
        system.orrery.moon_count()
    );
    Ok(system)
}

impl Orrery {
    pub fn generate<R: Rng + ?Sized>(
        policy: GenerationPolicy,
        rng: &mut R,
    ) -> Result<GeneratedSystem, GenerationError> {
        generate(policy, rng)
    }
}
