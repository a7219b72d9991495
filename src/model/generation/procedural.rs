use std::f64::consts::TAU;

use nalgebra::Vector3;
use rand::Rng;

use super::{
    DrawableDescriptor, GeneratedSystem, MOON_FRACTION, MOON_ORBIT_VELOCITY, MOON_SPIN_VELOCITY,
};
use crate::error::GenerationError;
use crate::math::geometry::axis_from_inclination;
use crate::model::orrery::{BodyID, BodyKind, DrawableHandle, OrbitParams, Orrery};

/// Largest system the generator will build, sun included.
pub const MAX_BODY_COUNT: usize = 64;

pub const SUN_DIAMETER: f64 = 1.5;
pub const SUN_SPIN_VELOCITY: f64 = 0.05;

// -- knobs for the i-th body (i >= 1) --
pub const DIAMETER_BASE: f64 = 0.25;
pub const DIAMETER_GROWTH: f64 = 0.1; // times sqrt(i)
pub const ORBIT_VELOCITY_BASE: f64 = 1.2; // divided by sqrt(i)
pub const ORBIT_RADIUS_BASE: f64 = 2.5;
pub const ORBIT_RADIUS_SPACING: f64 = 2.5; // times i
pub const JITTER: f64 = 0.2;
pub const SPIN_VELOCITY_RANGE: (f64, f64) = (0.1, 0.3);
pub const MAX_INCLINATION: f64 = 7.0; // degrees, divided by sqrt(i)

/// A sun plus `body_count - 1` bodies around it, then a second pass that
/// gives each of those a moon with probability `1 / body_count`.
///
/// Descriptors come out in handle order: the sun, then the main bodies, then
/// the moons. The inner half (rounded up) of the bodies are rocky, the rest
/// are gas giants.
pub fn generate_procedural_system<R: Rng + ?Sized>(
    body_count: usize,
    rng: &mut R,
) -> Result<GeneratedSystem, GenerationError> {
    if body_count == 0 {
        return Err(GenerationError::InvalidBodyCount(body_count));
    }
    if body_count > MAX_BODY_COUNT {
        return Err(GenerationError::TooManyBodies {
            count: body_count,
            max: MAX_BODY_COUNT,
        });
    }

    let mut orrery = Orrery::new();
    let mut drawables = Vec::with_capacity(body_count);
    let sun_handle = push_descriptor(&mut drawables, BodyKind::Sun);
    let sun = orrery.add_root(
        OrbitParams {
            diameter: SUN_DIAMETER,
            orbit_velocity: 0.0,
            spin_velocity: SUN_SPIN_VELOCITY,
            initial_phase: 0.0,
            orbit_radius: 0.0,
            orbit_axis: Vector3::y(),
        },
        sun_handle,
    )?;

    let rocky_limit = body_count / 2 + 1;
    let mut planets: Vec<BodyID> = Vec::with_capacity(body_count - 1);
    for i in 1..body_count {
        let index = i as f64;
        let kind = if i <= rocky_limit {
            BodyKind::Rocky
        } else {
            BodyKind::Gas
        };

        let inclination = rng.gen_range(-MAX_INCLINATION..MAX_INCLINATION) / index.sqrt();
        let params = OrbitParams {
            diameter: DIAMETER_BASE + DIAMETER_GROWTH * index.sqrt() + rng.gen_range(0.0..JITTER),
            orbit_velocity: ORBIT_VELOCITY_BASE / index.sqrt() + rng.gen_range(0.0..JITTER),
            spin_velocity: rng.gen_range(SPIN_VELOCITY_RANGE.0..SPIN_VELOCITY_RANGE.1),
            initial_phase: rng.gen_range(0.0..TAU),
            orbit_radius: ORBIT_RADIUS_BASE + ORBIT_RADIUS_SPACING * index,
            orbit_axis: axis_from_inclination(inclination).into_inner(),
        };

        let handle = push_descriptor(&mut drawables, kind);
        let id = orrery.add_body(params, handle, sun)?;
        log::debug!("Body {:?} ({:?}): {:?}", id, kind, params);
        planets.push(id);
    }

    let moon_probability = (body_count as f64).recip();
    for planet in planets {
        if !rng.gen_bool(moon_probability) {
            continue;
        }

        let parent = *orrery.get_body(planet).params();
        let params = OrbitParams {
            diameter: parent.diameter * MOON_FRACTION,
            orbit_velocity: MOON_ORBIT_VELOCITY,
            spin_velocity: MOON_SPIN_VELOCITY,
            initial_phase: rng.gen_range(0.0..TAU),
            orbit_radius: parent.orbit_radius * MOON_FRACTION,
            orbit_axis: Vector3::y(),
        };

        let handle = push_descriptor(&mut drawables, BodyKind::Moon);
        let id = orrery.add_moon(params, handle, planet)?;
        log::debug!("Moon {:?} around {:?}: {:?}", id, planet, params);
    }

    Ok(GeneratedSystem { orrery, drawables })
}

fn push_descriptor(drawables: &mut Vec<DrawableDescriptor>, kind: BodyKind) -> DrawableHandle {
    let handle = DrawableHandle(drawables.len());
    drawables.push(DrawableDescriptor {
        handle,
        kind,
        type_index: kind.index(),
        textured: false,
    });
    handle
}
