use std::f64::consts::TAU;

use rand::Rng;

use super::{DrawableDescriptor, GeneratedSystem, MOON_FRACTION};
use crate::error::GenerationError;
use crate::math::geometry::axis_from_inclination;
use crate::model::orrery::{BodyID, BodyKind, DrawableHandle, OrbitParams, Orrery};

pub struct TableEntry {
    pub name: &'static str,
    pub kind: BodyKind,
    /// Index of the parent in the table
    pub parent: Option<usize>,
    /// km
    pub diameter: f64,
    /// Mean distance from the parent, in millions of km
    pub orbit_radius: f64,
    /// days
    pub orbital_period: f64,
    /// Equatorial speed in km/h, negative for retrograde spin
    pub rotation_speed: f64,
    /// degrees
    pub inclination: f64,
}

macro_rules! entry {
    ($name:expr, $kind:ident, $parent:expr, $d:expr, $r:expr, $p:expr, $v:expr, $i:expr) => {
        TableEntry {
            name: $name,
            kind: BodyKind::$kind,
            parent: $parent,
            diameter: $d,
            orbit_radius: $r,
            orbital_period: $p,
            rotation_speed: $v,
            inclination: $i,
        }
    };
}

// Taken from the NASA planetary fact sheet. The order here is also the
// texture slot order.
#[rustfmt::skip]
pub const SOLAR_SYSTEM: [TableEntry; 10] = [
    entry!("Sun",     Sun,   None,    1_392_700.0, 0.0,    0.0,     7189.0,   0.0),
    entry!("Mercury", Rocky, Some(0), 4_879.0,     57.9,   88.0,    10.83,    7.0),
    entry!("Venus",   Rocky, Some(0), 12_104.0,    108.2,  224.7,   -6.52,    3.4),
    entry!("Earth",   Rocky, Some(0), 12_756.0,    149.6,  365.2,   1674.4,   0.0),
    entry!("Mars",    Rocky, Some(0), 6_792.0,     227.9,  687.0,   866.5,    1.8),
    entry!("Jupiter", Gas,   Some(0), 142_984.0,   778.5,  4331.0,  45583.0,  1.3),
    entry!("Saturn",  Gas,   Some(0), 120_536.0,   1432.0, 10747.0, 36840.0,  2.5),
    entry!("Uranus",  Gas,   Some(0), 51_118.0,    2867.0, 30589.0, -14794.0, 0.8),
    entry!("Neptune", Gas,   Some(0), 49_528.0,    4515.0, 59800.0, 9719.0,   1.8),
    entry!("Moon",    Moon,  Some(3), 3_475.0,     0.384,  27.3,    16.7,     5.1),
];

// The real numbers span too many orders of magnitude to look at, so they get
// squashed into a range that fits on screen.

pub fn scale_diameter(diameter: f64) -> f64 {
    (diameter.log10() - 3.0) * 0.5
}

pub fn scale_orbital_radius(radius: f64) -> f64 {
    (radius.log10() - 1.2) * 7.0
}

pub fn scale_velocity(velocity: f64) -> f64 {
    velocity.sqrt() * 10.0
}

/// Builds the sun, the eight planets, and our moon. Only the starting phases
/// are random.
///
/// Spin velocity is equatorial speed over diameter, in both this and the
/// procedural generator's units. Satellites can't go through
/// `scale_orbital_radius` (they'd land inside their parent, or at a negative
/// radius), so they orbit at a fixed fraction of the parent's radius instead.
pub fn generate_solar_system<R: Rng + ?Sized>(
    rng: &mut R,
) -> Result<GeneratedSystem, GenerationError> {
    let mut orrery = Orrery::new();
    let mut drawables = Vec::with_capacity(SOLAR_SYSTEM.len());
    let mut ids: Vec<BodyID> = Vec::with_capacity(SOLAR_SYSTEM.len());

    for (index, entry) in SOLAR_SYSTEM.iter().enumerate() {
        let handle = DrawableHandle(index);
        let mut params = OrbitParams {
            diameter: scale_diameter(entry.diameter),
            orbit_velocity: 0.0,
            spin_velocity: entry.rotation_speed / entry.diameter,
            initial_phase: rng.gen_range(0.0..TAU),
            orbit_radius: 0.0,
            orbit_axis: axis_from_inclination(entry.inclination).into_inner(),
        };

        let id = match entry.parent {
            None => orrery.add_root(params, handle)?,
            Some(parent) => {
                let parent_id = ids[parent];
                params.orbit_velocity = scale_velocity(entry.orbital_period.recip());
                if entry.kind == BodyKind::Moon {
                    let parent_params = orrery.get_body(parent_id).params();
                    params.orbit_radius = parent_params.orbit_radius * MOON_FRACTION;
                    orrery.add_moon(params, handle, parent_id)?
                } else {
                    params.orbit_radius = scale_orbital_radius(entry.orbit_radius);
                    orrery.add_body(params, handle, parent_id)?
                }
            }
        };
        log::debug!("{} -> {:?}: {:?}", entry.name, id, params);

        ids.push(id);
        drawables.push(DrawableDescriptor {
            handle,
            kind: entry.kind,
            type_index: index,
            textured: true,
        });
    }

    Ok(GeneratedSystem { orrery, drawables })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scaling() {
        assert_relative_eq!(scale_diameter(1000.0), 0.0);
        assert_relative_eq!(scale_diameter(100_000.0), 1.0);
        assert_relative_eq!(scale_orbital_radius(10f64.powf(1.2)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(scale_orbital_radius(10f64.powf(2.2)), 7.0, epsilon = 1e-12);
        assert_relative_eq!(scale_velocity(0.25), 5.0);
    }

    #[test]
    fn test_solar_system_shape() {
        let mut rng = StdRng::seed_from_u64(0);
        let GeneratedSystem { orrery, drawables } = generate_solar_system(&mut rng).unwrap();

        assert_eq!(orrery.num_bodies(), 10);
        assert_eq!(orrery.moon_count(), 1);
        assert_eq!(orrery.root(), Some(BodyID(0)));

        // The moon goes around the third planet
        let earth = BodyID(3);
        let moon = BodyID(9);
        assert_eq!(orrery.get_parent(moon), Some(earth));
        assert_eq!(orrery.get_body(earth).children(), &[moon]);
        for planet in 1..9 {
            assert_eq!(orrery.get_parent(BodyID(planet)), Some(BodyID(0)));
        }

        let slots: Vec<_> = drawables.iter().map(|d| d.type_index).collect();
        assert_eq!(slots, (0..10).collect::<Vec<_>>());
        assert!(drawables.iter().all(|d| d.textured));
        assert_eq!(drawables[0].kind, BodyKind::Sun);
        assert_eq!(drawables[9].kind, BodyKind::Moon);
    }

    #[test]
    fn test_solar_system_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        let orrery = generate_solar_system(&mut rng).unwrap().orrery;

        // Planets get further out and slower, and none of them swallow the sun
        let sun_radius = orrery.get_body(BodyID(0)).params().diameter / 2.0;
        let mut last_radius = sun_radius;
        let mut last_velocity = f64::INFINITY;
        for planet in 1..9 {
            let params = orrery.get_body(BodyID(planet)).params();
            assert!(params.orbit_radius > last_radius);
            assert!(params.orbit_velocity < last_velocity);
            assert!((0.0..TAU).contains(&params.initial_phase));
            last_radius = params.orbit_radius;
            last_velocity = params.orbit_velocity;
        }

        let earth = orrery.get_body(BodyID(3)).params();
        let moon = orrery.get_body(BodyID(9)).params();
        assert_relative_eq!(moon.orbit_radius, earth.orbit_radius * MOON_FRACTION);
        assert_relative_eq!(earth.spin_velocity, 1674.4 / 12_756.0);
        assert_relative_eq!(moon.orbit_velocity, (1.0f64 / 27.3).sqrt() * 10.0);
        assert!(orrery.get_body(BodyID(2)).params().spin_velocity < 0.0);
    }
}
