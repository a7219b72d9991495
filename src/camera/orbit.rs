use std::f32::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::{Matrix4, Point3, Unit, Vector3};

use crate::math::geometry::rotate_about;

pub const DEFAULT_DISTANCE: f32 = 3.0;
pub const POLAR_LIMIT: f32 = 0.001;
pub const MAX_DISTANCE: f32 = 1.0e4;

/// Where an orbiting camera sits and looks, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub look: Vector3<f32>,
    pub up: Vector3<f32>,
}

/// Spherical offset of the camera from a tracked body, measured in that
/// body's object space.
///
/// Azimuth zero with polar at the equator puts the camera on the body's
/// local +x side, looking back along -x.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitState {
    // -- position --
    distance: f32,
    azimuth: f32,
    polar: f32,
    // -- derived, in body space --
    local_look: Vector3<f32>,
    local_position: Point3<f32>,
}

impl OrbitState {
    pub fn new() -> Self {
        let mut state = OrbitState {
            distance: DEFAULT_DISTANCE,
            azimuth: 0.0,
            polar: FRAC_PI_2,
            local_look: -Vector3::x(),
            local_position: Point3::origin(),
        };
        state.update_local_direction();
        state
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn local_look(&self) -> Vector3<f32> {
        self.local_look
    }

    pub fn local_position(&self) -> Point3<f32> {
        self.local_position
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth = (self.azimuth - dx).rem_euclid(TAU);
        if self.azimuth >= TAU {
            self.azimuth = 0.0;
        }
        self.polar = nalgebra::clamp(self.polar + dy, POLAR_LIMIT, PI - POLAR_LIMIT);
        self.update_local_direction();
    }

    pub fn change_distance(&mut self, delta: f32) {
        self.distance = nalgebra::clamp(self.distance + delta, 0.0, MAX_DISTANCE);
        self.update_local_direction();
    }

    // Start out pointing at +x, swing around up by the azimuth, then tip
    // toward the poles. The camera sits at the tip of that direction and
    // looks back down it.
    fn update_local_direction(&mut self) {
        let up = Vector3::y_axis();
        let mut direction = rotate_about(&Vector3::x(), &up, self.azimuth);
        // direction is horizontal here, so this cross product can't vanish
        let tip_axis = Unit::new_normalize(direction.cross(&up));
        direction = rotate_about(&direction, &tip_axis, self.polar - FRAC_PI_2);

        self.local_look = -direction.normalize();
        self.local_position = Point3::from(-self.local_look * self.distance);
    }

    /// Carries the local pose into world space. The model matrix's rotation
    /// acts on the directions, and the whole thing acts on the position.
    pub fn resolve(&self, model: &Matrix4<f32>) -> CameraPose {
        CameraPose {
            position: model.transform_point(&self.local_position),
            look: model.transform_vector(&self.local_look).normalize(),
            up: model.transform_vector(&Vector3::y()).normalize(),
        }
    }
}

impl Default for OrbitState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::{Rotation3, Similarity3, Translation3, UnitQuaternion};

    #[test]
    fn test_defaults() {
        let orbit = OrbitState::new();
        assert_eq!(orbit.distance(), DEFAULT_DISTANCE);
        assert_eq!(orbit.azimuth(), 0.0);
        assert_eq!(orbit.polar(), FRAC_PI_2);
        assert_relative_eq!(orbit.local_look(), -Vector3::x(), epsilon = 1e-6);
        assert_relative_eq!(
            orbit.local_position(),
            Point3::new(DEFAULT_DISTANCE, 0.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_local_direction() {
        let mut orbit = OrbitState::new();

        // Swinging a quarter turn around +y takes +x to -z
        orbit.rotate(-FRAC_PI_2, 0.0);
        assert_relative_eq!(orbit.azimuth(), FRAC_PI_2);
        assert_relative_eq!(
            orbit.local_position(),
            Point3::new(0.0, 0.0, -DEFAULT_DISTANCE),
            epsilon = 1e-5
        );

        // The camera always looks at the body
        for (dx, dy) in [(0.3, 0.2), (-1.7, -0.9), (2.5, 0.4)] {
            orbit.rotate(dx, dy);
            let to_body = -orbit.local_position().coords;
            assert_relative_eq!(orbit.local_look().norm(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(
                to_body.normalize(),
                orbit.local_look(),
                epsilon = 1e-5
            );
            assert_relative_eq!(to_body.norm(), DEFAULT_DISTANCE, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_polar_tips_toward_up() {
        let mut orbit = OrbitState::new();
        orbit.rotate(0.0, 0.5);
        let above = orbit.local_position().y;
        orbit.rotate(0.0, -1.0);
        let below = orbit.local_position().y;
        assert!(above * below < 0.0);
        assert_relative_eq!(above, -below, epsilon = 1e-5);
    }

    #[test]
    fn test_clamps() {
        let mut orbit = OrbitState::new();
        for _ in 0..100 {
            orbit.rotate(0.7, 0.3);
            assert!(orbit.polar() > 0.0 && orbit.polar() < PI);
            assert!((0.0..TAU).contains(&orbit.azimuth()));
        }
        assert_eq!(orbit.polar(), PI - POLAR_LIMIT);
        for _ in 0..100 {
            orbit.rotate(-0.7, -0.3);
        }
        assert_eq!(orbit.polar(), POLAR_LIMIT);
        assert!(orbit.local_look().iter().all(|x| x.is_finite()));

        orbit.change_distance(-10.0);
        assert_eq!(orbit.distance(), 0.0);
        assert_eq!(orbit.local_position(), Point3::origin());
        orbit.change_distance(2.0 * MAX_DISTANCE);
        assert_eq!(orbit.distance(), MAX_DISTANCE);
    }

    #[test]
    fn test_resolve() {
        let mut orbit = OrbitState::new();
        orbit.rotate(0.4, -0.2);
        orbit.change_distance(1.5);

        let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.6);
        let body = Similarity3::from_parts(Translation3::new(1.0, -2.0, 4.0), rotation, 0.8);
        let pose = orbit.resolve(&body.to_homogeneous());

        let expected_look = rotation * orbit.local_look();
        assert_relative_eq!(pose.look, expected_look, epsilon = 1e-5);
        assert_relative_eq!(pose.up, rotation * Vector3::y(), epsilon = 1e-5);
        assert_relative_eq!(
            pose.position,
            body.transform_point(&orbit.local_position()),
            epsilon = 1e-5
        );

        // Pure rotation keeps the camera on the sphere around the body
        let spun = Rotation3::from_axis_angle(&Vector3::x_axis(), 1.1).to_homogeneous();
        let pose = orbit.resolve(&spun);
        assert_relative_eq!(pose.position.coords.norm(), orbit.distance(), epsilon = 1e-5);
    }
}
