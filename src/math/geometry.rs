use nalgebra::{RealField, Rotation3, Unit, Vector3};

use std::f64::consts::{PI, TAU};

/// Wraps an angle into [0, 2pi). Works for negative angles too, which shows up
/// when time runs backwards or a body spins retrograde.
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Rotates v by `angle` radians around `axis`, using Rodrigues' formula:
///   v cos(t) + (k x v) sin(t) + k (k . v) (1 - cos(t))
pub fn rotate_about<T: RealField + Copy>(
    v: &Vector3<T>,
    axis: &Unit<Vector3<T>>,
    angle: T,
) -> Vector3<T> {
    let (s, c) = angle.sin_cos();
    let k = axis.as_ref();
    v * c + k.cross(v) * s + k * (k.dot(v) * (T::one() - c))
}

/// Returns a rotation R that sends the y-axis (our canonical up) to `axis`.
///
/// If `axis` is already y, this is the identity. Otherwise, the new z-axis is
/// `axis x y`, and the new x-axis completes the right-handed frame. When `axis`
/// points straight down, that cross product vanishes, and we fall back to a
/// half-turn around x.
///
/// The result is computed once per body and reused every frame.
pub fn orientation_basis(axis: &Unit<Vector3<f64>>, tolerance: f64) -> Rotation3<f64> {
    let new_y = axis.into_inner();
    if (new_y - Vector3::y()).norm() < tolerance {
        return Rotation3::identity();
    }

    let new_z = new_y.cross(&Vector3::y());
    if new_z.norm() < tolerance {
        return Rotation3::from_axis_angle(&Vector3::x_axis(), PI);
    }
    let new_z = new_z.normalize();
    let new_x = new_y.cross(&new_z).normalize();

    let mut rotation = Rotation3::from_basis_unchecked(&[new_x, new_y, new_z]);
    rotation.renormalize();
    rotation
}

/// The direction (perpendicular to `axis`) that a body sits at when its orbit
/// phase is zero. This is `axis x X`, or `axis x Z` if the axis lies along X.
pub fn orbit_start_direction(axis: &Unit<Vector3<f64>>, tolerance: f64) -> Unit<Vector3<f64>> {
    Unit::try_new(axis.cross(&Vector3::x()), tolerance)
        .unwrap_or_else(|| Unit::new_normalize(axis.cross(&Vector3::z())))
}

/// Tilts the canonical up vector by `inclination` degrees around the X axis.
pub fn axis_from_inclination(inclination: f64) -> Unit<Vector3<f64>> {
    if inclination == 0.0 {
        return Vector3::y_axis();
    }
    Rotation3::from_axis_angle(&Vector3::x_axis(), inclination.to_radians()) * Vector3::y_axis()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_wrap_angle() {
        assert_abs_diff_eq!(wrap_angle(0.5), 0.5);
        assert_abs_diff_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(-0.5), TAU - 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(-1e-20), 0.0);
        assert!(wrap_angle(1000.0) < TAU);
    }

    #[test]
    fn test_rodrigues_matches_nalgebra() {
        let axes = [
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-2.0, 0.5, 1.0),
        ];
        let v = Vector3::new(0.3, -1.2, 2.0);

        for axis in axes.iter() {
            let axis = Unit::new_normalize(*axis);
            for angle in [0.0, 0.1, 1.0, -2.5, 4.0] {
                let expected = Rotation3::from_axis_angle(&axis, angle) * v;
                assert_relative_eq!(rotate_about(&v, &axis, angle), expected, epsilon = 1e-12);
            }
        }

        // f32 works too, since the camera lives in f32
        let v32 = Vector3::new(1.0f32, 0.0, 0.0);
        let rotated = rotate_about(&v32, &Vector3::y_axis(), std::f32::consts::FRAC_PI_2);
        assert_abs_diff_eq!(rotated, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_orientation_basis() {
        let axes = [
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.9, 0.1),
            Vector3::new(0.2, 0.9, -0.4),
        ];

        for axis in axes.iter() {
            let axis = Unit::new_normalize(*axis);
            let r = orientation_basis(&axis, 1e-9);

            assert_relative_eq!(r * Vector3::y(), axis.into_inner(), epsilon = 1e-12);
            assert_relative_eq!(r.matrix().determinant(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(
                r.matrix() * r.matrix().transpose(),
                nalgebra::Matrix3::identity(),
                epsilon = 1e-12
            );
        }

        assert_eq!(
            orientation_basis(&Vector3::y_axis(), 1e-9),
            Rotation3::identity()
        );
    }

    #[test]
    fn test_orbit_start_direction() {
        for axis in [
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.3, 0.8, 0.1),
        ] {
            let axis = Unit::new_normalize(axis);
            let start = orbit_start_direction(&axis, 1e-9);
            assert_relative_eq!(start.norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(start.dot(&axis), 0.0, epsilon = 1e-12);
        }

        // Flat orbits start along -z
        assert_relative_eq!(
            orbit_start_direction(&Vector3::y_axis(), 1e-9).into_inner(),
            -Vector3::z()
        );
    }

    #[test]
    fn test_axis_from_inclination() {
        assert_eq!(axis_from_inclination(0.0), Vector3::y_axis());
        assert_relative_eq!(
            axis_from_inclination(90.0).into_inner(),
            Vector3::z(),
            epsilon = 1e-12
        );

        let tilted = axis_from_inclination(7.0);
        assert_relative_eq!(tilted.y, 7.0f64.to_radians().cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(tilted.x, 0.0);
    }
}
