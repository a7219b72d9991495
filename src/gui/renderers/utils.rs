use std::f32::consts::TAU;

use kiss3d::renderer::LineRenderer;
use nalgebra::{Matrix4, Point3};

/// Fewer than this and a "ring" is a line or a triangle at best.
pub const MIN_RING_SEGMENTS: usize = 3;

/// Points around a circle of `radius` in the XZ plane, pushed through
/// `transform`. The last point is the first one again, so the loop closes
/// exactly.
pub fn ring_points(
    transform: &Matrix4<f32>,
    radius: f32,
    num_segments: usize,
) -> Vec<Point3<f32>> {
    let num_segments = num_segments.max(MIN_RING_SEGMENTS);
    let step = TAU / num_segments as f32;

    let mut points: Vec<Point3<f32>> = (0..num_segments)
        .map(|i| {
            let (sin, cos) = (step * i as f32).sin_cos();
            transform.transform_point(&Point3::new(radius * cos, 0.0, radius * sin))
        })
        .collect();
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

pub fn draw_polyline(line_renderer: &mut LineRenderer, points: &[Point3<f32>], color: Point3<f32>) {
    for pair in points.windows(2) {
        line_renderer.draw_line(pair[0], pair[1], color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_ring_closes() {
        let points = ring_points(&Matrix4::identity(), 0.5, 16);
        assert_eq!(points.len(), 17);
        assert_eq!(points[0], points[16]);
        assert_relative_eq!(points[0], Point3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(points[4], Point3::new(0.0, 0.0, 0.5), epsilon = 1e-6);
        for p in &points {
            assert_relative_eq!(p.coords.norm(), 0.5, epsilon = 1e-6);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn test_ring_transform_and_minimum() {
        let transform = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0))
            * Matrix4::new_scaling(4.0);
        let points = ring_points(&transform, 0.5, 0);
        assert_eq!(points.len(), MIN_RING_SEGMENTS + 1);

        let center = Point3::new(1.0, 2.0, 3.0);
        for p in &points {
            assert_relative_eq!((p - center).norm(), 2.0, epsilon = 1e-5);
        }
    }
}
