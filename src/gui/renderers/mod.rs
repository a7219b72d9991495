use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Matrix4, Point3};

use self::utils::{draw_polyline, ring_points};
use crate::model::orrery::OrbitRing;

mod utils;

/// Radius of the untransformed ring. Ring transforms scale by the orbit's
/// diameter, so this has to be a half.
const UNIT_RING_RADIUS: f32 = 0.5;

/// Draws orbit rings as line loops. Lines only last one frame, so rings get
/// handed over again every frame.
pub struct RingRenderer {
    line_renderer: LineRenderer,
    num_segments: usize,
}

impl RingRenderer {
    pub fn new(num_segments: usize) -> Self {
        RingRenderer {
            line_renderer: LineRenderer::new(),
            num_segments,
        }
    }

    pub fn set_num_segments(&mut self, num_segments: usize) {
        self.num_segments = num_segments;
    }

    pub fn draw_ring(&mut self, ring: &OrbitRing, color: Point3<f32>) {
        let transform: Matrix4<f32> = nalgebra::convert(ring.matrix());
        let points = ring_points(&transform, UNIT_RING_RADIUS, self.num_segments);
        draw_polyline(&mut self.line_renderer, &points, color);
    }
}

impl Renderer for RingRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.line_renderer.render(pass, camera);
    }
}
