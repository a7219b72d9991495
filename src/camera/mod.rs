use std::collections::HashSet;

use nalgebra::{Matrix4, Point3, Unit, Vector3};

use crate::math::geometry::rotate_about;

mod orbit;
mod projection;

pub use orbit::{CameraPose, OrbitState, DEFAULT_DISTANCE, MAX_DISTANCE, POLAR_LIMIT};
pub use projection::{unhinged_perspective, width_angle};

pub const MIN_NEAR: f32 = 1.0e-3;
pub const MIN_DEPTH_RATIO: f32 = 1.0 + 1.0e-3;
// Pitching closer than this to straight up or down is refused
const PITCH_LIMIT: f32 = 1.0e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Free,
    Orbit,
}

impl CameraPose {
    pub fn free_default() -> Self {
        CameraPose {
            position: Point3::new(30.0, 15.0, 30.0),
            look: Vector3::new(-3.0, -1.5, -3.0).normalize(),
            up: Vector3::y(),
        }
    }
}

/// A camera that either flies around freely, or rides along with a body and
/// circles it.
///
/// In orbit mode, the pose is owned by the orbit state and gets overwritten
/// every frame by `resolve_orbit_world_state`.
#[derive(Debug, Clone)]
pub struct Camera {
    // -- pose --
    pose: CameraPose,
    mode: CameraMode,
    orbit: OrbitState,
    // -- perspective --
    width: u32,
    height: u32,
    height_angle: f32,
    width_angle: f32,
    near: f32,
    far: f32,
    projection: Matrix4<f32>,
}

impl Camera {
    pub fn new(width: u32, height: u32, near: f32, far: f32) -> Self {
        let mut camera = Camera {
            pose: CameraPose::free_default(),
            mode: CameraMode::Free,
            orbit: OrbitState::new(),
            width: 0,
            height: 0,
            height_angle: 30f32.to_radians(),
            width_angle: 0.0,
            near: 0.0,
            far: 0.0,
            projection: Matrix4::identity(),
        };
        camera.set_clip_planes(near, far);
        camera.resize(width, height);
        camera
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        // Minimized windows report zero, which would blow up the aspect ratio
        self.width = width.max(1);
        self.height = height.max(1);
        self.width_angle = width_angle(self.height_angle, self.aspect_ratio());
        self.rebuild_projection();
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near.max(MIN_NEAR);
        self.far = far.max(self.near * MIN_DEPTH_RATIO);
        self.rebuild_projection();
    }

    fn rebuild_projection(&mut self) {
        self.projection =
            unhinged_perspective(self.near, self.far, self.width_angle, self.height_angle);
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switches modes. Either way, the camera starts over from its default
    /// pose and orbit.
    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
        self.pose = CameraPose::free_default();
        self.orbit.reset();
    }

    pub fn reset_orbit(&mut self) {
        self.orbit.reset();
    }

    pub fn orbit(&self) -> &OrbitState {
        &self.orbit
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn position(&self) -> Point3<f32> {
        self.pose.position
    }

    pub fn look(&self) -> Vector3<f32> {
        self.pose.look
    }

    pub fn up(&self) -> Vector3<f32> {
        self.pose.up
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn height_angle(&self) -> f32 {
        self.height_angle
    }

    pub fn width_angle(&self) -> f32 {
        self.width_angle
    }

    pub fn clip_planes(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let w = (-self.pose.look).normalize();
        let v = (self.pose.up - self.pose.up.dot(&w) * w).normalize();
        let u = v.cross(&w);

        #[rustfmt::skip]
        let rotation = Matrix4::new(
            u.x, u.y, u.z, 0.0,
            v.x, v.y, v.z, 0.0,
            w.x, w.y, w.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        rotation * Matrix4::new_translation(&-self.pose.position.coords)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    /// In free mode, slides the camera by `distance` along each held
    /// direction. In orbit mode, forward and backward pull the camera in
    /// toward the body or push it out.
    pub fn move_camera(&mut self, keys: &HashSet<MoveKey>, distance: f32) {
        match self.mode {
            CameraMode::Free => {
                let look = self.pose.look;
                let left = self.pose.up.cross(&look);
                let mut offset = Vector3::zeros();
                for key in keys {
                    offset += match key {
                        MoveKey::Forward => look,
                        MoveKey::Backward => -look,
                        MoveKey::Left => left,
                        MoveKey::Right => -left,
                        MoveKey::Up => Vector3::y(),
                        MoveKey::Down => -Vector3::y(),
                    };
                }
                self.pose.position += offset * distance;
            }
            CameraMode::Orbit => {
                if keys.contains(&MoveKey::Forward) {
                    self.orbit.change_distance(-distance);
                }
                if keys.contains(&MoveKey::Backward) {
                    self.orbit.change_distance(distance);
                }
            }
        }
    }

    pub fn rotate_camera(&mut self, dx: f32, dy: f32) {
        match self.mode {
            CameraMode::Free => {
                let look = rotate_about(&self.pose.look, &Vector3::y_axis(), -dx);
                let mut look = look.normalize();

                // Pitch around the camera's right, unless it would leave us
                // staring along up
                if let Some(right) = Unit::try_new(look.cross(&self.pose.up), PITCH_LIMIT) {
                    let pitched = rotate_about(&look, &right, -dy).normalize();
                    if pitched.cross(&self.pose.up).norm() > PITCH_LIMIT {
                        look = pitched;
                    }
                }
                self.pose.look = look;
            }
            CameraMode::Orbit => self.orbit.rotate(dx, dy),
        }
    }

    /// Moves the orbiting camera to follow a body whose model matrix is
    /// `model`. Does nothing in free mode.
    pub fn resolve_orbit_world_state(&mut self, model: &Matrix4<f64>) {
        if self.mode != CameraMode::Orbit {
            return;
        }
        let model: Matrix4<f32> = nalgebra::convert(*model);
        self.pose = self.orbit.resolve(&model);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(800, 600, 0.1, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::{Translation3, Vector4};
    use std::f32::consts::PI;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn keys(keys: &[MoveKey]) -> HashSet<MoveKey> {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.mode(), CameraMode::Free);
        assert_eq!(camera.position(), Point3::new(30.0, 15.0, 30.0));
        assert_relative_eq!(camera.look().norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.height_angle(), 30f32.to_radians());
        assert_relative_eq!(camera.aspect_ratio(), 4.0 / 3.0);
        assert_eq!(camera.clip_planes(), (0.1, 1000.0));
    }

    #[test]
    fn test_resize() {
        let mut camera = Camera::default();
        let before = camera.projection_matrix();
        camera.resize(1920, 1080);
        assert_relative_eq!(
            camera.width_angle(),
            2.0 * ((camera.height_angle() / 2.0).tan() * 16.0 / 9.0).atan()
        );
        assert_ne!(camera.projection_matrix(), before);

        // A minimized window doesn't divide by zero
        camera.resize(640, 0);
        assert_eq!(camera.height(), 1);
        assert!(camera.projection_matrix().iter().all(|x| x.is_finite()));

        for (width, height) in [(0, 600), (0, 0)] {
            camera.resize(width, height);
            assert_eq!(camera.width(), 1);
            assert!(camera.width_angle() > 0.0);
            assert!(camera.projection_matrix().iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_clip_plane_clamps() {
        let mut camera = Camera::default();
        camera.set_clip_planes(0.0, 0.0);
        let (near, far) = camera.clip_planes();
        assert_eq!(near, MIN_NEAR);
        assert!(far > near);
        assert!(camera.projection_matrix().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let mut camera = Camera::default();
        camera.resize(1024, 768);
        let first = camera.projection_matrix();
        for _ in 0..10 {
            assert_eq!(camera.projection_matrix(), first);
        }
        // Rebuilding from the same inputs gives the same bits
        camera.resize(1024, 768);
        assert_eq!(camera.projection_matrix(), first);
    }

    #[test]
    fn test_view_basis() {
        let mut camera = Camera::default();
        camera.rotate_camera(0.3, -0.2);
        camera.move_camera(&keys(&[MoveKey::Forward, MoveKey::Left]), 2.0);

        let view = camera.view_matrix();
        let eye = view * camera.position().to_homogeneous();
        assert_abs_diff_eq!(eye, Vector4::new(0.0, 0.0, 0.0, 1.0), epsilon = 1e-4);

        let ahead = view * (camera.position() + camera.look()).to_homogeneous();
        assert_abs_diff_eq!(ahead, Vector4::new(0.0, 0.0, -1.0, 1.0), epsilon = 1e-4);

        // Up stays up-ish even though it isn't perpendicular to look
        let above = view * (camera.position() + Vector3::y()).to_homogeneous();
        assert!(above.y > 0.0);
    }

    #[test]
    fn test_free_movement() {
        let mut camera = Camera::default();
        let start = camera.position();
        let look = camera.look();

        camera.move_camera(&keys(&[]), 5.0);
        assert_eq!(camera.position(), start);

        camera.move_camera(&keys(&[MoveKey::Forward]), 2.0);
        assert_relative_eq!(camera.position(), start + look * 2.0, epsilon = 1e-5);

        // Opposite keys cancel
        camera.move_camera(&keys(&[MoveKey::Left, MoveKey::Right]), 2.0);
        assert_relative_eq!(camera.position(), start + look * 2.0, epsilon = 1e-5);

        camera.move_camera(&keys(&[MoveKey::Up]), 1.5);
        assert_relative_eq!(
            camera.position(),
            start + look * 2.0 + Vector3::y() * 1.5,
            epsilon = 1e-5
        );

        // Left is up x look
        let before = camera.position();
        camera.move_camera(&keys(&[MoveKey::Left]), 1.0);
        assert_relative_eq!(
            camera.position() - before,
            Vector3::y().cross(&look),
            epsilon = 1e-5
        );

        // Orbit state is untouched
        assert_eq!(camera.orbit().distance(), DEFAULT_DISTANCE);
    }

    #[test]
    fn test_free_rotation() {
        let mut camera = Camera::default();
        let look = camera.look();

        // Pure yaw keeps the height of look
        camera.rotate_camera(0.5, 0.0);
        assert_relative_eq!(camera.look().y, look.y, epsilon = 1e-6);
        assert_relative_eq!(
            camera.look(),
            rotate_about(&look, &Vector3::y_axis(), -0.5),
            epsilon = 1e-6
        );

        // Hammering pitch never lines look up with up
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            camera.rotate_camera(rng.gen_range(-1.0..1.0), rng.gen_range(-2.0..2.0));
            assert_relative_eq!(camera.look().norm(), 1.0, epsilon = 1e-4);
            assert!(camera.look().cross(&camera.up()).norm() > PITCH_LIMIT / 2.0);
            assert!(camera.view_matrix().iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_orbit_mode_inputs() {
        let mut camera = Camera::default();
        camera.set_mode(CameraMode::Orbit);
        let position = camera.position();

        camera.move_camera(&keys(&[MoveKey::Forward]), 1.0);
        assert_relative_eq!(camera.orbit().distance(), DEFAULT_DISTANCE - 1.0);
        camera.move_camera(&keys(&[MoveKey::Left, MoveKey::Up, MoveKey::Down]), 1.0);
        assert_relative_eq!(camera.orbit().distance(), DEFAULT_DISTANCE - 1.0);
        assert_eq!(camera.position(), position);

        // Never closer than zero
        for _ in 0..20 {
            camera.move_camera(&keys(&[MoveKey::Forward]), 0.7);
            assert!(camera.orbit().distance() >= 0.0);
        }
        assert_eq!(camera.orbit().distance(), 0.0);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            camera.rotate_camera(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
            let polar = camera.orbit().polar();
            assert!(polar > 0.0 && polar < PI);
        }
    }

    #[test]
    fn test_mode_switch_resets() {
        let mut camera = Camera::default();
        camera.move_camera(&keys(&[MoveKey::Forward]), 4.0);
        camera.set_mode(CameraMode::Orbit);
        camera.rotate_camera(1.0, 0.5);
        camera.move_camera(&keys(&[MoveKey::Backward]), 2.0);

        camera.set_mode(CameraMode::Free);
        assert_eq!(camera.pose(), &CameraPose::free_default());
        assert_eq!(camera.orbit(), &OrbitState::new());
    }

    #[test]
    fn test_orbit_tracking() {
        let mut camera = Camera::default();
        let model = Translation3::new(5.0, 0.0, 0.0).to_homogeneous();

        // Free cameras ignore the tracked body
        camera.resolve_orbit_world_state(&model);
        assert_eq!(camera.pose(), &CameraPose::free_default());

        camera.set_mode(CameraMode::Orbit);
        camera.resolve_orbit_world_state(&model);
        assert_relative_eq!(camera.position(), Point3::new(8.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(camera.look(), -Vector3::x(), epsilon = 1e-6);
        assert_relative_eq!(camera.up(), Vector3::y(), epsilon = 1e-6);

        // The body is dead ahead
        let view = camera.view_matrix();
        let body = view * Vector4::new(5.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(body, Vector4::new(0.0, 0.0, -3.0, 1.0), epsilon = 1e-4);
    }
}
