use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

use crate::camera::Camera as OrreryCamera;

// kiss3d wants to own a camera and poke at it, but ours lives in the frame
// driver. So this is a read-only copy of it, refreshed once per frame. Input
// goes through the controller rather than `handle_event`.
pub struct SyncedCamera {
    eye: Point3<f32>,
    look: Vector3<f32>,
    up: Vector3<f32>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    clip_planes: (f32, f32),
}

impl SyncedCamera {
    pub fn new(camera: &OrreryCamera) -> Self {
        let mut synced = SyncedCamera {
            eye: Point3::origin(),
            look: -Vector3::z(),
            up: Vector3::y(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            clip_planes: (0.0, 0.0),
        };
        synced.sync(camera);
        synced
    }

    pub fn sync(&mut self, camera: &OrreryCamera) {
        self.eye = camera.position();
        self.look = camera.look();
        self.up = camera.up();
        self.view = camera.view_matrix();
        self.projection = camera.projection_matrix();
        self.clip_planes = camera.clip_planes();
    }
}

impl Camera for SyncedCamera {
    fn handle_event(&mut self, _canvas: &Canvas, _event: &WindowEvent) {}

    fn eye(&self) -> Point3<f32> {
        self.eye
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye, &(self.eye + self.look), &self.up)
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        self.clip_planes
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection);
        view.upload(&self.view);
    }
}
