use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Isometry3, Point2, Point3};

use super::camera::SyncedCamera;
use super::controller::Controller;
use super::renderers::RingRenderer;
use crate::camera::CameraMode;
use crate::driver::FrameDriver;
use crate::model::generation::{DrawableDescriptor, SOLAR_SYSTEM};
use crate::model::orrery::BodyKind;

// Spheres are built at unit diameter and scaled up by the body transform
const UNIT_SPHERE_RADIUS: f32 = 0.5;

// One per row of the solar system table
const SOLAR_COLORS: [(f32, f32, f32); 10] = [
    (1.0, 0.85, 0.3),
    (0.6, 0.55, 0.5),
    (0.9, 0.75, 0.45),
    (0.25, 0.45, 0.85),
    (0.8, 0.35, 0.2),
    (0.85, 0.7, 0.5),
    (0.9, 0.8, 0.55),
    (0.6, 0.85, 0.9),
    (0.3, 0.4, 0.9),
    (0.75, 0.75, 0.75),
];

fn body_color(descriptor: &DrawableDescriptor) -> Point3<f32> {
    let (r, g, b) = if descriptor.textured {
        SOLAR_COLORS[descriptor.type_index % SOLAR_COLORS.len()]
    } else {
        match descriptor.kind {
            BodyKind::Sun => (1.0, 0.9, 0.4),
            BodyKind::Rocky => (0.7, 0.5, 0.35),
            BodyKind::Gas => (0.5, 0.7, 0.9),
            BodyKind::Moon => (0.8, 0.8, 0.8),
        }
    };
    Point3::new(r, g, b)
}

pub struct View {
    driver: FrameDriver,
    // Indexed by drawable handle
    body_spheres: Vec<SceneNode>,
    scene_generation: u64,
    camera: SyncedCamera,
    renderer: RingRenderer,
}

impl View {
    pub fn new(mut driver: FrameDriver, window: &mut Window) -> Self {
        driver.resize(window.width(), window.height());

        let body_spheres = Self::create_body_objects(window, driver.drawables());
        let camera = SyncedCamera::new(driver.camera());
        let renderer = RingRenderer::new(driver.settings().ring_segments);

        let mut view = View {
            scene_generation: driver.generation(),
            driver,
            body_spheres,
            camera,
            renderer,
        };
        view.update_scene_objects(window);
        view
    }

    fn create_body_objects(window: &mut Window, drawables: &[DrawableDescriptor]) -> Vec<SceneNode> {
        drawables
            .iter()
            .map(|descriptor| {
                let mut sphere = window.add_sphere(UNIT_SPHERE_RADIUS);
                let color = body_color(descriptor);
                sphere.set_color(color.x, color.y, color.z);
                sphere
            })
            .collect()
    }

    pub fn driver_mut(&mut self) -> &mut FrameDriver {
        &mut self.driver
    }

    /// Brings the scene graph in line with the driver. If the system was
    /// rebuilt since last time, the spheres are too.
    pub fn update_scene_objects(&mut self, window: &mut Window) {
        if self.scene_generation != self.driver.generation() {
            for sphere in self.body_spheres.iter_mut() {
                window.remove_node(sphere);
            }
            self.body_spheres = Self::create_body_objects(window, self.driver.drawables());
            self.scene_generation = self.driver.generation();
        }

        for drawable in self.driver.collect_drawables() {
            let sphere = match self.body_spheres.get_mut(drawable.handle.0) {
                Some(sphere) => sphere,
                None => continue,
            };
            let isometry: Isometry3<f32> = nalgebra::convert(drawable.transform.isometry);
            let scale = drawable.transform.scaling() as f32;
            sphere.set_local_transformation(isometry);
            sphere.set_local_scale(scale, scale, scale);
        }

        self.camera.sync(self.driver.camera());
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        self.renderer
            .set_num_segments(self.driver.settings().ring_segments);
        let ring_color = Point3::new(0.4, 0.4, 0.4);
        for ring in self.driver.visible_orbit_rings() {
            self.renderer.draw_ring(&ring, ring_color);
        }

        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.left_hand_text(),
            &Point2::origin(),
            60.0,
            &default_font,
            &text_color,
        );
        window.draw_text(
            &self.time_summary_text(controller.fps()),
            // no idea why i have to multiply by 2.0, but there it is
            &Point2::new(window.width() as f32 * 2.0 - 600.0, 0.0),
            60.0,
            &default_font,
            &text_color,
        );
    }

    fn left_hand_text(&self) -> String {
        let settings = self.driver.settings();
        let system = if settings.procedural {
            format!("Procedural ({} bodies)", settings.body_count)
        } else {
            String::from("Solar system")
        };
        let camera = match self.driver.camera_mode() {
            CameraMode::Free => "free",
            CameraMode::Orbit => "orbit",
        };

        format!(
            "System: {}
Focused on: {}
Camera: {}
Moons: {}",
            system,
            self.focused_body_name(),
            camera,
            self.driver.orrery().moon_count(),
        )
    }

    fn focused_body_name(&self) -> String {
        let id = match self.driver.focused_body() {
            Some(id) => id,
            None => return String::from("N/A"),
        };
        let handle = self.driver.orrery().get_body(id).drawable();
        let descriptor = &self.driver.drawables()[handle.0];
        if descriptor.textured {
            if let Some(entry) = SOLAR_SYSTEM.get(descriptor.type_index) {
                return entry.name.to_owned();
            }
        }
        format!("{:?} #{}", descriptor.kind, id.0)
    }

    fn time_summary_text(&self, fps: f64) -> String {
        let settings = self.driver.settings();
        format!(
            "Time: {:.1}
Time scale: {}x{}
FPS: {:.0}",
            self.driver.time(),
            settings.time_scale,
            if settings.paused { " (paused)" } else { "" },
            fps,
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}
