use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::driver::FrameDriver;

mod camera;
mod controller;
mod renderers;
mod view;

pub struct Simulation {
    view: View,
    controller: Controller,
}

impl Simulation {
    pub fn new(driver: FrameDriver, window: &mut Window) -> Self {
        let controller = Controller::new(driver.settings().clone());
        Self {
            view: View::new(driver, window),
            controller,
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller
                .process_event(event, self.view.driver_mut());
        }
        self.controller.sync_settings(self.view.driver_mut());
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());

        let input = self.controller.take_frame_input();
        self.view.driver_mut().tick(&input);

        self.view.update_scene_objects(window);
        self.view.prerender_scene(window, &self.controller);
        self.controller.increment_frame_counter();
    }
}
