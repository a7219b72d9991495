use std::process;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;

use rust_orrery::driver::FrameDriver;
use rust_orrery::gui::Simulation;
use rust_orrery::settings::{Args, Settings};

fn main() {
    env_logger::init();

    let settings = Settings::from(Args::parse());
    let driver = match FrameDriver::new(settings) {
        Ok(driver) => driver,
        Err(err) => {
            log::error!("Couldn't build the starting system: {}", err);
            process::exit(1);
        }
    };

    let mut window = Window::new("Orrery");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));

    let simulation = Simulation::new(driver, &mut window);
    window.render_loop(simulation);
}
