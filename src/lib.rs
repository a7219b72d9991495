pub mod camera;
pub mod driver;
pub mod error;
pub mod gui;
pub mod math;
pub mod model;
pub mod settings;
