use std::process;

use clap::Parser;
use nalgebra::Point3;

use rust_orrery::driver::{FrameDriver, FrameInput};
use rust_orrery::settings::{Args, Settings};

/// Builds a system without opening a window, and prints it out.
#[derive(Debug, Parser)]
struct CliArgs {
    #[command(flatten)]
    settings: Args,
    /// Number of steps to simulate
    #[arg(long, default_value_t = 0)]
    steps: usize,
    /// Seconds per step
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    let mut driver = match FrameDriver::new(Settings::from(args.settings)) {
        Ok(driver) => driver,
        Err(err) => {
            eprintln!("Couldn't generate system: {}", err);
            process::exit(1);
        }
    };

    print_bodies(&driver);
    if args.steps == 0 {
        return;
    }

    let input = FrameInput {
        dt: args.dt,
        ..FrameInput::default()
    };
    for _ in 0..args.steps {
        driver.tick(&input);
    }

    println!();
    println!("Positions at t = {:.3}", driver.time());
    for (id, body) in driver.orrery().bodies() {
        println!("{:>3}  {}", id.0, format_point(&body.position()));
    }
}

fn print_bodies(driver: &FrameDriver) {
    let orrery = driver.orrery();
    println!(
        "{} bodies ({} moons)",
        orrery.num_bodies(),
        orrery.moon_count()
    );
    println!(
        "{:>3}  {:>6}  {:>5}  {:>8}  {:>8}  {:>8}  {:>8}",
        "id", "parent", "kind", "diameter", "radius", "orbit v", "spin v"
    );
    for (id, body) in orrery.bodies() {
        let params = body.params();
        let parent = match body.parent() {
            Some(parent) => parent.0.to_string(),
            None => String::from("-"),
        };
        let kind = driver.drawables()[body.drawable().0].kind;
        println!(
            "{:>3}  {:>6}  {:>5}  {:>8.3}  {:>8.3}  {:>8.3}  {:>8.3}",
            id.0,
            parent,
            format!("{:?}", kind),
            params.diameter,
            params.orbit_radius,
            params.orbit_velocity,
            params.spin_velocity
        );
    }
}

fn format_point(p: &Point3<f64>) -> String {
    format!("({:>9.3}, {:>9.3}, {:>9.3})", p.x, p.y, p.z)
}
