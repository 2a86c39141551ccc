mod app;
mod state;
mod tests;

use std::path::PathBuf;

use clap::Parser;

/// Headless camera driver: animates a camera along a bound path, projects a
/// small scene every frame, then simulates pointer input and a pick.
#[derive(Parser, Debug)]
#[command(name = "px-app", version)]
struct Args {
    /// TOML file with camera and controller options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of animation frames to run
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Radius of the orbit path followed during the animation
    #[arg(long, default_value_t = 12.0)]
    radius: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    log::info!("starting with {args:?}");

    let mut app = app::App::new(args.config.as_deref(), args.width, args.height)?;
    let summary = app.run(args.frames, args.radius);

    println!("Frames rendered: {}", summary.frames);
    println!("Average visible objects: {:.2}", summary.average_visible());
    match summary.picked {
        Some((name, distance)) => println!("Picked '{name}' at distance {distance:.3}"),
        None => println!("Pick ray hit nothing"),
    }

    Ok(())
}
