use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use displayblock_input::{Action, apply_action};
use displayblock_kernel::{DEFAULT_SCENE, Item, Viewport};
use displayblock_labyrinth::{Labyrinth, LabyrinthConfig, MAX_SIDE, TableRenderer, TextRenderer};
use displayblock_persist::{State, StateStore};
use displayblock_physics::{PhysicsBody, PhysicsConfig, PhysicsWorld, StepStats};
use displayblock_render::{DebugTextRenderer, DomRenderer, Renderer};
use glam::DVec3;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "displayblock-cli", about = "CLI tool for displayblock scenes, mazes and physics")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Build a demo viewport and print or save its state
    Demo {
        /// Write the state here (with a .sha256 sidecar) instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Load a state file and print the rendered HTML
    Render { file: PathBuf },
    /// Load a state file and print a text summary
    Inspect { file: PathBuf },
    /// Generate a labyrinth
    Maze {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SIDE)))]
        width: Option<u32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SIDE)))]
        height: Option<u32>,
        #[arg(short, long)]
        seed: Option<u64>,
        /// YAML file with labyrinth settings; flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = MazeFormat::Text)]
        format: MazeFormat,
    },
    /// Drop a few boxes onto a floor and print where they settle
    Physics {
        #[arg(long, default_value = "240")]
        steps: u32,
        /// Seconds per step
        #[arg(long, default_value = "0.016666666666666666")]
        dt: f64,
        /// YAML file with physics settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MazeFormat {
    Text,
    Html,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("displayblock-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: default scene={DEFAULT_SCENE:?}");
            println!("render: {}", displayblock_render::crate_info());
            println!("input: {}", displayblock_input::crate_info());
            println!("persist: {}", displayblock_persist::crate_info());
            println!("physics: {}", displayblock_physics::crate_info());
            println!("labyrinth: {}", displayblock_labyrinth::crate_info());
        }
        Commands::Demo { out } => {
            let viewport = demo_viewport()?;
            match out {
                Some(path) => {
                    StateStore::save_viewport(&path, &viewport)
                        .with_context(|| format!("saving {}", path.display()))?;
                    info!(path = %path.display(), items = viewport.items().len(), "demo state written");
                }
                None => println!("{}", State::to_json(&viewport)?),
            }
        }
        Commands::Render { file } => {
            let viewport = load_viewport(&file)?;
            println!("{}", DomRenderer::new().render(&viewport).to_html());
        }
        Commands::Inspect { file } => {
            let viewport = load_viewport(&file)?;
            print!("{}", DebugTextRenderer::new().render(&viewport));
        }
        Commands::Maze {
            width,
            height,
            seed,
            config,
            format,
        } => {
            let mut settings: LabyrinthConfig = load_config(config.as_deref())?;
            if let Some(width) = width {
                settings.width = width;
            }
            if let Some(height) = height {
                settings.height = height;
            }
            if let Some(seed) = seed {
                settings.seed = seed;
            }

            let mut labyrinth = Labyrinth::with_config(settings);
            let solved = labyrinth.generate();
            match format {
                MazeFormat::Text => print!("{}", TextRenderer::new().render(&labyrinth)),
                MazeFormat::Html => println!("{}", TableRenderer::new().render(&labyrinth).to_html()),
            }
            if !solved {
                anyhow::bail!(
                    "no route from start to end after {} attempts",
                    labyrinth.config().max_attempts
                );
            }
        }
        Commands::Physics { steps, dt, config } => {
            let settings: PhysicsConfig = load_config(config.as_deref())?;
            run_physics(settings, steps, dt)?;
        }
    }

    Ok(())
}

fn load_viewport(path: &Path) -> anyhow::Result<Viewport> {
    StateStore::load_viewport(path).with_context(|| format!("loading {}", path.display()))
}

/// Read a YAML settings file, or fall back to defaults when none is given.
fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> anyhow::Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn demo_viewport() -> anyhow::Result<Viewport> {
    let mut viewport = Viewport::new(1280.0, 720.0);
    viewport.add_axes();

    let left = viewport.add_item(
        Item::cuboid(120.0, 60.0, 40.0).with_id("left"),
        -260.0,
        0.0,
        0.0,
        true,
        DEFAULT_SCENE,
    );
    let right = viewport.add_item(
        Item::cuboid(80.0, 80.0, 80.0).with_id("right"),
        220.0,
        -120.0,
        60.0,
        true,
        DEFAULT_SCENE,
    );

    let mut cube = Item::cube(50.0, None).with_id("cube");
    if let Some(cuboid) = cube.as_cuboid_mut() {
        cuboid.set_top_content("1:1");
        cuboid.set_front_content("cube");
    }
    viewport.add_item(cube, 0.0, 160.0, 0.0, true, DEFAULT_SCENE);

    let mut label = Item::surface(240.0, 40.0).with_id("label");
    if let Some(surface) = label.as_surface_mut() {
        surface.set_content("displayblock");
    }
    viewport.add_item(label, 20.0, 20.0, 0.0, false, "overlay");

    let link = viewport.add_item(Item::line(2.0, "#0ff").with_id("link"), 0.0, 0.0, 0.0, false, DEFAULT_SCENE);
    viewport
        .scene_mut(DEFAULT_SCENE)
        .context("default scene missing")?
        .connect(&link, &left, &right)?;

    apply_action(Action::Orbit { x: -20.0, y: 30.0 }, &mut viewport);
    viewport.draw();
    debug!(items = viewport.items().len(), "demo viewport built");
    Ok(viewport)
}

fn run_physics(config: PhysicsConfig, steps: u32, dt: f64) -> anyhow::Result<()> {
    let mut world = PhysicsWorld::new(config);
    world.add_body(PhysicsBody::fixed(DVec3::new(0.0, 500.0, 0.0), DVec3::new(1000.0, 20.0, 1000.0)));

    let mut boxes = Vec::new();
    for i in 0..4 {
        let x = -150.0 + 100.0 * f64::from(i);
        let body = PhysicsBody::new(DVec3::new(x, -50.0 * f64::from(i), 0.0), DVec3::splat(40.0), 1.0)
            .with_velocity(DVec3::new(0.0, 0.0, 10.0 * f64::from(i)));
        boxes.push(world.add_body(body));
    }

    let mut total = StepStats::default();
    for _ in 0..steps {
        let stats = world.step(dt)?;
        total.contacts += stats.contacts;
        total.bounces += stats.bounces;
        total.sleeping = stats.sleeping;
    }
    info!(
        steps,
        contacts = total.contacts,
        bounces = total.bounces,
        sleeping = total.sleeping,
        "physics run finished"
    );

    for handle in boxes {
        if let Some(body) = world.body(handle) {
            println!(
                "body {}: pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) on_ground={} sleeping={}",
                handle.0,
                body.position.x,
                body.position.y,
                body.position.z,
                body.velocity.x,
                body.velocity.y,
                body.velocity.z,
                body.is_on_ground,
                body.is_sleeping
            );
        }
    }
    Ok(())
}
