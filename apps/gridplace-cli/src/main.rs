mod script;

use clap::{Parser, Subcommand};
use gridplace_author::{PlacementSession, SessionConfig};
use gridplace_board::PlacementRegistry;
use gridplace_scene::{DebugTextRenderer, HeadlessScene, Renderer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridplace-cli", about = "Grid placement editor driver")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Snap a world position on the ground to its grid cell
    Snap {
        #[arg(long, allow_hyphen_values = true)]
        x: f32,
        #[arg(long, allow_hyphen_values = true)]
        z: f32,
    },
    /// Run a scripted sequence of pointer events and print the final scene
    Play {
        /// Script file (YAML list of steps)
        #[arg(short, long)]
        script: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            Ok(SessionConfig::load(p)?)
        }
        None => Ok(SessionConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("gridplace-cli v{}", env!("CARGO_PKG_VERSION"));
            let grid = config.grid();
            println!(
                "grid: {0}x{0} cells of {1}, {2} placeable",
                grid.divisions(),
                grid.cell_size(),
                grid.cell_count()
            );
            println!("grid: {}", gridplace_grid::crate_info());
            println!("scene: {}", gridplace_scene::crate_info());
            println!("assets: {}", gridplace_assets::crate_info());
            println!("input: {}", gridplace_input::crate_info());
            println!("author: {}", gridplace_author::crate_info());
        }
        Commands::Snap { x, z } => {
            let grid = config.grid();
            let cell = grid.snap(glam::Vec3::new(x, 0.0, z));
            let center = grid.cell_center(cell);
            println!(
                "({x}, {z}) -> cell {cell}, center ({}, {}), inside grid: {}",
                center.x,
                center.z,
                grid.contains(cell)
            );
        }
        Commands::Play { script } => {
            let steps = script::load(&script)?;
            let _span = tracing::info_span!("play", steps = steps.len()).entered();

            let mut session = PlacementSession::with_prototype(&config)?;
            let mut scene = HeadlessScene::new(config.grid().extent());
            for (i, step) in steps.iter().enumerate() {
                let result = script::run_step(&mut session, &mut scene, step);
                println!("[{i:>3}] {}", script::describe(&result));
            }

            let frame = DebugTextRenderer.render(&scene, &session.render_view());
            println!("{frame}");

            let replayed = PlacementRegistry::replay(session.registry().events());
            println!(
                "Placed: {}, undo: {}, redo: {}, replay: {}",
                session.registry().len(),
                session.editor().undo_count(),
                session.editor().redo_count(),
                if replayed.state_hash() == session.registry().state_hash() {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
