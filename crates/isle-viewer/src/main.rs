//! Isle Viewer - desktop entry point

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use tracing::{info, Level};
#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::FmtSubscriber;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "isle-viewer")]
#[command(about = "Rotatable Island of Wizardry viewer")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "isle.toml")]
    config: PathBuf,

    /// Model path relative to the assets directory, or an https:// URL
    #[arg(short, long)]
    model: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write the default configuration to --config and exit
    #[arg(long)]
    write_default_config: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Isle viewer v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default_config {
        isle_core::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    // Load configuration
    let mut config = isle_core::load_config(&args.config)?;

    // Override model path if specified
    if let Some(model) = args.model {
        config.scene.model_path = model;
    }

    info!(
        model = %config.scene.model_path,
        damping = config.interaction.damping_factor,
        "Configuration loaded"
    );

    match isle_viewer::app::run(config) {
        bevy::app::AppExit::Success => Ok(()),
        bevy::app::AppExit::Error(code) => Err(anyhow::anyhow!("Viewer exited with code {}", code)),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
