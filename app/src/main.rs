//! SDFPad - Interactive editor for layered 2D signed distance fields

mod app;
mod editor;
mod panels;
mod settings;
mod watch;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "sdfpad")]
#[command(about = "Compose 2D SDFs from layered shapes and copy the generated WGSL", long_about = None)]
#[command(version)]
pub struct Args {
    /// Directory containing palette.wgsl and preview.wgsl (embedded fragments if omitted)
    #[arg(long)]
    pub shader_dir: Option<PathBuf>,

    /// Rebuild the preview when fragments in the shader directory change
    #[arg(long)]
    pub watch: bool,

    /// Window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height
    #[arg(long)]
    pub height: Option<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let stored = settings::load_settings();
    let settings = stored.clone().with_overrides(&args);

    tracing::info!("SDFPad v{}", env!("CARGO_PKG_VERSION"));
    match &settings.shader_dir {
        Some(dir) => tracing::info!("Shader fragments from {}", dir.display()),
        None => tracing::info!("Using embedded shader fragments"),
    }

    app::run(settings, stored)
}
