//! Loads an OBJ asset and draws every submesh in wireframe.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ember_engine::render::{Color, MeshRendererConfig};
use ember_mesh::{VertexLayout, obj};
use ember_samples::{Scene, ViewArgs, fill_mode, run_mesh};

const DEFAULT_ASSET: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/mushroom.obj");

#[derive(Parser, Debug)]
#[command(name = "import", about = "Import an OBJ asset and render it")]
struct Cli {
    /// OBJ file to load.
    #[arg(long, default_value = DEFAULT_ASSET)]
    asset: PathBuf,

    /// Fill triangles instead of drawing edges.
    #[arg(long)]
    solid: bool,

    #[command(flatten)]
    view: ViewArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.view.init_logging();

    let mesh = obj::load(&cli.asset)
        .with_context(|| format!("failed to load {}", cli.asset.display()))?;
    let bounds = mesh.bounds();
    log::info!(
        "{}: {} submeshes, centered at {:?} with extent {:?}",
        cli.asset.display(),
        mesh.submeshes().len(),
        bounds.center(),
        bounds.extent()
    );

    run_mesh(
        "ember import",
        &cli.view,
        Scene {
            mesh,
            layout: VertexLayout::position(),
            clear: Color::YELLOW,
            renderer: MeshRendererConfig {
                color: Color::RED,
                fill_mode: fill_mode(cli.solid),
                ..Default::default()
            },
        },
    )
}
