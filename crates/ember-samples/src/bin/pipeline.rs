//! A cube sliding back and forth: one pipeline, one uniform updated per frame.

use anyhow::{Context, Result};
use clap::Parser;

use ember_engine::render::{Color, FillMode, MeshRendererConfig};
use ember_engine::time::{DEFAULT_STEP, Phase};
use ember_mesh::primitives;
use ember_samples::{Scene, ViewArgs, run_mesh};

#[derive(Parser, Debug)]
#[command(name = "pipeline", about = "Render an animated cube")]
struct Cli {
    /// Edge length of the cube.
    #[arg(long, default_value = "1.0")]
    size: f32,

    /// Timer increment per frame. Must be positive and finite.
    #[arg(long, default_value_t = DEFAULT_STEP, value_parser = parse_step)]
    step: f32,

    /// Draw edges only.
    #[arg(long)]
    wireframe: bool,

    #[command(flatten)]
    view: ViewArgs,
}

fn parse_step(arg: &str) -> Result<f32, String> {
    let step: f32 = arg.parse().map_err(|e| format!("`{arg}` is not a number: {e}"))?;
    Phase::new(step).map(|_| step).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.view.init_logging();

    let cube = primitives::cube(cli.size).context("failed to build cube")?;
    let layout = cube.natural_layout();

    run_mesh(
        "ember pipeline",
        &cli.view,
        Scene {
            mesh: cube,
            layout,
            clear: Color::CREAM,
            renderer: MeshRendererConfig {
                color: Color::RED,
                fill_mode: if cli.wireframe {
                    FillMode::Wireframe
                } else {
                    FillMode::Solid
                },
                animate: true,
                phase_step: cli.step,
                ..Default::default()
            },
        },
    )
}
