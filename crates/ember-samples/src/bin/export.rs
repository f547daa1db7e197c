//! Generates a primitive, writes it to an OBJ file and shows it in wireframe.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use ember_engine::render::{Color, MeshRendererConfig};
use ember_mesh::{Mesh, MeshError, obj, primitives};
use ember_samples::{Scene, ViewArgs, fill_mode, run_mesh};

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
enum Shape {
    Cone,
    Sphere,
}

impl Shape {
    fn build(self) -> Result<Mesh, MeshError> {
        match self {
            Shape::Cone => primitives::cone([1.0, 1.0, 1.0], 10, 10, true),
            Shape::Sphere => primitives::sphere([0.75, 0.75, 0.75], 100, 100),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "export", about = "Export a generated primitive as OBJ and render it")]
struct Cli {
    /// Primitive to generate.
    #[arg(long, value_enum, default_value_t = Shape::Cone)]
    shape: Shape,

    /// Where the OBJ file is written.
    #[arg(long, default_value = "shared-data/primitive.obj")]
    out: PathBuf,

    /// Fill triangles instead of drawing edges.
    #[arg(long)]
    solid: bool,

    #[command(flatten)]
    view: ViewArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.view.init_logging();

    let mesh = cli
        .shape
        .build()
        .with_context(|| format!("failed to build {:?}", cli.shape))?;
    obj::export(&mesh, &cli.out)
        .with_context(|| format!("failed to export {:?} to {}", cli.shape, cli.out.display()))?;

    let layout = mesh.natural_layout();
    run_mesh(
        "ember export",
        &cli.view,
        Scene {
            mesh,
            layout,
            clear: Color::GREEN,
            renderer: MeshRendererConfig {
                color: Color::RED,
                fill_mode: fill_mode(cli.solid),
                ..Default::default()
            },
        },
    )
}
