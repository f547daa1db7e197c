//! GPU rendering subsystem.
//!
//! One renderer: [`MeshRenderer`] owns a single pipeline and a single uploaded
//! mesh and draws every submesh once per frame.
//!
//! Convention:
//! - positions are fed to clip space unchanged (no camera, no projection)
//! - the shader reads position at location 0 and one uniform at group 0

mod color;
mod ctx;
mod gpu_mesh;
mod mesh_renderer;
mod pipeline;
mod scope;
pub mod shader;

pub use color::Color;
pub use ctx::{RenderCtx, RenderTarget};
pub use gpu_mesh::{DrawRange, GpuMesh};
pub use mesh_renderer::{MeshRenderer, MeshRendererConfig};
pub use pipeline::{FillMode, FrameUniform, MeshPipeline};
pub use shader::{MESH_SHADER, ShaderError, ShaderSource};
