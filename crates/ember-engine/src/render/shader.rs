//! Embedded WGSL and its up-front validation.
//!
//! wgpu reports shader errors through the device's uncaptured-error handler,
//! which by default panics. Running the source through naga first turns a bad
//! shader into an ordinary `Err` before any GPU object is created.

use thiserror::Error;

/// Shader validation failure.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to parse shader `{label}`: {message}")]
    Parse { label: String, message: String },

    #[error("shader `{label}` failed validation: {message}")]
    Validation { label: String, message: String },

    #[error("shader has no {stage:?} entry point named `{name}`")]
    MissingEntryPoint { name: String, stage: naga::ShaderStage },
}

/// A WGSL vertex/fragment pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: &'static str,
    pub wgsl: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
}

/// The flat-color mesh shader: position at location 0, `FrameUniform` at group 0.
pub const MESH_SHADER: ShaderSource = ShaderSource {
    label: "ember mesh shader",
    wgsl: include_str!("shaders/mesh.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
};

impl ShaderSource {
    /// Parses and validates the source, then checks both entry points exist
    /// with the expected stages.
    pub fn validate(&self) -> Result<(), ShaderError> {
        let module = naga::front::wgsl::parse_str(self.wgsl).map_err(|e| ShaderError::Parse {
            label: self.label.to_string(),
            message: e.emit_to_string(self.wgsl),
        })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| ShaderError::Validation {
                label: self.label.to_string(),
                message: e.emit_to_string(self.wgsl),
            })?;

        for (name, stage) in [
            (self.vertex_entry, naga::ShaderStage::Vertex),
            (self.fragment_entry, naga::ShaderStage::Fragment),
        ] {
            let found = module
                .entry_points
                .iter()
                .any(|ep| ep.name == name && ep.stage == stage);
            if !found {
                return Err(ShaderError::MissingEntryPoint {
                    name: name.to_string(),
                    stage,
                });
            }
        }

        log::debug!("shader `{}` validated", self.label);
        Ok(())
    }

    /// Creates the wgpu module. Call [`validate`](Self::validate) first.
    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label),
            source: wgpu::ShaderSource::Wgsl(self.wgsl.into()),
        })
    }
}
