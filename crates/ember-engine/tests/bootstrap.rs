use ember_engine::device::{GpuDevice, GpuInit};
use ember_engine::render::{MESH_SHADER, ShaderError, ShaderSource};

#[test]
fn bootstrap_without_backends_fails() {
    let init = GpuInit {
        backends: wgpu::Backends::empty(),
        ..Default::default()
    };
    let result = pollster::block_on(GpuDevice::headless(&init));
    let err = result.err().expect("no backend should yield no device");
    assert!(format!("{err:#}").contains("GPU not available"));
}

#[test]
fn embedded_shader_validates() {
    MESH_SHADER.validate().unwrap();
}

#[test]
fn shader_without_fragment_stage_is_rejected() {
    let vertex_only = ShaderSource {
        label: "vertex only",
        wgsl: "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }",
        vertex_entry: "vs_main",
        fragment_entry: "fs_main",
    };
    match vertex_only.validate() {
        Err(ShaderError::MissingEntryPoint { name, .. }) => assert_eq!(name, "fs_main"),
        other => panic!("expected missing fs_main, got {other:?}"),
    }
}

#[test]
fn layout_mismatch_is_caught_before_gpu_work() {
    // Interleaving is the first step of renderer construction; an imported
    // position-only asset cannot feed a normal+uv pipeline.
    let mesh = ember_engine::mesh::obj::parse(&mut std::io::Cursor::new(
        "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
    ))
    .unwrap();
    assert!(
        mesh.interleave(&ember_engine::mesh::VertexLayout::position_normal_uv())
            .is_err()
    );
    assert!(
        mesh.interleave(&ember_engine::mesh::VertexLayout::position())
            .is_ok()
    );
}
