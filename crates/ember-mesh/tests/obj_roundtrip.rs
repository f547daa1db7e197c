use std::path::PathBuf;

use ember_mesh::{obj, primitives, Mesh, MeshError, VertexLayout};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn index_counts(mesh: &Mesh) -> Vec<usize> {
    mesh.submeshes().iter().map(|s| s.index_count()).collect()
}

#[test]
fn fixture_loads_both_groups() {
    let mesh = obj::load(fixture("two_groups.obj")).unwrap();
    let names: Vec<&str> = mesh.submeshes().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["cap", "stem"]);
    assert_eq!(index_counts(&mesh), vec![6, 3]);
    assert!(mesh.normals().is_some());
    assert!(mesh.tex_coords().is_none());
}

#[test]
fn loading_twice_is_deterministic() {
    let a = obj::load(fixture("two_groups.obj")).unwrap();
    let b = obj::load(fixture("two_groups.obj")).unwrap();
    assert_eq!(a.vertex_count(), b.vertex_count());
    assert_eq!(a.submeshes().len(), b.submeshes().len());
    assert_eq!(a, b);
}

#[test]
fn exported_cone_reimports_with_same_counts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("primitive.obj");

    let cone = primitives::cone([1.0, 1.0, 1.0], 10, 10, true).unwrap();
    obj::export(&cone, &path).unwrap();

    let back = obj::load(&path).unwrap();
    assert_eq!(back.submeshes().len(), cone.submeshes().len());
    assert_eq!(index_counts(&back), index_counts(&cone));
    assert_eq!(back.index_count(), cone.index_count());
}

#[test]
fn reexport_is_stable() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.obj");
    let second = dir.path().join("second.obj");

    let cube = primitives::cube(1.0).unwrap();
    obj::export(&cube, &first).unwrap();
    let once = obj::load(&first).unwrap();
    obj::export(&once, &second).unwrap();
    let twice = obj::load(&second).unwrap();

    assert_eq!(index_counts(&once), index_counts(&twice));
    assert_eq!(once.vertex_count(), twice.vertex_count());
}

#[test]
fn export_creates_missing_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared").join("data").join("cube.obj");

    obj::export(&primitives::cube(1.0).unwrap(), &path).unwrap();
    assert!(path.is_file());
}

#[test]
fn missing_asset_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.obj");

    match obj::load(&path) {
        Err(MeshError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn imported_asset_interleaves_as_position_only() {
    let mesh = obj::load(fixture("two_groups.obj")).unwrap();
    let bytes = mesh.interleave(&VertexLayout::position()).unwrap();
    assert_eq!(bytes.len(), mesh.vertex_count() * 12);

    let err = mesh
        .interleave(&VertexLayout::position_normal_uv())
        .unwrap_err();
    assert!(matches!(err, MeshError::MissingAttribute(_)));
}
