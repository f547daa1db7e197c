//! Wavefront OBJ import and export.
//!
//! Import goes through `tobj` (triangulated, single index stream). Every OBJ
//! object/group that carries faces becomes one triangle submesh over a shared
//! vertex buffer. Export writes the inverse: shared `v`/`vt`/`vn` streams and
//! one `g` block of `f` records per submesh, so a written file re-imports with
//! the same submesh and index counts.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::MeshError;
use crate::mesh::{Mesh, PrimitiveType, Submesh};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Loads an OBJ asset from disk.
///
/// Material libraries are not resolved; only geometry is read.
pub fn load(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse(&mut BufReader::new(file))?;
    log::debug!(
        "loaded {}: {} vertices, {} submeshes, {} indices",
        path.display(),
        mesh.vertex_count(),
        mesh.submeshes().len(),
        mesh.index_count()
    );
    Ok(mesh)
}

/// Parses OBJ text from any buffered reader.
pub fn parse<R: BufRead>(reader: &mut R) -> Result<Mesh, MeshError> {
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;
    from_models(models)
}

fn from_models(models: Vec<tobj::Model>) -> Result<Mesh, MeshError> {
    let models: Vec<tobj::Model> = models
        .into_iter()
        .filter(|m| !m.mesh.indices.is_empty())
        .collect();
    if models.is_empty() {
        return Err(MeshError::EmptyAsset);
    }

    // Optional streams survive only if every group provides them.
    let keep_normals = models.iter().all(|m| !m.mesh.normals.is_empty());
    let keep_uvs = models.iter().all(|m| !m.mesh.texcoords.is_empty());

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut submeshes = Vec::with_capacity(models.len());

    for (i, model) in models.into_iter().enumerate() {
        let mesh = model.mesh;
        let base = positions.len() as u32;

        positions.extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
        if keep_normals {
            normals.extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
        }
        if keep_uvs {
            uvs.extend(mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]));
        }

        let name = if model.name.trim().is_empty() {
            format!("submesh{i}")
        } else {
            model.name
        };
        let indices = mesh.indices.iter().map(|&idx| idx + base).collect();
        submeshes.push(Submesh::triangles(name, indices));
    }

    Mesh::new(
        positions,
        keep_normals.then_some(normals),
        keep_uvs.then_some(uvs),
        submeshes,
    )
}

/// Writes `mesh` to `path`, creating parent directories as needed.
pub fn export(mesh: &Mesh, path: impl AsRef<Path>) -> Result<(), MeshError> {
    let path = path.as_ref();
    let io_err = |source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    write_at(mesh, path, &mut writer)?;
    writer.flush().map_err(io_err)?;

    log::info!(
        "exported {} submeshes ({} indices) to {}",
        mesh.submeshes().len(),
        mesh.index_count(),
        path.display()
    );
    Ok(())
}

/// [`write`], with stream errors reported against `path`.
fn write_at<W: Write>(mesh: &Mesh, path: &Path, writer: &mut W) -> Result<(), MeshError> {
    write(mesh, writer).map_err(|err| match err {
        MeshError::Write(source) => MeshError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Serialises `mesh` as OBJ text.
///
/// Only triangle submeshes are representable; anything else is rejected
/// before a single byte is written.
pub fn write<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<(), MeshError> {
    if let Some(s) = mesh
        .submeshes()
        .iter()
        .find(|s| s.primitive() != PrimitiveType::Triangles)
    {
        return Err(MeshError::UnsupportedPrimitive {
            submesh: s.name().to_string(),
            primitive: s.primitive(),
        });
    }

    writeln!(writer, "# ember-mesh")?;
    writeln!(
        writer,
        "# {} vertices, {} submeshes",
        mesh.vertex_count(),
        mesh.submeshes().len()
    )?;

    for p in mesh.positions() {
        writeln!(writer, "v {} {} {}", p[0], p[1], p[2])?;
    }
    if let Some(uvs) = mesh.tex_coords() {
        for t in uvs {
            writeln!(writer, "vt {} {}", t[0], t[1])?;
        }
    }
    if let Some(normals) = mesh.normals() {
        for n in normals {
            writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
        }
    }

    let face = FaceFormat::for_mesh(mesh);
    for (i, submesh) in mesh.submeshes().iter().enumerate() {
        writeln!(writer, "g {}", group_name(submesh.name(), i))?;
        for tri in submesh.indices().chunks_exact(3) {
            writeln!(
                writer,
                "f {} {} {}",
                face.token(tri[0]),
                face.token(tri[1]),
                face.token(tri[2])
            )?;
        }
    }

    Ok(())
}

/// OBJ group names are whitespace-delimited.
fn group_name(name: &str, index: usize) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        format!("submesh{index}")
    } else {
        cleaned
    }
}

#[derive(Debug, Copy, Clone)]
struct FaceFormat {
    uv: bool,
    normal: bool,
}

impl FaceFormat {
    fn for_mesh(mesh: &Mesh) -> Self {
        Self {
            uv: mesh.tex_coords().is_some(),
            normal: mesh.normals().is_some(),
        }
    }

    /// OBJ indices are 1-based; all streams share the vertex index.
    fn token(self, index: u32) -> String {
        let i = index as u64 + 1;
        match (self.uv, self.normal) {
            (true, true) => format!("{i}/{i}/{i}"),
            (true, false) => format!("{i}/{i}"),
            (false, true) => format!("{i}//{i}"),
            (false, false) => format!("{i}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD_AND_TRI: &str = "\
o shapes
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 2 0 0
g quad
f 1 2 3 4
g tri
f 2 5 3
";

    fn parse_str(src: &str) -> Result<Mesh, MeshError> {
        parse(&mut Cursor::new(src))
    }

    #[test]
    fn groups_become_submeshes() {
        let mesh = parse_str(QUAD_AND_TRI).unwrap();
        assert_eq!(mesh.submeshes().len(), 2);
        // Quad is triangulated into two triangles.
        assert_eq!(mesh.submeshes()[0].index_count(), 6);
        assert_eq!(mesh.submeshes()[1].index_count(), 3);
        assert!(mesh.normals().is_none());
        assert!(mesh.tex_coords().is_none());
    }

    #[test]
    fn submesh_indices_address_shared_buffer() {
        let mesh = parse_str(QUAD_AND_TRI).unwrap();
        let tri = &mesh.submeshes()[1];
        let p = mesh.positions();
        let corners: Vec<[f32; 3]> = tri.indices().iter().map(|&i| p[i as usize]).collect();
        assert_eq!(corners, vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
    }

    #[test]
    fn no_faces_is_empty_asset() {
        let err = parse_str("v 0 0 0\nv 1 0 0\n").unwrap_err();
        assert!(matches!(err, MeshError::EmptyAsset));
    }

    #[test]
    fn normals_and_uvs_are_kept() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";
        let mesh = parse_str(src).unwrap();
        assert_eq!(mesh.normals().unwrap(), &[[0.0, 0.0, 1.0]; 3]);
        assert_eq!(mesh.tex_coords().unwrap()[1], [1.0, 0.0]);
    }

    #[test]
    fn write_then_parse_keeps_counts() {
        let mesh = crate::primitives::cone([1.0, 1.0, 1.0], 10, 10, true).unwrap();
        let mut buf = Vec::new();
        write(&mesh, &mut buf).unwrap();

        let back = parse(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back.submeshes().len(), mesh.submeshes().len());
        for (a, b) in mesh.submeshes().iter().zip(back.submeshes()) {
            assert_eq!(a.index_count(), b.index_count());
        }
        assert!(back.normals().is_some());
        assert!(back.tex_coords().is_some());
    }

    #[test]
    fn face_tokens_match_streams() {
        let f = |uv, normal| FaceFormat { uv, normal }.token(0);
        assert_eq!(f(true, true), "1/1/1");
        assert_eq!(f(true, false), "1/1");
        assert_eq!(f(false, true), "1//1");
        assert_eq!(f(false, false), "1");
    }

    #[test]
    fn group_names_lose_whitespace() {
        assert_eq!(group_name("left arm", 0), "left_arm");
        assert_eq!(group_name("  ", 3), "submesh3");
    }

    #[test]
    fn write_rejects_non_triangle_submesh() {
        let mesh = Mesh::new(
            vec![[0.0; 3], [1.0, 0.0, 0.0]],
            None,
            None,
            vec![Submesh::new("edge", PrimitiveType::Lines, vec![0, 1])],
        )
        .unwrap();
        let mut buf = Vec::new();
        let err = write(&mesh, &mut buf).unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedPrimitive { .. }));
        assert!(buf.is_empty());
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::StorageFull, "no space left"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stream_errors_name_the_destination() {
        let mesh = parse(&mut Cursor::new(QUAD_AND_TRI)).unwrap();
        let path = Path::new("out/shapes.obj");

        let err = write_at(&mesh, path, &mut FullDisk).unwrap_err();
        match &err {
            MeshError::Io { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::StorageFull);
            }
            other => panic!("expected Io, got {other:?}"),
        }
        assert!(err.to_string().contains("out/shapes.obj"));
    }
}
