//! Procedural primitives.
//!
//! All generators produce triangle-list meshes centred on the origin with
//! positions, normals and texture coordinates. Winding is counter-clockwise
//! when viewed from outside.

use std::f32::consts::{PI, TAU};

use crate::error::MeshError;
use crate::mesh::{Mesh, Submesh};

/// Vertex streams accumulated by the generators.
#[derive(Default)]
struct Streams {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
}

impl Streams {
    fn push(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        index
    }

    fn finish(self, submeshes: Vec<Submesh>) -> Result<Mesh, MeshError> {
        Mesh::new(
            self.positions,
            Some(self.normals),
            Some(self.uvs),
            submeshes,
        )
    }
}

fn check_extent(extent: [f32; 3]) -> Result<(), MeshError> {
    if extent.iter().all(|e| e.is_finite() && *e > 0.0) {
        Ok(())
    } else {
        Err(MeshError::InvalidPrimitive(format!(
            "extent must be positive and finite, got {extent:?}"
        )))
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len <= f32::EPSILON {
        [0.0, 1.0, 0.0]
    } else {
        [v[0] / len, v[1] / len, v[2] / len]
    }
}

/// Axis-aligned cube with edge length `size`.
///
/// 24 vertices (four per face so normals stay flat) and one submesh of 36 indices.
pub fn cube(size: f32) -> Result<Mesh, MeshError> {
    check_extent([size; 3])?;
    let h = size * 0.5;

    // (normal, u axis, v axis) with u × v = normal.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut streams = Streams::default();
    let mut indices = Vec::with_capacity(36);

    for (n, u, v) in FACES {
        let mut quad = [0u32; 4];
        for (slot, (su, sv)) in quad.iter_mut().zip(CORNERS) {
            let p = [
                (n[0] + su * u[0] + sv * v[0]) * h,
                (n[1] + su * u[1] + sv * v[1]) * h,
                (n[2] + su * u[2] + sv * v[2]) * h,
            ];
            let uv = [(su + 1.0) * 0.5, 1.0 - (sv + 1.0) * 0.5];
            *slot = streams.push(p, n, uv);
        }
        indices.extend_from_slice(&[quad[0], quad[1], quad[2], quad[0], quad[2], quad[3]]);
    }

    streams.finish(vec![Submesh::triangles("cube", indices)])
}

/// Cone fitting `extent`, apex at `+y`, base at `-y`.
///
/// The side is split into `vertical_segments` rings of `radial_segments`
/// quads (triangles at the apex row). With `cap`, the base disc is a second
/// submesh named `cap`.
pub fn cone(
    extent: [f32; 3],
    radial_segments: u32,
    vertical_segments: u32,
    cap: bool,
) -> Result<Mesh, MeshError> {
    check_extent(extent)?;
    if radial_segments < 3 || vertical_segments < 1 {
        return Err(MeshError::InvalidPrimitive(format!(
            "cone needs at least 3 radial and 1 vertical segment, got {radial_segments}x{vertical_segments}"
        )));
    }

    let (rx, height, rz) = (extent[0] * 0.5, extent[1], extent[2] * 0.5);
    let top = height * 0.5;
    // Slope term of the side normal, using the mean radius for elliptic bases.
    let slope = ((rx + rz) * 0.5) / height;

    let mut streams = Streams::default();
    let ring = radial_segments + 1;

    for row in 0..=vertical_segments {
        let t = row as f32 / vertical_segments as f32;
        let y = top - t * height;
        for seg in 0..ring {
            let s = seg as f32 / radial_segments as f32;
            let theta = s * TAU;
            let (sin, cos) = theta.sin_cos();
            streams.push(
                [cos * rx * t, y, sin * rz * t],
                normalize([cos, slope, sin]),
                [s, t],
            );
        }
    }

    let mut side = Vec::new();
    for row in 0..vertical_segments {
        for seg in 0..radial_segments {
            let a = row * ring + seg;
            let b = a + ring;
            if row == 0 {
                // Apex row collapses to one triangle per segment.
                side.extend_from_slice(&[a, b + 1, b]);
            } else {
                side.extend_from_slice(&[a, a + 1, b + 1, a, b + 1, b]);
            }
        }
    }

    let mut submeshes = vec![Submesh::triangles("cone", side)];

    if cap {
        let bottom = -top;
        let center = streams.push([0.0, bottom, 0.0], [0.0, -1.0, 0.0], [0.5, 0.5]);
        let first = center + 1;
        for seg in 0..ring {
            let theta = seg as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            streams.push(
                [cos * rx, bottom, sin * rz],
                [0.0, -1.0, 0.0],
                [0.5 + cos * 0.5, 0.5 + sin * 0.5],
            );
        }
        let mut disc = Vec::with_capacity(radial_segments as usize * 3);
        for seg in 0..radial_segments {
            disc.extend_from_slice(&[center, first + seg, first + seg + 1]);
        }
        submeshes.push(Submesh::triangles("cap", disc));
    }

    streams.finish(submeshes)
}

/// UV sphere (ellipsoid) fitting `extent`.
pub fn sphere(extent: [f32; 3], radial_segments: u32, vertical_segments: u32) -> Result<Mesh, MeshError> {
    check_extent(extent)?;
    if radial_segments < 3 || vertical_segments < 2 {
        return Err(MeshError::InvalidPrimitive(format!(
            "sphere needs at least 3 radial and 2 vertical segments, got {radial_segments}x{vertical_segments}"
        )));
    }

    let radii = [extent[0] * 0.5, extent[1] * 0.5, extent[2] * 0.5];
    let ring = radial_segments + 1;
    let mut streams = Streams::default();

    for row in 0..=vertical_segments {
        let v = row as f32 / vertical_segments as f32;
        let (sin_phi, cos_phi) = (v * PI).sin_cos();
        for seg in 0..ring {
            let u = seg as f32 / radial_segments as f32;
            let (sin_theta, cos_theta) = (u * TAU).sin_cos();
            let unit = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            streams.push(
                [unit[0] * radii[0], unit[1] * radii[1], unit[2] * radii[2]],
                normalize([unit[0] / radii[0], unit[1] / radii[1], unit[2] / radii[2]]),
                [u, v],
            );
        }
    }

    let mut indices = Vec::new();
    for row in 0..vertical_segments {
        for seg in 0..radial_segments {
            let a = row * ring + seg;
            let b = a + ring;
            if row == 0 {
                indices.extend_from_slice(&[a, b + 1, b]);
            } else if row == vertical_segments - 1 {
                indices.extend_from_slice(&[a, a + 1, b]);
            } else {
                indices.extend_from_slice(&[a, a + 1, b + 1, a, b + 1, b]);
            }
        }
    }

    streams.finish(vec![Submesh::triangles("sphere", indices)])
}
