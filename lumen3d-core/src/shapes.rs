/// Procedural mesh generators
///
/// Every generator is a pure function of its arguments and returns
/// validated [`MeshData`]. Size arguments must be positive and finite.
use std::f64::consts::PI;

use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Dimension, MeshData};
use crate::vector::Vector3;

/// Largest vertex count addressable with `u16` indices
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// Largest slice count [`sphere`] accepts: `2 + 2 * 181^2` still fits in
/// `u16` indices.
pub const MAX_SPHERE_SLICES: u32 = 181;

fn check_extent(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!("{name} = {value}, must be positive and finite")))
    }
}

/// Axis-aligned 2D rectangle centred on the origin, spanning
/// `[-half_width, half_width] x [-half_height, half_height]`.
///
/// Corners run counter-clockwise from the bottom-left and are split into
/// two triangles.
pub fn rectangle(half_width: f64, half_height: f64) -> Result<MeshData> {
    check_extent("half_width", half_width)?;
    check_extent("half_height", half_height)?;

    let (w, h) = (half_width as f32, half_height as f32);
    let vertices = vec![
        -w, -h, //
        w, -h, //
        w, h, //
        -w, h,
    ];
    let indices = vec![0, 2, 3, 0, 1, 2];

    let mesh = MeshData::new(Dimension::Two, vertices, Some(indices), None)?;
    debug!(vertices = mesh.vertex_count(), indices = mesh.index_count(), "generated rectangle");
    Ok(mesh)
}

/// 2D disc as a triangle fan: one centre vertex plus `segment_count` rim
/// vertices, the last triangle wrapping back to the first rim vertex.
pub fn circle(radius: f64, segment_count: u32) -> Result<MeshData> {
    check_extent("radius", radius)?;
    if segment_count < 3 {
        return Err(Error::invalid_argument(format!(
            "circle needs at least 3 segments, got {segment_count}"
        )));
    }
    let segments = segment_count as usize;
    if segments + 1 > MAX_VERTICES {
        return Err(Error::invalid_argument(format!(
            "{segment_count} segments exceed the 16-bit index range"
        )));
    }

    let angle_step = 2.0 * PI / segments as f64;
    let mut vertices = Vec::with_capacity((segments + 1) * 2);
    let mut indices = Vec::with_capacity(segments * 3);

    vertices.extend_from_slice(&[0.0, 0.0]);
    for vertex in 1..=segments {
        let angle = (vertex - 1) as f64 * angle_step;
        vertices.push((radius * angle.cos()) as f32);
        vertices.push((radius * angle.sin()) as f32);

        let next = if vertex != segments { vertex + 1 } else { 1 };
        indices.extend_from_slice(&[0, vertex as u16, next as u16]);
    }

    let mesh = MeshData::new(Dimension::Two, vertices, Some(indices), None)?;
    debug!(
        segments = segment_count,
        vertices = mesh.vertex_count(),
        indices = mesh.index_count(),
        "generated circle"
    );
    Ok(mesh)
}

/// Box centred on the origin with the given edge lengths.
///
/// Faces do not share vertices: each of the six faces (left, front, right,
/// back, top, bottom) owns four vertices so it can carry a flat normal.
pub fn cuboid(x_length: f64, y_length: f64, z_length: f64) -> Result<MeshData> {
    check_extent("x_length", x_length)?;
    check_extent("y_length", y_length)?;
    check_extent("z_length", z_length)?;

    let x = (x_length / 2.0) as f32;
    let y = (y_length / 2.0) as f32;
    let z = (z_length / 2.0) as f32;

    // Four corners per face, then the face normal
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        ([[-x, y, z], [-x, y, -z], [-x, -y, z], [-x, -y, -z]], [-1.0, 0.0, 0.0]),
        ([[-x, y, -z], [x, y, -z], [-x, -y, -z], [x, -y, -z]], [0.0, 0.0, -1.0]),
        ([[x, y, -z], [x, y, z], [x, -y, -z], [x, -y, z]], [1.0, 0.0, 0.0]),
        ([[x, y, z], [-x, y, z], [x, -y, z], [-x, -y, z]], [0.0, 0.0, 1.0]),
        ([[-x, y, z], [x, y, z], [-x, y, -z], [x, y, -z]], [0.0, 1.0, 0.0]),
        ([[-x, -y, -z], [x, -y, -z], [-x, -y, z], [x, -y, z]], [0.0, -1.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24 * 3);
    let mut normals = Vec::with_capacity(24 * 3);
    let mut indices = Vec::with_capacity(36);

    for (face, (corners, normal)) in faces.iter().enumerate() {
        let base = (face * 4) as u16;
        for corner in corners {
            vertices.extend_from_slice(corner);
            normals.extend_from_slice(normal);
        }
        indices.extend_from_slice(&[base, base + 2, base + 3, base, base + 3, base + 1]);
    }

    let mesh = MeshData::new(Dimension::Three, vertices, Some(indices), Some(normals))?;
    debug!(vertices = mesh.vertex_count(), indices = mesh.index_count(), "generated box");
    Ok(mesh)
}

/// Point on a sphere from its inclination (angle from +Y) and azimuth
/// (angle around Y starting at +X)
fn spherical_to_cartesian(radius: f64, inclination: f64, azimuth: f64) -> Vector3 {
    Vector3::new(
        radius * inclination.sin() * azimuth.cos(),
        radius * inclination.cos(),
        radius * inclination.sin() * azimuth.sin(),
    )
}

/// UV-sphere centred on the origin.
///
/// Layout: vertex 0 is the top pole, then `slice_count` inclination bands
/// of `2 * slice_count` azimuth samples each, then the bottom pole, for
/// `2 + 2 * slice_count^2` vertices. Bands sit half a step away from the
/// poles. Normals are the normalized positions.
///
/// `slice_count` must lie in `2..=MAX_SPHERE_SLICES`.
pub fn sphere(radius: f64, slice_count: u32) -> Result<MeshData> {
    check_extent("radius", radius)?;
    if !(2..=MAX_SPHERE_SLICES).contains(&slice_count) {
        return Err(Error::invalid_argument(format!(
            "sphere slice count {slice_count} outside 2..={MAX_SPHERE_SLICES}"
        )));
    }

    let slices = slice_count as usize;
    let ring = 2 * slices;
    let vertex_count = 2 + ring * slices;
    let angle_step = PI / slices as f64;

    let mut vertices = Vec::with_capacity(vertex_count * 3);
    let mut normals = Vec::with_capacity(vertex_count * 3);

    vertices.extend_from_slice(&[0.0, radius as f32, 0.0]);
    normals.extend_from_slice(&Vector3::UP.to_f32_array());

    for band in 0..slices {
        let inclination = angle_step / 2.0 + band as f64 * angle_step;
        for sample in 0..ring {
            let position = spherical_to_cartesian(radius, inclination, sample as f64 * angle_step);
            vertices.extend_from_slice(&position.to_f32_array());
            normals.extend_from_slice(&position.normalize().to_f32_array());
        }
    }

    vertices.extend_from_slice(&[0.0, -(radius as f32), 0.0]);
    normals.extend_from_slice(&Vector3::DOWN.to_f32_array());

    let indices = sphere_indices(slices);
    let mesh = MeshData::new(Dimension::Three, vertices, Some(indices), Some(normals))?;
    debug!(
        slices = slice_count,
        vertices = mesh.vertex_count(),
        indices = mesh.index_count(),
        "generated sphere"
    );
    Ok(mesh)
}

/// Triangle list for the sphere layout described on [`sphere`].
///
/// `adjacent(v)` is the next vertex around the same band, wrapping from
/// the last sample back to the first. Callers keep `slices` small enough
/// for every index to fit in `u16`.
fn sphere_indices(slices: usize) -> Vec<u16> {
    let ring = 2 * slices;
    let vertex_count = 2 + ring * slices;
    let bottom = vertex_count - 1;

    let adjacent = |v: usize| ((v - 1) / ring) * ring + (v % ring) + 1;

    let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(4 * ring * slices);

    // Top cap
    for v in 1..=ring {
        triangles.push([0, v, adjacent(v)]);
    }

    // Two triangles per quad between consecutive bands
    for v in 1..=(vertex_count - ring - 2) {
        let below = v + ring;
        triangles.push([v, below, adjacent(below)]);
        triangles.push([v, adjacent(below), adjacent(v)]);
    }

    // Bottom cap
    for v in (vertex_count - ring - 1)..bottom {
        triangles.push([v, bottom, adjacent(v)]);
    }

    triangles.into_iter().flatten().map(|i| i as u16).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &MeshData) {
        let count = mesh.vertex_count();
        let indices = mesh.indices().expect("generators emit indices");
        assert_eq!(indices.len() % 3, 0);
        assert!(indices.iter().all(|&i| usize::from(i) < count));
    }

    #[test]
    fn test_rectangle() {
        let mesh = rectangle(0.5, 0.5).unwrap();
        assert_eq!(mesh.dimension(), Dimension::Two);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), Some(&[0u16, 2, 3, 0, 1, 2][..]));
        assert_eq!(mesh.vertices(), &[-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5]);
        assert!(mesh.normals().is_none());
    }

    #[test]
    fn test_rectangle_rejects_degenerate_size() {
        assert!(rectangle(0.0, 1.0).is_err());
        assert!(rectangle(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_circle_fan_wraps() {
        let mesh = circle(1.0, 4).unwrap();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(
            mesh.indices().unwrap(),
            &[0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1]
        );
        assert_indices_in_range(&mesh);

        // First rim vertex sits on +X, the second a quarter turn later
        let v = mesh.vertices();
        assert_eq!(&v[2..4], &[1.0, 0.0]);
        assert!(v[4].abs() < 1e-6 && (v[5] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_circle_needs_three_segments() {
        assert!(matches!(circle(1.0, 2), Err(Error::InvalidArgument(_))));
        assert!(circle(1.0, 3).is_ok());
    }

    #[test]
    fn test_circle_rim_on_radius() {
        let mesh = circle(2.0, 64).unwrap();
        for i in 1..mesh.vertex_count() {
            let [x, y, _] = mesh.position(i);
            assert!(((x * x + y * y).sqrt() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cuboid() {
        let mesh = cuboid(0.5, 0.5, 0.5).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert_indices_in_range(&mesh);

        let normals = mesh.normals().unwrap();
        assert_eq!(normals.len(), 24 * 3);
        for n in normals.chunks(3) {
            let non_zero: Vec<f32> = n.iter().copied().filter(|c| *c != 0.0).collect();
            assert_eq!(non_zero.len(), 1);
            assert_eq!(non_zero[0].abs(), 1.0);
        }
    }

    #[test]
    fn test_cuboid_face_vertices_lie_on_face_plane() {
        let mesh = cuboid(1.0, 2.0, 4.0).unwrap();
        let normals = mesh.normals().unwrap();
        let half = [0.5f32, 1.0, 2.0];
        for i in 0..mesh.vertex_count() {
            let position = mesh.position(i);
            let normal = &normals[i * 3..i * 3 + 3];
            let axis = normal.iter().position(|c| *c != 0.0).unwrap();
            assert_eq!(position[axis], normal[axis] * half[axis]);
        }
    }

    #[test]
    fn test_sphere_counts() {
        for slices in [2u32, 3, 8, 16] {
            let mesh = sphere(0.5, slices).unwrap();
            let s = slices as usize;
            assert_eq!(mesh.vertex_count(), 2 + 2 * s * s);
            assert_eq!(mesh.index_count(), 12 * s * s);
            assert_indices_in_range(&mesh);
        }
    }

    #[test]
    fn test_sphere_normals_and_radius() {
        let mesh = sphere(2.0, 8).unwrap();
        let normals = mesh.normals().unwrap();
        for i in 0..mesh.vertex_count() {
            let n = &normals[i * 3..i * 3 + 3];
            let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((length - 1.0).abs() < 1e-5);

            let [x, y, z] = mesh.position(i);
            assert!(((x * x + y * y + z * z).sqrt() - 2.0).abs() < 1e-5);
        }
        assert_eq!(mesh.position(0), [0.0, 2.0, 0.0]);
        assert_eq!(mesh.position(mesh.vertex_count() - 1), [0.0, -2.0, 0.0]);
    }

    #[test]
    fn test_sphere_indices_two_slices() {
        // 4 samples per band, vertices 1-4 and 5-8, bottom pole 9
        let indices = sphere_indices(2);
        let expected: Vec<u16> = vec![
            0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1, //
            1, 5, 6, 1, 6, 2, //
            2, 6, 7, 2, 7, 3, //
            3, 7, 8, 3, 8, 4, //
            4, 8, 5, 4, 5, 1, //
            5, 9, 6, 6, 9, 7, 7, 9, 8, 8, 9, 5,
        ];
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_sphere_every_band_edge_used() {
        // Each seam edge (last sample -> first sample) must appear in the mesh
        let slices = 5usize;
        let ring = 2 * slices;
        let indices = sphere_indices(slices);
        for band in 0..slices {
            let last = band * ring + ring;
            let first = band * ring + 1;
            let found = indices.chunks(3).any(|t| {
                let t: Vec<usize> = t.iter().map(|&i| usize::from(i)).collect();
                t.contains(&last) && t.contains(&first)
            });
            assert!(found, "seam edge missing in band {band}");
        }
    }

    #[test]
    fn test_sphere_slice_limits() {
        assert!(sphere(1.0, 1).is_err());
        assert!(sphere(1.0, MAX_SPHERE_SLICES + 1).is_err());
        assert!(sphere(-1.0, 4).is_err());

        let largest = sphere(1.0, MAX_SPHERE_SLICES).unwrap();
        assert!(largest.vertex_count() <= MAX_VERTICES);
        assert_indices_in_range(&largest);
    }
}
