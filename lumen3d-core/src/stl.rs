/// STL import and export for 3D meshes
///
/// Decoded meshes are non-indexed: every facet contributes three vertices
/// and the facet normal is repeated for each of them.
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::map,
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult, InputLength,
};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Dimension, MeshData};
use crate::vector::Vector3;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;
const HEADER_TEXT: &[u8] = b"binary STL written by lumen3d";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Facet {
    normal: [f32; 3],
    corners: [[f32; 3]; 3],
}

fn parse_error<I: InputLength>(total: usize, err: nom::Err<nom::error::Error<I>>) -> Error {
    match err {
        nom::Err::Incomplete(_) => Error::parse("unexpected end of input"),
        nom::Err::Error(e) | nom::Err::Failure(e) => Error::parse(format!(
            "{:?} at offset {}",
            e.code,
            total - e.input.input_len()
        )),
    }
}

fn facets_to_mesh(facets: &[Facet]) -> Result<MeshData> {
    let mut vertices = Vec::with_capacity(facets.len() * 9);
    let mut normals = Vec::with_capacity(facets.len() * 9);
    for facet in facets {
        for corner in &facet.corners {
            vertices.extend_from_slice(corner);
            normals.extend_from_slice(&facet.normal);
        }
    }
    debug!(triangles = facets.len(), "decoded STL");
    MeshData::new(Dimension::Three, vertices, None, Some(normals))
}

/// Unit normal of the triangle `a, b, c` by its winding, zero if degenerate
fn face_normal([a, b, c]: [[f32; 3]; 3]) -> [f32; 3] {
    let point = |p: [f32; 3]| Vector3::new(p[0].into(), p[1].into(), p[2].into());
    let (a, b, c) = (point(a), point(b), point(c));
    let normal = (b - a).cross_product(c - a);
    let length = normal.length();
    if length > 0.0 {
        normal.scale(1.0 / length).to_f32_array()
    } else {
        [0.0; 3]
    }
}

fn mesh_facets(mesh: &MeshData) -> Result<Vec<Facet>> {
    if mesh.dimension() != Dimension::Three {
        return Err(Error::invalid_argument("STL can only hold 3D meshes"));
    }
    Ok(mesh
        .triangles()
        .map(|[a, b, c]| {
            let corners = [mesh.position(a), mesh.position(b), mesh.position(c)];
            Facet {
                normal: face_normal(corners),
                corners,
            }
        })
        .collect())
}

// Binary

fn vector3_le(input: &[u8]) -> IResult<&[u8], [f32; 3]> {
    map(tuple((le_f32, le_f32, le_f32)), |(x, y, z)| [x, y, z])(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    let (input, normal) = vector3_le(input)?;
    let (input, a) = vector3_le(input)?;
    let (input, b) = vector3_le(input)?;
    let (input, c) = vector3_le(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((
        input,
        Facet {
            normal,
            corners: [a, b, c],
        },
    ))
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<MeshData> {
    if data.len() < HEADER_LEN + 4 {
        return Err(Error::parse(format!(
            "{} bytes is too small for a binary STL",
            data.len()
        )));
    }

    let (body, triangle_count) = binary_header(data).map_err(|e| parse_error(data.len(), e))?;
    let triangle_count = triangle_count as usize;
    if body.len() / FACET_LEN < triangle_count {
        return Err(Error::parse(format!(
            "header announces {triangle_count} triangles but only {} follow",
            body.len() / FACET_LEN
        )));
    }

    let (_, facets) =
        count(binary_facet, triangle_count)(body).map_err(|e| parse_error(data.len(), e))?;
    facets_to_mesh(&facets)
}

/// Encode a 3D mesh as binary STL. Facet normals come from the winding.
pub fn write_binary_stl(mesh: &MeshData) -> Result<Vec<u8>> {
    let facets = mesh_facets(mesh)?;
    let triangle_count = u32::try_from(facets.len()).map_err(|_| {
        Error::invalid_argument(format!("{} triangles do not fit in STL", facets.len()))
    })?;

    let mut out = Vec::with_capacity(HEADER_LEN + 4 + facets.len() * FACET_LEN);
    let mut header = [0u8; HEADER_LEN];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    out.extend_from_slice(&header);
    out.extend_from_slice(&triangle_count.to_le_bytes());

    for facet in &facets {
        for value in facet.normal.iter().chain(facet.corners.iter().flatten()) {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    debug!(triangles = facets.len(), bytes = out.len(), "encoded binary STL");
    Ok(out)
}

// ASCII

fn ascii_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}

fn ascii_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    preceded(preceded(multispace0, tag("vertex")), ascii_vector3)(input)
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = ascii_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((
        input,
        Facet {
            normal,
            corners: [a, b, c],
        },
    ))
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, facets))
}

/// Parse an ASCII STL file holding a single solid
pub fn parse_ascii_stl(input: &str) -> Result<MeshData> {
    let (rest, facets) = ascii_solid(input).map_err(|e| parse_error(input.len(), e))?;
    if !rest.is_empty() {
        return Err(Error::parse(format!(
            "unexpected data after endsolid at offset {}",
            input.len() - rest.len()
        )));
    }
    facets_to_mesh(&facets)
}

/// Encode a 3D mesh as ASCII STL under the solid name `name`
pub fn write_ascii_stl(mesh: &MeshData, name: &str) -> Result<String> {
    let facets = mesh_facets(mesh)?;
    let name: String = name.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }).collect();

    let mut out = format!("solid {name}\n");
    for Facet { normal, corners } in &facets {
        out.push_str(&format!("  facet normal {} {} {}\n", normal[0], normal[1], normal[2]));
        out.push_str("    outer loop\n");
        for [x, y, z] in corners {
            out.push_str(&format!("      vertex {x} {y} {z}\n"));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    out.push_str(&format!("endsolid {name}\n"));

    debug!(triangles = facets.len(), "encoded ASCII STL");
    Ok(out)
}

/// Detect and parse STL file (binary or ASCII)
///
/// Input starting with `solid` is tried as ASCII first; binary headers may
/// start with the same word, so a failed ASCII parse falls back to binary.
/// If both fail, the ASCII error is reported.
pub fn parse_stl(data: &[u8]) -> Result<MeshData> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            return parse_ascii_stl(text)
                .or_else(|ascii_err| parse_binary_stl(data).map_err(|_| ascii_err));
        }
    }
    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{cuboid, rectangle};

    const TRIANGLE: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1.5e0 0
    endloop
  endfacet
endsolid tri
";

    #[test]
    fn test_parse_binary_header() {
        let data = vec![0u8; 84];
        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_binary_too_small() {
        let err = parse_binary_stl(&[0u8; 40]).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_binary_truncated() {
        let mut data = vec![0u8; 84 + FACET_LEN];
        data[80..84].copy_from_slice(&2u32.to_le_bytes());
        let err = parse_binary_stl(&data).unwrap_err();
        assert_eq!(
            err,
            Error::Parse("header announces 2 triangles but only 1 follow".to_string())
        );
    }

    #[test]
    fn test_parse_ascii_triangle() {
        let mesh = parse_ascii_stl(TRIANGLE).unwrap();
        assert_eq!(mesh.dimension(), Dimension::Three);
        assert!(mesh.indices().is_none());
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.position(2), [0.0, 1.5, 0.0]);
        assert_eq!(mesh.normals().unwrap(), &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_parse_ascii_rejects_garbage() {
        assert!(matches!(parse_ascii_stl("solid x\n  facet normal 0 0\n"), Err(Error::Parse(_))));
        assert!(matches!(parse_ascii_stl("not an stl"), Err(Error::Parse(_))));
        let trailing = format!("{TRIANGLE}solid again\n");
        assert!(matches!(parse_ascii_stl(&trailing), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_stl_reports_ascii_error() {
        let broken = TRIANGLE.replace("endsolid tri\n", "");
        assert!(broken.len() > 84);

        let err = parse_stl(broken.as_bytes()).unwrap_err();
        assert_eq!(err, parse_ascii_stl(&broken).unwrap_err());
        assert!(!err.to_string().contains("header announces"));
    }

    #[test]
    fn test_face_normal_follows_winding() {
        let ccw = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert_eq!(face_normal(ccw), [0.0, 0.0, 1.0]);
        let cw = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
        assert_eq!(face_normal(cw), [0.0, 0.0, -1.0]);
        assert_eq!(face_normal([[1.0, 1.0, 1.0]; 3]), [0.0; 3]);
    }

    #[test]
    fn test_binary_round_trip_keeps_positions() {
        let cube = cuboid(1.0, 2.0, 3.0).unwrap();
        let bytes = write_binary_stl(&cube).unwrap();
        assert_eq!(bytes.len(), 84 + 12 * FACET_LEN);

        let decoded = parse_stl(&bytes).unwrap();
        assert_eq!(decoded.vertex_count(), 36);
        for (t, [a, b, c]) in cube.triangles().enumerate() {
            assert_eq!(decoded.position(3 * t), cube.position(a));
            assert_eq!(decoded.position(3 * t + 1), cube.position(b));
            assert_eq!(decoded.position(3 * t + 2), cube.position(c));
        }
    }

    #[test]
    fn test_ascii_writer_layout() {
        let cube = cuboid(1.0, 1.0, 1.0).unwrap();
        let text = write_ascii_stl(&cube, "cube").unwrap();
        assert!(text.starts_with("solid cube\n  facet normal "));
        assert!(text.ends_with("  endfacet\nendsolid cube\n"));
        assert_eq!(text.matches("facet normal").count(), 12);

        let decoded = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(decoded.triangle_count(), 12);
    }

    #[test]
    fn test_writers_reject_2d_meshes() {
        let flat = rectangle(1.0, 1.0).unwrap();
        assert!(matches!(write_binary_stl(&flat), Err(Error::InvalidArgument(_))));
        assert!(matches!(write_ascii_stl(&flat, "flat"), Err(Error::InvalidArgument(_))));
    }
}
