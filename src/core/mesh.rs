// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

//! Reading STL files, both binary and ASCII.
//!
//! Binary STL is an 80-byte header, a little-endian u32 facet count, then 50
//! bytes per facet (normal + 3 vertices as LE f32 triples, plus a u16
//! attribute byte count). ASCII STL is the `solid`/`facet`/`vertex` grammar.
//! Coordinates are taken to be millimeters.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;

/// One STL facet: a normal and three vertices.
///
/// The stored normal is whatever the file declared; measurement code derives
/// its own normals from the vertex winding and ignores this field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
}

/// A triangle soup read from an STL file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub triangles: Vec<Triangle>,
}

const BINARY_HEADER_LEN: usize = 80;
const BINARY_FACET_LEN: usize = 50;

impl TriangleMesh {
    /// Read a mesh from an STL file on disk.
    // TODO: stream large binary files instead of reading them whole
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read STL file {}", path.display()))?;
        TriangleMesh::from_bytes(&bytes)
            .with_context(|| format!("Failed to parse STL file {}", path.display()))
    }

    /// Parse a mesh from raw STL bytes, detecting the format.
    ///
    /// The binary size test runs first so that a binary file whose header
    /// happens to begin with "solid" is still parsed as binary.
    pub fn from_bytes(bytes: &[u8]) -> Result<TriangleMesh> {
        if binary_size_matches(bytes) {
            return parse_binary(bytes);
        }
        if looks_ascii(bytes) {
            return parse_ascii(bytes);
        }
        if bytes.len() >= BINARY_HEADER_LEN + 4 {
            // Not "solid ..." and the size doesn't match the declared facet
            // count; parse_binary produces the precise error.
            return parse_binary(bytes);
        }
        bail!("Not an STL file (too short: {} bytes)", bytes.len());
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }
}

fn declared_facet_count(bytes: &[u8]) -> usize {
    let mut count = [0u8; 4];
    count.copy_from_slice(&bytes[BINARY_HEADER_LEN..BINARY_HEADER_LEN + 4]);
    u32::from_le_bytes(count) as usize
}

fn binary_size_matches(bytes: &[u8]) -> bool {
    if bytes.len() < BINARY_HEADER_LEN + 4 {
        return false;
    }
    let count = declared_facet_count(bytes);
    bytes.len() == BINARY_HEADER_LEN + 4 + count * BINARY_FACET_LEN
}

fn looks_ascii(bytes: &[u8]) -> bool {
    let head: Vec<u8> = bytes
        .iter()
        .copied()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(5)
        .collect();
    head.eq_ignore_ascii_case(b"solid")
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    f32::from_le_bytes(buf)
}

fn read_vec3(bytes: &[u8], offset: usize) -> [f32; 3] {
    [
        read_f32(bytes, offset),
        read_f32(bytes, offset + 4),
        read_f32(bytes, offset + 8),
    ]
}

fn parse_binary(bytes: &[u8]) -> Result<TriangleMesh> {
    let count = declared_facet_count(bytes);
    let expected = BINARY_HEADER_LEN + 4 + count * BINARY_FACET_LEN;
    if bytes.len() != expected {
        bail!(
            "Binary STL declares {} facets ({} bytes expected) but file has {} bytes",
            count,
            expected,
            bytes.len()
        );
    }

    debug!("parsing binary STL with {} facets", count);
    let mut triangles = Vec::with_capacity(count);
    for i in 0..count {
        let base = BINARY_HEADER_LEN + 4 + i * BINARY_FACET_LEN;
        triangles.push(Triangle {
            normal: read_vec3(bytes, base),
            vertices: [
                read_vec3(bytes, base + 12),
                read_vec3(bytes, base + 24),
                read_vec3(bytes, base + 36),
            ],
        });
        // 2 bytes of attribute byte count per facet are ignored.
    }
    Ok(TriangleMesh { triangles })
}

/// Whitespace-separated token reader over the ASCII grammar.
struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens {
            inner: text.split_whitespace(),
        }
    }

    fn next(&mut self) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| anyhow::anyhow!("Unexpected end of ASCII STL"))
    }

    fn expect(&mut self, keyword: &str) -> Result<()> {
        let token = self.next()?;
        if !token.eq_ignore_ascii_case(keyword) {
            bail!("Expected '{}' in ASCII STL, found '{}'", keyword, token);
        }
        Ok(())
    }

    fn float(&mut self) -> Result<f32> {
        let token = self.next()?;
        token
            .parse::<f32>()
            .with_context(|| format!("Invalid coordinate '{}' in ASCII STL", token))
    }

    fn vec3(&mut self) -> Result<[f32; 3]> {
        Ok([self.float()?, self.float()?, self.float()?])
    }
}

fn parse_ascii(bytes: &[u8]) -> Result<TriangleMesh> {
    let text = std::str::from_utf8(bytes).context("ASCII STL is not valid UTF-8")?;
    let mut tokens = Tokens::new(text);

    tokens.expect("solid")?;

    // The solid name is optional and may contain spaces; skip tokens until
    // the first facet (or endsolid, for an empty solid).
    let mut triangles = Vec::new();
    loop {
        let token = tokens.next()?;
        if token.eq_ignore_ascii_case("endsolid") {
            break;
        }
        if !token.eq_ignore_ascii_case("facet") {
            if triangles.is_empty() {
                // Still reading the solid name.
                continue;
            }
            bail!("Expected 'facet' or 'endsolid' in ASCII STL, found '{}'", token);
        }

        tokens.expect("normal")?;
        let normal = tokens.vec3()?;
        tokens.expect("outer")?;
        tokens.expect("loop")?;
        let mut vertices = [[0f32; 3]; 3];
        for vertex in vertices.iter_mut() {
            tokens.expect("vertex")?;
            *vertex = tokens.vec3()?;
        }
        tokens.expect("endloop")?;
        tokens.expect("endfacet")?;
        triangles.push(Triangle { normal, vertices });
    }

    debug!("parsed ASCII STL with {} facets", triangles.len());
    Ok(TriangleMesh { triangles })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serialize triangles into binary STL bytes, with a caller-chosen header.
    pub(crate) fn binary_stl(header: &[u8], triangles: &[Triangle]) -> Vec<u8> {
        let mut bytes = vec![0u8; BINARY_HEADER_LEN];
        bytes[..header.len().min(BINARY_HEADER_LEN)]
            .copy_from_slice(&header[..header.len().min(BINARY_HEADER_LEN)]);
        bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for t in triangles {
            for f in t.normal.iter() {
                bytes.extend_from_slice(&f.to_le_bytes());
            }
            for v in t.vertices.iter() {
                for f in v.iter() {
                    bytes.extend_from_slice(&f.to_le_bytes());
                }
            }
            bytes.extend_from_slice(&0u16.to_le_bytes());
        }
        bytes
    }

    fn sample_triangle() -> Triangle {
        Triangle {
            normal: [0.0, 0.0, 1.0],
            vertices: [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    #[test]
    fn test_binary_roundtrip() {
        let bytes = binary_stl(b"assay test", &[sample_triangle()]);
        let mesh = TriangleMesh::from_bytes(&bytes).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0], sample_triangle());
    }

    #[test]
    fn test_binary_header_starting_with_solid_is_still_binary() {
        let bytes = binary_stl(b"solid exported-from-cad", &[sample_triangle()]);
        let mesh = TriangleMesh::from_bytes(&bytes).unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn test_binary_truncated_is_err() {
        let mut bytes = binary_stl(b"", &[sample_triangle(), sample_triangle()]);
        bytes.truncate(bytes.len() - 10);
        let e = TriangleMesh::from_bytes(&bytes).unwrap_err().to_string();
        assert!(e.contains("declares 2 facets"), "{}", e);
    }

    #[test]
    fn test_ascii_simple_solid() {
        let text = r#"solid wedge
facet normal 0 0 1
  outer loop
    vertex 0 0 0
    vertex 1 0 0
    vertex 0 1 0
  endloop
endfacet
endsolid wedge
"#;
        let mesh = TriangleMesh::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0].vertices[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_ascii_name_with_spaces_and_mixed_case() {
        let text = "SOLID my little teapot\nFACET NORMAL 0 0 1\nOUTER LOOP\nVERTEX 0 0 0\nVERTEX 1 0 0\nVERTEX 0 1 0\nENDLOOP\nENDFACET\nENDSOLID\n";
        let mesh = TriangleMesh::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn test_ascii_empty_solid() {
        let mesh = TriangleMesh::from_bytes(b"solid empty\nendsolid empty\n").unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_ascii_scientific_notation() {
        let text = "solid s\nfacet normal 0 0 1\nouter loop\nvertex 1.5e1 0 0\nvertex 0 2.5E-1 0\nvertex 0 0 0\nendloop\nendfacet\nendsolid\n";
        let mesh = TriangleMesh::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(mesh.triangles[0].vertices[0][0], 15.0);
        assert_eq!(mesh.triangles[0].vertices[1][1], 0.25);
    }

    #[test]
    fn test_ascii_missing_vertex_is_err() {
        let text = "solid s\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\nendsolid\n";
        let e = TriangleMesh::from_bytes(text.as_bytes()).unwrap_err().to_string();
        assert!(e.contains("Expected 'vertex'"), "{}", e);
    }

    #[test]
    fn test_ascii_bad_coordinate_is_err() {
        let text = "solid s\nfacet normal 0 0 1\nouter loop\nvertex zero 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid\n";
        TriangleMesh::from_bytes(text.as_bytes()).unwrap_err();
    }

    #[test]
    fn test_garbage_is_err() {
        TriangleMesh::from_bytes(b"not a mesh at all").unwrap_err();
    }

    #[test]
    fn test_missing_file_is_err() {
        TriangleMesh::from_file("fixtures/i-do-not-exist.stl").unwrap_err();
    }
}
