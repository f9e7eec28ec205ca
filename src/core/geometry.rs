// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

//! Mesh measurement: enclosed volume, surface area, and summary statistics.
//!
//! Volume uses the signed-tetrahedra method: each facet spans a tetrahedron
//! with the origin, and the signed volumes cancel outside the solid. The
//! result is only meaningful for watertight meshes; that requirement is on
//! the user (as the viewer documents), not validated here.

use serde::Serialize;

use super::mesh::TriangleMesh;

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

fn to_f64(v: [f32; 3]) -> [f64; 3] {
    [f64::from(v[0]), f64::from(v[1]), f64::from(v[2])]
}

/// Enclosed volume in mm^3.
///
/// `|sum(A . (B x C))| / 6` over all facets, accumulated in f64. Taking the
/// absolute value makes the result independent of facet winding direction.
pub fn volume(mesh: &TriangleMesh) -> f64 {
    let mut signed = 0.0;
    for triangle in &mesh.triangles {
        let a = to_f64(triangle.vertices[0]);
        let b = to_f64(triangle.vertices[1]);
        let c = to_f64(triangle.vertices[2]);
        signed += dot(a, cross(b, c));
    }
    signed.abs() / 6.0
}

/// Total facet area in mm^2.
pub fn surface_area(mesh: &TriangleMesh) -> f64 {
    let mut area = 0.0;
    for triangle in &mesh.triangles {
        let a = to_f64(triangle.vertices[0]);
        let b = to_f64(triangle.vertices[1]);
        let c = to_f64(triangle.vertices[2]);
        area += norm(cross(sub(b, a), sub(c, a))) / 2.0;
    }
    area
}

/// Summary statistics for a mesh, as shown by `analyze`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeshStats {
    /// Number of facets.
    pub triangles: usize,
    /// Enclosed volume in mm^3 (requires a watertight mesh).
    pub volume_mm3: f64,
    /// Total facet area in mm^2.
    pub surface_area_mm2: f64,
    /// Axis-aligned bounding box, minimum corner.
    pub min_mm: [f64; 3],
    /// Axis-aligned bounding box, maximum corner.
    pub max_mm: [f64; 3],
    /// Bounding-box extents (max - min).
    pub dimensions_mm: [f64; 3],
    /// Mean of all facet vertices (not the bounding-box center).
    pub center_mm: [f64; 3],
}

impl MeshStats {
    pub fn measure(mesh: &TriangleMesh) -> MeshStats {
        if mesh.is_empty() {
            return MeshStats {
                triangles: 0,
                volume_mm3: 0.0,
                surface_area_mm2: 0.0,
                min_mm: [0.0; 3],
                max_mm: [0.0; 3],
                dimensions_mm: [0.0; 3],
                center_mm: [0.0; 3],
            };
        }

        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        let mut sum = [0.0f64; 3];
        let mut points = 0usize;
        for triangle in &mesh.triangles {
            for vertex in triangle.vertices.iter() {
                let v = to_f64(*vertex);
                for axis in 0..3 {
                    min[axis] = min[axis].min(v[axis]);
                    max[axis] = max[axis].max(v[axis]);
                    sum[axis] += v[axis];
                }
                points += 1;
            }
        }

        let mut center = [0.0; 3];
        let mut dimensions = [0.0; 3];
        for axis in 0..3 {
            center[axis] = sum[axis] / points as f64;
            dimensions[axis] = max[axis] - min[axis];
        }

        MeshStats {
            triangles: mesh.len(),
            volume_mm3: volume(mesh),
            surface_area_mm2: surface_area(mesh),
            min_mm: min,
            max_mm: max,
            dimensions_mm: dimensions,
            center_mm: center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::mesh::Triangle;
    use super::*;

    fn triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle {
            normal: [0.0; 3],
            vertices: [a, b, c],
        }
    }

    /// Unit tetrahedron: origin plus the three axis unit points.
    fn unit_tetrahedron() -> TriangleMesh {
        let o = [0.0, 0.0, 0.0];
        let x = [1.0, 0.0, 0.0];
        let y = [0.0, 1.0, 0.0];
        let z = [0.0, 0.0, 1.0];
        TriangleMesh {
            triangles: vec![
                triangle(o, y, x),
                triangle(o, x, z),
                triangle(o, z, y),
                triangle(x, y, z),
            ],
        }
    }

    #[test]
    fn test_tetrahedron_volume() {
        // V = 1/6 for the unit tetrahedron.
        let v = volume(&unit_tetrahedron());
        assert!((v - 1.0 / 6.0).abs() < 1e-12, "volume {}", v);
    }

    #[test]
    fn test_volume_is_winding_independent() {
        let mut flipped = unit_tetrahedron();
        for t in flipped.triangles.iter_mut() {
            t.vertices.swap(1, 2);
        }
        let v = volume(&flipped);
        assert!((v - 1.0 / 6.0).abs() < 1e-12, "volume {}", v);
    }

    #[test]
    fn test_volume_is_translation_invariant() {
        let mut shifted = unit_tetrahedron();
        for t in shifted.triangles.iter_mut() {
            for v in t.vertices.iter_mut() {
                v[0] += 100.0;
                v[1] -= 40.0;
                v[2] += 7.0;
            }
        }
        let v = volume(&shifted);
        assert!((v - 1.0 / 6.0).abs() < 1e-6, "volume {}", v);
    }

    #[test]
    fn test_tetrahedron_surface_area() {
        // Three right triangles of area 1/2 plus the oblique face sqrt(3)/2.
        let expected = 1.5 + 3f64.sqrt() / 2.0;
        let a = surface_area(&unit_tetrahedron());
        assert!((a - expected).abs() < 1e-12, "area {}", a);
    }

    #[test]
    fn test_stats_single_triangle() {
        let mesh = TriangleMesh {
            triangles: vec![triangle([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 4.0, 6.0])],
        };
        let stats = MeshStats::measure(&mesh);
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.min_mm, [0.0, 0.0, 0.0]);
        assert_eq!(stats.max_mm, [2.0, 4.0, 6.0]);
        assert_eq!(stats.dimensions_mm, [2.0, 4.0, 6.0]);
        // Mean of the three vertices.
        assert!((stats.center_mm[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats.center_mm[1] - 4.0 / 3.0).abs() < 1e-12);
        assert!((stats.center_mm[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_stats_empty_mesh_is_all_zeros() {
        let stats = MeshStats::measure(&TriangleMesh::default());
        assert_eq!(stats.triangles, 0);
        assert_eq!(stats.volume_mm3, 0.0);
        assert_eq!(stats.surface_area_mm2, 0.0);
        assert_eq!(stats.dimensions_mm, [0.0; 3]);
    }
}
