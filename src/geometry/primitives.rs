// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator
//!
//! Every primitive is emitted as an indexed mesh with shared vertices, so
//! adjacency sees one connected surface and a vertex drag pulls its
//! neighbors along instead of tearing faces apart.

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Geometric primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    Sphere { r: f64, segments: u32 },
    Cylinder { h: f64, r: f64, segments: u32 },
    Cone { h: f64, r1: f64, r2: f64, segments: u32 },
    Tetrahedron { r: f64 },
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn sphere(r: f64, segments: u32) -> Self {
        Self::Sphere {
            r,
            segments: segment_count(segments),
        }
    }

    pub fn cylinder(h: f64, r: f64, segments: u32) -> Self {
        Self::Cylinder {
            h,
            r,
            segments: segment_count(segments),
        }
    }

    pub fn cone(h: f64, r1: f64, r2: f64, segments: u32) -> Self {
        Self::Cone {
            h,
            r1,
            r2,
            segments: segment_count(segments),
        }
    }

    pub fn tetrahedron(r: f64) -> Self {
        Self::Tetrahedron { r }
    }

    /// Short lowercase name, used for default object labels and logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cube { .. } => "cube",
            Self::Sphere { .. } => "sphere",
            Self::Cylinder { .. } => "cylinder",
            Self::Cone { .. } => "cone",
            Self::Tetrahedron { .. } => "tetrahedron",
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::Cube { size, center } => generate_cube_mesh(*size, *center),
            Self::Sphere { r, segments } => generate_sphere_mesh(*r, *segments),
            Self::Cylinder { h, r, segments } => generate_cone_mesh(*h, *r, *r, *segments),
            Self::Cone { h, r1, r2, segments } => generate_cone_mesh(*h, *r1, *r2, *segments),
            Self::Tetrahedron { r } => generate_tetrahedron_mesh(*r),
        }
    }
}

fn segment_count(segments: u32) -> u32 {
    if segments >= 3 {
        segments
    } else {
        32
    }
}

fn build(positions: Vec<Point3<f64>>, triangles: Vec<[usize; 3]>) -> Mesh {
    Mesh::from_parts(
        positions.into_iter().map(Vertex::at).collect(),
        Some(triangles.into_iter().map(Triangle::new).collect()),
    )
}

fn generate_cube_mesh(size: Vector3<f64>, center: bool) -> Mesh {
    let min = if center { -size / 2.0 } else { Vector3::zeros() };
    let max = min + size;

    let positions = vec![
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];

    // Two triangles per face, wound counter-clockwise seen from outside
    let triangles = vec![
        // Front (z+)
        [4, 5, 6],
        [4, 6, 7],
        // Back (z-)
        [1, 0, 3],
        [1, 3, 2],
        // Right (x+)
        [5, 1, 2],
        [5, 2, 6],
        // Left (x-)
        [0, 4, 7],
        [0, 7, 3],
        // Top (y+)
        [7, 6, 2],
        [7, 2, 3],
        // Bottom (y-)
        [0, 1, 5],
        [0, 5, 4],
    ];

    build(positions, triangles)
}

/// UV sphere with single pole vertices and a shared seam
fn generate_sphere_mesh(radius: f64, segments: u32) -> Mesh {
    let stacks = segments as usize;
    let slices = segments as usize;

    let mut positions = Vec::with_capacity(2 + (stacks - 1) * slices);
    positions.push(Point3::new(0.0, radius, 0.0));

    for i in 1..stacks {
        let phi = PI * i as f64 / stacks as f64;
        let y = radius * phi.cos();
        let r = radius * phi.sin();

        for j in 0..slices {
            let theta = 2.0 * PI * j as f64 / slices as f64;
            positions.push(Point3::new(r * theta.cos(), y, r * theta.sin()));
        }
    }

    let south = positions.len();
    positions.push(Point3::new(0.0, -radius, 0.0));

    let ring = |i: usize, j: usize| 1 + (i - 1) * slices + j % slices;
    let mut triangles = Vec::with_capacity(2 * stacks * slices);

    for j in 0..slices {
        triangles.push([0, ring(1, j + 1), ring(1, j)]);
    }

    for i in 1..stacks - 1 {
        for j in 0..slices {
            let first = ring(i, j);
            let second = ring(i + 1, j);
            triangles.push([first, ring(i, j + 1), second]);
            triangles.push([second, ring(i, j + 1), ring(i + 1, j + 1)]);
        }
    }

    for j in 0..slices {
        triangles.push([south, ring(stacks - 1, j), ring(stacks - 1, j + 1)]);
    }

    build(positions, triangles)
}

fn generate_cone_mesh(height: f64, r1: f64, r2: f64, segments: u32) -> Mesh {
    let segments = segments as usize;

    // Bottom center at z=0, top center at z=height
    let mut positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, height)];
    let bottom_center = 0;
    let top_center = 1;

    let mut bottom = Vec::with_capacity(segments);
    let mut top = Vec::with_capacity(segments);

    for i in 0..segments {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        let (sin, cos) = angle.sin_cos();

        bottom.push(positions.len());
        positions.push(Point3::new(r1 * cos, r1 * sin, 0.0));
        top.push(positions.len());
        positions.push(Point3::new(r2 * cos, r2 * sin, height));
    }

    let mut triangles = Vec::with_capacity(segments * 4);
    for i in 0..segments {
        let next = (i + 1) % segments;
        triangles.push([bottom_center, bottom[next], bottom[i]]);
        triangles.push([top_center, top[i], top[next]]);
        triangles.push([bottom[i], top[next], top[i]]);
        triangles.push([bottom[i], bottom[next], top[next]]);
    }

    build(positions, triangles)
}

fn generate_tetrahedron_mesh(radius: f64) -> Mesh {
    // Alternate corners of a cube, scaled onto the circumscribed sphere
    let s = radius / 3f64.sqrt();
    let positions = vec![
        Point3::new(s, s, s),
        Point3::new(-s, -s, s),
        Point3::new(-s, s, -s),
        Point3::new(s, -s, -s),
    ];
    let triangles = vec![[0, 1, 3], [0, 2, 1], [0, 3, 2], [1, 2, 3]];

    build(positions, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::mesh_utils::{
        has_no_degenerate_triangles, is_closed, is_manifold, validate_winding_order,
    };
    use nalgebra::Vector3;

    #[test]
    fn test_cube_generation() {
        let mesh = generate_cube_mesh(Vector3::new(10.0, 10.0, 10.0), false);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(is_manifold(&mesh));
        assert!(is_closed(&mesh), "Cube shares its corners and must be closed");
    }

    #[test]
    fn test_centered_cube_bounds() {
        let mesh = Primitive::cube(Vector3::new(2.0, 4.0, 6.0), true).to_mesh();
        assert_eq!(mesh.bounds().min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.bounds().max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let mesh = Primitive::cube(Vector3::new(2.0, 2.0, 2.0), true).to_mesh();
        for vertex in mesh.vertices() {
            assert!(vertex.normal.dot(&vertex.position.coords) > 0.0);
        }
    }

    #[test]
    fn test_sphere_is_closed() {
        let mesh = generate_sphere_mesh(1.0, 16);
        assert_eq!(mesh.vertex_count(), 2 + 15 * 16);
        assert!(is_manifold(&mesh), "Sphere mesh should be manifold");
        assert!(is_closed(&mesh), "Sphere mesh should be closed");
        assert!(validate_winding_order(&mesh));
        assert!(has_no_degenerate_triangles(&mesh));
    }

    #[test]
    fn test_sphere_normals_point_outward() {
        let mesh = generate_sphere_mesh(3.0, 12);
        for vertex in mesh.vertices() {
            assert!(vertex.normal.dot(&vertex.position.coords) > 0.0);
        }
    }

    #[test]
    fn test_cylinder_is_manifold() {
        let mesh = generate_cone_mesh(10.0, 5.0, 5.0, 32);
        assert!(is_manifold(&mesh), "Cylinder mesh should be manifold");
        assert!(is_closed(&mesh), "Cylinder mesh should be closed");
    }

    #[test]
    fn test_cone_is_manifold() {
        let mesh = generate_cone_mesh(10.0, 5.0, 3.0, 32);
        assert!(is_manifold(&mesh), "Cone mesh should be manifold");
        assert!(is_closed(&mesh), "Cone mesh should be closed");
    }

    #[test]
    fn test_cylinder_vertex_reuse() {
        // 2 cap centers + two rims of 16
        let mesh = Primitive::cylinder(10.0, 5.0, 16).to_mesh();
        assert_eq!(mesh.vertex_count(), 2 + 16 * 2);
    }

    #[test]
    fn test_tetrahedron() {
        let mesh = Primitive::tetrahedron(1.0).to_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 4);
        assert!(is_closed(&mesh));
        for vertex in mesh.vertices() {
            assert!((vertex.position.coords.norm() - 1.0).abs() < 1e-12);
            assert!(vertex.normal.dot(&vertex.position.coords) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_segment_count_falls_back() {
        assert_eq!(Primitive::sphere(1.0, 0), Primitive::sphere(1.0, 32));
    }
}
