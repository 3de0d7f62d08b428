// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh validation utilities

use super::Mesh;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;

/// Undirected edge, smaller vertex index first so both directions hash alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge {
    pub v0: usize,
    pub v1: usize,
}

impl Edge {
    pub fn new(v0: usize, v1: usize) -> Self {
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }

    /// The three edges of a triangle, in winding order
    pub fn of_triangle([a, b, c]: [usize; 3]) -> [Edge; 3] {
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]
    }
}

/// Count how many triangles use each edge
pub fn build_edge_counts(mesh: &Mesh) -> AHashMap<Edge, u32> {
    let mut edge_counts: AHashMap<Edge, u32> = AHashMap::new();

    for triangle in mesh.triangle_indices() {
        for edge in Edge::of_triangle(triangle) {
            *edge_counts.entry(edge).or_insert(0) += 1;
        }
    }

    edge_counts
}

/// Check if mesh is manifold (each edge shared by at most 2 triangles)
pub fn is_manifold(mesh: &Mesh) -> bool {
    build_edge_counts(mesh).values().all(|&count| count <= 2)
}

/// Check if mesh is closed (each edge shared by exactly 2 triangles)
pub fn is_closed(mesh: &Mesh) -> bool {
    build_edge_counts(mesh).values().all(|&count| count == 2)
}

/// Check that neighboring triangles agree on orientation.
///
/// Consistently wound triangles traverse a shared edge in opposite
/// directions, so no directed edge may appear twice.
pub fn validate_winding_order(mesh: &Mesh) -> bool {
    let mut directed = AHashSet::new();
    mesh.triangle_indices()
        .all(|[a, b, c]| [(a, b), (b, c), (c, a)].into_iter().all(|edge| directed.insert(edge)))
}

/// Check that no triangle is degenerate (zero area)
pub fn has_no_degenerate_triangles(mesh: &Mesh) -> bool {
    let vertices = mesh.vertices();
    mesh.triangle_indices().all(|[i0, i1, i2]| {
        let p0 = vertices[i0].position;
        let area = (vertices[i1].position - p0)
            .cross(&(vertices[i2].position - p0))
            .norm();
        area >= 1e-10
    })
}

/// Mesh validation report
#[derive(Debug, Clone, Serialize)]
pub struct MeshValidation {
    pub is_manifold: bool,
    pub is_closed: bool,
    pub has_valid_winding: bool,
    pub has_no_degenerate_triangles: bool,
    pub edge_count: usize,
    pub boundary_edge_count: usize,
}

pub fn validate_mesh(mesh: &Mesh) -> MeshValidation {
    let edge_counts = build_edge_counts(mesh);

    MeshValidation {
        is_manifold: edge_counts.values().all(|&count| count <= 2),
        is_closed: edge_counts.values().all(|&count| count == 2),
        has_valid_winding: validate_winding_order(mesh),
        has_no_degenerate_triangles: has_no_degenerate_triangles(mesh),
        edge_count: edge_counts.len(),
        boundary_edge_count: edge_counts.values().filter(|&&count| count == 1).count(),
    }
}
