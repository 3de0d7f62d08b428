// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Subdivision of triangle meshes.
//!
//! Each level splits every triangle into four through its edge points.
//! Midpoint subdivision keeps the original surface; Loop subdivision also
//! repositions vertices with Loop's masks and converges to a smooth limit
//! surface.

use super::mesh_utils::Edge;
use super::Mesh;
use crate::error::{EditError, EditResult};
use ahash::AHashMap;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Grid used to weld a triangle soup before subdividing it
const WELD_EPSILON: f64 = 1e-9;

/// Subdivision scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubdivisionMethod {
    /// Loop smoothing subdivision
    #[default]
    Loop,
    /// Split at edge midpoints, shape unchanged
    Midpoint,
}

impl fmt::Display for SubdivisionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loop => write!(f, "loop"),
            Self::Midpoint => write!(f, "midpoint"),
        }
    }
}

impl FromStr for SubdivisionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "loop" => Ok(Self::Loop),
            "midpoint" | "flat" => Ok(Self::Midpoint),
            other => Err(format!("unknown subdivision method '{other}'")),
        }
    }
}

/// Face count after `levels` rounds of 1-to-4 splitting
pub fn expected_faces(faces: usize, levels: u32) -> usize {
    4usize
        .checked_pow(levels)
        .and_then(|factor| faces.checked_mul(factor))
        .unwrap_or(usize::MAX)
}

/// Subdivided position and index buffers for `mesh`.
///
/// An unindexed mesh is welded first so shared corners subdivide as one
/// vertex.
///
/// # Errors
///
/// - `InvalidSubdivisionLevel` when `levels` is 0
/// - `MeshTooLarge` when the result would exceed `max_faces`
pub fn subdivided_buffers(
    mesh: &Mesh,
    method: SubdivisionMethod,
    levels: u32,
    max_faces: usize,
) -> EditResult<(Vec<Point3<f64>>, Vec<[usize; 3]>)> {
    if levels == 0 {
        return Err(EditError::InvalidSubdivisionLevel(0));
    }

    let current = mesh.triangle_count();
    let projected = expected_faces(current, levels);
    if projected > max_faces {
        return Err(EditError::MeshTooLarge {
            current,
            projected,
            max: max_faces,
        });
    }

    let welded;
    let source = if mesh.is_indexed() {
        mesh
    } else {
        welded = mesh.welded(WELD_EPSILON);
        debug!(
            "Welded triangle soup: {} -> {} vertices",
            mesh.vertex_count(),
            welded.vertex_count()
        );
        &welded
    };

    debug!(
        "Subdividing mesh: {} faces, {} vertices, {} levels using {}",
        current,
        source.vertex_count(),
        levels,
        method
    );

    let mut positions: Vec<Point3<f64>> = source.positions().collect();
    let mut faces: Vec<[usize; 3]> = source.triangle_indices().collect();

    for level in 0..levels {
        (positions, faces) = match method {
            SubdivisionMethod::Midpoint => subdivide_midpoint(&positions, &faces),
            SubdivisionMethod::Loop => subdivide_loop(&positions, &faces),
        };
        debug!(
            "Level {}: {} faces, {} vertices",
            level + 1,
            faces.len(),
            positions.len()
        );
    }

    Ok((positions, faces))
}

/// Subdivided copy of `mesh`; see [`subdivided_buffers`]
pub fn subdivide_mesh(
    mesh: &Mesh,
    method: SubdivisionMethod,
    levels: u32,
    max_faces: usize,
) -> EditResult<Mesh> {
    let (positions, faces) = subdivided_buffers(mesh, method, levels, max_faces)?;
    Mesh::from_buffers(positions, faces)
}

/// Shared edge-point bookkeeping: one new vertex per undirected edge, created
/// the first time a face walks over it.
struct EdgePoints<'a> {
    positions: &'a mut Vec<Point3<f64>>,
    indices: AHashMap<Edge, usize>,
}

impl<'a> EdgePoints<'a> {
    fn new(positions: &'a mut Vec<Point3<f64>>, capacity: usize) -> Self {
        Self {
            positions,
            indices: AHashMap::with_capacity(capacity),
        }
    }

    fn get_or_insert(&mut self, a: usize, b: usize, position: impl FnOnce() -> Point3<f64>) -> usize {
        let positions = &mut *self.positions;
        *self.indices.entry(Edge::new(a, b)).or_insert_with(|| {
            positions.push(position());
            positions.len() - 1
        })
    }
}

/// Corner triangles keep the parent's winding, plus the center triangle
fn split_face(faces: &mut Vec<[usize; 3]>, [v0, v1, v2]: [usize; 3], [m01, m12, m20]: [usize; 3]) {
    faces.push([v0, m01, m20]);
    faces.push([v1, m12, m01]);
    faces.push([v2, m20, m12]);
    faces.push([m01, m12, m20]);
}

fn subdivide_midpoint(
    positions: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut new_positions = positions.to_vec();
    let mut new_faces = Vec::with_capacity(faces.len() * 4);
    let mut edge_points = EdgePoints::new(&mut new_positions, faces.len() * 3 / 2);

    for &[v0, v1, v2] in faces {
        let mid = |a: usize, b: usize| move || nalgebra::center(&positions[a], &positions[b]);
        let m01 = edge_points.get_or_insert(v0, v1, mid(v0, v1));
        let m12 = edge_points.get_or_insert(v1, v2, mid(v1, v2));
        let m20 = edge_points.get_or_insert(v2, v0, mid(v2, v0));
        split_face(&mut new_faces, [v0, v1, v2], [m01, m12, m20]);
    }

    (new_positions, new_faces)
}

/// Opposite vertices of every edge, one per incident face
fn build_edge_opposites(faces: &[[usize; 3]]) -> AHashMap<Edge, Vec<usize>> {
    let mut opposites: AHashMap<Edge, Vec<usize>> = AHashMap::with_capacity(faces.len() * 3 / 2);
    for &[a, b, c] in faces {
        opposites.entry(Edge::new(a, b)).or_default().push(c);
        opposites.entry(Edge::new(b, c)).or_default().push(a);
        opposites.entry(Edge::new(c, a)).or_default().push(b);
    }
    opposites
}

fn subdivide_loop(
    positions: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let opposites = build_edge_opposites(faces);

    // Neighbors along any edge, and along boundary edges only
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); positions.len()];
    let mut boundary_neighbors: Vec<Vec<usize>> = vec![Vec::new(); positions.len()];
    for (edge, faces_on_edge) in &opposites {
        if edge.v0 == edge.v1 {
            continue;
        }
        neighbors[edge.v0].push(edge.v1);
        neighbors[edge.v1].push(edge.v0);
        if faces_on_edge.len() == 1 {
            boundary_neighbors[edge.v0].push(edge.v1);
            boundary_neighbors[edge.v1].push(edge.v0);
        }
    }

    for list in neighbors.iter_mut().chain(boundary_neighbors.iter_mut()) {
        list.sort_unstable();
    }

    let mut new_positions: Vec<Point3<f64>> = positions
        .iter()
        .enumerate()
        .map(|(v, p)| {
            if !boundary_neighbors[v].is_empty() {
                boundary_vertex_position(p, &boundary_neighbors[v], positions)
            } else {
                interior_vertex_position(p, &neighbors[v], positions)
            }
        })
        .collect();

    let mut new_faces = Vec::with_capacity(faces.len() * 4);
    let mut edge_points = EdgePoints::new(&mut new_positions, opposites.len());

    for &[v0, v1, v2] in faces {
        let rule = |a: usize, b: usize| {
            let opposite = opposites.get(&Edge::new(a, b));
            move || loop_edge_point(a, b, opposite.map_or(&[][..], Vec::as_slice), positions)
        };
        let m01 = edge_points.get_or_insert(v0, v1, rule(v0, v1));
        let m12 = edge_points.get_or_insert(v1, v2, rule(v1, v2));
        let m20 = edge_points.get_or_insert(v2, v0, rule(v2, v0));
        split_face(&mut new_faces, [v0, v1, v2], [m01, m12, m20]);
    }

    (new_positions, new_faces)
}

/// 3/8 of each endpoint plus 1/8 of each opposite vertex on an interior edge;
/// plain midpoint on boundary or non-manifold edges
fn loop_edge_point(a: usize, b: usize, opposite: &[usize], positions: &[Point3<f64>]) -> Point3<f64> {
    match opposite {
        [c, d] => Point3::from(
            (positions[a].coords + positions[b].coords) * 0.375
                + (positions[*c].coords + positions[*d].coords) * 0.125,
        ),
        _ => nalgebra::center(&positions[a], &positions[b]),
    }
}

/// Boundary mask: 3/4 of the vertex plus 1/8 of each boundary neighbor.
/// Corners and non-manifold boundary vertices stay put.
fn boundary_vertex_position(p: &Point3<f64>, boundary: &[usize], positions: &[Point3<f64>]) -> Point3<f64> {
    match boundary {
        [n1, n2] => Point3::from(
            p.coords * 0.75 + (positions[*n1].coords + positions[*n2].coords) * 0.125,
        ),
        _ => *p,
    }
}

/// Interior mask with Warren's beta
fn interior_vertex_position(p: &Point3<f64>, neighbors: &[usize], positions: &[Point3<f64>]) -> Point3<f64> {
    let n = neighbors.len();
    if n == 0 {
        return *p;
    }

    let beta = if n == 3 {
        3.0 / 16.0
    } else {
        3.0 / (8.0 * n as f64)
    };
    let alpha = 1.0 - n as f64 * beta;

    let sum = neighbors
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, &i| acc + positions[i].coords);

    Point3::from(p.coords * alpha + sum * beta)
}
