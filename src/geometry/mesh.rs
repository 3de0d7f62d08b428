// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh buffer: vertex positions, triangle index buffer and derived attributes

use super::BoundingBox;
use crate::error::{EditError, EditResult};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};
use serde::Serialize;

/// Normal assigned to vertices that no triangle with area references
const FALLBACK_NORMAL: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    pub fn at(position: Point3<f64>) -> Self {
        Self::new(position, FALLBACK_NORMAL)
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Triangular mesh buffer.
///
/// Positions are dense and 0-based. The index buffer is optional: a mesh
/// without one is a triangle soup whose triangles are consecutive vertex
/// triples. Every index in the index buffer addresses an existing vertex;
/// constructors and [`Mesh::replace_buffers`] reject anything else.
///
/// Normals and bounds are derived data. Position edits mark them stale until
/// [`Mesh::recompute_normals`] and [`Mesh::recompute_bounds`] run again.
#[derive(Debug, Clone, Serialize)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    triangles: Option<Vec<Triangle>>,
    bounds: BoundingBox,
    #[serde(skip)]
    normals_dirty: bool,
    #[serde(skip)]
    bounds_dirty: bool,
    #[serde(skip)]
    topology_revision: u64,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Some(Vec::new()),
            bounds: BoundingBox::empty(),
            normals_dirty: false,
            bounds_dirty: false,
            topology_revision: 0,
        }
    }

    pub fn empty() -> Self {
        Self::new()
    }

    /// Build an indexed mesh, validating every index against the position count
    pub fn from_buffers(positions: Vec<Point3<f64>>, indices: Vec<[usize; 3]>) -> EditResult<Self> {
        validate_indices(&indices, positions.len())?;
        Ok(Self::from_parts(
            positions.into_iter().map(Vertex::at).collect(),
            Some(indices.into_iter().map(Triangle::new).collect()),
        ))
    }

    /// Build an unindexed triangle soup. Trailing positions that do not form a
    /// full triangle are kept as vertices but belong to no triangle.
    pub fn from_soup(positions: Vec<Point3<f64>>) -> Self {
        Self::from_parts(positions.into_iter().map(Vertex::at).collect(), None)
    }

    /// Assemble a mesh from generator output that is valid by construction.
    pub(crate) fn from_parts(vertices: Vec<Vertex>, triangles: Option<Vec<Triangle>>) -> Self {
        debug_assert!(triangles.as_ref().map_or(true, |tris| tris
            .iter()
            .all(|t| t.indices.iter().all(|&i| i < vertices.len()))));

        let mut mesh = Self {
            vertices,
            triangles,
            bounds: BoundingBox::empty(),
            normals_dirty: true,
            bounds_dirty: true,
            topology_revision: 0,
        };
        mesh.recompute_normals();
        mesh.recompute_bounds();
        mesh
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count (consecutive triples for an unindexed mesh)
    pub fn triangle_count(&self) -> usize {
        match &self.triangles {
            Some(triangles) => triangles.len(),
            None => self.vertices.len() / 3,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.triangles.is_some()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The explicit index buffer, `None` for a triangle soup
    pub fn triangles(&self) -> Option<&[Triangle]> {
        self.triangles.as_deref()
    }

    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        self.vertices.get(index).map(|v| v.position)
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    pub fn normals(&self) -> impl Iterator<Item = Vector3<f64>> + '_ {
        self.vertices.iter().map(|v| v.normal)
    }

    /// Vertex triples of every triangle, implicit ones included
    pub fn triangle_indices(&self) -> Box<dyn Iterator<Item = [usize; 3]> + '_> {
        match &self.triangles {
            Some(triangles) => Box::new(triangles.iter().map(|t| t.indices)),
            None => Box::new((0..self.vertices.len() / 3).map(|t| [3 * t, 3 * t + 1, 3 * t + 2])),
        }
    }

    /// Flat `[x, y, z, ...]` position buffer for upload
    pub fn position_buffer(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.position.x as f32, v.position.y as f32, v.position.z as f32])
            .collect()
    }

    /// Flat `[x, y, z, ...]` normal buffer for upload
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.normal.x as f32, v.normal.y as f32, v.normal.z as f32])
            .collect()
    }

    /// Bounding box as of the last [`Mesh::recompute_bounds`]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Identifies the current index-buffer shape. Changes on every structural
    /// replacement, never on position edits.
    pub fn topology_revision(&self) -> u64 {
        self.topology_revision
    }

    /// False while normals or bounds lag behind position edits
    pub fn is_consistent(&self) -> bool {
        !self.normals_dirty && !self.bounds_dirty
    }

    /// Overwrite a single vertex position
    pub fn set_vertex_position(&mut self, index: usize, position: Point3<f64>) -> EditResult<()> {
        let len = self.vertices.len();
        let vertex = self
            .vertices
            .get_mut(index)
            .ok_or(EditError::IndexOutOfRange { index, len })?;
        vertex.position = position;
        self.mark_positions_dirty();
        Ok(())
    }

    /// Overwrite several positions. Every index is checked before any write,
    /// so a failure leaves the buffer untouched.
    pub fn set_vertex_positions(&mut self, updates: &[(usize, Point3<f64>)]) -> EditResult<()> {
        let len = self.vertices.len();
        if let Some(&(index, _)) = updates.iter().find(|(index, _)| *index >= len) {
            return Err(EditError::IndexOutOfRange { index, len });
        }

        for &(index, position) in updates {
            self.vertices[index].position = position;
        }
        if !updates.is_empty() {
            self.mark_positions_dirty();
        }
        Ok(())
    }

    /// Replace the whole buffer. Bumps the topology revision, so adjacency
    /// built against the old buffer is stale from here on.
    pub fn replace_buffers(
        &mut self,
        positions: Vec<Point3<f64>>,
        indices: Vec<[usize; 3]>,
    ) -> EditResult<()> {
        validate_indices(&indices, positions.len())?;
        self.replace_parts(
            positions.into_iter().map(Vertex::at).collect(),
            indices.into_iter().map(Triangle::new).collect(),
        );
        Ok(())
    }

    pub(crate) fn replace_parts(&mut self, vertices: Vec<Vertex>, triangles: Vec<Triangle>) {
        self.vertices = vertices;
        self.triangles = Some(triangles);
        self.topology_revision += 1;
        self.recompute_normals();
        self.recompute_bounds();
    }

    /// Recompute vertex normals from triangle geometry.
    ///
    /// Face normals are accumulated unnormalized, so each face contributes in
    /// proportion to its area, then every vertex sum is normalized.
    pub fn recompute_normals(&mut self) {
        let mut normal_sums: Vec<Vector3<f64>> = vec![Vector3::zeros(); self.vertices.len()];

        for [i0, i1, i2] in self.triangle_indices() {
            let p0 = self.vertices[i0].position;
            let edge1 = self.vertices[i1].position - p0;
            let edge2 = self.vertices[i2].position - p0;
            let face_normal = edge1.cross(&edge2);

            // Skip degenerate triangles
            if face_normal.norm_squared() > 1e-20 {
                normal_sums[i0] += face_normal;
                normal_sums[i1] += face_normal;
                normal_sums[i2] += face_normal;
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(normal_sums) {
            vertex.normal = sum.try_normalize(1e-12).unwrap_or(FALLBACK_NORMAL);
        }
        self.normals_dirty = false;
    }

    /// Recompute the axis-aligned bounding box from current positions
    pub fn recompute_bounds(&mut self) {
        self.bounds = BoundingBox::from_points(self.vertices.iter().map(|v| &v.position));
        self.bounds_dirty = false;
    }

    /// Indexed copy with coincident vertices merged.
    ///
    /// Positions are bucketed on an `epsilon` grid; vertices falling in the
    /// same cell share one index. Triangles that collapse to fewer than three
    /// distinct vertices are dropped.
    pub fn welded(&self, epsilon: f64) -> Mesh {
        let mut cells: AHashMap<(i64, i64, i64), usize> = AHashMap::new();
        let mut remap = Vec::with_capacity(self.vertices.len());
        let mut vertices = Vec::new();

        for vertex in &self.vertices {
            let key = (
                (vertex.position.x / epsilon).round() as i64,
                (vertex.position.y / epsilon).round() as i64,
                (vertex.position.z / epsilon).round() as i64,
            );
            let index = *cells.entry(key).or_insert_with(|| {
                vertices.push(Vertex::at(vertex.position));
                vertices.len() - 1
            });
            remap.push(index);
        }

        let triangles = self
            .triangle_indices()
            .map(|[a, b, c]| [remap[a], remap[b], remap[c]])
            .filter(|[a, b, c]| a != b && b != c && a != c)
            .map(Triangle::new)
            .collect();

        Mesh::from_parts(vertices, Some(triangles))
    }

    fn mark_positions_dirty(&mut self) {
        self.normals_dirty = true;
        self.bounds_dirty = true;
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_indices(indices: &[[usize; 3]], len: usize) -> EditResult<()> {
    match indices.iter().flatten().find(|&&index| index >= len) {
        Some(&index) => Err(EditError::IndexOutOfRange { index, len }),
        None => Ok(()),
    }
}
