// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex adjacency derived from the triangle index buffer

use super::mesh_utils::Edge;
use super::Mesh;
use ahash::AHashMap;
use std::collections::BTreeSet;
use std::hash::Hash;
use std::rc::Rc;
use tracing::debug;

/// Read-only adjacency for one mesh snapshot.
///
/// Maps each vertex to the triangles that reference it and to the vertices
/// it shares a triangle with. Sets are ordered, so two builds over the same
/// index buffer compare equal and iterate identically.
///
/// An unindexed mesh has no adjacency: every set is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyIndex {
    vertex_triangles: Vec<BTreeSet<usize>>,
    vertex_neighbors: Vec<BTreeSet<usize>>,
    edges: Vec<Edge>,
    topology_revision: u64,
}

impl AdjacencyIndex {
    /// Scan the index buffer once
    pub fn build(mesh: &Mesh) -> Self {
        let vertex_count = mesh.vertex_count();
        let mut vertex_triangles = vec![BTreeSet::new(); vertex_count];
        let mut vertex_neighbors = vec![BTreeSet::new(); vertex_count];
        let mut edges = BTreeSet::new();

        for (triangle_idx, triangle) in mesh.triangles().unwrap_or_default().iter().enumerate() {
            let [a, b, c] = triangle.indices;
            for (v, others) in [(a, [b, c]), (b, [c, a]), (c, [a, b])] {
                vertex_triangles[v].insert(triangle_idx);
                // A repeated index must not make a vertex its own neighbor
                vertex_neighbors[v].extend(others.into_iter().filter(|&o| o != v));
            }
            edges.extend(
                Edge::of_triangle(triangle.indices)
                    .into_iter()
                    .filter(|e| e.v0 != e.v1),
            );
        }

        Self {
            vertex_triangles,
            vertex_neighbors,
            edges: edges.into_iter().collect(),
            topology_revision: mesh.topology_revision(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_neighbors.len()
    }

    /// Triangles referencing `vertex`; empty for unknown or isolated vertices
    pub fn triangles_of(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.vertex_triangles.get(vertex).into_iter().flatten().copied()
    }

    /// 1-ring neighbors of `vertex`; empty for unknown or isolated vertices
    pub fn neighbors_of(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.vertex_neighbors.get(vertex).into_iter().flatten().copied()
    }

    pub fn neighbor_set(&self, vertex: usize) -> Option<&BTreeSet<usize>> {
        self.vertex_neighbors.get(vertex)
    }

    /// Unique undirected edges in sorted order. An edge's position in this
    /// list is its edge index for selection purposes.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<Edge> {
        self.edges.get(index).copied()
    }

    /// Whether this index still describes the mesh's current index buffer
    pub fn is_current_for(&self, mesh: &Mesh) -> bool {
        self.topology_revision == mesh.topology_revision()
            && self.vertex_count() == mesh.vertex_count()
    }
}

/// One adjacency index per object, rebuilt when the object's index buffer
/// changes shape and reused otherwise.
#[derive(Debug)]
pub struct AdjacencyCache<K> {
    entries: AHashMap<K, Rc<AdjacencyIndex>>,
}

impl<K: Copy + Eq + Hash + std::fmt::Debug> AdjacencyCache<K> {
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }

    /// Cached index for `key`, rebuilt first if `mesh` has moved on
    pub fn get_or_build(&mut self, key: K, mesh: &Mesh) -> Rc<AdjacencyIndex> {
        if let Some(index) = self.entries.get(&key) {
            if index.is_current_for(mesh) {
                return Rc::clone(index);
            }
        }

        debug!(
            "Building adjacency for {:?}: {} vertices, {} triangles",
            key,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        let index = Rc::new(AdjacencyIndex::build(mesh));
        self.entries.insert(key, Rc::clone(&index));
        index
    }

    pub fn invalidate(&mut self, key: &K) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy + Eq + Hash + std::fmt::Debug> Default for AdjacencyCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::{Point3, Vector3};

    fn quad() -> Mesh {
        Mesh::from_buffers(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(5.0, 5.0, 5.0),
            ],
            vec![[0, 1, 2], [1, 3, 2]],
        )
        .unwrap()
    }

    #[test]
    fn test_neighbors_and_triangles() {
        let adjacency = AdjacencyIndex::build(&quad());

        assert_eq!(adjacency.neighbors_of(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(adjacency.neighbors_of(1).collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(adjacency.triangles_of(2).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(adjacency.triangles_of(3).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_isolated_and_unknown_vertices() {
        let adjacency = AdjacencyIndex::build(&quad());
        assert_eq!(adjacency.neighbors_of(4).count(), 0);
        assert_eq!(adjacency.neighbors_of(99).count(), 0);
        assert!(adjacency.neighbor_set(99).is_none());
    }

    #[test]
    fn test_edges_are_unique_and_sorted() {
        let adjacency = AdjacencyIndex::build(&quad());
        let edges = adjacency.edges();
        assert_eq!(edges.len(), 5);
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(adjacency.edge(0), Some(Edge::new(0, 1)));
    }

    #[test]
    fn test_unindexed_mesh_has_no_adjacency() {
        let soup = Mesh::from_soup(quad().positions().take(3).collect());
        let adjacency = AdjacencyIndex::build(&soup);
        assert_eq!(adjacency.vertex_count(), 3);
        assert!((0..3).all(|v| adjacency.neighbors_of(v).count() == 0));
        assert!(adjacency.edges().is_empty());
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mesh = Primitive::sphere(1.0, 10).to_mesh();
        assert_eq!(AdjacencyIndex::build(&mesh), AdjacencyIndex::build(&mesh));
    }

    #[test]
    fn test_scan_order_does_not_matter() {
        let forward = quad();
        let reversed = Mesh::from_buffers(forward.positions().collect(), vec![[3, 2, 1], [2, 0, 1]])
            .unwrap();
        let a = AdjacencyIndex::build(&forward);
        let b = AdjacencyIndex::build(&reversed);
        for v in 0..forward.vertex_count() {
            assert_eq!(a.neighbor_set(v), b.neighbor_set(v));
        }
    }

    #[test]
    fn test_cache_reuses_until_topology_changes() {
        let mut mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_mesh();
        let mut cache = AdjacencyCache::new();

        let first = cache.get_or_build(7u32, &mesh);
        mesh.set_vertex_position(0, Point3::new(-1.0, -1.0, -1.0)).unwrap();
        let second = cache.get_or_build(7u32, &mesh);
        assert!(Rc::ptr_eq(&first, &second));

        mesh.replace_buffers(vec![Point3::origin(); 3], vec![[0, 1, 2]]).unwrap();
        let third = cache.get_or_build(7u32, &mesh);
        assert!(!Rc::ptr_eq(&first, &third));
        assert_eq!(third.vertex_count(), 3);

        cache.invalidate(&7);
        assert!(cache.is_empty());
    }
}
