// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex drag with distance-weighted propagation to the 1-ring.
//!
//! A drag session fixes, at pick time, which neighbors follow the dragged
//! vertex and how strongly. Each update puts the dragged vertex on the new
//! position and moves every neighbor by the pointer displacement from the
//! pick point, scaled by its weight.

use crate::error::{EditError, EditResult};
use crate::geometry::{AdjacencyIndex, Mesh};
use crate::scene::ObjectId;
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Influence of a dragged vertex on a neighbor at `distance` from the pick.
///
/// Equals 1 at the pick point and falls off strictly as distance grows.
pub fn weight(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}

/// A neighbor that follows the drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborInfluence {
    pub index: usize,
    pub initial_position: Point3<f64>,
    pub weight: f64,
}

/// State of one open drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    object: ObjectId,
    vertex: usize,
    initial_position: Point3<f64>,
    pick_point: Point3<f64>,
    current_position: Point3<f64>,
    neighbors: Vec<NeighborInfluence>,
}

impl DragSession {
    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn vertex(&self) -> usize {
        self.vertex
    }

    /// Dragged vertex position when the session opened
    pub fn initial_position(&self) -> Point3<f64> {
        self.initial_position
    }

    pub fn pick_point(&self) -> Point3<f64> {
        self.pick_point
    }

    /// Last position the dragged vertex was moved to
    pub fn current_position(&self) -> Point3<f64> {
        self.current_position
    }

    pub fn neighbors(&self) -> &[NeighborInfluence] {
        &self.neighbors
    }

    /// Pointer displacement from the pick point to the last update
    pub fn delta(&self) -> Vector3<f64> {
        self.current_position - self.pick_point
    }

    /// Target positions for moving the dragged vertex to `new_position`.
    /// Neighbors follow the pointer relative to the pick point, so a pick
    /// that lands off the vertex moves nothing until the pointer moves.
    fn targets(&self, new_position: Point3<f64>) -> Vec<(usize, Point3<f64>)> {
        let delta = new_position - self.pick_point;
        std::iter::once((self.vertex, new_position))
            .chain(
                self.neighbors
                    .iter()
                    .map(|n| (n.index, n.initial_position + delta * n.weight)),
            )
            .collect()
    }
}

/// Idle until [`start`](Self::start), dragging until [`end`](Self::end).
/// Holds at most one session.
#[derive(Debug, Clone, Default)]
pub struct VertexDragController {
    session: Option<DragSession>,
}

impl VertexDragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session on `vertex` of `mesh`.
    ///
    /// `adjacency` must describe `mesh`. Any open session is ended first.
    /// An out-of-range vertex fails without touching the current state.
    pub fn start(
        &mut self,
        object: ObjectId,
        mesh: &Mesh,
        adjacency: &AdjacencyIndex,
        vertex: usize,
        pick_point: Point3<f64>,
    ) -> EditResult<()> {
        debug_assert!(adjacency.is_current_for(mesh));

        let initial_position = mesh.position(vertex).ok_or(EditError::IndexOutOfRange {
            index: vertex,
            len: mesh.vertex_count(),
        })?;

        if let Some(previous) = self.end() {
            debug!(
                "Drag on vertex {} of {:?} replaced by new pick",
                previous.vertex, previous.object
            );
        }

        let neighbors: Vec<NeighborInfluence> = adjacency
            .neighbors_of(vertex)
            .filter_map(|index| {
                let initial_position = mesh.position(index)?;
                Some(NeighborInfluence {
                    index,
                    initial_position,
                    weight: weight((initial_position - pick_point).norm()),
                })
            })
            .collect();

        debug!(
            "Drag started on vertex {} of {:?} with {} neighbors",
            vertex,
            object,
            neighbors.len()
        );

        self.session = Some(DragSession {
            object,
            vertex,
            initial_position,
            pick_point,
            current_position: pick_point,
            neighbors,
        });
        Ok(())
    }

    /// Move the dragged vertex to `new_position` and its neighbors by their
    /// weighted share, then refresh normals and bounds.
    ///
    /// Returns `Ok(false)` without doing anything when no session is open.
    pub fn update(&mut self, mesh: &mut Mesh, new_position: Point3<f64>) -> EditResult<bool> {
        let Some(session) = self.session.as_mut() else {
            debug!("Drag update ignored: no open session");
            return Ok(false);
        };

        mesh.set_vertex_positions(&session.targets(new_position))?;
        mesh.recompute_normals();
        mesh.recompute_bounds();
        session.current_position = new_position;
        Ok(true)
    }

    /// Close the session, returning it if one was open
    pub fn end(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// Close the session if it edits `object`
    pub fn end_if_editing(&mut self, object: ObjectId) -> Option<DragSession> {
        if self.editing(object) {
            self.end()
        } else {
            None
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn editing(&self, object: ObjectId) -> bool {
        self.session.as_ref().is_some_and(|s| s.object == object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneObject, SceneTable};
    use approx::assert_relative_eq;

    fn setup() -> (ObjectId, Mesh, AdjacencyIndex) {
        let mesh = Mesh::from_buffers(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let adjacency = AdjacencyIndex::build(&mesh);
        let id = SceneTable::new().insert(SceneObject::Mesh(Mesh::new()));
        (id, mesh, adjacency)
    }

    #[test]
    fn test_weight_falls_off() {
        assert_eq!(weight(0.0), 1.0);
        assert_eq!(weight(1.0), 0.5);
        assert!(weight(0.2) > weight(0.3));
    }

    #[test]
    fn test_session_captures_neighbors() {
        let (id, mesh, adjacency) = setup();
        let mut drag = VertexDragController::new();
        drag.start(id, &mesh, &adjacency, 0, Point3::origin()).unwrap();

        let session = drag.session().unwrap();
        let indices: Vec<_> = session.neighbors().iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(session.neighbors().iter().all(|n| n.weight == 0.5));
    }

    #[test]
    fn test_update_moves_vertex_and_neighbors() {
        let (id, mut mesh, adjacency) = setup();
        let mut drag = VertexDragController::new();
        drag.start(id, &mesh, &adjacency, 0, Point3::origin()).unwrap();

        assert!(drag.update(&mut mesh, Point3::new(1.0, 0.0, 0.0)).unwrap());
        assert_eq!(mesh.position(0), Some(Point3::new(1.0, 0.0, 0.0)));
        assert_relative_eq!(mesh.position(1).unwrap(), Point3::new(1.5, 0.0, 0.0));
        assert_relative_eq!(mesh.position(2).unwrap(), Point3::new(0.5, 1.0, 0.0));
        assert!(mesh.is_consistent());
    }

    #[test]
    fn test_updates_are_relative_to_start() {
        let (id, mut mesh, adjacency) = setup();
        let mut drag = VertexDragController::new();
        drag.start(id, &mesh, &adjacency, 0, Point3::origin()).unwrap();

        drag.update(&mut mesh, Point3::new(3.0, 3.0, 0.0)).unwrap();
        drag.update(&mut mesh, Point3::new(0.0, 0.0, 2.0)).unwrap();
        assert_relative_eq!(mesh.position(1).unwrap(), Point3::new(1.0, 0.0, 1.0));
        assert_relative_eq!(drag.session().unwrap().delta(), Vector3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_offset_pick_moves_nothing_until_pointer_moves() {
        let (id, mut mesh, adjacency) = setup();
        let mut drag = VertexDragController::new();
        let pick = Point3::new(0.2, 0.0, 0.0);
        drag.start(id, &mesh, &adjacency, 0, pick).unwrap();
        let weights: Vec<_> = drag.session().unwrap().neighbors().iter().map(|n| n.weight).collect();

        drag.update(&mut mesh, pick).unwrap();
        assert_eq!(mesh.position(0), Some(pick));
        assert_relative_eq!(mesh.position(1).unwrap(), Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(mesh.position(2).unwrap(), Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(drag.session().unwrap().delta(), Vector3::zeros());

        drag.update(&mut mesh, Point3::new(0.2, 0.5, 0.0)).unwrap();
        assert_eq!(mesh.position(0), Some(Point3::new(0.2, 0.5, 0.0)));
        assert_relative_eq!(mesh.position(1).unwrap(), Point3::new(1.0, 0.5 * weights[0], 0.0));
        assert_relative_eq!(mesh.position(2).unwrap(), Point3::new(0.0, 1.0 + 0.5 * weights[1], 0.0));
    }

    #[test]
    fn test_update_without_session_is_noop() {
        let (_, mut mesh, _) = setup();
        let before: Vec<_> = mesh.positions().collect();
        let mut drag = VertexDragController::new();
        assert!(!drag.update(&mut mesh, Point3::new(9.0, 9.0, 9.0)).unwrap());
        assert_eq!(mesh.positions().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_bad_vertex_keeps_existing_session() {
        let (id, mesh, adjacency) = setup();
        let mut drag = VertexDragController::new();
        drag.start(id, &mesh, &adjacency, 1, Point3::origin()).unwrap();

        let err = drag.start(id, &mesh, &adjacency, 3, Point3::origin()).unwrap_err();
        assert_eq!(err, EditError::IndexOutOfRange { index: 3, len: 3 });
        assert_eq!(drag.session().map(DragSession::vertex), Some(1));
    }

    #[test]
    fn test_end_if_editing() {
        let (_, mesh, adjacency) = setup();
        let mut table = SceneTable::new();
        let id = table.insert(SceneObject::Mesh(Mesh::new()));
        let other = table.insert(SceneObject::Mesh(Mesh::new()));
        let mut drag = VertexDragController::new();
        drag.start(id, &mesh, &adjacency, 0, Point3::origin()).unwrap();

        assert!(drag.end_if_editing(other).is_none());
        assert!(drag.editing(id));
        assert!(drag.end_if_editing(id).is_some());
        assert!(!drag.is_dragging());
    }
}
