// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Editor API: the scene table plus the editing tools that act on it

use crate::config::EditorConfig;
use crate::edit::{
    CurveSurfaceBuilder, EditMode, ElementType, SelectionState, SubdivisionApplier, TransformMode,
    VertexDragController,
};
use crate::error::{EditError, EditResult};
use crate::geometry::mesh_utils::Edge;
use crate::geometry::{AdjacencyCache, Mesh, Primitive, SubdivisionMethod};
use crate::scene::{ObjectId, SceneObject, SceneTable};
use nalgebra::Point3;
use tracing::debug;

/// Main entry point for interactive editing.
///
/// Owns every scene object and routes resolved input (picked vertices,
/// drag positions, element picks, control points) to the tool it belongs
/// to. Operations whose preconditions do not hold, such as dragging with no
/// open session or subdividing with nothing selected, do nothing.
pub struct Editor {
    config: EditorConfig,
    scene: SceneTable,
    adjacency: AdjacencyCache<ObjectId>,
    selection: SelectionState,
    drag: VertexDragController,
    builder: CurveSurfaceBuilder,
    subdivision: SubdivisionApplier,
}

impl Editor {
    /// Create an editor with default settings
    pub fn new() -> Self {
        Self::from_validated(EditorConfig::default())
    }

    /// Create an editor from `config`, rejecting settings the tools cannot
    /// work with (see [`EditorConfig::validate`])
    pub fn with_config(config: EditorConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: EditorConfig) -> Self {
        Self {
            builder: CurveSurfaceBuilder::new(config.curve_samples, config.surface_resolution),
            subdivision: SubdivisionApplier::new(&config),
            scene: SceneTable::new(),
            adjacency: AdjacencyCache::new(),
            selection: SelectionState::new(),
            drag: VertexDragController::new(),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // Scene objects

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = self.scene.insert(object);
        debug!("Added {} object {:?}", self.scene.get(id).map_or("?", SceneObject::kind), id);
        id
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> ObjectId {
        self.add_object(SceneObject::Mesh(mesh))
    }

    pub fn add_primitive(&mut self, primitive: &Primitive) -> ObjectId {
        debug!("Generating {} primitive", primitive.name());
        self.add_mesh(primitive.to_mesh())
    }

    /// Remove an object. A drag on it ends and it stops being selected.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let removed = self.scene.remove(id)?;

        if self.drag.end_if_editing(id).is_some() {
            debug!("Drag ended: object {:?} removed", id);
        }
        self.adjacency.invalidate(&id);
        if self.selection.selected_object() == Some(id) {
            self.selection.select_object(None);
        }
        Some(removed)
    }

    /// Select an object, or clear the selection with `None`. Unknown
    /// handles are ignored.
    pub fn select_object(&mut self, id: Option<ObjectId>) {
        match id {
            Some(id) if !self.scene.contains(id) => debug!("Select ignored: no object {:?}", id),
            id => self.selection.select_object(id),
        }
    }

    pub fn selected_object(&self) -> Option<ObjectId> {
        self.selection.selected_object()
    }

    pub fn scene(&self) -> &SceneTable {
        &self.scene
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.scene.get(id)
    }

    /// Current buffers of a mesh object
    pub fn mesh(&self, id: ObjectId) -> Option<&Mesh> {
        self.scene.mesh(id)
    }

    // Modes and selection

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.selection.set_mode(mode);
    }

    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.selection.set_transform_mode(mode);
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Record picked elements of `object`, which also becomes the selected
    /// object. The indices are stored as given.
    pub fn pick_element(&mut self, object: ObjectId, element_type: ElementType, indices: Vec<usize>) {
        if !self.scene.contains(object) {
            debug!("Element pick ignored: no object {:?}", object);
            return;
        }
        self.selection.select_object(Some(object));
        self.selection.set_selection(element_type, indices);
    }

    /// Endpoints of the selected edges on the selected mesh. Edge indices
    /// follow [`AdjacencyIndex::edges`](crate::geometry::AdjacencyIndex::edges);
    /// indices past the end are skipped.
    pub fn selected_edge_endpoints(&mut self) -> Vec<Edge> {
        let Some(id) = self.selection.selected_object() else {
            return Vec::new();
        };
        let Some(mesh) = self.scene.mesh(id) else {
            return Vec::new();
        };

        let adjacency = self.adjacency.get_or_build(id, mesh);
        self.selection
            .edges()
            .iter()
            .filter_map(|&index| adjacency.edge(index))
            .collect()
    }

    // Vertex drag

    /// Start dragging `vertex` of `object` from `pick_point`.
    ///
    /// Non-mesh and unknown objects are ignored. An out-of-range vertex
    /// fails with `IndexOutOfRange` and changes nothing.
    pub fn pick(&mut self, object: ObjectId, vertex: usize, pick_point: Point3<f64>) -> EditResult<()> {
        let Some(mesh) = self.scene.mesh(object) else {
            debug!("Pick ignored: {:?} is not a mesh", object);
            return Ok(());
        };

        let adjacency = self.adjacency.get_or_build(object, mesh);
        self.drag.start(object, mesh, &adjacency, vertex, pick_point)?;
        self.selection.select_object(Some(object));
        self.selection.set_selection(ElementType::Vertex, vec![vertex]);
        Ok(())
    }

    /// Move the dragged vertex; does nothing when no drag is open
    pub fn move_to(&mut self, position: Point3<f64>) -> EditResult<()> {
        let Some(id) = self.drag.session().map(|s| s.object()) else {
            debug!("Move ignored: no drag in progress");
            return Ok(());
        };
        match self.scene.mesh_mut(id) {
            Some(mesh) => {
                self.drag.update(mesh, position)?;
            }
            None => {
                self.drag.end();
            }
        }
        Ok(())
    }

    /// End the drag, if any
    pub fn release(&mut self) {
        if let Some(session) = self.drag.end() {
            debug!(
                "Drag on vertex {} released, moved by {:?}",
                session.vertex(),
                session.delta()
            );
        }
    }

    pub fn drag(&self) -> &VertexDragController {
        &self.drag
    }

    // Curves and surfaces

    pub fn add_control_point(&mut self, point: Point3<f64>) {
        self.builder.add_control_point(point);
    }

    pub fn control_points(&self) -> &[Point3<f64>] {
        self.builder.control_points()
    }

    /// Build a surface from the first 16 control points as a new mesh
    /// object. `None` with fewer than 16 points.
    pub fn build_surface(&mut self) -> Option<ObjectId> {
        let mesh = self.builder.build_surface()?;
        Some(self.add_mesh(mesh))
    }

    /// Build a curve from all control points as a new curve object.
    /// `None` with fewer than 4 points.
    pub fn build_curve(&mut self) -> Option<ObjectId> {
        let curve = self.builder.build_curve()?;
        Some(self.add_object(SceneObject::Curve(curve)))
    }

    // Subdivision

    pub fn set_subdivision_level(&mut self, level: u32) -> EditResult<()> {
        self.subdivision.set_level(level)
    }

    pub fn subdivision_level(&self) -> u32 {
        self.subdivision.level()
    }

    pub fn set_subdivision_method(&mut self, method: SubdivisionMethod) {
        self.subdivision.set_method(method);
    }

    /// Subdivide the selected mesh in place.
    ///
    /// Returns `Ok(false)` when no mesh is selected. A drag on the mesh is
    /// ended first since its neighbor indices would no longer apply.
    pub fn apply_subdivision(&mut self) -> EditResult<bool> {
        let Some(id) = self.selection.selected_object() else {
            debug!("Subdivision ignored: nothing selected");
            return Ok(false);
        };
        let Some(mesh) = self.scene.mesh_mut(id) else {
            debug!("Subdivision ignored: {:?} is not a mesh", id);
            return Ok(false);
        };

        if self.drag.end_if_editing(id).is_some() {
            debug!("Drag ended: object {:?} is being subdivided", id);
        }
        self.subdivision.apply(mesh)?;
        self.adjacency.invalidate(&id);
        Ok(true)
    }

    // Tools without an implementation

    pub fn extrude(&mut self) -> EditResult<()> {
        Err(EditError::Unsupported("extrude"))
    }

    pub fn bevel(&mut self) -> EditResult<()> {
        Err(EditError::Unsupported("bevel"))
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
