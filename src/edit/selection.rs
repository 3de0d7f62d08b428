// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Edit mode and picked elements

use crate::scene::ObjectId;
use serde::{Deserialize, Serialize};

/// Kind of mesh element a pick refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Vertex,
    Edge,
    Face,
}

/// Element-level editing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    None,
    Vertex,
    Edge,
    Face,
    NurbsSurface,
    NurbsCurve,
    Extrude,
    Bevel,
}

impl EditMode {
    /// Element type picks resolve to in this mode, if any
    pub fn element_type(self) -> Option<ElementType> {
        match self {
            Self::Vertex => Some(ElementType::Vertex),
            Self::Edge => Some(ElementType::Edge),
            Self::Face | Self::Extrude | Self::Bevel => Some(ElementType::Face),
            Self::None | Self::NurbsSurface | Self::NurbsCurve => None,
        }
    }
}

/// Object-level transform tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    Translate,
    Rotate,
    Scale,
}

/// The one tool currently active. Edit and transform tools exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ActiveTool {
    #[default]
    None,
    Edit(EditMode),
    Transform(TransformMode),
}

/// Active tool, selected object, and the picked vertices, edges and faces.
///
/// Each element list is replaced wholesale on every pick and is not checked
/// against any mesh; consumers resolve indices themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    tool: ActiveTool,
    selected_object: Option<ObjectId>,
    vertices: Vec<usize>,
    edges: Vec<usize>,
    faces: Vec<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch edit mode. Clears any transform mode; selections are kept.
    pub fn set_mode(&mut self, mode: EditMode) {
        self.tool = match mode {
            EditMode::None => ActiveTool::None,
            mode => ActiveTool::Edit(mode),
        };
    }

    /// Switch transform mode, clearing the edit mode
    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.tool = ActiveTool::Transform(mode);
    }

    pub fn tool(&self) -> ActiveTool {
        self.tool
    }

    /// Current edit mode; `EditMode::None` while a transform tool is active
    pub fn mode(&self) -> EditMode {
        match self.tool {
            ActiveTool::Edit(mode) => mode,
            ActiveTool::None | ActiveTool::Transform(_) => EditMode::None,
        }
    }

    pub fn transform_mode(&self) -> Option<TransformMode> {
        match self.tool {
            ActiveTool::Transform(mode) => Some(mode),
            ActiveTool::None | ActiveTool::Edit(_) => None,
        }
    }

    pub fn selected_object(&self) -> Option<ObjectId> {
        self.selected_object
    }

    pub fn select_object(&mut self, id: Option<ObjectId>) {
        self.selected_object = id;
    }

    /// Replace the list for `element_type` with `indices`
    pub fn set_selection(&mut self, element_type: ElementType, indices: Vec<usize>) {
        *self.list_mut(element_type) = indices;
    }

    pub fn selection(&self, element_type: ElementType) -> &[usize] {
        match element_type {
            ElementType::Vertex => &self.vertices,
            ElementType::Edge => &self.edges,
            ElementType::Face => &self.faces,
        }
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// Empty all three element lists
    pub fn clear_elements(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
    }

    fn list_mut(&mut self, element_type: ElementType) -> &mut Vec<usize> {
        match element_type {
            ElementType::Vertex => &mut self.vertices,
            ElementType::Edge => &mut self.edges,
            ElementType::Face => &mut self.faces,
        }
    }
}
