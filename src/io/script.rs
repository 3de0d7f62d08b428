// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Edit scripts: recorded editor input replayed in batch.
//!
//! A script is a JSON document with a `commands` array. Objects are
//! referred to by creation order: the first object a script creates is
//! `0`, the next `1`, and so on. Builds that produce nothing do not take a
//! number.
//!
//! ```json
//! {
//!   "commands": [
//!     { "op": "add_primitive", "primitive": { "kind": "sphere", "r": 1.0, "segments": 16 } },
//!     { "op": "pick", "object": 0, "vertex": 0, "point": [0.0, 1.0, 0.0] },
//!     { "op": "move_to", "point": [0.0, 1.5, 0.0] },
//!     { "op": "release" },
//!     { "op": "subdivide" }
//!   ]
//! }
//! ```

use crate::edit::{EditMode, ElementType, TransformMode};
use crate::editor::Editor;
use crate::geometry::{Mesh, Primitive, SubdivisionMethod};
use crate::io::import_stl;
use crate::scene::{Light, ObjectId, SceneObject};
use anyhow::{anyhow, Context, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One recorded editor operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    AddPrimitive {
        primitive: Primitive,
    },
    AddMesh {
        positions: Vec<Point3<f64>>,
        indices: Vec<[usize; 3]>,
    },
    AddLight {
        position: Point3<f64>,
        #[serde(default = "default_intensity")]
        intensity: f64,
    },
    ImportStl {
        path: PathBuf,
    },
    Remove {
        object: usize,
    },
    Select {
        object: Option<usize>,
    },
    SetEditMode {
        mode: EditMode,
    },
    SetTransformMode {
        mode: TransformMode,
    },
    Pick {
        object: usize,
        vertex: usize,
        point: Point3<f64>,
    },
    MoveTo {
        point: Point3<f64>,
    },
    Release,
    PickElement {
        object: usize,
        element: ElementType,
        indices: Vec<usize>,
    },
    AddControlPoint {
        point: Point3<f64>,
    },
    BuildSurface,
    BuildCurve,
    SetSubdivisionLevel {
        level: u32,
    },
    SetSubdivisionMethod {
        method: SubdivisionMethod,
    },
    Subdivide,
}

fn default_intensity() -> f64 {
    1.0
}

/// A list of commands to replay against an [`Editor`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditScript {
    pub commands: Vec<EditCommand>,
}

/// What a replay produced
#[derive(Debug, Clone, Default)]
pub struct ScriptReport {
    /// Objects the script created, in creation order
    pub created: Vec<ObjectId>,
    /// Commands that ran
    pub executed: usize,
}

impl ScriptReport {
    /// Most recently created object that still exists and is a mesh
    pub fn last_mesh(&self, editor: &Editor) -> Option<ObjectId> {
        self.created.iter().rev().copied().find(|&id| editor.mesh(id).is_some())
    }
}

impl EditScript {
    pub fn new(commands: Vec<EditCommand>) -> Self {
        Self { commands }
    }

    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("Failed to parse edit script")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read edit script: {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Invalid edit script: {:?}", path))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize edit script")
    }

    /// Run every command in order, stopping at the first failure
    pub fn run(&self, editor: &mut Editor) -> Result<ScriptReport> {
        let mut report = ScriptReport::default();

        for (step, command) in self.commands.iter().enumerate() {
            debug!("Script step {}: {:?}", step, command);
            apply(editor, command, &mut report.created)
                .with_context(|| format!("Script command {} failed", step))?;
            report.executed += 1;
        }

        Ok(report)
    }
}

fn object_ref(created: &[ObjectId], index: usize) -> Result<ObjectId> {
    created.get(index).copied().ok_or_else(|| {
        anyhow!(
            "Object {} does not exist ({} objects created so far)",
            index,
            created.len()
        )
    })
}

fn apply(editor: &mut Editor, command: &EditCommand, created: &mut Vec<ObjectId>) -> Result<()> {
    match command {
        EditCommand::AddPrimitive { primitive } => {
            created.push(editor.add_primitive(primitive));
        }
        EditCommand::AddMesh { positions, indices } => {
            let mesh = Mesh::from_buffers(positions.clone(), indices.clone())?;
            created.push(editor.add_mesh(mesh));
        }
        EditCommand::AddLight {
            position,
            intensity,
        } => {
            created.push(editor.add_object(SceneObject::Light(Light::new(*position, *intensity))));
        }
        EditCommand::ImportStl { path } => {
            created.push(editor.add_mesh(import_stl(path)?));
        }
        EditCommand::Remove { object } => {
            editor.remove_object(object_ref(created, *object)?);
        }
        EditCommand::Select { object } => {
            let id = object.map(|index| object_ref(created, index)).transpose()?;
            editor.select_object(id);
        }
        EditCommand::SetEditMode { mode } => editor.set_edit_mode(*mode),
        EditCommand::SetTransformMode { mode } => editor.set_transform_mode(*mode),
        EditCommand::Pick {
            object,
            vertex,
            point,
        } => {
            editor.pick(object_ref(created, *object)?, *vertex, *point)?;
        }
        EditCommand::MoveTo { point } => editor.move_to(*point)?,
        EditCommand::Release => editor.release(),
        EditCommand::PickElement {
            object,
            element,
            indices,
        } => {
            editor.pick_element(object_ref(created, *object)?, *element, indices.clone());
        }
        EditCommand::AddControlPoint { point } => editor.add_control_point(*point),
        EditCommand::BuildSurface => created.extend(editor.build_surface()),
        EditCommand::BuildCurve => created.extend(editor.build_curve()),
        EditCommand::SetSubdivisionLevel { level } => editor.set_subdivision_level(*level)?,
        EditCommand::SetSubdivisionMethod { method } => editor.set_subdivision_method(*method),
        EditCommand::Subdivide => {
            editor.apply_subdivision()?;
        }
    }
    Ok(())
}
