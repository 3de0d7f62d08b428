// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyedit Mesh Editing Core
//!
//! Interactive editing for triangle meshes: vertex dragging with weighted
//! propagation to neighboring vertices, NURBS curves and surfaces built from
//! picked control points, and Loop or midpoint subdivision.
//!
//! Input arrives already resolved to 3D points and element indices; the
//! [`Editor`] applies it to the meshes it owns and exposes the updated
//! buffers for display.

pub mod cli;
pub mod config;
pub mod edit;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod io;
pub mod scene;

pub use config::EditorConfig;
pub use editor::Editor;
pub use error::{EditError, EditResult};
pub use geometry::{Mesh, Primitive};
pub use scene::{ObjectId, SceneObject};
