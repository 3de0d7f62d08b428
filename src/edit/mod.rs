// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Interactive editing tools

mod builder;
pub mod drag;
mod selection;
mod subdivision;

pub use builder::{CurveSurfaceBuilder, CURVE_POINTS, SURFACE_POINTS};
pub use drag::{DragSession, NeighborInfluence, VertexDragController};
pub use selection::{ActiveTool, EditMode, ElementType, SelectionState, TransformMode};
pub use subdivision::SubdivisionApplier;
