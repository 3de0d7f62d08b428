// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and operations

mod adjacency;
mod bbox;
mod mesh;
pub mod mesh_utils;
pub mod nurbs;
mod polyline;
mod primitives;
pub mod subdivide;

pub use adjacency::{AdjacencyCache, AdjacencyIndex};
pub use bbox::BoundingBox;
pub use mesh::{Mesh, Triangle, Vertex};
pub use nurbs::{KnotVector, NurbsCurve, NurbsSurface};
pub use polyline::Polyline;
pub use primitives::Primitive;
pub use subdivide::SubdivisionMethod;
