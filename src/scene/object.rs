// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene object variants

use super::ObjectId;
use crate::geometry::{BoundingBox, Mesh, NurbsCurve, Polyline};
use nalgebra::Point3;
use serde::Serialize;

/// Anything the scene table can hold. Only meshes are editable.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SceneObject {
    Mesh(Mesh),
    Curve(CurveObject),
    Light(Light),
    Group(Vec<ObjectId>),
}

impl SceneObject {
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_curve(&self) -> Option<&CurveObject> {
        match self {
            Self::Curve(curve) => Some(curve),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mesh(_) => "mesh",
            Self::Curve(_) => "curve",
            Self::Light(_) => "light",
            Self::Group(_) => "group",
        }
    }

    /// Bounds of the object's own geometry; empty for lights and groups
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Self::Mesh(mesh) => mesh.bounds(),
            Self::Curve(curve) => curve.polyline.bounds(),
            Self::Light(_) | Self::Group(_) => BoundingBox::empty(),
        }
    }
}

/// Built curve: its definition plus the sampled polyline shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct CurveObject {
    pub curve: NurbsCurve,
    pub polyline: Polyline,
}

/// Point light
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Light {
    pub position: Point3<f64>,
    pub intensity: f64,
}

impl Light {
    pub fn new(position: Point3<f64>, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }
}
