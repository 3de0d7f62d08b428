// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene object table
//!
//! Objects live in an arena keyed by [`ObjectId`]. Handles stay valid until
//! the object is removed and are never reused for a different object.

mod object;

pub use object::{CurveObject, Light, SceneObject};

use crate::geometry::Mesh;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to an object in the scene table.
    pub struct ObjectId;
}

/// Owns every scene object
#[derive(Debug, Clone, Default)]
pub struct SceneTable {
    objects: SlotMap<ObjectId, SceneObject>,
}

impl SceneTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        self.objects.insert(object)
    }

    /// Remove an object; group members referencing it are dropped as well
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let removed = self.objects.remove(id)?;
        for object in self.objects.values_mut() {
            if let SceneObject::Group(members) = object {
                members.retain(|&member| member != id);
            }
        }
        Some(removed)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// The object's mesh, `None` for missing or non-mesh objects
    pub fn mesh(&self, id: ObjectId) -> Option<&Mesh> {
        self.get(id).and_then(SceneObject::as_mesh)
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Option<&mut Mesh> {
        self.get_mut(id).and_then(SceneObject::as_mesh_mut)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys()
    }
}
