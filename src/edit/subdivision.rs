// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Subdivision tool state

use crate::config::EditorConfig;
use crate::error::{EditError, EditResult};
use crate::geometry::subdivide::subdivided_buffers;
use crate::geometry::{Mesh, SubdivisionMethod};
use tracing::debug;

/// Level and scheme for the subdivision tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubdivisionApplier {
    level: u32,
    max_level: u32,
    max_faces: usize,
    method: SubdivisionMethod,
}

impl SubdivisionApplier {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            level: config.subdivision_level.clamp(1, config.max_subdivision_level.max(1)),
            max_level: config.max_subdivision_level,
            max_faces: config.max_faces,
            method: config.subdivision_method,
        }
    }

    /// Set the number of levels applied by [`apply`](Self::apply)
    pub fn set_level(&mut self, level: u32) -> EditResult<()> {
        if level == 0 {
            return Err(EditError::InvalidSubdivisionLevel(level));
        }
        if level > self.max_level {
            return Err(EditError::SubdivisionLevelTooHigh {
                level,
                max: self.max_level,
            });
        }
        self.level = level;
        Ok(())
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn method(&self) -> SubdivisionMethod {
        self.method
    }

    pub fn set_method(&mut self, method: SubdivisionMethod) {
        self.method = method;
    }

    /// Replace `mesh`'s buffers with the subdivided result. On error the mesh
    /// is left as it was.
    pub fn apply(&self, mesh: &mut Mesh) -> EditResult<()> {
        let (positions, indices) = subdivided_buffers(mesh, self.method, self.level, self.max_faces)?;
        mesh.replace_buffers(positions, indices)?;
        debug!(
            "Applied {} subdivision x{}: {} vertices, {} triangles",
            self.method,
            self.level,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(())
    }
}

impl Default for SubdivisionApplier {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::Vector3;

    #[test]
    fn test_set_level_bounds() {
        let mut applier = SubdivisionApplier::default();
        assert_eq!(applier.set_level(0), Err(EditError::InvalidSubdivisionLevel(0)));
        assert_eq!(
            applier.set_level(6),
            Err(EditError::SubdivisionLevelTooHigh { level: 6, max: 5 })
        );
        assert_eq!(applier.level(), 1);

        applier.set_level(5).unwrap();
        assert_eq!(applier.level(), 5);
    }

    #[test]
    fn test_apply_replaces_buffers() {
        let mut mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_mesh();
        let revision = mesh.topology_revision();
        let mut applier = SubdivisionApplier::default();
        applier.set_level(2).unwrap();

        applier.apply(&mut mesh).unwrap();
        assert_eq!(mesh.triangle_count(), 12 * 16);
        assert_eq!(mesh.topology_revision(), revision + 1);
        assert!(mesh.is_consistent());
    }

    #[test]
    fn test_apply_respects_face_budget() {
        let config = EditorConfig {
            max_faces: 100,
            ..Default::default()
        };
        let mut applier = SubdivisionApplier::new(&config);
        applier.set_level(2).unwrap();

        let mut mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_mesh();
        let err = applier.apply(&mut mesh).unwrap_err();
        assert!(matches!(err, EditError::MeshTooLarge { projected: 192, .. }));
        assert_eq!(mesh.triangle_count(), 12);
    }
}
