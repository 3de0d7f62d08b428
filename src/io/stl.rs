// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL import and export

use crate::geometry::Mesh;
use anyhow::{Context, Result};
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

/// Export mesh to binary STL
pub fn export_stl(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let triangles = stl_triangles(mesh);

    let file = File::create(path).with_context(|| format!("Failed to create STL file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    stl_io::write_stl(&mut writer, triangles.iter()).context("Failed to write STL file")?;
    writer.flush().context("Failed to write STL file")?;

    Ok(())
}

/// Export mesh to ASCII STL
pub fn export_stl_ascii(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create STL file: {:?}", path))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "solid polyedit")?;
    for triangle in stl_triangles(mesh) {
        let [nx, ny, nz] = [triangle.normal[0], triangle.normal[1], triangle.normal[2]];
        writeln!(file, "  facet normal {} {} {}", nx, ny, nz)?;
        writeln!(file, "    outer loop")?;
        for vertex in &triangle.vertices {
            writeln!(file, "      vertex {} {} {}", vertex[0], vertex[1], vertex[2])?;
        }
        writeln!(file, "    endloop")?;
        writeln!(file, "  endfacet")?;
    }
    writeln!(file, "endsolid polyedit")?;
    file.flush()?;

    Ok(())
}

/// Load an STL file as an indexed mesh. Coincident vertices are shared, so
/// the result is ready for adjacency and dragging.
pub fn import_stl(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let mut file = File::open(path).with_context(|| format!("Failed to open STL file: {:?}", path))?;
    let stl = stl_io::read_stl(&mut file).context("Failed to read STL file")?;

    let positions = stl
        .vertices
        .iter()
        .map(|v| Point3::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2])))
        .collect();
    let indices = stl.faces.iter().map(|face| face.vertices).collect();

    Mesh::from_buffers(positions, indices).with_context(|| format!("Malformed STL file: {:?}", path))
}

fn stl_triangles(mesh: &Mesh) -> Vec<StlTriangle> {
    let vertices = mesh.vertices();
    mesh.triangle_indices()
        .map(|[i0, i1, i2]| {
            let [p0, p1, p2] = [vertices[i0].position, vertices[i1].position, vertices[i2].position];
            let normal = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(1e-12)
                .unwrap_or_else(Vector3::zeros);

            StlTriangle {
                normal: Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [p0, p1, p2].map(|p| StlVertex::new([p.x as f32, p.y as f32, p.z as f32])),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_stl() -> Result<()> {
        let mesh = Primitive::cube(Vector3::new(10.0, 10.0, 10.0), true).to_mesh();
        let file = NamedTempFile::new()?;

        export_stl(&mesh, file.path())?;

        // 80-byte header, 4-byte count, 50 bytes per triangle
        let len = std::fs::metadata(file.path())?.len();
        assert_eq!(len, 84 + 50 * 12);
        Ok(())
    }

    #[test]
    fn test_import_shares_vertices() -> Result<()> {
        let mesh = Primitive::sphere(1.0, 8).to_mesh();
        let file = NamedTempFile::new()?;
        export_stl(&mesh, file.path())?;

        let loaded = import_stl(file.path())?;
        assert_eq!(loaded.triangle_count(), mesh.triangle_count());
        assert_eq!(loaded.vertex_count(), mesh.vertex_count());
        Ok(())
    }

    #[test]
    fn test_export_ascii() -> Result<()> {
        let mesh = Primitive::tetrahedron(1.0).to_mesh();
        let file = NamedTempFile::new()?;
        export_stl_ascii(&mesh, file.path())?;

        let text = std::fs::read_to_string(file.path())?;
        assert!(text.starts_with("solid polyedit"));
        assert_eq!(text.matches("facet normal").count(), 4);
        Ok(())
    }

    #[test]
    fn test_import_missing_file() {
        let err = import_stl("/nonexistent/model.stl").unwrap_err();
        assert!(format!("{err:#}").contains("Failed to open STL file"));
    }
}
