//! Binary STL export: the standard 80-byte header + uint32 triangle
//! count + 12 floats × 3 + uint16 attribute-byte-count writer.
//!
//! STL carries no named topology, tool data, or G-code — it is a pure
//! geometry sink for [`TriangleMesh`], one layer outside the core.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;

use crate::error::{Error, Result};
use crate::surface::TriangleMesh;

/// Write `mesh` to `path` as binary STL. Fails with `StateViolation` on an
/// empty mesh — exporting before a mesh has been computed is a state error.
pub fn export_stl(mesh: &TriangleMesh, path: &Path) -> Result<()> {
    if mesh.triangle_count() == 0 {
        return Err(Error::state_violation("export_stl", "mesh has no triangles"));
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer)
}

/// Same encoding as [`export_stl`], to an arbitrary writer — used by the
/// CLI when writing to stdout and by tests.
pub fn write_stl(mesh: &TriangleMesh, writer: &mut impl Write) -> Result<()> {
    if mesh.triangle_count() == 0 {
        return Err(Error::state_violation("write_stl", "mesh has no triangles"));
    }

    let header_text = format!(
        "kerf STL export - {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    let mut header = [b' '; 80];
    let len = header_text.len().min(80);
    header[..len].copy_from_slice(&header_text.as_bytes()[..len]);
    writer.write_all(&header)?;

    writer.write_all(&(mesh.triangle_count() as u32).to_le_bytes())?;

    for tri in &mesh.indices {
        let v0 = mesh.vertices[tri[0] as usize];
        let v1 = mesh.vertices[tri[1] as usize];
        let v2 = mesh.vertices[tri[2] as usize];

        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        write_vec3_f32(writer, normal)?;
        write_vec3_f32(writer, v0)?;
        write_vec3_f32(writer, v1)?;
        write_vec3_f32(writer, v2)?;
        writer.write_all(&0u16.to_le_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

fn write_vec3_f32(writer: &mut impl Write, v: DVec3) -> Result<()> {
    writer.write_all(&(v.x as f32).to_le_bytes())?;
    writer.write_all(&(v.y as f32).to_le_bytes())?;
    writer.write_all(&(v.z as f32).to_le_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            indices: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn single_triangle_is_134_bytes() {
        let mut buf = Vec::new();
        write_stl(&triangle(), &mut buf).unwrap();
        assert_eq!(buf.len(), 80 + 4 + 50);
    }

    #[test]
    fn header_encodes_triangle_count() {
        let mut buf = Vec::new();
        write_stl(&triangle(), &mut buf).unwrap();
        let count = u32::from_le_bytes(buf[80..84].try_into().unwrap());
        assert_eq!(count, 1);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mut buf = Vec::new();
        assert!(write_stl(&TriangleMesh::default(), &mut buf).is_err());
    }
}
