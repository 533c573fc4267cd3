//! Marching cubes: triangulates the zero-isosurface (or any `iso` level) of
//! an [`Node`] over a voxel grid, using the classic 256-case Lorensen &
//! Cline table (`surface::tables`).
//!
//! Vertices are linearly interpolated along cell edges and may be
//! duplicated across adjacent cells — acceptable for viewing/STL; a
//! downstream consumer that needs a welded mesh dedupes itself
//! (`crate::cam` and `crate::export::stl` both consume the duplicated
//! form directly).

use glam::DVec3;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::math::Aabb;
use crate::sdf::Node;

use super::tables::{EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// A triangulated surface: flat vertex buffer plus per-triangle index
/// triples; no deduplication.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<DVec3>,
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// The AABB of the emitted vertices. Empty meshes report a
    /// degenerate box at the origin rather than an inverted one.
    pub fn bounds(&self) -> Aabb {
        if self.vertices.is_empty() {
            return Aabb::new(DVec3::ZERO, DVec3::ZERO);
        }
        Aabb::from_points(self.vertices.iter().copied())
    }
}

/// Grids whose corner count would exceed this are rejected with
/// `NumericLimit` rather than silently eating memory; a 200-cell cube
/// (201³ corners) is comfortably inside this on current hardware.
const MAX_GRID_CORNERS: usize = 220 * 220 * 220;

/// Marching-cubes parameters, configured with the crate's usual `with_*`
/// builder convention.
#[derive(Debug, Clone)]
pub struct MeshConfig {
    resolution: f64,
    bounds: Option<Aabb>,
    iso: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            bounds: None,
            iso: 0.0,
        }
    }
}

impl MeshConfig {
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_iso(mut self, iso: f64) -> Self {
        self.iso = iso;
        self
    }
}

/// Triangulate `node`'s `iso`-isosurface over a voxel grid of `resolution`
/// mm. Sampling defaults to `node.bounds()` padded by one voxel.
pub fn marching_cubes(node: &Node, config: &MeshConfig) -> Result<TriangleMesh> {
    if config.resolution <= 0.0 {
        return Err(Error::invalid_parameter(
            "marching_cubes",
            "resolution",
            config.resolution,
        ));
    }

    let bounds = config
        .bounds
        .unwrap_or_else(|| node.bounds().expand(config.resolution));
    let size = bounds.size();
    let nx = (size.x / config.resolution).ceil().max(1.0) as usize;
    let ny = (size.y / config.resolution).ceil().max(1.0) as usize;
    let nz = (size.z / config.resolution).ceil().max(1.0) as usize;

    let corners_per_axis = (nx + 1, ny + 1, nz + 1);
    let total_corners = corners_per_axis.0 * corners_per_axis.1 * corners_per_axis.2;
    if total_corners > MAX_GRID_CORNERS {
        return Err(Error::numeric_limit(
            "marching_cubes",
            format!(
                "grid of {}x{}x{} corners ({total_corners}) exceeds the safety cap of {MAX_GRID_CORNERS}",
                corners_per_axis.0, corners_per_axis.1, corners_per_axis.2
            ),
        ));
    }

    tracing::debug!(
        nx, ny, nz, resolution = config.resolution, "marching_cubes: sampling grid"
    );

    let (cnx, cny, _cnz) = corners_per_axis;
    let corner_pos = |ix: usize, iy: usize, iz: usize| {
        DVec3::new(
            bounds.min.x + ix as f64 * config.resolution,
            bounds.min.y + iy as f64 * config.resolution,
            bounds.min.z + iz as f64 * config.resolution,
        )
    };

    let values: Vec<f64> = (0..total_corners)
        .into_par_iter()
        .map(|idx| {
            let ix = idx % cnx;
            let iy = (idx / cnx) % cny;
            let iz = idx / (cnx * cny);
            node.evaluate(corner_pos(ix, iy, iz)) - config.iso
        })
        .collect();

    let value_at = |ix: usize, iy: usize, iz: usize| values[ix + iy * cnx + iz * cnx * cny];

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for iz in 0..nz {
        for iy in 0..ny {
            for ix in 0..nx {
                let corner_offsets: [(usize, usize, usize); 8] = [
                    (ix, iy, iz),
                    (ix + 1, iy, iz),
                    (ix + 1, iy + 1, iz),
                    (ix, iy + 1, iz),
                    (ix, iy, iz + 1),
                    (ix + 1, iy, iz + 1),
                    (ix + 1, iy + 1, iz + 1),
                    (ix, iy + 1, iz + 1),
                ];
                let corner_values: [f64; 8] =
                    corner_offsets.map(|(x, y, z)| value_at(x, y, z));
                let corner_points: [DVec3; 8] =
                    corner_offsets.map(|(x, y, z)| corner_pos(x, y, z));

                let mut case_index = 0u8;
                for (bit, value) in corner_values.iter().enumerate() {
                    if *value < 0.0 {
                        case_index |= 1 << bit;
                    }
                }

                let edge_mask = EDGE_TABLE[case_index as usize];
                if edge_mask == 0 {
                    continue;
                }

                let mut edge_vertex = [DVec3::ZERO; 12];
                for edge in 0..12 {
                    if edge_mask & (1 << edge) == 0 {
                        continue;
                    }
                    let (a, b) = EDGE_CORNERS[edge];
                    edge_vertex[edge] = interpolate(
                        corner_points[a],
                        corner_points[b],
                        corner_values[a],
                        corner_values[b],
                    );
                }

                for tri in TRI_TABLE[case_index as usize].chunks(3) {
                    if tri[0] < 0 {
                        break;
                    }
                    let base = vertices.len() as u32;
                    vertices.push(edge_vertex[tri[0] as usize]);
                    vertices.push(edge_vertex[tri[1] as usize]);
                    vertices.push(edge_vertex[tri[2] as usize]);
                    indices.push([base, base + 1, base + 2]);
                }
            }
        }
    }

    Ok(TriangleMesh { vertices, indices })
}

/// Linear interpolation of the zero-crossing along a cube edge.
fn interpolate(pa: DVec3, pb: DVec3, va: f64, vb: f64) -> DVec3 {
    if (va - vb).abs() < 1.0e-12 {
        return pa;
    }
    let t = (-va) / (vb - va);
    pa + (pb - pa) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::{box3, sphere};

    #[test]
    fn sphere_produces_nonzero_triangles_and_refines_with_resolution() {
        let s = sphere(5.0).unwrap();
        let coarse = marching_cubes(&s, &MeshConfig::default().with_resolution(2.0)).unwrap();
        let fine = marching_cubes(&s, &MeshConfig::default().with_resolution(0.5)).unwrap();
        assert!(coarse.triangle_count() > 0);
        assert!(fine.triangle_count() > coarse.triangle_count());
    }

    #[test]
    fn sphere_vertices_stay_within_one_resolution_of_surface() {
        let s = sphere(5.0).unwrap();
        let resolution = 0.5;
        let mesh = marching_cubes(&s, &MeshConfig::default().with_resolution(resolution)).unwrap();
        for v in &mesh.vertices {
            let d = v.length() - 5.0;
            assert!(d.abs() <= resolution, "vertex off-surface by {d}");
        }
    }

    #[test]
    fn shape_outside_sampling_bounds_yields_empty_mesh() {
        let b = box3(10.0, 10.0, 10.0).unwrap();
        let far_away = Aabb::new(DVec3::new(1000.0, 1000.0, 1000.0), DVec3::new(1010.0, 1010.0, 1010.0));
        let mesh = marching_cubes(&b, &MeshConfig::default().with_resolution(1.0).with_bounds(far_away)).unwrap();
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn rejects_non_positive_resolution() {
        let s = sphere(1.0).unwrap();
        assert!(marching_cubes(&s, &MeshConfig::default().with_resolution(0.0)).is_err());
    }
}
