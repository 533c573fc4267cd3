//! Surface extraction: marching cubes over a 3D voxel grid, marching
//! squares over a 2D cross-section, and the sphere-tracing root finder that
//! both the CAM raster and `Node::find_surface` share (the finder itself
//! lives in `crate::sdf::root_finder` and is re-exported through `Node`).

mod contours;
mod mesh;
mod tables;

pub use contours::{extract_contours, ContourLoop};
pub use mesh::{marching_cubes, MeshConfig, TriangleMesh};
