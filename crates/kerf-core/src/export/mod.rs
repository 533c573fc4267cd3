//! Mesh export: binary STL, the only export format the kernel writes
//! directly — G-code emission lives in `crate::cam` since it needs the
//! toolpath, not the mesh.

mod stl;

pub use stl::{export_stl, write_stl};
