//! # kerf-core
//!
//! A code-first CAD/CAM kernel: exact signed-distance geometry, named
//! topology, surface extraction, and ball-nose surfacing toolpaths.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use kerf_core::prelude::*;
//!
//! let bracket = box3(40.0, 20.0, 60.0)?
//!     .subtract(cylinder(4.0, 30.0)?.translate(0.0, 0.0, 0.0), Some("bore"))
//!     .fillet("front.top", 2.0, None)?;
//!
//! let mesh = marching_cubes(&bracket, &MeshConfig::default().with_resolution(0.5))?;
//! export_stl(&mesh, std::path::Path::new("bracket.stl"))?;
//! ```
//!
//! ## Units and conventions
//!
//! - Distances are in millimetres; angles passed to rotation builders are in
//!   **degrees** (the kernel's primary audience composes shapes by hand or
//!   from an LLM, where degrees read far more naturally than radians).
//! - Precision is `f64` throughout — this is a kernel for machining real
//!   parts, not a renderer.
//! - The SDF graph treats **Y as the spindle axis**; this matters only
//!   at the CAM raster and the G-code emitter, which is the sole place
//!   coordinates are remapped to the CNC's Z-up convention.
//! - There is no implicit I/O: nothing in this crate reads the system clock
//!   or the filesystem except `export::write_stl`/`export::export_stl`
//!   themselves, and `cam::GCodeConfig`'s optional program date is supplied
//!   by the caller rather than read internally.

pub mod cam;
pub mod export;
pub mod features;
pub mod math;
pub mod sdf;
pub mod surface;
pub mod topology;

mod error;

pub use error::{Error, Result};

/// Convenience re-exports for building and machining parts without naming
/// every submodule.
pub mod prelude {
    // SDF graph
    pub use crate::sdf::{
        box3, circle2d, cone, cylinder, extrude, plane, polygon, rect2d, revolve, sphere, torus,
        Axis, Node, Node2, Readback, Readback2,
    };

    // Named topology
    pub use crate::topology::{EdgeBreakMode, EdgeDescriptor, EdgeKind, FaceDescriptor, FaceKind};

    // Semantic features
    pub use crate::features::{bolt_circle, chamfer, fillet, hole, pocket, HoleDepth};

    // Surface extraction
    pub use crate::surface::{extract_contours, marching_cubes, ContourLoop, MeshConfig, TriangleMesh};

    // CAM
    pub use crate::cam::{
        emit_fanuc_gcode, generate_raster_surfacing, CommentStyle, Coolant, GCodeConfig,
        MotionKind, RasterDirection, SurfacingParams, ToolDefinition, ToolpathPoint,
        ToolpathResult, ToolpathStatistics,
    };

    // Export
    pub use crate::export::{export_stl, write_stl};

    // Math
    pub use crate::math::{Aabb, Aabb2};
    pub use glam::{DVec2, DVec3};

    // Error handling
    pub use crate::{Error, Result};
}
