//! CAM toolpath generation and G-code emission: ball-nose raster
//! surfacing over an offset SDF, and a Fanuc-dialect emitter that is the
//! sole point where points are remapped from the kernel's Y-up convention
//! to CNC Z-up axes.

mod gcode;
mod tool;
mod toolpath;

pub use gcode::{emit_fanuc_gcode, CommentStyle, Coolant, GCodeConfig};
pub use tool::ToolDefinition;
pub use toolpath::{
    generate_raster_surfacing, MotionKind, RasterDirection, SurfacingParams, ToolpathPoint,
    ToolpathResult, ToolpathStatistics,
};
