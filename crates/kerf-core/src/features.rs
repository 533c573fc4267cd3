//! Semantic features: a convenience layer built on primitives plus
//! named topology — `hole`, `pocket`, `boltCircle`, and free-function
//! wrappers over `Node::chamfer`/`Node::fillet`. Each one resolves a face
//! name to a planar, axis-aligned face and subtracts (or edge-breaks) a
//! primitive positioned against it.

use glam::DVec3;

use crate::error::{Error, Result};
use crate::sdf::{box3, cylinder, Node};
use crate::topology::{FaceDescriptor, FaceKind};

/// How deep a hole cuts: either an explicit value or all the way through
/// the shape's bounding extent along the face-normal axis.
#[derive(Debug, Clone, Copy)]
pub enum HoleDepth {
    Through,
    Value(f64),
}

/// A cutter extends this far past the face plane on the outward side, so
/// the subtraction always fully clears the surface even at floating-point
/// boundaries.
const CUT_MARGIN: f64 = 1.0;

fn is_axis_aligned(normal: DVec3) -> bool {
    const EPS: f64 = 1.0e-6;
    let n = normal.normalize_or_zero().abs();
    (n.x > 1.0 - EPS) || (n.y > 1.0 - EPS) || (n.z > 1.0 - EPS)
}

/// The three cardinal directions a planar face normal snaps to, plus the
/// two tangent axes used to interpret a feature's `at` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cardinal {
    X,
    Y,
    Z,
}

impl Cardinal {
    fn unit(self) -> DVec3 {
        match self {
            Cardinal::X => DVec3::X,
            Cardinal::Y => DVec3::Y,
            Cardinal::Z => DVec3::Z,
        }
    }
}

/// Snaps a face normal to its nearest cardinal axis and sign, and reports
/// the two tangent axes (`u`, `v`) used for `at` offsets and pocket
/// width/length — `u` is the lower-indexed remaining axis (X before Y
/// before Z), `v` the other.
struct FaceFrame {
    normal_axis: Cardinal,
    sign: f64,
    u: Cardinal,
    v: Cardinal,
}

fn face_frame(normal: DVec3) -> FaceFrame {
    let n = normal.normalize_or_zero();
    let (normal_axis, sign, u, v) = if n.x.abs() >= n.y.abs() && n.x.abs() >= n.z.abs() {
        (Cardinal::X, n.x.signum(), Cardinal::Y, Cardinal::Z)
    } else if n.y.abs() >= n.z.abs() {
        (Cardinal::Y, n.y.signum(), Cardinal::X, Cardinal::Z)
    } else {
        (Cardinal::Z, n.z.signum(), Cardinal::X, Cardinal::Y)
    };
    FaceFrame { normal_axis, sign, u, v }
}

fn tangent_offset(frame: &FaceFrame, at: (f64, f64)) -> DVec3 {
    frame.u.unit() * at.0 + frame.v.unit() * at.1
}

fn require_planar_axis_face(shape: &Node, face_name: &str, op: &str) -> Result<FaceDescriptor> {
    let face = shape.face(face_name)?;
    if face.kind != FaceKind::Planar || !is_axis_aligned(face.normal) {
        let planar: Vec<String> = shape
            .faces()
            .into_iter()
            .filter(|f| f.kind == FaceKind::Planar && is_axis_aligned(f.normal))
            .map(|f| f.name)
            .collect();
        return Err(Error::topology_mismatch(
            op,
            format!(
                "face `{face_name}` must be planar and axis-aligned (planar faces: {})",
                if planar.is_empty() { "none".to_string() } else { planar.join(", ") }
            ),
        ));
    }
    Ok(face)
}

fn bounds_extent_along(shape: &Node, axis: Cardinal) -> f64 {
    let size = shape.bounds().size();
    match axis {
        Cardinal::X => size.x,
        Cardinal::Y => size.y,
        Cardinal::Z => size.z,
    }
}

/// Orients a cylinder's local Y axis onto `frame`'s normal axis. Cutting
/// along Y needs no rotation in either sign (the cylinder is symmetric
/// about its mid-plane); the other two axes need a quarter turn.
fn orient_cylinder(tool: Node, frame: &FaceFrame) -> Node {
    match (frame.normal_axis, frame.sign >= 0.0) {
        (Cardinal::Y, _) => tool,
        (Cardinal::X, true) => tool.rotate_z(-90.0),
        (Cardinal::X, false) => tool.rotate_z(90.0),
        (Cardinal::Z, true) => tool.rotate_x(90.0),
        (Cardinal::Z, false) => tool.rotate_x(-90.0),
    }
}

/// Cuts a cylindrical hole into `shape` starting at `face` and boring
/// inward (opposite the face's outward normal).
pub fn hole(
    shape: Node,
    face_name: &str,
    diameter: f64,
    depth: HoleDepth,
    at: Option<(f64, f64)>,
    feature_name: Option<&str>,
) -> Result<Node> {
    if diameter <= 0.0 {
        return Err(Error::invalid_parameter("hole", "diameter", diameter));
    }
    let face = require_planar_axis_face(&shape, face_name, "hole")?;
    let frame = face_frame(face.normal);
    let depth_value = match depth {
        HoleDepth::Through => bounds_extent_along(&shape, frame.normal_axis) + CUT_MARGIN,
        HoleDepth::Value(d) => {
            if d <= 0.0 {
                return Err(Error::invalid_parameter("hole", "depth", d));
            }
            d
        }
    };

    let total_length = depth_value + CUT_MARGIN;
    let tool = cylinder(diameter * 0.5, total_length)?;
    let tool = orient_cylinder(tool, &frame);

    let origin = face.origin.unwrap_or(DVec3::ZERO) + tangent_offset(&frame, at.unwrap_or((0.0, 0.0)));
    let inward = -frame.normal_axis.unit() * frame.sign;
    let center = origin + inward * ((depth_value - CUT_MARGIN) * 0.5);
    let tool = tool.translate(center.x, center.y, center.z);

    let feature_name = feature_name
        .map(str::to_string)
        .unwrap_or_else(|| crate::sdf::node::auto_feature_name(&shape, "hole"));
    Ok(shape.subtract(tool, Some(&feature_name)))
}

/// Cuts a rectangular pocket into `shape` starting at `face`, `width`
/// along the frame's `u` tangent axis and `length` along `v`.
pub fn pocket(
    shape: Node,
    face_name: &str,
    width: f64,
    length: f64,
    depth: f64,
    at: Option<(f64, f64)>,
    feature_name: Option<&str>,
) -> Result<Node> {
    if width <= 0.0 {
        return Err(Error::invalid_parameter("pocket", "width", width));
    }
    if length <= 0.0 {
        return Err(Error::invalid_parameter("pocket", "length", length));
    }
    if depth <= 0.0 {
        return Err(Error::invalid_parameter("pocket", "depth", depth));
    }
    let face = require_planar_axis_face(&shape, face_name, "pocket")?;
    let frame = face_frame(face.normal);

    let total_depth = depth + CUT_MARGIN;
    let dims = |axis: Cardinal| -> f64 {
        if axis == frame.normal_axis {
            total_depth
        } else if axis == frame.u {
            width
        } else {
            length
        }
    };
    let tool = box3(dims(Cardinal::X), dims(Cardinal::Y), dims(Cardinal::Z))?;

    let origin = face.origin.unwrap_or(DVec3::ZERO) + tangent_offset(&frame, at.unwrap_or((0.0, 0.0)));
    let inward = -frame.normal_axis.unit() * frame.sign;
    let center = origin + inward * ((depth - CUT_MARGIN) * 0.5);
    let tool = tool.translate(center.x, center.y, center.z);

    let feature_name = feature_name
        .map(str::to_string)
        .unwrap_or_else(|| crate::sdf::node::auto_feature_name(&shape, "pocket"));
    Ok(shape.subtract(tool, Some(&feature_name)))
}

/// Cuts `count` equally spaced holes around a circle of diameter
/// `bolt_circle_diameter`, centred (in the face's tangent plane) at `at`
/// and starting at `start_angle_deg` (default 0, measured from the `u`
/// tangent axis toward `v`).
#[allow(clippy::too_many_arguments)]
pub fn bolt_circle(
    mut shape: Node,
    face_name: &str,
    count: u32,
    bolt_circle_diameter: f64,
    hole_diameter: f64,
    depth: HoleDepth,
    start_angle_deg: Option<f64>,
    at: Option<(f64, f64)>,
    feature_name: Option<&str>,
) -> Result<Node> {
    if count < 1 {
        return Err(Error::invalid_parameter("bolt_circle", "count", count));
    }
    if bolt_circle_diameter <= 0.0 {
        return Err(Error::invalid_parameter(
            "bolt_circle",
            "bolt_circle_diameter",
            bolt_circle_diameter,
        ));
    }
    let center = at.unwrap_or((0.0, 0.0));
    let start_angle = start_angle_deg.unwrap_or(0.0).to_radians();
    let radius = bolt_circle_diameter * 0.5;

    for i in 0..count {
        let angle = start_angle + std::f64::consts::TAU * (i as f64) / (count as f64);
        let u = center.0 + radius * angle.cos();
        let v = center.1 + radius * angle.sin();
        let name = feature_name.map(|base| format!("{base}_{}", i + 1));
        shape = hole(shape, face_name, hole_diameter, depth, Some((u, v)), name.as_deref())?;
    }

    Ok(shape)
}

pub fn chamfer(shape: Node, edge_name: &str, size: f64, feature_name: Option<&str>) -> Result<Node> {
    shape.chamfer(edge_name, size, feature_name)
}

pub fn fillet(shape: Node, edge_name: &str, radius: f64, feature_name: Option<&str>) -> Result<Node> {
    shape.fillet(edge_name, radius, feature_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::box3 as make_box3;

    #[test]
    fn hole_through_top_face_cuts_a_through_bore() {
        let shape = make_box3(40.0, 20.0, 40.0).unwrap();
        let shape = hole(shape, "top", 8.0, HoleDepth::Through, None, None).unwrap();
        assert!(shape.evaluate(DVec3::new(0.0, 0.0, 0.0)) > 0.0);
        assert!(shape.evaluate(DVec3::new(15.0, 0.0, 15.0)) < 0.0);
    }

    #[test]
    fn hole_on_side_face_bores_inward_along_x() {
        let shape = make_box3(40.0, 20.0, 40.0).unwrap();
        let shape = hole(shape, "right", 6.0, HoleDepth::Value(10.0), None, None).unwrap();
        assert!(shape.evaluate(DVec3::new(18.0, 0.0, 0.0)) > 0.0);
        assert!(shape.evaluate(DVec3::new(0.0, 0.0, 0.0)) < 0.0);
    }

    #[test]
    fn hole_rejects_non_planar_face_with_helpful_message() {
        let shape = crate::sdf::sphere(5.0).unwrap();
        let err = hole(shape, "surface", 1.0, HoleDepth::Value(1.0), None, None).unwrap_err();
        assert!(err.to_string().contains("planar"));
    }

    #[test]
    fn pocket_removes_material_at_expected_depth() {
        let shape = make_box3(40.0, 20.0, 40.0).unwrap();
        let shape = pocket(shape, "top", 10.0, 10.0, 5.0, None, None).unwrap();
        assert!(shape.evaluate(DVec3::new(0.0, 9.0, 0.0)) > 0.0);
        assert!(shape.evaluate(DVec3::new(0.0, 4.0, 0.0)) < 0.0);
    }

    #[test]
    fn bolt_circle_cuts_n_holes() {
        let shape = make_box3(60.0, 20.0, 60.0).unwrap();
        let shape = bolt_circle(shape, "top", 4, 40.0, 5.0, HoleDepth::Through, None, None, None).unwrap();
        let faces = shape.faces();
        let hole_faces = faces.iter().filter(|f| f.name.starts_with("hole_")).count();
        assert!(hole_faces > 0);
        assert!(faces.iter().any(|f| f.name.starts_with("hole_1.")));
        assert!(faces.iter().any(|f| f.name.starts_with("hole_4.")));
    }
}
