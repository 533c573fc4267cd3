//! 2D -> 3D bridges: extrude and revolve.
//!
//! A profile's 2D coordinates map to the kernel's XZ plane; both bridges
//! sweep along Y, matching the Y-axis convention every other primitive
//! already commits to (`Cylinder`, `Cone`, `Torus`).
//! `revolve(circle2d(r), offset)` must therefore agree with `torus(offset,
//! r)`, which uses the identical `(p.xz().length() - major, p.y)` pairing.

use glam::{DVec2, DVec3};

use crate::error::{Error, Result};
use crate::topology::FaceDescriptor;

use super::node::{Kind, Node};
use super::node2::{Node2, ProfileShape};

/// Extrude `profile` (read in the XZ plane) symmetrically about Y to total
/// height `h`.
pub fn extrude(profile: Node2, h: f64) -> Result<Node> {
    if h <= 0.0 {
        return Err(Error::invalid_parameter("extrude", "h", h));
    }
    Ok(Node::leaf(Kind::Extrude(profile, h)))
}

/// Revolve `profile` (read as `(radial, y)`) about the Y axis, offset
/// outward by `offset`. A circle revolved at a positive offset is a torus.
pub fn revolve(profile: Node2, offset: f64) -> Result<Node> {
    if offset < 0.0 {
        return Err(Error::invalid_parameter("revolve", "offset", offset));
    }
    Ok(Node::leaf(Kind::Revolve(profile, offset)))
}

/// Quilez's exact extrusion: a naive `max(d, wy)` is wrong at corners.
pub(crate) fn extrude_evaluate(profile: &Node2, p: DVec3, h: f64) -> f64 {
    let d = profile.evaluate(DVec2::new(p.x, p.z));
    let wy = p.y.abs() - h * 0.5;
    d.max(wy).min(0.0) + d.max(0.0).hypot(wy.max(0.0))
}

pub(crate) fn revolve_evaluate(profile: &Node2, p: DVec3, offset: f64) -> f64 {
    let radial = p.xz().length() - offset;
    profile.evaluate(DVec2::new(radial, p.y))
}

pub(crate) fn extrude_faces(profile: &Node2, h: f64) -> Vec<FaceDescriptor> {
    let half = h * 0.5;
    let mut faces = vec![
        FaceDescriptor::planar("top", DVec3::Y, DVec3::new(0.0, half, 0.0)),
        FaceDescriptor::planar("bottom", -DVec3::Y, DVec3::new(0.0, -half, 0.0)),
    ];
    match profile.profile_shape() {
        ProfileShape::Circle { radius } => faces.push(FaceDescriptor {
            name: "wall".into(),
            normal: DVec3::X,
            kind: crate::topology::FaceKind::Cylindrical,
            origin: Some(DVec3::ZERO),
            radius: Some(radius),
            axis: Some(DVec3::Y),
            edge_break_size: None,
            edge_break_mode: None,
        }),
        ProfileShape::Rect { half: rect_half } => {
            faces.push(FaceDescriptor::planar(
                "wall_right",
                DVec3::X,
                DVec3::new(rect_half.x, 0.0, 0.0),
            ));
            faces.push(FaceDescriptor::planar(
                "wall_left",
                -DVec3::X,
                DVec3::new(-rect_half.x, 0.0, 0.0),
            ));
            faces.push(FaceDescriptor::planar(
                "wall_front",
                DVec3::Z,
                DVec3::new(0.0, 0.0, rect_half.y),
            ));
            faces.push(FaceDescriptor::planar(
                "wall_back",
                -DVec3::Z,
                DVec3::new(0.0, 0.0, -rect_half.y),
            ));
        }
        ProfileShape::Freeform => faces.push(FaceDescriptor {
            name: "wall".into(),
            normal: DVec3::X,
            kind: crate::topology::FaceKind::Freeform,
            origin: None,
            radius: None,
            axis: None,
            edge_break_size: None,
            edge_break_mode: None,
        }),
    }
    faces
}

pub(crate) fn extrude_classify(profile: &Node2, p: DVec3, h: f64) -> Option<String> {
    let top_d = (p.y - h * 0.5).abs();
    let bottom_d = (p.y + h * 0.5).abs();
    let wall_d = profile.evaluate(DVec2::new(p.x, p.z)).abs();
    if top_d <= bottom_d && top_d <= wall_d {
        return Some("top".into());
    }
    if bottom_d <= wall_d {
        return Some("bottom".into());
    }
    match profile.profile_shape() {
        ProfileShape::Circle { .. } => Some("wall".into()),
        ProfileShape::Rect { half } => {
            let dists = [
                (p.x - half.x).abs(),
                (p.x + half.x).abs(),
                (p.z - half.y).abs(),
                (p.z + half.y).abs(),
            ];
            let names = ["wall_right", "wall_left", "wall_front", "wall_back"];
            let mut best = 0;
            for i in 1..4 {
                if dists[i] < dists[best] {
                    best = i;
                }
            }
            Some(names[best].into())
        }
        ProfileShape::Freeform => Some("wall".into()),
    }
}

pub(crate) fn revolve_faces(profile: &Node2, offset: f64) -> Vec<FaceDescriptor> {
    match profile.profile_shape() {
        ProfileShape::Circle { radius } => vec![FaceDescriptor {
            name: "surface".into(),
            normal: DVec3::Y,
            kind: crate::topology::FaceKind::Toroidal,
            origin: Some(DVec3::ZERO),
            radius: Some(radius),
            axis: Some(DVec3::Y),
            edge_break_size: None,
            edge_break_mode: None,
        }],
        ProfileShape::Rect { half } => {
            let outer = offset + half.x;
            let mut faces = vec![
                FaceDescriptor::planar("top", DVec3::Y, DVec3::new(0.0, half.y, 0.0)),
                FaceDescriptor::planar("bottom", -DVec3::Y, DVec3::new(0.0, -half.y, 0.0)),
                FaceDescriptor {
                    name: "outer_wall".into(),
                    normal: DVec3::X,
                    kind: crate::topology::FaceKind::Cylindrical,
                    origin: Some(DVec3::ZERO),
                    radius: Some(outer),
                    axis: Some(DVec3::Y),
                    edge_break_size: None,
                    edge_break_mode: None,
                },
            ];
            let inner = offset - half.x;
            if inner > 0.0 {
                faces.push(FaceDescriptor {
                    name: "inner_wall".into(),
                    normal: -DVec3::X,
                    kind: crate::topology::FaceKind::Cylindrical,
                    origin: Some(DVec3::ZERO),
                    radius: Some(inner),
                    axis: Some(DVec3::Y),
                    edge_break_size: None,
                    edge_break_mode: None,
                });
            }
            faces
        }
        ProfileShape::Freeform => vec![FaceDescriptor {
            name: "surface".into(),
            normal: DVec3::X,
            kind: crate::topology::FaceKind::Freeform,
            origin: None,
            radius: None,
            axis: None,
            edge_break_size: None,
            edge_break_mode: None,
        }],
    }
}

pub(crate) fn revolve_classify(profile: &Node2, p: DVec3, offset: f64) -> Option<String> {
    match profile.profile_shape() {
        ProfileShape::Circle { .. } => Some("surface".into()),
        ProfileShape::Rect { half } => {
            let radial = p.xz().length();
            let top_d = (p.y - half.y).abs();
            let bottom_d = (p.y + half.y).abs();
            let outer_d = (radial - (offset + half.x)).abs();
            let inner = offset - half.x;
            if inner > 0.0 {
                let inner_d = (radial - inner).abs();
                let dists = [top_d, bottom_d, outer_d, inner_d];
                let names = ["top", "bottom", "outer_wall", "inner_wall"];
                let mut best = 0;
                for i in 1..4 {
                    if dists[i] < dists[best] {
                        best = i;
                    }
                }
                Some(names[best].into())
            } else {
                let dists = [top_d, bottom_d, outer_d];
                let names = ["top", "bottom", "outer_wall"];
                let mut best = 0;
                for i in 1..3 {
                    if dists[i] < dists[best] {
                        best = i;
                    }
                }
                Some(names[best].into())
            }
        }
        ProfileShape::Freeform => Some("surface".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::node2::circle2d;
    use crate::sdf::primitives::torus;
    use approx::assert_abs_diff_eq;

    #[test]
    fn revolved_circle_matches_torus() {
        let rev = revolve(circle2d(10.0).unwrap(), 30.0).unwrap();
        let tor = torus(30.0, 10.0).unwrap();
        for p in [
            DVec3::new(30.0, 10.0, 0.0),
            DVec3::new(30.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(40.0, 0.0, 0.0),
        ] {
            assert_abs_diff_eq!(rev.evaluate(p), tor.evaluate(p), epsilon = 1e-9);
        }
    }
}
