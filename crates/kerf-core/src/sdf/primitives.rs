//! Exact SDF primitives: the Inigo Quilez catalogue, ported to `f64`.
//!
//! Each primitive struct owns its distance formula, exact bounds, analytical
//! gradient where one is cheap, and its named-face/edge table. Constructors
//! at the bottom of the file validate eagerly and are the only way to build
//! one of these.

use glam::DVec3;

use crate::error::{Error, Result};
use crate::math::Aabb;
use crate::sdf::node::{Axis, Node};
use crate::topology::{EdgeDescriptor, EdgeKind, FaceDescriptor, FaceKind};

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub radius: f64,
}

impl Sphere {
    pub fn distance(&self, p: DVec3) -> f64 {
        p.length() - self.radius
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::cube(self.radius)
    }

    /// `normalize(p)` — exact, undefined only at the origin singularity.
    pub fn gradient(&self, p: DVec3) -> DVec3 {
        p.normalize_or_zero()
    }

    pub fn faces(&self) -> Vec<FaceDescriptor> {
        vec![FaceDescriptor {
            name: "surface".into(),
            normal: DVec3::Y,
            kind: FaceKind::Spherical,
            origin: Some(DVec3::ZERO),
            radius: Some(self.radius),
            axis: None,
            edge_break_size: None,
            edge_break_mode: None,
        }]
    }

    pub fn classify(&self, _p: DVec3) -> String {
        "surface".into()
    }

    pub fn name(&self) -> String {
        format!("sphere(r={})", self.radius)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Box3 {
    pub half: DVec3,
}

impl Box3 {
    pub fn distance(&self, p: DVec3) -> f64 {
        let q = p.abs() - self.half;
        q.max(DVec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(-self.half, self.half)
    }

    pub fn faces(&self) -> Vec<FaceDescriptor> {
        let h = self.half;
        vec![
            FaceDescriptor::planar("top", DVec3::Y, DVec3::new(0.0, h.y, 0.0)),
            FaceDescriptor::planar("bottom", -DVec3::Y, DVec3::new(0.0, -h.y, 0.0)),
            FaceDescriptor::planar("right", DVec3::X, DVec3::new(h.x, 0.0, 0.0)),
            FaceDescriptor::planar("left", -DVec3::X, DVec3::new(-h.x, 0.0, 0.0)),
            FaceDescriptor::planar("front", DVec3::Z, DVec3::new(0.0, 0.0, h.z)),
            FaceDescriptor::planar("back", -DVec3::Z, DVec3::new(0.0, 0.0, -h.z)),
        ]
    }

    pub fn edges(&self) -> Vec<EdgeDescriptor> {
        let h = self.half;
        let edge = |a: &str, b: &str, midpoint: DVec3| {
            let mut names = [a, b];
            names.sort_unstable();
            EdgeDescriptor {
                name: format!("{}.{}", names[0], names[1]),
                faces: (names[0].to_string(), names[1].to_string()),
                kind: EdgeKind::Line,
                midpoint: Some(midpoint),
            }
        };
        vec![
            edge("top", "right", DVec3::new(h.x, h.y, 0.0)),
            edge("top", "left", DVec3::new(-h.x, h.y, 0.0)),
            edge("top", "front", DVec3::new(0.0, h.y, h.z)),
            edge("top", "back", DVec3::new(0.0, h.y, -h.z)),
            edge("bottom", "right", DVec3::new(h.x, -h.y, 0.0)),
            edge("bottom", "left", DVec3::new(-h.x, -h.y, 0.0)),
            edge("bottom", "front", DVec3::new(0.0, -h.y, h.z)),
            edge("bottom", "back", DVec3::new(0.0, -h.y, -h.z)),
            edge("right", "front", DVec3::new(h.x, 0.0, h.z)),
            edge("right", "back", DVec3::new(h.x, 0.0, -h.z)),
            edge("left", "front", DVec3::new(-h.x, 0.0, h.z)),
            edge("left", "back", DVec3::new(-h.x, 0.0, -h.z)),
        ]
    }

    pub fn classify(&self, p: DVec3) -> String {
        let h = self.half;
        let dist = [
            (p.y - h.y).abs(),
            (p.y + h.y).abs(),
            (p.x - h.x).abs(),
            (p.x + h.x).abs(),
            (p.z - h.z).abs(),
            (p.z + h.z).abs(),
        ];
        let names = ["top", "bottom", "right", "left", "front", "back"];
        let mut best = 0;
        for i in 1..6 {
            if dist[i] < dist[best] {
                best = i;
            }
        }
        names[best].into()
    }

    pub fn name(&self) -> String {
        format!(
            "box3(w={}, h={}, d={})",
            self.half.x * 2.0,
            self.half.y * 2.0,
            self.half.z * 2.0
        )
    }
}

/// Axis Y, centred at the origin.
#[derive(Debug, Clone, Copy)]
pub struct Cylinder {
    pub radius: f64,
    pub half_height: f64,
}

impl Cylinder {
    pub fn distance(&self, p: DVec3) -> f64 {
        let d0 = p.xz().length() - self.radius;
        let d1 = p.y.abs() - self.half_height;
        d0.max(d1).min(0.0) + d0.max(0.0).hypot(d1.max(0.0))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            DVec3::new(-self.radius, -self.half_height, -self.radius),
            DVec3::new(self.radius, self.half_height, self.radius),
        )
    }

    pub fn faces(&self) -> Vec<FaceDescriptor> {
        vec![
            FaceDescriptor::planar("top_cap", DVec3::Y, DVec3::new(0.0, self.half_height, 0.0)),
            FaceDescriptor::planar(
                "bottom_cap",
                -DVec3::Y,
                DVec3::new(0.0, -self.half_height, 0.0),
            ),
            FaceDescriptor {
                name: "barrel".into(),
                normal: DVec3::X,
                kind: FaceKind::Cylindrical,
                origin: Some(DVec3::ZERO),
                radius: Some(self.radius),
                axis: Some(DVec3::Y),
                edge_break_size: None,
                edge_break_mode: None,
            },
        ]
    }

    pub fn edges(&self) -> Vec<EdgeDescriptor> {
        let edge = |a: &str, b: &str, y: f64| {
            let mut names = [a, b];
            names.sort_unstable();
            EdgeDescriptor {
                name: format!("{}.{}", names[0], names[1]),
                faces: (names[0].to_string(), names[1].to_string()),
                kind: EdgeKind::Arc,
                midpoint: Some(DVec3::new(self.radius, y, 0.0)),
            }
        };
        vec![
            edge("top_cap", "barrel", self.half_height),
            edge("bottom_cap", "barrel", -self.half_height),
        ]
    }

    pub fn classify(&self, p: DVec3) -> String {
        let cap_dist = (p.y.abs() - self.half_height).abs();
        let barrel_dist = (p.xz().length() - self.radius).abs();
        if cap_dist < barrel_dist {
            if p.y >= 0.0 { "top_cap" } else { "bottom_cap" }.into()
        } else {
            "barrel".into()
        }
    }

    pub fn name(&self) -> String {
        format!(
            "cylinder(r={}, h={})",
            self.radius,
            self.half_height * 2.0
        )
    }
}

/// Tip at the origin, opens toward +Y, base at `y = height`.
#[derive(Debug, Clone, Copy)]
pub struct Cone {
    pub radius: f64,
    pub height: f64,
}

impl Cone {
    fn slant_and_base(&self, p: DVec3) -> (f64, f64, bool) {
        let q = glam::DVec2::new(p.xz().length(), p.y);

        // Closest point on the slant edge (0,0) -> (r, h), clamped to the segment.
        let e = glam::DVec2::new(self.radius, self.height);
        let t = (q.dot(e) / e.dot(e)).clamp(0.0, 1.0);
        let slant_dist = (q - e * t).length();

        // Closest point on the base-cap segment (0,h) -> (r,h).
        let cap_x = q.x.min(self.radius);
        let base_dist = (q - glam::DVec2::new(cap_x, self.height)).length();

        let below_slant = q.x * self.height - q.y * self.radius < 0.0;
        let within_height = q.y >= 0.0 && q.y <= self.height;
        let inside = below_slant && within_height;

        (slant_dist, base_dist, inside)
    }

    pub fn distance(&self, p: DVec3) -> f64 {
        let (slant_dist, base_dist, inside) = self.slant_and_base(p);
        let d = slant_dist.min(base_dist);
        if inside { -d } else { d }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            DVec3::new(-self.radius, 0.0, -self.radius),
            DVec3::new(self.radius, self.height, self.radius),
        )
    }

    pub fn faces(&self) -> Vec<FaceDescriptor> {
        vec![
            FaceDescriptor::planar("base_cap", DVec3::Y, DVec3::new(0.0, self.height, 0.0)),
            FaceDescriptor {
                name: "surface".into(),
                normal: -DVec3::Y,
                kind: FaceKind::Conical,
                origin: Some(DVec3::ZERO),
                radius: Some(self.radius),
                axis: Some(DVec3::Y),
                edge_break_size: None,
                edge_break_mode: None,
            },
        ]
    }

    pub fn edges(&self) -> Vec<EdgeDescriptor> {
        vec![EdgeDescriptor {
            name: "base_cap.surface".into(),
            faces: ("base_cap".into(), "surface".into()),
            kind: EdgeKind::Arc,
            midpoint: Some(DVec3::new(self.radius, self.height, 0.0)),
        }]
    }

    pub fn classify(&self, p: DVec3) -> String {
        let (slant_dist, base_dist, _) = self.slant_and_base(p);
        if base_dist < slant_dist {
            "base_cap".into()
        } else {
            "surface".into()
        }
    }

    pub fn name(&self) -> String {
        format!("cone(r={}, h={})", self.radius, self.height)
    }
}

/// Major radius in the XZ plane, minor radius of the tube.
#[derive(Debug, Clone, Copy)]
pub struct Torus {
    pub major: f64,
    pub minor: f64,
}

impl Torus {
    pub fn distance(&self, p: DVec3) -> f64 {
        let q = glam::DVec2::new(p.xz().length() - self.major, p.y);
        q.length() - self.minor
    }

    pub fn bounds(&self) -> Aabb {
        let r = self.major + self.minor;
        Aabb::new(
            DVec3::new(-r, -self.minor, -r),
            DVec3::new(r, self.minor, r),
        )
    }

    pub fn faces(&self) -> Vec<FaceDescriptor> {
        vec![FaceDescriptor {
            name: "surface".into(),
            normal: DVec3::Y,
            kind: FaceKind::Toroidal,
            origin: Some(DVec3::ZERO),
            radius: Some(self.minor),
            axis: Some(DVec3::Y),
            edge_break_size: None,
            edge_break_mode: None,
        }]
    }

    pub fn classify(&self, _p: DVec3) -> String {
        "surface".into()
    }

    pub fn name(&self) -> String {
        format!("torus(R={}, r={})", self.major, self.minor)
    }
}

/// An infinite half-space; `normal` points into the exterior (positive) side.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: DVec3,
    pub offset: f64,
}

impl Plane {
    pub fn distance(&self, p: DVec3) -> f64 {
        p.dot(self.normal) - self.offset
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::cube(1.0e6)
    }

    pub fn gradient(&self, _p: DVec3) -> DVec3 {
        self.normal
    }

    pub fn faces(&self) -> Vec<FaceDescriptor> {
        vec![FaceDescriptor::planar(
            "surface",
            self.normal,
            self.normal * self.offset,
        )]
    }

    pub fn classify(&self, _p: DVec3) -> String {
        "surface".into()
    }

    pub fn name(&self) -> String {
        format!("plane(n={:?}, offset={})", self.normal, self.offset)
    }
}

pub fn sphere(radius: f64) -> Result<Node> {
    if radius <= 0.0 {
        return Err(Error::invalid_parameter("sphere", "radius", radius));
    }
    Ok(Node::leaf(super::node::Kind::Sphere(Sphere { radius })))
}

pub fn box3(width: f64, height: f64, depth: f64) -> Result<Node> {
    if width <= 0.0 {
        return Err(Error::invalid_parameter("box3", "width", width));
    }
    if height <= 0.0 {
        return Err(Error::invalid_parameter("box3", "height", height));
    }
    if depth <= 0.0 {
        return Err(Error::invalid_parameter("box3", "depth", depth));
    }
    Ok(Node::leaf(super::node::Kind::Box3(Box3 {
        half: DVec3::new(width * 0.5, height * 0.5, depth * 0.5),
    })))
}

pub fn cylinder(radius: f64, height: f64) -> Result<Node> {
    if radius <= 0.0 {
        return Err(Error::invalid_parameter("cylinder", "radius", radius));
    }
    if height <= 0.0 {
        return Err(Error::invalid_parameter("cylinder", "height", height));
    }
    Ok(Node::leaf(super::node::Kind::Cylinder(Cylinder {
        radius,
        half_height: height * 0.5,
    })))
}

pub fn cone(radius: f64, height: f64) -> Result<Node> {
    if radius <= 0.0 {
        return Err(Error::invalid_parameter("cone", "radius", radius));
    }
    if height <= 0.0 {
        return Err(Error::invalid_parameter("cone", "height", height));
    }
    Ok(Node::leaf(super::node::Kind::Cone(Cone { radius, height })))
}

pub fn torus(major: f64, minor: f64) -> Result<Node> {
    if major <= 0.0 {
        return Err(Error::invalid_parameter("torus", "major", major));
    }
    if minor <= 0.0 {
        return Err(Error::invalid_parameter("torus", "minor", minor));
    }
    Ok(Node::leaf(super::node::Kind::Torus(Torus { major, minor })))
}

pub fn plane(normal: DVec3, offset: f64) -> Result<Node> {
    if normal.length_squared() < 1.0e-18 {
        return Err(Error::invalid_parameter("plane", "normal", "zero-length"));
    }
    Ok(Node::leaf(super::node::Kind::Plane(Plane {
        normal: normal.normalize(),
        offset,
    })))
}

/// Axis used by `mirror`; kept here because primitives and transforms both
/// need the cardinal-axis concept.
pub fn unit(axis: Axis) -> DVec3 {
    match axis {
        Axis::X => DVec3::X,
        Axis::Y => DVec3::Y,
        Axis::Z => DVec3::Z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sphere_matches_analytical_distance() {
        let s = Sphere { radius: 2.0 };
        assert_abs_diff_eq!(s.distance(DVec3::new(5.0, 0.0, 0.0)), 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.distance(DVec3::ZERO), -2.0, epsilon = 1e-9);
    }

    #[test]
    fn box3_classifies_nearest_face() {
        let b = Box3 {
            half: DVec3::new(5.0, 3.0, 2.0),
        };
        assert_eq!(b.classify(DVec3::new(0.0, 2.9, 0.0)), "top");
        assert_eq!(b.classify(DVec3::new(4.9, 0.0, 0.0)), "right");
    }

    #[test]
    fn box3_has_six_faces_twelve_edges() {
        let b = Box3 {
            half: DVec3::splat(1.0),
        };
        assert_eq!(b.faces().len(), 6);
        assert_eq!(b.edges().len(), 12);
    }

    #[test]
    fn cylinder_has_three_faces_two_edges() {
        let c = Cylinder {
            radius: 2.0,
            half_height: 5.0,
        };
        assert_eq!(c.faces().len(), 3);
        assert_eq!(c.edges().len(), 2);
    }

    #[test]
    fn torus_matches_revolved_circle_formula() {
        let t = Torus {
            major: 30.0,
            minor: 10.0,
        };
        assert_abs_diff_eq!(
            t.distance(DVec3::new(30.0, 10.0, 0.0)),
            0.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(sphere(0.0).is_err());
        assert!(box3(1.0, -1.0, 1.0).is_err());
        assert!(plane(DVec3::ZERO, 0.0).is_err());
    }
}
