//! The 3D SDF node: a closed tagged union dispatched on a discriminant,
//! rather than an open generic-struct composition behind a trait object.
//!
//! Monomorphized generic structs (`Union<A: Sdf, B: Sdf>`) behind an `Sdf`
//! trait object can't expose `faces()`/`edges()`/`classify_point()` cleanly:
//! every operation would need its own trait-object-safe topology method,
//! and downstream code couldn't match on "what kind of node is this" at
//! all. A fixed ~20-variant enum gives every node introspection for free
//! and is the traversal shape to choose for a set that never grows at
//! runtime.

use std::sync::Arc;

use glam::{DQuat, DVec3};

use crate::error::{Error, Result};
use crate::math::Aabb;
use crate::topology::{EdgeBreakMode, EdgeDescriptor, FaceDescriptor, FaceKind};

use super::node2::Node2;
use super::{bridge, edgebreak, modifiers, ops, primitives, transforms};

/// One of the three cardinal axes, used by `mirror` and axis-angle `rotate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub(crate) fn unit(self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }
}

#[derive(Debug)]
pub(crate) struct EdgeBreakSpec {
    pub mode: EdgeBreakMode,
    pub size: f64,
    pub feature_name: String,
    pub edge_name: String,
    pub normal_a: DVec3,
    pub normal_b: DVec3,
    pub origin_a: DVec3,
    pub origin_b: DVec3,
}

#[derive(Debug)]
pub(crate) enum Kind {
    Sphere(primitives::Sphere),
    Box3(primitives::Box3),
    Cylinder(primitives::Cylinder),
    Cone(primitives::Cone),
    Torus(primitives::Torus),
    Plane(primitives::Plane),

    Union(Node, Node),
    Subtract(Node, Node, String),
    Intersect(Node, Node),
    SmoothUnion(Node, Node, f64),
    SmoothSubtract(Node, Node, f64, String),
    SmoothIntersect(Node, Node, f64),

    Translate(Node, DVec3),
    Rotate(Node, DQuat, DQuat),
    Scale(Node, f64),
    Mirror(Node, Axis),

    Shell(Node, f64),
    Round(Node, f64),
    Elongate(Node, DVec3),

    EdgeBreak(Node, EdgeBreakSpec),

    Extrude(Node2, f64),
    Revolve(Node2, f64),
}

#[derive(Debug)]
struct NodeData {
    kind: Kind,
}

/// An immutable node in the SDF expression graph.
///
/// Cloning a `Node` clones a reference count, not the tree — fluent
/// chaining reuses subtrees freely, forming an acyclic DAG whose lifetime
/// is "longest holder" (see the crate's `readback`/`children` docs).
#[derive(Debug, Clone)]
pub struct Node(Arc<NodeData>);

/// LLM/UI-facing shape summary, the 3D analogue of [`super::node2::Readback2`].
#[derive(Debug, Clone)]
pub struct Readback {
    pub name: String,
    pub bounds: Aabb,
    pub size: DVec3,
    pub center: DVec3,
}

/// The motion mode a toolpath point belongs to — used only by
/// `contains`/`classify_point` callers that want `Option` semantics; see
/// `crate::cam` for the CAM-facing point type.
impl Node {
    pub(crate) fn leaf(kind: Kind) -> Node {
        Node(Arc::new(NodeData { kind }))
    }

    // ---- core queries -------------------------------------------------

    pub fn evaluate(&self, p: DVec3) -> f64 {
        match &self.0.kind {
            Kind::Sphere(s) => s.distance(p),
            Kind::Box3(b) => b.distance(p),
            Kind::Cylinder(c) => c.distance(p),
            Kind::Cone(c) => c.distance(p),
            Kind::Torus(t) => t.distance(p),
            Kind::Plane(pl) => pl.distance(p),

            Kind::Union(a, b) => a.evaluate(p).min(b.evaluate(p)),
            Kind::Subtract(a, b, _) => a.evaluate(p).max(-b.evaluate(p)),
            Kind::Intersect(a, b) => a.evaluate(p).max(b.evaluate(p)),
            Kind::SmoothUnion(a, b, k) => ops::smooth_min(a.evaluate(p), b.evaluate(p), *k),
            Kind::SmoothSubtract(a, b, k, _) => {
                ops::smooth_max(a.evaluate(p), -b.evaluate(p), *k)
            }
            Kind::SmoothIntersect(a, b, k) => ops::smooth_max(a.evaluate(p), b.evaluate(p), *k),

            Kind::Translate(c, offset) => c.evaluate(p - *offset),
            Kind::Rotate(c, _, inverse) => c.evaluate(*inverse * p),
            Kind::Scale(c, f) => c.evaluate(p / *f) * *f,
            Kind::Mirror(c, axis) => c.evaluate(transforms::mirror_point(p, *axis)),

            Kind::Shell(c, t) => c.evaluate(p).abs() - *t * 0.5,
            Kind::Round(c, r) => c.evaluate(p) - *r,
            Kind::Elongate(c, half) => {
                let q = p - p.clamp(-*half, *half);
                c.evaluate(q)
            }

            Kind::EdgeBreak(c, spec) => edgebreak::evaluate(c, p, spec),

            Kind::Extrude(profile, h) => bridge::extrude_evaluate(profile, p, *h),
            Kind::Revolve(profile, offset) => bridge::revolve_evaluate(profile, p, *offset),
        }
    }

    /// Default central-difference gradient; sphere and plane override with
    /// an analytical formula since both are free.
    pub fn gradient(&self, p: DVec3) -> DVec3 {
        match &self.0.kind {
            Kind::Sphere(s) => s.gradient(p),
            Kind::Plane(pl) => pl.gradient(p),
            _ => {
                const EPS: f64 = 1.0e-6;
                let dx = self.evaluate(p + DVec3::X * EPS) - self.evaluate(p - DVec3::X * EPS);
                let dy = self.evaluate(p + DVec3::Y * EPS) - self.evaluate(p - DVec3::Y * EPS);
                let dz = self.evaluate(p + DVec3::Z * EPS) - self.evaluate(p - DVec3::Z * EPS);
                DVec3::new(dx, dy, dz).normalize_or_zero()
            }
        }
    }

    pub fn normal(&self, p: DVec3) -> DVec3 {
        self.gradient(p)
    }

    pub fn bounds(&self) -> Aabb {
        match &self.0.kind {
            Kind::Sphere(s) => s.bounds(),
            Kind::Box3(b) => b.bounds(),
            Kind::Cylinder(c) => c.bounds(),
            Kind::Cone(c) => c.bounds(),
            Kind::Torus(t) => t.bounds(),
            Kind::Plane(pl) => pl.bounds(),

            Kind::Union(a, b) => a.bounds().union(&b.bounds()),
            Kind::SmoothUnion(a, b, k) => a.bounds().union(&b.bounds()).expand((*k * 0.5).max(0.0)),
            // Subtract conservatively keeps the left operand's box.
            Kind::Subtract(a, _, _) | Kind::SmoothSubtract(a, _, _, _) => a.bounds(),
            Kind::Intersect(a, b) => intersect_bounds(&a.bounds(), &b.bounds()),
            Kind::SmoothIntersect(a, b, k) => {
                intersect_bounds(&a.bounds(), &b.bounds()).expand((*k * 0.5).max(0.0))
            }

            Kind::Translate(c, offset) => {
                let b = c.bounds();
                Aabb::new(b.min + *offset, b.max + *offset)
            }
            Kind::Rotate(c, forward, _) => Aabb::from_points(
                c.bounds().corners().into_iter().map(|corner| *forward * corner),
            ),
            Kind::Scale(c, f) => {
                let b = c.bounds();
                Aabb::new(b.min * *f, b.max * *f)
            }
            Kind::Mirror(c, axis) => transforms::mirror_bounds(c.bounds(), *axis),

            // round(r) underestimates as written; we compensate by
            // expanding, which keeps the "no solid point outside bounds"
            // invariant instead of merely documenting the gap.
            Kind::Shell(c, t) => c.bounds().expand((t.abs() * 0.5).max(0.0)),
            Kind::Round(c, r) => c.bounds().expand(r.max(0.0)),
            Kind::Elongate(c, half) => {
                let b = c.bounds();
                Aabb::new(b.min - *half, b.max + *half)
            }

            Kind::EdgeBreak(c, _) => c.bounds(),

            Kind::Extrude(profile, h) => {
                let pb = profile.bounds();
                Aabb::new(
                    DVec3::new(pb.min.x, -*h * 0.5, pb.min.y),
                    DVec3::new(pb.max.x, *h * 0.5, pb.max.y),
                )
            }
            Kind::Revolve(profile, offset) => {
                let pb = profile.bounds();
                let outer = (*offset + pb.max.x.max(pb.max.y.abs())).max(0.0);
                Aabb::new(
                    DVec3::new(-outer, pb.min.y, -outer),
                    DVec3::new(outer, pb.max.y, outer),
                )
            }
        }
    }

    pub fn contains(&self, p: DVec3) -> bool {
        self.evaluate(p) <= 0.0
    }

    pub fn children(&self) -> Vec<Node> {
        match &self.0.kind {
            Kind::Sphere(_)
            | Kind::Box3(_)
            | Kind::Cylinder(_)
            | Kind::Cone(_)
            | Kind::Torus(_)
            | Kind::Plane(_)
            | Kind::Extrude(_, _)
            | Kind::Revolve(_, _) => vec![],

            Kind::Union(a, b)
            | Kind::Intersect(a, b)
            | Kind::SmoothUnion(a, b, _)
            | Kind::SmoothIntersect(a, b, _) => vec![a.clone(), b.clone()],
            Kind::Subtract(a, b, _) | Kind::SmoothSubtract(a, b, _, _) => {
                vec![a.clone(), b.clone()]
            }

            Kind::Translate(c, _)
            | Kind::Rotate(c, _, _)
            | Kind::Scale(c, _)
            | Kind::Mirror(c, _)
            | Kind::Shell(c, _)
            | Kind::Round(c, _)
            | Kind::Elongate(c, _)
            | Kind::EdgeBreak(c, _) => vec![c.clone()],
        }
    }

    pub fn name(&self) -> String {
        match &self.0.kind {
            Kind::Sphere(s) => s.name(),
            Kind::Box3(b) => b.name(),
            Kind::Cylinder(c) => c.name(),
            Kind::Cone(c) => c.name(),
            Kind::Torus(t) => t.name(),
            Kind::Plane(pl) => pl.name(),
            Kind::Union(a, b) => format!("union({}, {})", a.name(), b.name()),
            Kind::Subtract(a, b, f) => format!("subtract({}, {}, \"{f}\")", a.name(), b.name()),
            Kind::Intersect(a, b) => format!("intersect({}, {})", a.name(), b.name()),
            Kind::SmoothUnion(a, b, k) => {
                format!("smooth_union({}, {}, k={k})", a.name(), b.name())
            }
            Kind::SmoothSubtract(a, b, k, f) => {
                format!("smooth_subtract({}, {}, k={k}, \"{f}\")", a.name(), b.name())
            }
            Kind::SmoothIntersect(a, b, k) => {
                format!("smooth_intersect({}, {}, k={k})", a.name(), b.name())
            }
            Kind::Translate(c, o) => format!("{}.translate({}, {}, {})", c.name(), o.x, o.y, o.z),
            Kind::Rotate(c, ..) => format!("{}.rotate(...)", c.name()),
            Kind::Scale(c, f) => format!("{}.scale({f})", c.name()),
            Kind::Mirror(c, axis) => format!("{}.mirror({axis:?})", c.name()),
            Kind::Shell(c, t) => format!("{}.shell({t})", c.name()),
            Kind::Round(c, r) => format!("{}.round({r})", c.name()),
            Kind::Elongate(c, h) => {
                format!("{}.elongate({}, {}, {})", c.name(), h.x * 2.0, h.y * 2.0, h.z * 2.0)
            }
            Kind::EdgeBreak(c, spec) => {
                format!("{}.{:?}(\"{}\", {})", c.name(), spec.mode, spec.edge_name, spec.size)
            }
            Kind::Extrude(p, h) => format!("extrude({}, h={h})", p.name()),
            Kind::Revolve(p, offset) => format!("revolve({}, offset={offset})", p.name()),
        }
    }

    pub fn describe(&self) -> String {
        self.name()
    }

    pub fn readback(&self) -> Readback {
        let bounds = self.bounds();
        Readback {
            name: self.name(),
            bounds,
            size: bounds.size(),
            center: bounds.center(),
        }
    }

    // ---- named topology -------------------------------------------------

    pub fn faces(&self) -> Vec<FaceDescriptor> {
        match &self.0.kind {
            Kind::Sphere(s) => s.faces(),
            Kind::Box3(b) => b.faces(),
            Kind::Cylinder(c) => c.faces(),
            Kind::Cone(c) => c.faces(),
            Kind::Torus(t) => t.faces(),
            Kind::Plane(pl) => pl.faces(),

            Kind::Union(a, b) | Kind::SmoothUnion(a, b, _) | Kind::Intersect(a, b)
            | Kind::SmoothIntersect(a, b, _) => ops::boolean_faces(a, b),

            Kind::Subtract(a, b, feature) | Kind::SmoothSubtract(a, b, _, feature) => {
                ops::subtract_faces(a, b, feature)
            }

            Kind::Translate(c, offset) => transforms::translate_faces(c, *offset),
            Kind::Rotate(c, forward, _) => transforms::rotate_faces(c, *forward),
            Kind::Scale(c, f) => transforms::scale_faces(c, *f),
            Kind::Mirror(c, _) => c.faces(),

            Kind::Shell(c, _) => modifiers::shell_faces(c),
            Kind::Round(c, _) | Kind::Elongate(c, _) => c.faces(),

            Kind::EdgeBreak(c, spec) => edgebreak::faces(c, spec),

            Kind::Extrude(profile, h) => bridge::extrude_faces(profile, *h),
            Kind::Revolve(profile, offset) => bridge::revolve_faces(profile, *offset),
        }
    }

    pub fn edges(&self) -> Vec<EdgeDescriptor> {
        match &self.0.kind {
            Kind::Sphere(_) | Kind::Torus(_) | Kind::Plane(_) => vec![],
            Kind::Box3(b) => b.edges(),
            Kind::Cylinder(c) => c.edges(),
            Kind::Cone(c) => c.edges(),

            Kind::Union(a, b) | Kind::SmoothUnion(a, b, _) | Kind::Intersect(a, b)
            | Kind::SmoothIntersect(a, b, _) => ops::boolean_edges(a, b),

            Kind::Subtract(a, b, feature) | Kind::SmoothSubtract(a, b, _, feature) => {
                ops::subtract_edges(a, b, feature)
            }

            Kind::Translate(c, offset) => transforms::translate_edges(c, *offset),
            Kind::Rotate(c, forward, _) => transforms::rotate_edges(c, *forward),
            Kind::Scale(c, f) => transforms::scale_edges(c, *f),
            Kind::Mirror(c, _) => c.edges(),

            Kind::Shell(c, _) => modifiers::shell_edges(c),
            Kind::Round(c, _) | Kind::Elongate(c, _) => c.edges(),

            Kind::EdgeBreak(c, spec) => edgebreak::edges(c, spec),

            // Bridges synthesise faces only; their edge wiring is left
            // undefined rather than fabricated.
            Kind::Extrude(_, _) | Kind::Revolve(_, _) => vec![],
        }
    }

    pub fn face(&self, name: &str) -> Result<FaceDescriptor> {
        let faces = self.faces();
        faces
            .iter()
            .find(|f| f.name == name)
            .cloned()
            .ok_or_else(|| {
                Error::not_found(
                    "face",
                    "face",
                    name,
                    &faces.iter().map(|f| f.name.clone()).collect::<Vec<_>>(),
                )
            })
    }

    pub fn edge(&self, a: &str, b: &str) -> Result<EdgeDescriptor> {
        let edges = self.edges();
        let mut names = [a, b];
        names.sort_unstable();
        let wanted = format!("{}.{}", names[0], names[1]);
        edges
            .iter()
            .find(|e| e.name == wanted || (e.faces.0 == a && e.faces.1 == b) || (e.faces.0 == b && e.faces.1 == a))
            .cloned()
            .ok_or_else(|| {
                Error::not_found(
                    "edge",
                    "edge",
                    &wanted,
                    &edges.iter().map(|e| e.name.clone()).collect::<Vec<_>>(),
                )
            })
    }

    pub fn classify_point(&self, p: DVec3) -> Option<String> {
        match &self.0.kind {
            Kind::Sphere(s) => Some(s.classify(p)),
            Kind::Box3(b) => Some(b.classify(p)),
            Kind::Cylinder(c) => Some(c.classify(p)),
            Kind::Cone(c) => Some(c.classify(p)),
            Kind::Torus(t) => Some(t.classify(p)),
            Kind::Plane(pl) => Some(pl.classify(p)),

            Kind::Union(a, b) | Kind::SmoothUnion(a, b, _) | Kind::Intersect(a, b)
            | Kind::SmoothIntersect(a, b, _) => ops::boolean_classify(a, b, p),

            Kind::Subtract(a, b, feature) | Kind::SmoothSubtract(a, b, _, feature) => {
                ops::subtract_classify(a, b, feature, p)
            }

            Kind::Translate(c, offset) => c.classify_point(p - *offset),
            Kind::Rotate(c, _, inverse) => c.classify_point(*inverse * p),
            Kind::Mirror(c, axis) => c.classify_point(transforms::mirror_point(p, *axis)),
            Kind::Scale(c, f) => c.classify_point(p / *f),

            Kind::Shell(c, _) => modifiers::shell_classify(c, p),
            Kind::Round(c, _) | Kind::Elongate(c, _) => c.classify_point(p),

            Kind::EdgeBreak(c, spec) => edgebreak::classify(c, p, spec),

            Kind::Extrude(profile, h) => bridge::extrude_classify(profile, p, *h),
            Kind::Revolve(profile, offset) => bridge::revolve_classify(profile, p, *offset),
        }
    }

    // ---- booleans -------------------------------------------------------

    pub fn union(self, other: Node) -> Node {
        Node::leaf(Kind::Union(self, other))
    }

    pub fn subtract(self, other: Node, feature: Option<&str>) -> Node {
        let feature = feature
            .map(str::to_string)
            .unwrap_or_else(|| auto_feature_name(&self, "subtract"));
        Node::leaf(Kind::Subtract(self, other, feature))
    }

    pub fn intersect(self, other: Node) -> Node {
        Node::leaf(Kind::Intersect(self, other))
    }

    pub fn smooth_union(self, other: Node, k: f64) -> Node {
        Node::leaf(Kind::SmoothUnion(self, other, k))
    }

    pub fn smooth_subtract(self, other: Node, k: f64, feature: Option<&str>) -> Node {
        let feature = feature
            .map(str::to_string)
            .unwrap_or_else(|| auto_feature_name(&self, "smooth_subtract"));
        Node::leaf(Kind::SmoothSubtract(self, other, k, feature))
    }

    pub fn smooth_intersect(self, other: Node, k: f64) -> Node {
        Node::leaf(Kind::SmoothIntersect(self, other, k))
    }

    // ---- transforms -----------------------------------------------------

    pub fn translate(self, x: f64, y: f64, z: f64) -> Node {
        Node::leaf(Kind::Translate(self, DVec3::new(x, y, z)))
    }

    pub fn at(self, x: f64, y: f64, z: f64) -> Node {
        self.translate(x, y, z)
    }

    pub fn rotate(self, axis: DVec3, degrees: f64) -> Result<Node> {
        if axis.length_squared() < 1.0e-18 {
            return Err(Error::invalid_parameter("rotate", "axis", "zero-length"));
        }
        let forward = DQuat::from_axis_angle(axis.normalize(), degrees.to_radians());
        Ok(Node::leaf(Kind::Rotate(self, forward, forward.inverse())))
    }

    pub fn rotate_x(self, degrees: f64) -> Node {
        let forward = DQuat::from_rotation_x(degrees.to_radians());
        Node::leaf(Kind::Rotate(self, forward, forward.inverse()))
    }

    pub fn rotate_y(self, degrees: f64) -> Node {
        let forward = DQuat::from_rotation_y(degrees.to_radians());
        Node::leaf(Kind::Rotate(self, forward, forward.inverse()))
    }

    pub fn rotate_z(self, degrees: f64) -> Node {
        let forward = DQuat::from_rotation_z(degrees.to_radians());
        Node::leaf(Kind::Rotate(self, forward, forward.inverse()))
    }

    pub fn scale(self, factor: f64) -> Result<Node> {
        if factor <= 0.0 {
            return Err(Error::invalid_parameter("scale", "factor", factor));
        }
        Ok(Node::leaf(Kind::Scale(self, factor)))
    }

    pub fn mirror(self, axis: Axis) -> Node {
        Node::leaf(Kind::Mirror(self, axis))
    }

    // ---- modifiers --------------------------------------------------------

    pub fn shell(self, thickness: f64) -> Result<Node> {
        if thickness <= 0.0 {
            return Err(Error::invalid_parameter("shell", "thickness", thickness));
        }
        Ok(Node::leaf(Kind::Shell(self, thickness)))
    }

    pub fn round(self, radius: f64) -> Result<Node> {
        if radius <= 0.0 {
            return Err(Error::invalid_parameter("round", "radius", radius));
        }
        Ok(Node::leaf(Kind::Round(self, radius)))
    }

    pub fn elongate(self, x: f64, y: f64, z: f64) -> Result<Node> {
        if x < 0.0 || y < 0.0 || z < 0.0 {
            return Err(Error::invalid_parameter(
                "elongate",
                "x,y,z",
                format!("({x}, {y}, {z})"),
            ));
        }
        Ok(Node::leaf(Kind::Elongate(
            self,
            DVec3::new(x, y, z) * 0.5,
        )))
    }

    // ---- edge-break (chamfer / fillet) ------------------------------------

    pub fn chamfer(self, edge_name: &str, size: f64, feature: Option<&str>) -> Result<Node> {
        self.edge_break(EdgeBreakMode::Chamfer, edge_name, size, feature, "chamfer")
    }

    pub fn fillet(self, edge_name: &str, size: f64, feature: Option<&str>) -> Result<Node> {
        self.edge_break(EdgeBreakMode::Fillet, edge_name, size, feature, "fillet")
    }

    fn edge_break(
        self,
        mode: EdgeBreakMode,
        edge_name: &str,
        size: f64,
        feature: Option<&str>,
        op: &str,
    ) -> Result<Node> {
        if size <= 0.0 {
            return Err(Error::invalid_parameter(op, "size", size));
        }
        let edge = self.edge_by_name(edge_name)?;
        let face_a = self.face(&edge.faces.0)?;
        let face_b = self.face(&edge.faces.1)?;
        for face in [&face_a, &face_b] {
            if face.kind != FaceKind::Planar {
                return Err(Error::topology_mismatch(
                    op,
                    format!(
                        "face `{}` is not planar (edge-break requires two planar faces)",
                        face.name
                    ),
                ));
            }
            if !is_axis_aligned(face.normal) {
                return Err(Error::topology_mismatch(
                    op,
                    format!("face `{}` normal is not axis-aligned", face.name),
                ));
            }
        }
        let feature = feature
            .map(str::to_string)
            .unwrap_or_else(|| auto_feature_name(&self, op));
        let spec = EdgeBreakSpec {
            mode,
            size,
            feature_name: feature,
            edge_name: edge.name.clone(),
            normal_a: face_a.normal,
            normal_b: face_b.normal,
            origin_a: face_a.origin.unwrap_or(DVec3::ZERO),
            origin_b: face_b.origin.unwrap_or(DVec3::ZERO),
        };
        Ok(Node::leaf(Kind::EdgeBreak(self, spec)))
    }

    fn edge_by_name(&self, name: &str) -> Result<EdgeDescriptor> {
        let edges = self.edges();
        edges
            .iter()
            .find(|e| e.name == name)
            .cloned()
            .ok_or_else(|| {
                Error::not_found(
                    "edge-break",
                    "edge",
                    name,
                    &edges.iter().map(|e| e.name.clone()).collect::<Vec<_>>(),
                )
            })
    }

    // ---- 2D -> 3D bridges ---------------------------------------------

    pub fn find_surface(
        &self,
        origin: DVec3,
        direction: DVec3,
        t_min: f64,
        t_max: f64,
        tolerance: Option<f64>,
        max_iter: Option<usize>,
    ) -> Result<Option<f64>> {
        if direction.length_squared() < 1.0e-18 {
            return Err(Error::invalid_parameter(
                "find_surface",
                "direction",
                "zero-length",
            ));
        }
        let direction = direction.normalize();
        Ok(super::root_finder::find_surface(
            |t| self.evaluate(origin + direction * t),
            t_min,
            t_max,
            tolerance.unwrap_or(1.0e-6),
            max_iter.unwrap_or(128),
        ))
    }

    /// Scans downward along the spindle axis (SDF Y in this kernel's
    /// convention) from `top` toward `bottom` and returns the Y coordinate
    /// of first contact, or `None` if the ray never crosses the surface.
    pub fn drop_cutter(
        &self,
        x: f64,
        z: f64,
        top: f64,
        bottom: f64,
        tolerance: Option<f64>,
    ) -> Result<Option<f64>> {
        let origin = DVec3::new(x, top, z);
        let span = top - bottom;
        let hit = self.find_surface(origin, -DVec3::Y, 0.0, span, tolerance, None)?;
        Ok(hit.map(|t| top - t))
    }
}

fn intersect_bounds(a: &Aabb, b: &Aabb) -> Aabb {
    Aabb::new(a.min.max(b.min), a.max.min(b.max))
}

fn is_axis_aligned(normal: DVec3) -> bool {
    const EPS: f64 = 1.0e-6;
    let n = normal.normalize_or_zero().abs();
    (n.x > 1.0 - EPS) || (n.y > 1.0 - EPS) || (n.z > 1.0 - EPS)
}

/// Per-subtree auto-naming: scan the current face set, never a process
/// counter — two independent shapes must not influence each other's
/// numbering.
pub(crate) fn auto_feature_name(shape: &Node, prefix: &str) -> String {
    let faces = shape.faces();
    let n = crate::topology::next_auto_name(prefix, faces.iter().map(|f| f.name.as_str()));
    format!("{prefix}_{n}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::{box3, cylinder, sphere};
    use approx::assert_abs_diff_eq;

    #[test]
    fn union_matches_min_pointwise() {
        let a = sphere(3.0).unwrap();
        let b = sphere(2.0).unwrap().translate(5.0, 0.0, 0.0);
        let u = a.clone().union(b.clone());
        for p in [DVec3::new(1.0, 0.0, 0.0), DVec3::new(5.0, 0.0, 0.0), DVec3::new(20.0, 0.0, 0.0)] {
            assert_abs_diff_eq!(u.evaluate(p), a.evaluate(p).min(b.evaluate(p)), epsilon = 1e-12);
            assert_eq!(u.contains(p), u.evaluate(p) <= 0.0);
        }
    }

    #[test]
    fn subtract_matches_max_with_negation_pointwise() {
        let a = box3(10.0, 10.0, 10.0).unwrap();
        let b = sphere(3.0).unwrap();
        let s = a.clone().subtract(b.clone(), None);
        for p in [DVec3::ZERO, DVec3::new(4.0, 4.0, 4.0), DVec3::new(1.0, 0.0, 0.0)] {
            assert_abs_diff_eq!(s.evaluate(p), a.evaluate(p).max(-b.evaluate(p)), epsilon = 1e-12);
        }
    }

    #[test]
    fn intersect_matches_max_pointwise() {
        let a = sphere(5.0).unwrap();
        let b = box3(6.0, 6.0, 6.0).unwrap();
        let i = a.clone().intersect(b.clone());
        for p in [DVec3::ZERO, DVec3::new(2.5, 0.0, 0.0), DVec3::new(4.0, 4.0, 4.0)] {
            assert_abs_diff_eq!(i.evaluate(p), a.evaluate(p).max(b.evaluate(p)), epsilon = 1e-12);
        }
    }

    #[test]
    fn translate_matches_shifted_evaluate() {
        let child = sphere(2.0).unwrap();
        let moved = child.clone().translate(5.0, 1.0, -2.0);
        let p = DVec3::new(6.0, 1.0, -2.0);
        assert_abs_diff_eq!(
            moved.evaluate(p),
            child.evaluate(p - DVec3::new(5.0, 1.0, -2.0)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn scale_matches_f_times_child_at_p_over_f() {
        let child = sphere(2.0).unwrap();
        let scaled = child.clone().scale(3.0).unwrap();
        let p = DVec3::new(10.0, 0.0, 0.0);
        assert_abs_diff_eq!(scaled.evaluate(p), 3.0 * child.evaluate(p / 3.0), epsilon = 1e-9);
    }

    #[test]
    fn rotate_composed_with_inverse_is_identity() {
        let child = box3(4.0, 2.0, 6.0).unwrap();
        let rotated = child.clone().rotate_y(37.0).rotate_y(-37.0);
        for p in [DVec3::new(1.0, 1.0, 1.0), DVec3::new(3.0, -0.5, 2.0)] {
            assert_abs_diff_eq!(rotated.evaluate(p), child.evaluate(p), epsilon = 1e-4);
        }
    }

    #[test]
    fn mirror_is_idempotent_on_mirrored_axis() {
        let child = box3(4.0, 2.0, 6.0).unwrap();
        let once = child.clone().mirror(Axis::X);
        let twice = once.clone().mirror(Axis::X);
        for p in [DVec3::new(1.0, 0.5, -1.0), DVec3::new(-3.0, 1.0, 2.0)] {
            assert_abs_diff_eq!(twice.evaluate(p), child.evaluate(p), epsilon = 1e-12);
        }
    }

    #[test]
    fn subtract_feature_prefixes_cutter_topology_and_keeps_left_faces() {
        let base = box3(10.0, 10.0, 10.0).unwrap();
        let cyl = cylinder(2.0, 20.0).unwrap().rotate_x(90.0);
        let drilled = base.subtract(cyl, Some("h"));

        let faces = drilled.faces();
        assert!(faces.iter().any(|f| f.name == "top"));
        assert!(faces.iter().any(|f| f.name == "bottom"));
        assert!(faces.iter().any(|f| f.name == "h.barrel"));
        assert!(faces.iter().any(|f| f.name == "h.top_cap"));
        assert!(faces.iter().any(|f| f.name == "h.bottom_cap"));

        let barrel = faces.iter().find(|f| f.name == "h.barrel").unwrap();
        assert_abs_diff_eq!(barrel.normal.x, -1.0, epsilon = 1e-9);

        let edges = drilled.edges();
        let face_names: std::collections::HashSet<&str> =
            faces.iter().map(|f| f.name.as_str()).collect();
        for edge in &edges {
            assert!(face_names.contains(edge.faces.0.as_str()));
            assert!(face_names.contains(edge.faces.1.as_str()));
        }
    }

    #[test]
    fn subtract_without_explicit_name_autogenerates_subtract_prefix() {
        let shape = box3(10.0, 10.0, 10.0).unwrap().subtract(sphere(3.0).unwrap(), None);
        assert!(shape.faces().iter().any(|f| f.name.starts_with("subtract_")));
    }

    #[test]
    fn shell_doubles_face_and_edge_counts() {
        let b = box3(10.0, 10.0, 10.0).unwrap();
        let shelled = b.clone().shell(1.0).unwrap();
        assert_eq!(shelled.faces().len(), b.faces().len() * 2);
        assert_eq!(shelled.edges().len(), b.edges().len() * 2);
    }

    #[test]
    fn find_surface_returns_distance_to_known_crossing() {
        let s = sphere(5.0).unwrap();
        let origin = DVec3::new(-20.0, 0.0, 0.0);
        let hit = s
            .find_surface(origin, DVec3::X, 0.0, 40.0, Some(1e-6), None)
            .unwrap();
        assert!(hit.is_some());
        assert_abs_diff_eq!(hit.unwrap(), 15.0, epsilon = 1e-4);
    }

    #[test]
    fn find_surface_misses_return_none() {
        let s = sphere(5.0).unwrap().translate(100.0, 0.0, 0.0);
        let hit = s
            .find_surface(DVec3::ZERO, DVec3::Y, 0.0, 10.0, Some(1e-6), None)
            .unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn find_surface_rejects_zero_direction() {
        let s = sphere(5.0).unwrap();
        assert!(s.find_surface(DVec3::ZERO, DVec3::ZERO, 0.0, 10.0, None, None).is_err());
    }

    #[test]
    fn drop_cutter_on_rounded_flat_box_hits_top_plus_radius() {
        let flat = box3(100.0, 60.0, 30.0).unwrap();
        let radius = 5.0;
        let rounded = flat.clone().round(radius).unwrap();
        let top = flat.bounds().max.y;
        let hit = rounded.drop_cutter(0.0, 0.0, 100.0, -100.0, None).unwrap();
        assert!(hit.is_some());
        assert_abs_diff_eq!(hit.unwrap(), top + radius, epsilon = 1e-3);
    }

    #[test]
    fn auto_naming_picks_up_after_a_manual_gap() {
        let shape = box3(40.0, 40.0, 40.0).unwrap();
        let shape = shape.subtract(sphere(2.0).unwrap().translate(10.0, 0.0, 0.0), Some("hole_3"));
        let shape = shape.subtract(sphere(2.0).unwrap().translate(-10.0, 0.0, 0.0), None);
        assert!(shape.faces().iter().any(|f| f.name.starts_with("subtract_1.")));
    }

    #[test]
    fn rejects_shell_and_round_with_non_positive_parameter() {
        let b = box3(5.0, 5.0, 5.0).unwrap();
        assert!(b.clone().shell(0.0).is_err());
        assert!(b.round(-1.0).is_err());
    }
}
