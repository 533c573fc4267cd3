//! Translate / rotate / scale / mirror: point-inversion transforms and
//! their topology-propagation rules.

use glam::{DQuat, DVec3};

use crate::math::Aabb;
use crate::topology::{EdgeDescriptor, FaceDescriptor};

use super::node::{Axis, Node};

pub(crate) fn mirror_point(p: DVec3, axis: Axis) -> DVec3 {
    match axis {
        Axis::X => DVec3::new(-p.x, p.y, p.z),
        Axis::Y => DVec3::new(p.x, -p.y, p.z),
        Axis::Z => DVec3::new(p.x, p.y, -p.z),
    }
}

pub(crate) fn mirror_bounds(b: Aabb, axis: Axis) -> Aabb {
    Aabb::new(mirror_point(b.max, axis), mirror_point(b.min, axis))
}

pub(crate) fn translate_faces(c: &Node, offset: DVec3) -> Vec<FaceDescriptor> {
    c.faces()
        .into_iter()
        .map(|mut f| {
            f.origin = f.origin.map(|o| o + offset);
            f
        })
        .collect()
}

pub(crate) fn translate_edges(c: &Node, offset: DVec3) -> Vec<EdgeDescriptor> {
    c.edges()
        .into_iter()
        .map(|mut e| {
            e.midpoint = e.midpoint.map(|m| m + offset);
            e
        })
        .collect()
}

pub(crate) fn rotate_faces(c: &Node, forward: DQuat) -> Vec<FaceDescriptor> {
    c.faces()
        .into_iter()
        .map(|mut f| {
            f.normal = forward * f.normal;
            f.origin = f.origin.map(|o| forward * o);
            f.axis = f.axis.map(|a| forward * a);
            f
        })
        .collect()
}

pub(crate) fn rotate_edges(c: &Node, forward: DQuat) -> Vec<EdgeDescriptor> {
    c.edges()
        .into_iter()
        .map(|mut e| {
            e.midpoint = e.midpoint.map(|m| forward * m);
            e
        })
        .collect()
}

pub(crate) fn scale_faces(c: &Node, factor: f64) -> Vec<FaceDescriptor> {
    c.faces()
        .into_iter()
        .map(|mut f| {
            f.origin = f.origin.map(|o| o * factor);
            f.radius = f.radius.map(|r| r * factor);
            f
        })
        .collect()
}

pub(crate) fn scale_edges(c: &Node, factor: f64) -> Vec<EdgeDescriptor> {
    c.edges()
        .into_iter()
        .map(|mut e| {
            e.midpoint = e.midpoint.map(|m| m * factor);
            e
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_x_is_idempotent() {
        let p = DVec3::new(3.0, -1.0, 2.0);
        assert_eq!(mirror_point(mirror_point(p, Axis::X), Axis::X), p);
    }
}
