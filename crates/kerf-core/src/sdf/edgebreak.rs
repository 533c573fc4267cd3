//! Chamfer / fillet, localised at a named edge between two planar faces
//! topology propagation for the broken edge and its neighbours.

use glam::DVec3;

use crate::topology::{EdgeDescriptor, FaceDescriptor, FaceKind};

use super::node::{EdgeBreakSpec, Node};
use crate::topology::EdgeBreakMode;

fn cut_value(spec: &EdgeBreakSpec, d_a: f64, d_b: f64) -> f64 {
    match spec.mode {
        EdgeBreakMode::Chamfer => (d_a + d_b + spec.size) / std::f64::consts::SQRT_2,
        EdgeBreakMode::Fillet => {
            let ca = (-d_a).clamp(0.0, spec.size);
            let cb = (-d_b).clamp(0.0, spec.size);
            spec.size - (ca * ca + cb * cb).sqrt()
        }
    }
}

pub(crate) fn evaluate(c: &Node, p: DVec3, spec: &EdgeBreakSpec) -> f64 {
    let d_a = (p - spec.origin_a).dot(spec.normal_a);
    let d_b = (p - spec.origin_b).dot(spec.normal_b);
    c.evaluate(p).max(cut_value(spec, d_a, d_b))
}

pub(crate) fn faces(c: &Node, spec: &EdgeBreakSpec) -> Vec<FaceDescriptor> {
    let mut out = c.faces();
    out.push(FaceDescriptor {
        name: format!("{}.face", spec.feature_name),
        normal: (spec.normal_a + spec.normal_b).normalize_or_zero(),
        kind: FaceKind::Freeform,
        origin: None,
        radius: None,
        axis: None,
        edge_break_size: Some(spec.size),
        edge_break_mode: Some(spec.mode),
    });
    out
}

pub(crate) fn edges(c: &Node, spec: &EdgeBreakSpec) -> Vec<EdgeDescriptor> {
    c.edges()
        .into_iter()
        .filter(|e| e.name != spec.edge_name)
        .collect()
}

pub(crate) fn classify(c: &Node, p: DVec3, spec: &EdgeBreakSpec) -> Option<String> {
    let d_a = (p - spec.origin_a).dot(spec.normal_a);
    let d_b = (p - spec.origin_b).dot(spec.normal_b);
    let in_region = (-d_a) >= 0.0 && (-d_a) <= spec.size && (-d_b) >= 0.0 && (-d_b) <= spec.size;
    let cut = cut_value(spec, d_a, d_b);
    if in_region && cut >= c.evaluate(p) {
        Some(format!("{}.face", spec.feature_name))
    } else {
        c.classify_point(p)
    }
}
