//! Boolean composition: union/subtract/intersect and their smooth variants,
//! plus the face/edge name-collision rule that governs union/intersect.

use glam::DVec3;

use crate::topology::{EdgeDescriptor, FaceDescriptor};

use super::node::Node;

/// Polynomial smooth-min (Quilez): falls through to `min` when `k <= 0`.
pub(crate) fn smooth_min(a: f64, b: f64, k: f64) -> f64 {
    if k <= 0.0 {
        return a.min(b);
    }
    let h = (k - (a - b).abs()).max(0.0) / k;
    a.min(b) - h * h * k * 0.25
}

/// Smooth-max is `-smooth_min(-a, -b, k)`.
pub(crate) fn smooth_max(a: f64, b: f64, k: f64) -> f64 {
    -smooth_min(-a, -b, k)
}

fn names_collide(a: &[FaceDescriptor], b: &[FaceDescriptor]) -> bool {
    a.iter().any(|fa| b.iter().any(|fb| fa.name == fb.name))
}

/// Returns the `a.`/`b.` prefixes to apply, or empty strings if the two
/// face sets don't collide.
fn union_prefixes(a: &Node, b: &Node) -> (String, String) {
    if names_collide(&a.faces(), &b.faces()) {
        ("a.".to_string(), "b.".to_string())
    } else {
        (String::new(), String::new())
    }
}

fn prefixed(face: FaceDescriptor, prefix: &str) -> FaceDescriptor {
    if prefix.is_empty() {
        face
    } else {
        face.with_prefix(prefix)
    }
}

fn prefixed_edge(edge: EdgeDescriptor, prefix: &str) -> EdgeDescriptor {
    if prefix.is_empty() {
        edge
    } else {
        edge.with_prefix(prefix)
    }
}

/// Shared by union/intersect and their smooth variants.
pub(crate) fn boolean_faces(a: &Node, b: &Node) -> Vec<FaceDescriptor> {
    let (pa, pb) = union_prefixes(a, b);
    let mut out: Vec<FaceDescriptor> = a
        .faces()
        .into_iter()
        .map(|f| prefixed(f, &pa))
        .collect();
    out.extend(b.faces().into_iter().map(|f| prefixed(f, &pb)));
    out
}

pub(crate) fn boolean_edges(a: &Node, b: &Node) -> Vec<EdgeDescriptor> {
    let (pa, pb) = union_prefixes(a, b);
    let mut out: Vec<EdgeDescriptor> = a
        .edges()
        .into_iter()
        .map(|e| prefixed_edge(e, &pa))
        .collect();
    out.extend(b.edges().into_iter().map(|e| prefixed_edge(e, &pb)));
    out
}

pub(crate) fn boolean_classify(a: &Node, b: &Node, p: DVec3) -> Option<String> {
    let (pa, pb) = union_prefixes(a, b);
    if a.evaluate(p).abs() <= b.evaluate(p).abs() {
        a.classify_point(p).map(|n| format!("{pa}{n}"))
    } else {
        b.classify_point(p).map(|n| format!("{pb}{n}"))
    }
}

pub(crate) fn subtract_faces(a: &Node, b: &Node, feature: &str) -> Vec<FaceDescriptor> {
    let prefix = format!("{feature}.");
    let mut out = a.faces();
    out.extend(
        b.faces()
            .into_iter()
            .map(|f| f.with_prefix(&prefix).with_inverted_normal()),
    );
    out
}

pub(crate) fn subtract_edges(a: &Node, b: &Node, feature: &str) -> Vec<EdgeDescriptor> {
    let prefix = format!("{feature}.");
    let mut out = a.edges();
    out.extend(b.edges().into_iter().map(|e| e.with_prefix(&prefix)));
    out
}

pub(crate) fn subtract_classify(a: &Node, b: &Node, feature: &str, p: DVec3) -> Option<String> {
    if b.evaluate(p).abs() < a.evaluate(p).abs() {
        b.classify_point(p).map(|n| format!("{feature}.{n}"))
    } else {
        a.classify_point(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn smooth_min_falls_through_for_nonpositive_k() {
        assert_abs_diff_eq!(smooth_min(2.0, 5.0, 0.0), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(smooth_min(2.0, 5.0, -1.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn smooth_min_is_at_most_hard_min() {
        assert!(smooth_min(2.0, 5.0, 1.0) <= 2.0);
    }

    #[test]
    fn smooth_max_is_negated_smooth_min() {
        assert_abs_diff_eq!(
            smooth_max(2.0, 5.0, 1.0),
            -smooth_min(-2.0, -5.0, 1.0),
            epsilon = 1e-12
        );
    }
}
