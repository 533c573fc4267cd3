//! Shell / round / elongate. Round and elongate pass topology through
//! unchanged; shell doubles every face/edge.

use glam::DVec3;

use crate::topology::{EdgeDescriptor, FaceDescriptor};

use super::node::Node;

pub(crate) fn shell_faces(c: &Node) -> Vec<FaceDescriptor> {
    let mut out: Vec<FaceDescriptor> = c
        .faces()
        .into_iter()
        .map(|f| f.with_prefix("outer_"))
        .collect();
    out.extend(
        c.faces()
            .into_iter()
            .map(|f| f.with_prefix("inner_").with_inverted_normal()),
    );
    out
}

pub(crate) fn shell_edges(c: &Node) -> Vec<EdgeDescriptor> {
    let mut out: Vec<EdgeDescriptor> = c
        .edges()
        .into_iter()
        .map(|e| e.with_prefix("outer_"))
        .collect();
    out.extend(c.edges().into_iter().map(|e| e.with_prefix("inner_")));
    out
}

pub(crate) fn shell_classify(c: &Node, p: DVec3) -> Option<String> {
    let prefix = if c.evaluate(p) >= 0.0 {
        "outer_"
    } else {
        "inner_"
    };
    c.classify_point(p).map(|n| format!("{prefix}{n}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::box3;

    #[test]
    fn shell_doubles_face_count_with_prefixes() {
        let b = box3(10.0, 10.0, 10.0).unwrap();
        let shelled = b.shell(1.0).unwrap();
        let faces = shelled.faces();
        assert_eq!(faces.len(), 12);
        assert!(faces.iter().any(|f| f.name == "outer_top"));
        assert!(faces.iter().any(|f| f.name == "inner_top"));
    }
}
