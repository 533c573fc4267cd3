//! Named topology: stable face/edge identity attached to every SDF node.
//!
//! Every node in the expression graph answers `faces()`/`edges()` with a
//! small descriptive record rather than an index, so that a caller built on
//! top of the kernel (an LLM, a DSL) can say `"hole_1.barrel"` instead of
//! "the third cylindrical surface of the seventh boolean".

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The analytical shape of a named face. Curved kinds carry enough
/// parameters (`radius`, `axis`) to reconstruct the surface; `Freeform` is
/// the catch-all for edge-break faces and anything synthesised without a
/// clean analytical description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceKind {
    Planar,
    Cylindrical,
    Conical,
    Spherical,
    Toroidal,
    Freeform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Line,
    Arc,
    Curve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeBreakMode {
    Chamfer,
    Fillet,
}

/// A named, analytically-described face.
///
/// `normal` is representative, not exact, for curved kinds — the true
/// surface normal at a point on a cylindrical or toroidal face varies; this
/// is the normal at the face's canonical reference point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceDescriptor {
    pub name: String,
    pub normal: DVec3,
    pub kind: FaceKind,
    pub origin: Option<DVec3>,
    pub radius: Option<f64>,
    pub axis: Option<DVec3>,
    pub edge_break_size: Option<f64>,
    pub edge_break_mode: Option<EdgeBreakMode>,
}

impl FaceDescriptor {
    pub fn planar(name: impl Into<String>, normal: DVec3, origin: DVec3) -> Self {
        Self {
            name: name.into(),
            normal,
            kind: FaceKind::Planar,
            origin: Some(origin),
            radius: None,
            axis: None,
            edge_break_size: None,
            edge_break_mode: None,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.name = format!("{prefix}{}", self.name);
        self
    }

    pub fn with_inverted_normal(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// A named edge, referencing the two faces that meet there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub name: String,
    pub faces: (String, String),
    pub kind: EdgeKind,
    pub midpoint: Option<DVec3>,
}

impl EdgeDescriptor {
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.name = format!("{prefix}{}", self.name);
        self.faces = (
            format!("{prefix}{}", self.faces.0),
            format!("{prefix}{}", self.faces.1),
        );
        self
    }
}

/// Scan `names` for `^<prefix>_(\d+)` and return `max(N) + 1`, or `1` if
/// none match.
///
/// This is deliberately a pure scan over the current face set rather than a
/// process-global counter: two independent shapes built in the same process
/// must not influence each other's numbering.
pub fn next_auto_name(prefix: &str, names: impl Iterator<Item = impl AsRef<str>>) -> u32 {
    let pat = format!("{prefix}_");
    let mut max_seen: u32 = 0;
    for name in names {
        let name = name.as_ref();
        if let Some(rest) = name.strip_prefix(&pat) {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                if let Ok(n) = digits.parse::<u32>() {
                    max_seen = max_seen.max(n);
                }
            }
        }
    }
    max_seen + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_name_starts_at_one() {
        let names: Vec<String> = vec![];
        assert_eq!(next_auto_name("hole", names.iter()), 1);
    }

    #[test]
    fn auto_name_picks_max_plus_one() {
        let names = vec!["hole_1.barrel", "hole_3.cap", "other"];
        assert_eq!(next_auto_name("hole", names.iter()), 4);
    }

    #[test]
    fn auto_name_ignores_other_prefixes() {
        let names = vec!["subtract_5.barrel", "hole_2.cap"];
        assert_eq!(next_auto_name("hole", names.iter()), 3);
    }
}
