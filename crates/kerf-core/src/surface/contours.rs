//! Marching squares: traces ordered 2D contour loops out of a scalar field,
//! typically a fixed-axis cross-section of a 3D SDF.
//!
//! Rather than hand-coding Bourke's 16-case lookup table, each cell derives
//! its crossing segments directly from a CCW walk of its four corners: every
//! outside→inside edge crossing is an *entry*, every inside→outside crossing
//! is an *exit*, and consecutive (entry, exit) pairs around the walk are the
//! cell's directed segments. This handles the ordinary cases and the two
//! saddle cases (5 and 10, where the corners alternate in/out/in/out) with
//! the same code path — the saddle resolves to two non-ambiguous segment
//! pairs by construction, with no extra branching.

use std::collections::HashMap;

use glam::DVec2;

use crate::error::{Error, Result};
use crate::math::Aabb2;

/// An ordered polyline traced out of a scalar field; `closed` is true when
/// the traversal returned to its own starting point (the duplicate closing
/// vertex is dropped in that case).
#[derive(Debug, Clone)]
pub struct ContourLoop {
    pub points: Vec<DVec2>,
    pub closed: bool,
}

/// Hash an endpoint to six-decimal precision so that two segments computed
/// from the same grid edge (by adjacent cells, or within one cell) agree on
/// identity despite independent floating-point interpolation.
fn endpoint_key(p: DVec2) -> (i64, i64) {
    ((p.x * 1.0e6).round() as i64, (p.y * 1.0e6).round() as i64)
}

fn lerp2(a: DVec2, b: DVec2, va: f64, vb: f64) -> DVec2 {
    if (va - vb).abs() < 1.0e-12 {
        return a;
    }
    let t = ((-va) / (vb - va)).clamp(0.0, 1.0);
    a + (b - a) * t
}

/// The directed boundary segments a single cell contributes, derived from a
/// CCW walk of its four corners (`corners`/`values` both ordered
/// bottom-left, bottom-right, top-right, top-left).
fn cell_segments(corners: [DVec2; 4], values: [f64; 4]) -> Vec<(DVec2, DVec2)> {
    let inside = |v: f64| v < 0.0;

    let mut transitions: Vec<(bool, DVec2)> = Vec::new();
    for i in 0..4 {
        let j = (i + 1) % 4;
        let a_in = inside(values[i]);
        let b_in = inside(values[j]);
        if a_in != b_in {
            let point = lerp2(corners[i], corners[j], values[i], values[j]);
            transitions.push((!a_in && b_in, point));
        }
    }
    if transitions.is_empty() {
        return Vec::new();
    }

    // transitions around a closed walk always alternate entry/exit and
    // therefore come in an even count; rotate to start on an entry so
    // consecutive pairs are (entry, exit).
    let start = transitions
        .iter()
        .position(|(is_entry, _)| *is_entry)
        .expect("a nonempty transition list on a closed walk has at least one entry");
    let n = transitions.len();
    let mut segments = Vec::with_capacity(n / 2);
    let mut idx = start;
    for _ in 0..(n / 2) {
        let (_, entry_point) = transitions[idx];
        let (_, exit_point) = transitions[(idx + 1) % n];
        segments.push((entry_point, exit_point));
        idx = (idx + 2) % n;
    }
    segments
}

/// Trace the zero-level contours of `eval` over `rect`, sampled on a grid of
/// `cell_size`. Returns one [`ContourLoop`] per closed or open traversal of
/// point count ≥ 2; an always-inside or always-outside field yields an
/// empty list.
pub fn extract_contours(
    eval: impl Fn(DVec2) -> f64,
    rect: Aabb2,
    cell_size: f64,
) -> Result<Vec<ContourLoop>> {
    if cell_size <= 0.0 {
        return Err(Error::invalid_parameter(
            "extract_contours",
            "cell_size",
            cell_size,
        ));
    }

    let size = rect.size();
    let cols = (size.x / cell_size).ceil().max(1.0) as usize;
    let rows = (size.y / cell_size).ceil().max(1.0) as usize;

    let corner_pos = |ix: usize, iy: usize| {
        DVec2::new(
            rect.min.x + ix as f64 * cell_size,
            rect.min.y + iy as f64 * cell_size,
        )
    };

    let cnx = cols + 1;
    let cny = rows + 1;
    let mut values = vec![0.0; cnx * cny];
    for iy in 0..cny {
        for ix in 0..cnx {
            values[ix + iy * cnx] = eval(corner_pos(ix, iy));
        }
    }
    let value_at = |ix: usize, iy: usize| values[ix + iy * cnx];

    let mut segments: Vec<(DVec2, DVec2)> = Vec::new();
    for iy in 0..rows {
        for ix in 0..cols {
            let corners = [
                corner_pos(ix, iy),
                corner_pos(ix + 1, iy),
                corner_pos(ix + 1, iy + 1),
                corner_pos(ix, iy + 1),
            ];
            let vals = [
                value_at(ix, iy),
                value_at(ix + 1, iy),
                value_at(ix + 1, iy + 1),
                value_at(ix, iy + 1),
            ];
            segments.extend(cell_segments(corners, vals));
        }
    }

    tracing::debug!(cols, rows, segments = segments.len(), "extract_contours: traced segments");

    Ok(stitch_loops(segments))
}

/// Build an endpoint→segment adjacency map and walk each unused segment
/// forward until no extension matches.
fn stitch_loops(segments: Vec<(DVec2, DVec2)>) -> Vec<ContourLoop> {
    let mut starts: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, (start, _)) in segments.iter().enumerate() {
        starts.entry(endpoint_key(*start)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut loops = Vec::new();

    for i in 0..segments.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let (first, mut current_end) = segments[i];
        let mut points = vec![first, current_end];

        for _ in 0..=segments.len() {
            let key = endpoint_key(current_end);
            let next = starts
                .get(&key)
                .and_then(|candidates| candidates.iter().find(|&&j| !used[j]).copied());
            match next {
                Some(j) => {
                    used[j] = true;
                    current_end = segments[j].1;
                    points.push(current_end);
                }
                None => break,
            }
        }

        let closed = points.len() > 2 && endpoint_key(points[0]) == endpoint_key(*points.last().unwrap());
        if closed {
            points.pop();
        }
        if points.len() >= 2 {
            loops.push(ContourLoop { points, closed });
        }
    }

    loops
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn circle_field(r: f64) -> impl Fn(DVec2) -> f64 {
        move |p: DVec2| p.length() - r
    }

    #[test]
    fn circle_yields_one_closed_loop_near_true_radius() {
        let rect = Aabb2::new(DVec2::splat(-12.0), DVec2::splat(12.0));
        let cell_size = 0.5;
        let loops = extract_contours(circle_field(10.0), rect, cell_size).unwrap();
        assert_eq!(loops.len(), 1);
        let contour = &loops[0];
        assert!(contour.closed);
        for p in &contour.points {
            assert_abs_diff_eq!(p.length(), 10.0, epsilon = cell_size);
        }
    }

    #[test]
    fn rectangle_yields_one_closed_loop() {
        let rect_field = |p: DVec2| {
            let q = p.abs() - DVec2::new(5.0, 3.0);
            q.max(DVec2::ZERO).length() + q.x.max(q.y).min(0.0)
        };
        let rect = Aabb2::new(DVec2::splat(-8.0), DVec2::splat(8.0));
        let loops = extract_contours(rect_field, rect, 0.25).unwrap();
        assert_eq!(loops.len(), 1);
        assert!(loops[0].closed);
    }

    #[test]
    fn rectangle_with_central_hole_yields_at_least_two_loops() {
        let annulus = |p: DVec2| {
            let outer_q = p.abs() - DVec2::new(5.0, 5.0);
            let outer = outer_q.max(DVec2::ZERO).length() + outer_q.x.max(outer_q.y).min(0.0);
            let inner = p.length() - 1.5;
            outer.max(-inner)
        };
        let rect = Aabb2::new(DVec2::splat(-8.0), DVec2::splat(8.0));
        let loops = extract_contours(annulus, rect, 0.25).unwrap();
        assert!(loops.len() >= 2);
    }

    #[test]
    fn always_outside_field_yields_no_loops() {
        let always_outside = |_p: DVec2| 100.0;
        let rect = Aabb2::new(DVec2::splat(-8.0), DVec2::splat(8.0));
        let loops = extract_contours(always_outside, rect, 1.0).unwrap();
        assert!(loops.is_empty());
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        let rect = Aabb2::new(DVec2::splat(-1.0), DVec2::splat(1.0));
        assert!(extract_contours(circle_field(1.0), rect, 0.0).is_err());
    }
}
