//! The 2D SDF node used as the cross-section input to extrude/revolve.

use std::sync::Arc;

use glam::DVec2;

use crate::error::{Error, Result};
use crate::math::Aabb2;

#[derive(Debug, Clone)]
enum Kind2 {
    Circle { radius: f64 },
    Rect { half: DVec2 },
    Polygon { vertices: Vec<DVec2>, bounds: Aabb2 },
}

#[derive(Debug)]
struct Node2Data {
    kind: Kind2,
}

/// An immutable 2D shape: closed polygon, circle, or rectangle.
///
/// Cheap to clone — it is a reference-counted handle, exactly like [`crate::sdf::Node`].
#[derive(Debug, Clone)]
pub struct Node2(Arc<Node2Data>);

/// A 2D readback, the `Node2` analogue of [`crate::sdf::Readback`].
#[derive(Debug, Clone)]
pub struct Readback2 {
    pub name: String,
    pub bounds: Aabb2,
    pub size: DVec2,
    pub center: DVec2,
}

impl Node2 {
    fn new(kind: Kind2) -> Self {
        Self(Arc::new(Node2Data { kind }))
    }

    pub fn evaluate(&self, p: DVec2) -> f64 {
        match &self.0.kind {
            Kind2::Circle { radius } => p.length() - radius,
            Kind2::Rect { half } => {
                let q = p.abs() - *half;
                q.max(DVec2::ZERO).length() + q.x.max(q.y).min(0.0)
            }
            Kind2::Polygon { vertices, .. } => polygon_distance(vertices, p),
        }
    }

    pub fn bounds(&self) -> Aabb2 {
        match &self.0.kind {
            Kind2::Circle { radius } => Aabb2::new(DVec2::splat(-radius), DVec2::splat(*radius)),
            Kind2::Rect { half } => Aabb2::new(-*half, *half),
            Kind2::Polygon { bounds, .. } => *bounds,
        }
    }

    pub fn name(&self) -> String {
        match &self.0.kind {
            Kind2::Circle { radius } => format!("circle2d(r={radius})"),
            Kind2::Rect { half } => format!("rect2d(w={}, h={})", half.x * 2.0, half.y * 2.0),
            Kind2::Polygon { vertices, .. } => format!("polygon({} verts)", vertices.len()),
        }
    }

    /// Distinguishes the `Circle` profile from `Rect`/`Polygon` for the
    /// extrude/revolve topology-synthesis rules, which generate a different
    /// wall shape per profile kind.
    pub(crate) fn profile_shape(&self) -> ProfileShape {
        match &self.0.kind {
            Kind2::Circle { radius } => ProfileShape::Circle { radius: *radius },
            Kind2::Rect { half } => ProfileShape::Rect { half: *half },
            Kind2::Polygon { .. } => ProfileShape::Freeform,
        }
    }

    pub fn readback(&self) -> Readback2 {
        let bounds = self.bounds();
        Readback2 {
            name: self.name(),
            bounds,
            size: bounds.size(),
            center: bounds.center(),
        }
    }
}

pub(crate) enum ProfileShape {
    Circle { radius: f64 },
    Rect { half: DVec2 },
    Freeform,
}

pub fn circle2d(radius: f64) -> Result<Node2> {
    if radius <= 0.0 {
        return Err(Error::invalid_parameter("circle2d", "radius", radius));
    }
    Ok(Node2::new(Kind2::Circle { radius }))
}

pub fn rect2d(width: f64, height: f64) -> Result<Node2> {
    if width <= 0.0 {
        return Err(Error::invalid_parameter("rect2d", "width", width));
    }
    if height <= 0.0 {
        return Err(Error::invalid_parameter("rect2d", "height", height));
    }
    Ok(Node2::new(Kind2::Rect {
        half: DVec2::new(width * 0.5, height * 0.5),
    }))
}

pub fn polygon(vertices: Vec<DVec2>) -> Result<Node2> {
    if vertices.len() < 3 {
        return Err(Error::invalid_parameter(
            "polygon",
            "vertices.len()",
            vertices.len(),
        ));
    }
    let bounds = Aabb2::from_points(vertices.iter().copied());
    Ok(Node2::new(Kind2::Polygon { vertices, bounds }))
}

/// Exact signed distance to a closed polygon: minimum edge distance, signed
/// by the crossing-number winding test.
fn polygon_distance(vertices: &[DVec2], p: DVec2) -> f64 {
    let n = vertices.len();
    let mut d = (p - vertices[0]).length_squared();
    let mut inside = false;

    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];

        let e = vj - vi;
        let w = p - vi;
        let t = (w.dot(e) / e.dot(e)).clamp(0.0, 1.0);
        let closest = w - e * t;
        d = d.min(closest.length_squared());

        let cond = (vi.y > p.y) != (vj.y > p.y)
            && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
        if cond {
            inside = !inside;
        }
        j = i;
    }

    let sign = if inside { -1.0 } else { 1.0 };
    sign * d.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn circle_matches_analytical_distance() {
        let c = circle2d(5.0).unwrap();
        assert_abs_diff_eq!(c.evaluate(DVec2::new(8.0, 0.0)), 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.evaluate(DVec2::ZERO), -5.0, epsilon = 1e-9);
    }

    #[test]
    fn rect_origin_is_inside() {
        let r = rect2d(10.0, 4.0).unwrap();
        assert!(r.evaluate(DVec2::ZERO) < 0.0);
        assert!(r.evaluate(DVec2::new(20.0, 0.0)) > 0.0);
    }

    #[test]
    fn polygon_square_matches_rect_interior_sign() {
        let square = polygon(vec![
            DVec2::new(-5.0, -5.0),
            DVec2::new(5.0, -5.0),
            DVec2::new(5.0, 5.0),
            DVec2::new(-5.0, 5.0),
        ])
        .unwrap();
        assert!(square.evaluate(DVec2::ZERO) < 0.0);
        assert!(square.evaluate(DVec2::new(10.0, 10.0)) > 0.0);
    }

    #[test]
    fn rejects_degenerate_shapes() {
        assert!(circle2d(0.0).is_err());
        assert!(rect2d(-1.0, 5.0).is_err());
        assert!(polygon(vec![DVec2::ZERO, DVec2::X]).is_err());
    }
}
