//! Parallel raster surfacing: a ball-nose drop-cutter walk over an
//! offset SDF, producing an ordered `rapid`/`plunge`/`cut` point sequence.
//!
//! The raster plane pairs with the kernel's Y-up spindle convention:
//! the two horizontal axes are X and Z, so [`RasterDirection`] picks
//! between them rather than the generic `{x, y}` of a Z-up source.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::Aabb;
use crate::sdf::Node;

use super::tool::ToolDefinition;

/// Which horizontal axis the raster walks as its primary (fast) direction;
/// the other horizontal axis is stepped over between passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RasterDirection {
    X,
    Z,
}

/// Parameters for [`generate_raster_surfacing`], built the way the rest of
/// the crate configures multi-field operations: required fields at
/// construction, optional ones via `with_*`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfacingParams {
    direction: RasterDirection,
    stepover_pct: f64,
    point_spacing: Option<f64>,
    feed_rate: f64,
    plunge_rate: Option<f64>,
    rpm: f64,
    safe_z: f64,
    approach_z: f64,
    z_top: f64,
    z_bottom: f64,
    zigzag: bool,
    boundary_overcut: Option<f64>,
}

impl SurfacingParams {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        direction: RasterDirection,
        stepover_pct: f64,
        feed_rate: f64,
        rpm: f64,
        safe_z: f64,
        approach_z: f64,
        z_top: f64,
        z_bottom: f64,
    ) -> Result<Self> {
        if stepover_pct <= 0.0 {
            return Err(Error::invalid_parameter(
                "generate_raster_surfacing",
                "stepover_pct",
                stepover_pct,
            ));
        }
        if feed_rate <= 0.0 {
            return Err(Error::invalid_parameter(
                "generate_raster_surfacing",
                "feed_rate",
                feed_rate,
            ));
        }
        if rpm <= 0.0 {
            return Err(Error::invalid_parameter("generate_raster_surfacing", "rpm", rpm));
        }
        if z_top <= z_bottom {
            return Err(Error::invalid_parameter(
                "generate_raster_surfacing",
                "z_top,z_bottom",
                format!("top {z_top} is not above bottom {z_bottom}"),
            ));
        }
        Ok(Self {
            direction,
            stepover_pct,
            point_spacing: None,
            feed_rate,
            plunge_rate: None,
            rpm,
            safe_z,
            approach_z,
            z_top,
            z_bottom,
            zigzag: true,
            boundary_overcut: None,
        })
    }

    pub fn with_point_spacing(mut self, spacing: f64) -> Result<Self> {
        if spacing <= 0.0 {
            return Err(Error::invalid_parameter(
                "with_point_spacing",
                "spacing",
                spacing,
            ));
        }
        self.point_spacing = Some(spacing);
        Ok(self)
    }

    pub fn with_plunge_rate(mut self, rate: f64) -> Result<Self> {
        if rate <= 0.0 {
            return Err(Error::invalid_parameter("with_plunge_rate", "rate", rate));
        }
        self.plunge_rate = Some(rate);
        Ok(self)
    }

    pub fn with_zigzag(mut self, zigzag: bool) -> Self {
        self.zigzag = zigzag;
        self
    }

    pub fn with_boundary_overcut(mut self, overcut: f64) -> Self {
        self.boundary_overcut = Some(overcut);
        self
    }

    pub fn feed_rate(&self) -> f64 {
        self.feed_rate
    }

    pub fn plunge_rate(&self) -> f64 {
        self.plunge_rate.unwrap_or(self.feed_rate / 3.0)
    }

    pub fn rpm(&self) -> f64 {
        self.rpm
    }

    pub fn safe_z(&self) -> f64 {
        self.safe_z
    }

    pub fn stepover_pct(&self) -> f64 {
        self.stepover_pct
    }
}

/// The motion mode a toolpath point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    Rapid,
    Cut,
    Plunge,
}

/// A single tool-tip position, in the kernel's native SDF (Y-up) coordinate
/// convention. The G-code emitter is the only consumer that remaps axes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToolpathPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub kind: MotionKind,
}

impl ToolpathPoint {
    fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ToolpathStatistics {
    pub cut_distance: f64,
    pub rapid_distance: f64,
    pub pass_count: usize,
    pub estimated_minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolpathResult {
    pub tool: ToolDefinition,
    pub parameters: SurfacingParams,
    pub shape_name: String,
    pub points: Vec<ToolpathPoint>,
    pub bounds: Aabb,
    pub statistics: ToolpathStatistics,
}

impl ToolpathResult {
    /// A one-line, LLM/UI-facing summary in the spirit of `Node::readback`:
    /// point counts by motion kind plus the headline statistics.
    pub fn summary(&self) -> String {
        let rapids = self.points.iter().filter(|p| p.kind == MotionKind::Rapid).count();
        let plunges = self.points.iter().filter(|p| p.kind == MotionKind::Plunge).count();
        let cuts = self.points.iter().filter(|p| p.kind == MotionKind::Cut).count();
        format!(
            "{}: {} pts (rapid {rapids}, plunge {plunges}, cut {cuts}), {} passes, {:.1}mm cut, {:.1}mm rapid, ~{:.2}min",
            self.shape_name,
            self.points.len(),
            self.statistics.pass_count,
            self.statistics.cut_distance,
            self.statistics.rapid_distance,
            self.statistics.estimated_minutes,
        )
    }
}

const RAPID_TRAVERSE_RATE: f64 = 15000.0;
const STRIP_EPSILON: f64 = 1.0e-9;

/// Push a point, accumulating the distance from the previous point into
/// whichever of `cut_distance`/`rapid_distance` matches `kind` (plunges
/// count as cut).
fn emit_point(
    points: &mut Vec<ToolpathPoint>,
    cut_distance: &mut f64,
    rapid_distance: &mut f64,
    x: f64,
    y: f64,
    z: f64,
    kind: MotionKind,
) {
    let point = ToolpathPoint { x, y, z, kind };
    if let Some(prev) = points.last() {
        let d = (point.position() - prev.position()).length();
        match kind {
            MotionKind::Rapid => *rapid_distance += d,
            MotionKind::Cut | MotionKind::Plunge => *cut_distance += d,
        }
    }
    points.push(point);
}

/// Ball-nose drop-cutter raster surfacing over `sdf`'s offset surface.
/// Walks `params.direction` as the fast axis, stepping the other
/// horizontal axis by `stepover = tool.diameter() * stepover_pct / 100`.
pub fn generate_raster_surfacing(
    sdf: &Node,
    shape_name: &str,
    tool: &ToolDefinition,
    params: &SurfacingParams,
) -> Result<ToolpathResult> {
    let radius = tool.radius();
    let offset = sdf.clone().round(radius)?;
    let bounds = sdf.bounds();
    let overcut = params.boundary_overcut.unwrap_or(radius);
    let stepover = tool.diameter() * params.stepover_pct / 100.0;
    let point_spacing = params.point_spacing.unwrap_or(stepover);

    let x_range = (bounds.min.x - overcut, bounds.max.x + overcut);
    let z_range = (bounds.min.z - overcut, bounds.max.z + overcut);
    let (primary_min, primary_max, secondary_min, secondary_max) = match params.direction {
        RasterDirection::X => (x_range.0, x_range.1, z_range.0, z_range.1),
        RasterDirection::Z => (z_range.0, z_range.1, x_range.0, x_range.1),
    };

    let mut points = Vec::new();
    let mut cut_distance = 0.0;
    let mut rapid_distance = 0.0;
    let mut pass_count = 0usize;
    let mut cut_points_bounds: Option<Aabb> = None;

    let mut secondary = secondary_min;
    let mut strip_forward = true;
    while secondary <= secondary_max + STRIP_EPSILON {
        let reverse = params.zigzag && !strip_forward;
        let (primary_start, primary_end) = if reverse {
            (primary_max, primary_min)
        } else {
            (primary_min, primary_max)
        };
        let step = if primary_end >= primary_start {
            point_spacing
        } else {
            -point_spacing
        };

        let mut primary = primary_start;
        let mut first_contact = true;
        loop {
            let clamped = if step > 0.0 {
                primary.min(primary_end)
            } else {
                primary.max(primary_end)
            };
            let (x, z) = match params.direction {
                RasterDirection::X => (clamped, secondary),
                RasterDirection::Z => (secondary, clamped),
            };

            if let Some(contact_y) = offset.drop_cutter(x, z, params.z_top, params.z_bottom, None)? {
                let tip_y = contact_y - radius;
                if first_contact {
                    emit_point(&mut points, &mut cut_distance, &mut rapid_distance, x, params.safe_z, z, MotionKind::Rapid);
                    emit_point(&mut points, &mut cut_distance, &mut rapid_distance, x, params.approach_z, z, MotionKind::Rapid);
                    emit_point(&mut points, &mut cut_distance, &mut rapid_distance, x, tip_y, z, MotionKind::Plunge);
                    first_contact = false;
                } else {
                    emit_point(&mut points, &mut cut_distance, &mut rapid_distance, x, tip_y, z, MotionKind::Cut);
                }
                let cut_point = Aabb::new(DVec3::new(x, tip_y, z), DVec3::new(x, tip_y, z));
                cut_points_bounds = Some(match cut_points_bounds {
                    Some(existing) => existing.union(&cut_point),
                    None => cut_point,
                });
            }

            let at_end = if step > 0.0 {
                primary >= primary_end - STRIP_EPSILON
            } else {
                primary <= primary_end + STRIP_EPSILON
            };
            if at_end {
                break;
            }
            primary += step;
        }

        if !first_contact {
            let last = *points.last().expect("strip emitted at least one point");
            emit_point(&mut points, &mut cut_distance, &mut rapid_distance, last.x, params.safe_z, last.z, MotionKind::Rapid);
            pass_count += 1;
        }

        strip_forward = !strip_forward;
        secondary += stepover;
    }

    tracing::debug!(
        points = points.len(),
        passes = pass_count,
        "generate_raster_surfacing: raster complete"
    );

    let estimated_minutes =
        ((cut_distance / params.feed_rate + rapid_distance / RAPID_TRAVERSE_RATE) * 100.0).round() / 100.0;

    Ok(ToolpathResult {
        tool: tool.clone(),
        parameters: params.clone(),
        shape_name: shape_name.to_string(),
        points,
        bounds: cut_points_bounds.unwrap_or_else(|| Aabb::new(DVec3::ZERO, DVec3::ZERO)),
        statistics: ToolpathStatistics {
            cut_distance,
            rapid_distance,
            pass_count,
            estimated_minutes,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::box3;
    use approx::assert_abs_diff_eq;

    fn flat_box_params(diameter: f64) -> (Node, ToolDefinition, SurfacingParams) {
        let shape = box3(100.0, 60.0, 30.0).unwrap();
        let tool = ToolDefinition::ball_nose("test ball", diameter).unwrap();
        let params = SurfacingParams::new(RasterDirection::X, 50.0, 2000.0, 10000.0, 50.0, 20.0, 100.0, -100.0)
            .unwrap()
            .with_point_spacing(20.0)
            .unwrap();
        (shape, tool, params)
    }

    #[test]
    fn all_cut_points_sit_at_top_of_flat_box() {
        let (shape, tool, params) = flat_box_params(10.0);
        let result = generate_raster_surfacing(&shape, "box", &tool, &params).unwrap();
        let top = shape.bounds().max.y;
        for p in result.points.iter().filter(|p| p.kind != MotionKind::Rapid) {
            assert_abs_diff_eq!(p.y, top, epsilon = 1.0);
        }
        assert!(result.statistics.pass_count > 0);
    }

    #[test]
    fn zigzag_alternates_primary_direction_between_strips() {
        let (shape, tool, params) = flat_box_params(10.0);
        let params = params.with_zigzag(true);
        let result = generate_raster_surfacing(&shape, "box", &tool, &params).unwrap();
        let plunge_xs: Vec<f64> = result
            .points
            .iter()
            .filter(|p| p.kind == MotionKind::Plunge)
            .map(|p| p.x)
            .collect();
        assert!(plunge_xs.len() >= 2);
        assert_ne!(plunge_xs[0], plunge_xs[1]);
    }

    #[test]
    fn rejects_non_positive_stepover() {
        assert!(SurfacingParams::new(RasterDirection::X, 0.0, 2000.0, 10000.0, 50.0, 20.0, 100.0, -100.0).is_err());
    }

    #[test]
    fn rejects_inverted_z_range() {
        assert!(SurfacingParams::new(RasterDirection::X, 50.0, 2000.0, 10000.0, 50.0, 20.0, -100.0, 100.0).is_err());
    }
}
