//! Sphere tracing + bisection root finder, shared by `Node::find_surface`
//! (hence `drop_cutter`) and by the CAM raster's per-column surface probe.
//!
//! Marching along a 1D parameterisation `t -> eval(t)` of an SDF, the step
//! length is bounded below by `eps * (t_max - t_min)` so that flat regions
//! (large `|grad|` but tiny `|eval|`, or the reverse) never stall the march.

/// Advance `t` from `t_min` toward `t_max`, sphere-tracing `eval`. Returns the
/// parameter of the first sign change, refined by bisection to `tolerance`,
/// or `None` if `eval` never crosses zero within `[t_min, t_max]`.
pub(crate) fn find_surface(
    eval: impl Fn(f64) -> f64,
    t_min: f64,
    t_max: f64,
    tolerance: f64,
    max_iter: usize,
) -> Option<f64> {
    if t_max <= t_min {
        return None;
    }
    let min_step = tolerance.max((t_max - t_min) * 1.0e-6);

    let mut t = t_min;
    let mut prev_t = t_min;
    let mut prev_val = eval(t);

    if prev_val.abs() < tolerance {
        return Some(t);
    }

    for _ in 0..max_iter {
        let step = prev_val.abs().max(min_step);
        t += step;
        if t > t_max {
            t = t_max;
        }
        let val = eval(t);

        if val.abs() < tolerance {
            return Some(t);
        }
        if val.signum() != prev_val.signum() {
            return Some(bisect(&eval, prev_t, t, tolerance, max_iter));
        }
        if t >= t_max {
            return None;
        }

        prev_t = t;
        prev_val = val;
    }
    None
}

fn bisect(eval: impl Fn(f64) -> f64, mut lo: f64, mut hi: f64, tolerance: f64, max_iter: usize) -> f64 {
    let mut lo_val = eval(lo);
    for _ in 0..max_iter {
        let mid = (lo + hi) * 0.5;
        let mid_val = eval(mid);
        if mid_val.abs() < tolerance || (hi - lo) < tolerance {
            return mid;
        }
        if mid_val.signum() == lo_val.signum() {
            lo = mid;
            lo_val = mid_val;
        } else {
            hi = mid;
        }
    }
    (lo + hi) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn finds_sphere_crossing() {
        // eval(t) = (5 - t) - 2, a ray shrinking toward a sphere of radius 2
        // whose surface along this parameterisation sits at t = 3.
        let hit = find_surface(|t| (5.0 - t).abs() - 2.0, 0.0, 10.0, 1e-6, 128);
        assert!(hit.is_some());
        assert_abs_diff_eq!(hit.unwrap(), 3.0, epsilon = 1e-4);
    }

    #[test]
    fn misses_return_none() {
        let hit = find_surface(|t| t + 5.0, 0.0, 10.0, 1e-6, 128);
        assert!(hit.is_none());
    }
}
