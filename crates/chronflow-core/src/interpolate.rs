//! Interpolation strategies that fill `NaN` measurements.
//!
//! Every strategy works in index space — the position of an observation
//! within the (already sorted) series — not in elapsed time. This mirrors
//! the regularizer's own grid-index reasoning and keeps the spline solvers
//! free of any timestamp-scaling concerns.

use crate::error::{Error, Result};
use crate::model::Series;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    None,
    Linear,
    Nearest,
    ForwardFill,
    BackwardFill,
    LogLinear,
    CubicSpline,
    MonotoneSpline,
}

pub fn by_name(name: &str) -> Result<Method> {
    match name {
        "None" | "none" | "" => Ok(Method::None),
        "Linear" => Ok(Method::Linear),
        "Nearest" => Ok(Method::Nearest),
        "ForwardFill" => Ok(Method::ForwardFill),
        "BackwardFill" => Ok(Method::BackwardFill),
        "LogLinear" => Ok(Method::LogLinear),
        "CubicSpline" => Ok(Method::CubicSpline),
        "MonotoneSpline" => Ok(Method::MonotoneSpline),
        other => Err(Error::bad_input(format!("unknown interpolation method: {other}"))),
    }
}

/// For each index, the nearest preceding and following valid (non-`NaN`)
/// index, `None` if there isn't one.
fn compute_neighbors(values: &[f64]) -> (Vec<Option<usize>>, Vec<Option<usize>>) {
    let n = values.len();
    let mut prev = vec![None; n];
    let mut last = None;
    for i in 0..n {
        prev[i] = last;
        if !values[i].is_nan() {
            last = Some(i);
        }
    }
    let mut next = vec![None; n];
    let mut upcoming = None;
    for i in (0..n).rev() {
        next[i] = upcoming;
        if !values[i].is_nan() {
            upcoming = Some(i);
        }
    }
    (prev, next)
}

fn linear_fill(values: &mut [f64]) {
    let (prev, next) = compute_neighbors(values);
    let snapshot = values.to_vec();
    for i in 0..values.len() {
        if !snapshot[i].is_nan() {
            continue;
        }
        if let (Some(p), Some(nx)) = (prev[i], next[i]) {
            if p != nx {
                let frac = (i - p) as f64 / (nx - p) as f64;
                values[i] = snapshot[p] + (snapshot[nx] - snapshot[p]) * frac;
            }
        }
    }
}

fn nearest_fill(values: &mut [f64]) {
    let (prev, next) = compute_neighbors(values);
    let snapshot = values.to_vec();
    for i in 0..values.len() {
        if !snapshot[i].is_nan() {
            continue;
        }
        values[i] = match (prev[i], next[i]) {
            (Some(p), Some(nx)) => {
                if (i - p) <= (nx - i) {
                    snapshot[p]
                } else {
                    snapshot[nx]
                }
            }
            (Some(p), None) => snapshot[p],
            (None, Some(nx)) => snapshot[nx],
            (None, None) => f64::NAN,
        };
    }
}

fn forward_fill(values: &mut [f64]) {
    let (prev, _) = compute_neighbors(values);
    let snapshot = values.to_vec();
    for i in 0..values.len() {
        if snapshot[i].is_nan() {
            if let Some(p) = prev[i] {
                values[i] = snapshot[p];
            }
        }
    }
}

fn backward_fill(values: &mut [f64]) {
    let (_, next) = compute_neighbors(values);
    let snapshot = values.to_vec();
    for i in 0..values.len() {
        if snapshot[i].is_nan() {
            if let Some(nx) = next[i] {
                values[i] = snapshot[nx];
            }
        }
    }
}

fn log_linear_fill(values: &mut [f64]) {
    let (prev, next) = compute_neighbors(values);
    let snapshot = values.to_vec();
    for i in 0..values.len() {
        if !snapshot[i].is_nan() {
            continue;
        }
        if let (Some(p), Some(nx)) = (prev[i], next[i]) {
            let (vp, vn) = (snapshot[p], snapshot[nx]);
            if vp > 0.0 && vn > 0.0 && p != nx {
                let frac = (i - p) as f64 / (nx - p) as f64;
                let log_val = vp.ln() + (vn.ln() - vp.ln()) * frac;
                values[i] = log_val.exp();
            }
        }
    }
}

/// Valid (non-`NaN`) `(index, value)` pairs, as `f64` index coordinates for
/// use in the spline solvers.
fn valid_points(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        if !v.is_nan() {
            xs.push(i as f64);
            ys.push(v);
        }
    }
    (xs, ys)
}

/// Natural cubic spline through the valid points, solved via the Thomas
/// algorithm for the tridiagonal second-derivative system. Falls back to
/// linear with exactly two valid points; no-op with fewer than two.
fn cubic_spline_fill(values: &mut [f64]) {
    let (xs, ys) = valid_points(values);
    let m = xs.len();
    if m < 2 {
        return;
    }
    if m == 2 {
        linear_fill(values);
        return;
    }

    let h: Vec<f64> = (0..m - 1).map(|i| xs[i + 1] - xs[i]).collect();

    // Tridiagonal system for interior second derivatives M[1..m-2];
    // natural boundary conditions pin M[0] = M[m-1] = 0.
    let n_interior = m - 2;
    let mut sub = vec![0.0; n_interior];
    let mut diag = vec![0.0; n_interior];
    let mut sup = vec![0.0; n_interior];
    let mut rhs = vec![0.0; n_interior];

    for k in 0..n_interior {
        let i = k + 1;
        sub[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        sup[k] = h[i];
        rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
    }

    // Thomas algorithm.
    for k in 1..n_interior {
        let w = sub[k] / diag[k - 1];
        diag[k] -= w * sup[k - 1];
        rhs[k] -= w * rhs[k - 1];
    }
    let mut m_interior = vec![0.0; n_interior];
    if n_interior > 0 {
        m_interior[n_interior - 1] = rhs[n_interior - 1] / diag[n_interior - 1];
        for k in (0..n_interior - 1).rev() {
            m_interior[k] = (rhs[k] - sup[k] * m_interior[k + 1]) / diag[k];
        }
    }

    let mut second_deriv = vec![0.0; m];
    for k in 0..n_interior {
        second_deriv[k + 1] = m_interior[k];
    }

    let min_x = xs[0];
    let max_x = xs[m - 1];
    for (i, v) in values.iter_mut().enumerate() {
        if !v.is_nan() {
            continue;
        }
        let x = i as f64;
        if x < min_x || x > max_x {
            continue; // no extrapolation
        }
        let seg = match xs.windows(2).position(|w| x >= w[0] && x <= w[1]) {
            Some(s) => s,
            None => continue,
        };
        let (x0, x1) = (xs[seg], xs[seg + 1]);
        let (y0, y1) = (ys[seg], ys[seg + 1]);
        let (m0, m1) = (second_deriv[seg], second_deriv[seg + 1]);
        let hseg = x1 - x0;
        let a = (x1 - x) / hseg;
        let b = (x - x0) / hseg;
        *v = a * y0
            + b * y1
            + ((a.powi(3) - a) * m0 + (b.powi(3) - b) * m1) * hseg * hseg / 6.0;
    }
}

/// Fritsch-Carlson monotone cubic Hermite spline (PCHIP) through the valid
/// points. Endpoint slopes start at the adjacent secant slope, clamped to
/// at most twice that same secant and matching its sign. No extrapolation.
fn monotone_spline_fill(values: &mut [f64]) {
    let (xs, ys) = valid_points(values);
    let m = xs.len();
    if m < 2 {
        return;
    }
    if m == 2 {
        linear_fill(values);
        return;
    }

    let h: Vec<f64> = (0..m - 1).map(|i| xs[i + 1] - xs[i]).collect();
    let delta: Vec<f64> = (0..m - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

    let mut d = vec![0.0; m];
    for k in 1..m - 1 {
        if delta[k - 1] == 0.0 || delta[k] == 0.0 || delta[k - 1].signum() != delta[k].signum() {
            d[k] = 0.0;
        } else {
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            d[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
        }
    }

    // Endpoint slope is the adjacent secant itself, then run through the
    // same sign/magnitude clamp as an interior point would get against
    // that same secant (the clamp is checked, not skipped, even though
    // starting from the secant means it can never actually fire).
    let clamp_endpoint = |d0: f64, secant: f64| -> f64 {
        if secant == 0.0 {
            return d0;
        }
        if d0.signum() != secant.signum() {
            return 0.0;
        }
        if d0.abs() > 2.0 * secant.abs() {
            2.0 * secant
        } else {
            d0
        }
    };

    d[0] = clamp_endpoint(delta[0], delta[0]);

    let last = m - 1;
    d[last] = clamp_endpoint(delta[last - 1], delta[last - 1]);

    let min_x = xs[0];
    let max_x = xs[m - 1];
    for (i, v) in values.iter_mut().enumerate() {
        if !v.is_nan() {
            continue;
        }
        let x = i as f64;
        if x < min_x || x > max_x {
            continue;
        }
        let seg = match xs.windows(2).position(|w| x >= w[0] && x <= w[1]) {
            Some(s) => s,
            None => continue,
        };
        let hseg = h[seg];
        let t = (x - xs[seg]) / hseg;
        let h00 = 2.0 * t.powi(3) - 3.0 * t.powi(2) + 1.0;
        let h10 = t.powi(3) - 2.0 * t.powi(2) + t;
        let h01 = -2.0 * t.powi(3) + 3.0 * t.powi(2);
        let h11 = t.powi(3) - t.powi(2);
        *v = h00 * ys[seg] + h10 * hseg * d[seg] + h01 * ys[seg + 1] + h11 * hseg * d[seg + 1];
    }
}

/// Fills `NaN` measurements in `series` in place, according to `method`.
pub fn interpolate(series: &mut Series, method: Method) {
    let mut values: Vec<f64> = series.observations.iter().map(|o| o.meas).collect();
    match method {
        Method::None => return,
        Method::Linear => linear_fill(&mut values),
        Method::Nearest => nearest_fill(&mut values),
        Method::ForwardFill => forward_fill(&mut values),
        Method::BackwardFill => backward_fill(&mut values),
        Method::LogLinear => log_linear_fill(&mut values),
        Method::CubicSpline => cubic_spline_fill(&mut values),
        Method::MonotoneSpline => monotone_spline_fill(&mut values),
    }
    for (obs, v) in series.observations.iter_mut().zip(values) {
        obs.meas = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Observation, Status};
    use chrono::Utc;

    fn series_from(values: &[f64]) -> Series {
        Series::with_observations(
            "x",
            values.iter().map(|&v| Observation::new(Utc::now(), v, Status::Ok)).collect(),
        )
    }

    #[test]
    fn s3_linear_fills_single_gap() {
        let mut s = series_from(&[1.0, f64::NAN, 3.0]);
        interpolate(&mut s, Method::Linear);
        let meas: Vec<f64> = s.observations.iter().map(|o| o.meas).collect();
        assert_eq!(meas, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn leading_and_trailing_nan_stay_nan_under_linear() {
        let mut s = series_from(&[f64::NAN, 1.0, 2.0, f64::NAN]);
        interpolate(&mut s, Method::Linear);
        let meas: Vec<f64> = s.observations.iter().map(|o| o.meas).collect();
        assert!(meas[0].is_nan());
        assert!(meas[3].is_nan());
    }

    #[test]
    fn nearest_breaks_ties_toward_preceding() {
        let mut s = series_from(&[1.0, f64::NAN, 9.0]);
        interpolate(&mut s, Method::Nearest);
        assert_eq!(s.observations[1].meas, 1.0);
    }

    #[test]
    fn forward_fill_propagates_last_value() {
        let mut s = series_from(&[5.0, f64::NAN, f64::NAN]);
        interpolate(&mut s, Method::ForwardFill);
        let meas: Vec<f64> = s.observations.iter().map(|o| o.meas).collect();
        assert_eq!(meas, vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn valid_observations_are_unchanged() {
        let mut s = series_from(&[1.0, f64::NAN, 3.0, 7.0]);
        interpolate(&mut s, Method::Linear);
        assert_eq!(s.observations[0].meas, 1.0);
        assert_eq!(s.observations[2].meas, 3.0);
        assert_eq!(s.observations[3].meas, 7.0);
    }

    #[test]
    fn log_linear_requires_positive_brackets() {
        let mut s = series_from(&[-1.0, f64::NAN, 4.0]);
        interpolate(&mut s, Method::LogLinear);
        assert!(s.observations[1].meas.is_nan());
    }

    #[test]
    fn cubic_spline_falls_back_to_linear_with_two_points() {
        let mut s = series_from(&[2.0, f64::NAN, f64::NAN, 8.0]);
        interpolate(&mut s, Method::CubicSpline);
        let meas: Vec<f64> = s.observations.iter().map(|o| o.meas).collect();
        assert!((meas[1] - 4.0).abs() < 1e-9);
        assert!((meas[2] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn s6_monotone_spline_output_is_non_decreasing() {
        let mut s = series_from(&[1.0, f64::NAN, f64::NAN, 4.0, f64::NAN, 5.0]);
        interpolate(&mut s, Method::MonotoneSpline);
        let meas: Vec<f64> = s.observations.iter().map(|o| o.meas).collect();
        for w in meas.windows(2) {
            assert!(w[1] >= w[0] - 1e-9, "{:?} not non-decreasing", meas);
        }
    }

    #[test]
    fn unknown_method_name_is_bad_input() {
        assert!(matches!(by_name("bogus"), Err(Error::BadInput(_))));
    }
}
