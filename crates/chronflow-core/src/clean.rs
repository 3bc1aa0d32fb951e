//! Outlier removal. Every cleaner partitions a series into a kept
//! ("cleaned") series and a removed ("rejected") series; together they
//! reconstitute the original as a multiset, and every rejected observation
//! carries `status = Rejected`.
//!
//! Observations with `meas = NaN` are never rejected by any cleaner here —
//! they're already missing, not outliers, so none of the bound/percentile/
//! z-score/Peirce tests apply to them.

use crate::error::{Error, Result};
use crate::model::{Series, Status};
use crate::numeric;

fn split(name: &str) -> (String, String) {
    (format!("{name} (cleaned)"), format!("{name} (rejected)"))
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

fn partition(series: &Series, mut reject: impl FnMut(f64) -> bool) -> (Series, Series) {
    let (cleaned_name, rejected_name) = split(&series.name);
    let mut cleaned = Series::new(cleaned_name);
    let mut rejected = Series::new(rejected_name);
    for obs in &series.observations {
        if !obs.meas.is_nan() && reject(obs.meas) {
            let mut r = *obs;
            r.status = Status::Rejected;
            rejected.observations.push(r);
        } else {
            cleaned.observations.push(*obs);
        }
    }
    (cleaned, rejected)
}

/// Drops observations whose `meas` falls outside `[min, max]`. Either bound
/// may be absent (no lower/upper bound, respectively).
pub fn remove_outbounds(series: &Series, min: Option<f64>, max: Option<f64>) -> (Series, Series) {
    partition(series, |v| {
        min.map(|m| v < m).unwrap_or(false) || max.map(|m| v > m).unwrap_or(false)
    })
}

fn non_nan_sorted(series: &Series) -> Vec<f64> {
    let mut v: Vec<f64> = series.observations.iter().map(|o| o.meas).filter(|m| !m.is_nan()).collect();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap());
    v
}

/// Drops observations below the p-th percentile or above the (100-p)-th
/// percentile of non-`NaN` measurements.
pub fn perc_cleaning(series: &Series, p: f64) -> (Series, Series) {
    let sorted = non_nan_sorted(series);
    let low = percentile(&sorted, p);
    let high = percentile(&sorted, 100.0 - p);
    partition(series, |v| v < low || v > high)
}

/// One-sided variant of [`perc_cleaning`]: only the lower tail is dropped.
pub fn lower_perc_cleaning(series: &Series, p: f64) -> (Series, Series) {
    let sorted = non_nan_sorted(series);
    let low = percentile(&sorted, p);
    partition(series, |v| v < low)
}

/// One-sided variant of [`perc_cleaning`]: only the upper tail is dropped.
pub fn upper_perc_cleaning(series: &Series, p: f64) -> (Series, Series) {
    let sorted = non_nan_sorted(series);
    let high = percentile(&sorted, 100.0 - p);
    partition(series, |v| v > high)
}

/// Drops observations whose absolute z-score (sample mean/std of non-`NaN`
/// measurements) exceeds `level`. If there are fewer than two valid values,
/// mean/std are `NaN` and nothing is rejected.
pub fn zscore_cleaning(series: &Series, level: f64) -> (Series, Series) {
    let values: Vec<f64> = series.observations.iter().map(|o| o.meas).filter(|m| !m.is_nan()).collect();
    let mean = numeric::mean(&values);
    let std = numeric::std_dev(&values);
    if mean.is_nan() || std.is_nan() || std == 0.0 {
        tracing::warn!(n = values.len(), "zscore_cleaning: degenerate mean/std, rejecting nothing");
        return partition(series, |_| false);
    }
    partition(series, |v| ((v - mean) / std).abs() > level)
}

/// Squared-deviation/variance threshold used by [`peirce_outlier_removal`].
///
/// Peirce's criterion (Peirce 1852, reformulated by Gould 1855) solves a
/// likelihood-ratio equation between "the k most deviant points are
/// genuine" and "they carry no information" for the exact rejection
/// threshold, tabulated historically per (N, k). Without that table
/// available to verify against, this uses a monotonic approximation with
/// the same shape the historical tables have: the threshold rises both
/// with sample size (a larger N tolerates a larger extreme value by chance
/// alone) and with k (claiming more simultaneous outliers needs stronger
/// per-point evidence).
fn peirce_threshold(n: usize, k: usize) -> f64 {
    if k == 0 || k >= n {
        return f64::INFINITY;
    }
    let n = n as f64;
    let k = k as f64;
    2.0 * (n / (n - k)).ln() + 2.0 * (k + 1.0).ln()
}

/// Applies Peirce's criterion iteratively: computes mean/variance over the
/// currently-kept values, flags those whose squared deviation exceeds
/// `threshold * variance` for the current (N, k), rejects them, and
/// repeats with k incremented by however many were newly flagged — until a
/// pass flags nothing new.
pub fn peirce_outlier_removal(series: &Series) -> (Series, Series) {
    let (cleaned_name, rejected_name) = split(&series.name);
    let mut cleaned = Series::new(cleaned_name);
    let mut rejected = Series::new(rejected_name);

    let mut active: Vec<usize> = series
        .observations
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.meas.is_nan())
        .map(|(i, _)| i)
        .collect();
    let mut rejected_idx: Vec<usize> = Vec::new();
    let total = active.len();
    let mut k = 1usize;

    loop {
        if active.len() < 3 {
            break;
        }
        let values: Vec<f64> = active.iter().map(|&i| series.observations[i].meas).collect();
        let mean = numeric::mean(&values);
        let variance = numeric::std_dev(&values).powi(2);
        if variance == 0.0 || variance.is_nan() {
            break;
        }
        let threshold = peirce_threshold(total, k);
        if !threshold.is_finite() {
            break;
        }

        let mut newly_rejected = Vec::new();
        let mut kept = Vec::new();
        for &i in &active {
            let dev = series.observations[i].meas - mean;
            if dev * dev > threshold * variance {
                newly_rejected.push(i);
            } else {
                kept.push(i);
            }
        }
        if newly_rejected.is_empty() {
            break;
        }
        rejected_idx.extend(&newly_rejected);
        active = kept;
        k = rejected_idx.len() + 1;
    }

    let rejected_set: std::collections::HashSet<usize> = rejected_idx.into_iter().collect();
    for (i, obs) in series.observations.iter().enumerate() {
        if rejected_set.contains(&i) {
            let mut r = *obs;
            r.status = Status::Rejected;
            rejected.observations.push(r);
        } else {
            cleaned.observations.push(*obs);
        }
    }
    (cleaned, rejected)
}

/// Parameters a cleaner may need, as carried by a conditioning request.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanParams {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub percent: Option<f64>,
    pub level: Option<f64>,
}

/// Resolves one of the recognized cleaner names and applies it.
/// `"none"` (and the empty string) passes the series through unchanged
/// with an empty rejected series. Unrecognized names are `BadInput`.
pub fn by_name(name: &str, series: &Series, params: CleanParams) -> Result<(Series, Series)> {
    match name {
        "" | "none" | "None" => {
            let (_, rejected_name) = split(&series.name);
            Ok((series.duplicate(), Series::new(rejected_name)))
        }
        "fixedOutbounds" => Ok(remove_outbounds(series, params.min, params.max)),
        "outerPercentile" => {
            let p = params.percent.ok_or_else(|| Error::bad_input("outerPercentile requires percent"))?;
            Ok(perc_cleaning(series, p))
        }
        "lowerPercentile" => {
            let p = params.percent.ok_or_else(|| Error::bad_input("lowerPercentile requires percent"))?;
            Ok(lower_perc_cleaning(series, p))
        }
        "upperPercentile" => {
            let p = params.percent.ok_or_else(|| Error::bad_input("upperPercentile requires percent"))?;
            Ok(upper_perc_cleaning(series, p))
        }
        "zScore" => {
            let lvl = params.level.ok_or_else(|| Error::bad_input("zScore requires lvl"))?;
            Ok(zscore_cleaning(series, lvl))
        }
        "peirce" => Ok(peirce_outlier_removal(series)),
        other => Err(Error::bad_input(format!("unknown cleaner: {other}"))),
    }
}
