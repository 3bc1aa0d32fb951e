//! The statistics engine: a single `recompute` pass that sorts a series,
//! fills in its derived `dchron`/`dmeas` fields, and rebuilds its `Stats`
//! block.

use chrono::{DateTime, Utc};

use crate::model::{Series, Stats};
use crate::numeric;
use crate::sentinel::{is_not_a_date, not_a_date, safe_sub, NOT_A_DURATION};

fn nanos(t: DateTime<Utc>) -> f64 {
    t.timestamp_nanos_opt().unwrap_or(i64::MIN) as f64
}

fn from_nanos(n: f64) -> DateTime<Utc> {
    if !n.is_finite() {
        return not_a_date();
    }
    DateTime::<Utc>::from_timestamp_nanos(n.round() as i64)
}

/// Sorts `series.observations` by `chron` ascending, recomputes `dchron`
/// and `dmeas` for every observation, and rebuilds `series.stats`.
///
/// Idempotent: calling this twice in a row produces the same result the
/// second time, since the first pass already leaves the sequence sorted
/// and the deltas consistent.
pub fn recompute(series: &mut Series) {
    series
        .observations
        .sort_by(|a, b| a.chron.cmp(&b.chron));

    for i in 0..series.observations.len() {
        if i == 0 {
            series.observations[0].dchron = NOT_A_DURATION;
            series.observations[0].dmeas = f64::NAN;
            continue;
        }
        let prev = series.observations[i - 1];
        let cur = series.observations[i];
        series.observations[i].dchron = safe_sub(cur.chron, prev.chron);
        series.observations[i].dmeas = if cur.meas.is_nan() || prev.meas.is_nan() {
            f64::NAN
        } else {
            cur.meas - prev.meas
        };
    }

    if series.observations.is_empty() {
        series.stats = Stats::default();
        series.comment = "Warning: Empty Time Series".to_string();
        return;
    }

    let mut stats = Stats::default();
    let obs = &series.observations;
    stats.len = obs.len();
    stats.nan_count = obs.iter().filter(|o| o.meas.is_nan()).count();

    // Timestamps: the sequence is sorted, so min/max are the endpoints.
    let chron_ns: Vec<f64> = obs.iter().map(|o| nanos(o.chron)).collect();
    stats.chron_min = obs.first().unwrap().chron;
    stats.val_at_chron_min = obs.first().unwrap().meas;
    stats.chron_max = obs.last().unwrap().chron;
    stats.val_at_chron_max = obs.last().unwrap().meas;
    stats.chron_mean = from_nanos(numeric::mean(&chron_ns));
    stats.chron_median = from_nanos(numeric::median(&chron_ns));

    // Time deltas, from the second observation onward.
    if obs.len() > 1 {
        let dchron_f: Vec<f64> = obs[1..]
            .iter()
            .filter(|o| !crate::sentinel::is_not_a_duration(o.dchron))
            .map(|o| o.dchron as f64)
            .collect();

        let mut dchron_min = NOT_A_DURATION;
        let mut dchron_max = NOT_A_DURATION;
        let mut chron_at_dchron_min = not_a_date();
        let mut chron_at_dchron_max = not_a_date();
        let mut have_dchron = false;
        for o in obs[1..].iter() {
            if crate::sentinel::is_not_a_duration(o.dchron) {
                continue;
            }
            if !have_dchron {
                dchron_min = o.dchron;
                dchron_max = o.dchron;
                chron_at_dchron_min = o.chron;
                chron_at_dchron_max = o.chron;
                have_dchron = true;
                continue;
            }
            if o.dchron < dchron_min {
                dchron_min = o.dchron;
                chron_at_dchron_min = o.chron;
            }
            if o.dchron > dchron_max {
                dchron_max = o.dchron;
                chron_at_dchron_max = o.chron;
            }
        }
        stats.dchron_min = dchron_min;
        stats.dchron_max = dchron_max;
        stats.chron_at_dchron_min = chron_at_dchron_min;
        stats.chron_at_dchron_max = chron_at_dchron_max;
        stats.dchron_mean = numeric::mean(&dchron_f);
        stats.dchron_median = numeric::median(&dchron_f);
        stats.dchron_std = numeric::std_dev(&dchron_f);
    }

    // Measurements, skipping NaN. Ties on min/max broken by earliest
    // occurrence: scan forward and only record the first match.
    {
        let meas_vals: Vec<f64> = obs.iter().map(|o| o.meas).filter(|m| !m.is_nan()).collect();
        stats.meas_mean = numeric::mean_skip_nan(&obs.iter().map(|o| o.meas).collect::<Vec<_>>());
        stats.meas_median = numeric::median(&meas_vals);
        stats.meas_std = numeric::std_dev(&meas_vals);

        let (mmin, mmax) = numeric::bounds(&meas_vals);
        stats.meas_min = if meas_vals.is_empty() { f64::NAN } else { mmin };
        stats.meas_max = if meas_vals.is_empty() { f64::NAN } else { mmax };

        let mut found_min = false;
        let mut found_max = false;
        for o in obs.iter() {
            if o.meas.is_nan() {
                continue;
            }
            if !found_min && o.meas == stats.meas_min {
                stats.chron_at_meas_min = o.chron;
                found_min = true;
            }
            if !found_max && o.meas == stats.meas_max {
                stats.chron_at_meas_max = o.chron;
                found_max = true;
            }
            if found_min && found_max {
                break;
            }
        }
    }

    // Measurement deltas, skipping NaN and dropping the first real delta
    // too: these stats cover the third observation onward, skipping the
    // first two.
    {
        let mut dmeas_vals: Vec<f64> = obs.iter().map(|o| o.dmeas).filter(|m| !m.is_nan()).collect();
        if dmeas_vals.len() > 1 {
            dmeas_vals.remove(0);
            let (dmin, dmax) = numeric::bounds(&dmeas_vals);
            stats.dmeas_min = dmin;
            stats.dmeas_max = dmax;
            stats.dmeas_mean = numeric::mean(&dmeas_vals);
            stats.dmeas_median = numeric::median(&dmeas_vals);
            stats.dmeas_std = numeric::std_dev(&dmeas_vals);
        }
    }

    series.stats = stats;
    series.comment = "Time Series ok.".to_string();
}
