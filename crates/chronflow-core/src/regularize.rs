//! Fixed-grid resampling with gap handling.
//!
//! Projects an irregular series onto a grid of evenly spaced timestamps,
//! reducing each window's observations with a caller-supplied aggregator.
//! Internal gaps (a window with no observations, but more data arriving
//! later) are marked `NaN`; trailing gaps are left unpadded.

use chrono::{DateTime, Duration, Utc};

use crate::aggregate::AggFn;
use crate::model::{Observation, Series, Status};

fn truncate_to_period(t: DateTime<Utc>, period_ns: i64) -> DateTime<Utc> {
    let ns = t.timestamp_nanos_opt().unwrap_or(0);
    let floor = ns.div_euclid(period_ns) * period_ns;
    DateTime::<Utc>::from_timestamp_nanos(floor)
}

/// Resamples `series` onto a grid of `period`-spaced timestamps, reducing
/// each window with `agg`. Sorts the input defensively; empty input
/// produces empty output.
pub fn regularize(series: &Series, period: Duration, agg: &mut AggFn) -> Series {
    let mut out = Series::new(series.name.clone());
    if series.is_empty() {
        return out;
    }

    let mut obs = series.observations.clone();
    obs.sort_by(|a, b| a.chron.cmp(&b.chron));

    let period_ns = period
        .num_nanoseconds()
        .expect("regularization period must fit in i64 nanoseconds");

    let first = obs[0].chron;
    let mut anchor = truncate_to_period(first, period_ns);
    if anchor == first {
        // `first` sits exactly on a grid line; shift so it falls strictly
        // inside the first window rather than on its boundary.
        anchor -= period;
    }
    let mut window_end = anchor + period;

    let n = obs.len();
    let mut i = 0usize;
    let mut observations = Vec::new();

    loop {
        let mut window_vals = Vec::new();
        while i < n && obs[i].chron <= window_end {
            window_vals.push(obs[i].meas);
            i += 1;
        }
        if !window_vals.is_empty() {
            let v = agg(&window_vals);
            observations.push(Observation::new(window_end, v, Status::Ok));
        }

        if i >= n {
            break;
        }

        window_end += period;
        while obs[i].chron > window_end {
            observations.push(Observation::new(window_end, f64::NAN, Status::Missing));
            window_end += period;
        }
    }

    out.observations = observations;
    out
}
