//! Drops non-transition observations from step/level signals.

use crate::model::Series;

/// Drops every observation where `dmeas == 0` exactly. If that would empty
/// the series, the original last observation is kept instead — an empty
/// result is never useful and the last point is at least a valid anchor.
///
/// Assumes `series` has already been through [`crate::stats::recompute`]
/// so `dmeas` is current.
pub fn reduce(series: &Series) -> Series {
    let kept: Vec<_> = series
        .observations
        .iter()
        .filter(|o| o.dmeas != 0.0)
        .copied()
        .collect();

    let mut out = Series::new(series.name.clone());
    if kept.is_empty() {
        if let Some(last) = series.observations.last() {
            out.observations.push(*last);
        }
    } else {
        out.observations = kept;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Observation, Status};
    use crate::stats;
    use chrono::{Duration, TimeZone, Utc};

    fn series(values: &[f64]) -> Series {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut s = Series::with_observations(
            "x",
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Observation::new(base + Duration::minutes(i as i64), v, Status::Ok))
                .collect(),
        );
        stats::recompute(&mut s);
        s
    }

    #[test]
    fn s5_reduce_keeps_only_transitions() {
        let s = series(&[1.0, 1.0, 1.0, 2.0, 2.0, 3.0]);
        let out = reduce(&s);
        let meas: Vec<f64> = out.observations.iter().map(|o| o.meas).collect();
        assert_eq!(meas, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn reduce_keeps_last_observation_when_fully_flat() {
        let s = series(&[5.0, 5.0, 5.0]);
        let out = reduce(&s);
        assert_eq!(out.observations.len(), 1);
        assert_eq!(out.observations[0].meas, 5.0);
    }
}
