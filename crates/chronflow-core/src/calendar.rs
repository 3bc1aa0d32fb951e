//! Calendar-anchored downsampling: day/week/month/year bucketing.
//!
//! Unlike [`crate::regularize`], bucket boundaries follow the calendar
//! rather than a fixed duration — a monthly bucket is however many days
//! that month actually has. Buckets are anchored to the first observation
//! and collapse to UTC (this port standardizes on `DateTime<Utc>`, so the
//! original's "first observation's location" anchor is just UTC calendar
//! arithmetic here). Like the regularizer, each bucket is reduced by a
//! caller-supplied aggregator rather than a fixed mean.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::aggregate::AggFn;
use crate::model::{Observation, Series, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

fn bucket_start(t: DateTime<Utc>, period: CalendarPeriod) -> DateTime<Utc> {
    let date = t.date_naive();
    match period {
        CalendarPeriod::Daily => midnight(date),
        CalendarPeriod::Weekly => {
            let offset = date.weekday().num_days_from_monday() as i64;
            midnight(date - Duration::days(offset))
        }
        CalendarPeriod::Monthly => midnight(NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()),
        CalendarPeriod::Yearly => midnight(NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap()),
    }
}

fn next_bucket_start(start: DateTime<Utc>, period: CalendarPeriod) -> DateTime<Utc> {
    match period {
        CalendarPeriod::Daily => start + Duration::days(1),
        CalendarPeriod::Weekly => start + Duration::days(7),
        CalendarPeriod::Monthly => {
            let d = start.date_naive();
            let (y, m) = if d.month() == 12 { (d.year() + 1, 1) } else { (d.year(), d.month() + 1) };
            midnight(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
        }
        CalendarPeriod::Yearly => midnight(NaiveDate::from_ymd_opt(start.date_naive().year() + 1, 1, 1).unwrap()),
    }
}

/// Downsamples `series` into calendar buckets of `period`, reducing each
/// bucket's non-`NaN` measurements with `agg`. Output timestamp is the last
/// representable instant of the bucket; empty buckets emit `NaN` without
/// calling `agg`.
pub fn downsample(series: &Series, period: CalendarPeriod, agg: &mut AggFn) -> Series {
    let mut out = Series::new(series.name.clone());
    if series.is_empty() {
        return out;
    }

    let mut obs = series.observations.clone();
    obs.sort_by(|a, b| a.chron.cmp(&b.chron));

    let last = obs.last().unwrap().chron;
    let mut start = bucket_start(obs[0].chron, period);
    let n = obs.len();
    let mut i = 0usize;
    let mut observations = Vec::new();

    while start <= last {
        let next_start = next_bucket_start(start, period);
        let mut window = Vec::new();
        while i < n && obs[i].chron < next_start {
            window.push(obs[i].meas);
            i += 1;
        }
        let stamp = next_start - Duration::nanoseconds(1);
        let meas = if window.is_empty() { f64::NAN } else { agg(&window) };
        let status = if window.is_empty() { Status::Missing } else { Status::Ok };
        observations.push(Observation::new(stamp, meas, status));
        start = next_start;
    }

    out.observations = observations;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, 0).unwrap()
    }

    #[test]
    fn daily_bucket_emits_last_instant_of_day() {
        let s = Series::with_observations(
            "x",
            vec![
                Observation::new(ts(2024, 1, 1, 10, 0), 1.0, Status::Ok),
                Observation::new(ts(2024, 1, 1, 14, 0), 3.0, Status::Ok),
            ],
        );
        let mut agg = aggregate::average();
        let out = downsample(&s, CalendarPeriod::Daily, &mut agg);
        assert_eq!(out.observations.len(), 1);
        assert_eq!(out.observations[0].meas, 2.0);
        assert_eq!(out.observations[0].chron, ts(2024, 1, 2, 0, 0) - Duration::nanoseconds(1));
    }

    #[test]
    fn weekly_bucket_anchors_monday() {
        // 2024-01-03 is a Wednesday; the ISO week starts 2024-01-01 (Monday).
        let s = Series::with_observations("x", vec![Observation::new(ts(2024, 1, 3, 12, 0), 5.0, Status::Ok)]);
        let mut agg = aggregate::average();
        let out = downsample(&s, CalendarPeriod::Weekly, &mut agg);
        assert_eq!(out.observations.len(), 1);
        assert_eq!(out.observations[0].chron, ts(2024, 1, 8, 0, 0) - Duration::nanoseconds(1));
    }

    #[test]
    fn empty_bucket_between_observations_is_nan() {
        let s = Series::with_observations(
            "x",
            vec![
                Observation::new(ts(2024, 1, 1, 10, 0), 1.0, Status::Ok),
                Observation::new(ts(2024, 1, 3, 10, 0), 3.0, Status::Ok),
            ],
        );
        let mut agg = aggregate::average();
        let out = downsample(&s, CalendarPeriod::Daily, &mut agg);
        assert_eq!(out.observations.len(), 3);
        assert!(out.observations[1].meas.is_nan());
    }

    #[test]
    fn maximum_aggregator_reduces_bucket_to_its_largest_value() {
        let s = Series::with_observations(
            "x",
            vec![
                Observation::new(ts(2024, 1, 1, 10, 0), 1.0, Status::Ok),
                Observation::new(ts(2024, 1, 1, 14, 0), 7.0, Status::Ok),
                Observation::new(ts(2024, 1, 1, 18, 0), 3.0, Status::Ok),
            ],
        );
        let mut agg = aggregate::maximum();
        let out = downsample(&s, CalendarPeriod::Daily, &mut agg);
        assert_eq!(out.observations[0].meas, 7.0);
    }
}
