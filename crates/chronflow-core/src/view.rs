//! Transport-format (JSON) rendering of series, stats, and containers.
//!
//! Mirrors the original's `JSONFloat64`/`JSONDurationNS` pattern: sentinels
//! that are meaningful internally (`NaN`, `NotADuration`, `NotADate`)
//! render as JSON `null` rather than leaking an internal representation
//! across the wire.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::model::{Container, Series, Stats};
use crate::sentinel::{is_not_a_date, is_not_a_duration};

struct JsonFloat(f64);

impl Serialize for JsonFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

struct JsonDurationNs(i64);

impl Serialize for JsonDurationNs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if is_not_a_duration(self.0) {
            serializer.serialize_none()
        } else {
            serializer.serialize_i64(self.0)
        }
    }
}

struct JsonChron(DateTime<Utc>);

impl Serialize for JsonChron {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if is_not_a_date(self.0) {
            serializer.serialize_none()
        } else {
            serializer.serialize_str(&self.0.to_rfc3339())
        }
    }
}

#[derive(Serialize)]
pub struct StatsView {
    len: usize,
    nan_count: usize,

    chron_min: JsonChron,
    val_at_chron_min: JsonFloat,
    chron_max: JsonChron,
    val_at_chron_max: JsonFloat,
    chron_mean: JsonChron,
    chron_median: JsonChron,

    meas_min: JsonFloat,
    chron_at_meas_min: JsonChron,
    meas_max: JsonFloat,
    chron_at_meas_max: JsonChron,
    meas_mean: JsonFloat,
    meas_median: JsonFloat,
    meas_std: JsonFloat,

    dchron_min: JsonDurationNs,
    chron_at_dchron_min: JsonChron,
    dchron_max: JsonDurationNs,
    chron_at_dchron_max: JsonChron,
    dchron_mean: JsonFloat,
    dchron_median: JsonFloat,
    dchron_std: JsonFloat,

    dmeas_min: JsonFloat,
    dmeas_max: JsonFloat,
    dmeas_mean: JsonFloat,
    dmeas_median: JsonFloat,
    dmeas_std: JsonFloat,
}

impl From<&Stats> for StatsView {
    fn from(s: &Stats) -> Self {
        StatsView {
            len: s.len,
            nan_count: s.nan_count,
            chron_min: JsonChron(s.chron_min),
            val_at_chron_min: JsonFloat(s.val_at_chron_min),
            chron_max: JsonChron(s.chron_max),
            val_at_chron_max: JsonFloat(s.val_at_chron_max),
            chron_mean: JsonChron(s.chron_mean),
            chron_median: JsonChron(s.chron_median),
            meas_min: JsonFloat(s.meas_min),
            chron_at_meas_min: JsonChron(s.chron_at_meas_min),
            meas_max: JsonFloat(s.meas_max),
            chron_at_meas_max: JsonChron(s.chron_at_meas_max),
            meas_mean: JsonFloat(s.meas_mean),
            meas_median: JsonFloat(s.meas_median),
            meas_std: JsonFloat(s.meas_std),
            dchron_min: JsonDurationNs(s.dchron_min),
            chron_at_dchron_min: JsonChron(s.chron_at_dchron_min),
            dchron_max: JsonDurationNs(s.dchron_max),
            chron_at_dchron_max: JsonChron(s.chron_at_dchron_max),
            dchron_mean: JsonFloat(s.dchron_mean),
            dchron_median: JsonFloat(s.dchron_median),
            dchron_std: JsonFloat(s.dchron_std),
            dmeas_min: JsonFloat(s.dmeas_min),
            dmeas_max: JsonFloat(s.dmeas_max),
            dmeas_mean: JsonFloat(s.dmeas_mean),
            dmeas_median: JsonFloat(s.dmeas_median),
            dmeas_std: JsonFloat(s.dmeas_std),
        }
    }
}

#[derive(Serialize)]
pub struct SeriesView {
    name: String,
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    chron: Vec<JsonChron>,
    meas: Vec<JsonFloat>,
    dchron_ns: Vec<JsonDurationNs>,
    dmeas: Vec<JsonFloat>,
    status: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<StatsView>,
}

/// Renders `series` as its column-oriented JSON view. The stats block is
/// only present when the series is non-empty.
pub fn render_series(series: &Series) -> SeriesView {
    SeriesView {
        name: series.name.clone(),
        id: series.mem_id,
        comment: if series.comment.is_empty() { None } else { Some(series.comment.clone()) },
        chron: series.observations.iter().map(|o| JsonChron(o.chron)).collect(),
        meas: series.observations.iter().map(|o| JsonFloat(o.meas)).collect(),
        dchron_ns: series.observations.iter().map(|o| JsonDurationNs(o.dchron)).collect(),
        dmeas: series.observations.iter().map(|o| JsonFloat(o.dmeas)).collect(),
        status: series.observations.iter().map(|o| o.status.as_str()).collect(),
        stats: if series.is_empty() { None } else { Some(StatsView::from(&series.stats)) },
    }
}

#[derive(Serialize)]
pub struct ContainerView {
    name: String,
    comment: String,
    series: std::collections::HashMap<String, SeriesView>,
}

pub fn render_container(container: &Container) -> ContainerView {
    ContainerView {
        name: container.name.clone(),
        comment: container.comment.clone(),
        series: container.series.iter().map(|(label, s)| (label.clone(), render_series(s))).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Observation, Status};
    use crate::stats;

    #[test]
    fn nan_measurement_renders_as_null() {
        let mut s = Series::with_observations("x", vec![Observation::new(Utc::now(), f64::NAN, Status::Missing)]);
        stats::recompute(&mut s);
        let view = render_series(&s);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["meas"][0].is_null());
    }

    #[test]
    fn empty_series_has_no_stats_block() {
        let s = Series::new("x");
        let view = render_series(&s);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("stats").is_none() || json["stats"].is_null());
    }

    #[test]
    fn stats_block_renders_values_at_chron_extremes() {
        let mut s = Series::with_observations(
            "x",
            vec![
                Observation::new(Utc::now(), 1.0, Status::Ok),
                Observation::new(Utc::now() + chrono::Duration::minutes(1), 3.0, Status::Ok),
            ],
        );
        stats::recompute(&mut s);
        let view = render_series(&s);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["stats"]["val_at_chron_min"], 1.0);
        assert_eq!(json["stats"]["val_at_chron_max"], 3.0);
    }

    #[test]
    fn first_observation_dchron_renders_as_null() {
        let mut s = Series::with_observations("x", vec![Observation::new(Utc::now(), 1.0, Status::Ok)]);
        stats::recompute(&mut s);
        let view = render_series(&s);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["dchron_ns"][0].is_null());
        assert!(json["dmeas"][0].is_null());
    }
}
