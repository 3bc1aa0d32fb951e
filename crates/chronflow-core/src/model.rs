//! The core data model: observations, series, containers, and the status
//! enum that travels with each observation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::sentinel::{not_a_date, NOT_A_DURATION};

/// Disposition of a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ok,
    Missing,
    Outlier,
    Invalid,
    Rejected,
    Simulated,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Missing => "missing",
            Status::Outlier => "outlier",
            Status::Invalid => "invalid",
            Status::Rejected => "rejected",
            Status::Simulated => "simulated",
        }
    }
}

/// A single timestamped measurement.
///
/// `dchron`/`dmeas` are derived fields — not authoritative. They are
/// overwritten whenever the owning series' [`crate::stats::recompute`] runs;
/// don't rely on them being in sync if you mutate a series' observations
/// directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub chron: DateTime<Utc>,
    pub meas: f64,
    pub dchron: i64,
    pub dmeas: f64,
    pub status: Status,
}

impl Observation {
    /// Constructs an observation with deltas left at their "not yet
    /// computed" sentinel values; a `recompute` pass fills them in.
    pub fn new(chron: DateTime<Utc>, meas: f64, status: Status) -> Self {
        Observation {
            chron,
            meas,
            dchron: NOT_A_DURATION,
            dmeas: f64::NAN,
            status,
        }
    }
}

/// The summary block a series carries alongside its observations.
///
/// All fields are zeroed / sentinel-valued for an empty series. Populated
/// exclusively by [`crate::stats::recompute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub len: usize,
    pub nan_count: usize,

    pub chron_min: DateTime<Utc>,
    pub val_at_chron_min: f64,
    pub chron_max: DateTime<Utc>,
    pub val_at_chron_max: f64,
    pub chron_mean: DateTime<Utc>,
    pub chron_median: DateTime<Utc>,

    pub meas_min: f64,
    pub chron_at_meas_min: DateTime<Utc>,
    pub meas_max: f64,
    pub chron_at_meas_max: DateTime<Utc>,
    pub meas_mean: f64,
    pub meas_median: f64,
    pub meas_std: f64,

    pub dchron_min: i64,
    pub chron_at_dchron_min: DateTime<Utc>,
    pub dchron_max: i64,
    pub chron_at_dchron_max: DateTime<Utc>,
    pub dchron_mean: f64,
    pub dchron_median: f64,
    pub dchron_std: f64,

    pub dmeas_min: f64,
    pub dmeas_max: f64,
    pub dmeas_mean: f64,
    pub dmeas_median: f64,
    pub dmeas_std: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            len: 0,
            nan_count: 0,
            chron_min: not_a_date(),
            val_at_chron_min: f64::NAN,
            chron_max: not_a_date(),
            val_at_chron_max: f64::NAN,
            chron_mean: not_a_date(),
            chron_median: not_a_date(),
            meas_min: f64::NAN,
            chron_at_meas_min: not_a_date(),
            meas_max: f64::NAN,
            chron_at_meas_max: not_a_date(),
            meas_mean: f64::NAN,
            meas_median: f64::NAN,
            meas_std: f64::NAN,
            dchron_min: NOT_A_DURATION,
            chron_at_dchron_min: not_a_date(),
            dchron_max: NOT_A_DURATION,
            chron_at_dchron_max: not_a_date(),
            dchron_mean: f64::NAN,
            dchron_median: f64::NAN,
            dchron_std: f64::NAN,
            dmeas_min: f64::NAN,
            dmeas_max: f64::NAN,
            dmeas_mean: f64::NAN,
            dmeas_median: f64::NAN,
            dmeas_std: f64::NAN,
        }
    }
}

/// An ordered sequence of observations plus metadata and cached stats.
///
/// `stats` is only trustworthy immediately after a `recompute` call — any
/// direct mutation of `observations` invalidates it until the next pass.
#[derive(Debug, Clone)]
pub struct Series {
    pub mem_id: u64,
    pub name: String,
    pub comment: String,
    pub observations: Vec<Observation>,
    pub stats: Stats,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Series {
            mem_id: 0,
            name: name.into(),
            comment: String::new(),
            observations: Vec::new(),
            stats: Stats::default(),
        }
    }

    pub fn with_observations(name: impl Into<String>, observations: Vec<Observation>) -> Self {
        Series {
            mem_id: 0,
            name: name.into(),
            comment: String::new(),
            observations,
            stats: Stats::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Deep copy of the series under a new, unassigned handle. Used by the
    /// pipeline to branch a working series at each stage without aliasing
    /// the one already in the store.
    pub fn duplicate(&self) -> Series {
        Series {
            mem_id: 0,
            name: self.name.clone(),
            comment: self.comment.clone(),
            observations: self.observations.clone(),
            stats: self.stats,
        }
    }
}

/// A named mapping from stage label to series, returned by the pipeline.
#[derive(Debug, Clone)]
pub struct Container {
    pub name: String,
    pub comment: String,
    pub series: HashMap<String, Series>,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Container {
            name: name.into(),
            comment: String::new(),
            series: HashMap::new(),
        }
    }

    pub fn insert(&mut self, label: impl Into<String>, series: Series) {
        self.series.insert(label.into(), series);
    }
}
