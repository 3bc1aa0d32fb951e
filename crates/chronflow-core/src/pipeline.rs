//! Orchestrates the conditioning pipeline: Reduce → pre-regularization
//! Cleaning → Regularization → post-regularization Cleaning →
//! Interpolation, with every intermediate stored under a fresh handle and
//! collected into a labeled container.

use chrono::Duration;

use crate::aggregate;
use crate::clean::{self, CleanParams};
use crate::error::{Error, Result};
use crate::interpolate;
use crate::model::{Container, Series};
use crate::reduce;
use crate::regularize;
use crate::stats;
use crate::store::Store;

fn is_unset(name: &Option<String>) -> bool {
    matches!(name.as_deref(), None | Some("") | Some("none") | Some("None"))
}

/// Parameters for one cleaning stage, as carried by a conditioning request.
#[derive(Debug, Clone, Default)]
pub struct CleanStage {
    pub method: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub percent: Option<f64>,
    pub lvl: Option<f64>,
}

impl CleanStage {
    fn params(&self) -> CleanParams {
        CleanParams { min: self.min, max: self.max, percent: self.percent, level: self.lvl }
    }
}

/// The pipeline entry point's request shape: which series to load, and
/// which stages to run against it.
#[derive(Debug, Clone, Default)]
pub struct ConditioningRequest {
    pub mem_id: u64,
    pub reduce: bool,
    pub freq_seconds: Option<i64>,
    pub agg: Option<String>,
    pub method1: CleanStage,
    pub method2: CleanStage,
    pub interp: Option<String>,
}

fn commit(store: &Store, container: &mut Container, label: &str, mut series: Series) -> Series {
    stats::recompute(&mut series);
    series.mem_id = store.new_mem_id();
    tracing::debug!(stage = label, mem_id = series.mem_id, len = series.len(), "stage committed");
    store.save(series.clone());
    container.insert(label, series.clone());
    series
}

/// Runs the conditioning pipeline described by `req` against `store`,
/// returning the labeled container of every stage that ran.
///
/// Short-circuits with `BadInput` on an unrecognized method name — no
/// partial container is returned in that case.
pub fn run(req: &ConditioningRequest, store: &Store) -> Result<Container> {
    tracing::debug!(mem_id = req.mem_id, "starting conditioning pipeline");
    let mut working = store
        .get(req.mem_id)
        .ok_or_else(|| Error::not_found(format!("no series with mem_id {}", req.mem_id)))?;

    let mut container = Container::new(format!("Conditioned series {}", req.mem_id));

    if req.reduce {
        let reduced = reduce::reduce(&working);
        working = commit(store, &mut container, "Reduced", reduced);
    }

    if !is_unset(&req.method1.method) {
        let (cleaned, rejected) = clean::by_name(req.method1.method.as_deref().unwrap(), &working, req.method1.params())?;
        commit(store, &mut container, "Pre Reg Rejected", rejected);
        working = commit(store, &mut container, "Pre Reg Cleaned", cleaned);
    }

    if let (Some(freq), Some(agg_name)) = (req.freq_seconds, req.agg.as_deref()) {
        if freq > 0 && !matches!(agg_name, "" | "none" | "None") {
            let mut agg_fn = aggregate::by_name(agg_name, freq as f64)?;
            let regularized = regularize::regularize(&working, Duration::seconds(freq), &mut agg_fn);
            working = commit(store, &mut container, "Regularized", regularized);
        }
    }

    if !is_unset(&req.method2.method) {
        let (cleaned, rejected) = clean::by_name(req.method2.method.as_deref().unwrap(), &working, req.method2.params())?;
        commit(store, &mut container, "Post Reg Rejected", rejected);
        working = commit(store, &mut container, "Post Reg Cleaned", cleaned);
    }

    if !is_unset(&req.interp) {
        let method = interpolate::by_name(req.interp.as_deref().unwrap())?;
        let mut interpolated = working.duplicate();
        interpolate::interpolate(&mut interpolated, method);
        commit(store, &mut container, "Interpolated", interpolated);
    }

    Ok(container)
}
