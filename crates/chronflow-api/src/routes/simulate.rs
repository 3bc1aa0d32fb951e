//! `POST /simulate` — synthesizes a Gaussian-sampled series and stores it.

use axum::{Extension, Json};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use chronflow_core::store::Store;
use chronflow_core::{simulate, stats, view};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SimulationRequestDto {
    name: String,
    start: DateTime<Utc>,
    #[serde(rename = "periodSeconds")]
    period_seconds: i64,
    n: usize,
    mean: Option<f64>,
    #[serde(rename = "stdDev")]
    std_dev: Option<f64>,
    #[serde(default)]
    jitter: f64,
}

pub async fn simulate(
    Extension(store): Extension<&'static Store>,
    Json(dto): Json<SimulationRequestDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mean = dto.mean.ok_or_else(|| chronflow_core::Error::bad_input("mean is required"))?;
    let std_dev = dto.std_dev.ok_or_else(|| chronflow_core::Error::bad_input("stdDev is required"))?;

    let mut series = simulate::bulk_simul(
        dto.name,
        dto.start,
        Duration::seconds(dto.period_seconds),
        dto.n,
        mean,
        std_dev,
        dto.jitter,
    );
    stats::recompute(&mut series);
    series.mem_id = store.new_mem_id();
    store.save(series.clone());

    let rendered = view::render_series(&series);
    Ok(Json(serde_json::to_value(rendered).map_err(|e| chronflow_core::Error::internal(e.to_string()))?))
}
