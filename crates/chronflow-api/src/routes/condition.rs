//! `POST /condition` — the pipeline entry point: runs a configurable
//! sequence of conditioning stages against a stored series.

use axum::{Extension, Json};
use serde::Deserialize;

use chronflow_core::pipeline::{self, CleanStage, ConditioningRequest};
use chronflow_core::store::Store;
use chronflow_core::view;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ConditionRequestDto {
    mem_id: u64,
    #[serde(default)]
    reduce: bool,
    freq_seconds: Option<i64>,
    agg: Option<String>,

    method1: Option<String>,
    min1: Option<f64>,
    max1: Option<f64>,
    percent1: Option<f64>,
    lvl1: Option<f64>,

    method2: Option<String>,
    min2: Option<f64>,
    max2: Option<f64>,
    percent2: Option<f64>,
    lvl2: Option<f64>,

    interp: Option<String>,
}

impl From<ConditionRequestDto> for ConditioningRequest {
    fn from(dto: ConditionRequestDto) -> Self {
        ConditioningRequest {
            mem_id: dto.mem_id,
            reduce: dto.reduce,
            freq_seconds: dto.freq_seconds,
            agg: dto.agg,
            method1: CleanStage { method: dto.method1, min: dto.min1, max: dto.max1, percent: dto.percent1, lvl: dto.lvl1 },
            method2: CleanStage { method: dto.method2, min: dto.min2, max: dto.max2, percent: dto.percent2, lvl: dto.lvl2 },
            interp: dto.interp,
        }
    }
}

pub async fn condition(
    Extension(store): Extension<&'static Store>,
    Json(dto): Json<ConditionRequestDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let req: ConditioningRequest = dto.into();
    let container = pipeline::run(&req, store)?;
    let rendered = view::render_container(&container);
    Ok(Json(serde_json::to_value(rendered).map_err(|e| chronflow_core::Error::internal(e.to_string()))?))
}
