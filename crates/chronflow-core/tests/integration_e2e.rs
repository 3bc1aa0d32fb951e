//! End-to-end exercises of the conditioning pipeline against the public
//! `chronflow_core` API, covering the scenarios a request layer actually
//! drives: simulate a series, store it, run a multi-stage conditioning
//! request against its handle, and check the labeled container that comes
//! back.

use chrono::{Duration, TimeZone, Utc};

use chronflow_core::pipeline::{CleanStage, ConditioningRequest};
use chronflow_core::{pipeline, simulate, stats, store::Store, Observation, Series, Status};

#[test]
fn simulate_store_and_condition_round_trip() {
    let store = Store::new();
    let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut series = simulate::bulk_simul("demo", from, Duration::seconds(60), 20, 10.0, 1.0, 5.0);
    stats::recompute(&mut series);
    series.mem_id = store.new_mem_id();
    store.save(series.clone());

    let req = ConditioningRequest {
        mem_id: series.mem_id,
        reduce: false,
        freq_seconds: Some(60),
        agg: Some("average".to_string()),
        method1: CleanStage { method: Some("zScore".to_string()), lvl: Some(3.0), ..Default::default() },
        method2: CleanStage::default(),
        interp: Some("Linear".to_string()),
    };

    let container = pipeline::run(&req, &store).unwrap();
    assert!(container.series.contains_key("Pre Reg Cleaned"));
    assert!(container.series.contains_key("Pre Reg Rejected"));
    assert!(container.series.contains_key("Regularized"));
    assert!(container.series.contains_key("Interpolated"));

    for (_, s) in &container.series {
        assert_ne!(s.mem_id, 0, "every intermediate must get a fresh handle");
    }
}

#[test]
fn unknown_handle_short_circuits_with_not_found() {
    let store = Store::new();
    let req = ConditioningRequest { mem_id: 9999, ..Default::default() };
    assert!(pipeline::run(&req, &store).is_err());
}

#[test]
fn reduce_then_interpolate_pipeline() {
    let store = Store::new();
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut series = Series::with_observations(
        "levels",
        (0..6)
            .map(|i| {
                let v = match i {
                    0..=2 => 1.0,
                    3 | 4 => 2.0,
                    _ => 3.0,
                };
                Observation::new(base + Duration::minutes(i), v, Status::Ok)
            })
            .collect(),
    );
    stats::recompute(&mut series);
    series.mem_id = store.new_mem_id();
    store.save(series);

    let req = ConditioningRequest {
        mem_id: 1,
        reduce: true,
        ..Default::default()
    };
    let container = pipeline::run(&req, &store).unwrap();
    let reduced = &container.series["Reduced"];
    let meas: Vec<f64> = reduced.observations.iter().map(|o| o.meas).collect();
    assert_eq!(meas, vec![1.0, 2.0, 3.0]);
}
