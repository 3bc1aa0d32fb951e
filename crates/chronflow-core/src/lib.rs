//! Time-series conditioning engine.
//!
//! Takes raw, irregularly sampled numeric observations and turns them into
//! clean, regular, analyzable series through a configurable pipeline:
//! reduction, outlier cleaning, fixed-grid regularization, and gap
//! interpolation. See [`pipeline::run`] for the orchestrated entry point.

pub mod aggregate;
pub mod calendar;
pub mod clean;
pub mod error;
pub mod interpolate;
pub mod model;
pub mod numeric;
pub mod pipeline;
pub mod reduce;
pub mod regularize;
pub mod sentinel;
pub mod simulate;
pub mod stats;
pub mod store;
pub mod view;

pub use error::{Error, Result};
pub use model::{Container, Observation, Series, Stats, Status};
