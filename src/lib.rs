//! Race scoring engine and the plumbing around it.
//!
//! The [`engine`] module is pure: it resolves raw circuit and vehicle
//! attributes, runs the performance model and ranks the field. [`config`],
//! [`store`] and [`output`] read race files, persist records and format
//! results for the `race-sim` binary.

pub mod config;
pub mod engine;
pub mod output;
pub mod store;
pub mod telemetry;

pub use engine::{
    evaluate_race, resolve_inputs, simulate, Circuit, EmptyRaceError, InvalidPerformanceError,
    SimulationError, SimulationRecord, ValidationError, VehicleEntry, VehicleResult,
};
