//! Race scoring engine.
//!
//! [`resolve_inputs`] turns raw attribute bags into a validated [`Circuit`]
//! and [`VehicleEntry`] list; [`evaluate_race`] runs the performance model
//! for every vehicle and ranks them into a [`SimulationRecord`].

pub mod error;
pub mod evaluator;
pub mod performance;
pub mod resolver;
pub mod types;

pub use error::{EmptyRaceError, InvalidPerformanceError, Metric, SimulationError, ValidationError};
pub use evaluator::evaluate_race;
pub use performance::{evaluate_vehicle, Performance, DEFAULT_DRIVER_SKILL};
pub use resolver::{
    resolve_circuit, resolve_inputs, resolve_vehicle, NoSkills, RawCircuit, RawPart, RawVehicle,
    SkillFn, SkillLookup,
};
pub use types::{Circuit, SimulationRecord, VehicleEntry, VehicleResult};

/// Resolve raw inputs and evaluate the race in one call
pub fn simulate<L>(
    raw_circuit: &RawCircuit,
    raw_vehicles: &[RawVehicle],
    skills: &L,
) -> Result<SimulationRecord, SimulationError>
where
    L: SkillLookup + ?Sized,
{
    let (circuit, vehicles) = resolve_inputs(raw_circuit, raw_vehicles, skills)?;
    Ok(evaluate_race(&circuit, &vehicles)?)
}
