use tracing::{debug, info, warn};

use super::error::{EmptyRaceError, InvalidPerformanceError};
use super::performance::{evaluate_vehicle, Performance};
use super::types::{Circuit, SimulationRecord, VehicleEntry, VehicleResult};

type Outcome = Result<Performance, InvalidPerformanceError>;

/// Score every vehicle on the circuit and rank them by total time.
///
/// Vehicles the model rejects are left out of the ranking and listed in
/// [`SimulationRecord::skipped`]. Equal times keep their entry order.
pub fn evaluate_race(
    circuit: &Circuit,
    vehicles: &[VehicleEntry],
) -> Result<SimulationRecord, EmptyRaceError> {
    let outcomes = evaluate_all(circuit, vehicles);

    let mut finishers = Vec::with_capacity(vehicles.len());
    let mut skipped = Vec::new();
    for (vehicle, outcome) in vehicles.iter().zip(outcomes) {
        match outcome {
            Ok(performance) => {
                debug!(
                    vehicle = %vehicle.vehicle_id,
                    straight_speed = performance.straight_speed,
                    corner_speed = performance.corner_speed,
                    total_time_seconds = performance.total_time_seconds,
                    "vehicle evaluated"
                );
                finishers.push((vehicle, performance));
            }
            Err(err) => {
                warn!("skipping vehicle: {}", err);
                skipped.push(err);
            }
        }
    }

    if finishers.is_empty() {
        return Err(EmptyRaceError {
            entries: vehicles.len(),
            skipped,
        });
    }

    // sort_by is stable, ties stay in entry order
    finishers.sort_by(|a, b| a.1.total_time_seconds.total_cmp(&b.1.total_time_seconds));

    let results: Vec<VehicleResult> = finishers
        .into_iter()
        .enumerate()
        .map(|(idx, (vehicle, performance))| VehicleResult::new(vehicle, performance, idx as u32 + 1))
        .collect();

    info!(
        finishers = results.len(),
        skipped = skipped.len(),
        winner = %results[0].vehicle_id,
        "race evaluated"
    );

    Ok(SimulationRecord::new(circuit.clone(), results, skipped))
}

#[cfg(feature = "parallel")]
fn evaluate_all(circuit: &Circuit, vehicles: &[VehicleEntry]) -> Vec<Outcome> {
    use rayon::prelude::*;

    // Indexed collect keeps entry order
    vehicles
        .par_iter()
        .map(|vehicle| evaluate_vehicle(vehicle, circuit))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(circuit: &Circuit, vehicles: &[VehicleEntry]) -> Vec<Outcome> {
    vehicles
        .iter()
        .map(|vehicle| evaluate_vehicle(vehicle, circuit))
        .collect()
}
