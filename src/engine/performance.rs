//! Per-vehicle performance model.
//!
//! Turns a vehicle's resolved attributes and a circuit into lap speeds,
//! a straight/corner distance split, a skill penalty and a total time.
//! Pure arithmetic on `f64`, no rounding of intermediate values.

use super::error::{InvalidPerformanceError, Metric};
use super::types::{Circuit, VehicleEntry};

/// Skill assumed for a vehicle with no driver skill
pub const DEFAULT_DRIVER_SKILL: f64 = 85.0;

pub const BASE_STRAIGHT_SPEED: f64 = 200.0;
pub const POWER_SPEED_FACTOR: f64 = 3.0;
pub const SKILL_SPEED_FACTOR: f64 = 0.2;
pub const BASE_CORNER_SPEED: f64 = 90.0;
pub const GRIP_SPEED_FACTOR: f64 = 2.0;

/// Track length attributed to each corner
pub const CORNER_DISTANCE_KM: f64 = 0.5;
pub const CORNER_PENALTY_SECONDS: f64 = 40.0;
pub const SKILL_PENALTY_SCALE: f64 = 100.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Derived metrics for one vehicle on one circuit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    /// km/h
    pub straight_speed: f64,
    /// km/h
    pub corner_speed: f64,
    pub straight_distance_km: f64,
    pub corner_distance_km: f64,
    pub driver_skill: f64,
    pub penalty_seconds: f64,
    pub total_time_seconds: f64,
}

/// `200 + 3·P + 0.2·H − A`
pub fn straight_speed(power: f64, aerodynamics: f64, skill: f64) -> f64 {
    BASE_STRAIGHT_SPEED + POWER_SPEED_FACTOR * power + SKILL_SPEED_FACTOR * skill - aerodynamics
}

/// `90 + 2·A + 2·M + 0.2·H`
pub fn corner_speed(aerodynamics: f64, handling: f64, skill: f64) -> f64 {
    BASE_CORNER_SPEED
        + GRIP_SPEED_FACTOR * aerodynamics
        + GRIP_SPEED_FACTOR * handling
        + SKILL_SPEED_FACTOR * skill
}

pub fn corner_distance(corner_count: u32) -> f64 {
    corner_count as f64 * CORNER_DISTANCE_KM
}

/// Clamped at zero when the corners alone are longer than the track
pub fn straight_distance(distance_km: f64, corner_distance_km: f64) -> f64 {
    (distance_km - corner_distance_km).max(0.0)
}

/// `(C × 40) / (1 + H/100)`
pub fn skill_penalty(corner_count: u32, skill: f64) -> f64 {
    (corner_count as f64 * CORNER_PENALTY_SECONDS) / (1.0 + skill / SKILL_PENALTY_SCALE)
}

/// Run the model for one vehicle.
///
/// Fails when a speed is zero, negative or not finite; dividing by it
/// would otherwise produce `inf`/`NaN` times.
pub fn evaluate_vehicle(
    vehicle: &VehicleEntry,
    circuit: &Circuit,
) -> Result<Performance, InvalidPerformanceError> {
    let skill = vehicle.driver_skill.unwrap_or(DEFAULT_DRIVER_SKILL);

    let straight = straight_speed(vehicle.power, vehicle.aerodynamics, skill);
    ensure_positive(vehicle, Metric::StraightSpeed, straight)?;
    let corner = corner_speed(vehicle.aerodynamics, vehicle.handling, skill);
    ensure_positive(vehicle, Metric::CornerSpeed, corner)?;

    let corner_distance_km = corner_distance(circuit.corner_count);
    let straight_distance_km = straight_distance(circuit.distance_km, corner_distance_km);
    let penalty_seconds = skill_penalty(circuit.corner_count, skill);

    let time_hours = straight_distance_km / straight + corner_distance_km / corner;
    let total_time_seconds = time_hours * SECONDS_PER_HOUR + penalty_seconds;
    if !total_time_seconds.is_finite() {
        return Err(InvalidPerformanceError {
            vehicle_id: vehicle.vehicle_id.clone(),
            metric: Metric::TotalTime,
            value: total_time_seconds,
        });
    }

    Ok(Performance {
        straight_speed: straight,
        corner_speed: corner,
        straight_distance_km,
        corner_distance_km,
        driver_skill: skill,
        penalty_seconds,
        total_time_seconds,
    })
}

fn ensure_positive(
    vehicle: &VehicleEntry,
    metric: Metric,
    speed: f64,
) -> Result<(), InvalidPerformanceError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(InvalidPerformanceError {
            vehicle_id: vehicle.vehicle_id.clone(),
            metric,
            value: speed,
        })
    }
}
