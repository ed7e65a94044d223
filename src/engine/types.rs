use serde::{Deserialize, Serialize};

use super::error::{InvalidPerformanceError, ValidationError};
use super::performance::Performance;
use super::resolver::RawCircuit;

/// Track geometry for one race evaluation.
///
/// Fixed at construction. Deserializing goes through the same validation
/// as [`Circuit::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct Circuit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    pub(crate) distance_km: f64,
    #[serde(rename = "corners")]
    pub(crate) corner_count: u32,
}

impl Circuit {
    pub fn new(distance_km: f64, corner_count: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            name: None,
            distance_km: check_positive("distance_km", distance_km)?,
            corner_count,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn corner_count(&self) -> u32 {
        self.corner_count
    }
}

impl TryFrom<RawCircuit> for Circuit {
    type Error = ValidationError;

    fn try_from(raw: RawCircuit) -> Result<Self, Self::Error> {
        super::resolver::resolve_circuit(&raw)
    }
}

/// One car entered in a race, reduced to the attributes the model reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleEntry {
    pub(crate) vehicle_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) driver: Option<String>,
    pub(crate) power: f64,
    pub(crate) aerodynamics: f64,
    pub(crate) handling: f64,
    /// `None` means the model's default skill applies
    pub(crate) driver_skill: Option<f64>,
}

impl VehicleEntry {
    pub fn new(
        vehicle_id: impl Into<String>,
        power: f64,
        aerodynamics: f64,
        handling: f64,
    ) -> Result<Self, ValidationError> {
        let vehicle_id = vehicle_id.into();
        if vehicle_id.trim().is_empty() {
            return Err(ValidationError::EmptyId {
                field: "vehicle_id".to_string(),
            });
        }
        Ok(Self {
            vehicle_id,
            driver: None,
            power: check_non_negative("power", power)?,
            aerodynamics: check_non_negative("aerodynamics", aerodynamics)?,
            handling: check_non_negative("handling", handling)?,
            driver_skill: None,
        })
    }

    pub fn with_skill(mut self, skill: f64) -> Result<Self, ValidationError> {
        self.driver_skill = Some(check_non_negative("driver_skill", skill)?);
        Ok(self)
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn aerodynamics(&self) -> f64 {
        self.aerodynamics
    }

    pub fn handling(&self) -> f64 {
        self.handling
    }

    pub fn driver_skill(&self) -> Option<f64> {
        self.driver_skill
    }
}

/// Outcome of one vehicle in one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleResult {
    pub vehicle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    pub position: u32,
    pub straight_speed: f64,
    pub corner_speed: f64,
    pub straight_distance_km: f64,
    pub corner_distance_km: f64,
    /// Skill the model used, default applied
    pub driver_skill: f64,
    pub penalty_seconds: f64,
    pub total_time_seconds: f64,
}

impl VehicleResult {
    pub(crate) fn new(vehicle: &VehicleEntry, performance: Performance, position: u32) -> Self {
        Self {
            vehicle_id: vehicle.vehicle_id.clone(),
            driver: vehicle.driver.clone(),
            position,
            straight_speed: performance.straight_speed,
            corner_speed: performance.corner_speed,
            straight_distance_km: performance.straight_distance_km,
            corner_distance_km: performance.corner_distance_km,
            driver_skill: performance.driver_skill,
            penalty_seconds: performance.penalty_seconds,
            total_time_seconds: performance.total_time_seconds,
        }
    }

    /// Driver name when known, otherwise the vehicle id
    pub fn label(&self) -> &str {
        self.driver.as_deref().unwrap_or(&self.vehicle_id)
    }
}

/// Ranked outcome of one race evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    circuit: Circuit,
    results: Vec<VehicleResult>,
    #[serde(default)]
    skipped: Vec<InvalidPerformanceError>,
}

impl SimulationRecord {
    pub(crate) fn new(
        circuit: Circuit,
        results: Vec<VehicleResult>,
        skipped: Vec<InvalidPerformanceError>,
    ) -> Self {
        Self {
            circuit,
            results,
            skipped,
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Results in finishing order
    pub fn results(&self) -> &[VehicleResult] {
        &self.results
    }

    /// Vehicles rejected by the model, in entry order
    pub fn skipped(&self) -> &[InvalidPerformanceError] {
        &self.skipped
    }

    pub fn winner(&self) -> Option<&VehicleResult> {
        self.results.first()
    }

    pub fn result_for(&self, vehicle_id: &str) -> Option<&VehicleResult> {
        self.results.iter().find(|r| r.vehicle_id == vehicle_id)
    }

    /// Seconds behind the winner
    pub fn gap_to_leader(&self, result: &VehicleResult) -> f64 {
        match self.winner() {
            Some(leader) => result.total_time_seconds - leader.total_time_seconds,
            None => 0.0,
        }
    }

    /// Check that positions run 1..N in order and times never decrease.
    /// Records built by the evaluator always pass; this guards records
    /// read back from disk.
    pub fn check_ranking(&self) -> Result<(), String> {
        if self.results.is_empty() {
            return Err("record has no results".to_string());
        }
        for (idx, result) in self.results.iter().enumerate() {
            let expected = idx as u32 + 1;
            if result.position != expected {
                return Err(format!(
                    "results[{}]: position {} where {} was expected",
                    idx, result.position, expected
                ));
            }
            if idx > 0 && self.results[idx - 1].total_time_seconds > result.total_time_seconds {
                return Err(format!(
                    "results[{}]: total time {} is faster than the car ahead",
                    idx, result.total_time_seconds
                ));
            }
        }
        Ok(())
    }
}

pub(crate) fn check_non_negative(field: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

pub(crate) fn check_positive(field: &str, value: f64) -> Result<f64, ValidationError> {
    let value = check_non_negative(field, value)?;
    if value == 0.0 {
        return Err(ValidationError::NotPositive {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}
