use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Malformed or missing race input. Resolution stops at the first one.
///
/// Every variant carries the path of the offending field, e.g.
/// `circuit.distance_km` or `vehicles[2].parts[0].power`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field}: required value is missing")]
    Missing { field: String },

    #[error("{field}: must be non-negative, got {value}")]
    Negative { field: String, value: f64 },

    #[error("{field}: must be a finite number")]
    NotFinite { field: String },

    #[error("{field}: must be greater than zero, got {value}")]
    NotPositive { field: String, value: f64 },

    #[error("{field}: {value} is out of range")]
    OutOfRange { field: String, value: i64 },

    #[error("{field}: vehicle id must not be empty")]
    EmptyId { field: String },

    #[error("{field}: duplicate vehicle id '{id}'")]
    DuplicateVehicle { field: String, id: String },

    #[error("vehicles: at least one vehicle is required")]
    NoVehicles,
}

impl ValidationError {
    /// Path of the field that failed validation
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::Negative { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::EmptyId { field }
            | ValidationError::DuplicateVehicle { field, .. } => field,
            ValidationError::NoVehicles => "vehicles",
        }
    }
}

/// Which derived quantity left the model's operating range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    StraightSpeed,
    CornerSpeed,
    TotalTime,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::StraightSpeed => "straight speed",
            Metric::CornerSpeed => "corner speed",
            Metric::TotalTime => "total time",
        };
        f.write_str(name)
    }
}

/// A single vehicle whose attributes produce a non-positive or non-finite
/// speed. The evaluator drops the vehicle and keeps this as a diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("vehicle '{vehicle_id}': {metric} is {value}, outside the model's valid range")]
pub struct InvalidPerformanceError {
    pub vehicle_id: String,
    pub metric: Metric,
    /// Non-finite values are written to JSON as `null`
    #[serde(deserialize_with = "null_as_nan")]
    pub value: f64,
}

fn null_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Every vehicle of a race was rejected by the performance model.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("no vehicle finished the race: {entries} entered, {} rejected", .skipped.len())]
pub struct EmptyRaceError {
    pub entries: usize,
    pub skipped: Vec<InvalidPerformanceError>,
}

/// Failure of the resolve-then-evaluate pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid race input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    EmptyRace(#[from] EmptyRaceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = ValidationError::Negative {
            field: "vehicles[1].power".to_string(),
            value: -3.0,
        };
        assert_eq!(err.field(), "vehicles[1].power");
        assert_eq!(err.to_string(), "vehicles[1].power: must be non-negative, got -3");
    }

    #[test]
    fn test_no_vehicles_field() {
        assert_eq!(ValidationError::NoVehicles.field(), "vehicles");
    }

    #[test]
    fn test_invalid_performance_message() {
        let err = InvalidPerformanceError {
            vehicle_id: "car-7".to_string(),
            metric: Metric::CornerSpeed,
            value: -12.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("car-7"));
        assert!(msg.contains("corner speed"));
        assert!(msg.contains("-12.5"));
    }

    #[test]
    fn test_empty_race_message_counts() {
        let err = EmptyRaceError {
            entries: 2,
            skipped: vec![
                InvalidPerformanceError {
                    vehicle_id: "a".to_string(),
                    metric: Metric::StraightSpeed,
                    value: 0.0,
                },
                InvalidPerformanceError {
                    vehicle_id: "b".to_string(),
                    metric: Metric::StraightSpeed,
                    value: -1.0,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "no vehicle finished the race: 2 entered, 2 rejected"
        );
    }

    #[test]
    fn test_non_finite_value_reads_back_from_null() {
        let err = InvalidPerformanceError {
            vehicle_id: "x".to_string(),
            metric: Metric::TotalTime,
            value: f64::INFINITY,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"value\":null"));
        let parsed: InvalidPerformanceError = serde_json::from_str(&json).unwrap();
        assert!(parsed.value.is_nan());
        assert_eq!(parsed.metric, Metric::TotalTime);
    }

    #[test]
    fn test_simulation_error_from_validation() {
        let err: SimulationError = ValidationError::NoVehicles.into();
        assert!(matches!(err, SimulationError::Validation(_)));
        assert!(err.to_string().starts_with("invalid race input"));
    }
}
