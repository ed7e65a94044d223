use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::{
    resolve_inputs, simulate, Circuit, NoSkills, RawCircuit, RawVehicle, SimulationError,
    SimulationRecord, ValidationError, VehicleEntry,
};

/// A race definition file.
///
/// Example YAML:
/// ```yaml
/// circuit:
///   name: Monza
///   distance_km: 5.793
///   corners: 11
/// skills:
///   leclerc: 92
/// vehicles:
///   - id: car-16
///     driver: leclerc
///     parts:
///       - { name: engine, power: 30 }
///       - { name: floor, aerodynamics: 32, handling: 32 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RaceFile {
    pub circuit: RawCircuit,

    /// Driver skill table, keyed by the vehicles' `driver` field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<BTreeMap<String, f64>>,

    #[serde(default)]
    pub vehicles: Vec<RawVehicle>,
}

impl RaceFile {
    pub fn resolve(&self) -> Result<(Circuit, Vec<VehicleEntry>), ValidationError> {
        match &self.skills {
            Some(skills) => resolve_inputs(&self.circuit, &self.vehicles, skills),
            None => resolve_inputs(&self.circuit, &self.vehicles, &NoSkills),
        }
    }

    pub fn simulate(&self) -> Result<SimulationRecord, SimulationError> {
        match &self.skills {
            Some(skills) => simulate(&self.circuit, &self.vehicles, skills),
            None => simulate(&self.circuit, &self.vehicles, &NoSkills),
        }
    }
}
