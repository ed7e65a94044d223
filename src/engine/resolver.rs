use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::error::ValidationError;
use super::types::{check_non_negative, check_positive, Circuit, VehicleEntry};

/// Circuit attributes as supplied by the caller.
///
/// Example YAML:
/// ```yaml
/// circuit:
///   name: Monza
///   distance_km: 5.793
///   corners: 11
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawCircuit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Total track length, must be greater than zero
    #[serde(default)]
    pub distance_km: Option<f64>,

    /// Number of corners, must be non-negative
    #[serde(default)]
    pub corners: Option<i64>,
}

/// One installed part and the attributes it contributes
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aerodynamics: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handling: Option<f64>,
}

/// Vehicle attributes as supplied by the caller.
///
/// An explicit `power`/`aerodynamics`/`handling` wins over the part sum.
/// Skill is taken from `skill`, then from the skill lookup keyed by
/// `driver`, and otherwise left to the model default.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawVehicle {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aerodynamics: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handling: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<RawPart>,
}

/// Source of driver skill values, keyed by driver name
pub trait SkillLookup {
    fn skill_for(&self, driver: &str) -> Option<f64>;
}

/// Lookup that knows no drivers; every vehicle without an explicit skill
/// gets the model default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSkills;

impl SkillLookup for NoSkills {
    fn skill_for(&self, _driver: &str) -> Option<f64> {
        None
    }
}

impl SkillLookup for HashMap<String, f64> {
    fn skill_for(&self, driver: &str) -> Option<f64> {
        self.get(driver).copied()
    }
}

impl SkillLookup for BTreeMap<String, f64> {
    fn skill_for(&self, driver: &str) -> Option<f64> {
        self.get(driver).copied()
    }
}

impl<T: SkillLookup + ?Sized> SkillLookup for &T {
    fn skill_for(&self, driver: &str) -> Option<f64> {
        (**self).skill_for(driver)
    }
}

/// Adapts a closure into a [`SkillLookup`]
pub struct SkillFn<F>(pub F);

impl<F> SkillLookup for SkillFn<F>
where
    F: Fn(&str) -> Option<f64>,
{
    fn skill_for(&self, driver: &str) -> Option<f64> {
        (self.0)(driver)
    }
}

/// Build a validated circuit and vehicle list from raw attribute bags.
///
/// Stops at the first invalid field. Vehicle order is preserved.
pub fn resolve_inputs<L>(
    raw_circuit: &RawCircuit,
    raw_vehicles: &[RawVehicle],
    skills: &L,
) -> Result<(Circuit, Vec<VehicleEntry>), ValidationError>
where
    L: SkillLookup + ?Sized,
{
    let circuit = resolve_circuit(raw_circuit)?;

    if raw_vehicles.is_empty() {
        return Err(ValidationError::NoVehicles);
    }

    let mut seen = HashSet::new();
    let mut vehicles = Vec::with_capacity(raw_vehicles.len());
    for (index, raw) in raw_vehicles.iter().enumerate() {
        let entry = resolve_vehicle(index, raw, skills)?;
        if !seen.insert(entry.vehicle_id.clone()) {
            return Err(ValidationError::DuplicateVehicle {
                field: format!("vehicles[{}].id", index),
                id: entry.vehicle_id,
            });
        }
        vehicles.push(entry);
    }

    tracing::debug!(
        distance_km = circuit.distance_km,
        corners = circuit.corner_count,
        vehicles = vehicles.len(),
        "resolved race inputs"
    );

    Ok((circuit, vehicles))
}

pub fn resolve_circuit(raw: &RawCircuit) -> Result<Circuit, ValidationError> {
    let distance = raw.distance_km.ok_or_else(|| missing("circuit.distance_km"))?;
    let distance_km = check_positive("circuit.distance_km", distance)?;

    let corners = raw.corners.ok_or_else(|| missing("circuit.corners"))?;
    if corners < 0 {
        return Err(ValidationError::Negative {
            field: "circuit.corners".to_string(),
            value: corners as f64,
        });
    }
    let corner_count = u32::try_from(corners).map_err(|_| ValidationError::OutOfRange {
        field: "circuit.corners".to_string(),
        value: corners,
    })?;

    Ok(Circuit {
        name: raw.name.clone(),
        distance_km,
        corner_count,
    })
}

pub fn resolve_vehicle<L>(
    index: usize,
    raw: &RawVehicle,
    skills: &L,
) -> Result<VehicleEntry, ValidationError>
where
    L: SkillLookup + ?Sized,
{
    let prefix = format!("vehicles[{}]", index);

    let vehicle_id = match raw.id.as_deref().map(str::trim) {
        None => return Err(missing(&format!("{}.id", prefix))),
        Some("") => {
            return Err(ValidationError::EmptyId {
                field: format!("{}.id", prefix),
            })
        }
        Some(id) => id.to_string(),
    };

    let power = resolve_attribute(&prefix, "power", raw.power, &raw.parts, |p| p.power)?;
    let aerodynamics = resolve_attribute(
        &prefix,
        "aerodynamics",
        raw.aerodynamics,
        &raw.parts,
        |p| p.aerodynamics,
    )?;
    let handling = resolve_attribute(&prefix, "handling", raw.handling, &raw.parts, |p| {
        p.handling
    })?;

    let driver_skill = match (raw.skill, raw.driver.as_deref()) {
        (Some(skill), _) => Some(check_non_negative(&format!("{}.skill", prefix), skill)?),
        (None, Some(driver)) => match skills.skill_for(driver) {
            Some(skill) => Some(check_non_negative(&format!("skills.{}", driver), skill)?),
            None => None,
        },
        (None, None) => None,
    };

    Ok(VehicleEntry {
        vehicle_id,
        driver: raw.driver.clone(),
        power,
        aerodynamics,
        handling,
        driver_skill,
    })
}

/// Explicit value, else the sum over parts, else zero
fn resolve_attribute(
    prefix: &str,
    name: &str,
    explicit: Option<f64>,
    parts: &[RawPart],
    pick: fn(&RawPart) -> Option<f64>,
) -> Result<f64, ValidationError> {
    if let Some(value) = explicit {
        return check_non_negative(&format!("{}.{}", prefix, name), value);
    }

    let mut total = 0.0;
    for (i, part) in parts.iter().enumerate() {
        if let Some(value) = pick(part) {
            total += check_non_negative(&format!("{}.parts[{}].{}", prefix, i, name), value)?;
        }
    }
    // Many large parts can still overflow
    check_non_negative(&format!("{}.{}", prefix, name), total)
}

fn missing(field: &str) -> ValidationError {
    ValidationError::Missing {
        field: field.to_string(),
    }
}
