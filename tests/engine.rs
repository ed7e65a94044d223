use std::collections::HashMap;

use race_sim::engine::{
    evaluate_race, resolve_inputs, simulate, Circuit, Metric, NoSkills, RawCircuit, RawPart,
    RawVehicle, SimulationError, SkillFn, ValidationError, VehicleEntry,
};

fn monza() -> RawCircuit {
    RawCircuit {
        name: Some("Monza".to_string()),
        distance_km: Some(5.793),
        corners: Some(11),
    }
}

fn raw(id: &str, driver: &str, p: f64, a: f64, m: f64) -> RawVehicle {
    RawVehicle {
        id: Some(id.to_string()),
        driver: Some(driver.to_string()),
        power: Some(p),
        aerodynamics: Some(a),
        handling: Some(m),
        ..Default::default()
    }
}

fn skill_table() -> HashMap<String, f64> {
    let mut skills = HashMap::new();
    skills.insert("alice".to_string(), 95.0);
    skills.insert("bob".to_string(), 92.0);
    skills.insert("carol".to_string(), 91.0);
    skills
}

fn field() -> Vec<RawVehicle> {
    vec![
        raw("A", "alice", 35.0, 28.0, 30.0),
        raw("B", "bob", 30.0, 32.0, 32.0),
        raw("C", "carol", 32.0, 29.0, 29.0),
    ]
}

#[test]
fn test_three_car_scenario() {
    let record = simulate(&monza(), &field(), &skill_table()).unwrap();

    let results = record.results();
    assert_eq!(results.len(), 3);
    assert_eq!(
        results.iter().map(|r| r.position).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let fastest = results
        .iter()
        .min_by(|a, b| a.total_time_seconds.total_cmp(&b.total_time_seconds))
        .unwrap();
    assert_eq!(fastest.position, 1);

    // 200 + 3*35 + 0.2*95 - 28
    let a = record.result_for("A").unwrap();
    assert!((a.straight_speed - 296.0).abs() < 1e-9);

    assert!((record.result_for("B").unwrap().total_time_seconds - 316.7392).abs() < 1e-3);
    assert!((a.total_time_seconds - 317.2045).abs() < 1e-3);
    assert!((record.result_for("C").unwrap().total_time_seconds - 322.3790).abs() < 1e-3);
}

#[test]
fn test_resolve_then_evaluate_matches_simulate() {
    let skills = skill_table();
    let (circuit, vehicles) = resolve_inputs(&monza(), &field(), &skills).unwrap();
    let split = evaluate_race(&circuit, &vehicles).unwrap();
    let joined = simulate(&monza(), &field(), &skills).unwrap();
    assert_eq!(split, joined);
}

#[test]
fn test_determinism_across_runs() {
    let skills = skill_table();
    let first = simulate(&monza(), &field(), &skills).unwrap();
    for _ in 0..20 {
        let again = simulate(&monza(), &field(), &skills).unwrap();
        assert_eq!(first.results().len(), again.results().len());
        for (x, y) in first.results().iter().zip(again.results()) {
            assert_eq!(x.vehicle_id, y.vehicle_id);
            assert_eq!(x.position, y.position);
            assert_eq!(x.total_time_seconds.to_bits(), y.total_time_seconds.to_bits());
        }
    }
}

#[test]
fn test_stable_tie_break_on_identical_cars() {
    let circuit = Circuit::new(4.2, 7).unwrap();
    let vehicles: Vec<_> = ["red", "blue", "green", "gold"]
        .iter()
        .map(|id| VehicleEntry::new(*id, 25.0, 20.0, 22.0).unwrap())
        .collect();

    let record = evaluate_race(&circuit, &vehicles).unwrap();
    let order: Vec<_> = record.results().iter().map(|r| r.vehicle_id.as_str()).collect();
    assert_eq!(order, vec!["red", "blue", "green", "gold"]);
    assert_eq!(
        record.results().iter().map(|r| r.position).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn test_distance_clamp_on_corner_heavy_circuit() {
    let circuit = RawCircuit {
        name: None,
        distance_km: Some(2.0),
        corners: Some(9),
    };
    let record = simulate(&circuit, &field(), &skill_table()).unwrap();
    for result in record.results() {
        assert_eq!(result.straight_distance_km, 0.0);
        assert_eq!(result.corner_distance_km, 4.5);
    }
}

#[test]
fn test_bad_vehicle_is_excluded_and_reported() {
    let mut vehicles = field();
    // 200 + 0 + 0.2*85 - 400 is negative
    vehicles.insert(
        2,
        RawVehicle {
            id: Some("brick".to_string()),
            aerodynamics: Some(400.0),
            ..Default::default()
        },
    );

    let record = simulate(&monza(), &vehicles, &skill_table()).unwrap();
    let order: Vec<_> = record.results().iter().map(|r| r.vehicle_id.as_str()).collect();
    assert_eq!(order, vec!["B", "A", "C"]);
    assert_eq!(record.skipped().len(), 1);
    assert_eq!(record.skipped()[0].vehicle_id, "brick");
    assert_eq!(record.skipped()[0].metric, Metric::StraightSpeed);
}

#[test]
fn test_every_vehicle_rejected_is_an_empty_race() {
    let vehicles = vec![
        RawVehicle {
            id: Some("x".to_string()),
            aerodynamics: Some(1000.0),
            ..Default::default()
        },
        RawVehicle {
            id: Some("y".to_string()),
            aerodynamics: Some(250.0),
            skill: Some(0.0),
            ..Default::default()
        },
    ];

    match simulate(&monza(), &vehicles, &NoSkills) {
        Err(SimulationError::EmptyRace(err)) => {
            assert_eq!(err.entries, 2);
            let ids: Vec<_> = err.skipped.iter().map(|s| s.vehicle_id.as_str()).collect();
            assert_eq!(ids, vec!["x", "y"]);
        }
        other => panic!("expected empty race, got {:?}", other),
    }
}

#[test]
fn test_validation_fails_fast_on_first_bad_field() {
    let mut vehicles = field();
    vehicles[0].power = Some(-1.0);
    vehicles[2].handling = Some(-1.0);

    match simulate(&monza(), &vehicles, &NoSkills) {
        Err(SimulationError::Validation(err)) => {
            assert_eq!(err.field(), "vehicles[0].power");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_missing_circuit_distance() {
    let circuit = RawCircuit {
        name: None,
        distance_km: None,
        corners: Some(3),
    };
    let err = resolve_inputs(&circuit, &field(), &NoSkills).unwrap_err();
    assert_eq!(err.field(), "circuit.distance_km");
    assert!(matches!(err, ValidationError::Missing { .. }));
}

#[test]
fn test_parts_and_injected_lookup() {
    let vehicles = vec![RawVehicle {
        id: Some("kit-car".to_string()),
        driver: Some("dana".to_string()),
        parts: vec![
            RawPart {
                name: Some("engine".to_string()),
                power: Some(35.0),
                ..Default::default()
            },
            RawPart {
                name: Some("wing".to_string()),
                aerodynamics: Some(28.0),
                handling: Some(30.0),
                ..Default::default()
            },
        ],
        ..Default::default()
    }];
    let lookup = SkillFn(|driver: &str| if driver == "dana" { Some(95.0) } else { None });

    let record = simulate(&monza(), &vehicles, &lookup).unwrap();
    let result = record.winner().unwrap();
    assert_eq!(result.driver_skill, 95.0);
    assert!((result.straight_speed - 296.0).abs() < 1e-9);
    assert!((result.corner_speed - 225.0).abs() < 1e-9);
}

#[test]
fn test_entries_reused_across_circuits() {
    let (_, vehicles) = resolve_inputs(&monza(), &field(), &skill_table()).unwrap();
    let sprint = Circuit::new(1.0, 0).unwrap();
    let endurance = Circuit::new(50.0, 40).unwrap();

    let a = evaluate_race(&sprint, &vehicles).unwrap();
    let b = evaluate_race(&endurance, &vehicles).unwrap();
    assert_eq!(a.results().len(), 3);
    assert_eq!(b.results().len(), 3);
    assert_eq!(a.results()[0].penalty_seconds, 0.0);
    assert!(b.results()[0].penalty_seconds > 0.0);
}
