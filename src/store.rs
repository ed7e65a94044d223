use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::engine::SimulationRecord;

const RECORD_VERSION: u32 = 1;

#[derive(Serialize)]
struct RecordEnvelopeRef<'a> {
    version: u32,
    record: &'a SimulationRecord,
}

#[derive(Deserialize)]
struct RecordEnvelope {
    version: u32,
    record: SimulationRecord,
}

/// Save a simulation record to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if
/// it doesn't exist.
pub fn save_record(path: &Path, record: &SimulationRecord) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    let envelope = RecordEnvelopeRef {
        version: RECORD_VERSION,
        record,
    };
    serde_json::to_writer_pretty(&mut file, &envelope)
        .context("Failed to serialize simulation record")?;

    file.commit()
        .with_context(|| format!("Failed to save simulation record at {}", path.display()))?;

    Ok(())
}

/// Load a simulation record saved by [`save_record`]
///
/// Rejects unknown versions and records whose ranking is inconsistent.
pub fn load_record(path: &Path) -> Result<SimulationRecord> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open record file at {}", path.display()))?;

    let envelope: RecordEnvelope = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load simulation record from {}", path.display()))?;

    if envelope.version != RECORD_VERSION {
        anyhow::bail!("Unsupported record version: {}", envelope.version);
    }

    if let Err(reason) = envelope.record.check_ranking() {
        anyhow::bail!("Corrupt record in {}: {}", path.display(), reason);
    }

    Ok(envelope.record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{evaluate_race, Circuit, VehicleEntry};
    use std::env;
    use std::fs;

    fn sample_record() -> SimulationRecord {
        let circuit = Circuit::new(5.793, 11).unwrap().with_name("Monza");
        let vehicles = vec![
            VehicleEntry::new("A", 35.0, 28.0, 30.0).unwrap().with_skill(95.0).unwrap(),
            VehicleEntry::new("B", 30.0, 32.0, 32.0).unwrap().with_driver("bob"),
            VehicleEntry::new("X", 0.0, 400.0, 0.0).unwrap(),
        ];
        evaluate_race(&circuit, &vehicles).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let path = env::temp_dir().join("race_sim_test_record.json");
        let _ = fs::remove_file(&path);

        let record = sample_record();
        save_record(&path, &record).unwrap();
        let loaded = load_record(&path).unwrap();

        assert_eq!(loaded, record);
        assert_eq!(loaded.circuit().name(), Some("Monza"));
        assert_eq!(loaded.skipped().len(), 1);
        assert_eq!(loaded.result_for("B").unwrap().driver.as_deref(), Some("bob"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let path = env::temp_dir().join("race_sim_test_record_version.json");
        let record = sample_record();
        let json = serde_json::json!({ "version": 99, "record": record });
        fs::write(&path, json.to_string()).unwrap();

        let err = load_record(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported record version"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_rejects_tampered_positions() {
        let path = env::temp_dir().join("race_sim_test_record_tampered.json");
        let record = sample_record();
        let mut json = serde_json::json!({ "version": 1, "record": record });
        json["record"]["results"][1]["position"] = serde_json::json!(5);
        fs::write(&path, json.to_string()).unwrap();

        let err = load_record(&path).unwrap_err();
        assert!(err.to_string().contains("Corrupt record"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_rejects_invalid_circuit() {
        let path = env::temp_dir().join("race_sim_test_record_circuit.json");
        let record = sample_record();
        let mut json = serde_json::json!({ "version": 1, "record": record });
        json["record"]["circuit"]["distance_km"] = serde_json::json!(0.0);
        fs::write(&path, json.to_string()).unwrap();

        assert!(load_record(&path).is_err());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let path = env::temp_dir().join("race_sim_test_record_missing.json");
        let _ = fs::remove_file(&path);
        let err = load_record(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to open record file"));
    }
}
