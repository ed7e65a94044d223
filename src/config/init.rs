use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::ensure_parent_dir;

/// Race file written by `race-sim init`
pub const SAMPLE_RACE_FILE: &str = r#"# race-sim race definition
#
# circuit: distance_km must be > 0, corners >= 0 (each corner counts as 0.5 km)
# skills:  driver skill table, looked up by each vehicle's `driver`
# vehicles: power / aerodynamics / handling are either given directly or
#           summed over `parts`; a vehicle-level `skill` beats the table,
#           and drivers with no skill at all race at 85.

circuit:
  name: Monza
  distance_km: 5.793
  corners: 11

skills:
  alice: 95
  bob: 92

vehicles:
  - id: car-1
    driver: alice
    parts:
      - { name: engine, power: 35 }
      - { name: wing, aerodynamics: 28 }
      - { name: suspension, handling: 30 }

  - id: car-2
    driver: bob
    power: 30
    aerodynamics: 32
    handling: 32

  - id: car-3
    driver: carol
    skill: 91
    power: 32
    aerodynamics: 29
    handling: 29
"#;

/// Write the sample race file to `path`.
///
/// Refuses to replace an existing file unless `force` is set. The write is
/// atomic, so an interrupted run never leaves a half-written file.
pub fn write_sample_race_file(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Race file already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(SAMPLE_RACE_FILE.as_bytes())
        .context("Failed to write sample race file")?;
    file.commit()
        .with_context(|| format!("Failed to save race file at {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote sample race file");
    Ok(())
}
