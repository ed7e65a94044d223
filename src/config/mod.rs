mod init;
mod schema;

pub use init::{write_sample_race_file, SAMPLE_RACE_FILE};
pub use schema::RaceFile;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/race-sim/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("race-sim"))
}

/// Get the default race file path (~/.config/race-sim/race.yaml)
pub fn get_race_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("race.yaml"))
}

/// Ensure the directory that will hold `path` exists
pub fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load a race definition from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to the race file. If None, uses the default path (~/.config/race-sim/race.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The race file does not exist
/// - The race file cannot be read
/// - The YAML cannot be parsed
pub fn load_race_file(path: Option<PathBuf>) -> Result<RaceFile> {
    let race_path = match path {
        Some(p) => p,
        None => get_race_file_path()?,
    };

    if !race_path.exists() {
        anyhow::bail!(
            "Race file not found at {}. Run `race-sim init` to create one",
            race_path.display()
        );
    }

    let content = fs::read_to_string(&race_path)
        .with_context(|| format!("Failed to read race file at {}", race_path.display()))?;

    let race: RaceFile = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse race file: invalid YAML in {}", race_path.display()))?;

    Ok(race)
}
