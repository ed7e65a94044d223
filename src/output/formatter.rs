use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::engine::{Circuit, InvalidPerformanceError, SimulationRecord, VehicleEntry, VehicleResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a race time as "m:ss.mmm", or "h:mm:ss.mmm" past the hour
pub fn format_race_time(seconds: f64) -> String {
    let total_millis = (seconds * 1000.0).round() as u64;
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
    } else {
        format!("{}:{:02}.{:03}", mins, secs, millis)
    }
}

/// Format a gap to the leader as "+s.mmm"
pub fn format_gap(seconds: f64) -> String {
    format!("+{:.3}", seconds.max(0.0))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a label to fit available width, accounting for Unicode
fn truncate_label(label: &str, max_width: usize) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= max_width {
        label.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// One-line circuit header, e.g. "Monza  5.793 km, 11 corners"
pub fn format_circuit(circuit: &Circuit) -> String {
    let corners = if circuit.corner_count() == 1 { "corner" } else { "corners" };
    format!(
        "{}  {} km, {} {}",
        circuit.name().unwrap_or("Circuit"),
        circuit.distance_km(),
        circuit.corner_count(),
        corners
    )
}

/// Format results as a table with columns: Position, Label, Time, Gap
/// No headers. The label column is padded to the longest label and
/// truncated when the terminal is too narrow.
pub fn format_results_table(record: &SimulationRecord, use_colors: bool) -> String {
    let results = record.results();
    if results.is_empty() {
        return "No finishers.".to_string();
    }

    let time_width = 11;
    let gap_width = 9;
    let separator = "  ";
    let longest = results.iter().map(|r| r.label().chars().count()).max().unwrap_or(0);

    let label_width = match get_terminal_width() {
        Some(width) => {
            let fixed = 4 + time_width + gap_width + separator.len() * 3;
            if width > fixed + 10 {
                longest.min(width - fixed)
            } else {
                longest.min(20)
            }
        }
        None => longest,
    };

    results
        .iter()
        .map(|result| {
            let position = format!("{:>3}.", result.position);
            let label = truncate_label(result.label(), label_width);
            let label = format!("{:<width$}", label, width = label_width);
            let time = format!(
                "{:>width$}",
                format_race_time(result.total_time_seconds),
                width = time_width
            );
            let gap = if result.position == 1 {
                format!("{:>width$}", "leader", width = gap_width)
            } else {
                format!(
                    "{:>width$}",
                    format_gap(record.gap_to_leader(result)),
                    width = gap_width
                )
            };

            if use_colors {
                if result.position == 1 {
                    format!(
                        "{} {}{}{}{}{}",
                        position.dimmed(),
                        label.bold().green(),
                        separator,
                        time.bold(),
                        separator,
                        gap.dimmed()
                    )
                } else {
                    format!(
                        "{} {}{}{}{}{}",
                        position.dimmed(),
                        label.bold(),
                        separator,
                        time,
                        separator,
                        gap.yellow()
                    )
                }
            } else {
                format!("{} {}{}{}{}{}", position, label, separator, time, separator, gap)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single result with detailed multi-line output (for verbose mode)
pub fn format_result_detail(result: &VehicleResult, use_colors: bool) -> String {
    let heading = match &result.driver {
        Some(driver) => format!("P{} {} ({})", result.position, result.vehicle_id, driver),
        None => format!("P{} {}", result.position, result.vehicle_id),
    };

    let body = format!(
        "  Straights: {:.3} km at {:.1} km/h\n  Corners: {:.3} km at {:.1} km/h\n  Skill: {}\n  Penalty: {:.3}s\n  Total: {} ({:.3}s)",
        result.straight_distance_km,
        result.straight_speed,
        result.corner_distance_km,
        result.corner_speed,
        result.driver_skill,
        result.penalty_seconds,
        format_race_time(result.total_time_seconds),
        result.total_time_seconds
    );

    if use_colors {
        format!("{}\n{}", heading.bold(), body)
    } else {
        format!("{}\n{}", heading, body)
    }
}

/// Format results as tab-separated values for scripting
/// Columns: position, vehicle_id, total_seconds, penalty_seconds,
/// straight_speed, corner_speed (no headers, no colors)
pub fn format_tsv(record: &SimulationRecord) -> String {
    record
        .results()
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{:.3}\t{:.3}\t{:.3}\t{:.3}",
                r.position,
                r.vehicle_id,
                r.total_time_seconds,
                r.penalty_seconds,
                r.straight_speed,
                r.corner_speed
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the whole record as pretty JSON
pub fn format_json(record: &SimulationRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

/// List vehicles the model rejected, one per line
pub fn format_skipped(skipped: &[InvalidPerformanceError], use_colors: bool) -> String {
    skipped
        .iter()
        .map(|err| {
            if use_colors {
                format!("  {} {}", "skipped".red(), err)
            } else {
                format!("  skipped {}", err)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summary of resolved entries, one line each (for `race-sim check`)
pub fn format_entries(vehicles: &[VehicleEntry]) -> String {
    vehicles
        .iter()
        .map(|v| {
            let skill = match v.driver_skill() {
                Some(skill) => skill.to_string(),
                None => "default".to_string(),
            };
            format!(
                "  {}{}  power {}  aero {}  handling {}  skill {}",
                v.vehicle_id(),
                v.driver().map(|d| format!(" ({})", d)).unwrap_or_default(),
                v.power(),
                v.aerodynamics(),
                v.handling(),
                skill
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
