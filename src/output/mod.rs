pub mod formatter;

pub use formatter::{
    format_circuit, format_entries, format_gap, format_json, format_race_time,
    format_result_detail, format_results_table, format_skipped, format_tsv, should_use_colors,
};
