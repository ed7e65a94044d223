use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use race_sim::engine::{SimulationError, SimulationRecord};
use race_sim::output;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_EMPTY_RACE: i32 = 3;
const EXIT_IO: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Format {
    /// Ranked table (default)
    #[default]
    Table,
    /// Tab-separated values for scripting
    Tsv,
    /// Full simulation record as JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate the race and print the ranking (default if no subcommand)
    Run {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Also save the simulation record as JSON at this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate the race file without simulating
    Check,
    /// Print a previously saved simulation record
    Show {
        /// Path to a record written by `run --output`
        path: PathBuf,
    },
    /// Write a sample race file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "race-sim")]
#[command(about = "Deterministic race outcome scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to race file (defaults to ~/.config/race-sim/race.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    race_sim::telemetry::init_tracing(race_sim::telemetry::level_for(cli.verbose));

    let command = cli.command.unwrap_or(Commands::Run {
        format: Format::Table,
        output: None,
    });
    let config_path = cli.config.map(PathBuf::from);
    let use_colors = output::should_use_colors();

    let code = match command {
        Commands::Init { force } => init(config_path, force),
        Commands::Show { path } => show(&path, cli.verbose, use_colors),
        Commands::Check => check(config_path),
        Commands::Run { format, output } => run(config_path, format, output, cli.verbose, use_colors),
    };

    std::process::exit(code);
}

fn init(config_path: Option<PathBuf>, force: bool) -> i32 {
    let path = match config_path {
        Some(p) => p,
        None => match race_sim::config::get_race_file_path() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                return EXIT_IO;
            }
        },
    };

    match race_sim::config::write_sample_race_file(&path, force) {
        Ok(()) => {
            println!("Wrote sample race file to {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Init failed: {:#}", e);
            EXIT_IO
        }
    }
}

fn check(config_path: Option<PathBuf>) -> i32 {
    let race = match race_sim::config::load_race_file(config_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_INPUT;
        }
    };

    match race.resolve() {
        Ok((circuit, vehicles)) => {
            println!("{}", output::format_circuit(&circuit));
            println!("{}", output::format_entries(&vehicles));
            println!("OK: {} vehicles", vehicles.len());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Invalid race input: {}", e);
            EXIT_INPUT
        }
    }
}

fn run(
    config_path: Option<PathBuf>,
    format: Format,
    save_to: Option<PathBuf>,
    verbose: bool,
    use_colors: bool,
) -> i32 {
    let start_time = Instant::now();

    let race = match race_sim::config::load_race_file(config_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_INPUT;
        }
    };

    let record = match race.simulate() {
        Ok(record) => record,
        Err(SimulationError::Validation(e)) => {
            eprintln!("Invalid race input: {}", e);
            return EXIT_INPUT;
        }
        Err(SimulationError::EmptyRace(e)) => {
            eprintln!("{}", e);
            eprintln!("{}", output::format_skipped(&e.skipped, false));
            return EXIT_EMPTY_RACE;
        }
    };

    match format {
        Format::Table => print_record(&record, verbose, use_colors),
        Format::Tsv => println!("{}", output::format_tsv(&record)),
        Format::Json => match output::format_json(&record) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize record: {}", e);
                return EXIT_IO;
            }
        },
    }

    if let Some(path) = save_to {
        if let Err(e) = race_sim::store::save_record(&path, &record) {
            eprintln!("Failed to save record: {:#}", e);
            return EXIT_IO;
        }
        if verbose {
            eprintln!("Saved record to {}", path.display());
        }
    }

    if verbose {
        eprintln!(
            "Ranked {} vehicles ({} skipped) in {:?}",
            record.results().len(),
            record.skipped().len(),
            start_time.elapsed()
        );
    }

    EXIT_SUCCESS
}

fn show(path: &std::path::Path, verbose: bool, use_colors: bool) -> i32 {
    let record = match race_sim::store::load_record(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load record: {:#}", e);
            return EXIT_IO;
        }
    };

    print_record(&record, verbose, use_colors);
    EXIT_SUCCESS
}

fn print_record(record: &SimulationRecord, verbose: bool, use_colors: bool) {
    println!("{}", output::format_circuit(record.circuit()));
    if verbose {
        // Detailed output per vehicle
        for result in record.results() {
            println!("{}", output::format_result_detail(result, use_colors));
            println!();
        }
    } else {
        println!("{}", output::format_results_table(record, use_colors));
    }
    if !record.skipped().is_empty() {
        println!();
        println!("{}", output::format_skipped(record.skipped(), use_colors));
    }
}
