// Entry point and interactive menu.
//
// - Option [1] loads the rate and duration references and the training
//   records for the configured district and period.
// - Option [2] computes the cost sheet, writes the CSV export and the JSON
//   summary, and prints a preview.
// - Option [3] edits a draft record with a live cost preview, optionally
//   saving it.
// - Option [4] deletes a record.
use anyhow::{Context, Result};
use clap::Parser;
use cost_of_training::config::CotConfig;
use cost_of_training::entities::Entity;
use cost_of_training::loader::{self, LoadReport};
use cost_of_training::output;
use cost_of_training::preview::LivePreview;
use cost_of_training::reference::{DurationTable, RateTable};
use cost_of_training::reports;
use cost_of_training::store::{InMemoryRepository, Repository, ScopedRecord, SeedBaseline};
use cost_of_training::types::{DerivedMetrics, TrainingRecord};
use cost_of_training::util::{self, format_int, format_number};
use once_cell::sync::Lazy;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "cot_report", about = "Cost-of-training analysis for a district skilling programme")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "cot.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

// References and records live here between menu actions so the CSVs are
// read once but reports can be generated repeatedly.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    config: CotConfig,
    rates: Option<RateTable>,
    durations: Option<DurationTable>,
    records: InMemoryRepository<TrainingRecord>,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One trimmed line, or `None` once input is closed (or unreadable).
fn read_answer<R: BufRead>(input: &mut R) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn prompt(label: &str) -> Option<String> {
    print!("{label}: ");
    let _ = io::stdout().flush();
    read_answer(&mut io::stdin().lock())
}

/// Form fields: closed input reads as blank.
fn prompt_text(label: &str) -> String {
    prompt(label).unwrap_or_default()
}

fn read_choice() -> Option<String> {
    prompt("Enter choice")
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.to_uppercase().as_str() {
        "Y" => Some(true),
        "N" => Some(false),
        _ => None,
    }
}

/// Closed input counts as "no".
fn prompt_yes_no(label: &str) -> bool {
    loop {
        let Some(answer) = prompt(&format!("{label} (Y/N)")) else {
            return false;
        };
        match parse_yes_no(&answer) {
            Some(choice) => return choice,
            None => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn print_load_report(what: &str, report: &LoadReport) {
    println!(
        "{}: {} rows read, {} loaded, {} skipped",
        what,
        format_int(report.total_rows),
        format_int(report.loaded_rows),
        format_int(report.parse_errors)
    );
}

/// Handle option [1]: load references and training records.
///
/// Loaded records become a new seed baseline; edits made through the
/// preview stay layered on top.
fn handle_load() {
    let mut state = state();
    let config = state.config.clone();
    let scope = config.scope();

    let (rates, rate_report) = match loader::load_rates(&config.data.rates) {
        Ok(v) => v,
        Err(e) => {
            println!("Failed to load rates from {}: {}\n", config.data.rates.display(), e);
            return;
        }
    };
    let (durations, duration_report) = match loader::load_durations(&config.data.durations) {
        Ok(v) => v,
        Err(e) => {
            println!("Failed to load durations from {}: {}\n", config.data.durations.display(), e);
            return;
        }
    };
    let (records, record_report) = match loader::load_records(&config.data.records) {
        Ok(v) => v,
        Err(e) => {
            println!("Failed to load records from {}: {}\n", config.data.records.display(), e);
            return;
        }
    };

    println!("Processing dataset for {}...", scope);
    print_load_report("Rates", &rate_report);
    print_load_report("Durations", &duration_report);
    print_load_report("Training records", &record_report);

    let coverage = loader::reference_coverage(&records, &rates, &durations);
    if !coverage.unknown_categories.is_empty() {
        println!(
            "Note: no rate for {} (costs will show as 0).",
            coverage.unknown_categories.join(", ")
        );
    }
    if !coverage.unresolved_durations.is_empty() {
        println!(
            "Note: no duration for {} (costs will show as 0).",
            coverage.unresolved_durations.join(", ")
        );
    }

    let seed = SeedBaseline {
        version: state.records.seed_version() + 1,
        records: records
            .into_iter()
            .map(|record| ScopedRecord {
                scope: scope.clone(),
                record,
            })
            .collect(),
    };
    if let Err(e) = state.records.replace_seed(seed) {
        println!("Failed to store records: {}\n", e);
        return;
    }
    state.rates = Some(rates);
    state.durations = Some(durations);
    info!(%scope, edits = state.records.edit_count(), "data loaded");
    println!();
}

/// Handle option [2]: compute the cost sheet and write the outputs.
fn handle_generate_reports() {
    let state = state();
    let (Some(rates), Some(durations)) = (&state.rates, &state.durations) else {
        println!("Error: No data loaded. Please load the data first (option 1).\n");
        return;
    };
    let config = &state.config;
    let scope = config.scope();
    let records = match state.records.list(&scope) {
        Ok(r) => r,
        Err(e) => {
            println!("Failed to read records: {}\n", e);
            return;
        }
    };

    println!("Generating cost of training analysis...\n");
    let rows = reports::generate_export_rows(&records, rates, durations);
    if let Err(e) = output::write_csv(&config.output.export_csv, &rows) {
        error!(error = %e, "export failed");
        println!("Write error: {}", e);
    }
    println!("Cost of Training Analysis");
    println!("({})\n", scope);
    output::preview_table_rows(&rows, config.output.preview_rows);
    println!("(Full table exported to {})\n", config.output.export_csv.display());

    let totals = reports::aggregate_totals(&records, rates, durations);
    println!("Totals");
    output::preview_table_rows(&[reports::totals_row(&totals)], 1);

    let summary = reports::generate_summary(&scope, &records, rates, durations);
    if let Err(e) = output::write_json(&config.output.summary_json, &summary) {
        error!(error = %e, "summary write failed");
        println!("Write error: {}", e);
    }
    println!(
        "Summary ({}): {} records, overall cost per placed candidate {}\n",
        config.output.summary_json.display(),
        format_int(summary.total_records),
        format_number(summary.overall_cost_per_placed, 2)
    );
}

fn print_metrics(record: &TrainingRecord, m: &DerivedMetrics) {
    output::preview_table_rows(&[reports::export_row(1, record, m)], 1);
}

/// Handle option [3]: live preview of a draft record.
fn handle_preview() {
    let mut state = state();
    let (Some(rates), Some(durations)) = (state.rates.clone(), state.durations.clone()) else {
        println!("Error: No data loaded. Please load the data first (option 1).\n");
        return;
    };
    let scope = state.config.scope();

    let mut preview = LivePreview::new(&rates, &durations);
    preview.set_sector(&prompt_text("Sector"));
    preview.set_course_name(&prompt_text("Course"));
    let shown = preview.draft().total_duration_raw.clone();
    let duration = if shown.is_empty() {
        prompt_text("Total duration (hrs)")
    } else {
        let typed = prompt_text(&format!("Total duration (hrs) [{shown}]"));
        if typed.is_empty() { shown } else { typed }
    };
    preview.set_total_duration(&duration);
    preview.set_cost_category(&prompt_text("Cost category"));
    preview.set_trained_count(util::parse_u32_safe(Some(&prompt_text("Trained"))).unwrap_or(0));
    preview.set_placed_count(util::parse_u32_safe(Some(&prompt_text("Placed"))).unwrap_or(0));
    let m = preview.set_avg_monthly_salary(
        util::parse_f64_safe(Some(&prompt_text("Avg salary pm"))).unwrap_or(0.0),
    );
    println!();
    print_metrics(preview.draft(), &m);

    if prompt_yes_no("Save record") {
        let record = preview.into_record();
        match state.records.upsert(&scope, record) {
            Ok(()) => println!("Record saved.\n"),
            Err(e) => println!("Save failed: {}\n", e),
        }
    } else {
        println!();
    }
}

/// Handle option [4]: delete one record by its key.
fn handle_delete() {
    let mut state = state();
    let scope = state.config.scope();
    let target = TrainingRecord {
        sector: prompt_text("Sector"),
        course_name: prompt_text("Course"),
        cost_category: prompt_text("Cost category"),
        ..TrainingRecord::default()
    };
    match state.records.delete(&scope, &target.key()) {
        Ok(()) => println!("Record deleted.\n"),
        Err(e) => println!("Delete failed: {}\n", e),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CotConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    state().config = config;

    loop {
        println!("Cost of Training Analysis:");
        println!("[1] Load the data");
        println!("[2] Generate Report");
        println!("[3] Preview / add a record");
        println!("[4] Delete a record");
        println!("[0] Exit\n");
        let Some(choice) = read_choice() else {
            println!("\nExiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                handle_generate_reports();
            }
            "3" => handle_preview(),
            "4" => handle_delete(),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-4.\n"),
        }
    }
    Ok(())
}
