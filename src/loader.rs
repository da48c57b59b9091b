use crate::entities::Entity;
use crate::error::CotResult;
use crate::reference::{DurationEntry, DurationTable, RateEntry, RateTable};
use crate::types::{RawTrainingRow, TrainingRecord};
use crate::util::{clean_text, parse_date_safe, parse_f64_safe, parse_u32_safe};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

impl LoadReport {
    fn skip(&mut self, what: &str, row: usize, reason: &str) {
        warn!(what, row, reason, "skipping row");
        self.parse_errors += 1;
    }
}

#[derive(Debug, Deserialize)]
struct RawRateRow {
    #[serde(rename = "Category")]
    category: Option<String>,
    #[serde(rename = "Cost per Hour")]
    cost_per_hour: Option<String>,
    #[serde(rename = "Valid From")]
    valid_from: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDurationRow {
    #[serde(rename = "Course")]
    course_name: Option<String>,
    #[serde(rename = "Duration (hrs)")]
    duration: Option<String>,
}

pub fn read_records<R: Read>(reader: R) -> CotResult<(Vec<TrainingRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for (idx, result) in rdr.deserialize::<RawTrainingRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                report.skip("training record", line, &e.to_string());
                continue;
            }
        };

        let Some(trained_count) = parse_u32_safe(row.trained.as_deref()) else {
            report.skip("training record", line, "invalid trained count");
            continue;
        };
        let Some(placed_count) = parse_u32_safe(row.placed.as_deref()) else {
            report.skip("training record", line, "invalid placed count");
            continue;
        };
        // A blank salary means "not reported yet".
        let avg_monthly_salary = match row.avg_salary.as_deref().map(str::trim) {
            None | Some("") => 0.0,
            Some(s) => match parse_f64_safe(Some(s)) {
                Some(v) => v,
                None => {
                    report.skip("training record", line, "invalid average salary");
                    continue;
                }
            },
        };

        let record = TrainingRecord {
            sector: clean_text(row.sector),
            course_name: clean_text(row.course_name),
            total_duration_raw: clean_text(row.total_duration),
            cost_category: clean_text(row.cost_category),
            trained_count,
            placed_count,
            avg_monthly_salary,
        };
        if let Err(e) = record.validate() {
            report.skip("training record", line, &e.to_string());
            continue;
        }
        records.push(record);
    }

    report.loaded_rows = records.len();
    debug!(?report, "read training records");
    Ok((records, report))
}

pub fn load_records(path: &Path) -> CotResult<(Vec<TrainingRecord>, LoadReport)> {
    read_records(std::fs::File::open(path)?)
}

/// Rate rows with an empty `Valid From` are treated as always effective.
pub fn read_rate_entries<R: Read>(reader: R) -> CotResult<(Vec<RateEntry>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut report = LoadReport::default();
    let mut entries = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRateRow>().enumerate() {
        let line = idx + 2;
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                report.skip("rate", line, &e.to_string());
                continue;
            }
        };
        let category = clean_text(row.category);
        if category.is_empty() {
            report.skip("rate", line, "missing category");
            continue;
        }
        let Some(cost_per_hour) = parse_f64_safe(row.cost_per_hour.as_deref()) else {
            report.skip("rate", line, "invalid cost per hour");
            continue;
        };
        if cost_per_hour < 0.0 {
            report.skip("rate", line, "negative cost per hour");
            continue;
        }
        let valid_from = match row.valid_from.as_deref().map(str::trim) {
            None | Some("") => NaiveDate::default(),
            Some(s) => match parse_date_safe(Some(s)) {
                Some(d) => d,
                None => {
                    report.skip("rate", line, "invalid valid-from date");
                    continue;
                }
            },
        };
        entries.push(RateEntry {
            category,
            cost_per_hour,
            valid_from,
        });
    }

    report.loaded_rows = entries.len();
    Ok((entries, report))
}

pub fn load_rates(path: &Path) -> CotResult<(RateTable, LoadReport)> {
    let (entries, report) = read_rate_entries(std::fs::File::open(path)?)?;
    Ok((RateTable::from_entries(entries), report))
}

pub fn read_durations<R: Read>(reader: R) -> CotResult<(DurationTable, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut report = LoadReport::default();
    let mut table = DurationTable::new();

    for (idx, result) in rdr.deserialize::<RawDurationRow>().enumerate() {
        let line = idx + 2;
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                report.skip("duration", line, &e.to_string());
                continue;
            }
        };
        let course_name = clean_text(row.course_name);
        if course_name.is_empty() {
            report.skip("duration", line, "missing course");
            continue;
        }
        let Some(total_duration_hours) = parse_f64_safe(row.duration.as_deref()) else {
            report.skip("duration", line, "invalid duration");
            continue;
        };
        if total_duration_hours < 0.0 {
            report.skip("duration", line, "negative duration");
            continue;
        }
        table.insert(DurationEntry {
            course_name,
            total_duration_hours,
        });
        report.loaded_rows += 1;
    }

    Ok((table, report))
}

pub fn load_durations(path: &Path) -> CotResult<(DurationTable, LoadReport)> {
    read_durations(std::fs::File::open(path)?)
}

/// Records whose joins will silently resolve to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceCoverage {
    pub unknown_categories: Vec<String>,
    /// Courses with neither a reference duration nor a numeric raw duration.
    pub unresolved_durations: Vec<String>,
}

pub fn reference_coverage(
    records: &[TrainingRecord],
    rates: &RateTable,
    durations: &DurationTable,
) -> ReferenceCoverage {
    let mut coverage = ReferenceCoverage::default();
    for r in records {
        if rates.lookup(&r.cost_category).is_none() && !coverage.unknown_categories.contains(&r.cost_category) {
            coverage.unknown_categories.push(r.cost_category.clone());
        }
        let unresolved = durations.lookup(&r.course_name).is_none()
            && parse_f64_safe(Some(&r.total_duration_raw)).is_none();
        if unresolved && !coverage.unresolved_durations.contains(&r.course_name) {
            coverage.unresolved_durations.push(r.course_name.clone());
        }
    }
    if !coverage.unknown_categories.is_empty() || !coverage.unresolved_durations.is_empty() {
        debug!(?coverage, "records with missing reference data");
    }
    coverage
}
