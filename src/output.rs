use crate::error::CotResult;
use crate::types::ExportRow;
use crate::util::parse_f64_safe;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv_to<T: Serialize, W: Write>(writer: W, rows: &[T]) -> CotResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> CotResult<()> {
    write_csv_to(std::fs::File::create(path)?, rows)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> CotResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    match render_table(rows, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}

/// Numeric columns recovered from an export file, at export precision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParsedMetrics {
    pub duration: f64,
    pub avg_salary: f64,
    pub cost_per_candidate: f64,
    pub due_to_training_partners: f64,
    pub overhead_cost: f64,
    pub total_cost: f64,
    pub cost_per_placed_candidate: f64,
    pub ratio: f64,
    pub payback_period_months: f64,
}

impl From<&ExportRow> for ParsedMetrics {
    /// Unreadable cells come back as zero, same as the cost model's soft zero.
    fn from(row: &ExportRow) -> Self {
        let num = |s: &str| parse_f64_safe(Some(s)).unwrap_or(0.0);
        ParsedMetrics {
            duration: num(&row.duration),
            avg_salary: num(&row.avg_salary),
            cost_per_candidate: num(&row.cost_per_candidate),
            due_to_training_partners: num(&row.due_to_training_partners),
            overhead_cost: num(&row.overhead_cost),
            total_cost: num(&row.total_cost),
            cost_per_placed_candidate: num(&row.cost_per_placed_candidate),
            ratio: num(&row.ratio),
            payback_period_months: num(&row.payback_period_months),
        }
    }
}

pub fn read_export_rows<R: Read>(reader: R) -> CotResult<Vec<ExportRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize::<ExportRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

pub fn read_export<R: Read>(reader: R) -> CotResult<Vec<ParsedMetrics>> {
    Ok(read_export_rows(reader)?
        .iter()
        .map(ParsedMetrics::from)
        .collect())
}
