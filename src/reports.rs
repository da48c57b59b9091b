use crate::cost_model::compute_derived_metrics;
use crate::reference::{DurationTable, RateTable};
use crate::store::Scope;
use crate::types::{DerivedMetrics, ExportRow, SummaryStats, Totals, TotalsRow, TrainingRecord};
use crate::util::{format_int, format_number};
use tracing::debug;

/// Sum a column in ascending order so the total does not depend on row order.
fn ordered_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

pub fn aggregate_totals(
    records: &[TrainingRecord],
    rates: &RateTable,
    durations: &DurationTable,
) -> Totals {
    let metrics: Vec<DerivedMetrics> = records
        .iter()
        .map(|r| compute_derived_metrics(r, rates, durations))
        .collect();

    Totals {
        trained: records.iter().map(|r| u64::from(r.trained_count)).sum(),
        placed: records.iter().map(|r| u64::from(r.placed_count)).sum(),
        due_to_training_partners: ordered_sum(
            metrics.iter().map(|m| m.due_to_training_partners).collect(),
        ),
        overhead_cost: ordered_sum(metrics.iter().map(|m| m.overhead_cost).collect()),
        total_cost: ordered_sum(metrics.iter().map(|m| m.total_cost).collect()),
    }
}

/// Export cells are plain fixed-point so any numeric parser can read them.
fn export_cell(n: f64) -> String {
    format!("{:.2}", n)
}

pub fn export_row(serial: usize, record: &TrainingRecord, m: &DerivedMetrics) -> ExportRow {
    ExportRow {
        serial,
        sector: record.sector.clone(),
        course_name: record.course_name.clone(),
        duration: export_cell(m.duration),
        cost_category: record.cost_category.clone(),
        trained: record.trained_count,
        placed: record.placed_count,
        avg_salary: export_cell(record.avg_monthly_salary),
        cost_per_candidate: export_cell(m.cost_per_candidate),
        due_to_training_partners: export_cell(m.due_to_training_partners),
        overhead_cost: export_cell(m.overhead_cost),
        total_cost: export_cell(m.total_cost),
        cost_per_placed_candidate: export_cell(m.cost_per_placed_candidate),
        ratio: export_cell(m.ratio),
        payback_period_months: export_cell(m.payback_period_months),
    }
}

/// One export row per record, numbered from 1 in input order.
pub fn generate_export_rows(
    records: &[TrainingRecord],
    rates: &RateTable,
    durations: &DurationTable,
) -> Vec<ExportRow> {
    let rows: Vec<ExportRow> = records
        .iter()
        .enumerate()
        .map(|(idx, r)| export_row(idx + 1, r, &compute_derived_metrics(r, rates, durations)))
        .collect();
    debug!(rows = rows.len(), "generated export rows");
    rows
}

pub fn totals_row(totals: &Totals) -> TotalsRow {
    TotalsRow {
        trained: format_int(totals.trained),
        placed: format_int(totals.placed),
        due_to_training_partners: format_number(totals.due_to_training_partners, 2),
        overhead_cost: format_number(totals.overhead_cost, 2),
        total_cost: format_number(totals.total_cost, 2),
    }
}

pub fn generate_summary(
    scope: &Scope,
    records: &[TrainingRecord],
    rates: &RateTable,
    durations: &DurationTable,
) -> SummaryStats {
    let totals = aggregate_totals(records, rates, durations);
    let overall_cost_per_placed = if totals.placed > 0 {
        totals.total_cost / totals.placed as f64
    } else {
        0.0
    };
    SummaryStats {
        district: scope.district.clone(),
        period: scope.period.clone(),
        total_records: records.len(),
        totals,
        overall_cost_per_placed,
    }
}
