//! Cost-of-training computation.
//!
//! Maps one [`TrainingRecord`] plus the rate and duration references to its
//! [`DerivedMetrics`]. Missing reference data and unparseable durations
//! resolve to zero, and every division is guarded, so for finite
//! non-negative inputs the output is always finite.

use crate::reference::{DurationTable, RateTable};
use crate::types::{DerivedMetrics, TrainingRecord};
use crate::util::parse_f64_safe;

/// Estimated overhead charged on top of the amount due to training partners.
pub const OVERHEAD_RATE: f64 = 0.105;

/// Reference duration for the course if one exists, else the record's raw
/// duration, else zero.
pub fn resolve_duration(course_name: &str, total_duration_raw: &str, durations: &DurationTable) -> f64 {
    durations
        .lookup(course_name)
        .or_else(|| parse_f64_safe(Some(total_duration_raw)))
        .unwrap_or(0.0)
}

/// Cost per hour for the category, zero when the category is unknown.
pub fn resolve_rate(cost_category: &str, rates: &RateTable) -> f64 {
    rates.lookup(cost_category).unwrap_or(0.0)
}

fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn compute_derived_metrics(
    record: &TrainingRecord,
    rates: &RateTable,
    durations: &DurationTable,
) -> DerivedMetrics {
    let duration = resolve_duration(&record.course_name, &record.total_duration_raw, durations);
    let rate = resolve_rate(&record.cost_category, rates);

    let cost_per_candidate = rate * duration;
    let due_to_training_partners = cost_per_candidate * f64::from(record.trained_count);
    let overhead_cost = due_to_training_partners * OVERHEAD_RATE;
    let total_cost = due_to_training_partners + overhead_cost;
    let cost_per_placed_candidate = guarded_div(total_cost, f64::from(record.placed_count));
    let ratio = guarded_div(cost_per_placed_candidate, cost_per_candidate);
    // Per *trained* candidate cost over salary, kept as the sheet computes it.
    let payback_period_months = guarded_div(
        cost_per_candidate * (1.0 + OVERHEAD_RATE),
        record.avg_monthly_salary,
    );

    DerivedMetrics {
        duration,
        rate,
        cost_per_candidate,
        due_to_training_partners,
        overhead_cost,
        total_cost,
        cost_per_placed_candidate,
        ratio,
        payback_period_months,
    }
}
