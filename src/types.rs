use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One CSV row of training input, exactly as it appears in the sheet.
#[derive(Debug, Deserialize)]
pub struct RawTrainingRow {
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    #[serde(rename = "Course")]
    pub course_name: Option<String>,
    #[serde(rename = "Total Duration (hrs)")]
    pub total_duration: Option<String>,
    #[serde(rename = "Cost Category")]
    pub cost_category: Option<String>,
    #[serde(rename = "Trained")]
    pub trained: Option<String>,
    #[serde(rename = "Placed")]
    pub placed: Option<String>,
    #[serde(rename = "Avg Salary pm")]
    pub avg_salary: Option<String>,
}

/// One row of cost analysis input for a (district, period).
///
/// `placed_count` may exceed `trained_count` in caller data; the cost
/// model computes with it as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub sector: String,
    pub course_name: String,
    /// Fallback duration in hours, used only when the course has no
    /// reference duration.
    pub total_duration_raw: String,
    pub cost_category: String,
    pub trained_count: u32,
    pub placed_count: u32,
    pub avg_monthly_salary: f64,
}

/// Figures derived from a single [`TrainingRecord`]. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub duration: f64,
    pub rate: f64,
    pub cost_per_candidate: f64,
    pub due_to_training_partners: f64,
    pub overhead_cost: f64,
    pub total_cost: f64,
    pub cost_per_placed_candidate: f64,
    pub ratio: f64,
    pub payback_period_months: f64,
}

/// Period totals across a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub trained: u64,
    pub placed: u64,
    pub due_to_training_partners: f64,
    pub overhead_cost: f64,
    pub total_cost: f64,
}

/// Flattened record + metrics, in the column order of the cost sheet.
#[derive(Debug, Serialize, Deserialize, Tabled, Clone, PartialEq)]
pub struct ExportRow {
    #[serde(rename = "S.No")]
    #[tabled(rename = "S.No")]
    pub serial: usize,
    #[serde(rename = "Sector")]
    #[tabled(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Course/QP NOS")]
    #[tabled(rename = "Course/QP NOS")]
    pub course_name: String,
    #[serde(rename = "Total Duration (hrs)")]
    #[tabled(rename = "Total Duration (hrs)")]
    pub duration: String,
    #[serde(rename = "Cost Category")]
    #[tabled(rename = "Cost Category")]
    pub cost_category: String,
    #[serde(rename = "Trained")]
    #[tabled(rename = "Trained")]
    pub trained: u32,
    #[serde(rename = "Placed")]
    #[tabled(rename = "Placed")]
    pub placed: u32,
    #[serde(rename = "Avg Salary pm")]
    #[tabled(rename = "Avg Salary pm")]
    pub avg_salary: String,
    #[serde(rename = "Cost per Candidate")]
    #[tabled(rename = "Cost per Candidate")]
    pub cost_per_candidate: String,
    #[serde(rename = "Due to Training Partners")]
    #[tabled(rename = "Due to Training Partners")]
    pub due_to_training_partners: String,
    #[serde(rename = "Estimated OH Costs (10.5%)")]
    #[tabled(rename = "Estimated OH Costs (10.5%)")]
    pub overhead_cost: String,
    #[serde(rename = "Total Cost")]
    #[tabled(rename = "Total Cost")]
    pub total_cost: String,
    #[serde(rename = "Cost per Placed Candidate")]
    #[tabled(rename = "Cost per Placed Candidate")]
    pub cost_per_placed_candidate: String,
    #[serde(rename = "Ratio")]
    #[tabled(rename = "Ratio")]
    pub ratio: String,
    #[serde(rename = "Payback period pm")]
    #[tabled(rename = "Payback period pm")]
    pub payback_period_months: String,
}

/// Totals line shown under the console preview.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TotalsRow {
    #[tabled(rename = "Trained")]
    pub trained: String,
    #[tabled(rename = "Placed")]
    pub placed: String,
    #[tabled(rename = "Due to Training Partners")]
    pub due_to_training_partners: String,
    #[tabled(rename = "Estimated OH Costs (10.5%)")]
    pub overhead_cost: String,
    #[tabled(rename = "Total Cost")]
    pub total_cost: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub district: String,
    pub period: String,
    pub total_records: usize,
    pub totals: Totals,
    pub overall_cost_per_placed: f64,
}
