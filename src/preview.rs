//! Live cost preview over an unsaved draft record.

use crate::cost_model::compute_derived_metrics;
use crate::reference::{DurationTable, RateTable};
use crate::types::{DerivedMetrics, TrainingRecord};

pub struct LivePreview<'a> {
    draft: TrainingRecord,
    rates: &'a RateTable,
    durations: &'a DurationTable,
}

impl<'a> LivePreview<'a> {
    pub fn new(rates: &'a RateTable, durations: &'a DurationTable) -> Self {
        Self::from_record(TrainingRecord::default(), rates, durations)
    }

    /// Start from an existing record, e.g. when editing a saved row.
    pub fn from_record(draft: TrainingRecord, rates: &'a RateTable, durations: &'a DurationTable) -> Self {
        Self {
            draft,
            rates,
            durations,
        }
    }

    pub fn draft(&self) -> &TrainingRecord {
        &self.draft
    }

    pub fn into_record(self) -> TrainingRecord {
        self.draft
    }

    pub fn set_sector(&mut self, sector: &str) -> DerivedMetrics {
        self.draft.sector = sector.to_string();
        self.metrics()
    }

    /// Changing the course pre-fills the displayed duration from the
    /// reference when one exists. The metrics prefer the reference either way.
    pub fn set_course_name(&mut self, course_name: &str) -> DerivedMetrics {
        self.draft.course_name = course_name.to_string();
        if let Some(hours) = self.durations.lookup(course_name) {
            self.draft.total_duration_raw = hours.to_string();
        }
        self.metrics()
    }

    pub fn set_total_duration(&mut self, raw: &str) -> DerivedMetrics {
        self.draft.total_duration_raw = raw.to_string();
        self.metrics()
    }

    pub fn set_cost_category(&mut self, category: &str) -> DerivedMetrics {
        self.draft.cost_category = category.to_string();
        self.metrics()
    }

    pub fn set_trained_count(&mut self, trained: u32) -> DerivedMetrics {
        self.draft.trained_count = trained;
        self.metrics()
    }

    pub fn set_placed_count(&mut self, placed: u32) -> DerivedMetrics {
        self.draft.placed_count = placed;
        self.metrics()
    }

    pub fn set_avg_monthly_salary(&mut self, salary: f64) -> DerivedMetrics {
        self.draft.avg_monthly_salary = salary;
        self.metrics()
    }

    pub fn metrics(&self) -> DerivedMetrics {
        compute_derived_metrics(&self.draft, self.rates, self.durations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs() -> (RateTable, DurationTable) {
        let rates: RateTable = vec![("Category I", 50.0)].into_iter().collect();
        let durations: DurationTable = vec![("Data Science", 120.0)].into_iter().collect();
        (rates, durations)
    }

    #[test]
    fn test_empty_draft_is_all_zero() {
        let (rates, durations) = refs();
        let preview = LivePreview::new(&rates, &durations);
        assert_eq!(preview.metrics(), DerivedMetrics::default());
    }

    #[test]
    fn test_course_change_prefills_duration() {
        let (rates, durations) = refs();
        let mut preview = LivePreview::new(&rates, &durations);
        preview.set_total_duration("999");
        let m = preview.set_course_name("Data Science");
        assert_eq!(preview.draft().total_duration_raw, "120");
        assert_eq!(m.duration, 120.0);
    }

    #[test]
    fn test_unknown_course_keeps_typed_duration() {
        let (rates, durations) = refs();
        let mut preview = LivePreview::new(&rates, &durations);
        preview.set_total_duration("80");
        let m = preview.set_course_name("Beauty Therapist");
        assert_eq!(preview.draft().total_duration_raw, "80");
        assert_eq!(m.duration, 80.0);
    }

    #[test]
    fn test_reference_wins_over_later_typed_duration() {
        let (rates, durations) = refs();
        let mut preview = LivePreview::new(&rates, &durations);
        preview.set_course_name("Data Science");
        let m = preview.set_total_duration("10");
        assert_eq!(m.duration, 120.0);
    }

    #[test]
    fn test_metrics_follow_each_field() {
        let (rates, durations) = refs();
        let mut preview = LivePreview::new(&rates, &durations);
        preview.set_sector("IT-ITeS");
        preview.set_course_name("Data Science");
        let m = preview.set_cost_category("Category I");
        assert_eq!(m.cost_per_candidate, 6000.0);
        assert_eq!(m.total_cost, 0.0);
        let m = preview.set_trained_count(10);
        assert_eq!(m.due_to_training_partners, 60000.0);
        assert_eq!(m.cost_per_placed_candidate, 0.0);
        let m = preview.set_placed_count(5);
        assert!(m.cost_per_placed_candidate > 0.0);
        let m = preview.set_avg_monthly_salary(12000.0);
        assert!((m.payback_period_months - 6000.0 * 1.105 / 12000.0).abs() < 1e-9);
        assert_eq!(preview.into_record().trained_count, 10);
    }
}
