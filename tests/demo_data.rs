use cost_of_training::config::CotConfig;
use cost_of_training::loader::{load_durations, load_rates, load_records, reference_coverage};
use cost_of_training::reports::generate_summary;
use cost_of_training::store::{InMemoryRepository, Repository, ScopedRecord, SeedBaseline};
use cost_of_training::TrainingRecord;
use std::path::PathBuf;

fn demo(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(file)
}

#[test]
fn test_demo_config_parses() {
    let text = std::fs::read_to_string(demo("cot.toml")).unwrap();
    let config: CotConfig = toml::from_str(&text).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.scope.period, "2024-25");
}

#[test]
fn test_demo_data_end_to_end() {
    let (rates, _) = load_rates(&demo("rate_reference.csv")).unwrap();
    let (durations, _) = load_durations(&demo("duration_reference.csv")).unwrap();
    let (records, report) = load_records(&demo("training_records.csv")).unwrap();
    assert_eq!(report.parse_errors, 0);
    assert_eq!(rates.lookup("Category I"), Some(50.0));

    let coverage = reference_coverage(&records, &rates, &durations);
    assert_eq!(coverage.unresolved_durations, vec!["Self Employed Tailor".to_string()]);
    assert!(coverage.unknown_categories.is_empty());

    let scope = cost_of_training::store::Scope::new("Demo District", "2024-25");
    let mut repo: InMemoryRepository<TrainingRecord> = InMemoryRepository::with_seed(SeedBaseline {
        version: 1,
        records: records
            .into_iter()
            .map(|record| ScopedRecord { scope: scope.clone(), record })
            .collect(),
    });
    let mut edited = repo.list(&scope).unwrap()[0].clone();
    edited.placed_count += 1;
    repo.upsert(&scope, edited).unwrap();

    let rows = repo.list(&scope).unwrap();
    assert_eq!(rows.len(), 5);
    let summary = generate_summary(&scope, &rows, &rates, &durations);
    assert_eq!(summary.totals.trained, 113);
    assert_eq!(summary.totals.placed, 61);
    assert!(summary.totals.total_cost > 0.0);
}
