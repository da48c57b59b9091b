//! Reference lookups joined against training records.
//!
//! Both tables are keyed by exact string equality. Effective dating of
//! rates is resolved here, so the cost model only sees one rate per
//! category.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub category: String,
    pub cost_per_hour: f64,
    pub valid_from: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationEntry {
    pub course_name: String,
    pub total_duration_hours: f64,
}

/// Cost category -> cost per hour.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, RateEntry>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table keeping the latest `valid_from` per category.
    /// On equal dates the later entry wins.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RateEntry>,
    {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Build a table from the entries already in effect on `date`.
    pub fn as_of<'a, I>(entries: I, date: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a RateEntry>,
    {
        Self::from_entries(
            entries
                .into_iter()
                .filter(|e| e.valid_from <= date)
                .cloned(),
        )
    }

    pub fn insert(&mut self, entry: RateEntry) {
        match self.rates.get(&entry.category) {
            Some(existing) if existing.valid_from > entry.valid_from => {}
            _ => {
                self.rates.insert(entry.category.clone(), entry);
            }
        }
    }

    pub fn lookup(&self, category: &str) -> Option<f64> {
        self.rates.get(category).map(|e| e.cost_per_hour)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RateTable {
    /// Undated rates, all treated as effective from the epoch.
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self::from_entries(iter.into_iter().map(|(category, cost_per_hour)| RateEntry {
            category: category.into(),
            cost_per_hour,
            valid_from: NaiveDate::default(),
        }))
    }
}

/// Course name -> standard duration in hours.
#[derive(Debug, Clone, Default)]
pub struct DurationTable {
    durations: HashMap<String, f64>,
}

impl DurationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: DurationEntry) {
        self.durations
            .insert(entry.course_name, entry.total_duration_hours);
    }

    pub fn lookup(&self, course_name: &str) -> Option<f64> {
        self.durations.get(course_name).copied()
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

impl FromIterator<DurationEntry> for DurationTable {
    fn from_iter<T: IntoIterator<Item = DurationEntry>>(iter: T) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for DurationTable {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(course_name, total_duration_hours)| DurationEntry {
                course_name: course_name.into(),
                total_duration_hours,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rate(category: &str, cost: f64, valid_from: NaiveDate) -> RateEntry {
        RateEntry {
            category: category.to_string(),
            cost_per_hour: cost,
            valid_from,
        }
    }

    #[test]
    fn test_latest_rate_wins() {
        let table = RateTable::from_entries(vec![
            rate("Category I", 50.0, date(2024, 4, 1)),
            rate("Category I", 40.0, date(2022, 4, 1)),
            rate("Category II", 42.0, date(2023, 1, 1)),
        ]);
        assert_eq!(table.lookup("Category I"), Some(50.0));
        assert_eq!(table.lookup("Category II"), Some(42.0));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rate_as_of_date() {
        let entries = vec![
            rate("Category I", 40.0, date(2022, 4, 1)),
            rate("Category I", 50.0, date(2024, 4, 1)),
        ];
        let table = RateTable::as_of(&entries, date(2023, 12, 31));
        assert_eq!(table.lookup("Category I"), Some(40.0));
        let empty = RateTable::as_of(&entries, date(2020, 1, 1));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_rate_lookup_is_exact() {
        let table: RateTable = vec![("Category I", 50.0)].into_iter().collect();
        assert_eq!(table.lookup("category i"), None);
        assert_eq!(table.lookup("Category I "), None);
    }

    #[test]
    fn test_duration_later_duplicate_overwrites() {
        let table: DurationTable = vec![("Data Science", 100.0), ("Data Science", 120.0)]
            .into_iter()
            .collect();
        assert_eq!(table.lookup("Data Science"), Some(120.0));
        assert_eq!(table.lookup("Welding"), None);
    }
}
