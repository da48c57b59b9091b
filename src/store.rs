//! Record storage scoped by (district, period).
//!
//! [`InMemoryRepository`] layers user edits over a versioned seed baseline.
//! Reads reconcile both layers by primary key: an edit replaces the seed
//! row with the same key, and a tombstone hides it.

use crate::entities::Entity;
use crate::error::{CotError, CotResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub district: String,
    pub period: String,
}

impl Scope {
    pub fn new(district: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            period: period.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.district, self.period)
    }
}

/// CRUD contract shared by every entity type.
pub trait Repository<E: Entity> {
    /// All records in scope, ordered by key.
    fn list(&self, scope: &Scope) -> CotResult<Vec<E>>;
    fn get(&self, scope: &Scope, key: &E::Key) -> CotResult<Option<E>>;
    /// Insert or overwrite the record with the same key. Last write wins.
    fn upsert(&mut self, scope: &Scope, record: E) -> CotResult<()>;
    fn delete(&mut self, scope: &Scope, key: &E::Key) -> CotResult<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopedRecord<E> {
    pub scope: Scope,
    pub record: E,
}

/// Code-defined baseline data. A higher `version` supersedes a lower one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedBaseline<E> {
    pub version: u32,
    pub records: Vec<ScopedRecord<E>>,
}

impl<E> Default for SeedBaseline<E> {
    fn default() -> Self {
        Self {
            version: 0,
            records: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum Edit<E> {
    Upsert(E),
    Deleted,
}

/// Serialisable form of the edit layer. `record: None` is a tombstone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEdit<E, K> {
    pub scope: Scope,
    pub key: K,
    pub record: Option<E>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySnapshot<E, K> {
    pub seed_version: u32,
    pub edits: Vec<SnapshotEdit<E, K>>,
}

pub struct InMemoryRepository<E: Entity> {
    seed: SeedBaseline<E>,
    edits: BTreeMap<(Scope, E::Key), Edit<E>>,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::with_seed(SeedBaseline::default())
    }

    pub fn with_seed(seed: SeedBaseline<E>) -> Self {
        Self {
            seed,
            edits: BTreeMap::new(),
        }
    }

    pub fn seed_version(&self) -> u32 {
        self.seed.version
    }

    /// Swap in a newer baseline. User edits are kept and still win.
    pub fn replace_seed(&mut self, seed: SeedBaseline<E>) -> CotResult<()> {
        if seed.version <= self.seed.version {
            return Err(CotError::validation(
                "seed baseline",
                format!(
                    "version {} does not supersede current version {}",
                    seed.version, self.seed.version
                ),
            ));
        }
        info!(from = self.seed.version, to = seed.version, kind = E::KIND, "replacing seed baseline");
        self.seed = seed;
        Ok(())
    }

    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    fn seed_record(&self, scope: &Scope, key: &E::Key) -> Option<&E> {
        self.seed
            .records
            .iter()
            .rev()
            .find(|r| &r.scope == scope && &r.record.key() == key)
            .map(|r| &r.record)
    }

    pub fn snapshot(&self) -> RepositorySnapshot<E, E::Key> {
        RepositorySnapshot {
            seed_version: self.seed.version,
            edits: self
                .edits
                .iter()
                .map(|((scope, key), edit)| SnapshotEdit {
                    scope: scope.clone(),
                    key: key.clone(),
                    record: match edit {
                        Edit::Upsert(r) => Some(r.clone()),
                        Edit::Deleted => None,
                    },
                })
                .collect(),
        }
    }

    /// Re-apply a saved edit layer. Edits recorded against a different
    /// seed version are still applied; the version is only reported.
    pub fn restore(&mut self, snapshot: RepositorySnapshot<E, E::Key>) {
        if snapshot.seed_version != self.seed.version {
            info!(
                saved = snapshot.seed_version,
                current = self.seed.version,
                "restoring edits recorded against another seed version"
            );
        }
        for edit in snapshot.edits {
            let value = match edit.record {
                Some(r) => Edit::Upsert(r),
                None => Edit::Deleted,
            };
            self.edits.insert((edit.scope, edit.key), value);
        }
    }
}

impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    fn list(&self, scope: &Scope) -> CotResult<Vec<E>> {
        let mut merged: BTreeMap<E::Key, E> = BTreeMap::new();
        for r in self.seed.records.iter().filter(|r| &r.scope == scope) {
            merged.insert(r.record.key(), r.record.clone());
        }
        for ((s, key), edit) in &self.edits {
            if s != scope {
                continue;
            }
            match edit {
                Edit::Upsert(r) => {
                    merged.insert(key.clone(), r.clone());
                }
                Edit::Deleted => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_values().collect())
    }

    fn get(&self, scope: &Scope, key: &E::Key) -> CotResult<Option<E>> {
        match self.edits.get(&(scope.clone(), key.clone())) {
            Some(Edit::Upsert(r)) => Ok(Some(r.clone())),
            Some(Edit::Deleted) => Ok(None),
            None => Ok(self.seed_record(scope, key).cloned()),
        }
    }

    fn upsert(&mut self, scope: &Scope, record: E) -> CotResult<()> {
        record.validate()?;
        let key = record.key();
        debug!(kind = E::KIND, %scope, ?key, "upsert");
        self.edits.insert((scope.clone(), key), Edit::Upsert(record));
        Ok(())
    }

    fn delete(&mut self, scope: &Scope, key: &E::Key) -> CotResult<()> {
        if self.get(scope, key)?.is_none() {
            return Err(CotError::NotFound {
                kind: E::KIND,
                key: format!("{key:?}"),
            });
        }
        debug!(kind = E::KIND, %scope, ?key, "delete");
        let slot = (scope.clone(), key.clone());
        if self.seed_record(scope, key).is_some() {
            self.edits.insert(slot, Edit::Deleted);
        } else {
            self.edits.remove(&slot);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CoeRecord, SocialCategory, SocialCategoryRecord};
    use crate::types::TrainingRecord;

    fn record(sector: &str, course: &str, trained: u32) -> TrainingRecord {
        TrainingRecord {
            sector: sector.to_string(),
            course_name: course.to_string(),
            total_duration_raw: String::new(),
            cost_category: "Category I".to_string(),
            trained_count: trained,
            placed_count: 0,
            avg_monthly_salary: 0.0,
        }
    }

    fn scope() -> Scope {
        Scope::new("Pune", "2024-25")
    }

    fn seeded() -> InMemoryRepository<TrainingRecord> {
        InMemoryRepository::with_seed(SeedBaseline {
            version: 1,
            records: vec![
                ScopedRecord { scope: scope(), record: record("Retail", "Sales Associate", 10) },
                ScopedRecord { scope: scope(), record: record("Apparel", "Tailor", 25) },
                ScopedRecord {
                    scope: Scope::new("Pune", "2023-24"),
                    record: record("Retail", "Sales Associate", 7),
                },
            ],
        })
    }

    #[test]
    fn test_list_is_scoped_and_ordered() {
        let repo = seeded();
        let rows = repo.list(&scope()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sector, "Apparel");
        assert_eq!(rows[1].sector, "Retail");
    }

    #[test]
    fn test_upsert_overwrites_matching_key_only() {
        let mut repo = seeded();
        repo.upsert(&scope(), record("Retail", "Sales Associate", 40)).unwrap();
        let rows = repo.list(&scope()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].trained_count, 40);
        assert_eq!(rows[0].trained_count, 25);
        let other = repo.list(&Scope::new("Pune", "2023-24")).unwrap();
        assert_eq!(other[0].trained_count, 7);
    }

    #[test]
    fn test_upsert_validates() {
        let mut repo = seeded();
        let err = repo.upsert(&scope(), record("", "Tailor", 1)).unwrap_err();
        assert!(matches!(err, CotError::Validation { .. }));
        assert_eq!(repo.edit_count(), 0);
    }

    #[test]
    fn test_delete_seed_row_leaves_tombstone() {
        let mut repo = seeded();
        let key = record("Apparel", "Tailor", 0).key();
        repo.delete(&scope(), &key).unwrap();
        assert!(repo.get(&scope(), &key).unwrap().is_none());
        assert_eq!(repo.list(&scope()).unwrap().len(), 1);
        assert!(matches!(
            repo.delete(&scope(), &key),
            Err(CotError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_user_row_removes_edit() {
        let mut repo = seeded();
        let fresh = record("Logistics", "Picker", 3);
        let key = fresh.key();
        repo.upsert(&scope(), fresh).unwrap();
        repo.delete(&scope(), &key).unwrap();
        assert_eq!(repo.edit_count(), 0);
    }

    #[test]
    fn test_newer_seed_keeps_edits() {
        let mut repo = seeded();
        repo.upsert(&scope(), record("Apparel", "Tailor", 99)).unwrap();
        repo.replace_seed(SeedBaseline {
            version: 2,
            records: vec![ScopedRecord { scope: scope(), record: record("Apparel", "Tailor", 30) }],
        })
        .unwrap();
        let rows = repo.list(&scope()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trained_count, 99);
        assert!(repo.replace_seed(SeedBaseline::default()).is_err());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut repo = seeded();
        repo.upsert(&scope(), record("Retail", "Sales Associate", 11)).unwrap();
        repo.delete(&scope(), &record("Apparel", "Tailor", 0).key()).unwrap();
        let json = serde_json::to_string(&repo.snapshot()).unwrap();

        let mut restored = seeded();
        restored.restore(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.list(&scope()).unwrap(), repo.list(&scope()).unwrap());
    }

    #[test]
    fn test_other_entities_share_the_contract() {
        let mut social: InMemoryRepository<SocialCategoryRecord> = InMemoryRepository::new();
        social
            .upsert(&scope(), SocialCategoryRecord { category: SocialCategory::St, trained: 10, placed: 6 })
            .unwrap();
        assert_eq!(social.list(&scope()).unwrap().len(), 1);

        let mut coe: InMemoryRepository<CoeRecord> = InMemoryRepository::new();
        let err = coe.delete(&scope(), &"Missing".to_string()).unwrap_err();
        assert!(err.to_string().contains("centre of excellence"));
    }
}
