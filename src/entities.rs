//! Entity types kept per (district, period), each with its own key and
//! validation. They share only the [`Entity`] contract used by the store.

use crate::error::{CotError, CotResult};
use crate::types::TrainingRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

pub trait Entity: Clone {
    /// Human readable entity name used in errors and logs.
    const KIND: &'static str;
    type Key: Ord + Clone + fmt::Debug;

    fn key(&self) -> Self::Key;
    fn validate(&self) -> CotResult<()>;
}

fn require_text(kind: &'static str, field: &str, value: &str) -> CotResult<()> {
    if value.trim().is_empty() {
        return Err(CotError::validation(kind, format!("{field} must not be empty")));
    }
    Ok(())
}

impl Entity for TrainingRecord {
    const KIND: &'static str = "training record";
    type Key = (String, String, String);

    fn key(&self) -> Self::Key {
        (
            self.sector.clone(),
            self.course_name.clone(),
            self.cost_category.clone(),
        )
    }

    fn validate(&self) -> CotResult<()> {
        // Blank course or category only loses the reference join (soft zero).
        require_text(Self::KIND, "sector", &self.sector)?;
        if !self.avg_monthly_salary.is_finite() || self.avg_monthly_salary < 0.0 {
            return Err(CotError::validation(
                Self::KIND,
                format!("average salary must be non-negative, got {}", self.avg_monthly_salary),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SocialCategory {
    Sc,
    St,
    Obc,
    General,
    Minority,
}

impl SocialCategory {
    pub fn label(self) -> &'static str {
        match self {
            SocialCategory::Sc => "SC",
            SocialCategory::St => "ST",
            SocialCategory::Obc => "OBC",
            SocialCategory::General => "General",
            SocialCategory::Minority => "Minority",
        }
    }
}

impl fmt::Display for SocialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Placement outcome for one social category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialCategoryRecord {
    pub category: SocialCategory,
    pub trained: u32,
    pub placed: u32,
}

impl SocialCategoryRecord {
    pub fn placement_rate(&self) -> f64 {
        if self.trained == 0 {
            0.0
        } else {
            f64::from(self.placed) / f64::from(self.trained) * 100.0
        }
    }
}

impl Entity for SocialCategoryRecord {
    const KIND: &'static str = "social category record";
    type Key = SocialCategory;

    fn key(&self) -> Self::Key {
        self.category
    }

    fn validate(&self) -> CotResult<()> {
        if self.placed > self.trained {
            return Err(CotError::validation(
                Self::KIND,
                format!(
                    "{}: placed ({}) exceeds trained ({})",
                    self.category, self.placed, self.trained
                ),
            ));
        }
        Ok(())
    }
}

/// Industry demand for a job role against the local supply of candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryDemandRecord {
    pub sector: String,
    pub job_role: String,
    pub demand: u32,
    pub supply: u32,
}

impl IndustryDemandRecord {
    /// Positive when demand outstrips supply.
    pub fn gap(&self) -> i64 {
        i64::from(self.demand) - i64::from(self.supply)
    }
}

impl Entity for IndustryDemandRecord {
    const KIND: &'static str = "industry demand record";
    type Key = (String, String);

    fn key(&self) -> Self::Key {
        (self.sector.clone(), self.job_role.clone())
    }

    fn validate(&self) -> CotResult<()> {
        require_text(Self::KIND, "sector", &self.sector)?;
        require_text(Self::KIND, "job role", &self.job_role)
    }
}

/// Centre of Excellence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoeRecord {
    pub name: String,
    pub sector: String,
    pub institution: String,
    pub annual_capacity: u32,
}

impl Entity for CoeRecord {
    const KIND: &'static str = "centre of excellence";
    type Key = String;

    fn key(&self) -> Self::Key {
        self.name.clone()
    }

    fn validate(&self) -> CotResult<()> {
        require_text(Self::KIND, "name", &self.name)?;
        require_text(Self::KIND, "sector", &self.sector)?;
        if self.annual_capacity == 0 {
            return Err(CotError::validation(Self::KIND, "annual capacity must be positive"));
        }
        Ok(())
    }
}
