//! Cost-of-training analysis for a district skilling programme.
//!
//! Training records are joined against a cost-category rate table and a
//! course duration table to derive per-record costs, overhead, cost per
//! placed candidate and payback period, and summed into period totals.

pub mod config;
pub mod cost_model;
pub mod entities;
pub mod error;
pub mod loader;
pub mod output;
pub mod preview;
pub mod reference;
pub mod reports;
pub mod store;
pub mod types;
pub mod util;

pub use cost_model::{compute_derived_metrics, resolve_duration, resolve_rate, OVERHEAD_RATE};
pub use error::{CotError, CotResult};
pub use reports::aggregate_totals;
pub use types::{DerivedMetrics, Totals, TrainingRecord};
