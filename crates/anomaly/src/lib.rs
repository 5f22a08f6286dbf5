//! # cauce-anomaly
//!
//! Turns period statistics into anomaly records and summarises them.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["baseline PeriodStats"] --> C["compute_anomaly()"]
//!     B["projection PeriodStats"] --> C
//!     C --> D["AnomalyRecord"]
//!     D -->|"aggregate_cohorts()"| E["CohortSummary"]
//!     F["AnnualSeries"] -->|"compare_windows()"| G["WindowComparison"]
//!     H["LossRecord"] -->|"total_losses()"| I["LossTotal"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use cauce_anomaly::{AnomalyKey, GroupField, aggregate_cohorts, compute_anomaly};
//!
//! let key = AnomalyKey::new("057", "ssp585", "CR2MET", "QDM");
//! let record = compute_anomaly(&key, VariableKind::Temperature, &baseline, &projection)?;
//! let broad = aggregate_cohorts(&[record], &[GroupField::Basin, GroupField::Scenario])?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `record` | Anomaly keys, records and their computation |
//! | `cohort` | Grouped mean / standard deviation tables |
//! | `window` | Initial-versus-final window comparison |
//! | `losses` | Glacier loss totals |
//! | `error` | Error types |

mod cohort;
mod error;
mod losses;
mod record;
mod window;

pub use cohort::{CohortSummary, GroupField, aggregate_cohorts};
pub use error::AnomalyError;
pub use losses::{LossRecord, LossTotal, total_losses};
pub use record::{AnomalyKey, AnomalyRecord, compute_anomaly};
pub use window::{WindowComparison, compare_windows};
