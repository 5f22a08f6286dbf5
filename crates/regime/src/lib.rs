//! # cauce-regime
//!
//! Compares a variable across externally defined regimes such as ENSO
//! phases or drought epochs.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["year"] -->|"IntervalTable::classify()"| B["regime label"]
//!     C["RegimeSample"] --> D["compare_by_season()"]
//!     B --> D
//!     D -->|"per (dataset, season)"| E["compare_groups()"]
//!     E --> F["one_way_anova()"]
//!     E --> G["kruskal_wallis()"]
//! ```
//!
//! Stratifications where a group has fewer than two samples are skipped;
//! partial output is normal.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `interval` | Year-interval label tables (ENSO, megadrought) |
//! | `hypothesis` | One-way ANOVA and Kruskal-Wallis |
//! | `compare` | Grouping by season and label |
//! | `error` | Error types |

mod compare;
mod error;
mod hypothesis;
mod interval;

pub use compare::{
    GroupComparison, MIN_GROUP_SIZE, RegimeReport, RegimeSample, compare_by_season,
    compare_groups,
};
pub use error::RegimeError;
pub use hypothesis::{TestOutcome, kruskal_wallis, one_way_anova};
pub use interval::{EL_NINO, IntervalTable, LA_NINA, NEUTRAL, RegimeInterval};
