//! # cauce-series
//!
//! From a gridded climate variable to period statistics for one basin.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["GriddedDataset"] -->|"extract()"| B["Series (monthly)"]
//!     B -->|"filter_outliers()"| C["Series (screened)"]
//!     C -->|"annual()"| D["AnnualSeries"]
//!     D -->|"aggregate_annual()"| E["PeriodStats"]
//!     A -.->|"AnomalyPipeline::run()"| E
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use cauce_calendar::{Period, PeriodRole};
//! use cauce_series::{AnomalyPipeline, UnitConversion, VariableKind};
//!
//! let projection = Period::years(PeriodRole::Projection, 2030, 2060)?;
//! let stats = AnomalyPipeline::new("pr", VariableKind::Precipitation)
//!     .with_conversion(UnitConversion::MonthlyFluxToDepth)
//!     .with_outlier_removal(true)
//!     .run(&dataset, &projection)?;
//! println!("{} ± {}", stats.mean, stats.std);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `series` | Monthly series with units |
//! | `grid` | Gridded datasets and spatial dimension aliases |
//! | `extract` | Spatial mean and unit conversion |
//! | `outlier` | Tukey-fence screening |
//! | `aggregate` | Annual resampling and period statistics |
//! | `pipeline` | The configured extract → screen → aggregate path |
//! | `yearly` | Per-year summaries of tabular rows |
//! | `error` | Error types |

mod aggregate;
mod error;
mod extract;
mod grid;
mod outlier;
mod pipeline;
mod series;
mod yearly;

pub use aggregate::{
    AggregatorConfig, AnnualSeries, PeriodStats, Resampling, VariableKind, aggregate,
    aggregate_annual, annual,
};
pub use error::SeriesError;
pub use extract::{KELVIN_OFFSET, UnitConversion, extract};
pub use grid::{Grid, GriddedDataset, SpatialDims};
pub use outlier::{Fence, TUKEY_K, filter_outliers, tukey_fence};
pub use pipeline::AnomalyPipeline;
pub use series::{Series, Unit};
pub use yearly::{YearSummary, annual_means, summarize_by_year};
