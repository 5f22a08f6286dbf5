//! # cauce-trend
//!
//! Mann-Kendall trend detection on annual series.
//!
//! Values are compared pairwise in year order; ties are handled by the
//! usual variance correction and the normal score carries a continuity
//! correction. Sen's slope gives the trend magnitude per year.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cauce_trend::{TrendDirection, mann_kendall};
//!
//! let result = mann_kendall("Maipo/SSP585_CR2MET", &annual)?;
//! if result.direction == TrendDirection::Decreasing {
//!     println!("{} declines by {:.2} per year", result.id, -result.slope);
//! }
//! ```

mod error;
mod mann_kendall;

pub use error::TrendError;
pub use mann_kendall::{
    MIN_POINTS, SIGNIFICANCE_LEVEL, TrendDirection, TrendResult, mann_kendall,
};
