//! # cauce-seasonal
//!
//! Seasonal decomposition of monthly basin statistics.
//!
//! Monthly samples are binned into three-month seasons with a
//! [`SeasonTable`](cauce_calendar::SeasonTable) supplied by the caller,
//! then summarised per basin and decade. Changes are expressed against a
//! reference decade.
//!
//! ```ignore
//! let stats = decompose(&samples, &SeasonTable::standard(), &SeasonalConfig::default());
//! for change in seasonal_changes(&stats, "1980-2020") {
//!     println!("{:?}", change?);
//! }
//! ```

mod change;
mod decompose;
mod error;

pub use change::{SeasonalChange, seasonal_changes};
pub use decompose::{SeasonalConfig, SeasonalSample, SeasonalStat, StdCombination, decompose};
pub use error::SeasonalError;
