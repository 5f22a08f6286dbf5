//! # cauce-calendar
//!
//! Calendar arithmetic shared by the cauce analysis crates.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["(year, month)"] -->|"days_in_month()"| B["28..=31"]
//!     A -->|"seconds_in_month()"| C["flux -> depth factor"]
//!     A -->|"month_starts()"| D["Vec of NaiveDate"]
//!     E["first/last year"] -->|"Period::years()"| F["Period"]
//!     G["month"] -->|"SeasonTable::season_of()"| H["Season"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use cauce_calendar::{Period, PeriodRole, Season, SeasonTable, seconds_in_month};
//!
//! // January 2030 holds 31 days of flux
//! assert_eq!(seconds_in_month(2030, 1).unwrap(), 2_678_400);
//!
//! // Baseline window 1980-2010, inclusive
//! let baseline = Period::years(PeriodRole::Baseline, 1980, 2010).unwrap();
//! assert!(baseline.contains_year(2010));
//!
//! // Month 12 belongs to austral summer
//! let seasons = SeasonTable::standard();
//! assert_eq!(seasons.season_of(12).unwrap(), Season::Djf);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `month` | Gregorian month lengths and monthly date sequences |
//! | `period` | Closed date windows with a baseline/projection role |
//! | `season` | Three-month seasons and the month-to-season lookup |
//! | `error` | Error types |

mod error;
mod month;
mod period;
mod season;

pub use error::CalendarError;
pub use month::{SECONDS_PER_DAY, days_in_month, month_starts, seconds_in_month};
pub use period::{Period, PeriodRole};
pub use season::{Season, SeasonTable};
