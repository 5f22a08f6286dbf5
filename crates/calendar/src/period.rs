//! Closed date windows with a baseline/projection role.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::CalendarError;

/// Semantic role of an analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodRole {
    /// Historical reference window.
    Baseline,
    /// Future comparison window.
    Projection,
}

impl fmt::Display for PeriodRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => f.write_str("baseline"),
            Self::Projection => f.write_str("projection"),
        }
    }
}

/// A closed date interval `[start, end]` with a semantic role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    role: PeriodRole,
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    /// Creates a period from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidPeriod`] if `start > end`.
    pub fn new(role: PeriodRole, start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { role, start, end })
    }

    /// Creates a period spanning January 1 of `first_year` through
    /// December 31 of `last_year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidPeriod`] if `first_year > last_year`
    /// and [`CalendarError::InvalidDate`] if a year is outside chrono's
    /// supported range.
    pub fn years(role: PeriodRole, first_year: i32, last_year: i32) -> Result<Self, CalendarError> {
        let start = NaiveDate::from_ymd_opt(first_year, 1, 1).ok_or(CalendarError::InvalidDate {
            year: first_year,
            month: 1,
            day: 1,
        })?;
        let end = NaiveDate::from_ymd_opt(last_year, 12, 31).ok_or(CalendarError::InvalidDate {
            year: last_year,
            month: 12,
            day: 31,
        })?;
        Self::new(role, start, end)
    }

    /// Returns the role of this period.
    pub fn role(&self) -> PeriodRole {
        self.role
    }

    /// Returns the first date in the period.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last date in the period.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns `true` if `date` lies within the period, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns `true` if `year` lies within the period's year span,
    /// bounds included.
    pub fn contains_year(&self, year: i32) -> bool {
        self.start.year() <= year && year <= self.end.year()
    }

    /// Returns a `"YYYY-YYYY"` label of the period's year span.
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.year(), self.end.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn years_spans_full_calendar_years() {
        let p = Period::years(PeriodRole::Baseline, 1980, 2010).unwrap();
        assert_eq!(p.start(), date(1980, 1, 1));
        assert_eq!(p.end(), date(2010, 12, 31));
        assert_eq!(p.role(), PeriodRole::Baseline);
    }

    #[test]
    fn contains_is_inclusive() {
        let p = Period::years(PeriodRole::Projection, 2030, 2060).unwrap();
        assert!(p.contains(date(2030, 1, 1)));
        assert!(p.contains(date(2060, 12, 31)));
        assert!(!p.contains(date(2029, 12, 31)));
        assert!(!p.contains(date(2061, 1, 1)));
    }

    #[test]
    fn contains_year_is_inclusive() {
        let p = Period::years(PeriodRole::Baseline, 1980, 2010).unwrap();
        assert!(p.contains_year(1980));
        assert!(p.contains_year(2010));
        assert!(!p.contains_year(1979));
        assert!(!p.contains_year(2011));
    }

    #[test]
    fn single_year_period() {
        let p = Period::years(PeriodRole::Baseline, 2000, 2000).unwrap();
        assert!(p.contains_year(2000));
        assert_eq!(p.label(), "2000-2000");
    }

    #[test]
    fn inverted_period_rejected() {
        let err = Period::years(PeriodRole::Projection, 2060, 2030).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidPeriod { .. }));
    }

    #[test]
    fn role_display() {
        assert_eq!(PeriodRole::Baseline.to_string(), "baseline");
        assert_eq!(PeriodRole::Projection.to_string(), "projection");
    }
}
