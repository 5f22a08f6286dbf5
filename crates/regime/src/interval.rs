//! Year-interval lookup tables assigning regime labels.

use crate::error::RegimeError;

pub const EL_NINO: &str = "El Niño";
pub const LA_NINA: &str = "La Niña";
pub const NEUTRAL: &str = "Neutral";

/// A labelled closed year range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegimeInterval {
    pub label: String,
    pub first_year: i32,
    pub last_year: i32,
}

/// Ordered intervals with an optional fallback label. The first interval
/// containing a year wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTable {
    intervals: Vec<RegimeInterval>,
    default: Option<String>,
}

impl IntervalTable {
    /// # Errors
    ///
    /// Returns [`RegimeError::InvalidInterval`] if an interval ends before it
    /// starts.
    pub fn new(
        intervals: Vec<RegimeInterval>,
        default: Option<String>,
    ) -> Result<Self, RegimeError> {
        if let Some(bad) = intervals.iter().find(|i| i.first_year > i.last_year) {
            return Err(RegimeError::InvalidInterval {
                label: bad.label.clone(),
                first_year: bad.first_year,
                last_year: bad.last_year,
            });
        }
        Ok(Self {
            intervals,
            default,
        })
    }

    /// ENSO phases by year. El Niño ranges are checked before La Niña, so a
    /// year listed under both counts as El Niño; unlisted years are
    /// neutral.
    pub fn enso() -> Self {
        const EL_NINO_YEARS: [(i32, i32); 12] = [
            (1982, 1983),
            (1986, 1988),
            (1991, 1992),
            (1994, 1995),
            (1997, 1998),
            (2002, 2003),
            (2004, 2005),
            (2006, 2007),
            (2009, 2010),
            (2014, 2016),
            (2018, 2019),
            (2023, 2024),
        ];
        const LA_NINA_YEARS: [(i32, i32); 12] = [
            (1983, 1984),
            (1984, 1985),
            (1988, 1989),
            (1995, 1996),
            (1998, 2001),
            (2005, 2006),
            (2007, 2008),
            (2008, 2009),
            (2010, 2012),
            (2016, 2017),
            (2017, 2018),
            (2020, 2023),
        ];
        let phase = |label: &str, years: &[(i32, i32)]| {
            years
                .iter()
                .map(|&(first_year, last_year)| RegimeInterval {
                    label: label.to_string(),
                    first_year,
                    last_year,
                })
                .collect::<Vec<_>>()
        };
        let mut intervals = phase(EL_NINO, &EL_NINO_YEARS);
        intervals.extend(phase(LA_NINA, &LA_NINA_YEARS));
        Self {
            intervals,
            default: Some(NEUTRAL.to_string()),
        }
    }

    /// Pre-megadrought (1980–2009, labelled `"1980-2010"`) and megadrought
    /// (2010–2021) epochs. Other years are unassigned.
    pub fn megadrought() -> Self {
        Self {
            intervals: vec![
                RegimeInterval {
                    label: "1980-2010".to_string(),
                    first_year: 1980,
                    last_year: 2009,
                },
                RegimeInterval {
                    label: "2010-2021".to_string(),
                    first_year: 2010,
                    last_year: 2021,
                },
            ],
            default: None,
        }
    }

    /// Label of `year`, or the default, or `None`.
    pub fn classify(&self, year: i32) -> Option<&str> {
        self.intervals
            .iter()
            .find(|i| i.first_year <= year && year <= i.last_year)
            .map(|i| i.label.as_str())
            .or(self.default.as_deref())
    }

    /// Distinct labels in first-appearance order, then the default.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for i in &self.intervals {
            if !labels.contains(&i.label.as_str()) {
                labels.push(&i.label);
            }
        }
        if let Some(d) = self.default.as_deref()
            && !labels.contains(&d)
        {
            labels.push(d);
        }
        labels
    }
}
