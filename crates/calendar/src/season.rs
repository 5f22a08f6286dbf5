//! Three-month seasons and the month-to-season lookup.

use std::fmt;

use crate::error::CalendarError;

/// A three-month climatological season.
///
/// Variants are declared in calendar order starting with December, which
/// is also the order used when sorting seasonal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    /// December, January, February.
    Djf,
    /// March, April, May.
    Mam,
    /// June, July, August.
    Jja,
    /// September, October, November.
    Son,
}

impl Season {
    /// All seasons in table order.
    pub const ALL: [Season; 4] = [Season::Djf, Season::Mam, Season::Jja, Season::Son];

    /// Returns the three-letter label (`"DJF"`, `"MAM"`, `"JJA"`, `"SON"`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Djf => "DJF",
            Self::Mam => "MAM",
            Self::Jja => "JJA",
            Self::Son => "SON",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Month-to-season lookup covering all twelve months exactly once.
///
/// Passed explicitly to the components that need it rather than read from
/// a global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonTable {
    by_month: [Season; 12],
}

impl SeasonTable {
    /// Builds a table from `(season, months)` assignments.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] for a month outside 1..=12,
    /// [`CalendarError::DuplicateMonth`] if a month is assigned twice and
    /// [`CalendarError::UnassignedMonth`] if a month has no season.
    pub fn new(assignments: &[(Season, &[u8])]) -> Result<Self, CalendarError> {
        let mut slots: [Option<Season>; 12] = [None; 12];
        for &(season, months) in assignments {
            for &month in months {
                if !(1..=12).contains(&month) {
                    return Err(CalendarError::InvalidMonth { month });
                }
                let slot = &mut slots[usize::from(month - 1)];
                if slot.is_some() {
                    return Err(CalendarError::DuplicateMonth { month });
                }
                *slot = Some(season);
            }
        }

        let mut by_month = [Season::Djf; 12];
        for (i, slot) in slots.iter().enumerate() {
            // i < 12, so the cast is lossless
            by_month[i] = slot.ok_or(CalendarError::UnassignedMonth { month: i as u8 + 1 })?;
        }
        Ok(Self { by_month })
    }

    /// The standard meteorological seasons: DJF={12,1,2}, MAM={3,4,5},
    /// JJA={6,7,8}, SON={9,10,11}.
    pub fn standard() -> Self {
        use Season::*;
        Self {
            by_month: [Djf, Djf, Mam, Mam, Mam, Jja, Jja, Jja, Son, Son, Son, Djf],
        }
    }

    /// Returns the season of `month`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn season_of(&self, month: u8) -> Result<Season, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        Ok(self.by_month[usize::from(month - 1)])
    }

    /// Returns the months assigned to `season`, in calendar order.
    pub fn months_in(&self, season: Season) -> Vec<u8> {
        (1..=12u8)
            .filter(|&m| self.by_month[usize::from(m - 1)] == season)
            .collect()
    }

    /// Returns how many months `season` spans in this table.
    pub fn season_len(&self, season: Season) -> usize {
        self.by_month.iter().filter(|&&s| s == season).count()
    }
}

impl Default for SeasonTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_mapping() {
        let t = SeasonTable::standard();
        assert_eq!(t.season_of(12).unwrap(), Season::Djf);
        assert_eq!(t.season_of(1).unwrap(), Season::Djf);
        assert_eq!(t.season_of(2).unwrap(), Season::Djf);
        assert_eq!(t.season_of(4).unwrap(), Season::Mam);
        assert_eq!(t.season_of(7).unwrap(), Season::Jja);
        assert_eq!(t.season_of(10).unwrap(), Season::Son);
    }

    #[test]
    fn standard_matches_explicit_construction() {
        let explicit = SeasonTable::new(&[
            (Season::Djf, &[12, 1, 2]),
            (Season::Mam, &[3, 4, 5]),
            (Season::Jja, &[6, 7, 8]),
            (Season::Son, &[9, 10, 11]),
        ])
        .unwrap();
        assert_eq!(explicit, SeasonTable::standard());
    }

    #[test]
    fn months_in_calendar_order() {
        let t = SeasonTable::standard();
        assert_eq!(t.months_in(Season::Djf), vec![1, 2, 12]);
        assert_eq!(t.months_in(Season::Son), vec![9, 10, 11]);
    }

    #[test]
    fn season_len_three() {
        let t = SeasonTable::standard();
        for s in Season::ALL {
            assert_eq!(t.season_len(s), 3);
        }
    }

    #[test]
    fn duplicate_month_rejected() {
        let err = SeasonTable::new(&[
            (Season::Djf, &[12, 1, 2]),
            (Season::Mam, &[2, 3, 4, 5]),
            (Season::Jja, &[6, 7, 8]),
            (Season::Son, &[9, 10, 11]),
        ])
        .unwrap_err();
        assert_eq!(err, CalendarError::DuplicateMonth { month: 2 });
    }

    #[test]
    fn unassigned_month_rejected() {
        let err = SeasonTable::new(&[
            (Season::Djf, &[12, 1, 2]),
            (Season::Mam, &[3, 4, 5]),
            (Season::Jja, &[6, 7, 8]),
            (Season::Son, &[9, 10]),
        ])
        .unwrap_err();
        assert_eq!(err, CalendarError::UnassignedMonth { month: 11 });
    }

    #[test]
    fn invalid_month_lookup() {
        let t = SeasonTable::standard();
        assert_eq!(
            t.season_of(0).unwrap_err(),
            CalendarError::InvalidMonth { month: 0 }
        );
    }

    #[test]
    fn season_order_starts_with_djf() {
        let mut seasons = vec![Season::Son, Season::Djf, Season::Jja, Season::Mam];
        seasons.sort();
        assert_eq!(seasons, Season::ALL.to_vec());
    }

    #[test]
    fn labels() {
        let labels: Vec<&str> = Season::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["DJF", "MAM", "JJA", "SON"]);
        assert_eq!(Season::Jja.to_string(), "JJA");
    }
}
