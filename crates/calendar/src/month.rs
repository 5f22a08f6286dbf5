//! Gregorian month lengths and monthly date sequences.

use chrono::NaiveDate;

use crate::error::CalendarError;

/// Number of seconds in one civil day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Returns `true` for leap years on the proleptic Gregorian calendar.
fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Returns the number of days in `month` of `year`.
///
/// February has 29 days in Gregorian leap years.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
pub fn days_in_month(year: i32, month: u8) -> Result<u8, CalendarError> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        4 | 6 | 9 | 11 => Ok(30),
        2 if is_leap(year) => Ok(29),
        2 => Ok(28),
        _ => Err(CalendarError::InvalidMonth { month }),
    }
}

/// Returns the number of seconds in `month` of `year`.
///
/// Multiplying a monthly mean rate given per second by this factor yields
/// the amount accumulated over the month.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
pub fn seconds_in_month(year: i32, month: u8) -> Result<u32, CalendarError> {
    Ok(u32::from(days_in_month(year, month)?) * SECONDS_PER_DAY)
}

/// Generates `n` consecutive first-of-month dates starting at
/// `start_year`-`start_month`-01.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `start_month` is outside
/// 1..=12.
pub fn month_starts(
    start_year: i32,
    start_month: u8,
    n: usize,
) -> Result<Vec<NaiveDate>, CalendarError> {
    if !(1..=12).contains(&start_month) {
        return Err(CalendarError::InvalidMonth { month: start_month });
    }

    let mut dates = Vec::with_capacity(n);
    let mut year = start_year;
    let mut month = start_month;
    for _ in 0..n {
        let date = NaiveDate::from_ymd_opt(year, u32::from(month), 1).ok_or(
            CalendarError::InvalidDate {
                year,
                month,
                day: 1,
            },
        )?;
        dates.push(date);
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }
    Ok(dates)
}
