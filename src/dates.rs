//! Calendar-month window math shared by every temporal record type.

use chrono::{Datelike, Duration, NaiveDate};

/// Number of days in the given calendar month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

pub fn first_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)).unwrap()
}

/// The (year, month) pair immediately before the given one.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// The (year, month) pair immediately after the given one.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Whether (year, month) is the calendar month the status date falls in.
pub fn is_month_of(year: i32, month: u32, status_date: NaiveDate) -> bool {
    year == status_date.year() && month == status_date.month()
}

/// Whether (year, month) is the calendar month before the status date's month.
pub fn is_last_month_of(year: i32, month: u32, status_date: NaiveDate) -> bool {
    previous_month(status_date.year(), status_date.month()) == (year, month)
}

/// Whether the year is the status date's calendar year.
pub fn is_year_of(year: i32, status_date: NaiveDate) -> bool {
    year == status_date.year()
}

/// Whether the year is the calendar year before the status date's.
pub fn is_last_year_of(year: i32, status_date: NaiveDate) -> bool {
    year == status_date.year() - 1
}
