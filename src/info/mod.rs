//! Monthly time-series records and their ordered collections.
//!
//! Every balance type in the crate is built on one calendar-month bucket kind
//! (credit, budget or contact info) plus an ordered collection unique per
//! (year, month). The shared window math lives in free functions here and in
//! [`crate::dates`] instead of an inheritance chain.

pub mod budget;
pub mod contact;
pub mod credit;

pub use budget::{BudgetInfo, BudgetInfoCollection, BudgetInfoValues};
pub use contact::{ContactInfo, ContactInfoCollection, ContactInfoValues};
pub use credit::{CreditInfo, CreditInfoCollection, CreditInfoValues};

use chrono::{Datelike, NaiveDate};

use crate::dates;
use crate::errors::{DomainError, Result};

/// One calendar-month bucket in a temporal record collection.
pub trait MonthBucket {
    fn year(&self) -> i32;
    fn month(&self) -> u32;

    /// First calendar day of the bucket's month.
    fn from_date(&self) -> NaiveDate {
        dates::first_day_of_month(self.year(), self.month())
    }

    /// Last calendar day of the bucket's month.
    fn to_date(&self) -> NaiveDate {
        dates::last_day_of_month(self.year(), self.month())
    }

    fn is_month_of_status_date(&self, status_date: NaiveDate) -> bool {
        dates::is_month_of(self.year(), self.month(), status_date)
    }

    fn is_last_month_of_status_date(&self, status_date: NaiveDate) -> bool {
        dates::is_last_month_of(self.year(), self.month(), status_date)
    }

    fn is_year_of_status_date(&self, status_date: NaiveDate) -> bool {
        dates::is_year_of(self.year(), status_date)
    }

    fn is_last_year_of_status_date(&self, status_date: NaiveDate) -> bool {
        dates::is_last_year_of(self.year(), status_date)
    }
}

/// Rejects month numbers outside 1..=12 before any bucket is built.
pub(crate) fn validate_month(year: i32, month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(DomainError::InvalidArgument(format!(
            "month {month} of year {year} is not a calendar month"
        )));
    }
    Ok(())
}

fn key<T: MonthBucket>(bucket: &T) -> (i32, u32) {
    (bucket.year(), bucket.month())
}

/// Inserts a bucket keeping (year, month) order; duplicate keys are a
/// conflict and leave the collection unchanged.
pub(crate) fn insert_bucket<T: MonthBucket>(buckets: &mut Vec<T>, bucket: T) -> Result<()> {
    match buckets.binary_search_by_key(&key(&bucket), key) {
        Ok(_) => Err(DomainError::Conflict(format!(
            "month bucket {}-{:02} already exists",
            bucket.year(),
            bucket.month()
        ))),
        Err(position) => {
            buckets.insert(position, bucket);
            Ok(())
        }
    }
}

/// The bucket whose month contains the given date, if any.
pub(crate) fn find_bucket<T: MonthBucket>(buckets: &[T], date: NaiveDate) -> Option<&T> {
    let target = (date.year(), date.month());
    buckets
        .binary_search_by_key(&target, key)
        .ok()
        .map(|position| &buckets[position])
}

/// The bucket ordered immediately before the given one, if any.
pub(crate) fn bucket_before<'a, T: MonthBucket>(buckets: &'a [T], bucket: &T) -> Option<&'a T> {
    match buckets.binary_search_by_key(&key(bucket), key) {
        Ok(0) => None,
        Ok(position) => Some(&buckets[position - 1]),
        Err(_) => None,
    }
}

/// The bucket ordered immediately after the given one, if any.
pub(crate) fn bucket_after<'a, T: MonthBucket>(buckets: &'a [T], bucket: &T) -> Option<&'a T> {
    match buckets.binary_search_by_key(&key(bucket), key) {
        Ok(position) => buckets.get(position + 1),
        Err(_) => None,
    }
}
