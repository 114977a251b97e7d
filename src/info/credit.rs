//! Credit limit and running balance per calendar month.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::errors::Result;
use crate::info::{self, MonthBucket};
use crate::posting::PostingLineCollection;
use crate::protection::{Deletable, Protectable, Protection};

/// Credit limit and calculated running balance for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditInfo {
    year: i32,
    month: u32,
    credit: Decimal,
    balance: Decimal,
    protection: Protection,
}

impl CreditInfo {
    pub fn new(year: i32, month: u32, credit: Decimal) -> Result<Self> {
        info::validate_month(year, month)?;
        Ok(Self {
            year,
            month,
            credit,
            balance: Decimal::ZERO,
            protection: Protection::default(),
        })
    }

    pub fn credit(&self) -> Decimal {
        self.credit
    }

    /// Running balance at the end of this month (or at the status date when
    /// the status date falls inside this month). Zero until calculated.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn values(&self) -> CreditInfoValues {
        CreditInfoValues {
            credit: self.credit,
            balance: self.balance,
        }
    }

    fn calculated(&self, status_date: NaiveDate, ledger: &PostingLineCollection) -> Self {
        let mut info = self.clone();
        info.balance = if self.from_date() > status_date {
            Decimal::ZERO
        } else {
            let upper = self.to_date().min(status_date);
            ledger.calculate_posting_value(NaiveDate::MIN, upper, None)
        };
        info
    }
}

impl MonthBucket for CreditInfo {
    fn year(&self) -> i32 {
        self.year
    }

    fn month(&self) -> u32 {
        self.month
    }
}

impl Protectable for CreditInfo {
    fn is_protected(&self) -> bool {
        self.protection.is_protected()
    }

    fn apply_protection(&mut self) {
        self.protection.apply_protection();
    }
}

impl Deletable for CreditInfo {
    fn deletable(&self) -> bool {
        self.protection.deletable()
    }

    fn allow_deletion(&mut self) {
        self.protection.allow_deletion();
    }

    fn disallow_deletion(&mut self) {
        self.protection.disallow_deletion();
    }
}

/// As-of snapshot of a credit bucket: limit plus signed running balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditInfoValues {
    pub credit: Decimal,
    pub balance: Decimal,
}

impl CreditInfoValues {
    /// Remaining draw room; negative when the limit is breached.
    pub fn available(&self) -> Decimal {
        self.credit + self.balance
    }
}

impl std::ops::Add for CreditInfoValues {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            credit: self.credit + other.credit,
            balance: self.balance + other.balance,
        }
    }
}

/// Ordered collection of credit buckets, unique per (year, month).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditInfoCollection {
    infos: Vec<CreditInfo>,
    status_date: Option<NaiveDate>,
}

impl CreditInfoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    pub fn add(&mut self, info: CreditInfo) -> Result<()> {
        info::insert_bucket(&mut self.infos, info)
    }

    pub fn first(&self) -> Option<&CreditInfo> {
        self.infos.first()
    }

    pub fn last(&self) -> Option<&CreditInfo> {
        self.infos.last()
    }

    pub fn find(&self, date: NaiveDate) -> Option<&CreditInfo> {
        info::find_bucket(&self.infos, date)
    }

    pub fn prev(&self, info: &CreditInfo) -> Option<&CreditInfo> {
        info::bucket_before(&self.infos, info)
    }

    pub fn next(&self, info: &CreditInfo) -> Option<&CreditInfo> {
        info::bucket_after(&self.infos, info)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CreditInfo> {
        self.infos.iter()
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Applies permanent protection to every bucket.
    pub fn apply_protection(&mut self) {
        for info in &mut self.infos {
            info.apply_protection();
        }
    }

    /// Calculates every bucket's running balance against the owning account's
    /// ledger slice. Short-circuits when already calculated for the date.
    pub async fn calculate_with(
        &self,
        status_date: NaiveDate,
        ledger: &PostingLineCollection,
    ) -> Result<Self> {
        if self.status_date == Some(status_date) {
            return Ok(self.clone());
        }
        let infos = self
            .infos
            .iter()
            .map(|info| info.calculated(status_date, ledger))
            .collect();
        Ok(Self {
            infos,
            status_date: Some(status_date),
        })
    }

    /// Values of the bucket containing the status date, zero when absent or
    /// not yet calculated.
    pub fn values_at_status_date(&self) -> CreditInfoValues {
        self.status_date
            .and_then(|date| self.find(date))
            .map(CreditInfo::values)
            .unwrap_or_default()
    }

    pub fn values_at_end_of_last_month_from_status_date(&self) -> CreditInfoValues {
        self.status_date
            .and_then(|date| {
                let (year, month) = dates::previous_month(date.year(), date.month());
                self.find(dates::first_day_of_month(year, month))
            })
            .map(CreditInfo::values)
            .unwrap_or_default()
    }

    pub fn values_at_end_of_last_year_from_status_date(&self) -> CreditInfoValues {
        self.status_date
            .and_then(|date| self.find(dates::last_day_of_month(date.year() - 1, 12)))
            .map(CreditInfo::values)
            .unwrap_or_default()
    }
}
