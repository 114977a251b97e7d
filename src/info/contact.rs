//! Running balances for debtor/creditor contacts per calendar month.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::errors::Result;
use crate::info::{self, MonthBucket};
use crate::posting::PostingLineCollection;
use crate::protection::{Deletable, Protectable, Protection};

/// Calculated running balance of a contact for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    year: i32,
    month: u32,
    balance: Decimal,
    protection: Protection,
}

impl ContactInfo {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        info::validate_month(year, month)?;
        Ok(Self {
            year,
            month,
            balance: Decimal::ZERO,
            protection: Protection::default(),
        })
    }

    /// Running balance at the end of this month (or at the status date when
    /// the status date falls inside this month). Zero until calculated.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn values(&self) -> ContactInfoValues {
        ContactInfoValues {
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

impl MonthBucket for ContactInfo {
    fn year(&self) -> i32 {
        self.year
    }

    fn month(&self) -> u32 {
        self.month
    }
}

impl Protectable for ContactInfo {
    fn is_protected(&self) -> bool {
        self.protection.is_protected()
    }

    fn apply_protection(&mut self) {
        self.protection.apply_protection();
    }
}

impl Deletable for ContactInfo {
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

/// As-of snapshot of a contact balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfoValues {
    pub balance: Decimal,
}

impl std::ops::Add for ContactInfoValues {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            balance: self.balance + other.balance,
        }
    }
}

/// Ordered collection of contact balance buckets, unique per (year, month).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfoCollection {
    infos: Vec<ContactInfo>,
    status_date: Option<NaiveDate>,
}

impl ContactInfoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    pub fn add(&mut self, info: ContactInfo) -> Result<()> {
        info::insert_bucket(&mut self.infos, info)
    }

    pub fn first(&self) -> Option<&ContactInfo> {
        self.infos.first()
    }

    pub fn last(&self) -> Option<&ContactInfo> {
        self.infos.last()
    }

    pub fn find(&self, date: NaiveDate) -> Option<&ContactInfo> {
        info::find_bucket(&self.infos, date)
    }

    pub fn prev(&self, info: &ContactInfo) -> Option<&ContactInfo> {
        info::bucket_before(&self.infos, info)
    }

    pub fn next(&self, info: &ContactInfo) -> Option<&ContactInfo> {
        info::bucket_after(&self.infos, info)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContactInfo> {
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

    /// Calculates every bucket's running balance against the owning contact
    /// account's ledger slice. Short-circuits when already calculated.
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

    /// Balance of the bucket containing the status date, zero when absent or
    /// not yet calculated.
    pub fn values_at_status_date(&self) -> ContactInfoValues {
        self.status_date
            .and_then(|date| self.find(date))
            .map(ContactInfo::values)
            .unwrap_or_default()
    }

    pub fn values_at_end_of_last_month_from_status_date(&self) -> ContactInfoValues {
        self.status_date
            .and_then(|date| {
                let (year, month) = dates::previous_month(date.year(), date.month());
                self.find(dates::first_day_of_month(year, month))
            })
            .map(ContactInfo::values)
            .unwrap_or_default()
    }

    pub fn values_at_end_of_last_year_from_status_date(&self) -> ContactInfoValues {
        self.status_date
            .and_then(|date| self.find(dates::last_day_of_month(date.year() - 1, 12)))
            .map(ContactInfo::values)
            .unwrap_or_default()
    }
}
