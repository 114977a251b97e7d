//! Budgeted income/expenses and posted amounts per calendar month.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::errors::Result;
use crate::info::{self, MonthBucket};
use crate::posting::PostingLineCollection;
use crate::protection::{Deletable, Protectable, Protection};

/// Budgeted income and expenses for one calendar month, plus the posted
/// amount calculated from the owning account's ledger slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInfo {
    year: i32,
    month: u32,
    income: Decimal,
    expenses: Decimal,
    posted: Decimal,
    protection: Protection,
}

impl BudgetInfo {
    pub fn new(year: i32, month: u32, income: Decimal, expenses: Decimal) -> Result<Self> {
        info::validate_month(year, month)?;
        Ok(Self {
            year,
            month,
            income,
            expenses,
            posted: Decimal::ZERO,
            protection: Protection::default(),
        })
    }

    pub fn income(&self) -> Decimal {
        self.income
    }

    pub fn expenses(&self) -> Decimal {
        self.expenses
    }

    /// Net budget for the month: income minus expenses.
    pub fn budget(&self) -> Decimal {
        self.income - self.expenses
    }

    /// Posting-value sum within this month, bounded by the status date.
    /// Zero until calculated.
    pub fn posted(&self) -> Decimal {
        self.posted
    }

    pub fn values(&self) -> BudgetInfoValues {
        BudgetInfoValues {
            budget: self.budget(),
            posted: self.posted,
        }
    }

    fn calculated(&self, status_date: NaiveDate, ledger: &PostingLineCollection) -> Self {
        let mut info = self.clone();
        info.posted = if self.from_date() > status_date {
            Decimal::ZERO
        } else {
            let upper = self.to_date().min(status_date);
            ledger.calculate_posting_value(self.from_date(), upper, None)
        };
        info
    }
}

impl MonthBucket for BudgetInfo {
    fn year(&self) -> i32 {
        self.year
    }

    fn month(&self) -> u32 {
        self.month
    }
}

impl Protectable for BudgetInfo {
    fn is_protected(&self) -> bool {
        self.protection.is_protected()
    }

    fn apply_protection(&mut self) {
        self.protection.apply_protection();
    }
}

impl Deletable for BudgetInfo {
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

/// As-of snapshot of a budget window: net budget and posted amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetInfoValues {
    pub budget: Decimal,
    pub posted: Decimal,
}

impl BudgetInfoValues {
    /// Remaining budget; negative once the budget is exceeded.
    pub fn available(&self) -> Decimal {
        self.budget - self.posted
    }
}

impl std::ops::Add for BudgetInfoValues {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            budget: self.budget + other.budget,
            posted: self.posted + other.posted,
        }
    }
}

/// Ordered collection of budget buckets, unique per (year, month).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetInfoCollection {
    infos: Vec<BudgetInfo>,
    status_date: Option<NaiveDate>,
}

impl BudgetInfoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    pub fn add(&mut self, info: BudgetInfo) -> Result<()> {
        info::insert_bucket(&mut self.infos, info)
    }

    pub fn first(&self) -> Option<&BudgetInfo> {
        self.infos.first()
    }

    pub fn last(&self) -> Option<&BudgetInfo> {
        self.infos.last()
    }

    pub fn find(&self, date: NaiveDate) -> Option<&BudgetInfo> {
        info::find_bucket(&self.infos, date)
    }

    pub fn prev(&self, info: &BudgetInfo) -> Option<&BudgetInfo> {
        info::bucket_before(&self.infos, info)
    }

    pub fn next(&self, info: &BudgetInfo) -> Option<&BudgetInfo> {
        info::bucket_after(&self.infos, info)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BudgetInfo> {
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

    /// Calculates every bucket's posted amount against the owning account's
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

    /// Values of the bucket for the status date's month, zero when absent or
    /// not yet calculated.
    pub fn values_for_month_of_status_date(&self) -> BudgetInfoValues {
        self.status_date
            .and_then(|date| self.find(date))
            .map(BudgetInfo::values)
            .unwrap_or_default()
    }

    pub fn values_for_last_month_of_status_date(&self) -> BudgetInfoValues {
        self.status_date
            .and_then(|date| {
                let (year, month) = dates::previous_month(date.year(), date.month());
                self.find(dates::first_day_of_month(year, month))
            })
            .map(BudgetInfo::values)
            .unwrap_or_default()
    }

    /// Sum of the buckets from January through the status month of the
    /// status year.
    pub fn values_for_year_to_date_of_status_date(&self) -> BudgetInfoValues {
        let Some(date) = self.status_date else {
            return BudgetInfoValues::default();
        };
        self.infos
            .iter()
            .filter(|info| info.year == date.year() && info.month <= date.month())
            .map(BudgetInfo::values)
            .fold(BudgetInfoValues::default(), |sum, values| sum + values)
    }

    /// Sum of all buckets of the calendar year before the status year.
    pub fn values_for_last_year_of_status_date(&self) -> BudgetInfoValues {
        let Some(date) = self.status_date else {
            return BudgetInfoValues::default();
        };
        self.infos
            .iter()
            .filter(|info| info.year == date.year() - 1)
            .map(BudgetInfo::values)
            .fold(BudgetInfoValues::default(), |sum, values| sum + values)
    }
}
