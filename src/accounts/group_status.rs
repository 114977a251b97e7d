//! Group-level rollups over account subsets.
//!
//! A group status wraps a category descriptor plus the member accounts that
//! belonged to it when the grouping operation ran. Membership is fixed at
//! construction; recalculating only re-derives the members' sums for a new
//! status date.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accounts::account::AccountCollection;
use crate::accounts::budget_account::BudgetAccountCollection;
use crate::accounts::group::{AccountGroup, BudgetAccountGroup};
use crate::accounts::{Account, BudgetAccount};
use crate::calculate::Calculable;
use crate::errors::Result;
use crate::info::{BudgetInfoValues, CreditInfoValues};

/// As-of rollup of the accounts belonging to one account group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountGroupStatus {
    group: AccountGroup,
    accounts: AccountCollection,
    status_date: Option<NaiveDate>,
}

impl AccountGroupStatus {
    pub fn new(group: AccountGroup) -> Self {
        Self {
            group,
            accounts: AccountCollection::new(),
            status_date: None,
        }
    }

    pub(crate) fn add_member(&mut self, account: Account) -> Result<()> {
        self.accounts.add(account)
    }

    pub fn group(&self) -> &AccountGroup {
        &self.group
    }

    pub fn accounts(&self) -> &AccountCollection {
        &self.accounts
    }

    pub fn values_at_status_date(&self) -> CreditInfoValues {
        self.accounts.values_at_status_date()
    }

    pub fn values_at_end_of_last_month_from_status_date(&self) -> CreditInfoValues {
        self.accounts.values_at_end_of_last_month_from_status_date()
    }

    pub fn values_at_end_of_last_year_from_status_date(&self) -> CreditInfoValues {
        self.accounts.values_at_end_of_last_year_from_status_date()
    }
}

#[async_trait]
impl Calculable for AccountGroupStatus {
    fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    async fn calculate_as_of(&self, status_date: NaiveDate) -> Result<Self> {
        if self.status_date == Some(status_date) {
            return Ok(self.clone());
        }
        let accounts = self.accounts.calculate_as_of(status_date).await?;
        Ok(Self {
            group: self.group.clone(),
            accounts,
            status_date: Some(status_date),
        })
    }
}

/// As-of rollup of the budget accounts belonging to one budget account group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAccountGroupStatus {
    group: BudgetAccountGroup,
    accounts: BudgetAccountCollection,
    status_date: Option<NaiveDate>,
}

impl BudgetAccountGroupStatus {
    pub fn new(group: BudgetAccountGroup) -> Self {
        Self {
            group,
            accounts: BudgetAccountCollection::new(),
            status_date: None,
        }
    }

    pub(crate) fn add_member(&mut self, account: BudgetAccount) -> Result<()> {
        self.accounts.add(account)
    }

    pub fn group(&self) -> &BudgetAccountGroup {
        &self.group
    }

    pub fn accounts(&self) -> &BudgetAccountCollection {
        &self.accounts
    }

    pub fn values_for_month_of_status_date(&self) -> BudgetInfoValues {
        self.accounts.values_for_month_of_status_date()
    }

    pub fn values_for_last_month_of_status_date(&self) -> BudgetInfoValues {
        self.accounts.values_for_last_month_of_status_date()
    }

    pub fn values_for_year_to_date_of_status_date(&self) -> BudgetInfoValues {
        self.accounts.values_for_year_to_date_of_status_date()
    }

    pub fn values_for_last_year_of_status_date(&self) -> BudgetInfoValues {
        self.accounts.values_for_last_year_of_status_date()
    }
}

#[async_trait]
impl Calculable for BudgetAccountGroupStatus {
    fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    async fn calculate_as_of(&self, status_date: NaiveDate) -> Result<Self> {
        if self.status_date == Some(status_date) {
            return Ok(self.clone());
        }
        let accounts = self.accounts.calculate_as_of(status_date).await?;
        Ok(Self {
            group: self.group.clone(),
            accounts,
            status_date: Some(status_date),
        })
    }
}
