//! The accounting root: owns the account collections and drives the
//! top-level calculation cascade and protection cascade.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accounts::{AccountCollection, BudgetAccountCollection, ContactAccountCollection};
use crate::calculate::Calculable;
use crate::errors::{DomainError, Result};
use crate::protection::{Deletable, Protectable, Protection};

/// One accounting: a numeric identity, a display name and the three account
/// collections. Accounts hold the accounting number back-reference for
/// identity only; all ownership lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accounting {
    number: i32,
    name: String,
    accounts: AccountCollection,
    budget_accounts: BudgetAccountCollection,
    contact_accounts: ContactAccountCollection,
    protection: Protection,
    status_date: Option<NaiveDate>,
}

impl Accounting {
    pub fn new(number: i32, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "accounting requires a name".into(),
            ));
        }
        Ok(Self {
            number,
            name,
            accounts: AccountCollection::new(),
            budget_accounts: BudgetAccountCollection::new(),
            contact_accounts: ContactAccountCollection::new(),
            protection: Protection::default(),
            status_date: None,
        })
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accounts(&self) -> &AccountCollection {
        &self.accounts
    }

    pub fn budget_accounts(&self) -> &BudgetAccountCollection {
        &self.budget_accounts
    }

    pub fn contact_accounts(&self) -> &ContactAccountCollection {
        &self.contact_accounts
    }

    pub fn add_account(&mut self, account: crate::accounts::Account) -> Result<()> {
        self.ensure_owned(account.accounting_number())?;
        self.accounts.add(account)
    }

    pub fn add_budget_account(&mut self, account: crate::accounts::BudgetAccount) -> Result<()> {
        self.ensure_owned(account.accounting_number())?;
        self.budget_accounts.add(account)
    }

    pub fn add_contact_account(&mut self, account: crate::accounts::ContactAccount) -> Result<()> {
        self.ensure_owned(account.accounting_number())?;
        self.contact_accounts.add(account)
    }

    fn ensure_owned(&self, accounting_number: i32) -> Result<()> {
        if accounting_number != self.number {
            return Err(DomainError::InvalidArgument(format!(
                "account belongs to accounting {accounting_number}, not {}",
                self.number
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Calculable for Accounting {
    fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    async fn calculate_as_of(&self, status_date: NaiveDate) -> Result<Self> {
        if self.status_date == Some(status_date) {
            return Ok(self.clone());
        }
        tracing::debug!(accounting = self.number, %status_date, "calculating accounting");
        let (accounts, budget_accounts, contact_accounts) = futures::try_join!(
            self.accounts.calculate_as_of(status_date),
            self.budget_accounts.calculate_as_of(status_date),
            self.contact_accounts.calculate_as_of(status_date),
        )?;
        Ok(Self {
            number: self.number,
            name: self.name.clone(),
            accounts,
            budget_accounts,
            contact_accounts,
            protection: self.protection,
            status_date: Some(status_date),
        })
    }
}

impl Protectable for Accounting {
    fn is_protected(&self) -> bool {
        self.protection.is_protected()
    }

    fn apply_protection(&mut self) {
        self.protection.apply_protection();
        self.accounts.apply_protection();
        self.budget_accounts.apply_protection();
        self.contact_accounts.apply_protection();
    }
}

impl Deletable for Accounting {
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
