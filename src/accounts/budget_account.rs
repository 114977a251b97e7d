use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::accounts::group::BudgetAccountGroup;
use crate::accounts::group_status::BudgetAccountGroupStatus;
use crate::calculate::Calculable;
use crate::dates;
use crate::errors::{DomainError, Result};
use crate::info::{BudgetInfoCollection, BudgetInfoValues};
use crate::posting::{PostingLine, PostingLineCollection};
use crate::protection::{Deletable, Protectable, Protection};

/// An income/expense budget account: monthly budget buckets plus the ledger
/// slice of lines referencing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAccount {
    accounting_number: i32,
    account_number: String,
    account_name: String,
    description: Option<String>,
    note: Option<String>,
    budget_account_group: BudgetAccountGroup,
    budget_infos: BudgetInfoCollection,
    posting_lines: PostingLineCollection,
    protection: Protection,
    status_date: Option<NaiveDate>,
}

impl BudgetAccount {
    pub fn new(
        accounting_number: i32,
        account_number: impl Into<String>,
        account_name: impl Into<String>,
        budget_account_group: BudgetAccountGroup,
    ) -> Result<Self> {
        let account_number = account_number.into();
        let account_name = account_name.into();
        if account_number.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "budget account requires an account number".into(),
            ));
        }
        if account_name.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "budget account requires a name".into(),
            ));
        }
        Ok(Self {
            accounting_number,
            account_number,
            account_name,
            description: None,
            note: None,
            budget_account_group,
            budget_infos: BudgetInfoCollection::new(),
            posting_lines: PostingLineCollection::new(),
            protection: Protection::default(),
            status_date: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn accounting_number(&self) -> i32 {
        self.accounting_number
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn budget_account_group(&self) -> &BudgetAccountGroup {
        &self.budget_account_group
    }

    pub fn budget_infos(&self) -> &BudgetInfoCollection {
        &self.budget_infos
    }

    pub fn posting_lines(&self) -> &PostingLineCollection {
        &self.posting_lines
    }

    pub fn add_budget_info(&mut self, info: crate::info::BudgetInfo) -> Result<()> {
        self.budget_infos.add(info)
    }

    /// Adds a posting line to this budget account's ledger slice. The line
    /// must reference this budget account.
    pub fn add_posting_line(&mut self, line: PostingLine) -> Result<()> {
        let references_self = line
            .budget_account_number()
            .is_some_and(|number| number.eq_ignore_ascii_case(&self.account_number));
        if !references_self {
            return Err(DomainError::InvalidArgument(format!(
                "posting line does not reference budget account {}",
                self.account_number
            )));
        }
        self.posting_lines.add(line)
    }

    pub fn values_for_month_of_status_date(&self) -> BudgetInfoValues {
        self.budget_infos.values_for_month_of_status_date()
    }

    pub fn values_for_last_month_of_status_date(&self) -> BudgetInfoValues {
        self.budget_infos.values_for_last_month_of_status_date()
    }

    pub fn values_for_year_to_date_of_status_date(&self) -> BudgetInfoValues {
        self.budget_infos.values_for_year_to_date_of_status_date()
    }

    pub fn values_for_last_year_of_status_date(&self) -> BudgetInfoValues {
        self.budget_infos.values_for_last_year_of_status_date()
    }

    fn attach_line_snapshots(
        posting_lines: &PostingLineCollection,
        budget_infos: &BudgetInfoCollection,
        status_date: NaiveDate,
    ) -> PostingLineCollection {
        let lines = posting_lines
            .iter()
            .map(|line| {
                if line.posting_date() > status_date {
                    return line.without_calculations();
                }
                let budget = budget_infos
                    .find(line.posting_date())
                    .map(|info| info.budget())
                    .unwrap_or_default();
                let month_start = dates::first_day_of_month(
                    line.posting_date().year(),
                    line.posting_date().month(),
                );
                let posted = posting_lines.calculate_posting_value(
                    month_start,
                    line.posting_date(),
                    Some(line.sort_order()),
                );
                line.apply_budget_account_calculation(BudgetInfoValues { budget, posted })
            })
            .collect();
        posting_lines.with_replaced_lines(lines)
    }
}

impl PartialEq for BudgetAccount {
    fn eq(&self, other: &Self) -> bool {
        self.accounting_number == other.accounting_number
            && self
                .account_number
                .eq_ignore_ascii_case(&other.account_number)
    }
}

impl Eq for BudgetAccount {}

impl Hash for BudgetAccount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.accounting_number.hash(state);
        self.account_number.to_uppercase().hash(state);
    }
}

#[async_trait]
impl Calculable for BudgetAccount {
    fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    async fn calculate_as_of(&self, status_date: NaiveDate) -> Result<Self> {
        if self.status_date == Some(status_date) {
            return Ok(self.clone());
        }
        tracing::trace!(
            budget_account = %self.account_number,
            %status_date,
            "calculating budget account"
        );
        let (budget_infos, posting_lines) = futures::try_join!(
            self.budget_infos
                .calculate_with(status_date, &self.posting_lines),
            self.posting_lines.calculate_as_of(status_date),
        )?;
        let posting_lines =
            Self::attach_line_snapshots(&posting_lines, &budget_infos, status_date);
        Ok(Self {
            budget_infos,
            posting_lines,
            status_date: Some(status_date),
            ..self.clone()
        })
    }
}

impl Protectable for BudgetAccount {
    fn is_protected(&self) -> bool {
        self.protection.is_protected()
    }

    fn apply_protection(&mut self) {
        self.protection.apply_protection();
        self.budget_infos.apply_protection();
    }
}

impl Deletable for BudgetAccount {
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

/// Budget accounts of one accounting, unique by composite identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetAccountCollection {
    accounts: Vec<BudgetAccount>,
    status_date: Option<NaiveDate>,
}

impl BudgetAccountCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, account: BudgetAccount) -> Result<()> {
        if self.accounts.iter().any(|existing| *existing == account) {
            return Err(DomainError::Conflict(format!(
                "budget account {} already exists",
                account.account_number()
            )));
        }
        self.accounts.push(account);
        Ok(())
    }

    pub fn find(&self, account_number: &str) -> Option<&BudgetAccount> {
        self.accounts
            .iter()
            .find(|account| account.account_number().eq_ignore_ascii_case(account_number))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BudgetAccount> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn values_for_month_of_status_date(&self) -> BudgetInfoValues {
        self.accounts
            .iter()
            .map(BudgetAccount::values_for_month_of_status_date)
            .fold(BudgetInfoValues::default(), |sum, values| sum + values)
    }

    pub fn values_for_last_month_of_status_date(&self) -> BudgetInfoValues {
        self.accounts
            .iter()
            .map(BudgetAccount::values_for_last_month_of_status_date)
            .fold(BudgetInfoValues::default(), |sum, values| sum + values)
    }

    pub fn values_for_year_to_date_of_status_date(&self) -> BudgetInfoValues {
        self.accounts
            .iter()
            .map(BudgetAccount::values_for_year_to_date_of_status_date)
            .fold(BudgetInfoValues::default(), |sum, values| sum + values)
    }

    pub fn values_for_last_year_of_status_date(&self) -> BudgetInfoValues {
        self.accounts
            .iter()
            .map(BudgetAccount::values_for_last_year_of_status_date)
            .fold(BudgetInfoValues::default(), |sum, values| sum + values)
    }

    /// Applies permanent protection to every budget account.
    pub fn apply_protection(&mut self) {
        for account in &mut self.accounts {
            account.apply_protection();
        }
    }

    /// Groups the calculated budget accounts by their group and returns one
    /// status per distinct group, each calculated against this collection's
    /// status date.
    pub async fn group_by_budget_account_group(
        &self,
    ) -> Result<Vec<BudgetAccountGroupStatus>> {
        let status_date = self.status_date.ok_or_else(|| {
            DomainError::NotCalculated(
                "budget account collection must be calculated before grouping".into(),
            )
        })?;

        let mut statuses: Vec<BudgetAccountGroupStatus> = Vec::new();
        for account in &self.accounts {
            let group_number = account.budget_account_group().number();
            match statuses
                .iter_mut()
                .find(|status| status.group().number() == group_number)
            {
                Some(status) => status.add_member(account.clone())?,
                None => {
                    let mut status =
                        BudgetAccountGroupStatus::new(account.budget_account_group().clone());
                    status.add_member(account.clone())?;
                    statuses.push(status);
                }
            }
        }
        try_join_all(
            statuses
                .iter()
                .map(|status| status.calculate_as_of(status_date)),
        )
        .await
    }
}

#[async_trait]
impl Calculable for BudgetAccountCollection {
    fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    async fn calculate_as_of(&self, status_date: NaiveDate) -> Result<Self> {
        if self.status_date == Some(status_date) {
            return Ok(self.clone());
        }
        let accounts = try_join_all(
            self.accounts
                .iter()
                .map(|account| account.calculate_as_of(status_date)),
        )
        .await?;
        Ok(Self {
            accounts,
            status_date: Some(status_date),
        })
    }
}
