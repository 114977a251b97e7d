use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::accounts::group::AccountGroup;
use crate::accounts::group_status::AccountGroupStatus;
use crate::calculate::Calculable;
use crate::errors::{DomainError, Result};
use crate::info::{CreditInfoCollection, CreditInfoValues};
use crate::posting::{PostingLine, PostingLineCollection};
use crate::protection::{Deletable, Protectable, Protection};

/// An asset or liability account: credit buckets plus the ledger slice of
/// lines referencing it.
///
/// Identity is the composite of owning accounting number and case-insensitive
/// account number; equality and hashing use exactly that key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    accounting_number: i32,
    account_number: String,
    account_name: String,
    description: Option<String>,
    note: Option<String>,
    account_group: AccountGroup,
    credit_infos: CreditInfoCollection,
    posting_lines: PostingLineCollection,
    protection: Protection,
    status_date: Option<NaiveDate>,
}

impl Account {
    pub fn new(
        accounting_number: i32,
        account_number: impl Into<String>,
        account_name: impl Into<String>,
        account_group: AccountGroup,
    ) -> Result<Self> {
        let account_number = account_number.into();
        let account_name = account_name.into();
        if account_number.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "account requires an account number".into(),
            ));
        }
        if account_name.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "account requires a name".into(),
            ));
        }
        Ok(Self {
            accounting_number,
            account_number,
            account_name,
            description: None,
            note: None,
            account_group,
            credit_infos: CreditInfoCollection::new(),
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

    pub fn account_group(&self) -> &AccountGroup {
        &self.account_group
    }

    pub fn credit_infos(&self) -> &CreditInfoCollection {
        &self.credit_infos
    }

    pub fn posting_lines(&self) -> &PostingLineCollection {
        &self.posting_lines
    }

    pub fn add_credit_info(&mut self, info: crate::info::CreditInfo) -> Result<()> {
        self.credit_infos.add(info)
    }

    /// Adds a posting line to this account's ledger slice. The line must
    /// reference this account.
    pub fn add_posting_line(&mut self, line: PostingLine) -> Result<()> {
        if !line
            .account_number()
            .eq_ignore_ascii_case(&self.account_number)
        {
            return Err(DomainError::InvalidArgument(format!(
                "posting line references account {}, not {}",
                line.account_number(),
                self.account_number
            )));
        }
        self.posting_lines.add(line)
    }

    pub fn values_at_status_date(&self) -> CreditInfoValues {
        self.credit_infos.values_at_status_date()
    }

    pub fn values_at_end_of_last_month_from_status_date(&self) -> CreditInfoValues {
        self.credit_infos
            .values_at_end_of_last_month_from_status_date()
    }

    pub fn values_at_end_of_last_year_from_status_date(&self) -> CreditInfoValues {
        self.credit_infos
            .values_at_end_of_last_year_from_status_date()
    }

    fn attach_line_snapshots(
        posting_lines: &PostingLineCollection,
        credit_infos: &CreditInfoCollection,
        status_date: NaiveDate,
    ) -> PostingLineCollection {
        let lines = posting_lines
            .iter()
            .map(|line| {
                if line.posting_date() > status_date {
                    return line.without_calculations();
                }
                let credit = credit_infos
                    .find(line.posting_date())
                    .map(|info| info.credit())
                    .unwrap_or_default();
                let balance = posting_lines.running_balance_for(line);
                line.apply_account_calculation(CreditInfoValues { credit, balance })
            })
            .collect();
        posting_lines.with_replaced_lines(lines)
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.accounting_number == other.accounting_number
            && self
                .account_number
                .eq_ignore_ascii_case(&other.account_number)
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.accounting_number.hash(state);
        self.account_number.to_uppercase().hash(state);
    }
}

#[async_trait]
impl Calculable for Account {
    fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    async fn calculate_as_of(&self, status_date: NaiveDate) -> Result<Self> {
        if self.status_date == Some(status_date) {
            return Ok(self.clone());
        }
        tracing::trace!(account = %self.account_number, %status_date, "calculating account");
        let (credit_infos, posting_lines) = futures::try_join!(
            self.credit_infos
                .calculate_with(status_date, &self.posting_lines),
            self.posting_lines.calculate_as_of(status_date),
        )?;
        let posting_lines =
            Self::attach_line_snapshots(&posting_lines, &credit_infos, status_date);
        Ok(Self {
            credit_infos,
            posting_lines,
            status_date: Some(status_date),
            ..self.clone()
        })
    }
}

impl Protectable for Account {
    fn is_protected(&self) -> bool {
        self.protection.is_protected()
    }

    fn apply_protection(&mut self) {
        self.protection.apply_protection();
        self.credit_infos.apply_protection();
    }
}

impl Deletable for Account {
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

/// Accounts of one accounting, unique by composite identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountCollection {
    accounts: Vec<Account>,
    status_date: Option<NaiveDate>,
}

impl AccountCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, account: Account) -> Result<()> {
        if self.accounts.iter().any(|existing| *existing == account) {
            return Err(DomainError::Conflict(format!(
                "account {} already exists",
                account.account_number()
            )));
        }
        self.accounts.push(account);
        Ok(())
    }

    pub fn find(&self, account_number: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.account_number().eq_ignore_ascii_case(account_number))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn values_at_status_date(&self) -> CreditInfoValues {
        self.accounts
            .iter()
            .map(Account::values_at_status_date)
            .fold(CreditInfoValues::default(), |sum, values| sum + values)
    }

    pub fn values_at_end_of_last_month_from_status_date(&self) -> CreditInfoValues {
        self.accounts
            .iter()
            .map(Account::values_at_end_of_last_month_from_status_date)
            .fold(CreditInfoValues::default(), |sum, values| sum + values)
    }

    pub fn values_at_end_of_last_year_from_status_date(&self) -> CreditInfoValues {
        self.accounts
            .iter()
            .map(Account::values_at_end_of_last_year_from_status_date)
            .fold(CreditInfoValues::default(), |sum, values| sum + values)
    }

    /// Applies permanent protection to every account.
    pub fn apply_protection(&mut self) {
        for account in &mut self.accounts {
            account.apply_protection();
        }
    }

    /// Groups the calculated accounts by their account group and returns one
    /// status per distinct group, each calculated against this collection's
    /// status date. Membership is fixed at construction.
    pub async fn group_by_account_group(&self) -> Result<Vec<AccountGroupStatus>> {
        let status_date = self.status_date.ok_or_else(|| {
            DomainError::NotCalculated(
                "account collection must be calculated before grouping".into(),
            )
        })?;

        let mut statuses: Vec<AccountGroupStatus> = Vec::new();
        for account in &self.accounts {
            let group_number = account.account_group().number();
            match statuses
                .iter_mut()
                .find(|status| status.group().number() == group_number)
            {
                Some(status) => status.add_member(account.clone())?,
                None => {
                    let mut status = AccountGroupStatus::new(account.account_group().clone());
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
impl Calculable for AccountCollection {
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
