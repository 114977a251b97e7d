use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::try_join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculate::Calculable;
use crate::errors::{DomainError, Result};
use crate::info::{ContactInfoCollection, ContactInfoValues};
use crate::posting::{PostingLine, PostingLineCollection};
use crate::protection::{Deletable, Protectable, Protection};

/// A debtor/creditor account: monthly balance buckets plus the ledger slice
/// of lines referencing the contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactAccount {
    accounting_number: i32,
    account_number: String,
    account_name: String,
    description: Option<String>,
    note: Option<String>,
    contact_infos: ContactInfoCollection,
    posting_lines: PostingLineCollection,
    protection: Protection,
    status_date: Option<NaiveDate>,
}

impl ContactAccount {
    pub fn new(
        accounting_number: i32,
        account_number: impl Into<String>,
        account_name: impl Into<String>,
    ) -> Result<Self> {
        let account_number = account_number.into();
        let account_name = account_name.into();
        if account_number.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "contact account requires an account number".into(),
            ));
        }
        if account_name.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "contact account requires a name".into(),
            ));
        }
        Ok(Self {
            accounting_number,
            account_number,
            account_name,
            description: None,
            note: None,
            contact_infos: ContactInfoCollection::new(),
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

    pub fn contact_infos(&self) -> &ContactInfoCollection {
        &self.contact_infos
    }

    pub fn posting_lines(&self) -> &PostingLineCollection {
        &self.posting_lines
    }

    pub fn add_contact_info(&mut self, info: crate::info::ContactInfo) -> Result<()> {
        self.contact_infos.add(info)
    }

    /// Adds a posting line to this contact's ledger slice. The line must
    /// reference this contact account.
    pub fn add_posting_line(&mut self, line: PostingLine) -> Result<()> {
        let references_self = line
            .contact_account_number()
            .is_some_and(|number| number.eq_ignore_ascii_case(&self.account_number));
        if !references_self {
            return Err(DomainError::InvalidArgument(format!(
                "posting line does not reference contact account {}",
                self.account_number
            )));
        }
        self.posting_lines.add(line)
    }

    pub fn values_at_status_date(&self) -> ContactInfoValues {
        self.contact_infos.values_at_status_date()
    }

    pub fn values_at_end_of_last_month_from_status_date(&self) -> ContactInfoValues {
        self.contact_infos
            .values_at_end_of_last_month_from_status_date()
    }

    pub fn values_at_end_of_last_year_from_status_date(&self) -> ContactInfoValues {
        self.contact_infos
            .values_at_end_of_last_year_from_status_date()
    }

    fn attach_line_snapshots(
        posting_lines: &PostingLineCollection,
        status_date: NaiveDate,
    ) -> PostingLineCollection {
        let lines = posting_lines
            .iter()
            .map(|line| {
                if line.posting_date() > status_date {
                    return line.without_calculations();
                }
                let balance = posting_lines.running_balance_for(line);
                line.apply_contact_account_calculation(ContactInfoValues { balance })
            })
            .collect();
        posting_lines.with_replaced_lines(lines)
    }
}

impl PartialEq for ContactAccount {
    fn eq(&self, other: &Self) -> bool {
        self.accounting_number == other.accounting_number
            && self
                .account_number
                .eq_ignore_ascii_case(&other.account_number)
    }
}

impl Eq for ContactAccount {}

impl Hash for ContactAccount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.accounting_number.hash(state);
        self.account_number.to_uppercase().hash(state);
    }
}

#[async_trait]
impl Calculable for ContactAccount {
    fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    async fn calculate_as_of(&self, status_date: NaiveDate) -> Result<Self> {
        if self.status_date == Some(status_date) {
            return Ok(self.clone());
        }
        tracing::trace!(
            contact_account = %self.account_number,
            %status_date,
            "calculating contact account"
        );
        let (contact_infos, posting_lines) = futures::try_join!(
            self.contact_infos
                .calculate_with(status_date, &self.posting_lines),
            self.posting_lines.calculate_as_of(status_date),
        )?;
        let posting_lines = Self::attach_line_snapshots(&posting_lines, status_date);
        Ok(Self {
            contact_infos,
            posting_lines,
            status_date: Some(status_date),
            ..self.clone()
        })
    }
}

impl Protectable for ContactAccount {
    fn is_protected(&self) -> bool {
        self.protection.is_protected()
    }

    fn apply_protection(&mut self) {
        self.protection.apply_protection();
        self.contact_infos.apply_protection();
    }
}

impl Deletable for ContactAccount {
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

/// Contact accounts of one accounting, unique by composite identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactAccountCollection {
    accounts: Vec<ContactAccount>,
    status_date: Option<NaiveDate>,
}

impl ContactAccountCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, account: ContactAccount) -> Result<()> {
        if self.accounts.iter().any(|existing| *existing == account) {
            return Err(DomainError::Conflict(format!(
                "contact account {} already exists",
                account.account_number()
            )));
        }
        self.accounts.push(account);
        Ok(())
    }

    pub fn find(&self, account_number: &str) -> Option<&ContactAccount> {
        self.accounts
            .iter()
            .find(|account| account.account_number().eq_ignore_ascii_case(account_number))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContactAccount> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn values_at_status_date(&self) -> ContactInfoValues {
        self.accounts
            .iter()
            .map(ContactAccount::values_at_status_date)
            .fold(ContactInfoValues::default(), |sum, values| sum + values)
    }

    pub fn values_at_end_of_last_month_from_status_date(&self) -> ContactInfoValues {
        self.accounts
            .iter()
            .map(ContactAccount::values_at_end_of_last_month_from_status_date)
            .fold(ContactInfoValues::default(), |sum, values| sum + values)
    }

    pub fn values_at_end_of_last_year_from_status_date(&self) -> ContactInfoValues {
        self.accounts
            .iter()
            .map(ContactAccount::values_at_end_of_last_year_from_status_date)
            .fold(ContactInfoValues::default(), |sum, values| sum + values)
    }

    /// Applies permanent protection to every contact account.
    pub fn apply_protection(&mut self) {
        for account in &mut self.accounts {
            account.apply_protection();
        }
    }

    /// Contacts with a positive as-of balance. Requires the collection to be
    /// calculated; stale member state is never used implicitly.
    pub async fn find_debtors(&self) -> Result<Self> {
        self.partition_by_balance(|balance| balance > Decimal::ZERO)
    }

    /// Contacts with a negative as-of balance. Requires the collection to be
    /// calculated.
    pub async fn find_creditors(&self) -> Result<Self> {
        self.partition_by_balance(|balance| balance < Decimal::ZERO)
    }

    fn partition_by_balance(&self, keep: impl Fn(Decimal) -> bool) -> Result<Self> {
        if self.status_date.is_none() {
            return Err(DomainError::NotCalculated(
                "contact account collection must be calculated before partitioning".into(),
            ));
        }
        let accounts = self
            .accounts
            .iter()
            .filter(|account| keep(account.values_at_status_date().balance))
            .cloned()
            .collect();
        Ok(Self {
            accounts,
            status_date: self.status_date,
        })
    }
}

#[async_trait]
impl Calculable for ContactAccountCollection {
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
