use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, Result};
use crate::info::{BudgetInfoValues, ContactInfoValues, CreditInfoValues};

/// One immutable double-entry transaction record.
///
/// Debit and credit are fixed at construction and never recomputed;
/// calculation only attaches as-of running-balance snapshots by building a
/// new line value. Account references are arena-style account numbers, the
/// owning aggregates resolve them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingLine {
    id: Uuid,
    accounting_number: i32,
    posting_date: NaiveDate,
    reference: Option<String>,
    details: String,
    account_number: String,
    debit: Decimal,
    credit: Decimal,
    sort_order: i32,
    budget_account_number: Option<String>,
    contact_account_number: Option<String>,
    account_values: Option<CreditInfoValues>,
    budget_account_values: Option<BudgetInfoValues>,
    contact_account_values: Option<ContactInfoValues>,
}

impl PostingLine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounting_number: i32,
        posting_date: NaiveDate,
        details: impl Into<String>,
        account_number: impl Into<String>,
        debit: Decimal,
        credit: Decimal,
        sort_order: i32,
    ) -> Result<Self> {
        let account_number = account_number.into();
        if account_number.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "posting line requires an account number".into(),
            ));
        }
        if debit.is_sign_negative() || credit.is_sign_negative() {
            return Err(DomainError::InvalidArgument(
                "debit and credit amounts cannot be negative".into(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            accounting_number,
            posting_date,
            reference: None,
            details: details.into(),
            account_number,
            debit,
            credit,
            sort_order,
            budget_account_number: None,
            contact_account_number: None,
            account_values: None,
            budget_account_values: None,
            contact_account_values: None,
        })
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_budget_account(mut self, budget_account_number: impl Into<String>) -> Self {
        self.budget_account_number = Some(budget_account_number.into());
        self
    }

    pub fn with_contact_account(mut self, contact_account_number: impl Into<String>) -> Self {
        self.contact_account_number = Some(contact_account_number.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn accounting_number(&self) -> i32 {
        self.accounting_number
    }

    pub fn posting_date(&self) -> NaiveDate {
        self.posting_date
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn budget_account_number(&self) -> Option<&str> {
        self.budget_account_number.as_deref()
    }

    pub fn contact_account_number(&self) -> Option<&str> {
        self.contact_account_number.as_deref()
    }

    pub fn debit(&self) -> Decimal {
        self.debit
    }

    pub fn credit(&self) -> Decimal {
        self.credit
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    /// Signed movement of this line: debit minus credit.
    pub fn posting_value(&self) -> Decimal {
        self.debit - self.credit
    }

    /// As-of snapshot for the referenced account, attached by the owning
    /// account's calculation pass.
    pub fn account_values(&self) -> Option<CreditInfoValues> {
        self.account_values
    }

    pub fn budget_account_values(&self) -> Option<BudgetInfoValues> {
        self.budget_account_values
    }

    pub fn contact_account_values(&self) -> Option<ContactInfoValues> {
        self.contact_account_values
    }

    /// Returns a new line carrying the given account snapshot. The
    /// transaction data itself is copied unchanged.
    pub fn apply_account_calculation(&self, values: CreditInfoValues) -> Self {
        let mut line = self.clone();
        line.account_values = Some(values);
        line
    }

    pub fn apply_budget_account_calculation(&self, values: BudgetInfoValues) -> Self {
        let mut line = self.clone();
        line.budget_account_values = Some(values);
        line
    }

    pub fn apply_contact_account_calculation(&self, values: ContactInfoValues) -> Self {
        let mut line = self.clone();
        line.contact_account_values = Some(values);
        line
    }

    /// Returns a copy of the line with every attached snapshot removed.
    /// Used when a recalculation pass leaves the line outside the status
    /// date range, so values from an earlier pass never survive into the
    /// new snapshot.
    pub fn without_calculations(&self) -> Self {
        let mut line = self.clone();
        line.account_values = None;
        line.budget_account_values = None;
        line.contact_account_values = None;
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn posting_value_is_debit_minus_credit() {
        let line = PostingLine::new(1, date(2025, 3, 1), "Rent", "1010", dec!(0), dec!(750), 1)
            .unwrap();
        assert_eq!(line.posting_value(), dec!(-750));

        let line = PostingLine::new(1, date(2025, 3, 1), "Sale", "1010", dec!(120), dec!(0), 2)
            .unwrap();
        assert_eq!(line.posting_value(), dec!(120));
    }

    #[test]
    fn construction_rejects_bad_arguments() {
        assert!(matches!(
            PostingLine::new(1, date(2025, 3, 1), "x", "  ", dec!(1), dec!(0), 1),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            PostingLine::new(1, date(2025, 3, 1), "x", "1010", dec!(-1), dec!(0), 1),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn applying_calculation_leaves_transaction_data_untouched() {
        let line = PostingLine::new(1, date(2025, 3, 1), "Sale", "1010", dec!(120), dec!(0), 1)
            .unwrap()
            .with_budget_account("B10");
        let calculated = line.apply_account_calculation(CreditInfoValues {
            credit: dec!(500),
            balance: dec!(120),
        });

        assert_eq!(calculated.id(), line.id());
        assert_eq!(calculated.debit(), line.debit());
        assert_eq!(calculated.credit(), line.credit());
        assert!(line.account_values().is_none());
        assert_eq!(
            calculated.account_values().unwrap().balance,
            dec!(120)
        );
    }
}
