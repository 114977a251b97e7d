//! Posting warning evaluation over already-calculated ledger state.
//!
//! Pure functions: they read the snapshots attached by a previous calculation
//! pass and never trigger recalculation. Lines without attached snapshots
//! produce no warnings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::posting::{PostingLine, PostingLineCollection};

/// Why a posting line breached a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostingWarningReason {
    /// The account's running balance exceeded its credit limit.
    CreditLimitExceeded,
    /// The budget account's posted amount exceeded its budget.
    BudgetExceeded,
}

/// One breached rule on one posting line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingWarning {
    reason: PostingWarningReason,
    account_number: String,
    amount: Decimal,
    posting_line: PostingLine,
}

impl PostingWarning {
    pub fn reason(&self) -> PostingWarningReason {
        self.reason
    }

    /// Number of the offending account (account or budget account).
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// Magnitude of the overage, always positive.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The line that triggered the warning.
    pub fn posting_line(&self) -> &PostingLine {
        &self.posting_line
    }
}

/// Warnings for a ledger slice, possibly empty, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingWarningCollection {
    warnings: Vec<PostingWarning>,
}

impl PostingWarningCollection {
    pub fn iter(&self) -> std::slice::Iter<'_, PostingWarning> {
        self.warnings.iter()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warnings sorted by posting-line date then sort order, mirroring
    /// ledger order.
    pub fn ordered(&self) -> Vec<&PostingWarning> {
        let mut ordered: Vec<&PostingWarning> = self.warnings.iter().collect();
        ordered.sort_by_key(|warning| {
            (
                warning.posting_line.posting_date(),
                warning.posting_line.sort_order(),
            )
        });
        ordered
    }

    fn push(&mut self, warning: PostingWarning) {
        self.warnings.push(warning);
    }
}

/// Evaluates one calculated posting line. Multiple breaches on one line
/// yield multiple warnings.
pub fn calculate_warnings_for_line(line: &PostingLine) -> PostingWarningCollection {
    let mut warnings = PostingWarningCollection::default();

    if let Some(values) = line.account_values() {
        let available = values.available();
        if available < Decimal::ZERO {
            warnings.push(PostingWarning {
                reason: PostingWarningReason::CreditLimitExceeded,
                account_number: line.account_number().to_owned(),
                amount: -available,
                posting_line: line.clone(),
            });
        }
    }

    if let (Some(values), Some(budget_account_number)) =
        (line.budget_account_values(), line.budget_account_number())
    {
        let available = values.available();
        if available < Decimal::ZERO {
            warnings.push(PostingWarning {
                reason: PostingWarningReason::BudgetExceeded,
                account_number: budget_account_number.to_owned(),
                amount: -available,
                posting_line: line.clone(),
            });
        }
    }

    warnings
}

/// Evaluates every line in a calculated ledger slice.
pub fn calculate_warnings_for_collection(
    lines: &PostingLineCollection,
) -> PostingWarningCollection {
    let mut warnings = PostingWarningCollection::default();
    for line in lines.iter() {
        for warning in calculate_warnings_for_line(line).warnings {
            warnings.push(warning);
        }
    }
    warnings
}
