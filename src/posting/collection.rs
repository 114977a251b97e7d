use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculate::Calculable;
use crate::errors::{DomainError, Result};
use crate::posting::PostingLine;

/// Ordered ledger slice: posting lines unique by identifier, kept in posting
/// date order with sort order as the tie-break.
///
/// Each aggregate owns its own slice restricted to lines referencing it;
/// slices are never shared between aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingLineCollection {
    lines: Vec<PostingLine>,
    status_date: Option<NaiveDate>,
}

impl PostingLineCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line at its ordered position. A line whose identifier is
    /// already present is a conflict and leaves the collection unchanged.
    pub fn add(&mut self, line: PostingLine) -> Result<()> {
        if self.lines.iter().any(|existing| existing.id() == line.id()) {
            return Err(DomainError::Conflict(format!(
                "posting line {} already exists",
                line.id()
            )));
        }
        let position = self.lines.partition_point(|existing| {
            (existing.posting_date(), existing.sort_order())
                <= (line.posting_date(), line.sort_order())
        });
        self.lines.insert(position, line);
        Ok(())
    }

    pub fn find(&self, id: Uuid) -> Option<&PostingLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Lines with `from <= posting date <= to`, as a new collection.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Self {
        let lines = self
            .lines
            .iter()
            .filter(|line| line.posting_date() >= from && line.posting_date() <= to)
            .cloned()
            .collect();
        Self {
            lines,
            status_date: self.status_date,
        }
    }

    /// The canonical presentation order: posting date ascending, then sort
    /// order ascending. This is also the running-balance order.
    pub fn ordered(&self) -> Vec<&PostingLine> {
        self.lines.iter().collect()
    }

    /// The first `n` lines in ordered form.
    pub fn top(&self, n: usize) -> Vec<&PostingLine> {
        self.lines.iter().take(n).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PostingLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sums posting values of lines within the inclusive date range. When a
    /// sort order ceiling is given it constrains only lines dated exactly on
    /// the upper bound, so two same-date lines get distinct running balances.
    pub fn calculate_posting_value(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        sort_order_ceiling: Option<i32>,
    ) -> Decimal {
        self.lines
            .iter()
            .filter(|line| line.posting_date() >= from && line.posting_date() <= to)
            .filter(|line| match sort_order_ceiling {
                Some(ceiling) => line.posting_date() < to || line.sort_order() <= ceiling,
                None => true,
            })
            .map(PostingLine::posting_value)
            .sum()
    }

    /// Running balance up to and including the given line, honoring its sort
    /// order among same-date lines.
    pub fn running_balance_for(&self, line: &PostingLine) -> Decimal {
        self.calculate_posting_value(NaiveDate::MIN, line.posting_date(), Some(line.sort_order()))
    }

    /// Rebuilds the collection from already-ordered replacement lines, used
    /// by the owning aggregate when attaching per-line snapshots.
    pub(crate) fn with_replaced_lines(&self, lines: Vec<PostingLine>) -> Self {
        Self {
            lines,
            status_date: self.status_date,
        }
    }
}

#[async_trait]
impl Calculable for PostingLineCollection {
    fn status_date(&self) -> Option<NaiveDate> {
        self.status_date
    }

    async fn calculate_as_of(&self, status_date: NaiveDate) -> Result<Self> {
        if self.status_date == Some(status_date) {
            return Ok(self.clone());
        }
        Ok(Self {
            lines: self.lines.clone(),
            status_date: Some(status_date),
        })
    }
}
