//! The calculation protocol every ledger aggregate and collection implements.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::Result;

/// An aggregate or collection that can produce an as-of snapshot of itself
/// for a given status date.
///
/// Calculation never mutates the receiver; it builds and returns a fresh
/// snapshot, so callers holding an earlier snapshot keep observing the old
/// values. Calculating twice with the same calendar date short-circuits on
/// the second call and returns the receiver's current state unchanged.
#[async_trait]
pub trait Calculable: Clone + Send + Sync {
    /// The date this value was last calculated against, `None` until the
    /// first calculation.
    fn status_date(&self) -> Option<NaiveDate>;

    /// Calculates an as-of snapshot. The time-of-day component is discarded
    /// here, exactly once, so repeated calls on the same calendar day are
    /// idempotent regardless of clock time.
    async fn calculate(&self, status_date: NaiveDateTime) -> Result<Self> {
        self.calculate_as_of(status_date.date()).await
    }

    /// Calculates against an already-truncated status date. Cascading parents
    /// call this directly so truncation is not reapplied per level.
    async fn calculate_as_of(&self, status_date: NaiveDate) -> Result<Self>;
}
