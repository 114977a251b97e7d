#![doc(test(attr(deny(warnings))))]

//! Accounting Core offers the double-entry ledger, temporal aggregation, and
//! protection-lifecycle primitives that power bookkeeping workflows.
//!
//! Every aggregate implements the [`calculate::Calculable`] protocol: given a
//! status date it produces a new as-of snapshot of itself, cascading into its
//! owned collections concurrently. Snapshots are values; earlier snapshots
//! stay valid after later calculations.

pub mod accounting;
pub mod accounts;
pub mod calculate;
pub mod dates;
pub mod errors;
pub mod info;
pub mod posting;
pub mod protection;
pub mod utils;

pub use accounting::Accounting;
pub use calculate::Calculable;
pub use errors::{DomainError, Result};
pub use protection::{Deletable, Protectable};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Accounting Core tracing initialized.");
    });
}
