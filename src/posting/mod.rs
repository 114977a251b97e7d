//! Posting lines, the ordered ledger slice, and posting warnings.

pub mod collection;
pub mod line;
pub mod warning;

pub use collection::PostingLineCollection;
pub use line::PostingLine;
pub use warning::{
    calculate_warnings_for_collection, calculate_warnings_for_line, PostingWarning,
    PostingWarningCollection, PostingWarningReason,
};
