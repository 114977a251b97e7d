//! Account aggregates, their collections, and group rollups.

pub mod account;
pub mod budget_account;
pub mod contact_account;
pub mod group;
pub mod group_status;

pub use account::{Account, AccountCollection};
pub use budget_account::{BudgetAccount, BudgetAccountCollection};
pub use contact_account::{ContactAccount, ContactAccountCollection};
pub use group::{AccountGroup, AccountGroupType, BudgetAccountGroup};
pub use group_status::{AccountGroupStatus, BudgetAccountGroupStatus};
