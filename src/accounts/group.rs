use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, Result};

/// Whether an account group collects assets or liabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountGroupType {
    Assets,
    Liabilities,
}

/// Category descriptor for accounts: numeric key, display name and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountGroup {
    number: i32,
    name: String,
    account_group_type: AccountGroupType,
}

impl AccountGroup {
    pub fn new(
        number: i32,
        name: impl Into<String>,
        account_group_type: AccountGroupType,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "account group requires a name".into(),
            ));
        }
        Ok(Self {
            number,
            name,
            account_group_type,
        })
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account_group_type(&self) -> AccountGroupType {
        self.account_group_type
    }
}

/// Category descriptor for budget accounts: numeric key and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAccountGroup {
    number: i32,
    name: String,
}

impl BudgetAccountGroup {
    pub fn new(number: i32, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "budget account group requires a name".into(),
            ));
        }
        Ok(Self { number, name })
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
