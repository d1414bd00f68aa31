//! Category model
//!
//! A category classifies transactions as income or expense. Names are unique
//! under a trimmed, case-insensitive collation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::CategoryId;

/// Longest category name the store accepts
pub const MAX_NAME_LEN: usize = 50;

/// Whether a category tracks money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Income,
    Expense,
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "INCOME"),
            Self::Expense => write!(f, "EXPENSE"),
        }
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!(
                "unknown category type '{}' (expected income or expense)",
                other
            )),
        }
    }
}

/// A category that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub category_type: CategoryType,
}

impl NewCategory {
    /// Create a new, unsaved category. The name is trimmed.
    pub fn new(name: &str, category_type: CategoryType) -> Self {
        Self {
            name: name.trim().to_string(),
            category_type,
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)
    }
}

/// A stored category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier, assigned by the store
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Income or expense
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl Category {
    /// Attach a store-assigned id to a new category
    pub fn from_new(id: CategoryId, new: NewCategory) -> Self {
        Self {
            id,
            name: new.name,
            category_type: new.category_type,
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The key two names are compared by when checking uniqueness
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn validate_name(name: &str) -> Result<(), CategoryValidationError> {
    if name.trim().is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CategoryValidationError::NameTooLong(len));
    }

    Ok(())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
