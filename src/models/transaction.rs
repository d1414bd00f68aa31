//! Transaction model
//!
//! A transaction is a single dated, non-negative amount attributed to exactly
//! one category. The category is held by id only; resolving it goes through
//! the category store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// Longest description the store accepts
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// Caller-supplied fields for creating or replacing a transaction
///
/// The same shape serves both operations. `category_id` and `time` are
/// optional here so the service can report a missing value as a validation
/// failure instead of it being unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionInput {
    pub description: Option<String>,
    pub amount: Money,
    pub category_id: Option<CategoryId>,
    pub time: Option<DateTime<Utc>>,
}

impl TransactionInput {
    /// Start an input for the given category and amount
    pub fn new(category_id: CategoryId, amount: Money) -> Self {
        Self {
            description: None,
            amount,
            category_id: Some(category_id),
            time: None,
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the transaction time
    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }
}

/// A validated transaction that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub category_id: CategoryId,
    pub description: Option<String>,
    pub amount: Money,
    pub time: DateTime<Utc>,
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned by the store
    pub id: TransactionId,

    /// The category this transaction is attributed to
    pub category_id: CategoryId,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Amount, never negative
    pub amount: Money,

    /// When the transaction happened
    pub time: DateTime<Utc>,
}

impl Transaction {
    /// Attach a store-assigned id to a new transaction
    pub fn from_new(id: TransactionId, new: NewTransaction) -> Self {
        Self {
            id,
            category_id: new.category_id,
            description: new.description,
            amount: new.amount,
            time: new.time,
        }
    }

    /// The description, or an empty string
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.time.format("%Y-%m-%d"),
            self.amount,
            self.description_or_empty()
        )
    }
}

/// Trim a description, collapsing blank text to `None`
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Check the amount and description limits shared by create and update
pub fn validate_fields(
    amount: Money,
    description: Option<&str>,
) -> Result<(), TransactionValidationError> {
    if amount.is_negative() {
        return Err(TransactionValidationError::NegativeAmount(amount));
    }

    if amount > Money::MAX {
        return Err(TransactionValidationError::AmountTooLarge(amount));
    }

    if let Some(description) = description {
        let len = description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(TransactionValidationError::DescriptionTooLong(len));
        }
    }

    Ok(())
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    AmountTooLarge(Money),
    DescriptionTooLong(usize),
}

impl TransactionValidationError {
    /// The request field the error is about
    pub fn field(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) | Self::AmountTooLarge(_) => "amount",
            Self::DescriptionTooLong(_) => "description",
        }
    }
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "amount cannot be negative (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "amount {} exceeds the maximum of {}", amount, Money::MAX)
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
