//! Expense summary
//!
//! Derived per-category totals. Never persisted.

use serde::Serialize;

use super::ids::CategoryId;
use super::money::Money;

/// Total spent in one expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryExpenseSummary {
    pub category_id: CategoryId,
    pub category_name: String,
    pub total_expenses: Money,
}
