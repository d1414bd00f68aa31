//! Core data models for fintrack
//!
//! Categories, transactions, the derived expense summary, and the value types
//! they are built from.

pub mod category;
pub mod ids;
pub mod money;
pub mod summary;
pub mod transaction;

pub use category::{Category, CategoryType, NewCategory};
pub use ids::{CategoryId, TransactionId};
pub use money::Money;
pub use summary::CategoryExpenseSummary;
pub use transaction::{NewTransaction, Transaction, TransactionInput};
