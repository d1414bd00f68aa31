//! Service layer for fintrack
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, referential integrity and the expense summary.

pub mod category;
pub mod transaction;

pub use category::CategoryService;
pub use transaction::TransactionService;
