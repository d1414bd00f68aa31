//! fintrack - personal finance tracking from the terminal
//!
//! This library records categorized income and expense transactions and
//! computes how much has been spent per expense category.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (categories, transactions, money, ids)
//! - `storage`: Store contracts and the JSON file implementation
//! - `services`: Business logic layer
//! - `display`: Plain-text formatting for terminal output
//! - `cli`: Command handlers for the `fintrack` binary
//! - `logging`: Tracing setup
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::TrackerPaths;
//! use fintrack::models::{CategoryType, Money, TransactionInput};
//! use fintrack::services::{CategoryService, TransactionService};
//! use fintrack::storage::Storage;
//!
//! let storage = Storage::open(TrackerPaths::new()?)?;
//! let rent = CategoryService::new(&storage).create("Rent", CategoryType::Expense)?;
//!
//! let transactions = TransactionService::new(&storage);
//! transactions.create(TransactionInput::new(rent.id, Money::parse("1000")?))?;
//! let summary = transactions.category_expense_summary()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
