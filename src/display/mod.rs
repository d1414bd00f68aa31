//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display.

pub mod category;
pub mod report;
pub mod transaction;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

pub use category::{format_category_details, format_category_list};
pub use report::format_expense_summary;
pub use transaction::{
    format_transaction_details, format_transaction_register, format_transaction_row,
    DisplayOptions,
};

/// Date format used when the configured one is not a valid strftime string
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a timestamp, falling back to [`DEFAULT_DATE_FORMAT`] if
/// `date_format` does not parse
pub fn format_time(time: &DateTime<Utc>, date_format: &str) -> String {
    let valid = !StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error));
    let date_format = if valid { date_format } else { DEFAULT_DATE_FORMAT };
    time.format(date_format).to_string()
}
