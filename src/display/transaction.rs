//! Transaction display formatting
//!
//! Provides utilities for formatting transactions for terminal display.

use super::format_time;
use crate::models::{Category, Transaction};

/// Presentation preferences taken from the user's settings
#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions<'a> {
    pub currency_symbol: &'a str,
    pub date_format: &'a str,
}

impl Default for DisplayOptions<'_> {
    fn default() -> Self {
        Self {
            currency_symbol: "$",
            date_format: super::DEFAULT_DATE_FORMAT,
        }
    }
}

/// Format a single transaction for display (register row)
pub fn format_transaction_row(
    txn: &Transaction,
    category_name: &str,
    options: DisplayOptions<'_>,
) -> String {
    format!(
        "{:<16} {:<16} {:>14}  {:<30} {}",
        format_time(&txn.time, options.date_format),
        truncate(category_name, 16),
        txn.amount.format_with_symbol(options.currency_symbol),
        truncate(txn.description_or_empty(), 30),
        txn.id
    )
}

/// Format a list of transactions as a register
///
/// `category_name` resolves a transaction's category for display; `None`
/// shows the raw id.
pub fn format_transaction_register<F>(
    transactions: &[Transaction],
    category_name: F,
    options: DisplayOptions<'_>,
) -> String
where
    F: Fn(&Transaction) -> Option<String>,
{
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<16} {:<16} {:>14}  {:<30} {}\n",
        "Time", "Category", "Amount", "Description", "ID"
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for txn in transactions {
        let name = category_name(txn).unwrap_or_else(|| txn.category_id.to_string());
        output.push_str(&format_transaction_row(txn, &name, options));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    category: Option<&Category>,
    options: DisplayOptions<'_>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!(
        "Time:        {}\n",
        format_time(&txn.time, options.date_format)
    ));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(options.currency_symbol)
    ));

    match category {
        Some(cat) => output.push_str(&format!(
            "Category:    {} ({})\n",
            cat.name, cat.category_type
        )),
        None => output.push_str(&format!("Category:    {} (missing)\n", txn.category_id)),
    }

    if let Some(description) = &txn.description {
        output.push_str(&format!("Description: {}\n", description));
    }

    output
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
