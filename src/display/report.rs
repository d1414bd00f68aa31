//! Report formatting for terminal output
//!
//! Renders the per-category expense summary with a proportional bar.

use crate::models::{CategoryExpenseSummary, Money};

const BAR_WIDTH: usize = 20;

/// Format the expense summary, largest total first
pub fn format_expense_summary(summary: &[CategoryExpenseSummary], currency_symbol: &str) -> String {
    if summary.is_empty() {
        return "No expense categories found.\n".to_string();
    }

    let name_width = summary
        .iter()
        .map(|s| s.category_name.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);
    let max_total = summary
        .iter()
        .map(|s| s.total_expenses)
        .max()
        .unwrap_or_default();

    let mut output = String::new();
    output.push_str("Expenses by Category\n");
    output.push_str(&separator(name_width + BAR_WIDTH + 18));
    output.push('\n');

    for entry in summary {
        output.push_str(&format!(
            "{:<width$}  {:>14}  {}\n",
            entry.category_name,
            entry.total_expenses.format_with_symbol(currency_symbol),
            format_bar(entry.total_expenses, max_total, BAR_WIDTH),
            width = name_width
        ));
    }

    output.push_str(&separator(name_width + BAR_WIDTH + 18));
    output.push('\n');
    let grand_total = summary
        .iter()
        .try_fold(Money::zero(), |acc, s| acc.checked_add(s.total_expenses))
        .map(|total| total.format_with_symbol(currency_symbol))
        .unwrap_or_else(|| "overflow".to_string());
    output.push_str(&format!(
        "{:<width$}  {:>14}\n",
        "Total",
        grand_total,
        width = name_width
    ));

    output
}

/// Create a simple bar chart representation
pub fn format_bar(value: Money, max_value: Money, width: usize) -> String {
    if max_value.cents() <= 0 || value.cents() <= 0 {
        return " ".repeat(width);
    }

    let filled = (i128::from(value.cents()) * width as i128 / i128::from(max_value.cents())) as usize;
    let filled = filled.clamp(1, width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}
