//! Expense summary command

use crate::config::Settings;
use crate::display::report::format_expense_summary;
use crate::error::TrackerResult;
use crate::services::TransactionService;
use crate::storage::Storage;

/// Print the per-category expense summary
pub fn handle_summary_command(storage: &Storage, settings: &Settings) -> TrackerResult<()> {
    let summary = TransactionService::new(storage).category_expense_summary()?;
    print!(
        "{}",
        format_expense_summary(&summary, &settings.currency_symbol)
    );
    Ok(())
}
