//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;

use super::category::resolve_category;
use crate::config::Settings;
use crate::display::transaction::{
    format_transaction_details, format_transaction_register, DisplayOptions,
};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Money, TransactionId, TransactionInput};
use crate::services::TransactionService;
use crate::storage::{CategoryStore, Storage};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Category name or ID
        category: String,
        /// Amount (e.g., "50" or "50.00")
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Time (RFC 3339 or YYYY-MM-DD), defaults to now
        #[arg(short, long)]
        time: Option<String>,
    },
    /// List transactions, most recent first
    List {
        /// Only show transactions in this category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// New amount
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,
        /// New time (RFC 3339 or YYYY-MM-DD)
        #[arg(short, long)]
        time: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> TrackerResult<()> {
    let service = TransactionService::new(storage);
    let options = DisplayOptions {
        currency_symbol: &settings.currency_symbol,
        date_format: &settings.date_format,
    };

    match cmd {
        TransactionCommands::Add {
            category,
            amount,
            description,
            time,
        } => {
            let cat = resolve_category(storage, &category)?;
            let mut input = TransactionInput::new(cat.id, parse_amount(&amount)?);
            input.description = description;
            input.time = time.as_deref().map(parse_time).transpose()?;

            let txn = service.create(input)?;

            println!("Created transaction: {}", txn.id);
            println!(
                "  {} in {}",
                txn.amount.format_with_symbol(&settings.currency_symbol),
                cat.name
            );
        }

        TransactionCommands::List { category } => {
            let transactions = match category {
                Some(identifier) => {
                    let cat = resolve_category(storage, &identifier)?;
                    service.list_by_category(cat.id)?
                }
                None => service.list()?,
            };

            let categories = storage.categories.find_all()?;
            let name_of = |txn: &crate::models::Transaction| {
                categories
                    .iter()
                    .find(|c| c.id == txn.category_id)
                    .map(|c| c.name.clone())
            };
            print!(
                "{}",
                format_transaction_register(&transactions, name_of, options)
            );
        }

        TransactionCommands::Show { id } => {
            let txn = service.get(parse_transaction_id(&id)?)?;
            let category = service.category_of(&txn).ok();
            print!(
                "{}",
                format_transaction_details(&txn, category.as_ref(), options)
            );
        }

        TransactionCommands::Edit {
            id,
            category,
            amount,
            description,
            time,
        } => {
            let txn = service.get(parse_transaction_id(&id)?)?;

            if category.is_none() && amount.is_none() && description.is_none() && time.is_none() {
                println!("No changes specified.");
                return Ok(());
            }

            let category_id = match category {
                Some(identifier) => resolve_category(storage, &identifier)?.id,
                None => txn.category_id,
            };

            let input = TransactionInput {
                description: description.or_else(|| txn.description.clone()),
                amount: match amount {
                    Some(a) => parse_amount(&a)?,
                    None => txn.amount,
                },
                category_id: Some(category_id),
                time: Some(match time {
                    Some(t) => parse_time(&t)?,
                    None => txn.time,
                }),
            };

            let updated = service.update(txn.id, input)?;
            println!("Updated transaction: {}", updated.id);
        }

        TransactionCommands::Delete { id } => {
            let removed = service.delete(parse_transaction_id(&id)?)?;
            println!(
                "Deleted transaction: {} ({})",
                removed.id,
                removed.amount.format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}

fn parse_amount(s: &str) -> TrackerResult<Money> {
    Money::parse(s)
        .map_err(|e| TrackerError::validation("amount", format!("Invalid amount '{}': {}", s, e)))
}

fn parse_transaction_id(s: &str) -> TrackerResult<TransactionId> {
    s.trim()
        .parse()
        .map_err(|_| TrackerError::transaction_not_found(s))
}

/// Parse an RFC 3339 timestamp, or a bare date taken as midnight UTC
pub fn parse_time(s: &str) -> TrackerResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(s) {
        return Ok(time.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            TrackerError::validation(
                "time",
                format!("Invalid time '{}'. Use YYYY-MM-DD or RFC 3339", s),
            )
        })
}
