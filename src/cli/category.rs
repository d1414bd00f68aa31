//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_list};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, CategoryType};
use crate::services::CategoryService;
use crate::storage::{Storage, TransactionStore};

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Category type: income or expense
        #[arg(short = 't', long = "type")]
        category_type: CategoryType,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New type: income or expense
        #[arg(short = 't', long = "type")]
        category_type: Option<CategoryType>,
    },

    /// Delete a category (only if no transactions use it)
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Resolve a category name or ID typed on the command line
pub fn resolve_category(storage: &Storage, identifier: &str) -> TrackerResult<Category> {
    CategoryService::new(storage)
        .find(identifier)?
        .ok_or_else(|| TrackerError::category_not_found(identifier))
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> TrackerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Create {
            name,
            category_type,
        } => {
            let category = service.create(&name, category_type)?;

            println!("Created category: {}", category.name);
            println!("  Type: {}", category.category_type);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let cat = resolve_category(storage, &category)?;
            let count = storage.transactions.find_by_category_id(cat.id)?.len();
            print!("{}", format_category_details(&cat, count));
        }

        CategoryCommands::Edit {
            category,
            name,
            category_type,
        } => {
            let cat = resolve_category(storage, &category)?;

            if name.is_none() && category_type.is_none() {
                println!("No changes specified. Use --name or --type to update the category.");
                return Ok(());
            }

            let new_name = name.unwrap_or_else(|| cat.name.clone());
            let new_type = category_type.unwrap_or(cat.category_type);
            let updated = service.update(cat.id, &new_name, new_type)?;

            println!("Updated category: {}", updated.name);
            println!("  Type: {}", updated.category_type);
        }

        CategoryCommands::Delete { category } => {
            let cat = resolve_category(storage, &category)?;
            let removed = service.delete(cat.id)?;
            println!("Deleted category: {}", removed.name);
        }
    }

    Ok(())
}
