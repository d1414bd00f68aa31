use anyhow::Result;
use clap::{Parser, Subcommand};

use fintrack::cli::{handle_category_command, handle_summary_command, handle_transaction_command};
use fintrack::config::{paths::TrackerPaths, settings::Settings};
use fintrack::logging::init_tracing;
use fintrack::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fintrack",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based personal finance tracker",
    long_about = "fintrack records income and expense transactions against named \
                  categories and reports how much you have spent in each expense \
                  category."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(fintrack::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(fintrack::cli::TransactionCommands),

    /// Show total expenses per category
    Summary,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TrackerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_level);

    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Summary) => {
            handle_summary_command(&storage, &settings)?;
        }
        Some(Commands::Config) => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Log level:       {}", settings.log_level);
        }
        None => {
            println!("fintrack - Terminal-based personal finance tracker");
            println!();
            println!("Run 'fintrack --help' for usage information.");
        }
    }

    Ok(())
}
