use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use log::info;
use sshman_core::exec::ShellRunner;
use sshman_core::remote::{NotionClient, RemoteConfig};
use sshman_core::store::ConfigStore;

use crate::ui::presenter;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "sshman", version, about = "Manage SSH connections.")]
pub struct Args {
    /// Command to execute
    #[arg(value_enum)]
    pub command: Option<CommandKind>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// Show list & connect to your ssh
    List,
    /// Refresh data from database
    Refresh,
    /// Show this help message
    Help,
}

pub fn run_cli(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::new()?;
    // Loaded up front for every command; a malformed config file aborts
    // here with a nonzero exit instead of a stack trace.
    let connections = store.load()?;

    match args.command {
        None | Some(CommandKind::Help) => print_usage(),
        Some(CommandKind::List) => {
            presenter::render_and_select(&connections, &ShellRunner)?;
        }
        Some(CommandKind::Refresh) => refresh(&store),
    }
    Ok(())
}

/// Fetch the full set from Notion and replace the local cache wholesale.
/// Every failure is reported and leaves the file as it was, except a write
/// failure after a successful fetch, which leaves the file stale.
fn refresh(store: &ConfigStore) {
    let client = match NotionClient::new(RemoteConfig::from_env()) {
        Ok(client) => client,
        Err(e) => {
            println!("{}", format!("Error: Failed to fetch data from Notion. {e}").red());
            return;
        }
    };

    let set = match client.fetch_and_transform() {
        Ok(set) => set,
        Err(e) => {
            println!("{}", format!("Error: Failed to fetch data from Notion. {e}").red());
            return;
        }
    };

    info!("Fetched {} connection(s)", set.len());
    if let Err(e) = store.persist(&set) {
        println!(
            "{}",
            format!("Error: Failed to write to the configuration file. {e}").red()
        );
        return;
    }
    println!("{}", "Data updated successfully!".green());
}

fn print_usage() {
    println!("{}", "Available commands:".cyan());
    println!("  list      - Show list & connect to your ssh");
    println!("  refresh   - Refresh data from database");
    println!("  help      - Show this help message");
    println!();
}
