mod ui;

use crate::ui::cli;
use clap::Parser;
use sshman_core::utils::logging::init_logging;

fn main() {
    init_logging();
    let args = cli::Args::parse();
    if let Err(e) = cli::run_cli(args) {
        eprintln!("CLI error: {e}");
        std::process::exit(1);
    }
}
