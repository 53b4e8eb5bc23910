mod calendar;
mod cli;
mod commands;
mod filter;
mod format;
mod model;
mod route;
mod storage;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.command.unwrap_or(cli::Command::Tui { route: None });
    match command {
        cli::Command::Tui { route } => commands::tui(args.data, route),
        cli::Command::List {
            search,
            osc,
            category,
        } => commands::list(args.data, search, osc, category),
        cli::Command::Show { id } => commands::show(args.data, id),
    }
}
