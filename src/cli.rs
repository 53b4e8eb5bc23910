use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "groove",
    version,
    about = "Terminal dashboard for the Groove project-marketing plan"
)]
pub struct Cli {
    /// Dataset file (defaults to groove.json found from the current directory)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch the interactive dashboard
    Tui {
        /// Initial route fragment, e.g. "#/projects" or "#/project/proj_001"
        #[arg(long)]
        route: Option<String>,
    },
    /// Print the project list
    List {
        /// Case-insensitive search over project name and location
        #[arg(long)]
        search: Option<String>,
        /// Keep only projects of this organization key
        #[arg(long)]
        osc: Option<String>,
        /// Keep only projects of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Print one project's full plan
    Show {
        /// Project id
        id: String,
    },
}
