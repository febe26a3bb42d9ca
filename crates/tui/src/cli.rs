use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::{Filter, SortKey, TaskId};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dolist",
    version,
    about = "A small to-do list: add dated tasks, tick them off, filter and sort.",
    after_help = "Examples:\n  dolist              Launch the TUI (same as `dolist tui`)\n  dolist add Buy milk --due 2024-01-01\n  dolist list --filter active --sort date\n  dolist delete 1712345678901"
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override the tracing filter (e.g. "info", "debug", or full directives)
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    /// Keep tasks in memory for this run only (nothing is read from or written to disk)
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui,
    /// Add a task with a due date
    Add(AddArgs),
    /// Print tasks, optionally filtered and sorted
    List(ListArgs),
    /// Flip the completed flag on one or more tasks
    Toggle(IdsArgs),
    /// Delete one or more tasks by id
    Delete(IdsArgs),
    /// Fetch starter tasks from the seed endpoint
    Seed(SeedArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task text
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long = "due", value_name = "DATE")]
    pub due_date: String,
}

impl AddArgs {
    pub fn joined_text(&self) -> String {
        self.text.join(" ")
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Which tasks to show
    #[arg(long, value_enum, default_value_t = Filter::All)]
    pub filter: Filter,

    /// Reorder (and persist) the collection before printing
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Emit rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IdsArgs {
    /// One or more task ids (shown by `dolist list`)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<TaskId>,
}

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// Seed even when tasks already exist (seeded tasks go first)
    #[arg(long)]
    pub force: bool,
}
