use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Context, Result};

use crate::cli::{AddArgs, CliCommand, IdsArgs, ListArgs, SeedArgs};
use crate::config::AppConfig;
use crate::core::commands as core_commands;
use crate::core::seed::{self, CancellationToken, RemoteSeedLoader, SeedOutcome};
use crate::core::{render, Counts, TaskRow};
use crate::model::{DeleteResult, SortKey, ToggleResult};

const EMPTY_LIST_HINT: &str = "No tasks yet. Run `dolist seed` to load starter tasks.";

pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, mut writer: W) -> Result<()> {
    match command {
        CliCommand::Add(args) => handle_add(config, &args, &mut writer),
        CliCommand::List(args) => handle_list(config, &args, &mut writer),
        CliCommand::Toggle(args) => handle_toggle(config, &args, &mut writer),
        CliCommand::Delete(args) => handle_delete(config, &args, &mut writer),
        CliCommand::Seed(args) => handle_seed(config, &args, &mut writer),
        CliCommand::Tui => Err(anyhow!("launch interactive surfaces directly")),
    }
}

fn handle_add<W: Write>(config: &AppConfig, args: &AddArgs, mut writer: W) -> Result<()> {
    let mut store = core_commands::open_store(config);
    let task = store
        .add(&args.joined_text(), &args.due_date)
        .map_err(|err| {
            let headline = if err.is_blank_field() {
                "Please fill all fields!"
            } else {
                "Please enter a valid date!"
            };
            anyhow::Error::new(err).context(headline)
        })?;
    writeln!(writer, "Added {} {} (due {})", task.id, task.text, task.due_date)?;
    Ok(())
}

fn handle_list<W: Write>(config: &AppConfig, args: &ListArgs, mut writer: W) -> Result<()> {
    let mut store = core_commands::open_store(config);
    match args.sort {
        Some(SortKey::Id) => store.sort_by_id(),
        Some(SortKey::Date) => store.sort_by_due_date(),
        None => {}
    }

    let rows = render(store.tasks(), args.filter);
    if args.json {
        serde_json::to_writer_pretty(&mut writer, &rows)?;
        writeln!(writer)?;
        return Ok(());
    }

    for row in &rows {
        writeln!(writer, "{}", RowLine(row))?;
    }
    if store.is_empty() {
        // Only the TUI seeds on its own; point CLI users at the explicit command.
        writeln!(writer, "{}", EMPTY_LIST_HINT)?;
    }
    let counts = Counts::of(store.tasks());
    writeln!(
        writer,
        "{} shown • {} active • {} completed",
        rows.len(),
        counts.active,
        counts.completed
    )?;
    Ok(())
}

fn handle_toggle<W: Write>(config: &AppConfig, args: &IdsArgs, mut writer: W) -> Result<()> {
    let results = core_commands::toggle_tasks(config, &args.ids);
    write_toggle_results(&results, &mut writer)
}

fn handle_delete<W: Write>(config: &AppConfig, args: &IdsArgs, mut writer: W) -> Result<()> {
    let results = core_commands::delete_tasks(config, &args.ids);
    let summary = DeleteSummary::from_results(&results);
    summary.write_to(&mut writer)?;
    Ok(())
}

fn handle_seed<W: Write>(config: &AppConfig, args: &SeedArgs, mut writer: W) -> Result<()> {
    let mut store = core_commands::open_store(config);
    let loader =
        RemoteSeedLoader::new(config.seed().clone()).context("failed to build HTTP client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let cancel = CancellationToken::new();
    let outcome = if args.force {
        let fetched = runtime.block_on(loader.fetch_cancellable(&cancel));
        seed::apply_seed(&mut store, fetched)
    } else {
        runtime.block_on(seed::seed_if_empty(&mut store, &loader, &cancel))
    };

    writeln!(writer, "{}", OutcomeLine(&outcome))?;
    Ok(())
}

fn write_toggle_results<W: Write>(results: &[ToggleResult], mut writer: W) -> Result<()> {
    let mut missing = Vec::new();
    for result in results {
        match result.completed {
            Some(true) => writeln!(writer, "{} completed", result.id)?,
            Some(false) => writeln!(writer, "{} reopened", result.id)?,
            None => missing.push(result.id.to_string()),
        }
    }
    if !missing.is_empty() {
        writeln!(writer, "Not found: {}", missing.join(", "))?;
    }
    Ok(())
}

struct RowLine<'a>(&'a TaskRow);

impl fmt::Display for RowLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = self.0;
        let mark = if row.checked { "x" } else { " " };
        write!(f, "[{}] {:<14} {:<10} {}", mark, row.id, row.due_label, row.text)
    }
}

struct OutcomeLine<'a>(&'a SeedOutcome);

impl fmt::Display for OutcomeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            SeedOutcome::Skipped => write!(f, "Tasks already present; nothing seeded"),
            SeedOutcome::Seeded(count) => write!(
                f,
                "Seeded {} task{}",
                count,
                if *count == 1 { "" } else { "s" }
            ),
            SeedOutcome::Empty => write!(f, "Seed endpoint returned no tasks"),
            SeedOutcome::Failed(reason) => write!(f, "Seeding failed: {}", reason),
            SeedOutcome::Cancelled => write!(f, "Seeding cancelled"),
        }
    }
}

struct DeleteSummary {
    deleted: usize,
    missing: Vec<String>,
}

impl DeleteSummary {
    fn from_results(results: &[DeleteResult]) -> Self {
        let mut deleted = 0usize;
        let mut missing = Vec::new();
        for result in results {
            if result.deleted {
                deleted += 1;
            } else {
                missing.push(result.id.to_string());
            }
        }
        Self { deleted, missing }
    }

    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", SummaryLine::deleted(self.deleted))?;
        if !self.missing.is_empty() {
            writeln!(writer, "Not found: {}", self.missing.join(", "))?;
        }
        Ok(())
    }
}

enum SummaryLine {
    Deleted(usize),
    NoneDeleted,
}

impl SummaryLine {
    fn deleted(count: usize) -> Self {
        if count > 0 {
            SummaryLine::Deleted(count)
        } else {
            SummaryLine::NoneDeleted
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Deleted(count) => {
                write!(
                    f,
                    "Deleted {} task{}",
                    count,
                    if *count == 1 { "" } else { "s" }
                )
            }
            SummaryLine::NoneDeleted => write!(f, "No tasks deleted"),
        }
    }
}
