use anyhow::Result;
use clap::Parser;

use dolist::logging::{init_tracing, LogTarget};

fn main() -> Result<()> {
    let cli = dolist::cli::Cli::parse();
    let config = dolist::config::from_cli(&cli)?;

    match cli.command.clone() {
        Some(dolist::cli::CliCommand::Tui) | None => {
            init_tracing(cli.log_filter.clone(), LogTarget::File(config.log_path()))?;
            tracing::info!(data_dir = %config.data_dir().display(), "starting tui");
            dolist::tui::run(config)?;
        }
        Some(command) => {
            init_tracing(cli.log_filter.clone(), LogTarget::Stderr)?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            dolist::commands::execute(&config, command, &mut handle)?;
        }
    }

    Ok(())
}
