mod app;
mod cache;
mod cli;
mod commands;
mod config;
mod coordinator;
mod format;
mod jobs;
mod logging;
mod state;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};

use crate::app::{App, Fetch};
use crate::cli::{Cli, TopCommand};
use crate::jobs::HttpJobsApi;

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Cli::parse();

  // Load configuration
  let config = config::Config::resolve(args.config.as_deref(), args.url)?;

  // Held until exit so buffered log lines are flushed
  let _log_guard = logging::init(&config.log_level)?;
  tracing::info!(url = %config.api.url, "starting jobtrack");

  let api = HttpJobsApi::new(&config)?;
  let app = App::new(api, &config);

  match args.command {
    Some(TopCommand::Job(command)) => {
      let output = app.execute(command, Fetch::Cached).await;
      if output.failed {
        return Err(eyre!(output.text));
      }
      println!("{}", output.text);
    }
    Some(TopCommand::Session) | None => app.run_session().await?,
  }

  Ok(())
}
