use color_eyre::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{self, JobCommand};
use crate::commands;
use crate::config::Config;
use crate::coordinator::JobsCoordinator;
use crate::format;
use crate::jobs::types::JobId;
use crate::jobs::JobsApi;

/// Whether a read may be answered from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
  Cached,
  Fresh,
}

/// Text produced by one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
  pub text: String,
  pub failed: bool,
}

impl Output {
  fn ok(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      failed: false,
    }
  }

  fn error(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      failed: true,
    }
  }
}

/// Main application state: one coordinator, and so one cache, per run
pub struct App<A> {
  jobs: JobsCoordinator<A>,
  default_limit: Option<u32>,
}

impl<A: JobsApi> App<A> {
  pub fn new(api: A, config: &Config) -> Self {
    Self {
      jobs: JobsCoordinator::new(api),
      default_limit: config.default_limit,
    }
  }

  pub async fn execute(&self, command: JobCommand, fetch: Fetch) -> Output {
    match command {
      JobCommand::List(args) => {
        let query = args.into_query(self.default_limit);
        let state = match fetch {
          Fetch::Cached => self.jobs.get_jobs(&query).await,
          Fetch::Fresh => self.jobs.refresh_jobs(&query).await,
        };
        Output {
          text: format::list_state(&state),
          failed: state.error().is_some(),
        }
      }
      JobCommand::Show { id } => {
        let id = JobId::from(id);
        let state = match fetch {
          Fetch::Cached => self.jobs.get_job(&id).await,
          Fetch::Fresh => self.jobs.refresh_job(&id).await,
        };
        Output {
          text: format::detail_state(&state),
          failed: state.error().is_some(),
        }
      }
      JobCommand::Create(args) => {
        let state = self.jobs.create_job(args.into()).await;
        match state.data().filter(|_| state.error().is_none()) {
          Some(job) => Output::ok(format!("Created job {}\n{}", job.id, format::job(job))),
          None => Output::error(format::detail_state(&state)),
        }
      }
      JobCommand::Update(args) => {
        let (id, patch) = args.into_parts();
        if patch.is_empty() {
          return Output::error("Nothing to update: pass at least one field to change.");
        }
        let state = self.jobs.update_job(&id, patch).await;
        match state.data().filter(|_| state.error().is_none()) {
          Some(job) => Output::ok(format!("Updated job {}\n{}", job.id, format::job(job))),
          None => Output::error(format::detail_state(&state)),
        }
      }
      JobCommand::Delete { id } => {
        let id = JobId::from(id);
        let state = self.jobs.delete_job(&id).await;
        match state.error() {
          None => Output::ok(format!("Deleted job {}", id)),
          Some(_) => Output::error(format::detail_state(&state)),
        }
      }
      JobCommand::Stats => {
        let state = match fetch {
          Fetch::Cached => self.jobs.get_statistics().await,
          Fetch::Fresh => self.jobs.refresh_statistics().await,
        };
        Output {
          text: format::stats_state(&state),
          failed: state.error().is_some(),
        }
      }
    }
  }

  /// Handle one session line. `None` means the user asked to quit.
  pub async fn handle_line(&self, line: &str) -> Option<Output> {
    let words = match cli::split_line(line) {
      Ok(words) => words,
      Err(e) => return Some(Output::error(e)),
    };
    let Some(first) = words.first() else {
      return Some(Output::ok(""));
    };

    let Some(command) = commands::resolve(first) else {
      return Some(Output::error(format!(
        "Unknown command '{}'. Type 'help' for a list.",
        first
      )));
    };

    let output = match command.name {
      "quit" => return None,
      "help" => Output::ok(commands::help_text()),
      "cache" => Output::ok(format::cache(&self.jobs.cache_snapshot())),
      "clear" => {
        self.jobs.clear_cache();
        Output::ok("Cache cleared.")
      }
      "refresh" => self.run_words(&words[1..], Fetch::Fresh).await,
      _ => self.run_words(&words, Fetch::Cached).await,
    };
    Some(output)
  }

  async fn run_words(&self, words: &[String], fetch: Fetch) -> Output {
    let Some(first) = words.first() else {
      return Output::error("refresh what? Try 'refresh list', 'refresh show <id>' or 'refresh stats'.");
    };
    let Some(command) = commands::resolve(first) else {
      return Output::error(format!("Unknown command '{}'. Type 'help' for a list.", first));
    };

    let mut canonical = Vec::with_capacity(words.len());
    canonical.push(command.name.to_string());
    canonical.extend(words[1..].iter().cloned());

    match cli::parse_words(&canonical) {
      Ok(JobCommand::Create(_) | JobCommand::Update(_) | JobCommand::Delete { .. })
        if fetch == Fetch::Fresh =>
      {
        Output::error("refresh works with list, show and stats.")
      }
      Ok(parsed) => self.execute(parsed, fetch).await,
      Err(e) => Output::error(e.trim_end().to_string()),
    }
  }

  /// Interactive loop over stdin until EOF or `quit`.
  pub async fn run_session(&self) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    println!("jobtrack session. Type 'help' for commands, 'quit' to leave.");
    loop {
      print!("jobtrack> ");
      stdout.flush()?;

      let Some(line) = lines.next_line().await? else {
        break;
      };

      match self.handle_line(&line).await {
        None => break,
        Some(output) if output.failed => eprintln!("{}", output.text),
        Some(output) if !output.text.is_empty() => println!("{}", output.text),
        Some(_) => {}
      }
    }

    Ok(())
  }
}
