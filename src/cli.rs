use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::jobs::types::{CreateJob, JobId, JobPatch, JobQuery, JobSort, JobStatus, JobType};

#[derive(Parser, Debug)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications against a jobtrack API server")]
#[command(version)]
pub struct Cli {
  /// Path to config file (default: $XDG_CONFIG_HOME/jobtrack/config.yaml)
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  /// API base URL, overrides the config file
  #[arg(short, long)]
  pub url: Option<String>,

  #[command(subcommand)]
  pub command: Option<TopCommand>,
}

#[derive(Subcommand, Debug)]
pub enum TopCommand {
  #[command(flatten)]
  Job(JobCommand),
  /// Interactive session sharing one cache across commands (default)
  Session,
}

/// Commands available both on the command line and inside a session
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum JobCommand {
  /// List jobs
  List(ListArgs),
  /// Show a single job
  Show { id: String },
  /// Add a job application
  Create(CreateArgs),
  /// Change fields of a job
  Update(UpdateArgs),
  /// Delete a job
  Delete { id: String },
  /// Application statistics
  Stats,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ListArgs {
  #[arg(long, value_enum)]
  pub status: Option<JobStatus>,
  #[arg(long = "type", value_enum)]
  pub job_type: Option<JobType>,
  #[arg(long, value_enum)]
  pub sort: Option<JobSort>,
  /// Free-text search on position and company
  #[arg(short, long)]
  pub search: Option<String>,
  #[arg(short, long)]
  pub page: Option<u32>,
  #[arg(short, long)]
  pub limit: Option<u32>,
}

impl ListArgs {
  /// Build the list query, filling in the configured page size if none was given.
  pub fn into_query(self, default_limit: Option<u32>) -> JobQuery {
    JobQuery {
      status: self.status,
      job_type: self.job_type,
      sort: self.sort,
      search: self.search,
      page: self.page,
      limit: self.limit.or(default_limit),
    }
  }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CreateArgs {
  #[arg(long)]
  pub company: String,
  #[arg(long)]
  pub position: String,
  #[arg(long, value_enum)]
  pub status: Option<JobStatus>,
  #[arg(long = "type", value_enum)]
  pub job_type: Option<JobType>,
  #[arg(long)]
  pub location: Option<String>,
  #[arg(long)]
  pub job_url: Option<String>,
  #[arg(long)]
  pub company_url: Option<String>,
}

impl From<CreateArgs> for CreateJob {
  fn from(args: CreateArgs) -> Self {
    CreateJob {
      company: args.company,
      position: args.position,
      status: args.status,
      job_type: args.job_type,
      location: args.location,
      job_url: args.job_url,
      company_url: args.company_url,
    }
  }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct UpdateArgs {
  pub id: String,
  #[arg(long)]
  pub company: Option<String>,
  #[arg(long)]
  pub position: Option<String>,
  #[arg(long, value_enum)]
  pub status: Option<JobStatus>,
  #[arg(long = "type", value_enum)]
  pub job_type: Option<JobType>,
  #[arg(long)]
  pub location: Option<String>,
  #[arg(long)]
  pub job_url: Option<String>,
  #[arg(long)]
  pub company_url: Option<String>,
}

impl UpdateArgs {
  pub fn into_parts(self) -> (JobId, JobPatch) {
    let patch = JobPatch {
      company: self.company,
      position: self.position,
      status: self.status,
      job_type: self.job_type,
      location: self.location,
      job_url: self.job_url,
      company_url: self.company_url,
    };
    (JobId::from(self.id), patch)
  }
}

/// Parser for one line typed inside a session
#[derive(Parser, Debug)]
#[command(name = "jobtrack", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
  #[command(subcommand)]
  command: JobCommand,
}

/// Parse already-split session words into a job command.
pub fn parse_words(words: &[String]) -> Result<JobCommand, String> {
  SessionLine::try_parse_from(words)
    .map(|line| line.command)
    .map_err(|err| err.to_string())
}

/// Split a session line the way a shell would, so quoted values keep spaces.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
  shell_words::split(line).map_err(|err| err.to_string())
}
