use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  /// Page size applied to list queries that don't set one
  pub default_limit: Option<u32>,
  /// Default tracing filter, overridden by JOBTRACK_LOG
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the jobs API, e.g. "https://tracker.example.com/api/v1/"
  pub url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_timeout_secs() -> u64 {
  30
}

impl Config {
  /// Configuration with defaults for everything but the API URL.
  pub fn for_url(url: impl Into<String>) -> Self {
    Self {
      api: ApiConfig {
        url: url.into(),
        timeout_secs: default_timeout_secs(),
      },
      default_limit: None,
      log_level: default_log_level(),
    }
  }

  /// Load configuration, letting `url_override` replace the file's API URL.
  ///
  /// Without a config file, an override URL alone is enough to run.
  pub fn resolve(explicit_path: Option<&Path>, url_override: Option<String>) -> Result<Self> {
    let found = match explicit_path {
      Some(p) if p.exists() => Some(p.to_path_buf()),
      Some(p) => return Err(eyre!("Config file not found: {}", p.display())),
      None => Self::find_config_file(),
    };

    match (found, url_override) {
      (Some(path), Some(url)) => {
        let mut config = Self::load_from_path(&path)?;
        config.api.url = url;
        Ok(config)
      }
      (Some(path), None) => Self::load_from_path(&path),
      (None, Some(url)) => Ok(Self::for_url(url)),
      (None, None) => Err(eyre!(
        "No configuration file found. Create one at ~/.config/jobtrack/config.yaml\n\
                 or pass the API address with --url."
      )),
    }
  }

  /// Search order:
  /// 1. ./jobtrack.yaml (current directory)
  /// 2. $XDG_CONFIG_HOME/jobtrack/config.yaml
  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("jobtrack.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("jobtrack").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  /// Get the API bearer token from the environment.
  ///
  /// Checks JOBTRACK_TOKEN.
  pub fn get_api_token() -> Result<String> {
    std::env::var("JOBTRACK_TOKEN")
      .map_err(|_| eyre!("API token not found. Set the JOBTRACK_TOKEN environment variable."))
  }
}
