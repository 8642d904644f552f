use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "pushstats.toml";
const ENV_PREFIX: &str = "PUSHSTATS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gitlab: GitLabConfig,
    pub analysis: AnalysisConfig,
    pub users: UserListsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    pub url: String,
    pub private_token: String,
    pub group_id: Option<u64>,
    pub per_page: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lookback window in days
    pub span_days: u32,
    /// Number of entries in each top-N table
    pub top_n: usize,
    /// Users with fewer push events are listed as excluded
    pub min_pushes_required: usize,
    /// Log and skip a user whose lookup or events fail instead of aborting the run
    pub skip_failed_users: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserListsConfig {
    pub hard_included: BTreeSet<String>,
    pub hard_excluded: BTreeSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub results_file: PathBuf,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: "https://gitlab.com".to_string(),
            private_token: String::new(),
            group_id: None,
            per_page: 100,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            span_days: 365,
            top_n: 10,
            min_pushes_required: 12,
            skip_failed_users: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_file: PathBuf::from("results.txt"),
        }
    }
}

impl Config {
    /// Load configuration from an optional file followed by `PUSHSTATS_*` environment
    /// variables (`PUSHSTATS_GITLAB__GROUP_ID=42`). An explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        debug!("Loading configuration from {}", file.display());

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(file.as_path()).required(required))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", file.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", file.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.gitlab.url.trim().is_empty() {
            bail!("No GitLab URL configured");
        }
        reqwest::Url::parse(&self.gitlab.url)
            .with_context(|| format!("Invalid GitLab URL: {}", self.gitlab.url))?;

        if self.gitlab.group_id.is_none() {
            bail!("No GitLab group id configured (set gitlab.group_id or pass --group-id)");
        }
        if self.gitlab.per_page == 0 {
            bail!("gitlab.per_page must be at least 1");
        }
        if self.gitlab.private_token.is_empty() {
            warn!("No private token configured, only public data will be visible");
        }
        if self.analysis.min_pushes_required < 2 {
            warn!(
                "min_pushes_required is {}, users with a single push get no interval statistics",
                self.analysis.min_pushes_required
            );
        }
        if self.users.hard_included.is_empty() {
            warn!("No hard included users configured, every member will be skipped");
        }

        Ok(())
    }

    pub fn group_id(&self) -> Result<u64> {
        self.gitlab
            .group_id
            .context("No GitLab group id configured")
    }
}
