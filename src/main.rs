use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::{info, Level};

mod analysis;
mod config;
mod gitlab;
mod output;

use analysis::ActivityCollector;
use crate::config::Config;
use gitlab::GitLabClient;
use output::Reporter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./pushstats.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GitLab instance URL
    #[arg(long)]
    url: Option<String>,

    /// GitLab private access token
    #[arg(long, env = "GITLAB_PRIVATE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Numeric id of the group to analyze
    #[arg(short, long)]
    group_id: Option<u64>,

    /// Number of days to look back for push events
    #[arg(long)]
    span_days: Option<u32>,

    /// Number of users listed in each top table
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Minimum number of pushes for a user to be ranked
    #[arg(short, long)]
    min_pushes: Option<usize>,

    /// Report file, overwritten on every run
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// Skip members whose data cannot be fetched instead of aborting
    #[arg(long)]
    skip_failed_users: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.gitlab.url = url.clone();
        }
        if let Some(token) = &self.token {
            config.gitlab.private_token = token.clone();
        }
        if let Some(group_id) = self.group_id {
            config.gitlab.group_id = Some(group_id);
        }
        if let Some(span_days) = self.span_days {
            config.analysis.span_days = span_days;
        }
        if let Some(top_n) = self.top_n {
            config.analysis.top_n = top_n;
        }
        if let Some(min_pushes) = self.min_pushes {
            config.analysis.min_pushes_required = min_pushes;
        }
        if let Some(output_file) = &self.output_file {
            config.output.results_file = output_file.clone();
        }
        if self.skip_failed_users {
            config.analysis.skip_failed_users = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    println!(
        "{}",
        "PushStats - GitLab Push Activity Report".bright_cyan().bold()
    );

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;
    let config = config;

    println!("GitLab: {}", config.gitlab.url.bright_white());

    let client = GitLabClient::new(
        &config.gitlab.url,
        &config.gitlab.private_token,
        config.gitlab.per_page,
    )?;
    let reporter = Reporter::new(&config.output.results_file);

    info!(
        "Analyzing the last {} days, top {} users, at least {} pushes",
        config.analysis.span_days, config.analysis.top_n, config.analysis.min_pushes_required
    );

    let stats = ActivityCollector::new(&client, &config)
        .collect(Utc::now().date_naive())
        .await?;
    info!(
        "{} users ranked, {} users below the push threshold",
        stats.rankings.sorted_all.len(),
        stats.excluded.len()
    );

    reporter.generate_report(&stats).await?;

    println!(
        "\n{}",
        format!(
            "Results have been written to {}.",
            reporter.output_path().display()
        )
        .bright_green()
        .bold()
    );

    Ok(())
}
