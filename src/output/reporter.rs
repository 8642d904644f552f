use super::*;
use crate::analysis::PushStatistics;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct Reporter {
    generator: TextGenerator,
    output_path: PathBuf,
}

impl Reporter {
    pub fn new(output_path: impl AsRef<Path>) -> Self {
        Self {
            generator: TextGenerator::new(),
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render the whole report first, then replace the destination in one write.
    pub async fn generate_report(&self, stats: &PushStatistics) -> Result<()> {
        let content = self.generator.generate(stats)?;

        tokio::fs::write(&self.output_path, content)
            .await
            .with_context(|| format!("Failed to write report to {}", self.output_path.display()))?;
        info!("Report saved to {}", self.output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ExcludedUser, Ranker, UserOutcome, UserRecord};

    fn stats_with_excluded(name: &str) -> PushStatistics {
        let records = vec![UserRecord {
            name: name.to_string(),
            outcome: UserOutcome::Excluded(ExcludedUser::new(name)),
        }];
        PushStatistics::new("Platform", 30, 12, &Ranker::new(10), &records)
    }

    #[tokio::test]
    async fn test_report_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        std::fs::write(&path, "stale content that is much longer than the new report ".repeat(50)).unwrap();

        let reporter = Reporter::new(&path);
        reporter.generate_report(&stats_with_excluded("Bob")).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Platform Push Statistics for Last 30 Days\n"));
        assert!(written.ends_with("User: Bob\n"));
        assert!(!written.contains("stale content"));
    }

    #[tokio::test]
    async fn test_report_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.txt");

        let reporter = Reporter::new(&path);
        assert_eq!(reporter.output_path(), path.as_path());
        assert!(reporter.generate_report(&stats_with_excluded("Bob")).await.is_err());
    }
}
