use super::*;
use crate::config::Config;
use crate::gitlab::{GitLabClient, Member, UserActivity};
use crate::output::format_days;
use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// Walks the group's members one at a time and turns their push history into
/// ranked or excluded records.
pub struct ActivityCollector<'a> {
    client: &'a GitLabClient,
    config: &'a Config,
    progress: ProgressBar,
}

impl<'a> ActivityCollector<'a> {
    pub fn new(client: &'a GitLabClient, config: &'a Config) -> Self {
        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} members ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        Self {
            client,
            config,
            progress,
        }
    }

    #[cfg(test)]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub async fn collect(&self, today: NaiveDate) -> Result<PushStatistics> {
        let group_id = self.config.group_id()?;
        let analysis = &self.config.analysis;

        info!("Retrieving '{}' group data...", group_id);
        let group = self.client.group(group_id).await?;

        info!("Retrieving members from the group...");
        let members = self.client.group_members(group_id).await?;
        info!("Retrieved {} members from the group.", members.len());

        let after = today
            .checked_sub_days(Days::new(u64::from(analysis.span_days)))
            .with_context(|| format!("Lookback of {} days is out of range", analysis.span_days))?;
        debug!("Counting push events after {}", after);

        let filter = UserFilter::from_config(&self.config.users);
        let analyzer = IntervalAnalyzer::new(analysis.min_pushes_required);

        self.progress.set_length(members.len() as u64);

        let mut records = Vec::new();
        for member in &members {
            match self.collect_member(member, after, &filter, &analyzer).await {
                Ok(Some(record)) => insert_record(&mut records, record),
                Ok(None) => {}
                Err(e) if analysis.skip_failed_users => {
                    warn!("Skipping member {}: {:#}", member.id, e);
                }
                Err(e) => {
                    self.progress.abandon();
                    return Err(e);
                }
            }
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();

        let ranker = Ranker::new(analysis.top_n);
        Ok(PushStatistics::new(
            group.name,
            analysis.span_days,
            analysis.min_pushes_required,
            &ranker,
            &records,
        ))
    }

    async fn collect_member(
        &self,
        member: &Member,
        after: NaiveDate,
        filter: &UserFilter<'_>,
        analyzer: &IntervalAnalyzer,
    ) -> Result<Option<UserRecord>> {
        let user = self.client.user(member.id).await?;

        if !filter.is_eligible(&user.name) {
            info!("User {} is excluded from results.", user.name);
            debug!("User {} eligibility: {:?}", user.name, filter.check(&user.name));
            return Ok(None);
        }

        info!("Retrieving events for user {}...", user.name);
        let activity = UserActivity {
            id: user.id,
            pushes: self.client.push_events(user.id, after).await?,
            name: user.name,
        };
        debug!(
            "User {} ({}) has {} push events",
            activity.name,
            activity.id,
            activity.pushes.len()
        );

        let outcome = analyzer.analyze(&activity.name, &activity.pushes);
        match &outcome {
            UserOutcome::Ranked(stats) => {
                let average = stats
                    .average_interval_days
                    .map(format_days)
                    .unwrap_or_else(|| "N/A".to_string());
                info!("Average interval for user {} is {} days.", activity.name, average);
            }
            UserOutcome::Excluded(_) => {
                info!(
                    "User {} has not made enough push events in the past {} days and will be excluded from results.",
                    activity.name, self.config.analysis.span_days
                );
            }
        }

        Ok(Some(UserRecord {
            name: activity.name,
            outcome,
        }))
    }
}

/// Display names are not unique on GitLab; a later record replaces an
/// earlier one with the same name at the earlier position.
pub fn insert_record(records: &mut Vec<UserRecord>, record: UserRecord) {
    match records.iter_mut().find(|existing| existing.name == record.name) {
        Some(existing) => {
            warn!(
                "Duplicate display name {}, keeping the most recent member's results",
                record.name
            );
            *existing = record;
        }
        None => records.push(record),
    }
}
