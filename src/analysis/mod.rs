pub mod collector;
pub mod filter;
pub mod intervals;
pub mod ranking;

pub use collector::ActivityCollector;
pub use filter::UserFilter;
pub use intervals::IntervalAnalyzer;
pub use ranking::{Rankings, Ranker};

/// Largest gap between two consecutive pushes, with the bounding dates as `MM/DD`.
#[derive(Debug, Clone, PartialEq)]
pub struct LongestGap {
    pub days: f64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalStats {
    pub average_interval_days: Option<f64>,
    pub longest_gap: Option<LongestGap>,
}

/// A member who made fewer pushes than required. The statistics are never
/// filled in for under-threshold users and render as just the name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedUser {
    pub name: String,
    pub longest_gap: Option<LongestGap>,
    pub average_interval_days: Option<f64>,
}

impl ExcludedUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            longest_gap: None,
            average_interval_days: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserOutcome {
    Ranked(IntervalStats),
    Excluded(ExcludedUser),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub name: String,
    pub outcome: UserOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedUser {
    pub name: String,
    pub stats: IntervalStats,
}

/// Everything the report needs from one run.
#[derive(Debug, Clone)]
pub struct PushStatistics {
    pub group_name: String,
    pub span_days: u32,
    pub top_n: usize,
    pub min_pushes_required: usize,
    pub rankings: Rankings,
    pub excluded: Vec<ExcludedUser>,
}

impl PushStatistics {
    pub fn new(
        group_name: impl Into<String>,
        span_days: u32,
        min_pushes_required: usize,
        ranker: &Ranker,
        records: &[UserRecord],
    ) -> Self {
        let excluded = records
            .iter()
            .filter_map(|record| match &record.outcome {
                UserOutcome::Excluded(user) => Some(user.clone()),
                UserOutcome::Ranked(_) => None,
            })
            .collect();

        Self {
            group_name: group_name.into(),
            span_days,
            top_n: ranker.top_n(),
            min_pushes_required,
            rankings: ranker.rank(records),
            excluded,
        }
    }
}
