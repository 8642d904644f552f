use super::*;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct Rankings {
    /// Every ranked user, highest average interval first
    pub sorted_all: Vec<RankedUser>,
    pub top_by_average: Vec<RankedUser>,
    pub top_by_longest_gap: Vec<RankedUser>,
}

pub struct Ranker {
    top_n: usize,
}

impl Ranker {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Excluded records are ignored. Sorts are stable, so users that compare
    /// equal on every key keep the order they were collected in.
    pub fn rank(&self, records: &[UserRecord]) -> Rankings {
        let ranked: Vec<RankedUser> = records
            .iter()
            .filter_map(|record| match &record.outcome {
                UserOutcome::Ranked(stats) => Some(RankedUser {
                    name: record.name.clone(),
                    stats: stats.clone(),
                }),
                UserOutcome::Excluded(_) => None,
            })
            .collect();

        let mut sorted_all = ranked.clone();
        sorted_all.sort_by(|a, b| {
            desc(average(a), average(b)).then_with(|| desc(longest(a), longest(b)))
        });

        // sorted_all is already ordered by average, then longest gap
        let top_by_average = sorted_all
            .iter()
            .filter(|user| average(user).is_some())
            .take(self.top_n)
            .cloned()
            .collect();

        let mut by_gap: Vec<RankedUser> = ranked
            .into_iter()
            .filter(|user| longest(user).is_some())
            .collect();
        by_gap.sort_by(|a, b| {
            desc(longest(a), longest(b)).then_with(|| desc(average(a), average(b)))
        });
        by_gap.truncate(self.top_n);

        Rankings {
            sorted_all,
            top_by_average,
            top_by_longest_gap: by_gap,
        }
    }
}

fn average(user: &RankedUser) -> Option<f64> {
    user.stats.average_interval_days
}

fn longest(user: &RankedUser) -> Option<f64> {
    user.stats.longest_gap.as_ref().map(|gap| gap.days)
}

/// Descending order with absent values last.
fn desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
