use super::*;
use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;
const GAP_DATE_FORMAT: &str = "%m/%d";

pub struct IntervalAnalyzer {
    min_pushes_required: usize,
}

impl IntervalAnalyzer {
    pub fn new(min_pushes_required: usize) -> Self {
        Self {
            min_pushes_required,
        }
    }

    /// Classify a user from their ascending push timestamps. Users below the
    /// threshold, and users whose pushes yield no interval at all, are excluded.
    pub fn analyze(&self, name: &str, pushes: &[DateTime<Utc>]) -> UserOutcome {
        if pushes.is_empty() || pushes.len() < self.min_pushes_required {
            return UserOutcome::Excluded(ExcludedUser::new(name));
        }

        match interval_stats(pushes) {
            Some(stats) => UserOutcome::Ranked(stats),
            None => UserOutcome::Excluded(ExcludedUser::new(name)),
        }
    }
}

/// Gaps between consecutive pushes in fractional days.
pub fn intervals_in_days(pushes: &[DateTime<Utc>]) -> Vec<f64> {
    pushes
        .windows(2)
        .map(|pair| {
            let delta = pair[1] - pair[0];
            let seconds = delta
                .num_microseconds()
                .map(|us| us as f64 / 1_000_000.0)
                .unwrap_or_else(|| delta.num_seconds() as f64);
            seconds / SECONDS_PER_DAY
        })
        .collect()
}

/// `None` when fewer than two pushes leave no interval to measure.
pub fn interval_stats(pushes: &[DateTime<Utc>]) -> Option<IntervalStats> {
    let intervals = intervals_in_days(pushes);
    if intervals.is_empty() {
        return None;
    }

    let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;

    // strict comparison keeps the earliest of equal maxima
    let mut max_index = 0;
    for (index, interval) in intervals.iter().enumerate().skip(1) {
        if *interval > intervals[max_index] {
            max_index = index;
        }
    }

    Some(IntervalStats {
        average_interval_days: Some(round2(mean)),
        longest_gap: Some(LongestGap {
            days: round2(intervals[max_index]),
            from: pushes[max_index].format(GAP_DATE_FORMAT).to_string(),
            to: pushes[max_index + 1].format(GAP_DATE_FORMAT).to_string(),
        }),
    })
}

/// Two decimal places, ties to even, so `0.125` becomes `0.12`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan(days: &[u32]) -> Vec<DateTime<Utc>> {
        days.iter()
            .map(|day| Utc.with_ymd_and_hms(2024, 1, *day, 12, 0, 0).unwrap())
            .collect()
    }

    #[test]
    fn test_alice_scenario() {
        let pushes = jan(&[1, 2, 4, 6, 8, 9, 10, 20, 22, 24, 26, 28, 30]);
        assert_eq!(pushes.len(), 13);

        let outcome = IntervalAnalyzer::new(12).analyze("Alice", &pushes);
        let UserOutcome::Ranked(stats) = outcome else {
            panic!("Alice should be ranked");
        };

        // 12 gaps summing to 29 days
        assert_eq!(stats.average_interval_days, Some(round2(29.0 / 12.0)));
        assert_eq!(stats.average_interval_days, Some(2.42));
        assert_eq!(
            stats.longest_gap,
            Some(LongestGap {
                days: 10.0,
                from: "01/10".to_string(),
                to: "01/20".to_string(),
            })
        );
    }

    #[test]
    fn test_bob_below_threshold_is_excluded_without_stats() {
        let pushes = jan(&[1, 5, 9, 13, 17]);
        let outcome = IntervalAnalyzer::new(12).analyze("Bob", &pushes);
        assert_eq!(outcome, UserOutcome::Excluded(ExcludedUser::new("Bob")));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let pushes = jan(&[1, 2, 3]);
        assert!(matches!(
            IntervalAnalyzer::new(3).analyze("Carol", &pushes),
            UserOutcome::Ranked(_)
        ));
        assert!(matches!(
            IntervalAnalyzer::new(4).analyze("Carol", &pushes),
            UserOutcome::Excluded(_)
        ));
    }

    #[test]
    fn test_single_push_with_threshold_one_yields_no_stats() {
        let pushes = jan(&[15]);
        assert!(interval_stats(&pushes).is_none());
        let outcome = IntervalAnalyzer::new(1).analyze("Dave", &pushes);
        assert_eq!(outcome, UserOutcome::Excluded(ExcludedUser::new("Dave")));
    }

    #[test]
    fn test_no_pushes_with_threshold_zero_is_excluded() {
        let outcome = IntervalAnalyzer::new(0).analyze("Erin", &[]);
        assert_eq!(outcome, UserOutcome::Excluded(ExcludedUser::new("Erin")));
    }

    #[test]
    fn test_tied_maximum_reports_earliest_gap() {
        let pushes = jan(&[1, 4, 5, 8]);
        let stats = interval_stats(&pushes).unwrap();
        let gap = stats.longest_gap.unwrap();
        assert_eq!(gap.days, 3.0);
        assert_eq!(gap.from, "01/01");
        assert_eq!(gap.to, "01/04");
    }

    #[test]
    fn test_fractional_days() {
        let start = Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap();
        let pushes = vec![
            start,
            start + chrono::Duration::hours(36),
            start + chrono::Duration::hours(42),
        ];
        let intervals = intervals_in_days(&pushes);
        assert_eq!(intervals, vec![1.5, 0.25]);

        let stats = interval_stats(&pushes).unwrap();
        assert_eq!(stats.average_interval_days, Some(0.88));
        let gap = stats.longest_gap.unwrap();
        assert_eq!(gap.days, 1.5);
        assert_eq!(gap.from, "02/28");
        assert_eq!(gap.to, "02/29");
    }

    #[test]
    fn test_average_is_mean_of_gaps() {
        let pushes = jan(&[1, 2, 4, 7, 11]);
        let intervals = intervals_in_days(&pushes);
        assert_eq!(intervals, vec![1.0, 2.0, 3.0, 4.0]);
        let stats = interval_stats(&pushes).unwrap();
        assert_eq!(stats.average_interval_days, Some(2.5));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.416666), 2.42);
        assert_eq!(round2(10.0), 10.0);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_three_hour_gap_rounds_half_to_even() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let pushes = vec![start, start + chrono::Duration::hours(3)];
        let stats = interval_stats(&pushes).unwrap();
        assert_eq!(stats.average_interval_days, Some(0.12));
        assert_eq!(stats.longest_gap.unwrap().days, 0.12);
    }
}
