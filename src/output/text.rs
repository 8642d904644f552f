use super::*;
use crate::analysis::{LongestGap, PushStatistics};
use anyhow::Result;
use std::fmt::Write;

pub struct TextGenerator;

impl TextGenerator {
    pub fn new() -> Self {
        Self
    }

    fn write_title(&self, out: &mut String, stats: &PushStatistics) -> Result<()> {
        writeln!(
            out,
            "{} Push Statistics for Last {} Days\n",
            stats.group_name, stats.span_days
        )?;
        Ok(())
    }

    fn write_top_by_average(&self, out: &mut String, stats: &PushStatistics) -> Result<()> {
        writeln!(out, "Top {} Users by Average Push Interval:", stats.top_n)?;
        for user in &stats.rankings.top_by_average {
            if let Some(average) = user.stats.average_interval_days {
                writeln!(
                    out,
                    "User: {}, Average push interval: {} days",
                    user.name,
                    format_days(average)
                )?;
            }
        }
        Ok(())
    }

    fn write_top_by_longest_gap(&self, out: &mut String, stats: &PushStatistics) -> Result<()> {
        writeln!(
            out,
            "\nTop {} Users by Longest Span Without a Push:",
            stats.top_n
        )?;
        for user in &stats.rankings.top_by_longest_gap {
            if let Some(gap) = &user.stats.longest_gap {
                writeln!(out, "User: {}, {}", user.name, longest_gap_text(gap))?;
            }
        }
        Ok(())
    }

    fn write_all_users(&self, out: &mut String, stats: &PushStatistics) -> Result<()> {
        writeln!(out, "\nAll Users Included in the Results:")?;
        for user in &stats.rankings.sorted_all {
            let Some(average) = user.stats.average_interval_days else {
                continue;
            };
            let gap = user
                .stats
                .longest_gap
                .as_ref()
                .map(longest_gap_text)
                .unwrap_or_else(|| "Longest span without a push: N/A days, from N/A to N/A".to_string());
            writeln!(
                out,
                "User: {}, Average push interval: {} days, {}",
                user.name,
                format_days(average),
                gap
            )?;
        }
        Ok(())
    }

    fn write_excluded(&self, out: &mut String, stats: &PushStatistics) -> Result<()> {
        if stats.excluded.is_empty() {
            return Ok(());
        }

        writeln!(
            out,
            "\nList of Users Who Made Less Than {} Push Events:",
            stats.min_pushes_required
        )?;
        for user in &stats.excluded {
            match &user.longest_gap {
                Some(gap) => writeln!(out, "User: {}, {}", user.name, longest_gap_text(gap))?,
                None => writeln!(out, "User: {}", user.name)?,
            }
        }
        Ok(())
    }
}

impl OutputGenerator for TextGenerator {
    fn generate(&self, stats: &PushStatistics) -> Result<String> {
        let mut out = String::new();

        self.write_title(&mut out, stats)?;
        self.write_top_by_average(&mut out, stats)?;
        self.write_top_by_longest_gap(&mut out, stats)?;
        self.write_all_users(&mut out, stats)?;
        self.write_excluded(&mut out, stats)?;

        Ok(out)
    }
}

fn longest_gap_text(gap: &LongestGap) -> String {
    format!(
        "Longest span without a push: {} days, from {} to {}",
        format_days(gap.days),
        gap.from,
        gap.to
    )
}
