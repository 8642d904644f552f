use anyhow::Result;

pub mod reporter;
pub mod text;

pub use reporter::Reporter;
pub use text::TextGenerator;

use crate::analysis::PushStatistics;

pub trait OutputGenerator {
    fn generate(&self, stats: &PushStatistics) -> Result<String>;
}

/// Day counts print with at least one decimal place, so `10` renders as `10.0`
/// and `2.42` stays `2.42`.
pub fn format_days(days: f64) -> String {
    if days.is_finite() && days.fract() == 0.0 {
        format!("{:.1}", days)
    } else {
        format!("{}", days)
    }
}
