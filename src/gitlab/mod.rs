use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

pub mod client;

pub use client::GitLabClient;

/// Timestamp layout of `created_at` on GitLab events, e.g. `2024-01-10T08:15:00.123Z`.
/// The fraction is mandatory and at most six digits; `parse_event_timestamp` checks that.
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const MAX_FRACTION_DIGITS: usize = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub created_at: String,
}

/// A member's push events inside the lookback window, oldest first.
#[derive(Debug, Clone)]
pub struct UserActivity {
    pub id: u64,
    pub name: String,
    pub pushes: Vec<DateTime<Utc>>,
}

pub fn parse_event_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if !has_microsecond_fraction(raw) {
        bail!("Unexpected event timestamp format: {}", raw);
    }
    let naive = NaiveDateTime::parse_from_str(raw, EVENT_TIMESTAMP_FORMAT)
        .with_context(|| format!("Unexpected event timestamp format: {}", raw))?;
    Ok(naive.and_utc())
}

fn has_microsecond_fraction(raw: &str) -> bool {
    let Some((_, fraction)) = raw.strip_suffix('Z').and_then(|body| body.rsplit_once('.')) else {
        return false;
    };
    (1..=MAX_FRACTION_DIGITS).contains(&fraction.len())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}
