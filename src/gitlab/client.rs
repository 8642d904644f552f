use super::*;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

const USER_AGENT: &str = "pushstats";
const NEXT_PAGE_HEADER: &str = "x-next-page";

pub struct GitLabClient {
    client: reqwest::Client,
    api_url: String,
    per_page: u32,
}

impl GitLabClient {
    pub fn new(base_url: &str, private_token: &str, per_page: u32) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if !private_token.is_empty() {
            let mut token = HeaderValue::from_str(private_token)
                .context("Private token contains characters not allowed in a header")?;
            token.set_sensitive(true);

            let mut headers = HeaderMap::new();
            headers.insert("private-token", token);
            builder = builder.default_headers(headers);
        }

        Ok(Self {
            client: builder.build().context("Failed to build HTTP client")?,
            api_url: format!("{}/api/v4", base_url.trim_end_matches('/')),
            per_page: per_page.max(1),
        })
    }

    pub async fn group(&self, group_id: u64) -> Result<Group> {
        self.get_json(&format!("/groups/{}", group_id), &[])
            .await
            .with_context(|| format!("Failed to retrieve group {}", group_id))
    }

    pub async fn group_members(&self, group_id: u64) -> Result<Vec<Member>> {
        self.get_paginated(&format!("/groups/{}/members", group_id), &[])
            .await
            .with_context(|| format!("Failed to retrieve members of group {}", group_id))
    }

    pub async fn user(&self, user_id: u64) -> Result<User> {
        self.get_json(&format!("/users/{}", user_id), &[])
            .await
            .with_context(|| format!("Failed to retrieve user {}", user_id))
    }

    /// All push events of a user after `after`, parsed and in ascending order.
    pub async fn push_events(&self, user_id: u64, after: NaiveDate) -> Result<Vec<DateTime<Utc>>> {
        let query = [
            ("action", "pushed".to_string()),
            ("sort", "asc".to_string()),
            ("after", after.format("%Y-%m-%d").to_string()),
        ];

        let events: Vec<Event> = self
            .get_paginated(&format!("/users/{}/events", user_id), &query)
            .await
            .with_context(|| format!("Failed to retrieve push events for user {}", user_id))?;

        let mut pushes = events
            .iter()
            .map(|event| parse_event_timestamp(&event.created_at))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Invalid push event for user {}", user_id))?;

        // interval analysis expects oldest first
        pushes.sort();
        Ok(pushes)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()?;

        response
            .json()
            .await
            .with_context(|| format!("Unexpected response body from {}", url))
    }

    async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}{}", self.api_url, path);
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            debug!("GET {} (page {})", url, page);

            let response = self
                .client
                .get(&url)
                .query(query)
                .query(&[("per_page", self.per_page), ("page", page)])
                .send()
                .await
                .with_context(|| format!("Request to {} failed", url))?
                .error_for_status()?;

            let next_page = response
                .headers()
                .get(NEXT_PAGE_HEADER)
                .map(|value| value.to_str().unwrap_or("").trim().parse::<u32>().ok());

            let batch: Vec<T> = response
                .json()
                .await
                .with_context(|| format!("Unexpected response body from {}", url))?;
            let batch_len = batch.len();
            items.extend(batch);

            page = match next_page {
                Some(Some(next)) if next > page => next,
                Some(_) => break,
                None if batch_len < self.per_page as usize || batch_len == 0 => break,
                None => page + 1,
            };
        }

        Ok(items)
    }
}
