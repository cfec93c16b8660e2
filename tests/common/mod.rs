#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use github_stats_graph::error::{Result, StatsError};
use github_stats_graph::github::PageSource;
use github_stats_graph::types::{Release, ReleaseAsset, Stargazer};
use std::sync::atomic::{AtomicU32, Ordering};

/// Serves a fixed list of pages and counts how often it was asked.
pub struct ScriptedPages<T> {
    pages: Vec<Vec<T>>,
    fail_on_page: Option<u32>,
    calls: AtomicU32,
}

impl<T: Clone> ScriptedPages<T> {
    pub fn new(pages: Vec<Vec<T>>) -> Self {
        Self {
            pages,
            fail_on_page: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing_on(mut self, page: u32) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> PageSource for ScriptedPages<T> {
    type Item = T;

    async fn fetch_page(&self, page: u32, _per_page: u32) -> Result<Vec<T>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_page == Some(page) {
            return Err(StatsError::ApiError(format!(
                "API request failed with status 502 Bad Gateway: page {}",
                page
            )));
        }

        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }
}

pub fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn stargazer(starred_at: DateTime<Utc>) -> Stargazer {
    Stargazer {
        starred_at,
        user: None,
    }
}

/// `count` stargazers, one per minute starting at `start`
pub fn stargazers_from(start: DateTime<Utc>, count: usize) -> Vec<Stargazer> {
    (0..count)
        .map(|i| stargazer(start + chrono::Duration::minutes(i as i64)))
        .collect()
}

pub fn release(tag: &str, download_counts: &[u64]) -> Release {
    Release {
        tag_name: tag.to_string(),
        assets: download_counts
            .iter()
            .enumerate()
            .map(|(i, &download_count)| ReleaseAsset {
                name: format!("{}-asset-{}", tag, i),
                download_count,
            })
            .collect(),
    }
}
