use crate::config::RepoSpec;
use crate::error::{Result, StatsError};
use crate::models::StarHistoryPoint;
use crate::types::{Release, Stargazer};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 100;

/// A paginated GitHub collection endpoint.
#[async_trait]
pub trait PageSource {
    type Item: Send;

    /// Fetch the 1-based `page` holding up to `per_page` items.
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<Self::Item>>;
}

/// Totals of a finished page walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageWalk {
    pub pages: u32,
    pub items: usize,
}

/// Request pages one after another, handing each to `on_page`, until a page
/// comes back empty or shorter than [`PER_PAGE`].
///
/// The first error aborts the walk.
pub async fn walk_pages<S, F>(source: &S, mut on_page: F) -> Result<PageWalk>
where
    S: PageSource + Sync + ?Sized,
    F: FnMut(Vec<S::Item>),
{
    let mut walk = PageWalk::default();
    let mut page = 1;

    loop {
        let items = source.fetch_page(page, PER_PAGE).await?;
        walk.pages += 1;

        let len = items.len();
        if len == 0 {
            break;
        }

        walk.items += len;
        on_page(items);

        if len < PER_PAGE as usize {
            break;
        }
        page += 1;
    }

    Ok(walk)
}

/// Sort star timestamps ascending and rank them 1..=n.
///
/// The sort is stable, so equal timestamps keep their fetch order.
pub fn star_history_from_samples(mut samples: Vec<DateTime<Utc>>) -> Vec<StarHistoryPoint> {
    samples.sort();
    samples
        .into_iter()
        .enumerate()
        .map(|(i, starred_at)| StarHistoryPoint {
            starred_at,
            count: i as u64 + 1,
        })
        .collect()
}

pub fn sum_release_downloads(releases: &[Release]) -> u64 {
    releases.iter().map(Release::download_count).sum()
}

/// Walk every stargazer page and build the cumulative star history.
pub async fn fetch_star_history<S>(source: &S) -> Result<Vec<StarHistoryPoint>>
where
    S: PageSource<Item = Stargazer> + Sync + ?Sized,
{
    let mut samples = Vec::new();
    let walk = walk_pages(source, |page| {
        let latest = page
            .last()
            .and_then(|star| star.user.as_ref())
            .map(|user| user.login.clone());
        samples.extend(page.into_iter().map(|star| star.starred_at));
        debug!(fetched = samples.len(), latest = ?latest, "Fetched stars");
    })
    .await?;

    info!(stars = samples.len(), pages = walk.pages, "Total stars fetched");
    Ok(star_history_from_samples(samples))
}

/// Walk every release page and sum the download counters of all assets.
pub async fn fetch_total_downloads<S>(source: &S) -> Result<u64>
where
    S: PageSource<Item = Release> + Sync + ?Sized,
{
    let mut total = 0u64;
    let walk = walk_pages(source, |page| {
        total += sum_release_downloads(&page);
    })
    .await?;

    info!(downloads = total, releases = walk.items, "Current total downloads");
    Ok(total)
}

pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("github-stats-graph/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient {
            client,
            token,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Point the client at another API root, e.g. a GitHub Enterprise host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Build the URL of one page of a repository collection.
    pub fn page_url(
        &self,
        repo: &RepoSpec,
        collection: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/repos/{}/{}/{}",
            self.base_url, repo.owner, repo.name, collection
        ))?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    async fn make_request(&self, url: Url) -> Result<Response> {
        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3.star+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            reqwest::StatusCode::NOT_FOUND => {
                Err(StatsError::NotFound(format!("Resource not found: {}", url)))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(StatsError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }

    async fn fetch_collection_page<T: DeserializeOwned>(
        &self,
        repo: &RepoSpec,
        collection: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<T>> {
        let url = self.page_url(repo, collection, page, per_page)?;
        debug!(%url, "Requesting page");
        let response = self.make_request(url).await?;
        Ok(response.json().await?)
    }

    pub fn stargazers<'a>(&'a self, repo: &'a RepoSpec) -> Stargazers<'a> {
        Stargazers { client: self, repo }
    }

    pub fn releases<'a>(&'a self, repo: &'a RepoSpec) -> Releases<'a> {
        Releases { client: self, repo }
    }
}

/// `GET /repos/{owner}/{repo}/stargazers`
pub struct Stargazers<'a> {
    client: &'a GitHubClient,
    repo: &'a RepoSpec,
}

#[async_trait]
impl PageSource for Stargazers<'_> {
    type Item = Stargazer;

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<Stargazer>> {
        self.client
            .fetch_collection_page(self.repo, "stargazers", page, per_page)
            .await
    }
}

/// `GET /repos/{owner}/{repo}/releases`
pub struct Releases<'a> {
    client: &'a GitHubClient,
    repo: &'a RepoSpec,
}

#[async_trait]
impl PageSource for Releases<'_> {
    type Item = Release;

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<Release>> {
        self.client
            .fetch_collection_page(self.repo, "releases", page, per_page)
            .await
    }
}
