use crate::chart::ChartRenderer;
use crate::config::{Config, Mode};
use crate::error::Result;
use crate::github::{fetch_star_history, fetch_total_downloads, GitHubClient, PageSource};
use crate::history::HistoryStore;
use crate::mock::MockData;
use crate::models::Series;
use crate::series::build_download_series;
use crate::types::{Release, Stargazer};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mock: bool,
    pub stars: Series,
    pub downloads: Series,
    /// Records in the history file after this run; `None` in mock mode
    pub history_len: Option<usize>,
    pub output: PathBuf,
}

impl RunReport {
    pub fn total_stars(&self) -> u64 {
        self.stars.last().map(|(_, count)| count).unwrap_or(0)
    }

    pub fn total_downloads(&self) -> u64 {
        self.downloads.last().map(|(_, count)| count).unwrap_or(0)
    }
}

pub async fn run(config: &Config) -> Result<RunReport> {
    let renderer = ChartRenderer::new();

    match &config.mode {
        Mode::Mock => run_mock(&mut fastrand::Rng::new(), &renderer, &config.output_path),
        Mode::Live {
            repo,
            token,
            api_url,
        } => {
            info!(%repo, authenticated = token.is_some(), "Fetching repository statistics");
            let client = GitHubClient::new(token.clone())?.with_base_url(api_url.as_str());
            let store = HistoryStore::new(&config.history_path);

            run_live(
                &client.stargazers(repo),
                &client.releases(repo),
                &store,
                &renderer,
                &config.output_path,
            )
            .await
        }
    }
}

/// Render synthetic data; neither the network nor the history file is touched.
pub fn run_mock(
    rng: &mut fastrand::Rng,
    renderer: &ChartRenderer,
    output: &Path,
) -> Result<RunReport> {
    let MockData { stars, downloads } = MockData::generate(rng);
    renderer.render(&stars, &downloads, output)?;

    Ok(RunReport {
        mock: true,
        stars,
        downloads,
        history_len: None,
        output: output.to_path_buf(),
    })
}

/// Fetch stars and the current download total, record the total in `store`
/// and render both series.
pub async fn run_live<S, R>(
    stargazers: &S,
    releases: &R,
    store: &HistoryStore,
    renderer: &ChartRenderer,
    output: &Path,
) -> Result<RunReport>
where
    S: PageSource<Item = Stargazer> + Sync + ?Sized,
    R: PageSource<Item = Release> + Sync + ?Sized,
{
    let star_history = fetch_star_history(stargazers).await?;
    let current_downloads = fetch_total_downloads(releases).await?;
    let history = store.append(current_downloads)?;

    let anchor = star_history
        .first()
        .map(|point| point.starred_at)
        .unwrap_or_else(Utc::now);

    let stars = Series::from_star_history(&star_history);
    let downloads = build_download_series(&history, Some(anchor));
    renderer.render(&stars, &downloads, output)?;

    Ok(RunReport {
        mock: false,
        stars,
        downloads,
        history_len: Some(history.len()),
        output: output.to_path_buf(),
    })
}
