use chrono::{DateTime, Utc};
use serde::Deserialize;

// GitHub API response structures
#[derive(Debug, Clone, Deserialize)]
pub struct StargazerUser {
    pub login: String,
}

/// One entry of the `application/vnd.github.v3.star+json` stargazer listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Stargazer {
    pub starred_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<StargazerUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub download_count: u64,
}

impl Release {
    /// Sum of the asset download counters of this release.
    pub fn download_count(&self) -> u64 {
        self.assets.iter().map(|asset| asset.download_count).sum()
    }
}
