use crate::github::API_BASE_URL;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "stats/overview.png";
pub const DEFAULT_HISTORY_FILE: &str = "stats/download_history.json";

#[derive(Parser, Debug)]
#[command(name = "github-stats-graph")]
#[command(about = "Generate GitHub stars and release downloads graphs for a repository")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// GitHub repository (owner/repo)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub REST API root, e.g. a GitHub Enterprise host
    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,

    /// Use mock data instead of API calls
    #[arg(long)]
    pub mock: bool,

    /// Output image file path
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Download history file, appended on every live run
    #[arg(long, env = "DOWNLOAD_HISTORY_FILE", default_value = DEFAULT_HISTORY_FILE)]
    pub history_file: PathBuf,
}
