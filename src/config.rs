use crate::cli::Cli;
use crate::error::{Result, StatsError};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoSpec {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(RepoSpec {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(StatsError::InvalidRepo(format!(
                "Invalid repository name format: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Where the chart data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Mock,
    Live {
        repo: RepoSpec,
        token: Option<String>,
        api_url: String,
    },
}

/// Run configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub output_path: PathBuf,
    pub history_path: PathBuf,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let mode = if cli.mock {
            Mode::Mock
        } else {
            let repo = non_empty(cli.repo).ok_or(StatsError::MissingRepository)?;
            Mode::Live {
                repo: repo.parse()?,
                token: non_empty(cli.token),
                api_url: cli.api_url,
            }
        };

        Ok(Config {
            mode,
            output_path: cli.output,
            history_path: cli.history_file,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
