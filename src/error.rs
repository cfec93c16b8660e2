use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Invalid repository identifier: {0}")]
    InvalidRepo(String),

    #[error("Repository not provided. Use --repo or set GITHUB_REPOSITORY.")]
    MissingRepository,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Chart rendering error: {0}")]
    RenderError(String),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for StatsError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        StatsError::RenderError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
