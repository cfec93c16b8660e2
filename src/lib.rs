pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod history;
pub mod mock;
pub mod models;
pub mod series;
pub mod types;
