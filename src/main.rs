use clap::Parser;
use colored::*;
use github_stats_graph::app;
use github_stats_graph::chart::format_thousands;
use github_stats_graph::cli::Cli;
use github_stats_graph::config::{Config, Mode};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    println!("{}", "GitHub Stars & Downloads Graph".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match &config.mode {
        Mode::Mock => println!("{}", "Running with mock data (no API calls)".yellow()),
        Mode::Live { repo, .. } => {
            println!("📡 Fetching statistics for {}", repo.to_string().cyan())
        }
    }

    match app::run(&config).await {
        Ok(report) => {
            println!("⭐ Stars: {}", format_thousands(report.total_stars()));
            println!("📦 Downloads: {}", format_thousands(report.total_downloads()));
            if let Some(records) = report.history_len {
                println!("🗂️  History records: {}", records);
            }
            println!("✅ Graph saved to {}", report.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
