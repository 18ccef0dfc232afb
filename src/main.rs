//! studybase CLI entry point

use clap::Parser;
use studybase::cli::{Cli, Commands};
use studybase::core::config::Config;
use studybase::core::error::Result;
use studybase::engine::QueryEngine;
use studybase::{output, server};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("STUDYBASE_LOG"))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Search {
            query,
            limit,
            format,
        } => {
            let mut config = config;
            if let Some(limit) = limit {
                config.search.max_results = limit;
            }

            let engine = QueryEngine::from_config(&config);
            let response = engine.query(&query).await?;
            print!("{}", output::format_response(&response, format));
            Ok(())
        }
        Commands::Serve { port } => {
            let engine = QueryEngine::from_config(&config);
            server::run(engine, port).await
        }
    }
}
