use anyhow::Context;
use dotenv::dotenv;
use eth_news_price::config::{AppConfig, SourceConfig};
use eth_news_price::data::{CachedSource, CsvSource, DataSource, RestSource};
use eth_news_price::{pipeline, report};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Builds the data source handle described by the configuration.
///
/// The handle is owned by `main` and dropped once the report is rendered.
fn build_source(config: &AppConfig) -> Box<dyn DataSource> {
    match &config.source {
        SourceConfig::Rest {
            base_url,
            api_key,
            news_table,
            price_table,
        } => Box::new(RestSource::new(
            base_url.as_str(),
            api_key.as_str(),
            news_table.as_str(),
            price_table.as_str(),
        )),
        SourceConfig::Csv {
            news_path,
            price_path,
        } => Box::new(CsvSource::new(news_path, price_path)),
    }
}

/// Entry point: fetch both record sets once, join them and render the three views.
///
/// # Workflow Steps
/// - Load environment variables from .env file
/// - Build the configured data source behind a time-bounded cache
/// - Run the join pipeline
/// - Print headlines, joined rows and the daily price history
/// - Optionally write the headlines table as HTML
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env()?;
    let source = CachedSource::new(build_source(&config), config.cache_ttl);

    let output = pipeline::run(&source)
        .await
        .context("failed to load news and price data")?;

    report::print_headlines(&output);
    report::print_joined(&output, config.priced_only);
    report::print_price_history(&output);

    if let Some(path) = &config.report_html {
        let html = report::headlines_html(&output).context("failed to render headlines table")?;
        std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote headlines table");
    }

    Ok(())
}
