use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use weather_core::{Config, S3Store, WeatherUploader, source_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-uploader",
    version,
    about = "Fetch current weather for a list of cities and upload it to S3 as CSV"
)]
pub struct Cli {
    /// Path to a TOML config file. Defaults to the platform config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Cli {
    /// Run one pass over the configured cities.
    ///
    /// Failed cities are logged and the run still returns `Ok`, so the process exits 0.
    /// Configuration problems (no API key, no bucket, unreadable config file) are the
    /// exception: they return an error before any network call and the process exits non-zero.
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref())?;
        tracing::debug!(message = "resolved configuration", config = ?config);

        let store = S3Store::from_config(&config).await;
        let uploader = WeatherUploader::new(
            source_from_config(&config),
            Box::new(store),
            config.prefix.clone(),
        );

        uploader.ensure_bucket().await;

        let summary = uploader.run(config.cities.as_slice()).await;
        if summary.all_succeeded() {
            tracing::info!(message = "run complete", uploaded = summary.uploaded);
        } else {
            tracing::warn!(
                message = "run complete with failures",
                attempted = summary.attempted,
                uploaded = summary.uploaded,
                failed = ?summary.failed,
            );
        }

        Ok(())
    }
}
