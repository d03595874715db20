//! Binary crate for the `weather-uploader` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Setting up logging
//! - Wiring the real OpenWeather and S3 clients into `weather_core::WeatherUploader`

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(cmd.log_level)
            .finish(),
    )?;

    tracing::info!("starting weather uploader");
    cmd.run().await
}
