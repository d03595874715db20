use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, WeatherSnapshot, error::FetchError};

pub mod openweather;

pub use openweather::OpenWeatherClient;

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Fetch the current conditions for a free-text location name.
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the OpenWeather-backed source from resolved configuration.
pub fn source_from_config(config: &Config) -> Box<dyn WeatherSource> {
    Box::new(OpenWeatherClient::with_base_url(
        config.api_key.clone(),
        config.api_base_url.clone(),
    ))
}
