//! Core library for the `weather-uploader` tool.
//!
//! This crate defines:
//! - Configuration loading (defaults, TOML file, environment)
//! - The weather provider abstraction and its OpenWeather client
//! - The object store abstraction and its S3 backend
//! - `WeatherUploader`, which ties fetching, CSV export and manifest upload together
//!
//! It is used by the `weather-uploader` binary, but the uploader can be driven with any
//! `WeatherSource` and `ObjectStore` implementation.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod storage;
pub mod uploader;

pub use config::{Config, ConfigFile};
pub use error::{FetchError, StorageError};
pub use model::{BucketStatus, ManifestDescriptor, RunSummary, WeatherSnapshot};
pub use provider::{OpenWeatherClient, WeatherSource, source_from_config};
pub use storage::{ObjectStore, S3Store};
pub use uploader::WeatherUploader;
