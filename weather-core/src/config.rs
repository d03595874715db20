use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub use crate::provider::openweather::DEFAULT_URL as DEFAULT_API_URL;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_PREFIX: &str = "weather-data";
pub const DEFAULT_CITIES: [&str; 3] = ["Philadelphia", "Seattle", "New York"];

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_BUCKET: &str = "AWS_BUCKET_NAME";
pub const ENV_REGION: &str = "AWS_REGION";

/// Optional on-disk configuration. Every field may be left out.
///
/// Example TOML:
/// bucket_name = "my-weather-bucket"
/// region = "us-west-2"
/// cities = ["Chicago", "Denver"]
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub bucket_name: Option<String>,
    pub region: Option<String>,
    pub cities: Option<Vec<String>>,
    pub prefix: Option<String>,
    pub api_base_url: Option<String>,
}

impl ConfigFile {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config file")
    }

    /// Load the config file at `path`, or the platform default location when `path` is absent.
    ///
    /// A missing default file yields an empty config; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };

        if !path.exists() {
            if explicit {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Path to the default config file.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-uploader")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Fully resolved settings for one run of the uploader.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub bucket_name: String,
    pub region: String,
    pub cities: Vec<String>,
    pub prefix: String,
    pub api_base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("cities", &self.cities)
            .field("prefix", &self.prefix)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl Config {
    /// Load `.env`, the config file, and the process environment, in increasing precedence.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();
        let file = ConfigFile::load(path)?;
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file values with values from `env`. Environment wins; blank values count as unset.
    pub fn resolve<F>(file: ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let api_key = lookup(ENV_API_KEY).or(file.api_key).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: set {ENV_API_KEY} in the environment or a .env file."
            )
        })?;

        let bucket_name = lookup(ENV_BUCKET).or(file.bucket_name).ok_or_else(|| {
            anyhow!(
                "No destination bucket configured.\n\
                 Hint: set {ENV_BUCKET} in the environment or a .env file."
            )
        })?;

        let region = lookup(ENV_REGION)
            .or(file.region)
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let cities = file
            .cities
            .unwrap_or_else(|| DEFAULT_CITIES.iter().map(|c| c.to_string()).collect());

        let prefix = file
            .prefix
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        Ok(Self {
            api_key,
            bucket_name,
            region,
            cities,
            prefix,
            api_base_url: file.api_base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}
