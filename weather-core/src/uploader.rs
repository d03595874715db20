use crate::{
    error::StorageError,
    model::{BucketStatus, ManifestDescriptor, RunSummary, WeatherSnapshot},
    provider::WeatherSource,
    storage::{CSV_CONTENT_TYPE, JSON_CONTENT_TYPE, ObjectStore},
};

/// Fetches snapshots for a list of cities and uploads each as CSV, followed by a manifest.
///
/// Every operation is best-effort: failures are logged and reported through return
/// values, never propagated.
#[derive(Debug)]
pub struct WeatherUploader {
    source: Box<dyn WeatherSource>,
    store: Box<dyn ObjectStore>,
    prefix: String,
}

impl WeatherUploader {
    pub fn new(source: Box<dyn WeatherSource>, store: Box<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            source,
            store,
            prefix: prefix.into(),
        }
    }

    pub fn data_key(&self, city: &str, timestamp: &str) -> String {
        format!("{}/{}-{}.csv", self.prefix, city, timestamp)
    }

    pub fn manifest_key(&self) -> String {
        format!("{}/manifest.json", self.prefix)
    }

    /// Create the bucket unless it already exists. Any failure of the existence
    /// check is taken to mean the bucket is absent.
    pub async fn ensure_bucket(&self) -> BucketStatus {
        let bucket = self.store.bucket();

        match self.store.head_bucket().await {
            Ok(()) => {
                tracing::info!(message = "bucket exists", bucket = %bucket);
                return BucketStatus::Exists;
            }
            Err(e) => {
                tracing::debug!(message = "bucket existence check failed", bucket = %bucket, error = %e);
            }
        }

        tracing::info!(message = "creating bucket", bucket = %bucket, region = %self.store.region());
        match self.store.create_bucket().await {
            Ok(()) => {
                tracing::info!(message = "successfully created bucket", bucket = %bucket);
                BucketStatus::Created
            }
            Err(e) => {
                tracing::error!(message = "error creating bucket", bucket = %bucket, error = %e);
                BucketStatus::CreateFailed
            }
        }
    }

    pub async fn fetch_weather(&self, city: &str) -> Option<WeatherSnapshot> {
        match self.source.current(city).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::error!(message = "error fetching weather data", city = %city, error = %e);
                None
            }
        }
    }

    /// Upload the snapshot as CSV, then point the manifest at it.
    ///
    /// Returns `true` when the CSV object was stored, even if the manifest upload fails.
    pub async fn upload(&self, snapshot: &WeatherSnapshot, city: &str) -> bool {
        let key = self.data_key(city, &snapshot.timestamp);

        let stored = match snapshot.to_csv(city) {
            Ok(body) => self.store.put_object(&key, body, CSV_CONTENT_TYPE).await,
            Err(e) => Err(e),
        };

        if let Err(e) = stored {
            tracing::error!(message = "error saving weather data", city = %city, key = %key, error = %e);
            return false;
        }
        tracing::info!(message = "saved CSV data", city = %city, key = %key);

        let manifest_key = self.manifest_key();
        match self.upload_manifest(&key, &manifest_key).await {
            Ok(()) => {
                tracing::info!(message = "manifest uploaded", key = %manifest_key, data_key = %key);
            }
            Err(e) => {
                tracing::error!(message = "error uploading manifest", key = %manifest_key, error = %e);
            }
        }

        true
    }

    async fn upload_manifest(&self, data_key: &str, manifest_key: &str) -> Result<(), StorageError> {
        let manifest = ManifestDescriptor::for_object(self.store.object_url(data_key));
        let body = manifest.to_json()?;
        self.store.put_object(manifest_key, body, JSON_CONTENT_TYPE).await
    }

    /// Process each city in order. A failed city is skipped, never fatal.
    pub async fn run<S: AsRef<str>>(&self, cities: &[S]) -> RunSummary {
        let mut summary = RunSummary::default();

        for city in cities.iter().map(AsRef::as_ref) {
            summary.attempted += 1;
            tracing::info!(message = "fetching weather data", city = %city);

            let Some(snapshot) = self.fetch_weather(city).await else {
                tracing::warn!(message = "failed to fetch weather data", city = %city);
                summary.failed.push(city.to_string());
                continue;
            };
            summary.fetched += 1;

            tracing::info!(
                message = "weather data",
                city = %city,
                temperature_f = snapshot.temperature,
                feels_like_f = snapshot.feels_like,
                humidity_pct = snapshot.humidity,
                conditions = %snapshot.description,
            );

            if self.upload(&snapshot, city).await {
                summary.uploaded += 1;
                tracing::info!(message = "weather data saved", city = %city);
            } else {
                summary.failed.push(city.to_string());
            }
        }

        summary
    }
}
