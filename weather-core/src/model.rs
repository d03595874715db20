use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Format used for snapshot timestamps and object keys, e.g. `20240131-154500`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

pub const CSV_HEADER: [&str; 6] =
    ["city", "temperature", "feels_like", "humidity", "description", "timestamp"];

/// One point-in-time weather reading for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub description: String,
    pub timestamp: String,
}

impl WeatherSnapshot {
    pub fn format_timestamp(at: DateTime<Local>) -> String {
        at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Render a single-row CSV document (header plus one record).
    ///
    /// The `city` column takes the name the caller asked for, which is not
    /// necessarily the name the API resolved it to.
    pub fn to_csv(&self, city: &str) -> Result<Vec<u8>, StorageError> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        let temperature = self.temperature.to_string();
        let feels_like = self.feels_like.to_string();
        let humidity = self.humidity.to_string();

        wtr.write_record(CSV_HEADER)?;
        wtr.write_record([
            city,
            temperature.as_str(),
            feels_like.as_str(),
            humidity.as_str(),
            self.description.as_str(),
            self.timestamp.as_str(),
        ])?;

        wtr.into_inner().map_err(|e| StorageError::Serialize(e.to_string()))
    }
}

/// Manifest telling a BI tool where to find uploaded CSV files and how to parse them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDescriptor {
    pub file_locations: Vec<FileLocation>,
    pub global_upload_settings: UploadSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLocation {
    #[serde(rename = "URIs")]
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSettings {
    pub format: String,
}

impl ManifestDescriptor {
    pub fn for_object(uri: String) -> Self {
        Self {
            file_locations: vec![FileLocation { uris: vec![uri] }],
            global_upload_settings: UploadSettings { format: "CSV".to_string() },
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, StorageError> {
        serde_json::to_vec_pretty(self).map_err(|e| StorageError::Serialize(e.to_string()))
    }
}

/// Outcome of [`crate::WeatherUploader::ensure_bucket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    Exists,
    Created,
    CreateFailed,
}

/// Tally of a single pass over the city list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub fetched: usize,
    pub uploaded: usize,
    pub failed: Vec<String>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn seattle() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "Seattle".into(),
            temperature: 70.0,
            feels_like: 68.0,
            humidity: 50,
            description: "clear".into(),
            timestamp: "20240131-154500".into(),
        }
    }

    #[test]
    fn csv_has_header_and_one_row() {
        let body = String::from_utf8(seattle().to_csv("Seattle").unwrap()).unwrap();

        assert_eq!(
            body,
            "city,temperature,feels_like,humidity,description,timestamp\n\
             Seattle,70,68,50,clear,20240131-154500\n"
        );
    }

    #[test]
    fn csv_keeps_fractional_temperatures() {
        let mut snap = seattle();
        snap.temperature = 71.36;
        snap.feels_like = 70.5;

        let body = String::from_utf8(snap.to_csv("Seattle").unwrap()).unwrap();
        assert!(body.ends_with("Seattle,71.36,70.5,50,clear,20240131-154500\n"));
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let mut snap = seattle();
        snap.description = "rain, heavy".into();

        let body = String::from_utf8(snap.to_csv("Seattle").unwrap()).unwrap();
        assert!(body.contains(",\"rain, heavy\","));
    }

    #[test]
    fn timestamp_format() {
        let at = Local.with_ymd_and_hms(2024, 1, 31, 15, 45, 0).unwrap();
        assert_eq!(WeatherSnapshot::format_timestamp(at), "20240131-154500");
    }

    #[test]
    fn manifest_json_shape() {
        let manifest = ManifestDescriptor::for_object(
            "https://bucket.s3.us-east-1.amazonaws.com/weather-data/Seattle-1.csv".into(),
        );
        let value: serde_json::Value = serde_json::from_slice(&manifest.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "fileLocations": [
                    { "URIs": ["https://bucket.s3.us-east-1.amazonaws.com/weather-data/Seattle-1.csv"] }
                ],
                "globalUploadSettings": { "format": "CSV" }
            })
        );
    }

    #[test]
    fn manifest_is_pretty_printed() {
        let manifest = ManifestDescriptor::for_object("https://x/y.csv".into());
        let text = String::from_utf8(manifest.to_json().unwrap()).unwrap();

        assert!(text.starts_with("{\n  \"fileLocations\""));
    }
}
