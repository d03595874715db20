use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;

use crate::{error::FetchError, model::WeatherSnapshot};

use super::WeatherSource;

pub const DEFAULT_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Current-conditions client for the OpenWeather API. Units are always imperial.
#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        tracing::debug!(message = "making current weather request", url = %self.base_url, city = %city);

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "imperial"),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Request {
                city: city.to_string(),
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Body {
            city: city.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                city: city.to_string(),
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|source| FetchError::Parse {
                city: city.to_string(),
                source,
            })?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| FetchError::MissingCondition {
                city: city.to_string(),
            })?;

        Ok(WeatherSnapshot {
            city: city.to_string(),
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            description,
            timestamp: WeatherSnapshot::format_timestamp(Local::now()),
        })
    }
}

impl fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_current(city).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEATTLE_BODY: &str = r#"{"main":{"temp":70,"feels_like":68,"humidity":50},"weather":[{"description":"clear"}]}"#;

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::with_base_url("KEY".into(), format!("{}/data/2.5/weather", server.uri()))
    }

    #[tokio::test]
    async fn parses_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Seattle"))
            .and(query_param("appid", "KEY"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SEATTLE_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let snap = client_for(&server).current("Seattle").await.unwrap();

        assert_eq!(snap.city, "Seattle");
        assert_eq!(snap.temperature, 70.0);
        assert_eq!(snap.feels_like, 68.0);
        assert_eq!(snap.humidity, 50);
        assert_eq!(snap.description, "clear");
        assert_eq!(snap.timestamp.len(), 15);
        assert_eq!(snap.timestamp.as_bytes()[8], b'-');
    }

    #[tokio::test]
    async fn city_is_passed_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "New York"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SEATTLE_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let snap = client_for(&server).current("New York").await.unwrap();
        assert_eq!(snap.city, "New York");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"cod":"404","message":"city not found"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).current("Atlantis").await.unwrap_err();

        match err {
            FetchError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 404);
                assert!(body.contains("city not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"weather":[]}"#))
            .mount(&server)
            .await;

        let err = client_for(&server).current("Seattle").await.unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[tokio::test]
    async fn empty_conditions_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"main":{"temp":70,"feels_like":68,"humidity":50},"weather":[]}"#,
            ))
            .mount(&server)
            .await;

        let err = client_for(&server).current("Seattle").await.unwrap_err();
        assert!(matches!(err, FetchError::MissingCondition { .. }));
    }

    #[tokio::test]
    async fn transport_failure_is_a_request_error() {
        // Nothing listens on port 1, so the connection is refused.
        let client =
            OpenWeatherClient::with_base_url("KEY".into(), "http://127.0.0.1:1/data/2.5/weather".into());
        let err = client.current("Seattle").await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
