use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{City, MonthlyRecord, Temperature, WeatherReport};

/// The backend serves statistics for this fixed year.
pub const REPORT_YEAR: i32 = 2024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a fetch produced no report. Terminal for the request: the client
/// never retries on its own, callers decide whether to re-invoke.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure, including the 10s timeout.
    #[error("could not reach the weather backend: {0}")]
    Network(String),

    /// Non-2xx response. A 400 carries the backend's list of valid city
    /// names when it supplied one.
    #[error("weather backend returned HTTP {code}")]
    UpstreamStatus {
        code: u16,
        available_cities: Vec<String>,
    },

    /// The body parsed as JSON but failed structural validation.
    #[error("malformed weather response: {0}")]
    InvalidShape(String),
}

/// Seam between the pipeline and the transport, so tests and alternative
/// backends can substitute their own source of reports.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Fetch one full calendar year of monthly records for `city`.
    ///
    /// The report arrives atomically or not at all; there is no partial
    /// or streaming variant.
    async fn fetch_monthly(&self, city: &City) -> Result<WeatherReport, FetchError>;
}

/// reqwest-backed client for the dashboard backend's JSON contract.
#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    http: Client,
    base_url: String,
}

impl HttpWeatherClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherClient for HttpWeatherClient {
    async fn fetch_monthly(&self, city: &City) -> Result<WeatherReport, FetchError> {
        let url = format!("{}/api/weather", self.base_url);
        debug!(city = %city.name, url = %url, "fetching monthly weather");

        let res = self
            .http
            .get(&url)
            .query(&[("city", city.name.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Network("request timed out".to_string())
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            // Error bodies are best-effort JSON; a 400 lists the cities
            // the backend does serve.
            let available_cities = serde_json::from_str::<RawEnvelope>(&body)
                .map(|raw| raw.available_cities)
                .unwrap_or_default();

            warn!(city = %city.name, code = status.as_u16(), "upstream rejected request");
            return Err(FetchError::UpstreamStatus {
                code: status.as_u16(),
                available_cities,
            });
        }

        let raw: RawEnvelope = serde_json::from_str(&body)
            .map_err(|e| FetchError::InvalidShape(e.to_string()))?;

        into_report(city, raw)
    }
}

/// Wire shape of the backend response, success and error variants folded
/// into one struct. Structural requirements are enforced afterwards in
/// [`into_report`], not by serde.
#[derive(Debug, Default, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    location: Option<RawLocation>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    monthly_data: Option<Vec<RawMonth>>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    available_cities: Vec<String>,
}

/// Only checked for presence; the registry is the authority on
/// coordinates.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
    country: String,
}

#[derive(Debug, Deserialize)]
struct RawMonth {
    month: String,
    #[serde(default)]
    temperature: RawTemperature,
    #[serde(default)]
    precipitation: Option<f64>,
    #[serde(default)]
    wind_speed: Option<f64>,
    #[serde(default)]
    pressure: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTemperature {
    #[serde(default)]
    avg: Option<f64>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
}

/// Validate a 2xx envelope and convert it to a report.
///
/// Eleven months is a validation failure, not a degraded report; there is
/// no partial rendering path downstream of here.
fn into_report(city: &City, raw: RawEnvelope) -> Result<WeatherReport, FetchError> {
    if !raw.success {
        return Err(FetchError::InvalidShape(
            "success flag not set on 2xx response".to_string(),
        ));
    }
    if raw.city.is_none() {
        return Err(FetchError::InvalidShape("missing city field".to_string()));
    }
    if raw.location.is_none() {
        return Err(FetchError::InvalidShape("missing location field".to_string()));
    }

    let months = raw
        .monthly_data
        .ok_or_else(|| FetchError::InvalidShape("missing monthly_data field".to_string()))?;

    if months.len() != 12 {
        return Err(FetchError::InvalidShape(format!(
            "expected 12 monthly records, got {}",
            months.len()
        )));
    }

    let year = raw.year.unwrap_or(REPORT_YEAR);

    let mut records = Vec::with_capacity(12);
    for (idx, raw_month) in months.into_iter().enumerate() {
        let month = NaiveDate::parse_from_str(&raw_month.month, "%Y-%m-%d").map_err(|e| {
            FetchError::InvalidShape(format!("bad month date '{}': {e}", raw_month.month))
        })?;

        if month.day() != 1 {
            return Err(FetchError::InvalidShape(format!(
                "month date '{}' is not a first-of-month",
                raw_month.month
            )));
        }

        if month.year() != year || month.month0() as usize != idx {
            return Err(FetchError::InvalidShape(format!(
                "records out of calendar order: found {} at position {}",
                raw_month.month,
                idx + 1
            )));
        }

        records.push(MonthlyRecord {
            month,
            temperature: Temperature {
                avg: raw_month.temperature.avg,
                min: raw_month.temperature.min,
                max: raw_month.temperature.max,
            },
            precipitation_mm: raw_month.precipitation,
            wind_speed_kmh: raw_month.wind_speed,
            pressure_hpa: raw_month.pressure,
            humidity_pct: raw_month.humidity,
        });
    }

    let fetched_at = raw
        .timestamp
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

    Ok(WeatherReport {
        city: city.clone(),
        year,
        records,
        fetched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CityRegistry;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn berlin() -> City {
        CityRegistry::builtin()
            .resolve("Berlin")
            .expect("Berlin must be present")
            .clone()
    }

    fn month_entry(month: u32) -> Value {
        json!({
            "month": format!("2024-{month:02}-01"),
            "temperature": { "avg": 10.0 + f64::from(month), "min": 2.0, "max": 20.0 },
            "precipitation": 30.0,
            "wind_speed": 12.0,
            "pressure": 1013.0,
            "humidity": 65.0
        })
    }

    fn success_body(months: u32) -> Value {
        json!({
            "success": true,
            "city": "Berlin",
            "location": { "latitude": 52.52, "longitude": 13.405, "country": "Germany" },
            "year": 2024,
            "monthly_data": (1..=months).map(month_entry).collect::<Vec<_>>(),
            "timestamp": "2024-12-31T12:00:00Z"
        })
    }

    async fn mount(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .and(query_param("city", "Berlin"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_returns_a_full_report() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(success_body(12))).await;

        let client = HttpWeatherClient::new(server.uri()).expect("client builds");
        let report = client.fetch_monthly(&berlin()).await.expect("fetch succeeds");

        assert_eq!(report.city.name, "Berlin");
        assert_eq!(report.year, 2024);
        assert_eq!(report.records.len(), 12);
        assert_eq!(report.records[0].temperature.avg, Some(11.0));
        assert_eq!(report.records[11].month.month0(), 11);
    }

    #[tokio::test]
    async fn eleven_months_is_invalid_shape() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(success_body(11))).await;

        let client = HttpWeatherClient::new(server.uri()).expect("client builds");
        let err = client.fetch_monthly(&berlin()).await.unwrap_err();

        match err {
            FetchError::InvalidShape(msg) => assert!(msg.contains("got 11")),
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn monthly_data_must_be_an_array() {
        let server = MockServer::start().await;
        let mut body = success_body(12);
        body["monthly_data"] = json!("not an array");
        mount(&server, ResponseTemplate::new(200).set_body_json(body)).await;

        let client = HttpWeatherClient::new(server.uri()).expect("client builds");
        let err = client.fetch_monthly(&berlin()).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidShape(_)));
    }

    #[tokio::test]
    async fn success_flag_false_on_200_is_invalid_shape() {
        let server = MockServer::start().await;
        let mut body = success_body(12);
        body["success"] = json!(false);
        mount(&server, ResponseTemplate::new(200).set_body_json(body)).await;

        let client = HttpWeatherClient::new(server.uri()).expect("client builds");
        let err = client.fetch_monthly(&berlin()).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidShape(_)));
    }

    #[tokio::test]
    async fn records_out_of_order_are_invalid_shape() {
        let server = MockServer::start().await;
        let mut body = success_body(12);
        body["monthly_data"][0]["month"] = json!("2024-03-01");
        mount(&server, ResponseTemplate::new(200).set_body_json(body)).await;

        let client = HttpWeatherClient::new(server.uri()).expect("client builds");
        let err = client.fetch_monthly(&berlin()).await.unwrap_err();

        match err {
            FetchError::InvalidShape(msg) => assert!(msg.contains("calendar order")),
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mid_month_dates_are_invalid_shape() {
        let server = MockServer::start().await;
        let mut body = success_body(12);
        body["monthly_data"][4]["month"] = json!("2024-05-15");
        mount(&server, ResponseTemplate::new(200).set_body_json(body)).await;

        let client = HttpWeatherClient::new(server.uri()).expect("client builds");
        let err = client.fetch_monthly(&berlin()).await.unwrap_err();

        match err {
            FetchError::InvalidShape(msg) => assert!(msg.contains("first-of-month")),
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn records_from_another_year_are_invalid_shape() {
        let server = MockServer::start().await;
        let mut body = success_body(12);
        // Right month slot, wrong year.
        body["monthly_data"][4]["month"] = json!("2023-05-01");
        mount(&server, ResponseTemplate::new(200).set_body_json(body)).await;

        let client = HttpWeatherClient::new(server.uri()).expect("client builds");
        let err = client.fetch_monthly(&berlin()).await.unwrap_err();

        match err {
            FetchError::InvalidShape(msg) => assert!(msg.contains("calendar order")),
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_request_surfaces_available_cities() {
        let server = MockServer::start().await;
        let body = json!({
            "success": false,
            "error": "Invalid city: Berlin",
            "available_cities": ["Delhi", "Tokyo"]
        });
        mount(&server, ResponseTemplate::new(400).set_body_json(body)).await;

        let client = HttpWeatherClient::new(server.uri()).expect("client builds");
        let err = client.fetch_monthly(&berlin()).await.unwrap_err();

        match err {
            FetchError::UpstreamStatus {
                code,
                available_cities,
            } => {
                assert_eq!(code, 400);
                assert_eq!(available_cities, vec!["Delhi", "Tokyo"]);
            }
            other => panic!("expected UpstreamStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_maps_to_upstream_status() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(500)
                .set_body_json(json!({ "success": false, "error": "Internal server error" })),
        )
        .await;

        let client = HttpWeatherClient::new(server.uri()).expect("client builds");
        let err = client.fetch_monthly(&berlin()).await.unwrap_err();

        match err {
            FetchError::UpstreamStatus { code, .. } => assert_eq!(code, 500),
            other => panic!("expected UpstreamStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        // Nothing listens on this port.
        let client =
            HttpWeatherClient::new("http://127.0.0.1:9".to_string()).expect("client builds");
        let err = client.fetch_monthly(&berlin()).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
