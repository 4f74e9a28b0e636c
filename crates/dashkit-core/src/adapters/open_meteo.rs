use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::Upstream;
use crate::data_source::{ForecastSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider_policy::ProviderPolicy;
use crate::ProviderId;

const BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
const HOURLY_FIELDS: &str = "temperature_2m,relativehumidity_2m,windspeed_10m,weathercode";
const FORECAST_DAYS: &str = "5";

/// Open-Meteo forecast body, kept close to the wire shape. Hourly fields are
/// parallel arrays indexed like `time`; any sample may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
    #[serde(default)]
    pub hourly: HourlySeries,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub temperature: Option<f64>,
    /// km/h
    #[serde(default)]
    pub windspeed: Option<f64>,
    #[serde(default)]
    pub weathercode: Option<i64>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub relativehumidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub windspeed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub weathercode: Vec<Option<i64>>,
}

/// Open-Meteo forecast adapter. No API key.
#[derive(Debug, Clone)]
pub struct OpenMeteoAdapter {
    upstream: Upstream,
}

impl OpenMeteoAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            upstream: Upstream::new(ProviderId::OpenMeteo, http_client),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.upstream = self.upstream.with_timeout_ms(timeout_ms);
        self
    }

    pub fn with_policy(mut self, policy: &ProviderPolicy) -> Self {
        self.upstream = self.upstream.with_policy(policy);
        self
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastPayload, SourceError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(SourceError::invalid_request("coordinates must be finite"));
        }

        let request = HttpRequest::get(BASE_URL)
            .with_query("latitude", latitude.to_string())
            .with_query("longitude", longitude.to_string())
            .with_query("current_weather", "true")
            .with_query("hourly", HOURLY_FIELDS)
            .with_query("forecast_days", FORECAST_DAYS)
            .with_query("timezone", "auto");

        let body = self.upstream.fetch(request).await?;
        let envelope: ErrorEnvelope = serde_json::from_str(&body).unwrap_or_default();
        if envelope.error {
            return Err(SourceError::provider(
                envelope
                    .reason
                    .unwrap_or_else(|| String::from("open_meteo rejected the request")),
            ));
        }

        serde_json::from_str(&body).map_err(|error| {
            SourceError::internal(format!("failed to parse open_meteo response: {error}"))
        })
    }
}

impl ForecastSource for OpenMeteoAdapter {
    fn forecast<'a>(&'a self, latitude: f64, longitude: f64) -> SourceFuture<'a, ForecastPayload> {
        Box::pin(self.fetch(latitude, longitude))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}
