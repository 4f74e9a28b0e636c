use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::Upstream;
use crate::data_source::{GeocodeSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider_policy::ProviderPolicy;
use crate::{Location, ProviderId, Query};

const BASE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// OpenStreetMap Nominatim geocoder.
#[derive(Debug, Clone)]
pub struct NominatimAdapter {
    upstream: Upstream,
}

impl NominatimAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            upstream: Upstream::new(ProviderId::Nominatim, http_client),
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

    async fn resolve(&self, city: &Query) -> Result<Location, SourceError> {
        let request = HttpRequest::get(BASE_URL)
            .with_query("q", city.as_str())
            .with_query("format", "json")
            .with_query("limit", "1")
            .with_header("Accept-Language", "en");

        let places: Vec<Place> = self.upstream.fetch_json(request).await?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::provider("City not found"))?;

        let latitude = parse_coordinate("lat", &place.lat)?;
        let longitude = parse_coordinate("lon", &place.lon)?;
        let name = place
            .display_name
            .split(',')
            .next()
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .unwrap_or(city.as_str())
            .to_owned();

        Ok(Location {
            name,
            latitude,
            longitude,
        })
    }
}

impl GeocodeSource for NominatimAdapter {
    fn geocode<'a>(&'a self, city: &'a Query) -> SourceFuture<'a, Location> {
        Box::pin(self.resolve(city))
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    display_name: String,
    lat: String,
    lon: String,
}

fn parse_coordinate(field: &str, value: &str) -> Result<f64, SourceError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| SourceError::internal(format!("nominatim '{field}' is not a number: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::testing::ScriptedHttpClient;
    use crate::data_source::SourceErrorKind;

    fn city(raw: &str) -> Query {
        Query::parse(raw).expect("valid query")
    }

    #[tokio::test]
    async fn takes_first_display_name_segment() {
        let client = Arc::new(ScriptedHttpClient::new().respond(
            r#"[{"display_name":"Pune, Pune District, Maharashtra, India","lat":"18.5213738","lon":"73.8545071"}]"#,
        ));
        let adapter = NominatimAdapter::new(client.clone());

        let location = adapter.geocode(&city("  pune ")).await.expect("location");

        assert_eq!(location.name, "Pune");
        assert_eq!(location.latitude, 18.5213738);
        assert_eq!(location.longitude, 73.8545071);

        let request = &client.requests()[0];
        assert_eq!(request.query_value("q"), Some("pune"));
        assert_eq!(request.query_value("limit"), Some("1"));
        assert_eq!(
            request.headers.get("accept-language").map(String::as_str),
            Some("en")
        );
    }

    #[tokio::test]
    async fn empty_result_is_city_not_found() {
        let client = Arc::new(ScriptedHttpClient::new().respond("[]"));

        let error = NominatimAdapter::new(client)
            .geocode(&city("Atlantis"))
            .await
            .expect_err("no match");

        assert_eq!(error.kind(), SourceErrorKind::Provider);
        assert_eq!(error.message(), "City not found");
    }

    #[tokio::test]
    async fn malformed_coordinates_are_internal() {
        let client = Arc::new(
            ScriptedHttpClient::new().respond(r#"[{"display_name":"X","lat":"north","lon":"1"}]"#),
        );

        let error = NominatimAdapter::new(client)
            .geocode(&city("X"))
            .await
            .expect_err("bad lat");

        assert_eq!(error.kind(), SourceErrorKind::Internal);
    }
}
