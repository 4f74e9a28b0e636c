use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::Upstream;
use crate::data_source::{MovieSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider_policy::ProviderPolicy;
use crate::{Movie, ProviderId, Query};

const BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb title lookup.
#[derive(Debug, Clone)]
pub struct OmdbAdapter {
    upstream: Upstream,
    api_key: Option<String>,
}

impl OmdbAdapter {
    /// A missing key is not an error until the first lookup.
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            upstream: Upstream::new(ProviderId::Omdb, http_client),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
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

    async fn fetch(&self, title: &Query) -> Result<Movie, SourceError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SourceError::provider("OMDb API key is not configured (set DASHKIT_OMDB_API_KEY)")
        })?;

        let request = HttpRequest::get(BASE_URL)
            .with_query("t", title.as_str())
            .with_query("plot", "full")
            .with_query("apikey", api_key);

        let payload: OmdbPayload = self.upstream.fetch_json(request).await?;
        if payload.response.eq_ignore_ascii_case("false") {
            return Err(SourceError::provider(
                payload
                    .error
                    .unwrap_or_else(|| String::from("Movie not found")),
            ));
        }

        let title = present(payload.title)
            .ok_or_else(|| SourceError::internal("omdb response is missing Title"))?;

        Ok(Movie {
            title,
            year: present(payload.year).unwrap_or_default(),
            runtime: present(payload.runtime),
            genre: present(payload.genre),
            rating: present(payload.imdb_rating),
            plot: present(payload.plot),
            actors: present(payload.actors),
            poster: present(payload.poster),
        })
    }
}

impl MovieSource for OmdbAdapter {
    fn lookup<'a>(&'a self, title: &'a Query) -> SourceFuture<'a, Movie> {
        Box::pin(self.fetch(title))
    }
}

#[derive(Debug, Deserialize)]
struct OmdbPayload {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Runtime", default)]
    runtime: Option<String>,
    #[serde(rename = "Genre", default)]
    genre: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "Plot", default)]
    plot: Option<String>,
    #[serde(rename = "Actors", default)]
    actors: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
}

/// OMDb spells absent values as `"N/A"`.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| {
        let value = value.trim();
        !value.is_empty() && value != "N/A"
    })
}
