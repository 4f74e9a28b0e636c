//! Provider adapters.
//!
//! Each adapter owns an [`Upstream`], which runs every call through the
//! provider's circuit breaker and rate gate before touching the transport.

pub mod alphavantage;
pub mod nominatim;
pub mod omdb;
pub mod open_meteo;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::circuit_breaker::CircuitBreaker;
use crate::data_source::SourceError;
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::provider_policy::ProviderPolicy;
use crate::throttling::RateGate;
use crate::ProviderId;

pub use alphavantage::AlphaVantageAdapter;
pub use nominatim::NominatimAdapter;
pub use omdb::OmdbAdapter;
pub use open_meteo::OpenMeteoAdapter;

/// Guarded transport shared by the adapters.
#[derive(Clone)]
pub struct Upstream {
    provider: ProviderId,
    http_client: Arc<dyn HttpClient>,
    circuit_breaker: Arc<CircuitBreaker>,
    gate: Option<RateGate>,
    timeout_ms: u64,
}

impl Upstream {
    pub fn new(provider: ProviderId, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            provider,
            http_client,
            circuit_breaker: Arc::new(CircuitBreaker::for_provider(provider)),
            gate: ProviderPolicy::default_for(provider).map(|policy| RateGate::from_policy(&policy)),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_policy(mut self, policy: &ProviderPolicy) -> Self {
        self.gate = Some(RateGate::from_policy(policy));
        self
    }

    pub fn with_circuit_breaker(mut self, circuit_breaker: Arc<CircuitBreaker>) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    /// Sends `request` and returns the body of a 2xx response.
    pub async fn fetch(&self, request: HttpRequest) -> Result<String, SourceError> {
        self.circuit_breaker.admit()?;
        if let Some(gate) = &self.gate {
            gate.admit()?;
        }

        let request = request.with_timeout_ms(self.timeout_ms);
        debug!(provider = %self.provider, url = %request.redacted_url(), "upstream call");

        let response = self.http_client.execute(request).await.map_err(|error| {
            self.circuit_breaker.record_failure();
            SourceError::network(format!(
                "{} transport error: {}",
                self.provider,
                error.message()
            ))
        })?;

        if !response.is_success() {
            self.circuit_breaker.record_failure();
            return Err(SourceError::network(format!(
                "{} returned status {}",
                self.provider, response.status
            )));
        }

        self.circuit_breaker.record_success();
        Ok(response.body)
    }

    /// [`fetch`](Self::fetch) followed by JSON decoding.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<T, SourceError> {
        let body = self.fetch(request).await?;
        serde_json::from_str(&body).map_err(|error| {
            SourceError::internal(format!(
                "failed to parse {} response: {error}",
                self.provider
            ))
        })
    }
}

impl std::fmt::Debug for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upstream")
            .field("provider", &self.provider)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::http_client::{HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse};

    /// Replays canned responses in order and records every request.
    #[derive(Debug, Default)]
    pub struct ScriptedHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, body: &str) -> Self {
            self.push(Ok(HttpResponse::ok_json(body)))
        }

        pub fn respond_status(self, status: u16) -> Self {
            self.push(Ok(HttpResponse::with_status(status, "")))
        }

        pub fn fail(self, message: &str) -> Self {
            self.push(Err(HttpError::new(message)))
        }

        fn push(self, response: Result<HttpResponse, HttpError>) -> Self {
            self.responses
                .lock()
                .expect("responses lock")
                .push_back(response);
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().expect("requests lock").clone()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
            self.requests.lock().expect("requests lock").push(request);
            let response = self
                .responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::new("no scripted response")));
            Box::pin(async move { response })
        }
    }
}
