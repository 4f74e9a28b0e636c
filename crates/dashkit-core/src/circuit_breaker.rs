use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::data_source::SourceError;
use crate::ProviderId;

/// Breaker position for one upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub open_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            open_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct Tripwire {
    state: CircuitState,
    failures: u32,
    opened_at: Option<Instant>,
}

/// Stops calling a provider after repeated transport failures so the widget
/// falls back immediately instead of waiting on a dead endpoint.
#[derive(Debug)]
pub struct CircuitBreaker {
    provider: ProviderId,
    config: CircuitBreakerConfig,
    tripwire: Mutex<Tripwire>,
}

impl CircuitBreaker {
    pub fn new(provider: ProviderId, config: CircuitBreakerConfig) -> Self {
        Self {
            provider,
            config,
            tripwire: Mutex::new(Tripwire {
                state: CircuitState::Closed,
                failures: 0,
                opened_at: None,
            }),
        }
    }

    pub fn for_provider(provider: ProviderId) -> Self {
        Self::new(provider, CircuitBreakerConfig::default())
    }

    /// Admits a call, moving an expired open breaker to half-open.
    pub fn admit(&self) -> Result<(), SourceError> {
        let mut tripwire = self.tripwire.lock().expect("circuit breaker lock poisoned");
        match tripwire.state {
            CircuitState::Closed | CircuitState::HalfOpen => Ok(()),
            CircuitState::Open => {
                let expired = tripwire
                    .opened_at
                    .is_some_and(|opened_at| opened_at.elapsed() >= self.config.open_timeout);
                if expired {
                    tripwire.state = CircuitState::HalfOpen;
                    tripwire.opened_at = None;
                    Ok(())
                } else {
                    Err(SourceError::network(format!(
                        "{} circuit breaker is open; skipping upstream call",
                        self.provider
                    )))
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut tripwire = self.tripwire.lock().expect("circuit breaker lock poisoned");
        tripwire.state = CircuitState::Closed;
        tripwire.failures = 0;
        tripwire.opened_at = None;
    }

    pub fn record_failure(&self) {
        let mut tripwire = self.tripwire.lock().expect("circuit breaker lock poisoned");
        tripwire.failures = tripwire.failures.saturating_add(1);

        let trips = tripwire.state == CircuitState::HalfOpen
            || tripwire.failures >= self.config.failure_threshold;
        if trips && tripwire.state != CircuitState::Open {
            warn!(provider = %self.provider, failures = tripwire.failures, "circuit opened");
        }
        if trips {
            tripwire.state = CircuitState::Open;
            tripwire.opened_at = Some(Instant::now());
        }
    }

    pub fn state(&self) -> CircuitState {
        self.tripwire.lock().expect("circuit breaker lock poisoned").state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.tripwire
            .lock()
            .expect("circuit breaker lock poisoned")
            .failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;

    #[test]
    fn opens_after_threshold_failures() {
        let breaker = CircuitBreaker::new(
            ProviderId::OpenMeteo,
            CircuitBreakerConfig {
                failure_threshold: 2,
                open_timeout: Duration::from_secs(60),
            },
        );

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        let error = breaker.admit().expect_err("open breaker rejects");
        assert_eq!(error.kind(), SourceErrorKind::Network);
        assert!(error.message().starts_with("open_meteo"));
    }

    #[test]
    fn half_open_probe_closes_on_success() {
        let breaker = CircuitBreaker::new(
            ProviderId::Omdb,
            CircuitBreakerConfig {
                failure_threshold: 1,
                open_timeout: Duration::from_millis(1),
            },
        );

        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(3));

        assert!(breaker.admit().is_ok());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.consecutive_failures(), 0);
    }

    #[test]
    fn half_open_failure_reopens() {
        let breaker = CircuitBreaker::new(
            ProviderId::Nominatim,
            CircuitBreakerConfig {
                failure_threshold: 5,
                open_timeout: Duration::from_millis(1),
            },
        );

        for _ in 0..5 {
            breaker.record_failure();
        }
        std::thread::sleep(Duration::from_millis(3));
        assert!(breaker.admit().is_ok());

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
    }
}
