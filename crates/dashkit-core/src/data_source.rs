//! Data source traits and the adapter error taxonomy.
//!
//! Every remote collaborator sits behind one of the traits below so the
//! widget controllers can be driven by scripted sources in tests.
//!
//! | Trait | Provider | Produces |
//! |-------|----------|----------|
//! | [`QuoteSource`] | Alpha Vantage | close history, quote card |
//! | [`GeocodeSource`] | Nominatim | [`Location`] |
//! | [`ForecastSource`] | Open-Meteo | raw forecast payload |
//! | [`MovieSource`] | OMDb | [`Movie`] |
//!
//! Adapter failures never reach a renderer: controllers turn them into a
//! fallback lookup, an empty sentinel or a one-line message.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::adapters::open_meteo::ForecastPayload;
use crate::{GlobalQuote, Location, Movie, ProviderId, Query, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Rejected before any call was made.
    InvalidRequest,
    /// Transport failure, timeout or non-success HTTP status.
    Network,
    /// Structured error payload from the provider.
    Provider,
    /// Provider or local throttle reported the rate budget as exhausted.
    RateLimited,
    /// The key resolved to nothing.
    NoData,
    /// Response could not be decoded.
    Internal,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message, false)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Network, message, true)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Provider, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message, true)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NoData, message, false)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message, false)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Network => "source.network",
            SourceErrorKind::Provider => "source.provider",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Daily close history as returned by a quote provider, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyHistory {
    pub closes: Vec<f64>,
    /// Date of the newest close.
    pub latest_date: Option<String>,
}

/// Stock quote provider.
pub trait QuoteSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Most recent daily closes for `symbol` (at most seven), oldest first.
    fn daily_history<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, DailyHistory>;

    /// Latest quote card for `symbol`.
    fn global_quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, GlobalQuote>;
}

/// Place name to coordinates.
pub trait GeocodeSource: Send + Sync {
    fn geocode<'a>(&'a self, city: &'a Query) -> SourceFuture<'a, Location>;
}

/// Coordinates to forecast.
pub trait ForecastSource: Send + Sync {
    fn forecast<'a>(&'a self, latitude: f64, longitude: f64) -> SourceFuture<'a, ForecastPayload>;
}

/// Title to movie metadata.
pub trait MovieSource: Send + Sync {
    fn lookup<'a>(&'a self, title: &'a Query) -> SourceFuture<'a, Movie>;
}
