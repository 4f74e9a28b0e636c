//! # dashkit Core
//!
//! Widget controllers, data source adapters and renderers for the dashkit
//! personal dashboard.
//!
//! ## Overview
//!
//! Each widget follows the same request/response cycle:
//!
//! 1. validate input (empty input never reaches the network)
//! 2. issue a sequencing ticket and disable the trigger
//! 3. show the loading state in the widget's region
//! 4. await the data source
//! 5. apply the result only if the ticket is still the newest one
//!
//! Upstream calls pass through a per-provider circuit breaker and rate gate.
//! The stock widgets degrade to bundled sample data when the live source fails.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpha Vantage, Nominatim, Open-Meteo and OMDb adapters |
//! | [`circuit_breaker`] | Per-provider circuit breaker |
//! | [`data_source`] | Source traits and error taxonomy |
//! | [`domain`] | Value records (quotes, weather, movies, tracks) |
//! | [`envelope`] | JSON output envelope |
//! | [`error`] | Core error types |
//! | [`fallback`] | Bundled sample data |
//! | [`http_client`] | HTTP client abstraction |
//! | [`market`] | Stock dashboard (catalog, chart, sort) |
//! | [`movie`] | Movie finder |
//! | [`player`] | Music player session |
//! | [`provider_policy`] | Per-provider request budgets |
//! | [`quote_card`] | Single quote card with a persisted slot |
//! | [`refresh`] | Periodic refresh timer |
//! | [`render`] | Regions, lines, number formatting and charts |
//! | [`sequence`] | Latest-request-wins sequencing |
//! | [`source`] | Provider identifiers |
//! | [`throttling`] | Rate gates |
//! | [`todo`] | Persisted todo list |
//! | [`voice`] | Voice-driven document search |
//! | [`weather`] | Weather widget |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dashkit_core::{AlphaVantageAdapter, ReqwestHttpClient, StockDashboard, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = Arc::new(ReqwestHttpClient::new());
//!     let live = Arc::new(AlphaVantageAdapter::new(http, "demo"));
//!     let dashboard = StockDashboard::with_samples(Some(live));
//!
//!     let view = dashboard.select(&Symbol::parse("AAPL")?).await;
//!     if let Some(quote) = view.value() {
//!         println!("AAPL {:.2}", quote.price);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod circuit_breaker;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod http_client;
pub mod market;
pub mod movie;
pub mod player;
pub mod provider_policy;
pub mod quote_card;
pub mod refresh;
pub mod render;
pub mod sequence;
pub mod source;
pub mod throttling;
pub mod todo;
pub mod voice;
pub mod weather;

pub use adapters::{AlphaVantageAdapter, NominatimAdapter, OmdbAdapter, OpenMeteoAdapter};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use data_source::{
    DailyHistory, ForecastSource, GeocodeSource, MovieSource, QuoteSource, SourceError,
    SourceErrorKind, SourceFuture,
};
pub use domain::*;
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{CoreError, ValidationError};
pub use fallback::{FallbackTable, SampleQuotes};
pub use http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use market::{SortOrder, StockDashboard, StockRow};
pub use movie::MovieFinder;
pub use player::{AudioOutput, NullOutput, PlayerSession, PlayerStatus};
pub use provider_policy::ProviderPolicy;
pub use quote_card::QuoteCard;
pub use refresh::RefreshTimer;
pub use render::{Line, Region, Render, Tone, ViewState};
pub use sequence::{RequestSequencer, Ticket, Trigger, TriggerGuard};
pub use source::ProviderId;
pub use throttling::RateGate;
pub use todo::{Todo, TodoList};
pub use voice::{
    DocumentIndex, Recognizer, SearchResults, SpeechErrorKind, SpeechEvent, VoiceError,
    VoiceSearch,
};
pub use weather::WeatherWidget;
