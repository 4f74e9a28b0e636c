//! Scripted transports and sources shared by the behavior tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use dashkit_core::adapters::open_meteo::{CurrentWeather, ForecastPayload, HourlySeries};
use dashkit_core::data_source::{
    DailyHistory, ForecastSource, GeocodeSource, MovieSource, QuoteSource, SourceError,
    SourceFuture,
};
use dashkit_core::http_client::{HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse};
use dashkit_core::{GlobalQuote, Location, Movie, ProviderId, Query, Symbol};

/// Transport that replays queued responses in order and records requests.
#[derive(Default)]
pub struct ScriptedHttp {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttp {
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

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    fn push(self, response: Result<HttpResponse, HttpError>) -> Self {
        self.responses.lock().expect("responses lock").push_back(response);
        self
    }
}

impl HttpClient for ScriptedHttp {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            self.responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::new("no scripted response")))
        })
    }
}

/// Quote source with per-symbol replies and an optional delay.
#[derive(Default)]
pub struct ScriptedQuotes {
    histories: HashMap<String, (Duration, Result<Vec<f64>, SourceError>)>,
    quotes: HashMap<String, Result<GlobalQuote, SourceError>>,
    calls: AtomicUsize,
}

impl ScriptedQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(mut self, symbol: &str, closes: &[f64]) -> Self {
        self.histories
            .insert(symbol.to_owned(), (Duration::ZERO, Ok(closes.to_vec())));
        self
    }

    pub fn delayed_history(mut self, symbol: &str, delay: Duration, closes: &[f64]) -> Self {
        self.histories
            .insert(symbol.to_owned(), (delay, Ok(closes.to_vec())));
        self
    }

    pub fn failing_history(mut self, symbol: &str, error: SourceError) -> Self {
        self.histories
            .insert(symbol.to_owned(), (Duration::ZERO, Err(error)));
        self
    }

    pub fn quote(mut self, quote: GlobalQuote) -> Self {
        self.quotes.insert(quote.symbol.to_string(), Ok(quote));
        self
    }

    pub fn failing_quote(mut self, symbol: &str, error: SourceError) -> Self {
        self.quotes.insert(symbol.to_owned(), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuoteSource for ScriptedQuotes {
    fn id(&self) -> ProviderId {
        ProviderId::Alphavantage
    }

    fn daily_history<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, DailyHistory> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, reply) = self
                .histories
                .get(symbol.as_str())
                .cloned()
                .unwrap_or((Duration::ZERO, Err(SourceError::no_data("not scripted"))));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            reply.map(|closes| DailyHistory {
                closes,
                latest_date: Some(String::from("2025-01-06")),
            })
        })
    }

    fn global_quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, GlobalQuote> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.quotes
                .get(symbol.as_str())
                .cloned()
                .unwrap_or_else(|| Err(SourceError::no_data("not scripted")))
        })
    }
}

/// Geocoder that resolves every city to fixed coordinates unless told to fail.
pub struct ScriptedGeocoder {
    failure: Option<SourceError>,
    calls: AtomicUsize,
}

impl ScriptedGeocoder {
    pub fn resolving() -> Self {
        Self {
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            failure: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeocodeSource for ScriptedGeocoder {
    fn geocode<'a>(&'a self, city: &'a Query) -> SourceFuture<'a, Location> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = &self.failure {
                return Err(error.clone());
            }
            Ok(Location {
                name: city.to_string(),
                latitude: 48.85,
                longitude: 2.35,
            })
        })
    }
}

/// Forecaster that replays queued replies; once the queue is empty the last
/// reply repeats.
pub struct ScriptedForecaster {
    replies: Mutex<VecDeque<Result<ForecastPayload, SourceError>>>,
    last: Mutex<Option<Result<ForecastPayload, SourceError>>>,
    calls: AtomicUsize,
}

impl ScriptedForecaster {
    pub fn new(replies: Vec<Result<ForecastPayload, SourceError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ForecastSource for ScriptedForecaster {
    fn forecast<'a>(&'a self, _latitude: f64, _longitude: f64) -> SourceFuture<'a, ForecastPayload> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.replies.lock().expect("replies lock").pop_front();
            let mut last = self.last.lock().expect("last lock");
            if let Some(reply) = next {
                *last = Some(reply);
            }
            last.clone()
                .unwrap_or_else(|| Err(SourceError::no_data("not scripted")))
        })
    }
}

/// Movie source with one canned reply.
pub struct ScriptedMovies {
    reply: Result<Movie, SourceError>,
}

impl ScriptedMovies {
    pub fn found(movie: Movie) -> Self {
        Self { reply: Ok(movie) }
    }

    pub fn failing(error: SourceError) -> Self {
        Self { reply: Err(error) }
    }
}

impl MovieSource for ScriptedMovies {
    fn lookup<'a>(&'a self, _title: &'a Query) -> SourceFuture<'a, Movie> {
        Box::pin(async move { self.reply.clone() })
    }
}

/// Two days of hourly samples at a constant temperature.
pub fn forecast_at(temperature: f64) -> ForecastPayload {
    let mut hourly = HourlySeries::default();
    for day in ["2025-01-06", "2025-01-07"] {
        for hour in 0..24 {
            hourly.time.push(format!("{day}T{hour:02}:00"));
            hourly.temperature_2m.push(Some(temperature));
            hourly.relativehumidity_2m.push(Some(55.0));
            hourly.windspeed_10m.push(Some(12.0));
            hourly.weathercode.push(Some(0));
        }
    }
    ForecastPayload {
        current_weather: Some(CurrentWeather {
            temperature: Some(temperature),
            windspeed: Some(12.0),
            weathercode: Some(0),
            time: Some(String::from("2025-01-06T12:00")),
        }),
        hourly,
    }
}

pub fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}
