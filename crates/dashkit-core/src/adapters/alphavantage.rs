use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::Upstream;
use crate::data_source::{DailyHistory, QuoteSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider_policy::ProviderPolicy;
use crate::{DataOrigin, GlobalQuote, ProviderId, Symbol};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const HISTORY_POINTS: usize = 7;

/// Alpha Vantage daily series and global quote adapter.
#[derive(Debug, Clone)]
pub struct AlphaVantageAdapter {
    upstream: Upstream,
    api_key: String,
}

impl AlphaVantageAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            upstream: Upstream::new(ProviderId::Alphavantage, http_client),
            api_key: api_key.into(),
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

    fn request(&self, function: &str, symbol: &Symbol) -> HttpRequest {
        HttpRequest::get(BASE_URL)
            .with_query("function", function)
            .with_query("symbol", symbol.as_str())
            .with_query("apikey", &self.api_key)
    }

    async fn fetch_daily(&self, symbol: &Symbol) -> Result<DailyHistory, SourceError> {
        let request = self
            .request("TIME_SERIES_DAILY", symbol)
            .with_query("outputsize", "compact");
        let response: DailySeriesResponse = self.upstream.fetch_json(request).await?;
        response.notices.check()?;

        let series = response.series.ok_or_else(|| {
            SourceError::no_data(format!("no daily series for {symbol} in alphavantage response"))
        })?;

        // Date keys sort chronologically, so the map tail is the newest data.
        let latest_date = series.keys().next_back().cloned();
        let closes = series
            .values()
            .rev()
            .take(HISTORY_POINTS)
            .rev()
            .map(|bar| parse_number("4. close", &bar.close))
            .collect::<Result<Vec<_>, _>>()?;

        if closes.is_empty() {
            return Err(SourceError::no_data(format!(
                "alphavantage daily series for {symbol} is empty"
            )));
        }

        Ok(DailyHistory {
            closes,
            latest_date,
        })
    }

    async fn fetch_global_quote(&self, symbol: &Symbol) -> Result<GlobalQuote, SourceError> {
        let request = self.request("GLOBAL_QUOTE", symbol);
        let response: GlobalQuoteResponse = self.upstream.fetch_json(request).await?;
        response.notices.check()?;

        let Some(payload) = response.quote.filter(|quote| quote.price.is_some()) else {
            return Err(SourceError::no_data(format!(
                "no global quote for {symbol} in alphavantage response"
            )));
        };
        payload.normalize(symbol.clone())
    }
}

impl QuoteSource for AlphaVantageAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Alphavantage
    }

    fn daily_history<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, DailyHistory> {
        Box::pin(self.fetch_daily(symbol))
    }

    fn global_quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, GlobalQuote> {
        Box::pin(self.fetch_global_quote(symbol))
    }
}

/// Failure fields Alpha Vantage returns with a 200 status.
#[derive(Debug, Default, Deserialize)]
struct Notices {
    #[serde(rename = "Error Message", default)]
    error_message: Option<String>,
    #[serde(rename = "Note", default)]
    note: Option<String>,
    #[serde(rename = "Information", default)]
    information: Option<String>,
}

impl Notices {
    fn check(&self) -> Result<(), SourceError> {
        if let Some(message) = &self.error_message {
            return Err(SourceError::provider(message.clone()));
        }
        if let Some(message) = self.note.as_ref().or(self.information.as_ref()) {
            return Err(SourceError::rate_limited(message.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(flatten)]
    notices: Notices,
    #[serde(rename = "Time Series (Daily)", default)]
    series: Option<BTreeMap<String, DailyBar>>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(flatten)]
    notices: Notices,
    #[serde(rename = "Global Quote", default)]
    quote: Option<GlobalQuotePayload>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuotePayload {
    #[serde(rename = "02. open", default)]
    open: Option<String>,
    #[serde(rename = "03. high", default)]
    high: Option<String>,
    #[serde(rename = "04. low", default)]
    low: Option<String>,
    #[serde(rename = "05. price", default)]
    price: Option<String>,
    #[serde(rename = "06. volume", default)]
    volume: Option<String>,
    #[serde(rename = "07. latest trading day", default)]
    latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close", default)]
    previous_close: Option<String>,
    #[serde(rename = "09. change", default)]
    change: Option<String>,
    #[serde(rename = "10. change percent", default)]
    change_percent: Option<String>,
}

impl GlobalQuotePayload {
    fn normalize(self, symbol: Symbol) -> Result<GlobalQuote, SourceError> {
        let number = |field: &'static str, value: Option<String>| -> Result<f64, SourceError> {
            value.map_or(Ok(0.0), |value| parse_number(field, &value))
        };

        let volume = match self.volume {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                SourceError::internal(format!("alphavantage field '06. volume' is not an integer: {value}"))
            })?,
            None => 0,
        };

        Ok(GlobalQuote {
            symbol,
            name: None,
            open: number("02. open", self.open)?,
            high: number("03. high", self.high)?,
            low: number("04. low", self.low)?,
            price: number("05. price", self.price)?,
            volume,
            latest_trading_day: self.latest_trading_day,
            previous_close: number("08. previous close", self.previous_close)?,
            change: number("09. change", self.change)?,
            change_percent: number(
                "10. change percent",
                self.change_percent
                    .map(|value| value.trim().trim_end_matches('%').to_owned()),
            )?,
            origin: DataOrigin::Live,
        })
    }
}

fn parse_number(field: &str, value: &str) -> Result<f64, SourceError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| {
            SourceError::internal(format!("alphavantage field '{field}' is not a number: {value}"))
        })
}
