use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime};

const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/300x450?text=No+Image";

/// Instrument class in the stock catalog. Index symbols are not served by the
/// quote provider and always resolve from the fallback table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    Equity,
    Index,
}

/// Selectable stock, independent of any live data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub symbol: Symbol,
    pub name: String,
    pub kind: InstrumentKind,
}

/// Whether a quote came from the live provider or the bundled table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Live,
    Fallback,
}

/// Normalized dashboard quote: latest price, day-over-day change and a short
/// close history (oldest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: Symbol,
    pub price: f64,
    pub change_percent: f64,
    pub history: Vec<f64>,
    /// Latest series date reported by the provider (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<String>,
    pub origin: DataOrigin,
}

impl StockQuote {
    /// Builds a live quote from a close series; `None` when the series is empty.
    pub fn from_history(symbol: Symbol, history: Vec<f64>, as_of: Option<String>) -> Option<Self> {
        let price = *history.last()?;
        Some(Self {
            symbol,
            price,
            change_percent: change_percent(&history),
            history,
            as_of,
            origin: DataOrigin::Live,
        })
    }
}

/// Latest-vs-previous percentage change of a series.
///
/// With fewer than two points the previous value is the latest one, giving 0.
/// A zero previous close also yields 0 rather than an infinite change.
pub fn change_percent(history: &[f64]) -> f64 {
    let Some(&latest) = history.last() else {
        return 0.0;
    };
    let previous = history
        .len()
        .checked_sub(2)
        .and_then(|index| history.get(index).copied())
        .unwrap_or(latest);

    if previous == 0.0 {
        return 0.0;
    }
    (latest - previous) / previous * 100.0
}

/// Single-symbol quote card (open/high/low/volume), the value kept in the
/// persistence slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalQuote {
    pub symbol: Symbol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub price: f64,
    pub volume: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_trading_day: Option<String>,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub origin: DataOrigin,
}

/// Geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions; every field is optional because the provider may omit it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub humidity: Option<f64>,
}

/// Coarse sky description derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sky {
    Clear,
    Cloudy,
    Precip,
    Unknown,
}

impl Sky {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Clear,
            Some(code) if code <= 3 => Self::Cloudy,
            Some(_) => Self::Precip,
            None => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Precip => "Precip",
            Self::Unknown => "-",
        }
    }
}

/// One forecast card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    /// Mean of the hourly temperatures, rounded.
    pub temperature: i64,
    pub sky: Sky,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
    pub observed_at: UtcDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl Movie {
    pub fn poster_url(&self) -> &str {
        self.poster.as_deref().unwrap_or(POSTER_PLACEHOLDER)
    }

    pub fn rating_label(&self) -> String {
        match &self.rating {
            Some(rating) => format!("IMDb: {rating}/10"),
            None => String::from("IMDb rating: N/A"),
        }
    }

    pub fn trailer_url(&self) -> String {
        format!(
            "https://www.youtube.com/results?search_query={}",
            urlencoding::encode(&format!("{} trailer", self.title))
        )
    }
}

/// Entry in the offline document index used by text and voice search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: u32,
    pub title: String,
    pub body: String,
}

/// Playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub source: String,
    pub cover: String,
    /// Catalog duration shown before playback reports the real one.
    pub duration_text: String,
}
