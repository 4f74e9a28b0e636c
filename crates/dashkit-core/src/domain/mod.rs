//! # Domain Models
//!
//! Value records produced by one request/response cycle and replaced
//! wholesale by the next.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Query`] | Trimmed, non-empty user input |
//! | [`Symbol`] | Uppercase ticker symbol |
//! | [`CatalogEntry`] | Static selectable stock |
//! | [`StockQuote`] | Price, change and close history |
//! | [`GlobalQuote`] | Single quote card (open/high/low/volume) |
//! | [`WeatherReport`] | Current conditions and five-day forecast |
//! | [`Movie`] | Movie metadata |
//! | [`Document`] | Offline search document |
//! | [`Track`] | Playlist entry |
//! | [`UtcDateTime`] | UTC timestamp |

mod models;
mod query;
mod symbol;
mod timestamp;

pub use models::{
    change_percent, CatalogEntry, CurrentConditions, DataOrigin, Document, ForecastDay,
    GlobalQuote, InstrumentKind, Location, Movie, Sky, StockQuote, Track, WeatherReport,
};
pub use query::Query;
pub use symbol::Symbol;
pub use timestamp::{day_label, UtcDateTime};
