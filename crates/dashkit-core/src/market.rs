//! Stock dashboard: catalog list, symbol selection with live/fallback
//! resolution, filtering, sorting and the price chart.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data_source::QuoteSource;
use crate::fallback::{sample_catalog, FallbackTable};
use crate::render::{
    draw_chart, format_fixed2, format_signed_percent, Line, Region, Render, Surface, Tone,
    ViewState,
};
use crate::sequence::{RequestSequencer, Trigger};
use crate::{CatalogEntry, DataOrigin, InstrumentKind, ProviderId, StockQuote, Symbol, ValidationError};

const PLACEHOLDER: &str = "-";
const LOADING: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    ChangeDesc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::ChangeDesc => "change-desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "change-desc" => Ok(Self::ChangeDesc),
            _ => Err(ValidationError::InvalidSortOrder {
                value: value.to_owned(),
            }),
        }
    }
}

/// One list row as displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub symbol: Symbol,
    pub name: String,
    pub price: String,
    pub change: String,
    pub tone: Tone,
}

#[derive(Debug)]
struct Board {
    visible: Vec<Symbol>,
    displayed: BTreeMap<Symbol, StockQuote>,
    loading: Option<Symbol>,
    selected: Option<Symbol>,
    view: ViewState<StockQuote>,
    region: Region,
}

/// Controller for one stock dashboard instance.
pub struct StockDashboard {
    catalog: Vec<CatalogEntry>,
    fallback: FallbackTable,
    live: Option<Arc<dyn QuoteSource>>,
    board: Mutex<Board>,
    sequencer: RequestSequencer,
    trigger: Trigger,
}

impl StockDashboard {
    pub fn new(
        catalog: Vec<CatalogEntry>,
        fallback: FallbackTable,
        live: Option<Arc<dyn QuoteSource>>,
    ) -> Self {
        let visible = catalog.iter().map(|entry| entry.symbol.clone()).collect();
        Self {
            catalog,
            fallback,
            live,
            board: Mutex::new(Board {
                visible,
                displayed: BTreeMap::new(),
                loading: None,
                selected: None,
                view: ViewState::Empty,
                region: Region::new(),
            }),
            sequencer: RequestSequencer::new(),
            trigger: Trigger::new(),
        }
    }

    /// Sample catalog and fallback table; `live` of `None` means live mode is off.
    pub fn with_samples(live: Option<Arc<dyn QuoteSource>>) -> Self {
        Self::new(sample_catalog(), FallbackTable::sample(), live)
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Resolves `symbol` and renders it, live first when eligible, then the
    /// fallback table, then the empty sentinel. Never fails.
    pub async fn select(&self, symbol: &Symbol) -> ViewState<StockQuote> {
        let ticket = self.sequencer.issue();
        let _guard = self.trigger.engage();
        {
            let mut board = self.board();
            board.loading = Some(symbol.clone());
            board.selected = Some(symbol.clone());
            board.view = ViewState::Loading;
            board.region.show(&ViewState::<StockQuote>::Loading);
        }

        let state = self.resolve(symbol).await;

        let mut board = self.board();
        if self.sequencer.commit(ticket) {
            match &state {
                ViewState::Value(quote) => {
                    board.displayed.insert(symbol.clone(), quote.clone());
                }
                _ => {
                    board.displayed.remove(symbol);
                }
            }
            board.loading = None;
            board.region.show(&state);
            board.view = state.clone();
        } else {
            debug!(%symbol, ticket = ticket.get(), "discarding superseded stock response");
        }
        state
    }

    async fn resolve(&self, symbol: &Symbol) -> ViewState<StockQuote> {
        if let Some(live) = self.live_source_for(symbol) {
            match live.daily_history(symbol).await {
                Ok(history) => {
                    match StockQuote::from_history(symbol.clone(), history.closes, history.latest_date) {
                        Some(quote) => return ViewState::Value(quote),
                        None => warn!(%symbol, "live history was empty; using sample data"),
                    }
                }
                Err(error) => {
                    warn!(%symbol, code = error.code(), %error, "live quote failed; using sample data");
                }
            }
        }

        match self.fallback.lookup(symbol) {
            Some(quote) => ViewState::Value(quote.clone()),
            None => ViewState::Empty,
        }
    }

    fn live_source_for(&self, symbol: &Symbol) -> Option<&Arc<dyn QuoteSource>> {
        let is_index = self
            .catalog
            .iter()
            .any(|entry| &entry.symbol == symbol && entry.kind == InstrumentKind::Index);
        if is_index {
            return None;
        }
        self.live.as_ref()
    }

    /// Narrows the list to entries whose symbol or name contains `query`,
    /// ignoring case. A blank query shows the whole catalog.
    pub fn filter(&self, query: &str) -> Vec<CatalogEntry> {
        let needle = query.trim().to_lowercase();
        let matches = self
            .catalog
            .iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.symbol.as_str().to_lowercase().contains(&needle)
                    || entry.name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect::<Vec<_>>();

        self.board().visible = matches.iter().map(|entry| entry.symbol.clone()).collect();
        matches
    }

    /// Reorders the whole catalog by displayed value, else sample value, else 0.
    pub fn sort(&self, order: SortOrder) -> Vec<CatalogEntry> {
        let mut board = self.board();
        let key = |entry: &CatalogEntry| -> (f64, f64) {
            board
                .displayed
                .get(&entry.symbol)
                .or_else(|| self.fallback.lookup(&entry.symbol))
                .map_or((0.0, 0.0), |quote| (quote.price, quote.change_percent))
        };

        let mut sorted = self.catalog.clone();
        match order {
            SortOrder::PriceAsc => sorted.sort_by(|a, b| key(a).0.total_cmp(&key(b).0)),
            SortOrder::PriceDesc => sorted.sort_by(|a, b| key(b).0.total_cmp(&key(a).0)),
            SortOrder::ChangeDesc => sorted.sort_by(|a, b| key(b).1.total_cmp(&key(a).1)),
        }

        board.visible = sorted.iter().map(|entry| entry.symbol.clone()).collect();
        sorted
    }

    /// Visible list rows with placeholders for unresolved symbols.
    pub fn rows(&self) -> Vec<StockRow> {
        let board = self.board();
        board
            .visible
            .iter()
            .map(|symbol| {
                let name = self
                    .catalog
                    .iter()
                    .find(|entry| &entry.symbol == symbol)
                    .map(|entry| entry.name.clone())
                    .unwrap_or_default();

                if board.loading.as_ref() == Some(symbol) {
                    return StockRow {
                        symbol: symbol.clone(),
                        name,
                        price: String::from(LOADING),
                        change: String::from(LOADING),
                        tone: Tone::Muted,
                    };
                }

                match board.displayed.get(symbol) {
                    Some(quote) => StockRow {
                        symbol: symbol.clone(),
                        name,
                        price: format_fixed2(quote.price),
                        change: format_signed_percent(quote.change_percent),
                        tone: Tone::from_sign(quote.change_percent),
                    },
                    None => StockRow {
                        symbol: symbol.clone(),
                        name,
                        price: String::from(PLACEHOLDER),
                        change: String::from(PLACEHOLDER),
                        tone: Tone::Muted,
                    },
                }
            })
            .collect()
    }

    pub fn view(&self) -> ViewState<StockQuote> {
        self.board().view.clone()
    }

    pub fn region(&self) -> Region {
        self.board().region.clone()
    }

    pub fn selected(&self) -> Option<Symbol> {
        self.board().selected.clone()
    }

    /// Plots the selected symbol's history (or the no-data message).
    pub fn draw_chart(&self, surface: &mut dyn Surface) {
        let board = self.board();
        let label = board
            .selected
            .as_ref()
            .map(Symbol::as_str)
            .unwrap_or_default();
        let history = board
            .view
            .value()
            .map(|quote| quote.history.as_slice())
            .unwrap_or_default();
        draw_chart(surface, history, label);
    }

    /// Where the current view came from.
    pub fn source(&self) -> ProviderId {
        match self.board().view.value().map(|quote| quote.origin) {
            Some(DataOrigin::Live) => ProviderId::Alphavantage,
            _ => ProviderId::Fallback,
        }
    }

    fn board(&self) -> std::sync::MutexGuard<'_, Board> {
        self.board.lock().expect("stock board lock poisoned")
    }
}

impl std::fmt::Debug for StockDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockDashboard")
            .field("catalog", &self.catalog.len())
            .field("live", &self.live.as_ref().map(|source| source.id()))
            .finish_non_exhaustive()
    }
}

impl Render for StockQuote {
    fn render(&self) -> Vec<Line> {
        let source = match (self.origin, &self.as_of) {
            (DataOrigin::Live, Some(as_of)) => format!("Source: live, as of {as_of}"),
            (DataOrigin::Live, None) => String::from("Source: live"),
            (DataOrigin::Fallback, _) => String::from("Source: sample data"),
        };

        vec![
            Line::plain(self.symbol.as_str()),
            Line::plain(format!("Price: {}", format_fixed2(self.price))),
            Line::toned(
                format!("Change: {}", format_signed_percent(self.change_percent)),
                Tone::from_sign(self.change_percent),
            ),
            Line::muted(source),
        ]
    }
}
