//! Single-quote card that remembers the last successful quote across sessions.

use std::sync::{Arc, Mutex};

use dashkit_store::{Slot, SlotStore};
use tracing::{debug, warn};

use crate::data_source::QuoteSource;
use crate::fallback::SampleQuotes;
use crate::render::{
    format_fixed2, format_signed_percent, format_volume, Line, Region, Render, Tone, ViewState,
};
use crate::sequence::{RequestSequencer, Trigger};
use crate::{CoreError, DataOrigin, GlobalQuote, Symbol};

pub const LAST_QUOTE_SLOT: &str = "last-stock-quote";
pub const NO_DATA_MESSAGE: &str = "No data found. Try another symbol.";

#[derive(Debug)]
struct Card {
    symbol_input: String,
    view: ViewState<GlobalQuote>,
    region: Region,
}

pub struct QuoteCard {
    live: Option<Arc<dyn QuoteSource>>,
    samples: SampleQuotes,
    slot: Slot<GlobalQuote>,
    card: Mutex<Card>,
    sequencer: RequestSequencer,
    trigger: Trigger,
}

impl QuoteCard {
    /// Restores the persisted quote, if any. A corrupt slot starts empty.
    pub fn open(store: SlotStore, live: Option<Arc<dyn QuoteSource>>) -> Self {
        let slot: Slot<GlobalQuote> = Slot::new(store, LAST_QUOTE_SLOT);
        let (symbol_input, view) = match slot.load() {
            Some(quote) => {
                debug!(symbol = %quote.symbol, "restored last quote");
                (quote.symbol.to_string(), ViewState::Value(quote))
            }
            None => (String::new(), ViewState::Empty),
        };

        let mut region = Region::new();
        region.show(&view);

        Self {
            live,
            samples: SampleQuotes::sample(),
            slot,
            card: Mutex::new(Card {
                symbol_input,
                view,
                region,
            }),
            sequencer: RequestSequencer::new(),
            trigger: Trigger::new(),
        }
    }

    /// Looks up `raw` and renders the card. Blank input is a no-op and returns
    /// `Ok(None)`. A successful quote overwrites the persisted slot.
    pub async fn fetch(&self, raw: &str) -> Result<Option<ViewState<GlobalQuote>>, CoreError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let symbol = Symbol::parse(raw)?;

        let ticket = self.sequencer.issue();
        let _guard = self.trigger.engage();
        {
            let mut card = self.card();
            card.symbol_input = symbol.to_string();
            card.region.show(&ViewState::<GlobalQuote>::Loading);
            card.view = ViewState::Loading;
        }

        let state = match self.resolve(&symbol).await {
            Some(quote) => ViewState::Value(quote),
            None => ViewState::Failed(String::from(NO_DATA_MESSAGE)),
        };

        if !self.sequencer.commit(ticket) {
            debug!(%symbol, "discarding superseded quote response");
            return Ok(Some(state));
        }

        {
            let mut card = self.card();
            card.region.show(&state);
            card.view = state.clone();
        }
        if let ViewState::Value(quote) = &state {
            self.slot.save(quote)?;
        }
        Ok(Some(state))
    }

    async fn resolve(&self, symbol: &Symbol) -> Option<GlobalQuote> {
        if let Some(live) = &self.live {
            match live.global_quote(symbol).await {
                Ok(quote) => return Some(quote),
                Err(error) => {
                    warn!(%symbol, code = error.code(), %error, "live quote failed; trying sample quotes");
                }
            }
        }
        self.samples.lookup(symbol).cloned()
    }

    pub fn view(&self) -> ViewState<GlobalQuote> {
        self.card().view.clone()
    }

    pub fn region(&self) -> Region {
        self.card().region.clone()
    }

    pub fn symbol_input(&self) -> String {
        self.card().symbol_input.clone()
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    fn card(&self) -> std::sync::MutexGuard<'_, Card> {
        self.card.lock().expect("quote card lock poisoned")
    }
}

impl std::fmt::Debug for QuoteCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteCard")
            .field("slot", &self.slot)
            .field("live", &self.live.as_ref().map(|source| source.id()))
            .finish_non_exhaustive()
    }
}

impl Render for GlobalQuote {
    fn render(&self) -> Vec<Line> {
        let tone = Tone::from_sign(self.change);
        let arrow = if tone == Tone::Negative { "▼" } else { "▲" };
        let badge = match self.origin {
            DataOrigin::Live => "Live Quote",
            DataOrigin::Fallback => "Sample Quote",
        };

        let mut lines = vec![
            Line::muted(badge),
            Line::plain(match &self.name {
                Some(name) => format!("{} - {name}", self.symbol),
                None => format!("Symbol: {}", self.symbol),
            }),
            Line::plain(format!("${}", format_fixed2(self.price))),
            Line::toned(
                format!(
                    "{arrow} {} ({})",
                    format_fixed2(self.change),
                    format_signed_percent(self.change_percent)
                ),
                tone,
            ),
            Line::plain(format!(
                "Open ${}  High ${}  Low ${}",
                format_fixed2(self.open),
                format_fixed2(self.high),
                format_fixed2(self.low)
            )),
            Line::plain(format!("Volume {}", format_volume(self.volume))),
        ];
        if let Some(day) = &self.latest_trading_day {
            lines.push(Line::muted(format!("Latest trading day {day}")));
        }
        lines
    }
}
