//! Bundled sample data used when live mode is off or a live call fails.

use std::collections::BTreeMap;

use crate::{
    CatalogEntry, DataOrigin, Document, GlobalQuote, InstrumentKind, StockQuote, Symbol, Track,
};

/// Immutable symbol-to-quote table.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    quotes: BTreeMap<Symbol, StockQuote>,
}

impl FallbackTable {
    pub fn new(quotes: impl IntoIterator<Item = StockQuote>) -> Self {
        Self {
            quotes: quotes
                .into_iter()
                .map(|quote| {
                    (
                        quote.symbol.clone(),
                        StockQuote {
                            origin: DataOrigin::Fallback,
                            ..quote
                        },
                    )
                })
                .collect(),
        }
    }

    /// Sample stocks shipped with the dashboard.
    pub fn sample() -> Self {
        let rows: [(&str, f64, f64, &[f64]); 6] = [
            ("AAPL", 174.12, -0.34, &[165.0, 168.0, 170.0, 172.0, 171.0, 173.0, 174.0]),
            ("MSFT", 348.54, 0.42, &[330.0, 335.0, 340.0, 345.0, 346.0, 347.0, 348.0]),
            ("GOOGL", 139.18, 1.12, &[128.0, 130.0, 132.0, 135.0, 136.0, 137.0, 139.0]),
            ("TSLA", 247.33, -2.15, &[260.0, 255.0, 252.0, 250.0, 249.0, 248.0, 247.0]),
            ("INFY", 41.22, 0.87, &[38.0, 39.0, 40.0, 40.5, 40.8, 41.0, 41.2]),
            (
                "NIFTY",
                21950.0,
                0.15,
                &[21600.0, 21700.0, 21800.0, 21900.0, 21920.0, 21930.0, 21950.0],
            ),
        ];

        Self::new(rows.into_iter().filter_map(|(symbol, price, change, history)| {
            Some(StockQuote {
                symbol: Symbol::parse(symbol).ok()?,
                price,
                change_percent: change,
                history: history.to_vec(),
                as_of: None,
                origin: DataOrigin::Fallback,
            })
        }))
    }

    pub fn lookup(&self, symbol: &Symbol) -> Option<&StockQuote> {
        self.quotes.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockQuote> {
        self.quotes.values()
    }
}

/// Selectable stocks, in display order.
pub fn sample_catalog() -> Vec<CatalogEntry> {
    [
        ("AAPL", "Apple Inc.", InstrumentKind::Equity),
        ("MSFT", "Microsoft Corp.", InstrumentKind::Equity),
        ("GOOGL", "Alphabet Inc.", InstrumentKind::Equity),
        ("TSLA", "Tesla, Inc.", InstrumentKind::Equity),
        ("INFY", "Infosys Ltd", InstrumentKind::Equity),
        // The quote provider does not serve this index.
        ("NIFTY", "Nifty Index", InstrumentKind::Index),
    ]
    .into_iter()
    .filter_map(|(symbol, name, kind)| {
        Some(CatalogEntry {
            symbol: Symbol::parse(symbol).ok()?,
            name: name.to_owned(),
            kind,
        })
    })
    .collect()
}

/// Canned quote cards for the single-quote widget.
#[derive(Debug, Clone)]
pub struct SampleQuotes {
    quotes: BTreeMap<Symbol, GlobalQuote>,
}

impl SampleQuotes {
    pub fn sample() -> Self {
        let rows = [
            ("AAPL", "Apple Inc.", 192.32, -1.23, -0.64),
            ("MSFT", "Microsoft Corporation", 420.15, 3.45, 0.83),
            ("TSLA", "Tesla Inc.", 160.75, -5.1, -3.07),
            ("GOOG", "Alphabet Inc.", 140.22, 1.05, 0.75),
        ];

        let quotes = rows
            .into_iter()
            .filter_map(|(symbol, name, price, change, change_percent)| {
                let symbol = Symbol::parse(symbol).ok()?;
                Some((
                    symbol.clone(),
                    GlobalQuote {
                        symbol,
                        name: Some(name.to_owned()),
                        open: price,
                        high: price,
                        low: price,
                        price,
                        volume: 0,
                        latest_trading_day: None,
                        previous_close: price - change,
                        change,
                        change_percent,
                        origin: DataOrigin::Fallback,
                    },
                ))
            })
            .collect();

        Self { quotes }
    }

    pub fn lookup(&self, symbol: &Symbol) -> Option<&GlobalQuote> {
        self.quotes.get(symbol)
    }
}

/// Offline document index contents.
pub fn sample_documents() -> Vec<Document> {
    [
        (
            1,
            "How to use Web Speech API",
            "Guide to using SpeechRecognition in browsers.",
        ),
        (2, "Stock Market Basics", "Understanding prices and indicators."),
        (3, "Building Dashboards", "Designing responsive dashboard UIs."),
        (4, "Voice Interfaces", "Principles for voice-first UX."),
    ]
    .into_iter()
    .map(|(id, title, body)| Document {
        id,
        title: title.to_owned(),
        body: body.to_owned(),
    })
    .collect()
}

/// Default playlist.
pub fn sample_playlist() -> Vec<Track> {
    [
        ("takthom", "music/track1.mp3", "covers/track1.jpg", "04:14"),
        ("Calm Breeze", "music/track2.mp3", "covers/track2.jpg", "02:53"),
        (
            "The Return of Gambheera",
            "music/track3.mp3",
            "covers/track3.jpg",
            "05:26",
        ),
        ("Late Night Drive", "music/track4.mp3", "covers/track4.jpg", "04:39"),
        ("Sunset Acoustic", "music/track5.mp3", "covers/track5.jpg", "05:53"),
    ]
    .into_iter()
    .map(|(title, source, cover, duration)| Track {
        title: title.to_owned(),
        artist: String::from("Sample Artist"),
        source: source.to_owned(),
        cover: cover.to_owned(),
        duration_text: duration.to_owned(),
    })
    .collect()
}
