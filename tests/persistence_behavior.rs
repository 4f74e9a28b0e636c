//! Behavior-driven tests for state that survives between sessions: the quote
//! card's last quote and the to-do list.

mod support;

use std::fs;
use std::sync::Arc;

use dashkit_core::quote_card::{LAST_QUOTE_SLOT, NO_DATA_MESSAGE};
use dashkit_core::todo::TODO_SLOT;
use dashkit_core::{
    CoreError, DataOrigin, GlobalQuote, QuoteCard, SourceError, TodoList, ValidationError,
    ViewState,
};
use dashkit_store::SlotStore;
use tempfile::tempdir;

use support::{symbol, ScriptedQuotes};

fn live_quote(raw: &str, price: f64) -> GlobalQuote {
    GlobalQuote {
        symbol: symbol(raw),
        name: None,
        open: price - 1.0,
        high: price + 1.0,
        low: price - 2.0,
        price,
        volume: 1_234_567,
        latest_trading_day: Some(String::from("2025-01-06")),
        previous_close: price - 0.5,
        change: 0.5,
        change_percent: 0.25,
        origin: DataOrigin::Live,
    }
}

// =============================================================================
// Quote card
// =============================================================================

#[tokio::test]
async fn when_quote_succeeds_a_fresh_session_restores_it() {
    // Given: A quote card backed by a temporary data directory
    let dir = tempdir().expect("tempdir");
    let live = Arc::new(ScriptedQuotes::new().quote(live_quote("NVDA", 880.0)));
    let card = QuoteCard::open(SlotStore::open(dir.path()).expect("store"), Some(live));

    // When: The user fetches a quote with lowercase input
    let view = card.fetch("nvda").await.expect("fetch").expect("not blank");
    assert_eq!(view.value().map(|quote| quote.price), Some(880.0));
    let rendered = card.region().to_text();
    drop(card);

    // Then: A new session shows the same quote and symbol without any call
    let offline = QuoteCard::open(SlotStore::open(dir.path()).expect("store"), None);
    assert_eq!(offline.symbol_input(), "NVDA");
    assert_eq!(offline.view().value().map(|quote| quote.volume), Some(1_234_567));
    assert_eq!(offline.region().to_text(), rendered);
    assert!(rendered.contains("Volume 1,234,567"));
}

#[tokio::test]
async fn when_live_quote_fails_sample_quote_is_used_and_saved() {
    let dir = tempdir().expect("tempdir");
    let store = SlotStore::open(dir.path()).expect("store");
    let live = Arc::new(ScriptedQuotes::new().failing_quote("AAPL", SourceError::rate_limited("slow down")));
    let card = QuoteCard::open(store.clone(), Some(live));

    let view = card.fetch("AAPL").await.expect("fetch").expect("not blank");

    let quote = view.value().expect("sample quote");
    assert_eq!(quote.origin, DataOrigin::Fallback);
    assert_eq!(quote.price, 192.32);
    assert!(card.region().to_text().contains("Sample Quote"));
    assert!(store.contains(LAST_QUOTE_SLOT));
}

#[tokio::test]
async fn when_symbol_is_unknown_card_shows_no_data_and_keeps_previous_slot() {
    // Given: A saved MSFT quote
    let dir = tempdir().expect("tempdir");
    let store = SlotStore::open(dir.path()).expect("store");
    let card = QuoteCard::open(store.clone(), None);
    card.fetch("MSFT").await.expect("fetch");

    // When: An unknown symbol is requested
    let view = card.fetch("ZZZZ").await.expect("fetch").expect("not blank");

    // Then: The card shows the message and the slot still holds MSFT
    assert_eq!(view, ViewState::Failed(String::from(NO_DATA_MESSAGE)));
    assert_eq!(card.region().to_text(), format!("{NO_DATA_MESSAGE}\n"));
    let saved: Option<GlobalQuote> = store.load(LAST_QUOTE_SLOT);
    assert_eq!(saved.map(|quote| quote.symbol), Some(symbol("MSFT")));
}

#[tokio::test]
async fn when_input_is_blank_fetch_is_a_no_op() {
    let dir = tempdir().expect("tempdir");
    let live = Arc::new(ScriptedQuotes::new());
    let card = QuoteCard::open(SlotStore::open(dir.path()).expect("store"), Some(live.clone()));

    assert_eq!(card.fetch("   ").await.expect("fetch"), None);
    assert_eq!(live.calls(), 0);
    assert_eq!(card.view(), ViewState::Empty);
}

#[test]
fn when_saved_quote_is_corrupt_card_starts_empty() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(format!("{LAST_QUOTE_SLOT}.json")), b"{\"symbol\": 7").expect("junk");

    let card = QuoteCard::open(SlotStore::open(dir.path()).expect("store"), None);

    assert_eq!(card.view(), ViewState::Empty);
    assert_eq!(card.symbol_input(), "");
}

// =============================================================================
// To-do list
// =============================================================================

#[test]
fn when_todo_is_added_a_fresh_session_sees_it_unchecked() {
    // Given: An empty list
    let dir = tempdir().expect("tempdir");
    let mut list = TodoList::open(SlotStore::open(dir.path()).expect("store"));

    // When: "Buy milk" is added
    let id = list.add("  Buy milk ").expect("add").id;

    // Then: Reopening restores exactly that item, unchecked
    let reopened = TodoList::open(SlotStore::open(dir.path()).expect("store"));
    assert_eq!(reopened.len(), 1);
    let item = reopened.get(id).expect("persisted item");
    assert_eq!(item.text, "Buy milk");
    assert!(!item.completed);
}

#[test]
fn when_todo_is_toggled_completion_is_persisted() {
    let dir = tempdir().expect("tempdir");
    let mut list = TodoList::open(SlotStore::open(dir.path()).expect("store"));
    let first = list.add("Buy milk").expect("add").id;
    let second = list.add("Buy milk").expect("add").id;

    assert!(list.toggle(second).expect("toggle"));

    let reopened = TodoList::open(SlotStore::open(dir.path()).expect("store"));
    assert_eq!(reopened.get(first).map(|item| item.completed), Some(false));
    assert_eq!(reopened.get(second).map(|item| item.completed), Some(true));
}

#[test]
fn when_todo_is_removed_it_stays_removed() {
    let dir = tempdir().expect("tempdir");
    let mut list = TodoList::open(SlotStore::open(dir.path()).expect("store"));
    let keep = list.add("Keep").expect("add").id;
    let drop_id = list.add("Drop").expect("add").id;

    list.remove(drop_id).expect("remove");

    let reopened = TodoList::open(SlotStore::open(dir.path()).expect("store"));
    assert_eq!(reopened.len(), 1);
    assert!(reopened.get(keep).is_some());
    assert!(reopened.get(drop_id).is_none());
}

#[test]
fn when_todo_text_is_blank_nothing_is_written() {
    let dir = tempdir().expect("tempdir");
    let store = SlotStore::open(dir.path()).expect("store");
    let mut list = TodoList::open(store.clone());

    let error = list.add("   ").expect_err("blank text must fail");

    assert!(matches!(error, CoreError::Validation(ValidationError::EmptyTodo)));
    assert!(!store.contains(TODO_SLOT));
}

#[test]
fn when_todo_slot_is_corrupt_list_starts_empty() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(format!("{TODO_SLOT}.json")), b"[{\"id\": 12}").expect("junk");

    let list = TodoList::open(SlotStore::open(dir.path()).expect("store"));

    assert!(list.is_empty());
}
