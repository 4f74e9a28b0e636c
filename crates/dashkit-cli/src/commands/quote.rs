use dashkit_core::{DataOrigin, GlobalQuote, ProviderId, QuoteCard, ViewState};
use serde::Serialize;

use crate::cli::QuoteArgs;
use crate::error::CliError;

use super::{CommandResult, Services};

#[derive(Debug, Serialize)]
struct QuoteResponseData {
    symbol: String,
    restored: bool,
    view: ViewState<GlobalQuote>,
}

pub async fn run(args: &QuoteArgs, services: &Services<'_>) -> Result<CommandResult, CliError> {
    let card = QuoteCard::open(services.store()?, services.quote_source());

    let requested = args.symbol.as_deref().unwrap_or_default();
    let fetched = card.fetch(requested).await?;
    let restored = fetched.is_none();
    let view = fetched.unwrap_or_else(|| card.view());

    let source = match view.value().map(|quote| quote.origin) {
        Some(DataOrigin::Live) => ProviderId::Alphavantage,
        Some(DataOrigin::Fallback) => ProviderId::Fallback,
        None => ProviderId::Local,
    };
    let lines = card.region().lines().to_vec();

    let data = serde_json::to_value(QuoteResponseData {
        symbol: card.symbol_input(),
        restored,
        view: view.clone(),
    })?;

    let mut result = CommandResult::ok(data, lines, source).with_failure("quote.no_data", &view)?;
    if restored && matches!(view, ViewState::Empty) {
        result = result.with_warning("no saved quote yet; pass a symbol");
    }
    Ok(result)
}
