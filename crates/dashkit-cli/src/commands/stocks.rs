use std::collections::BTreeSet;

use dashkit_core::render::GridSurface;
use dashkit_core::{Line, ProviderId, StockDashboard, StockQuote, StockRow, Symbol, ViewState};
use serde::Serialize;

use crate::cli::{StocksCommand, StocksListArgs, StocksShowArgs};
use crate::error::CliError;

use super::{CommandResult, Services};

const CHART_COLS: usize = 60;
const CHART_ROWS: usize = 16;

#[derive(Debug, Serialize)]
struct StockListData {
    live: bool,
    rows: Vec<StockRow>,
}

#[derive(Debug, Serialize)]
struct StockShowData {
    symbol: Symbol,
    view: ViewState<StockQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<String>,
}

pub async fn run(command: &StocksCommand, services: &Services<'_>) -> Result<CommandResult, CliError> {
    let dashboard = StockDashboard::with_samples(services.quote_source());
    match command {
        StocksCommand::List(args) => list(args, &dashboard).await,
        StocksCommand::Show(args) => show(args, &dashboard).await,
    }
}

async fn list(args: &StocksListArgs, dashboard: &StockDashboard) -> Result<CommandResult, CliError> {
    let matching = dashboard.filter(args.filter.as_deref().unwrap_or_default());
    for entry in &matching {
        dashboard.select(&entry.symbol).await;
    }

    let wanted = matching
        .iter()
        .map(|entry| entry.symbol.clone())
        .collect::<BTreeSet<_>>();
    let rows = match args.sort {
        Some(order) => {
            dashboard.sort(order);
            dashboard
                .rows()
                .into_iter()
                .filter(|row| wanted.contains(&row.symbol))
                .collect()
        }
        None => {
            dashboard.filter(args.filter.as_deref().unwrap_or_default());
            dashboard.rows()
        }
    };

    let lines = if rows.is_empty() {
        vec![Line::muted("No matching stocks.")]
    } else {
        rows.iter()
            .map(|row| {
                Line::toned(
                    format!(
                        "{:<6} {:<28} {:>10} {:>9}",
                        row.symbol.as_str(),
                        row.name,
                        row.price,
                        row.change
                    ),
                    row.tone,
                )
            })
            .collect()
    };

    let source = if dashboard.is_live() {
        ProviderId::Alphavantage
    } else {
        ProviderId::Fallback
    };
    let mut result = CommandResult::ok(
        serde_json::to_value(StockListData {
            live: dashboard.is_live(),
            rows,
        })?,
        lines,
        source,
    );
    if !dashboard.is_live() {
        result = result.with_warning("live mode is off; showing sample data");
    }
    Ok(result)
}

async fn show(args: &StocksShowArgs, dashboard: &StockDashboard) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let view = dashboard.select(&symbol).await;

    let mut lines = dashboard.region().lines().to_vec();
    let chart = if args.chart {
        let mut surface = GridSurface::new(CHART_COLS, CHART_ROWS);
        dashboard.draw_chart(&mut surface);
        let text = surface.to_text();
        lines.push(Line::plain(""));
        lines.extend(text.lines().map(Line::plain));
        Some(text)
    } else {
        None
    };

    let data = serde_json::to_value(StockShowData {
        symbol,
        view,
        chart,
    })?;
    Ok(CommandResult::ok(data, lines, dashboard.source()))
}
