use std::sync::Arc;
use std::time::Duration;

use dashkit_core::{
    Line, NominatimAdapter, OpenMeteoAdapter, ProviderId, ViewState, WeatherReport, WeatherWidget,
};
use serde::Serialize;
use tracing::info;

use crate::cli::{OutputFormat, WeatherArgs};
use crate::error::CliError;
use crate::output;

use super::{CommandResult, Services};

const WATCH_POLL: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize)]
struct WeatherResponseData {
    city: String,
    refreshes: u64,
    view: Option<ViewState<WeatherReport>>,
}

pub async fn run(
    args: &WeatherArgs,
    services: &Services<'_>,
    format: OutputFormat,
) -> Result<CommandResult, CliError> {
    services.require_online("weather")?;
    let timeout_ms = services.config.timeout_ms;
    let widget = WeatherWidget::new(
        Arc::new(NominatimAdapter::new(services.http()).with_timeout_ms(timeout_ms)),
        Arc::new(OpenMeteoAdapter::new(services.http()).with_timeout_ms(timeout_ms)),
    )
    .with_refresh_interval(services.config.refresh_interval);

    let view = widget.search(&args.city).await;
    let mut lines = widget.region().lines().to_vec();

    if args.watch && widget.is_refreshing() {
        emit(&widget, format)?;
        watch(&widget, format, services.config.refresh_interval).await?;
        widget.stop_refresh();
        // Everything was already printed while watching.
        lines = Vec::new();
    }

    let view = widget.view().or(view);
    let failure = view.clone().unwrap_or(ViewState::Empty);
    let data = serde_json::to_value(WeatherResponseData {
        city: args.city.trim().to_owned(),
        refreshes: widget.refresh_count(),
        view,
    })?;

    if lines.is_empty() && !args.watch {
        lines.push(Line::muted("Enter a city name."));
    }
    CommandResult::ok(data, lines, ProviderId::OpenMeteo).with_failure("weather.failed", &failure)
}

async fn watch(
    widget: &WeatherWidget,
    format: OutputFormat,
    every: Duration,
) -> Result<(), CliError> {
    let city = widget.location().map(|location| location.name).unwrap_or_default();
    info!(%city, every_secs = every.as_secs(), "watching weather; press Ctrl-C to stop");
    let mut seen = widget.refresh_count();
    let mut poll = tokio::time::interval(WATCH_POLL);
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                return Ok(());
            }
            _ = poll.tick() => {
                let current = widget.refresh_count();
                if current != seen {
                    seen = current;
                    emit(widget, format)?;
                }
            }
        }
    }
}

fn emit(widget: &WeatherWidget, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => {
            output::print_lines(widget.region().lines())?;
            println!();
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&widget.view())?),
    }
    Ok(())
}
