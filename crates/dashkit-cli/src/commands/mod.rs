mod movie;
mod player;
mod quote;
mod search;
mod stocks;
mod todo;
mod voice;
mod weather;

use std::sync::Arc;
use std::time::Instant;

use dashkit_core::{
    AlphaVantageAdapter, Envelope, EnvelopeError, EnvelopeMeta, HttpClient, Line, ProviderId,
    QuoteSource, ReqwestHttpClient, ViewState,
};
use dashkit_store::SlotStore;
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::config::DashConfig;
use crate::error::CliError;
use crate::output::Report;

/// What a command hands back before the envelope is assembled.
pub struct CommandResult {
    pub data: Value,
    pub lines: Vec<Line>,
    pub source: ProviderId,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value, lines: Vec<Line>, source: ProviderId) -> Self {
        Self {
            data,
            lines,
            source,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Records a widget failure message as an envelope error.
    pub fn with_failure<T>(mut self, code: &str, view: &ViewState<T>) -> Result<Self, CliError> {
        if let Some(message) = view.failure() {
            self.errors
                .push(EnvelopeError::new(code, message)?.with_source(self.source));
        }
        Ok(self)
    }
}

/// Provider plumbing shared by the commands.
pub struct Services<'a> {
    pub config: &'a DashConfig,
    http: Arc<dyn HttpClient>,
}

impl<'a> Services<'a> {
    pub fn new(config: &'a DashConfig) -> Self {
        Self {
            config,
            http: Arc::new(ReqwestHttpClient::new()),
        }
    }

    pub fn http(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.http)
    }

    /// Alpha Vantage when a key is configured and live mode is on.
    pub fn quote_source(&self) -> Option<Arc<dyn QuoteSource>> {
        let key = self.config.live_stock_key()?;
        let adapter = AlphaVantageAdapter::new(self.http(), key)
            .with_timeout_ms(self.config.timeout_ms);
        Some(Arc::new(adapter))
    }

    pub fn store(&self) -> Result<SlotStore, CliError> {
        Ok(SlotStore::open(&self.config.data_dir)?)
    }

    pub fn require_online(&self, command: &str) -> Result<(), CliError> {
        if self.config.offline {
            return Err(CliError::Command(format!(
                "`{command}` needs live providers; drop --offline or DASHKIT_OFFLINE"
            )));
        }
        Ok(())
    }
}

pub async fn run(cli: &Cli, config: &DashConfig) -> Result<Report, CliError> {
    let services = Services::new(config);
    let started = Instant::now();

    let result = match &cli.command {
        Command::Stocks(command) => stocks::run(command, &services).await?,
        Command::Quote(args) => quote::run(args, &services).await?,
        Command::Weather(args) => weather::run(args, &services, cli.format).await?,
        Command::Movie(args) => movie::run(args, &services).await?,
        Command::Todo(command) => todo::run(command, &services)?,
        Command::Search(args) => search::run(args)?,
        Command::Voice => voice::run()?,
        Command::Player => player::run(cli.format)?,
    };

    let CommandResult {
        data,
        lines,
        source,
        warnings,
        errors,
    } = result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::new(source, latency_ms);
    for warning in warnings {
        meta.push_warning(warning);
    }

    let mut envelope = Envelope::success(meta, data);
    for error in errors {
        envelope.push_error(error)?;
    }

    Ok(Report { envelope, lines })
}
