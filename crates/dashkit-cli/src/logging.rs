use tracing_subscriber::EnvFilter;

use crate::error::CliError;

const DEFAULT_LEVEL: &str = "warn";

/// Installs the stderr subscriber. `DASHKIT_LOG` wins over `RUST_LOG`;
/// `--verbose` forces debug.
pub fn init(verbose: bool) -> Result<(), CliError> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("DASHKIT_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| {
            CliError::Command(format!("failed to initialize tracing subscriber: {error}"))
        })
}
