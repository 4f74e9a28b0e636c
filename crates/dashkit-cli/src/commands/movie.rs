use std::sync::Arc;

use dashkit_core::{Line, Movie, MovieFinder, OmdbAdapter, ProviderId, ViewState};
use serde::Serialize;

use crate::cli::MovieArgs;
use crate::error::CliError;

use super::{CommandResult, Services};

#[derive(Debug, Serialize)]
struct MovieResponseData {
    title: String,
    view: Option<ViewState<Movie>>,
}

pub async fn run(args: &MovieArgs, services: &Services<'_>) -> Result<CommandResult, CliError> {
    services.require_online("movie")?;
    let adapter = OmdbAdapter::new(services.http(), services.config.omdb_api_key.clone())
        .with_timeout_ms(services.config.timeout_ms);
    let finder = MovieFinder::new(Arc::new(adapter));

    let view = finder.search(&args.title).await;
    let mut lines = finder.region().lines().to_vec();
    if view.is_none() {
        lines.push(Line::muted("Enter a movie title."));
    }

    let failure = view.clone().unwrap_or(ViewState::Empty);
    let data = serde_json::to_value(MovieResponseData {
        title: args.title.trim().to_owned(),
        view,
    })?;
    CommandResult::ok(data, lines, ProviderId::Omdb).with_failure("movie.failed", &failure)
}
