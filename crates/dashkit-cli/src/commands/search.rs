use dashkit_core::{DocumentIndex, Line, ProviderId, Query, Render, SearchResults};

use crate::cli::SearchArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &SearchArgs) -> Result<CommandResult, CliError> {
    // Blank input leaves the results untouched, same as the voice path.
    let Ok(query) = Query::parse(&args.query) else {
        return Ok(CommandResult::ok(
            serde_json::Value::Null,
            vec![Line::muted("Type something to search.")],
            ProviderId::Local,
        ));
    };

    let results = SearchResults {
        query: query.to_string(),
        documents: DocumentIndex::sample().search(&query),
    };
    Ok(CommandResult::ok(
        serde_json::to_value(&results)?,
        results.render(),
        ProviderId::Local,
    ))
}
