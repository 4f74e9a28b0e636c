use dashkit_core::{ProviderId, Render, Todo, TodoList};
use serde::Serialize;

use crate::cli::TodoCommand;
use crate::error::CliError;

use super::{CommandResult, Services};

#[derive(Debug, Serialize)]
struct TodoResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    changed: Option<Todo>,
    items: Vec<Todo>,
}

pub fn run(command: &TodoCommand, services: &Services<'_>) -> Result<CommandResult, CliError> {
    let mut list = TodoList::open(services.store()?);

    let changed = match command {
        TodoCommand::List => None,
        TodoCommand::Add { text } => Some(list.add(text)?.clone()),
        TodoCommand::Toggle { id } => {
            let id = list.resolve(id)?;
            list.toggle(id)?;
            list.get(id).cloned()
        }
        TodoCommand::Remove { id } => {
            let id = list.resolve(id)?;
            Some(list.remove(id)?)
        }
    };

    let data = serde_json::to_value(TodoResponseData {
        changed,
        items: list.items().to_vec(),
    })?;
    Ok(CommandResult::ok(data, list.render(), ProviderId::Local))
}
