use shopkeep_agent::ToolRegistry;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let schemas = ToolRegistry::shopping().schemas();
    match serde_json::to_string_pretty(&schemas) {
        Ok(output) => CommandResult::success(output),
        Err(error) => CommandResult::failure("tools", "serialization", error.to_string(), 3),
    }
}
