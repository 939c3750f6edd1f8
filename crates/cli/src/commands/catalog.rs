use shopkeep_core::config::{AppConfig, LoadOptions};

use crate::commands::{load_catalog, CommandResult};

pub fn run(options: LoadOptions, category: Option<&str>) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("catalog", "catalog_load", error.to_string(), 3);
        }
    };

    let rendered = match category {
        Some(category) => serde_json::to_string_pretty(catalog.search(category)),
        None => serde_json::to_string_pretty(catalog.all()),
    };
    match rendered {
        Ok(output) => CommandResult::success(output),
        Err(error) => CommandResult::failure("catalog", "serialization", error.to_string(), 3),
    }
}
