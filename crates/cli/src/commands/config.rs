use std::env;
use std::fs;
use std::path::Path;

use shopkeep_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

struct Field {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run(options: LoadOptions) -> String {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(
            field.key,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(format!("- {} = {} (source: {source})", field.key, field.value));
    }
    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<Field> {
    let llm = &config.llm;
    vec![
        Field {
            key: "llm.provider",
            env_keys: &["SHOPKEEP_LLM_PROVIDER"],
            value: label(&llm.provider),
        },
        Field { key: "llm.model", env_keys: &["SHOPKEEP_LLM_MODEL"], value: llm.model.clone() },
        Field {
            key: "llm.base_url",
            env_keys: &["SHOPKEEP_LLM_BASE_URL"],
            value: llm.base_url.clone().unwrap_or_else(|| "<provider default>".to_string()),
        },
        Field {
            key: "llm.api_key",
            env_keys: &["SHOPKEEP_LLM_API_KEY"],
            value: if llm.api_key.is_some() { "<redacted>" } else { "<unset>" }.to_string(),
        },
        Field {
            key: "llm.timeout_secs",
            env_keys: &["SHOPKEEP_LLM_TIMEOUT_SECS"],
            value: llm.timeout_secs.to_string(),
        },
        Field {
            key: "llm.max_retries",
            env_keys: &["SHOPKEEP_LLM_MAX_RETRIES"],
            value: llm.max_retries.to_string(),
        },
        Field {
            key: "llm.temperature",
            env_keys: &["SHOPKEEP_LLM_TEMPERATURE"],
            value: llm
                .temperature
                .map(|value| value.to_string())
                .unwrap_or_else(|| "<unset>".to_string()),
        },
        Field {
            key: "agent.max_tool_cycles",
            env_keys: &["SHOPKEEP_AGENT_MAX_TOOL_CYCLES"],
            value: config.agent.max_tool_cycles.to_string(),
        },
        Field {
            key: "catalog.path",
            env_keys: &["SHOPKEEP_CATALOG_PATH"],
            value: config
                .catalog
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<built-in>".to_string()),
        },
        Field {
            key: "logging.level",
            env_keys: &["SHOPKEEP_LOGGING_LEVEL", "SHOPKEEP_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key: "logging.format",
            env_keys: &["SHOPKEEP_LOGGING_FORMAT", "SHOPKEEP_LOG_FORMAT"],
            value: label(&config.logging.format),
        },
    ]
}

fn label(value: &impl std::fmt::Debug) -> String {
    format!("{value:?}").to_ascii_lowercase()
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // Blank values are ignored by the loader, so they are not a source either.
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if config_file_doc.is_some_and(|doc| contains_path(doc, key_path)) {
        let file_path = config_file_path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "config file".to_string());
        return format!("file ({file_path})");
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    key_path.split('.').try_fold(root, |current, key| current.get(key)).is_some()
}
