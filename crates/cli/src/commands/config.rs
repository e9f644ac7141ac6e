use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use mealwise_core::config::{interpolate_env_vars, resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run(load_options: &LoadOptions) -> String {
    let config = match AppConfig::load(load_options.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path: Option<PathBuf> = resolve_config_path(load_options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let random_seed = config
        .suggestions
        .random_seed
        .map(|seed| seed.to_string())
        .unwrap_or_else(|| "<unset>".to_string());

    let lines = [
        "effective config (source precedence: env > file > default):".to_string(),
        render_line(
            "suggestions.default_count",
            &config.suggestions.default_count.to_string(),
            source("suggestions.default_count", &["MEALWISE_SUGGESTIONS_DEFAULT_COUNT"]),
        ),
        render_line(
            "suggestions.default_strategy",
            config.suggestions.default_strategy.as_str(),
            source("suggestions.default_strategy", &["MEALWISE_SUGGESTIONS_DEFAULT_STRATEGY"]),
        ),
        render_line(
            "suggestions.random_seed",
            &random_seed,
            source("suggestions.random_seed", &["MEALWISE_SUGGESTIONS_RANDOM_SEED"]),
        ),
        render_line(
            "suggestions.max_count",
            &config.suggestions.max_count.to_string(),
            source("suggestions.max_count", &["MEALWISE_SUGGESTIONS_MAX_COUNT"]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["MEALWISE_LOGGING_LEVEL", "MEALWISE_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format).to_lowercase(),
            source("logging.format", &["MEALWISE_LOGGING_FORMAT", "MEALWISE_LOG_FORMAT"]),
        ),
    ];

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    let text = interpolate_env_vars(&raw).unwrap_or(raw);
    text.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
