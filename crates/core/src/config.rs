use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::suggestions::Strategy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub suggestions: SuggestionsConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct SuggestionsConfig {
    pub default_count: u32,
    pub default_strategy: Strategy,
    pub random_seed: Option<u64>,
    pub max_count: u32,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub default_count: Option<u32>,
    pub default_strategy: Option<Strategy>,
    pub random_seed: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            suggestions: SuggestionsConfig {
                default_count: 3,
                default_strategy: Strategy::Balanced,
                random_seed: None,
                max_count: 20,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("mealwise.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(suggestions) = patch.suggestions {
            if let Some(default_count) = suggestions.default_count {
                self.suggestions.default_count = default_count;
            }
            if let Some(default_strategy) = suggestions.default_strategy {
                self.suggestions.default_strategy = default_strategy;
            }
            if let Some(random_seed) = suggestions.random_seed {
                self.suggestions.random_seed = Some(random_seed);
            }
            if let Some(max_count) = suggestions.max_count {
                self.suggestions.max_count = max_count;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("MEALWISE_SUGGESTIONS_DEFAULT_COUNT") {
            self.suggestions.default_count =
                parse_u32("MEALWISE_SUGGESTIONS_DEFAULT_COUNT", &value)?;
        }
        if let Some(value) = read_env("MEALWISE_SUGGESTIONS_DEFAULT_STRATEGY") {
            self.suggestions.default_strategy = value.parse().map_err(|_| {
                ConfigError::InvalidEnvOverride {
                    key: "MEALWISE_SUGGESTIONS_DEFAULT_STRATEGY".to_string(),
                    value: value.clone(),
                }
            })?;
        }
        if let Some(value) = read_env("MEALWISE_SUGGESTIONS_RANDOM_SEED") {
            self.suggestions.random_seed =
                Some(parse_u64("MEALWISE_SUGGESTIONS_RANDOM_SEED", &value)?);
        }
        if let Some(value) = read_env("MEALWISE_SUGGESTIONS_MAX_COUNT") {
            self.suggestions.max_count = parse_u32("MEALWISE_SUGGESTIONS_MAX_COUNT", &value)?;
        }

        let log_level =
            read_env("MEALWISE_LOGGING_LEVEL").or_else(|| read_env("MEALWISE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MEALWISE_LOGGING_FORMAT").or_else(|| read_env("MEALWISE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(default_count) = overrides.default_count {
            self.suggestions.default_count = default_count;
        }
        if let Some(default_strategy) = overrides.default_strategy {
            self.suggestions.default_strategy = default_strategy;
        }
        if let Some(random_seed) = overrides.random_seed {
            self.suggestions.random_seed = Some(random_seed);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_suggestions(&self.suggestions)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("mealwise.toml"), PathBuf::from("config/mealwise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Replace `${VAR}` references with environment values.
///
/// Full-line `#` comments are copied through untouched, so a commented-out
/// reference to an unset variable does not fail the load.
pub fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            interpolate_line(line, &mut output)?;
        }
    }

    Ok(output)
}

fn interpolate_line(line: &str, output: &mut String) -> Result<(), ConfigError> {
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(())
}

fn validate_suggestions(suggestions: &SuggestionsConfig) -> Result<(), ConfigError> {
    if suggestions.max_count == 0 || suggestions.max_count > 50 {
        return Err(ConfigError::Validation(
            "suggestions.max_count must be in range 1..=50".to_string(),
        ));
    }

    if suggestions.default_count == 0 || suggestions.default_count > suggestions.max_count {
        return Err(ConfigError::Validation(format!(
            "suggestions.default_count must be in range 1..={}",
            suggestions.max_count
        )));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    suggestions: Option<SuggestionsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SuggestionsPatch {
    default_count: Option<u32>,
    default_strategy: Option<Strategy>,
    random_seed: Option<u64>,
    max_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
