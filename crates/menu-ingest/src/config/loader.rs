//! Config loading: JSON text, then schema check, then typed validation.

use std::path::Path;
use std::sync::LazyLock;

use jsonschema::Validator;
use serde_json::Value;

use super::schema::Config;
use crate::error::ConfigError;

static CONFIG_SCHEMA: LazyLock<Result<Validator, String>> = LazyLock::new(|| {
    let schema: Value = serde_json::from_str(include_str!("../../../../schema/config-v1.json"))
        .map_err(|e| format!("embedded config schema is not JSON: {}", e))?;
    jsonschema::validator_for(&schema).map_err(|e| format!("embedded config schema is invalid: {}", e))
});

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|text| load_config_from_str(&text))
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let raw: Value = serde_json::from_str(content)?;
    check_schema(&raw)?;

    let config: Config = serde_json::from_value(raw)?;
    check_semantics(&config)?;
    Ok(config)
}

fn check_schema(raw: &Value) -> Result<(), ConfigError> {
    let validator = CONFIG_SCHEMA
        .as_ref()
        .map_err(|message| ConfigError::Validation {
            message: message.clone(),
        })?;

    let problems: Vec<String> = validator.iter_errors(raw).map(|e| e.to_string()).collect();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::SchemaValidation {
            errors: problems.join("; "),
        })
    }
}

/// Rules the schema cannot express.
fn check_semantics(config: &Config) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::Validation {
        message: message.to_string(),
    };

    if config.version != "1.0" {
        return Err(invalid(&format!("version {} is not supported, expected 1.0", config.version)));
    }
    if config.fetch.timeout_secs == 0 || config.fetch.connect_timeout_secs == 0 {
        return Err(invalid("fetch timeouts must be at least one second"));
    }
    if config.dining_halls.is_empty() {
        return Err(invalid("dining_halls must list at least one hall"));
    }

    // Duplicate ids and URL shape.
    config.registry().map(|_| ())
}
