//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FORMBAR_DEBUG` | `debug` ("true"/"1"/"yes" => true) |
//! | `FORMBAR_LOG_LEVEL` | `log_level` |
//! | `FORMBAR_DOCUMENTS` | `documents` (comma-separated) |
//! | `FORMBAR_PRETTY_JSON` | `pretty_json` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use formbar_rs_core::settings_loader;
//!
//! // Picks the format from the file extension, then applies env overrides.
//! let settings = settings_loader::from_file_with_env("formbar.toml").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::FormbarError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys missing from the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormbarError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormbarError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormbarError> {
    from_toml_str(&read_settings_file(path.as_ref(), "TOML")?)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormbarError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormbarError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormbarError> {
    from_json_str(&read_settings_file(path.as_ref(), "JSON")?)
}

/// Loads settings from a file, choosing the format from its extension.
///
/// Files ending in `.json` are read as JSON; everything else as TOML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn from_file(path: impl AsRef<Path>) -> Result<Settings, FormbarError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        from_json_file(path)
    } else {
        from_toml_file(path)
    }
}

/// Loads settings from a file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormbarError> {
    let mut settings = from_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `FORMBAR_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

/// Applies overrides using `lookup` to fetch each `FORMBAR_*` variable.
///
/// [`apply_env_overrides`] calls this with the process environment.
pub fn apply_overrides_from(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("FORMBAR_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Some(val) = lookup("FORMBAR_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("FORMBAR_DOCUMENTS") {
        settings.documents = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
    }

    if let Some(val) = lookup("FORMBAR_PRETTY_JSON") {
        settings.pretty_json = parse_flag(&val);
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_flag(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_settings_file(path: &Path, format: &str) -> Result<String, FormbarError> {
    std::fs::read_to_string(path).map_err(|e| {
        FormbarError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

/// Deep-merges a parsed settings document over the serialized defaults.
fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, FormbarError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FormbarError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        FormbarError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
