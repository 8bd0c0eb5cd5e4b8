//! Settings-file merging
//!
//! Combines generated MCP server entries with whatever a target's settings
//! file already holds. Unrelated top-level keys and servers not being
//! generated survive untouched; a generated server replaces an existing
//! entry of the same name wholesale.

use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;
use toml::{Table as TomlTable, Value as TomlValue};

use crate::error::SyncError;
use crate::targets::{SettingsFormat, SettingsProfile};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Serialize(String),
}

impl SettingsError {
    /// Attach the settings path the error belongs to
    pub fn at(self, path: &Path) -> SyncError {
        match self {
            SettingsError::Parse(message) => SyncError::SettingsParse {
                path: path.to_path_buf(),
                message,
            },
            SettingsError::Serialize(message) => SyncError::SettingsSerialize {
                path: path.to_path_buf(),
                message,
            },
        }
    }
}

/// Merge `generated` servers into `existing` settings content.
///
/// Returns `None` when there is nothing to write (no generated servers), so
/// absent MCP configuration never creates a settings file.
pub fn merge_settings(
    existing: Option<&str>,
    profile: &SettingsProfile,
    generated: &Map<String, Value>,
) -> Result<Option<String>, SettingsError> {
    if generated.is_empty() {
        return Ok(None);
    }

    let content = match profile.format {
        SettingsFormat::Json => merge_json(existing, profile, generated)?,
        SettingsFormat::Toml => merge_toml(existing, profile, generated)?,
    };
    Ok(Some(content))
}

fn merge_json(
    existing: Option<&str>,
    profile: &SettingsProfile,
    generated: &Map<String, Value>,
) -> Result<String, SettingsError> {
    let mut doc = match existing {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(obj)) => obj,
            Ok(_) => {
                return Err(SettingsError::Parse(
                    "expected a JSON object at the top level".to_string(),
                ));
            }
            Err(e) => return Err(SettingsError::Parse(e.to_string())),
        },
        None => Map::new(),
    };

    for (key, value) in profile.seed {
        if !doc.contains_key(*key) {
            doc.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    match doc.get_mut(profile.container_key) {
        // Existing entries keep their position; new ones are appended
        Some(Value::Object(servers)) => {
            for (name, entry) in generated {
                servers.insert(name.clone(), entry.clone());
            }
        }
        Some(_) => {
            return Err(SettingsError::Parse(format!(
                "`{}` is not an object",
                profile.container_key
            )));
        }
        None => {
            doc.insert(
                profile.container_key.to_string(),
                Value::Object(generated.clone()),
            );
        }
    }

    let mut rendered = serde_json::to_string_pretty(&Value::Object(doc))
        .map_err(|e| SettingsError::Serialize(e.to_string()))?;
    rendered.push('\n');
    Ok(rendered)
}

fn merge_toml(
    existing: Option<&str>,
    profile: &SettingsProfile,
    generated: &Map<String, Value>,
) -> Result<String, SettingsError> {
    let mut doc: TomlTable = match existing {
        Some(raw) => toml::from_str(raw).map_err(|e| SettingsError::Parse(e.to_string()))?,
        None => TomlTable::new(),
    };

    for (key, value) in profile.seed {
        if !doc.contains_key(*key) {
            doc.insert(key.to_string(), TomlValue::String(value.to_string()));
        }
    }

    let servers = match doc
        .entry(profile.container_key.to_string())
        .or_insert_with(|| TomlValue::Table(TomlTable::new()))
    {
        TomlValue::Table(table) => table,
        _ => {
            return Err(SettingsError::Parse(format!(
                "`{}` is not a table",
                profile.container_key
            )));
        }
    };

    for (name, entry) in generated {
        if let Some(value) = json_to_toml_value(entry) {
            servers.insert(name.clone(), value);
        }
    }

    toml::to_string_pretty(&doc).map_err(|e| SettingsError::Serialize(e.to_string()))
}

/// Convert a generated JSON value to TOML. `null` has no TOML form and is dropped.
fn json_to_toml_value(value: &Value) -> Option<TomlValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(TomlValue::Boolean(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(TomlValue::Integer)
            .or_else(|| n.as_f64().map(TomlValue::Float)),
        Value::String(s) => Some(TomlValue::String(s.clone())),
        Value::Array(items) => Some(TomlValue::Array(
            items.iter().filter_map(json_to_toml_value).collect(),
        )),
        Value::Object(obj) => Some(TomlValue::Table(
            obj.iter()
                .filter_map(|(k, v)| json_to_toml_value(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
    }
}
