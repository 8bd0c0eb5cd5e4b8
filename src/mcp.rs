//! MCP (Model Context Protocol) server translation
//!
//! Turns the agent-home server definitions into the entry shape each target
//! expects. All target differences come from [`ServerShape`] data.

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use crate::config::McpServerConfig;
use crate::targets::{CommandStyle, ServerShape};

/// Build a JSON object from string key/value pairs (already sorted by key).
fn json_map_from_string_map(values: &BTreeMap<String, String>) -> Map<String, Value> {
    values
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect()
}

/// Convert one server definition into a target entry.
pub fn reshape_server(config: &McpServerConfig, shape: &ServerShape) -> Value {
    let mut obj = Map::new();

    if let Some(ref url) = config.url {
        if let Some(kind) = shape.remote_type {
            obj.insert("type".to_string(), json!(kind));
        }
        obj.insert(shape.url_key.to_string(), json!(url));
    } else if let Some(kind) = shape.local_type {
        obj.insert("type".to_string(), json!(kind));
    }

    if let Some(ref cmd) = config.command {
        match shape.command_style {
            CommandStyle::Split => {
                obj.insert("command".to_string(), json!(cmd));
                if !config.args.is_empty() {
                    obj.insert("args".to_string(), json!(config.args));
                }
            }
            CommandStyle::Joined => {
                let mut command_parts = vec![cmd.clone()];
                command_parts.extend(config.args.iter().cloned());
                obj.insert("command".to_string(), json!(command_parts));
            }
        }
    }

    if !config.env.is_empty() {
        obj.insert(
            shape.env_key.to_string(),
            Value::Object(json_map_from_string_map(&config.env)),
        );
    }

    if !config.headers.is_empty() {
        obj.insert(
            shape.headers_key.to_string(),
            Value::Object(json_map_from_string_map(&config.headers)),
        );
    }

    if let Some((key, value)) = shape.flag {
        obj.insert(key.to_string(), json!(value));
    }

    // Unmodeled fields pass through; keys the shape writes take precedence
    for (key, value) in &config.extra {
        obj.entry(key.clone()).or_insert_with(|| value.clone());
    }

    Value::Object(obj)
}

/// Convert every server, keyed by name in name order.
pub fn reshape_servers(
    servers: &BTreeMap<String, McpServerConfig>,
    shape: &ServerShape,
) -> Map<String, Value> {
    servers
        .iter()
        .map(|(name, config)| (name.clone(), reshape_server(config, shape)))
        .collect()
}
