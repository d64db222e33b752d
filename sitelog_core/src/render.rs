//! Depth-bounded rendering of log values.
//!
//! Two paths share the same value model:
//! - `render` / `to_json` serialize `data` payloads with a recursion
//!   bound, substituting fixed placeholders once the bound is exhausted
//! - `render_simple` is the message path for primitives: strings lose
//!   newline characters, everything else renders literally
//!
//! The depth bound is the termination guarantee. Rendering never recurses
//! more than `max_depth` levels and never fails; truncated maps become
//! `"{ ? }"`, truncated sequence elements become `"?"`, and callables are
//! always the fixed `"f()"` marker.
//!
//! Maps tagged with a registered type name are delegated to a custom
//! formatter instead; the registry is a process-wide snapshot replaced
//! atomically by `set_custom_formatters`.

use crate::types::{LogMap, LogValue};
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// Default serializer recursion bound
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Placeholder for a mapping truncated by the depth bound
pub const MAP_PLACEHOLDER: &str = "{ ? }";
/// Placeholder for a sequence element truncated by the depth bound
pub const SEQ_PLACEHOLDER: &str = "?";
/// Placeholder for callables, which are never invoked or inspected
pub const CALLABLE_PLACEHOLDER: &str = "f()";

/// A custom renderer keyed by a map's type tag; its output is embedded
/// verbatim (as a JSON string in structured mode)
pub type Formatter = Arc<dyn Fn(&LogValue) -> String + Send + Sync>;

static FORMATTERS: Lazy<ArcSwap<HashMap<String, Formatter>>> =
    Lazy::new(|| ArcSwap::from_pointee(HashMap::new()));

/// Replace the process-wide custom formatter registry.
///
/// The whole mapping is swapped atomically, last writer wins; every
/// subsequent render observes the new snapshot.
pub fn set_custom_formatters(formatters: HashMap<String, Formatter>) {
    FORMATTERS.store(Arc::new(formatters));
}

fn formatters() -> Arc<HashMap<String, Formatter>> {
    FORMATTERS.load_full()
}

/// Render a value as display text, recursing at most `max_depth` levels
pub fn render(value: &LogValue, max_depth: u32) -> String {
    render_with(value, max_depth, &formatters())
}

fn render_with(value: &LogValue, depth: u32, formatters: &HashMap<String, Formatter>) -> String {
    match value {
        LogValue::Null => "null".to_string(),
        LogValue::Bool(b) => b.to_string(),
        LogValue::Number(n) => n.to_string(),
        LogValue::Str(s) => quote(s),
        LogValue::Callable => format!("\"{CALLABLE_PLACEHOLDER}\""),
        LogValue::Seq(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| {
                    if depth < 1 {
                        format!("\"{SEQ_PLACEHOLDER}\"")
                    } else {
                        render_with(item, depth - 1, formatters)
                    }
                })
                .collect();
            format!("[{}]", rendered.join(", "))
        }
        LogValue::Map(map) => {
            if let Some(formatter) = custom_formatter(map, formatters) {
                return formatter(value);
            }
            if depth < 1 {
                return format!("\"{MAP_PLACEHOLDER}\"");
            }
            let rendered: Vec<String> = map
                .iter()
                .map(|(key, item)| {
                    format!("{}: {}", quote(key), render_with(item, depth - 1, formatters))
                })
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
        LogValue::Error(shape) => render_with(&error_as_map(shape), depth, formatters),
    }
}

/// Structural twin of `render` for JSON output mode: same depth bound,
/// same placeholder substitutions, placeholders emitted as JSON strings
pub fn to_json(value: &LogValue, max_depth: u32) -> serde_json::Value {
    to_json_with(value, max_depth, &formatters())
}

fn to_json_with(
    value: &LogValue,
    depth: u32,
    formatters: &HashMap<String, Formatter>,
) -> serde_json::Value {
    match value {
        LogValue::Null => serde_json::Value::Null,
        LogValue::Bool(b) => serde_json::Value::Bool(*b),
        LogValue::Number(n) => serde_json::Value::Number(n.clone()),
        LogValue::Str(s) => serde_json::Value::String(s.clone()),
        LogValue::Callable => serde_json::Value::String(CALLABLE_PLACEHOLDER.to_string()),
        LogValue::Seq(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| {
                    if depth < 1 {
                        serde_json::Value::String(SEQ_PLACEHOLDER.to_string())
                    } else {
                        to_json_with(item, depth - 1, formatters)
                    }
                })
                .collect(),
        ),
        LogValue::Map(map) => {
            if let Some(formatter) = custom_formatter(map, formatters) {
                return serde_json::Value::String(formatter(value));
            }
            if depth < 1 {
                return serde_json::Value::String(MAP_PLACEHOLDER.to_string());
            }
            let mut object = serde_json::Map::new();
            for (key, item) in map.iter() {
                object.insert(key.to_string(), to_json_with(item, depth - 1, formatters));
            }
            serde_json::Value::Object(object)
        }
        LogValue::Error(shape) => to_json_with(&error_as_map(shape), depth, formatters),
    }
}

/// Simple path for message-destined values: strings lose `\n` and `\r`,
/// other primitives render literally without quotes, structured values
/// fall back to the depth-bounded renderer
pub fn render_simple(value: &LogValue) -> String {
    match value {
        LogValue::Str(s) => strip_newlines(s),
        LogValue::Null => "null".to_string(),
        LogValue::Bool(b) => b.to_string(),
        LogValue::Number(n) => n.to_string(),
        other => render(other, DEFAULT_MAX_DEPTH),
    }
}

/// Remove newline and carriage-return characters
pub fn strip_newlines(s: &str) -> String {
    s.replace(['\n', '\r'], "")
}

fn custom_formatter<'a>(
    map: &LogMap,
    formatters: &'a HashMap<String, Formatter>,
) -> Option<&'a Formatter> {
    map.tag().and_then(|tag| formatters.get(tag))
}

fn error_as_map(shape: &crate::types::ErrorShape) -> LogValue {
    let mut map = LogMap::new();
    map.insert("name", shape.name.clone());
    map.insert("message", shape.message.clone());
    if let Some(data) = &shape.data {
        map.insert("data", LogValue::from(data.clone()));
    }
    map.insert("stack", shape.stack.clone());
    LogValue::Map(map)
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
