//! Process-wide output settings.
//!
//! Everything is read from the environment once, on first use:
//! - `SITELOG_FORMAT` selects `pretty` (default) or `json` output
//! - `SITELOG_MAX_DEPTH` bounds serializer recursion (default 5)
//! - `SITELOG_TO_STDERR` routes every severity to the error sink
//! - `SITELOG_EXTRA_FIELDS` is a JSON object merged into every record
//! - `SITELOG_ERROR_EXTRA_FIELDS` is a JSON object merged into error
//!   side-channel output and error-severity records
//!
//! Malformed values fall back to defaults with a single note on stderr;
//! settings parsing can never abort the host process. Enablement patterns
//! live in the `DEBUG` variable and are handled by the `enable` module.

use crate::render;
use once_cell::sync::Lazy;
use serde_json::Map;

/// Output serialization mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<label> <message> [data] +<n>ms`, one line per call
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Process-wide output configuration, fixed at first use
#[derive(Clone, Debug)]
pub struct Settings {
    pub format: OutputFormat,
    /// Serializer recursion bound for `data` payloads
    pub max_depth: u32,
    /// Route every severity to the error sink
    pub log_to_stderr: bool,
    /// Fields merged into every JSON record
    pub extra_fields: Map<String, serde_json::Value>,
    /// Fields merged into error side-channel output and error-severity
    /// records
    pub error_extra_fields: Map<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            max_depth: render::DEFAULT_MAX_DEPTH,
            log_to_stderr: false,
            extra_fields: Map::new(),
            error_extra_fields: Map::new(),
        }
    }
}

static GLOBAL: Lazy<Settings> = Lazy::new(Settings::from_env);

impl Settings {
    /// The process-wide snapshot, read from the environment exactly once
    pub fn global() -> &'static Settings {
        &GLOBAL
    }

    /// Read settings from the environment, degrading malformed values to
    /// defaults.
    pub fn from_env() -> Self {
        let mut settings = Settings::default();

        if let Ok(raw) = std::env::var("SITELOG_FORMAT") {
            match parse_format(&raw) {
                Some(format) => settings.format = format,
                None => note_invalid("SITELOG_FORMAT", &raw),
            }
        }

        if let Ok(raw) = std::env::var("SITELOG_MAX_DEPTH") {
            match raw.trim().parse::<u32>() {
                Ok(depth) => settings.max_depth = depth,
                Err(_) => note_invalid("SITELOG_MAX_DEPTH", &raw),
            }
        }

        if let Ok(raw) = std::env::var("SITELOG_TO_STDERR") {
            settings.log_to_stderr = parse_truthy(&raw);
        }

        settings.extra_fields = field_map_from_env("SITELOG_EXTRA_FIELDS");
        settings.error_extra_fields = field_map_from_env("SITELOG_ERROR_EXTRA_FIELDS");

        settings
    }
}

fn parse_format(raw: &str) -> Option<OutputFormat> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("pretty") {
        Some(OutputFormat::Pretty)
    } else if trimmed.eq_ignore_ascii_case("json") {
        Some(OutputFormat::Json)
    } else {
        None
    }
}

fn parse_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse an env var holding a JSON object of record fields
fn field_map_from_env(var: &str) -> Map<String, serde_json::Value> {
    let raw = match std::env::var(var) {
        Ok(raw) => raw,
        Err(_) => return Map::new(),
    };
    match parse_field_map(&raw) {
        Some(fields) => fields,
        None => {
            note_invalid(var, &raw);
            Map::new()
        }
    }
}

fn parse_field_map(raw: &str) -> Option<Map<String, serde_json::Value>> {
    if raw.trim().is_empty() {
        return Some(Map::new());
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(fields)) => Some(fields),
        _ => None,
    }
}

fn note_invalid(var: &str, value: &str) {
    eprintln!("sitelog: ignoring invalid {var}={value:?}");
}
