//! Core domain types for the sitelog façade.
//!
//! This module defines the values that cross the logging boundary:
//! - Severity levels and their routing flags
//! - The tagged value model (`LogValue`, `LogMap`)
//! - Flattened exception projections (`ErrorShape`)
//! - The canonical emitted record (`LogRecord`)
//! - Deferred arguments for lazy loggers (`LazyValue`)

use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

// ============================================================================
// Severity
// ============================================================================

/// Severity level of a log record, in ascending order of urgency
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Log,
    Warn,
    Error,
    Emergency,
}

impl Severity {
    /// All severities, ascending
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Log,
        Severity::Warn,
        Severity::Error,
        Severity::Emergency,
    ];

    /// Uppercase name as it appears in labels and serialized records
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Log => "LOG",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Emergency => "EMERGENCY",
        }
    }

    /// Whether records of this severity also feed the error side channel
    /// and pick up the error-reporting extra fields.
    pub fn has_error_channel(self) -> bool {
        matches!(self, Severity::Error | Severity::Emergency)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "LOG" => Ok(Severity::Log),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            "EMERGENCY" => Ok(Severity::Emergency),
            other => Err(crate::Error::Config(format!("unknown severity: {other}"))),
        }
    }
}

// ============================================================================
// Value Model
// ============================================================================

/// A value crossing the logging boundary.
///
/// Arguments are resolved into this closed set once, at the call site,
/// so the rest of the pipeline never inspects concrete Rust types.
#[derive(Clone, Debug, PartialEq)]
pub enum LogValue {
    /// Absent or null payload
    Null,
    Bool(bool),
    /// Integer or float with JSON semantics
    Number(serde_json::Number),
    Str(String),
    /// Ordered sequence
    Seq(Vec<LogValue>),
    /// Keyed mapping, optionally tagged with a runtime type name
    Map(LogMap),
    /// A flattened exception
    Error(ErrorShape),
    /// An opaque callable; never invoked, rendered as a fixed placeholder
    Callable,
}

impl LogValue {
    /// True for the primitive kinds eligible for the simple message path
    pub fn is_simple(&self) -> bool {
        matches!(
            self,
            LogValue::Null | LogValue::Bool(_) | LogValue::Number(_) | LogValue::Str(_)
        )
    }

    /// Capture a live Rust error as a log value
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        LogValue::Error(ErrorShape::from_error(err))
    }

    /// Convert any `Serialize` value into the tagged model.
    ///
    /// Struct-like values become maps tagged with the value's short type
    /// name, which is what custom formatters and `extra_types_for_message`
    /// match against.
    pub fn from_serialize<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => match LogValue::from(json) {
                LogValue::Map(map) => LogValue::Map(map.with_tag(short_type_name::<T>())),
                other => other,
            },
            Err(e) => LogValue::Str(format!("<unserializable: {e}>")),
        }
    }
}

impl From<&str> for LogValue {
    fn from(v: &str) -> Self {
        LogValue::Str(v.to_string())
    }
}

impl From<String> for LogValue {
    fn from(v: String) -> Self {
        LogValue::Str(v)
    }
}

impl From<bool> for LogValue {
    fn from(v: bool) -> Self {
        LogValue::Bool(v)
    }
}

impl From<i32> for LogValue {
    fn from(v: i32) -> Self {
        LogValue::Number(serde_json::Number::from(v))
    }
}

impl From<i64> for LogValue {
    fn from(v: i64) -> Self {
        LogValue::Number(serde_json::Number::from(v))
    }
}

impl From<u32> for LogValue {
    fn from(v: u32) -> Self {
        LogValue::Number(serde_json::Number::from(v))
    }
}

impl From<u64> for LogValue {
    fn from(v: u64) -> Self {
        LogValue::Number(serde_json::Number::from(v))
    }
}

impl From<f64> for LogValue {
    fn from(v: f64) -> Self {
        // Non-finite floats have no JSON form
        serde_json::Number::from_f64(v)
            .map(LogValue::Number)
            .unwrap_or(LogValue::Null)
    }
}

impl From<ErrorShape> for LogValue {
    fn from(v: ErrorShape) -> Self {
        LogValue::Error(v)
    }
}

impl From<LogMap> for LogValue {
    fn from(v: LogMap) -> Self {
        LogValue::Map(v)
    }
}

impl From<Vec<LogValue>> for LogValue {
    fn from(v: Vec<LogValue>) -> Self {
        LogValue::Seq(v)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => LogValue::Null,
            serde_json::Value::Bool(b) => LogValue::Bool(b),
            serde_json::Value::Number(n) => LogValue::Number(n),
            serde_json::Value::String(s) => LogValue::Str(s),
            serde_json::Value::Array(items) => {
                LogValue::Seq(items.into_iter().map(LogValue::from).collect())
            }
            serde_json::Value::Object(obj) => {
                let mut map = LogMap::new();
                for (key, value) in obj {
                    map.insert(key, LogValue::from(value));
                }
                LogValue::Map(map)
            }
        }
    }
}

/// Ordered key/value mapping with an optional runtime type tag.
///
/// Entries keep insertion order; inserting an existing key replaces its
/// value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogMap {
    tag: Option<String>,
    entries: Vec<(String, LogValue)>,
}

impl LogMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a runtime type tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Insert a key, replacing an existing entry in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<LogValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Builder-style insert
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<LogValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&LogValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// Remove a key, returning its value if present
    pub fn remove(&mut self, key: &str) -> Option<LogValue> {
        let idx = self.entries.iter().position(|(k, _)| k.as_str() == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, LogValue)> for LogMap {
    fn from_iter<I: IntoIterator<Item = (String, LogValue)>>(iter: I) -> Self {
        let mut map = LogMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Last path segment of a type name, generics stripped.
///
/// `std::io::Error` becomes `Error`, `Vec<Foo>` becomes `Vec`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.strip_prefix("dyn ").unwrap_or(full);
    let base = base.split('<').next().unwrap_or(base);
    base.rsplit("::").next().unwrap_or(base)
}

// ============================================================================
// Exception Projection
// ============================================================================

/// Flattened projection of an exception, independent of its source type.
///
/// `stack` starts with `"name: message"`, continues with the `source()`
/// chain, and ends with a captured backtrace when the process enables one
/// (`RUST_BACKTRACE`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorShape {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub stack: String,
}

impl ErrorShape {
    /// Build a shape by hand, for error conditions with no live error value
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();
        let stack = format!("{name}: {message}");
        Self {
            name,
            message,
            data: None,
            stack,
        }
    }

    /// Attach a structured payload that survives flattening into records
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Capture a live Rust error: short type name, display message, and a
    /// stack assembled from the cause chain plus a backtrace when enabled.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let name = short_type_name::<E>().to_string();
        let message = err.to_string();

        let mut stack = format!("{name}: {message}");
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\ncaused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }

        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            stack.push('\n');
            stack.push_str(&backtrace.to_string());
        }

        Self {
            name,
            message,
            data: None,
            stack,
        }
    }

    /// The `"name message\nstack"` form used when a shape becomes a
    /// record's message.
    pub fn flatten(&self) -> String {
        format!("{} {}\n{}", self.name, self.message, self.stack)
    }
}

// ============================================================================
// Canonical Record
// ============================================================================

/// The canonical record assembled for every enabled call.
///
/// `data` arrives pre-truncated to the configured depth. Absent `data` and
/// `error` fields are omitted from serialized output entirely, never
/// emitted as null.
#[derive(Clone, Debug, Serialize)]
pub struct LogRecord {
    pub severity: Severity,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub context: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorShape>,
}

// ============================================================================
// Lazy Arguments
// ============================================================================

/// An argument to a lazy logger: either an eager value or a deferred
/// computation invoked at most once, and only when the logger is enabled.
pub enum LazyValue {
    Eager(LogValue),
    Thunk(Box<dyn FnOnce() -> LogValue + Send>),
}

impl LazyValue {
    /// Resolve to a concrete value, running the thunk if one is present
    pub fn resolve(self) -> LogValue {
        match self {
            LazyValue::Eager(value) => value,
            LazyValue::Thunk(f) => f(),
        }
    }
}

impl<V: Into<LogValue>> From<V> for LazyValue {
    fn from(value: V) -> Self {
        LazyValue::Eager(value.into())
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LazyValue::Eager(value) => f.debug_tuple("Eager").field(value).finish(),
            LazyValue::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

/// Wrap a deferred computation for a lazy logger call.
///
/// The closure runs at most once, in argument order, and never runs when
/// the receiving logger is disabled.
pub fn thunk<V, F>(f: F) -> LazyValue
where
    V: Into<LogValue>,
    F: FnOnce() -> V + Send + 'static,
{
    LazyValue::Thunk(Box::new(move || f().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct OuterError {
        cause: std::io::Error,
    }

    impl fmt::Display for OuterError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer failed")
        }
    }

    impl std::error::Error for OuterError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.cause)
        }
    }

    #[test]
    fn test_severity_ordering_and_names() {
        assert!(Severity::Debug < Severity::Log);
        assert!(Severity::Error < Severity::Emergency);
        assert_eq!(Severity::Warn.as_str(), "WARN");
        assert_eq!(Severity::Emergency.to_string(), "EMERGENCY");
    }

    #[test]
    fn test_severity_error_channel() {
        assert!(!Severity::Debug.has_error_channel());
        assert!(!Severity::Log.has_error_channel());
        assert!(!Severity::Warn.has_error_channel());
        assert!(Severity::Error.has_error_channel());
        assert!(Severity::Emergency.has_error_channel());
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("error".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!("LOG".parse::<Severity>().unwrap(), Severity::Log);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<std::io::Error>(), "Error");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
        assert_eq!(short_type_name::<dyn std::error::Error>(), "Error");
        assert_eq!(short_type_name::<bool>(), "bool");
    }

    #[test]
    fn test_log_map_insert_replaces_in_place() {
        let mut map = LogMap::new();
        map.insert("a", 1i64);
        map.insert("b", 2i64);
        map.insert("a", 3i64);

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&LogValue::Number(3.into())));
    }

    #[test]
    fn test_log_map_remove() {
        let mut map = LogMap::new().entry("a", 1i64).entry("b", 2i64);
        assert_eq!(map.remove("a"), Some(LogValue::Number(1.into())));
        assert_eq!(map.remove("a"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_from_json_value() {
        let json = serde_json::json!({
            "name": "pump-7",
            "active": true,
            "readings": [1, 2.5, null],
        });
        let value = LogValue::from(json);

        let LogValue::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map.tag(), None);
        assert_eq!(map.get("name"), Some(&LogValue::Str("pump-7".into())));
        assert_eq!(map.get("active"), Some(&LogValue::Bool(true)));
        match map.get("readings") {
            Some(LogValue::Seq(items)) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[2], LogValue::Null);
            }
            other => panic!("expected seq, got {other:?}"),
        }
    }

    #[test]
    fn test_from_serialize_tags_struct_name() {
        #[derive(Serialize)]
        struct SensorReading {
            unit: &'static str,
            value: f64,
        }

        let value = LogValue::from_serialize(&SensorReading {
            unit: "kPa",
            value: 101.3,
        });
        let LogValue::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map.tag(), Some("SensorReading"));
        assert_eq!(map.get("unit"), Some(&LogValue::Str("kPa".into())));
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(LogValue::from(f64::NAN), LogValue::Null);
        assert_eq!(LogValue::from(12.5), LogValue::Number(serde_json::Number::from_f64(12.5).unwrap()));
    }

    #[test]
    fn test_error_shape_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let shape = ErrorShape::from_error(&err);

        assert_eq!(shape.name, "Error");
        assert_eq!(shape.message, "disk full");
        assert!(shape.stack.starts_with("Error: disk full"));
        assert_eq!(shape.data, None);
    }

    #[test]
    fn test_error_shape_includes_cause_chain() {
        let err = OuterError {
            cause: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let shape = ErrorShape::from_error(&err);

        assert_eq!(shape.name, "OuterError");
        assert!(shape.stack.contains("caused by: disk full"));
    }

    #[test]
    fn test_error_shape_flatten() {
        let shape = ErrorShape::new("Error", "boom");
        assert_eq!(shape.flatten(), "Error boom\nError: boom");
    }

    #[test]
    fn test_error_shape_serializes_without_absent_data() {
        let json = serde_json::to_value(ErrorShape::new("Error", "boom")).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["name"], "Error");

        let with_data =
            serde_json::to_value(ErrorShape::new("Error", "boom").with_data(serde_json::json!(7)))
                .unwrap();
        assert_eq!(with_data["data"], 7);
    }

    #[test]
    fn test_record_omits_absent_fields() {
        let record = LogRecord {
            severity: Severity::Log,
            timestamp: 1_700_000_000_000,
            context: "src/pump.rs".to_string(),
            message: "started".to_string(),
            data: None,
            error: None,
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["severity"], "LOG");
        assert!(json.get("data").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_lazy_value_eager_conversions() {
        assert_eq!(LazyValue::from("hi").resolve(), LogValue::Str("hi".into()));
        assert_eq!(LazyValue::from(42i64).resolve(), LogValue::Number(42.into()));
    }

    #[test]
    fn test_thunk_runs_only_on_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));

        let counted = calls.clone();
        let lazy = thunk(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            "computed"
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(lazy.resolve(), LogValue::Str("computed".into()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let counted = calls.clone();
        drop(thunk(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            "never"
        }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
