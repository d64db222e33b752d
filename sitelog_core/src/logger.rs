//! Logger bundles and severity handles.
//!
//! `Logger::new(file!())` derives a context from the calling file and
//! builds five severity handles. Each handle resolves its enablement once,
//! at construction, against the `DEBUG` pattern list; a disabled handle is
//! a permanent no-op whose lazy variant never invokes thunks.
//!
//! Enabled handles run the full pipeline per call: classify the arguments,
//! assemble the canonical record, serialize it (pretty or JSON), and write
//! one line to the handle's sink. Invalid invocations additionally put one
//! diagnostic line on the error sink, and error-severity records duplicate
//! their exception to the error sink as a standalone JSON report.

use crate::classify;
use crate::config::{OutputFormat, Settings};
use crate::context::{self, Root};
use crate::enable::{self, Matcher};
use crate::render;
use crate::sink::{RecordSink, StderrSink, StdoutSink};
use crate::types::{ErrorShape, LazyValue, LogRecord, LogValue, Severity};
use chrono::Utc;
use regex::Regex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Default label prefix
pub const DEFAULT_PREFIX: &str = "app";

// ============================================================================
// Construction Options
// ============================================================================

/// Construction options for a logger bundle.
///
/// Defaults: context root is the process working directory, prefix `app`,
/// enablement from `DEBUG`, settings from the environment, stdout and
/// stderr stream sinks. Error and emergency handles write their records to
/// the error sink regardless of the primary sink.
#[derive(Clone, Default)]
pub struct Options {
    root: Option<Root>,
    prefix: Option<String>,
    extra_types_for_message: Vec<String>,
    log_to_stderr: bool,
    matcher: Option<Matcher>,
    settings: Option<Settings>,
    sink: Option<Arc<dyn RecordSink>>,
    error_sink: Option<Arc<dyn RecordSink>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path root stripped from the calling file when deriving the context
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(Root::Path(root.into()));
        self
    }

    /// Regex root; a match at the start of the path is stripped
    pub fn root_pattern(mut self, pattern: Regex) -> Self {
        self.root = Some(Root::Pattern(pattern));
        self
    }

    /// Label prefix (default `app`)
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Map tags rendered into the message instead of `data` when an
    /// invalid invocation is reduced best-effort
    pub fn extra_types_for_message<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_types_for_message = types.into_iter().map(Into::into).collect();
        self
    }

    /// Route every severity of this bundle to the error sink
    pub fn log_to_stderr(mut self) -> Self {
        self.log_to_stderr = true;
        self
    }

    /// Override the enablement matcher (default: compiled from `DEBUG`)
    pub fn matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Override the process-wide settings snapshot
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Override the primary output sink
    pub fn sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Override the error/diagnostic sink
    pub fn error_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.error_sink = Some(sink);
        self
    }
}

// ============================================================================
// Emit Pipeline
// ============================================================================

/// Shared innards of one severity handle
struct LoggerCore {
    severity: Severity,
    context: String,
    label: String,
    extra_types: Vec<String>,
    settings: Settings,
    sink: Arc<dyn RecordSink>,
    error_sink: Arc<dyn RecordSink>,
    /// Previous emit time (epoch ms) for the pretty `+<n>ms` suffix
    last_emit_ms: AtomicI64,
}

impl LoggerCore {
    fn emit(&self, args: Vec<LogValue>) {
        let classified = classify::classify(args, &self.extra_types, self.settings.max_depth);

        if let Some(misuse) = &classified.misuse {
            let diagnostic = format!("{} {}", self.label, misuse.describe());
            let _ = self.error_sink.write_line(&diagnostic);
        }

        let record = LogRecord {
            severity: self.severity,
            timestamp: Utc::now().timestamp_millis(),
            context: self.context.clone(),
            message: classified.message,
            data: classified
                .data
                .as_ref()
                .map(|value| render::to_json(value, self.settings.max_depth)),
            error: classified.error,
        };

        let line = match self.settings.format {
            OutputFormat::Json => self.json_line(&record),
            OutputFormat::Pretty => self.pretty_line(&record, classified.data.as_ref()),
        };
        let _ = self.sink.write_line(&line);

        if self.severity.has_error_channel() {
            if let Some(shape) = &record.error {
                let report = self.error_report_line(&record, shape);
                let _ = self.error_sink.write_line(&report);
            }
        }
    }

    /// `<label> <message> [data] +<n>ms`
    fn pretty_line(&self, record: &LogRecord, data: Option<&LogValue>) -> String {
        let mut line = format!("{} {}", self.label, record.message);
        if let Some(value) = data {
            line.push(' ');
            line.push_str(&render::render(value, self.settings.max_depth));
        }

        let previous = self.last_emit_ms.swap(record.timestamp, Ordering::Relaxed);
        let elapsed = if previous == 0 {
            0
        } else {
            (record.timestamp - previous).max(0)
        };
        line.push_str(&format!(" +{elapsed}ms"));
        line
    }

    /// One JSON object per line: record fields plus the label and the
    /// configured extra fields (record fields win on collision)
    fn json_line(&self, record: &LogRecord) -> String {
        let mut object = match serde_json::to_value(record) {
            Ok(serde_json::Value::Object(object)) => object,
            _ => serde_json::Map::new(),
        };
        object.insert(
            "label".to_string(),
            serde_json::Value::String(self.label.clone()),
        );

        for (key, value) in &self.settings.extra_fields {
            object.entry(key.clone()).or_insert_with(|| value.clone());
        }
        if self.severity.has_error_channel() && record.error.is_some() {
            for (key, value) in &self.settings.error_extra_fields {
                object.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }

        serde_json::to_string(&object).unwrap_or_else(|_| record.message.clone())
    }

    /// Standalone JSON report of an extracted exception, for collectors
    /// that only watch the error stream
    fn error_report_line(&self, record: &LogRecord, shape: &ErrorShape) -> String {
        let mut object = match serde_json::to_value(shape) {
            Ok(serde_json::Value::Object(object)) => object,
            _ => serde_json::Map::new(),
        };
        object.insert(
            "severity".to_string(),
            serde_json::Value::String(self.severity.to_string()),
        );
        object.insert(
            "context".to_string(),
            serde_json::Value::String(self.context.clone()),
        );
        object.insert(
            "timestamp".to_string(),
            serde_json::Value::Number(record.timestamp.into()),
        );
        for (key, value) in &self.settings.error_extra_fields {
            object.entry(key.clone()).or_insert_with(|| value.clone());
        }
        serde_json::to_string(&object).unwrap_or_else(|_| shape.flatten())
    }
}

// ============================================================================
// Handles
// ============================================================================

/// A callable logger bound to one `(severity, context)` pair.
///
/// Enablement was resolved at construction; a disabled handle returns
/// immediately from every method. The `lazy` field is the deferred entry
/// point whose thunks only ever run when the handle is enabled.
#[derive(Clone)]
pub struct LoggerHandle {
    enabled: bool,
    core: Arc<LoggerCore>,
    /// Lazy entry point; thunks never run when disabled
    pub lazy: LazyLogger,
}

impl LoggerHandle {
    fn build(core: Arc<LoggerCore>, enabled: bool) -> Self {
        let lazy = LazyLogger {
            core: enabled.then(|| core.clone()),
        };
        Self {
            enabled,
            core,
            lazy,
        }
    }

    /// Whether this handle emits anything at all
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The `prefix:SEVERITY:context` label this handle is matched under
    pub fn label(&self) -> &str {
        &self.core.label
    }

    /// Log a plain message
    pub fn msg(&self, text: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.core.emit(vec![LogValue::Str(text.into())]);
    }

    /// Log an exception on its own
    pub fn err<E: std::error::Error + ?Sized>(&self, error: &E) {
        if !self.enabled {
            return;
        }
        self.core.emit(vec![LogValue::error(error)]);
    }

    /// Log a message with a structured payload
    pub fn with(&self, text: impl Into<String>, payload: impl Into<LogValue>) {
        if !self.enabled {
            return;
        }
        self.core
            .emit(vec![LogValue::Str(text.into()), payload.into()]);
    }

    /// Log a raw argument list.
    ///
    /// Lists outside the accepted 1- and 2-argument shapes still produce a
    /// best-effort record plus one diagnostic line on the error sink.
    pub fn emit(&self, args: Vec<LogValue>) {
        if !self.enabled {
            return;
        }
        self.core.emit(args);
    }
}

/// Deferred entry point of a handle.
///
/// Wrapped from a disabled handle it holds nothing and drops arguments
/// without evaluating them. Wrapped from an enabled handle it expands
/// thunks in argument order, exactly once each, then hands the expanded
/// list to the normal pipeline.
#[derive(Clone)]
pub struct LazyLogger {
    core: Option<Arc<LoggerCore>>,
}

impl LazyLogger {
    pub fn enabled(&self) -> bool {
        self.core.is_some()
    }

    /// Lazy single-argument call
    pub fn msg(&self, value: impl Into<LazyValue>) {
        self.emit(vec![value.into()]);
    }

    /// Lazy two-argument call
    pub fn with(&self, message: impl Into<LazyValue>, payload: impl Into<LazyValue>) {
        self.emit(vec![message.into(), payload.into()]);
    }

    /// Lazy raw argument list
    pub fn emit(&self, args: Vec<LazyValue>) {
        let core = match &self.core {
            Some(core) => core,
            None => return,
        };
        let expanded = args.into_iter().map(LazyValue::resolve).collect();
        core.emit(expanded);
    }
}

// ============================================================================
// Bundle Factory
// ============================================================================

/// The five-severity bundle bound to one source file.
///
/// Typically constructed once per file and kept in a static:
///
/// ```
/// use once_cell::sync::Lazy;
/// use sitelog_core::Logger;
///
/// static LGR: Lazy<Logger> = Lazy::new(|| Logger::new(file!()));
///
/// LGR.log.msg("ready");
/// LGR.warn.with("queue depth", serde_json::json!({ "depth": 42 }));
/// ```
pub struct Logger {
    context: String,
    pub debug: LoggerHandle,
    pub log: LoggerHandle,
    pub warn: LoggerHandle,
    pub error: LoggerHandle,
    pub emergency: LoggerHandle,
}

impl Logger {
    /// Build a bundle for the calling file with default options
    pub fn new(filename: &str) -> Self {
        Self::with_options(filename, Options::default())
    }

    /// Build a bundle with explicit options
    pub fn with_options(filename: &str, options: Options) -> Self {
        let root = options.root.unwrap_or_default();
        let context = context::derive(filename, &root);
        let prefix = options
            .prefix
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let matcher = options.matcher.unwrap_or_else(Matcher::from_env);
        let settings = options
            .settings
            .unwrap_or_else(|| Settings::global().clone());

        let stdout: Arc<dyn RecordSink> =
            options.sink.unwrap_or_else(|| Arc::new(StdoutSink));
        let stderr: Arc<dyn RecordSink> =
            options.error_sink.unwrap_or_else(|| Arc::new(StderrSink));
        let to_stderr = options.log_to_stderr || settings.log_to_stderr;
        let extra_types = options.extra_types_for_message;

        let make = |severity: Severity| {
            let label = enable::label(&prefix, severity, &context);
            let enabled = matcher.is_enabled(&label);
            let primary = if severity.has_error_channel() || to_stderr {
                stderr.clone()
            } else {
                stdout.clone()
            };
            let core = Arc::new(LoggerCore {
                severity,
                context: context.clone(),
                label,
                extra_types: extra_types.clone(),
                settings: settings.clone(),
                sink: primary,
                error_sink: stderr.clone(),
                last_emit_ms: AtomicI64::new(0),
            });
            LoggerHandle::build(core, enabled)
        };

        let debug = make(Severity::Debug);
        let log = make(Severity::Log);
        let warn = make(Severity::Warn);
        let error = make(Severity::Error);
        let emergency = make(Severity::Emergency);

        Logger {
            context,
            debug,
            log,
            warn,
            error,
            emergency,
        }
    }

    /// The derived context shared by every handle
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Handle lookup by severity
    pub fn handle(&self, severity: Severity) -> &LoggerHandle {
        match severity {
            Severity::Debug => &self.debug,
            Severity::Log => &self.log,
            Severity::Warn => &self.warn,
            Severity::Error => &self.error,
            Severity::Emergency => &self.emergency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::types::{thunk, LogMap};
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn json_settings() -> Settings {
        Settings {
            format: OutputFormat::Json,
            ..Settings::default()
        }
    }

    fn create_test_logger(
        pattern: &str,
        settings: Settings,
    ) -> (Logger, Arc<MemorySink>, Arc<MemorySink>) {
        let out = Arc::new(MemorySink::new());
        let err = Arc::new(MemorySink::new());
        let logger = Logger::with_options(
            "src/plant.rs",
            Options::new()
                .matcher(Matcher::new(pattern))
                .settings(settings)
                .sink(out.clone())
                .error_sink(err.clone()),
        );
        (logger, out, err)
    }

    fn parse_only_line(sink: &MemorySink) -> serde_json::Value {
        let lines = sink.lines();
        assert_eq!(lines.len(), 1, "expected one line, got {lines:?}");
        serde_json::from_str(&lines[0]).unwrap()
    }

    #[test]
    fn test_context_and_labels() {
        let (logger, _, _) = create_test_logger("app:*", json_settings());
        assert_eq!(logger.context(), "src/plant.rs");
        assert_eq!(logger.warn.label(), "app:WARN:src/plant.rs");
        assert_eq!(logger.handle(Severity::Debug).label(), "app:DEBUG:src/plant.rs");
    }

    #[test]
    fn test_enablement_resolved_per_handle() {
        let (logger, _, _) = create_test_logger("app:ERROR:*", json_settings());
        assert!(!logger.debug.enabled());
        assert!(!logger.log.enabled());
        assert!(!logger.warn.enabled());
        assert!(logger.error.enabled());
        assert!(!logger.emergency.enabled());
    }

    #[test]
    fn test_disabled_handle_writes_nothing() {
        let (logger, out, err) = create_test_logger("", json_settings());
        logger.log.msg("dropped");
        logger.error.err(&std::io::Error::new(std::io::ErrorKind::Other, "x"));
        logger.log.emit(vec![]);
        assert!(out.lines().is_empty());
        assert!(err.lines().is_empty());
    }

    #[test]
    fn test_simple_message_record() {
        let (logger, out, err) = create_test_logger("app:*", json_settings());
        logger.log.msg("service started");

        let record = parse_only_line(&out);
        assert_eq!(record["severity"], "LOG");
        assert_eq!(record["context"], "src/plant.rs");
        assert_eq!(record["message"], "service started");
        assert_eq!(record["label"], "app:LOG:src/plant.rs");
        assert!(record["timestamp"].as_i64().unwrap() > 1_600_000_000_000);
        assert!(record.get("data").is_none());
        assert!(record.get("error").is_none());
        assert!(err.lines().is_empty());
    }

    #[test]
    fn test_message_with_data_record() {
        let (logger, out, _) = create_test_logger("app:*", json_settings());
        logger
            .log
            .with("request done", json!({ "status": 200, "path": "/health" }));

        let record = parse_only_line(&out);
        assert_eq!(record["message"], "request done");
        assert_eq!(record["data"]["status"], 200);
        assert_eq!(record["data"]["path"], "/health");
    }

    #[test]
    fn test_data_respects_depth_bound() {
        let settings = Settings {
            max_depth: 1,
            ..json_settings()
        };
        let (logger, out, _) = create_test_logger("app:*", settings);
        logger.log.with("deep", json!({ "outer": { "inner": 1 } }));

        let record = parse_only_line(&out);
        assert_eq!(record["data"]["outer"], "{ ? }");
    }

    #[test]
    fn test_error_routes_to_error_sink_with_report() {
        let (logger, out, err) = create_test_logger("app:*", json_settings());
        let disk = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        logger.error.err(&disk);

        // primary record goes to the error sink, stdout stays clean
        assert!(out.lines().is_empty());
        let lines = err.lines();
        assert_eq!(lines.len(), 2, "record + side-channel report: {lines:?}");

        let record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(record["severity"], "ERROR");
        assert_eq!(record["error"]["name"], "Error");
        assert_eq!(record["error"]["message"], "disk full");
        assert!(record["message"].as_str().unwrap().starts_with("Error disk full"));

        let report: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(report["name"], "Error");
        assert_eq!(report["severity"], "ERROR");
        assert_eq!(report["context"], "src/plant.rs");
        assert!(report["stack"].as_str().unwrap().starts_with("Error: disk full"));
    }

    #[test]
    fn test_embedded_error_consumed_from_payload() {
        let (logger, _, err) = create_test_logger("app:*", json_settings());
        let disk = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let payload = LogMap::new()
            .entry("job", "flush")
            .entry("error", LogValue::error(&disk));
        logger.error.with("flush failed", payload);

        let lines = err.lines();
        assert_eq!(lines.len(), 2);
        let record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert!(record["message"]
            .as_str()
            .unwrap()
            .starts_with("flush failed | Error disk full"));
        assert_eq!(record["data"]["job"], "flush");
        assert!(record["data"].get("error").is_none());
        assert_eq!(record["error"]["message"], "disk full");
    }

    #[test]
    fn test_warn_stays_on_primary_sink() {
        let (logger, out, err) = create_test_logger("app:*", json_settings());
        logger.warn.msg("queue backing up");
        assert_eq!(out.lines().len(), 1);
        assert!(err.lines().is_empty());
    }

    #[test]
    fn test_log_to_stderr_option_reroutes_all() {
        let out = Arc::new(MemorySink::new());
        let err = Arc::new(MemorySink::new());
        let logger = Logger::with_options(
            "src/plant.rs",
            Options::new()
                .matcher(Matcher::new("app:*"))
                .settings(json_settings())
                .log_to_stderr()
                .sink(out.clone())
                .error_sink(err.clone()),
        );
        logger.log.msg("rerouted");
        assert!(out.lines().is_empty());
        assert_eq!(err.lines().len(), 1);
    }

    #[test]
    fn test_invalid_invocation_reports_and_degrades() {
        let (logger, out, err) = create_test_logger("app:*", json_settings());
        logger.log.emit(vec![LogValue::from(1i64), LogValue::from(2i64), "x".into()]);

        let diagnostics = err.lines();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0],
            "app:LOG:src/plant.rs invalid log invocation: got 3 argument(s), expected 1 or 2"
        );

        let record = parse_only_line(&out);
        assert_eq!(record["message"], "1 2 x");
    }

    #[test]
    fn test_extra_fields_merged_without_overriding_record() {
        let mut settings = json_settings();
        settings
            .extra_fields
            .insert("service".to_string(), json!("ingest"));
        settings
            .extra_fields
            .insert("message".to_string(), json!("clobbered"));
        let (logger, out, _) = create_test_logger("app:*", settings);
        logger.log.msg("kept");

        let record = parse_only_line(&out);
        assert_eq!(record["service"], "ingest");
        assert_eq!(record["message"], "kept");
    }

    #[test]
    fn test_error_extra_fields_only_on_error_channel() {
        let mut settings = json_settings();
        settings
            .error_extra_fields
            .insert("reporter".to_string(), json!("pager"));
        let (logger, out, err) = create_test_logger("app:*", settings);

        logger.log.msg("plain");
        let plain = parse_only_line(&out);
        assert!(plain.get("reporter").is_none());

        let disk = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        logger.emergency.err(&disk);
        let lines = err.lines();
        let record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(record["reporter"], "pager");
        let report: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(report["reporter"], "pager");
        assert_eq!(report["severity"], "EMERGENCY");
    }

    #[test]
    fn test_pretty_line_shape() {
        let (logger, out, _) = create_test_logger("app:*", Settings::default());
        logger.log.with("cache warmed", json!({ "entries": 3 }));

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(
            line.starts_with("app:LOG:src/plant.rs cache warmed {\"entries\": 3} +"),
            "got {line}"
        );
        assert!(line.ends_with("ms"), "got {line}");
    }

    #[test]
    fn test_pretty_first_call_elapsed_is_zero() {
        let (logger, out, _) = create_test_logger("app:*", Settings::default());
        logger.log.msg("first");
        let lines = out.lines();
        assert!(lines[0].ends_with("+0ms"), "got {}", lines[0]);
    }

    #[test]
    fn test_lazy_thunks_run_once_in_order_when_enabled() {
        let (logger, out, _) = create_test_logger("app:*", json_settings());
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = order.clone();
        let second = order.clone();
        logger.log.lazy.with(
            thunk(move || {
                first.lock().unwrap().push("message");
                "built lazily"
            }),
            thunk(move || {
                second.lock().unwrap().push("payload");
                json!({ "cost": "high" })
            }),
        );

        assert_eq!(*order.lock().unwrap(), vec!["message", "payload"]);
        let record = parse_only_line(&out);
        assert_eq!(record["message"], "built lazily");
        assert_eq!(record["data"]["cost"], "high");
    }

    #[test]
    fn test_lazy_disabled_never_evaluates() {
        let (logger, out, err) = create_test_logger("app:ERROR:*", json_settings());
        let calls = Arc::new(AtomicUsize::new(0));

        assert!(!logger.log.lazy.enabled());
        let counted = calls.clone();
        logger.log.lazy.msg(thunk(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            "expensive"
        }));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(out.lines().is_empty());
        assert!(err.lines().is_empty());
    }

    #[test]
    fn test_lazy_eager_values_pass_through() {
        let (logger, out, _) = create_test_logger("app:*", json_settings());
        logger.log.lazy.with("plain", json!({ "n": 1 }));

        let record = parse_only_line(&out);
        assert_eq!(record["message"], "plain");
        assert_eq!(record["data"]["n"], 1);
    }

    #[test]
    fn test_custom_prefix_changes_labels() {
        let out = Arc::new(MemorySink::new());
        let err = Arc::new(MemorySink::new());
        let logger = Logger::with_options(
            "src/plant.rs",
            Options::new()
                .prefix("ops")
                .matcher(Matcher::new("ops:LOG:*"))
                .settings(json_settings())
                .sink(out.clone())
                .error_sink(err.clone()),
        );

        assert!(logger.log.enabled());
        assert!(!logger.warn.enabled());
        logger.log.msg("scoped");
        let record = parse_only_line(&out);
        assert_eq!(record["label"], "ops:LOG:src/plant.rs");
    }

    #[test]
    fn test_handles_share_context_not_state() {
        let (logger, out, err) = create_test_logger("app:*", json_settings());
        logger.debug.msg("one");
        logger.log.msg("two");
        assert_eq!(out.lines().len(), 2);
        assert!(err.lines().is_empty());
    }
}
