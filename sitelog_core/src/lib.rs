#![forbid(unsafe_code)]

//! File-scoped structured logging façade.
//!
//! This crate provides:
//! - Per-file logger bundles with five severities (`Logger`)
//! - `DEBUG`-pattern enablement resolved once at construction (`enable`)
//! - Argument classification into message/data/error records (`classify`)
//! - Depth-bounded rendering with custom formatters (`render`)
//! - Lazy call forms whose thunks never run while disabled
//!
//! ```
//! use sitelog_core::{Logger, Matcher, Options};
//!
//! let lgr = Logger::with_options(
//!     file!(),
//!     Options::new().matcher(Matcher::new("app:*")),
//! );
//! lgr.log.msg("service started");
//! lgr.log.with("request done", serde_json::json!({ "status": 200 }));
//! ```
//!
//! Output format, depth bound, and routing come from `SITELOG_*`
//! environment variables; see the `config` module.

pub mod classify;
pub mod config;
pub mod context;
pub mod enable;
pub mod error;
pub mod logger;
pub mod render;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use classify::{classify, Classified, Misuse};
pub use config::{OutputFormat, Settings};
pub use context::Root;
pub use enable::Matcher;
pub use error::{Error, Result};
pub use logger::{LazyLogger, Logger, LoggerHandle, Options, DEFAULT_PREFIX};
pub use render::{
    render, render_simple, set_custom_formatters, to_json, Formatter, DEFAULT_MAX_DEPTH,
};
pub use sink::{MemorySink, RecordSink, StderrSink, StdoutSink};
pub use types::{thunk, ErrorShape, LazyValue, LogMap, LogRecord, LogValue, Severity};
