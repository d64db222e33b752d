use clap::{Parser, Subcommand};
use serde_json::json;
use sitelog_core::{thunk, LogMap, LogValue, Logger, Matcher, Options, Severity};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sitelog")]
#[command(about = "File-scoped structured logging facade", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit sample records at every severity (default)
    Demo {
        /// Pattern list overriding the DEBUG environment variable
        #[arg(long)]
        pattern: Option<String>,

        /// Label prefix for the demo bundle
        #[arg(long, default_value = sitelog_core::DEFAULT_PREFIX)]
        prefix: String,
    },

    /// Report whether a severity/context pair is enabled
    Check {
        /// Severity to test (debug, log, warn, error, emergency)
        #[arg(long)]
        severity: String,

        /// Context to test, usually a repo-relative file path
        #[arg(long)]
        context: String,

        /// Pattern list overriding the DEBUG environment variable
        #[arg(long)]
        pattern: Option<String>,

        /// Label prefix
        #[arg(long, default_value = sitelog_core::DEFAULT_PREFIX)]
        prefix: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Demo { pattern, prefix }) => cmd_demo(pattern, prefix),
        Some(Commands::Check {
            severity,
            context,
            pattern,
            prefix,
        }) => cmd_check(&severity, &context, pattern, &prefix),
        None => cmd_demo(None, sitelog_core::DEFAULT_PREFIX.to_string()),
    }
}

/// Walk one bundle through every call shape the facade supports.
///
/// Which lines actually appear is decided by the pattern list; run with
/// `DEBUG='*'` (or `--pattern '*'`) to see everything, and set
/// `SITELOG_FORMAT=json` for line-delimited JSON.
fn cmd_demo(pattern: Option<String>, prefix: String) -> ExitCode {
    let mut options = Options::new().prefix(prefix);
    if let Some(pattern) = pattern {
        options = options.matcher(Matcher::new(&pattern));
    }
    let lgr = Logger::with_options(file!(), options);

    lgr.debug.with("cache warmed", json!({ "entries": 128, "elapsed_ms": 12 }));
    lgr.log.msg("service started");
    lgr.log.with(
        "request handled",
        json!({ "method": "GET", "path": "/health", "status": 200 }),
    );
    lgr.warn.with("queue depth above threshold", json!({ "depth": 512, "limit": 256 }));

    let disk = std::io::Error::new(std::io::ErrorKind::Other, "disk quota exceeded");
    lgr.error.err(&disk);

    let payload = LogMap::new()
        .entry("job", "nightly-flush")
        .entry("error", LogValue::error(&disk));
    lgr.emergency.with("flush failed, shutting down", payload);

    lgr.log.lazy.with(
        "expensive summary",
        thunk(|| {
            // marker proving the thunk only runs when the logger is enabled
            eprintln!("demo: thunk evaluated");
            json!({ "histogram": [1, 1, 2, 3, 5, 8] })
        }),
    );

    ExitCode::SUCCESS
}

fn cmd_check(severity: &str, context: &str, pattern: Option<String>, prefix: &str) -> ExitCode {
    let severity: Severity = match severity.parse() {
        Ok(severity) => severity,
        Err(_) => {
            let known = Severity::ALL.map(|s| s.as_str().to_lowercase()).join(", ");
            eprintln!("Unknown severity: {severity}. Expected one of: {known}.");
            return ExitCode::from(2);
        }
    };

    let matcher = match &pattern {
        Some(pattern) => Matcher::new(pattern),
        None => Matcher::from_env(),
    };

    let label = sitelog_core::enable::label(prefix, severity, context);
    if matcher.is_enabled(&label) {
        println!("{label} enabled");
        ExitCode::SUCCESS
    } else {
        println!("{label} disabled");
        ExitCode::from(1)
    }
}
