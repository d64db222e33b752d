//! Enablement patterns for logger labels.
//!
//! Every handle is matched under a `prefix:SEVERITY:context` label. The
//! `DEBUG` environment variable holds a comma- or whitespace-separated
//! pattern list matched against whole labels:
//! - `*` matches any run of characters
//! - a leading `-` turns a pattern into an exclusion
//!
//! Precedence is exact exclusion, then exact match, then wildcard
//! exclusion, then wildcard match; unmatched labels are disabled, and an
//! empty pattern list disables everything.
//!
//! Examples:
//! - `DEBUG='app:*'` enables everything under the `app` prefix
//! - `DEBUG='app:ERROR:*'` enables only error loggers
//! - `DEBUG='app:*:src/engine.rs'` enables every severity of one file
//! - `DEBUG='app:*,-app:DEBUG:*'` enables everything except debug

use crate::types::Severity;
use once_cell::sync::Lazy;
use regex::Regex;

/// Build the label a handle is matched under
pub fn label(prefix: &str, severity: Severity, context: &str) -> String {
    format!("{}:{}:{}", prefix, severity.as_str(), context)
}

/// A compiled pattern list deciding label enablement
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    patterns: Vec<Pattern>,
}

#[derive(Clone, Debug)]
struct Pattern {
    negated: bool,
    kind: PatternKind,
}

#[derive(Clone, Debug)]
enum PatternKind {
    /// No wildcards: whole-label equality
    Exact(String),
    /// At least one `*`: an anchored regex over the whole label
    Wildcard(Regex),
}

static FROM_ENV: Lazy<Matcher> =
    Lazy::new(|| Matcher::new(&std::env::var("DEBUG").unwrap_or_default()));

impl Matcher {
    /// Compile a pattern list
    pub fn new(spec: &str) -> Self {
        let patterns = spec
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .filter_map(Pattern::compile)
            .collect();
        Self { patterns }
    }

    /// The process-wide matcher, compiled from `DEBUG` exactly once
    pub fn from_env() -> Matcher {
        FROM_ENV.clone()
    }

    /// True when the list contains no patterns (everything disabled)
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether a full `prefix:SEVERITY:context` label is enabled.
    ///
    /// Exact patterns outrank wildcards; exclusion wins at equal
    /// specificity.
    pub fn is_enabled(&self, label: &str) -> bool {
        let mut exact_allow = false;
        let mut wildcard_allow = false;
        let mut wildcard_deny = false;

        for pattern in &self.patterns {
            let hit = match &pattern.kind {
                PatternKind::Exact(text) => text == label,
                PatternKind::Wildcard(re) => re.is_match(label),
            };
            if !hit {
                continue;
            }
            match (&pattern.kind, pattern.negated) {
                (PatternKind::Exact(_), true) => return false,
                (PatternKind::Exact(_), false) => exact_allow = true,
                (PatternKind::Wildcard(_), true) => wildcard_deny = true,
                (PatternKind::Wildcard(_), false) => wildcard_allow = true,
            }
        }

        if exact_allow {
            return true;
        }
        if wildcard_deny {
            return false;
        }
        wildcard_allow
    }
}

impl Pattern {
    fn compile(raw: &str) -> Option<Pattern> {
        let (negated, body) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        if body.is_empty() {
            return None;
        }
        if !body.contains('*') {
            return Some(Pattern {
                negated,
                kind: PatternKind::Exact(body.to_string()),
            });
        }
        let anchored = format!("^{}$", regex::escape(body).replace(r"\*", ".*"));
        let regex = Regex::new(&anchored).ok()?;
        Some(Pattern {
            negated,
            kind: PatternKind::Wildcard(regex),
        })
    }
}
