//! Argument classification: reducing a call's argument list to the
//! canonical message/data/error triple.
//!
//! Accepted shapes form a closed set:
//! - `[message]`: a single string
//! - `[error]`: a single exception value
//! - `[message, payload]`: string message plus structured payload, which
//!   may embed an exception under its `error` or `err` key
//!
//! Anything else is an invalid invocation. Classification still produces
//! a best-effort record so the call is never silently dropped; the caller
//! reports the misuse on the diagnostic channel.

use crate::render;
use crate::types::{ErrorShape, LogMap, LogValue};

/// Message used when an invalid invocation leaves nothing to salvage
pub const FALLBACK_MESSAGE: &str = "(invalid log call)";

/// Canonical reduction of one call's arguments
#[derive(Clone, Debug)]
pub struct Classified {
    pub message: String,
    pub data: Option<LogValue>,
    pub error: Option<ErrorShape>,
    /// Present when the arguments matched no accepted shape
    pub misuse: Option<Misuse>,
}

/// Details of an invalid invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Misuse {
    pub arg_count: usize,
}

impl Misuse {
    /// One-line description for the diagnostic channel
    pub fn describe(&self) -> String {
        format!(
            "invalid log invocation: got {} argument(s), expected 1 or 2",
            self.arg_count
        )
    }
}

/// Classify an argument list into the canonical record parts.
///
/// `extra_types` names the map tags inlined into the message in the
/// best-effort path; `max_depth` bounds that inline rendering.
pub fn classify(args: Vec<LogValue>, extra_types: &[String], max_depth: u32) -> Classified {
    match args.len() {
        1 => classify_one(args, extra_types, max_depth),
        2 => classify_two(args, extra_types, max_depth),
        _ => fallback(args, extra_types, max_depth),
    }
}

fn classify_one(mut args: Vec<LogValue>, extra_types: &[String], max_depth: u32) -> Classified {
    match args.pop() {
        Some(LogValue::Str(text)) => Classified {
            message: render::strip_newlines(&text),
            data: None,
            error: None,
            misuse: None,
        },
        Some(LogValue::Error(shape)) => {
            let message = shape.flatten();
            Classified {
                message,
                data: None,
                error: Some(shape),
                misuse: None,
            }
        }
        Some(other) => fallback(vec![other], extra_types, max_depth),
        None => fallback(Vec::new(), extra_types, max_depth),
    }
}

fn classify_two(mut args: Vec<LogValue>, extra_types: &[String], max_depth: u32) -> Classified {
    let payload = args.pop();
    let first = args.pop();
    match (first, payload) {
        (Some(LogValue::Str(text)), Some(payload)) => {
            let message = render::strip_newlines(&text);
            match extract_error(payload) {
                Extraction::Value(shape) => Classified {
                    message: join_error(&message, &shape),
                    data: None,
                    error: Some(shape),
                    misuse: None,
                },
                Extraction::FromMap(shape, rest) => {
                    let data = if rest.is_empty() {
                        None
                    } else {
                        Some(LogValue::Map(rest))
                    };
                    Classified {
                        message: join_error(&message, &shape),
                        data,
                        error: Some(shape),
                        misuse: None,
                    }
                }
                Extraction::None(payload) => Classified {
                    message,
                    data: Some(simplify_payload(payload)),
                    error: None,
                    misuse: None,
                },
            }
        }
        (Some(first), Some(payload)) => fallback(vec![first, payload], extra_types, max_depth),
        _ => fallback(Vec::new(), extra_types, max_depth),
    }
}

/// Best-effort reduction for invalid shapes: simple arguments join the
/// message, registered extra-type maps render into the message, everything
/// else lands in `data`, and the first embedded exception is extracted.
fn fallback(args: Vec<LogValue>, extra_types: &[String], max_depth: u32) -> Classified {
    let arg_count = args.len();
    let mut message_parts: Vec<String> = Vec::new();
    let mut leftovers: Vec<LogValue> = Vec::new();
    let mut error: Option<ErrorShape> = None;

    for arg in args {
        let arg = if error.is_none() {
            match extract_error(arg) {
                Extraction::Value(shape) => {
                    error = Some(shape);
                    continue;
                }
                Extraction::FromMap(shape, rest) => {
                    error = Some(shape);
                    if rest.is_empty() {
                        continue;
                    }
                    LogValue::Map(rest)
                }
                Extraction::None(arg) => arg,
            }
        } else {
            arg
        };

        if arg.is_simple() {
            message_parts.push(render::render_simple(&arg));
        } else if is_extra_type(&arg, extra_types) {
            message_parts.push(render::render(&arg, max_depth));
        } else {
            leftovers.push(arg);
        }
    }

    let mut message = message_parts.join(" ");
    if message.is_empty() {
        message = match &error {
            Some(shape) => shape.flatten(),
            None => FALLBACK_MESSAGE.to_string(),
        };
    }

    let data = match leftovers.len() {
        0 => None,
        1 => leftovers.into_iter().next(),
        _ => Some(LogValue::Seq(leftovers)),
    };

    Classified {
        message,
        data,
        error,
        misuse: Some(Misuse { arg_count }),
    }
}

enum Extraction {
    /// The value itself was an exception
    Value(ErrorShape),
    /// An exception was found under `error`/`err`; the rest of the map
    /// remains
    FromMap(ErrorShape, LogMap),
    /// No embedded exception; the value is returned untouched
    None(LogValue),
}

/// Find an embedded exception: the value itself, else its direct `error`
/// entry, else its direct `err` entry. First match wins and is consumed.
fn extract_error(value: LogValue) -> Extraction {
    match value {
        LogValue::Error(shape) => Extraction::Value(shape),
        LogValue::Map(mut map) => {
            for key in ["error", "err"] {
                if matches!(map.get(key), Some(LogValue::Error(_))) {
                    if let Some(LogValue::Error(shape)) = map.remove(key) {
                        return Extraction::FromMap(shape, map);
                    }
                }
            }
            Extraction::None(LogValue::Map(map))
        }
        other => Extraction::None(other),
    }
}

/// `"<message> | <flattened error>"` join for embedded exceptions
fn join_error(message: &str, shape: &ErrorShape) -> String {
    format!("{} | {}", message, shape.flatten())
}

/// Rule for the no-error payload: strings take the simple path, structured
/// values stay structural
fn simplify_payload(payload: LogValue) -> LogValue {
    match payload {
        LogValue::Str(s) => LogValue::Str(render::strip_newlines(&s)),
        other => other,
    }
}

fn is_extra_type(value: &LogValue, extra_types: &[String]) -> bool {
    match value {
        LogValue::Map(map) => map
            .tag()
            .map(|tag| extra_types.iter().any(|t| t == tag))
            .unwrap_or(false),
        _ => false,
    }
}
