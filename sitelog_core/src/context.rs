//! Context derivation from calling file paths.
//!
//! A bundle's context is the calling file path with the configured root
//! stripped, usually a repo-relative path. The root defaults to the
//! process working directory; `file!()` already yields workspace-relative
//! paths, which pass through untouched.

use regex::Regex;
use std::path::{Path, PathBuf};

/// Root to strip from calling file paths
#[derive(Clone, Debug)]
pub enum Root {
    /// Literal path prefix
    Path(PathBuf),
    /// Regex stripped when it matches at the start of the path
    Pattern(Regex),
}

impl Default for Root {
    fn default() -> Self {
        Root::Path(std::env::current_dir().unwrap_or_else(|_| PathBuf::new()))
    }
}

/// Strip the root from a file path to produce a bundle context.
///
/// Paths outside the root pass through unchanged.
pub fn derive(filename: &str, root: &Root) -> String {
    match root {
        Root::Path(prefix) => match Path::new(filename).strip_prefix(prefix) {
            Ok(stripped) => stripped
                .to_string_lossy()
                .trim_start_matches('/')
                .to_string(),
            Err(_) => filename.to_string(),
        },
        Root::Pattern(regex) => match regex.find(filename) {
            Some(m) if m.start() == 0 => filename[m.end()..].trim_start_matches('/').to_string(),
            _ => filename.to_string(),
        },
    }
}
