// src/internal/pathvar/mod.rs

//! Condensing `:`-separated path lists such as `PATH`.

use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_ENV_VAR: &str = "PATH";
pub const SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathVarError {
    #[error("{0} was not found!")]
    NotFound(String),
}

/// Upper-cases `name` unless `force_lowercase` is set, which lower-cases it.
pub fn normalize_name(name: &str, force_lowercase: bool) -> String {
    if force_lowercase {
        name.to_lowercase()
    } else {
        name.to_uppercase()
    }
}

/// A path list before and after condensing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condensed {
    pub original: Vec<String>,
    pub condensed: Vec<String>,
}

impl Condensed {
    pub fn joined(&self) -> String {
        self.condensed.join(&SEPARATOR.to_string())
    }
}

/// Splits `value` on `:` after trimming whitespace and outer separators, keeps
/// entries for which `is_dir` holds, and drops repeats after their first
/// occurrence.
pub fn condense<F>(value: &str, is_dir: F) -> Condensed
where
    F: Fn(&str) -> bool,
{
    let trimmed = value.trim().trim_matches(SEPARATOR);
    let original: Vec<String> = trimmed.split(SEPARATOR).map(str::to_string).collect();

    let mut seen = HashSet::new();
    let mut condensed = Vec::new();
    for entry in &original {
        if is_dir(entry) && seen.insert(entry.clone()) {
            condensed.push(entry.clone());
        }
    }

    Condensed {
        original,
        condensed,
    }
}

/// Condenses the variable `name` as returned by `lookup`. A missing or empty
/// value is an error.
pub fn condense_var<L, F>(name: &str, lookup: L, is_dir: F) -> Result<Condensed, PathVarError>
where
    L: FnOnce(&str) -> Option<String>,
    F: Fn(&str) -> bool,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(condense(&value, is_dir)),
        _ => Err(PathVarError::NotFound(name.to_string())),
    }
}

/// [`condense_var`] against the process environment and filesystem.
pub fn condense_env(name: &str) -> Result<Condensed, PathVarError> {
    condense_var(
        name,
        |name| std::env::var(name).ok(),
        |entry| Path::new(entry).is_dir(),
    )
}
