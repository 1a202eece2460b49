//! Makefile recipe scanner

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::StoreResult;

/// A rule line: a plain target name at column 0 followed by a colon that
/// does not start an assignment (`NAME := value`)
#[allow(clippy::expect_used)]
static RECIPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^([A-Za-z0-9_-]+):(?:[^=\r\n].*)?$").expect("recipe regex must compile")
});

/// Extract recipe names from makefile text, in order of appearance
pub fn scan_recipes(makefile: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    RECIPE_RE
        .captures_iter(makefile)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Read a makefile and extract its recipes
pub fn load_recipes(path: impl AsRef<Path>) -> StoreResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(scan_recipes(&content))
}
