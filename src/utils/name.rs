// src/utils/name.rs

//! Filename normalization.
//!
//! Maps an arbitrary archive-entry name to the canonical identity used for
//! snapshot membership and local file naming. Normalization must be
//! idempotent so identities stay stable across runs.

use std::sync::OnceLock;

use regex::Regex;

/// Whitespace optionally surrounding a literal hyphen
static HYPHENATED_RUN: OnceLock<Regex> = OnceLock::new();

/// Any run of whitespace
static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();

fn hyphenated_run() -> &'static Regex {
    HYPHENATED_RUN.get_or_init(|| Regex::new(r"\s*-\s*").expect("valid pattern"))
}

fn whitespace_run() -> &'static Regex {
    WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("valid pattern"))
}

/// Normalize a file name to its canonical form.
///
/// The stem (everything before the last `.`) is trimmed, lower-cased, and
/// whitespace runs are collapsed to single hyphens; `"a - b"`, `"a-  b"`
/// and `"a  -b"` all become `"a-b"`. The extension keeps its original
/// case. A name with an empty stem is returned unchanged so the result is
/// never a bare extension.
pub fn canonical_name(name: &str) -> String {
    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    };

    let stem = stem.trim();
    if stem.is_empty() {
        return name.to_string();
    }

    let stem = stem.to_lowercase();
    let stem = hyphenated_run().replace_all(&stem, "-");
    let stem = whitespace_run().replace_all(&stem, "-");
    format!("{stem}{ext}")
}
