//! Glob pattern resolution.
//!
//! A pattern such as `assets/js/**/*.js` is split into a literal prefix
//! directory (`assets/js`) and a wildcard suffix (`**/*.js`). Only the prefix
//! directory is walked, and each file's path below it is matched against the
//! suffix.
//!
//! ## Syntax
//!
//! | Token | Matches |
//! |-------|---------|
//! | `*` | any run of characters within one path segment |
//! | `?` | any single character except `/` |
//! | `[abc]`, `[!a-z]` | one character from (or outside) the set |
//! | `**` | zero or more whole directories |
//! | `{a,b}` | either alternative; alternatives may nest and contain wildcards |
//!
//! `/` is the separator on every platform. Wildcards match dotfiles. A
//! pattern without wildcards names a single file. An unclosed `{` is an
//! error; a `}` outside any group is literal.
//!
//! ## Ordering
//!
//! Directory entries are visited sorted by file name, depth-first, so the
//! same tree always yields the same match order.

use crate::paths;
use glob::MatchOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const WILDCARDS: &[char] = &['*', '?', '[', '{'];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Files matched by one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The pattern's literal prefix, joined onto the resolution root and normalized.
    pub base: PathBuf,
    /// Matched regular files, relative to `base`.
    pub matches: Vec<PathBuf>,
}

impl Resolved {
    /// Matched files as full paths.
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.matches.iter().map(|m| self.base.join(m))
    }
}

/// Split a pattern at the last `/` that precedes its first wildcard.
///
/// ```text
/// "sub/**/*.js"  → ("sub", "**/*.js")
/// "*.css"        → ("", "*.css")
/// "/abs/x?.txt"  → ("/abs", "x?.txt")
/// "img/logo.png" → ("img", "logo.png")
/// ```
pub fn split_pattern(pattern: &str) -> (&str, &str) {
    let first_wildcard = pattern.find(WILDCARDS).unwrap_or(pattern.len());
    match pattern[..first_wildcard].rfind('/') {
        Some(0) => ("/", &pattern[1..]),
        Some(i) => (&pattern[..i], &pattern[i + 1..]),
        None => ("", pattern),
    }
}

/// Expand `{a,b}` groups into every concrete pattern, left to right.
///
/// ```text
/// "*.{js,css}"       → ["*.js", "*.css"]
/// "{a,b/{c,d}}/*.js" → ["a/*.js", "b/c/*.js", "b/d/*.js"]
/// ```
pub fn expand_braces(pattern: &str) -> Result<Vec<String>, glob::PatternError> {
    let Some(open) = pattern.find('{') else {
        return Ok(vec![pattern.to_string()]);
    };

    let mut depth = 0usize;
    let mut bounds = vec![open];
    let mut close = None;
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            ',' if depth == 1 => bounds.push(open + i),
            _ => {}
        }
    }
    let close = close.ok_or(glob::PatternError {
        pos: open,
        msg: "unclosed `{`",
    })?;
    bounds.push(close);

    let (head, tail) = (&pattern[..open], &pattern[close + 1..]);
    let mut expanded = Vec::new();
    for pair in bounds.windows(2) {
        let alternative = &pattern[pair[0] + 1..pair[1]];
        expanded.extend(expand_braces(&format!("{head}{alternative}{tail}"))?);
    }
    Ok(expanded)
}

/// Resolve `pattern` against `root`.
///
/// A missing prefix directory yields no matches. When `exclude` is given, that
/// directory and everything below it are skipped.
pub fn resolve(root: &Path, pattern: &str, exclude: Option<&Path>) -> Result<Resolved, PatternError> {
    let (prefix, suffix) = split_pattern(pattern);
    let invalid = |source: glob::PatternError| PatternError::Invalid {
        pattern: pattern.to_string(),
        source,
    };
    let alternatives = expand_braces(suffix).map_err(invalid)?;
    let matchers = alternatives
        .iter()
        .map(|alternative| glob::Pattern::new(alternative))
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)?;

    let base = paths::normalize(&root.join(prefix));
    let mut matches = Vec::new();
    if !base.is_dir() {
        return Ok(Resolved { base, matches });
    }

    let mut walker = WalkDir::new(&base)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if !alternatives.iter().any(|alt| alt.contains("**")) {
        let depth = alternatives.iter().map(|alt| alt.split('/').count()).max();
        walker = walker.max_depth(depth.unwrap_or(1));
    }

    let exclude = exclude.map(paths::normalize);
    let entries = walker
        .into_iter()
        .filter_entry(|entry| exclude.as_deref() != Some(entry.path()));

    for entry in entries {
        let entry = entry.map_err(|source| PatternError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base.clone()),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&base) else {
            continue;
        };
        let name = paths::to_slash(relative);
        if matchers.iter().any(|m| m.matches_with(&name, MATCH_OPTIONS)) {
            matches.push(relative.to_path_buf());
        }
    }

    Ok(Resolved { base, matches })
}
