//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Output → /site/dist (created)
//! Scripts (2 patterns)
//!     other.js  3f1a9c0e  copied
//!     subdir/inner.js  0b7d52aa  copied
//! Styles (1 pattern)
//!     test.css  91c2e4d7  copied
//! Random (0 patterns)
//! Manifest → /site/dist/manifest.json (3 assets)
//!
//! 3 assets: 2 scripts, 1 style, 0 random
//! ```
//!
//! ## Check
//!
//! ```text
//! Config: /site/assetgen.toml
//! Output: /site/dist
//!
//! Scripts
//!     *.js
//!         001 other.js
//!         002 test.js
//! Styles
//!     *.scss (no matches)
//!
//! 2 files matched
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` for testability; the
//! `print_*` wrappers write to stdout. Format functions are pure.

use crate::generate::{CheckReport, GenerateEvent, GenerateResult};
use crate::manifest::Category;

/// Digest prefix shown in progress lines.
const SHORT_HASH_LEN: usize = 8;

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

fn category_title(category: Category) -> &'static str {
    match category {
        Category::Scripts => "Scripts",
        Category::Styles => "Styles",
        Category::Random => "Random",
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..SHORT_HASH_LEN).unwrap_or(hash)
}

// ============================================================================
// Generate
// ============================================================================

/// Format a single generation event as display lines.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::OutputReady { path, created } => {
            let state = if *created { "created" } else { "exists" };
            vec![format!("Output \u{2192} {} ({})", path.display(), state)]
        }
        GenerateEvent::CategoryStarted { category, patterns } => {
            vec![format!(
                "{} ({})",
                category_title(*category),
                plural(*patterns, "pattern", "patterns")
            )]
        }
        GenerateEvent::AssetProcessed { asset, copied, .. } => {
            let action = if *copied { "copied" } else { "hashed" };
            vec![format!(
                "{}{}  {}  {}",
                indent(1),
                asset.path,
                short_hash(&asset.hash),
                action
            )]
        }
        GenerateEvent::ManifestWritten { path, assets } => {
            vec![format!(
                "Manifest \u{2192} {} ({})",
                path.display(),
                plural(*assets, "asset", "assets")
            )]
        }
    }
}

/// Format the closing summary of a generation run.
pub fn format_generate_summary(result: &GenerateResult) -> Vec<String> {
    let manifest = &result.manifest;
    let count = |category| manifest.assets(category).len();
    let mut lines = vec![
        String::new(),
        format!(
            "{}: {}, {}, {} random",
            plural(manifest.len(), "asset", "assets"),
            plural(count(Category::Scripts), "script", "scripts"),
            plural(count(Category::Styles), "style", "styles"),
            count(Category::Random)
        ),
    ];
    if manifest.is_empty() {
        lines.push("No files matched any pattern".to_string());
    }
    if result.manifest_path.is_none() {
        lines.push("Manifest not written (--no-manifest)".to_string());
    }
    lines
}

/// Print generation summary to stdout.
pub fn print_generate_summary(result: &GenerateResult) {
    for line in format_generate_summary(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the matches found by `check`, grouped by category and pattern.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![
        format!("Config: {}", report.config_path.display()),
        format!("Output: {}", report.output_dir.display()),
        String::new(),
    ];

    for (category, patterns) in &report.categories {
        lines.push(category_title(*category).to_string());
        if patterns.is_empty() {
            lines.push(format!("{}(no patterns)", indent(1)));
        }
        for pattern in patterns {
            if pattern.paths.is_empty() {
                lines.push(format!("{}{} (no matches)", indent(1), pattern.pattern));
                continue;
            }
            lines.push(format!("{}{}", indent(1), pattern.pattern));
            for (i, path) in pattern.paths.iter().enumerate() {
                lines.push(format!("{}{} {}", indent(2), format_index(i + 1), path));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} matched",
        plural(report.total_matches(), "file", "files")
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}
