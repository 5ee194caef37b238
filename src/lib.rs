//! # assetgen
//!
//! Generates a content-hash manifest for a site's static assets. A config
//! file lists glob patterns for three categories of files (scripts, styles,
//! and everything else); matched files are copied into an output directory
//! at the same relative path, and `manifest.json` records the SHA-256 of
//! each one.
//!
//! # Pipeline
//!
//! ```text
//! assetgen.toml ─▶ patterns ─▶ matched files ─▶ copy + hash ─▶ manifest.json
//! ```
//!
//! Every run reprocesses every matched file. There is no cache and no diff
//! against a previous manifest; identical inputs give a byte-identical
//! manifest.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Config file loading (TOML or YAML) and output-directory resolution |
//! | [`pattern`] | Glob splitting and matching against the filesystem |
//! | [`assets`] | Streaming copy-and-hash of matched files |
//! | [`manifest`] | `Asset`/`Manifest` types and the `manifest.json` writer |
//! | [`generate`] | Runs the category passes, emits progress events, `check` |
//! | [`output`] | CLI output formatting for events and reports |
//! | [`paths`] | Lexical path normalization and `/`-joined relative paths |
//!
//! # Design Decisions
//!
//! ## One Streaming Pass Per File
//!
//! Copying and hashing share a single read of the source. When copying is
//! turned off the bytes go to [`std::io::sink`] instead of a file, so the
//! emitted hash never depends on the copy mode.
//!
//! ## All-or-Nothing Runs
//!
//! The first error ends the run. The manifest is written last, through a
//! temporary file and a rename, so a failed run never replaces a good
//! manifest with a partial one.
//!
//! ## Events Instead of Printing
//!
//! The library never writes to stdout. Progress is reported as
//! [`generate::GenerateEvent`]s over an optional channel, and [`output`]
//! turns them into lines for the CLI.

pub mod assets;
pub mod config;
pub mod generate;
pub mod manifest;
pub mod output;
pub mod paths;
pub mod pattern;

#[cfg(test)]
pub(crate) mod test_helpers;
