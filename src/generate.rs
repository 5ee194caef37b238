//! Manifest generation: the three category passes and manifest emission.
//!
//! ## Flow
//!
//! ```text
//! config file ─▶ AssetConfig ─▶ output dir (created if missing)
//!                     │
//!                     ├─ scripts ─┐
//!                     ├─ styles  ─┼─▶ Manifest ─▶ <out>/manifest.json
//!                     └─ random  ─┘
//! ```
//!
//! Categories run in the fixed order scripts → styles → random, patterns in
//! the order they are declared. Everything is sequential and the first error
//! aborts the run before the manifest is written.
//!
//! ## Progress
//!
//! Nothing here prints. Callers that want progress pass a
//! [`Sender<GenerateEvent>`] and render events themselves (see
//! [`crate::output`]).

use crate::assets::{self, AssetError};
use crate::config::{self, AssetConfig, ConfigError};
use crate::manifest::{Asset, Category, Manifest, ManifestError};
use crate::pattern::PatternError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("output path exists and is not a directory: {}", .0.display())]
    OutputNotDirectory(PathBuf),
}

/// Coarse classification of a [`GenerateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Pattern,
    Io,
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Config => "config",
            ErrorKind::Pattern => "pattern",
            ErrorKind::Io => "io",
            ErrorKind::Serialization => "serialization",
        })
    }
}

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::Config(_) => ErrorKind::Config,
            GenerateError::Asset(AssetError::Pattern(PatternError::Invalid { .. })) => {
                ErrorKind::Pattern
            }
            GenerateError::Asset(AssetError::Pattern(PatternError::Walk { .. })) => ErrorKind::Io,
            GenerateError::Asset(AssetError::OutsideBase { .. }) => ErrorKind::Pattern,
            GenerateError::Asset(AssetError::Io { .. })
            | GenerateError::Asset(AssetError::NonUtf8Path { .. }) => ErrorKind::Io,
            GenerateError::Manifest(ManifestError::Json(_)) => ErrorKind::Serialization,
            GenerateError::Manifest(ManifestError::Io { .. }) => ErrorKind::Io,
            GenerateError::Io { .. } | GenerateError::OutputNotDirectory(_) => ErrorKind::Io,
        }
    }
}

/// What the CLI asks for.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// `None` searches the working directory (see [`config::find_config`]).
    pub config_path: Option<PathBuf>,
    /// Overrides `out` from the config; relative to the working directory.
    pub out: Option<PathBuf>,
    pub copy: bool,
    pub write_manifest: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            out: None,
            copy: true,
            write_manifest: true,
        }
    }
}

/// Resolved inputs of a generation run.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory holding the config file; patterns resolve against it.
    pub config_dir: PathBuf,
    pub output_dir: PathBuf,
    pub copy: bool,
    pub write_manifest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateEvent {
    OutputReady {
        path: PathBuf,
        created: bool,
    },
    CategoryStarted {
        category: Category,
        patterns: usize,
    },
    AssetProcessed {
        category: Category,
        asset: Asset,
        copied: bool,
    },
    ManifestWritten {
        path: PathBuf,
        assets: usize,
    },
}

#[derive(Debug)]
pub struct GenerateResult {
    pub manifest: Manifest,
    pub output_dir: PathBuf,
    /// `None` when manifest writing was disabled.
    pub manifest_path: Option<PathBuf>,
}

/// Matches for one pattern, as reported by [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternReport {
    pub pattern: String,
    pub paths: Vec<String>,
}

#[derive(Debug)]
pub struct CheckReport {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    pub categories: Vec<(Category, Vec<PatternReport>)>,
}

impl CheckReport {
    pub fn total_matches(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|(_, patterns)| patterns)
            .map(|p| p.paths.len())
            .sum()
    }
}

fn emit(events: Option<&Sender<GenerateEvent>>, event: GenerateEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}

/// Absolute config path, its directory, and the parsed config.
fn load(config_path: Option<&Path>) -> Result<(PathBuf, PathBuf, AssetConfig), GenerateError> {
    let config_path = match config_path {
        Some(path) => std::path::absolute(path).map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        })?,
        None => config::find_config(&current_dir()?),
    };
    let config = config::load_config(&config_path)?;
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok((config_path, config_dir, config))
}

fn current_dir() -> Result<PathBuf, GenerateError> {
    std::env::current_dir().map_err(|source| GenerateError::Io {
        path: PathBuf::from("."),
        source,
    })
}

/// Create the output directory if it is missing. Only the leaf is created;
/// missing ancestors are an error. Returns whether it was created.
pub fn ensure_output_dir(path: &Path) -> Result<bool, GenerateError> {
    match fs::create_dir(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            if path.is_dir() {
                Ok(false)
            } else {
                Err(GenerateError::OutputNotDirectory(path.to_path_buf()))
            }
        }
        Err(source) => Err(GenerateError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load the config, prepare the output directory, and generate.
pub fn run(
    options: &GenerateOptions,
    events: Option<Sender<GenerateEvent>>,
) -> Result<GenerateResult, GenerateError> {
    let (_, config_dir, config) = load(options.config_path.as_deref())?;
    let output_dir = config::resolve_output_dir(
        options.out.as_deref(),
        &config,
        &config_dir,
        &current_dir()?,
    )?;

    let created = ensure_output_dir(&output_dir)?;
    emit(
        events.as_ref(),
        GenerateEvent::OutputReady {
            path: output_dir.clone(),
            created,
        },
    );

    let context = Context {
        config_dir,
        output_dir,
        copy: options.copy,
        write_manifest: options.write_manifest,
    };
    generate(&config, &context, events.as_ref())
}

/// Process all categories and write the manifest.
///
/// The output directory must already exist.
pub fn generate(
    config: &AssetConfig,
    context: &Context,
    events: Option<&Sender<GenerateEvent>>,
) -> Result<GenerateResult, GenerateError> {
    let mut manifest = Manifest::default();

    for category in Category::ALL {
        let patterns = config.patterns(category);
        emit(
            events,
            GenerateEvent::CategoryStarted {
                category,
                patterns: patterns.len(),
            },
        );
        let assets = assets::process_patterns(
            patterns,
            &context.config_dir,
            &context.output_dir,
            context.copy,
            |asset, copied| {
                emit(
                    events,
                    GenerateEvent::AssetProcessed {
                        category,
                        asset: asset.clone(),
                        copied,
                    },
                )
            },
        )?;
        *manifest.assets_mut(category) = assets;
    }

    let manifest_path = if context.write_manifest {
        let path = manifest.write(&context.output_dir)?;
        emit(
            events,
            GenerateEvent::ManifestWritten {
                path: path.clone(),
                assets: manifest.len(),
            },
        );
        Some(path)
    } else {
        None
    };

    Ok(GenerateResult {
        manifest,
        output_dir: context.output_dir.clone(),
        manifest_path,
    })
}

/// Resolve every pattern without copying, hashing, or creating anything.
///
/// Fails for the same config and pattern problems `run` would.
pub fn check(options: &GenerateOptions) -> Result<CheckReport, GenerateError> {
    let (config_path, config_dir, config) = load(options.config_path.as_deref())?;
    let output_dir = config::resolve_output_dir(
        options.out.as_deref(),
        &config,
        &config_dir,
        &current_dir()?,
    )?;

    let mut categories = Vec::new();
    for category in Category::ALL {
        let mut reports = Vec::new();
        for pattern in config.patterns(category) {
            let sources = assets::sources_for_pattern(pattern, &config_dir, Some(&output_dir))?;
            reports.push(PatternReport {
                pattern: pattern.clone(),
                paths: sources.into_iter().map(|s| s.relative).collect(),
            });
        }
        categories.push((category, reports));
    }

    Ok(CheckReport {
        config_path,
        output_dir,
        categories,
    })
}
