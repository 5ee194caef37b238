//! Copy-and-hash pipeline.
//!
//! Every matched file goes through one streaming pass: bytes are read from the
//! source, fed into a SHA-256 hasher, and written to a sink. The sink is the
//! mirrored destination file when copying, or [`std::io::sink`] when only
//! hashing, so the digest is the same in both modes.
//!
//! ```text
//! config_dir/sub/deep/b.js ──read──▶ Sha256 ──write──▶ output_dir/sub/deep/b.js
//!                                                  └──▶ io::sink()   (--no-copy)
//! ```
//!
//! Source and destination handles live only for the duration of a single
//! file. The first failure aborts the whole category.

use crate::manifest::Asset;
use crate::paths;
use crate::pattern::{self, PatternError};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUFFER_SIZE: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is outside of {}", path.display(), base.display())]
    OutsideBase { path: PathBuf, base: PathBuf },
    #[error("file name is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },
}

impl AssetError {
    fn io(path: &Path, source: io::Error) -> Self {
        AssetError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A matched file and its manifest path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub source: PathBuf,
    /// Path relative to the config directory.
    pub relative_path: PathBuf,
    /// `relative_path` joined with `/`, as written to the manifest.
    pub relative: String,
}

impl SourceFile {
    pub fn destination(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.relative_path)
    }
}

/// Resolve one pattern against `config_dir` and compute each match's
/// manifest path.
///
/// Fails with [`AssetError::OutsideBase`] when a match lies outside
/// `config_dir`, e.g. for patterns starting with `../`, and with
/// [`AssetError::NonUtf8Path`] when its relative path cannot be written to
/// the manifest unchanged.
pub fn sources_for_pattern(
    pattern: &str,
    config_dir: &Path,
    exclude: Option<&Path>,
) -> Result<Vec<SourceFile>, AssetError> {
    let resolved = pattern::resolve(config_dir, pattern, exclude)?;
    resolved
        .paths()
        .map(|source| {
            let Some(relative_path) = paths::relative_to(&source, config_dir) else {
                return Err(AssetError::OutsideBase {
                    path: source,
                    base: config_dir.to_path_buf(),
                });
            };
            let Some(relative) = paths::try_to_slash(&relative_path) else {
                return Err(AssetError::NonUtf8Path { path: source });
            };
            Ok(SourceFile {
                source,
                relative_path,
                relative,
            })
        })
        .collect()
}

/// Stream `source` through SHA-256 and return the lowercase hex digest.
///
/// With a `destination`, its parent directories are created and the bytes
/// are written there (overwriting). Without one, the bytes are discarded.
/// A destination equal to the source is only hashed.
pub fn copy_and_hash(source: &Path, destination: Option<&Path>) -> Result<String, AssetError> {
    let destination = destination.filter(|dest| paths::normalize(dest) != paths::normalize(source));

    let mut reader = File::open(source).map_err(|e| AssetError::io(source, e))?;

    let mut sink: Box<dyn Write> = match destination {
        Some(dest) => {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
            }
            Box::new(File::create(dest).map_err(|e| AssetError::io(dest, e))?)
        }
        None => Box::new(io::sink()),
    };
    let sink_path = destination.unwrap_or(source);

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(AssetError::io(source, e)),
        };
        hasher.update(&buffer[..read]);
        sink.write_all(&buffer[..read])
            .map_err(|e| AssetError::io(sink_path, e))?;
    }
    sink.flush().map_err(|e| AssetError::io(sink_path, e))?;

    Ok(format!("{:x}", hasher.finalize()))
}

/// Process every pattern of one category in declared order.
///
/// `on_asset` is called after each file with the new asset and whether it was
/// copied.
pub fn process_patterns(
    patterns: &[String],
    config_dir: &Path,
    output_dir: &Path,
    copy: bool,
    mut on_asset: impl FnMut(&Asset, bool),
) -> Result<Vec<Asset>, AssetError> {
    let mut assets = Vec::new();

    for pattern in patterns {
        for file in sources_for_pattern(pattern, config_dir, Some(output_dir))? {
            let destination = copy.then(|| file.destination(output_dir));
            let hash = copy_and_hash(&file.source, destination.as_deref())?;
            let asset = Asset {
                path: file.relative,
                hash,
            };
            on_asset(&asset, copy);
            assets.push(asset);
        }
    }

    Ok(assets)
}
