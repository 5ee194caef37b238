//! Asset configuration.
//!
//! Loads the config file that lists the glob patterns for each asset
//! category and resolves where the output goes.
//!
//! ## Config File
//!
//! ```toml
//! # Output directory, relative to this file (or absolute).
//! out = "dist"
//!
//! scripts = ["js/**/*.js"]
//! styles = ["css/*.css"]
//! random = ["img/*.png", "robots.txt"]
//! ```
//!
//! Every key is optional. Unknown keys are rejected to catch typos early.
//!
//! ## Formats
//!
//! The format follows the file extension: `.yaml`/`.yml` files are read as
//! YAML, everything else as TOML. Without `--config`, the working directory
//! is searched for `assetgen.toml`, then `assetgen.yaml`, then `assetgen.yml`.
//! The YAML form uses the same keys:
//!
//! ```yaml
//! out: dist
//! scripts:
//!   - "js/**/*.js"
//! ```
//!
//! ## Output Directory
//!
//! The `--out` flag wins over `out` in the config. A relative `--out` is
//! taken from the current working directory; a relative `out` from the
//! directory holding the config file. With neither, loading fails.

use crate::manifest::Category;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file names looked up when no `--config` is given, in order.
pub const DEFAULT_CONFIG_FILENAMES: &[&str] = &["assetgen.toml", "assetgen.yaml", "assetgen.yml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("no output path specified: pass --out or set `out` in the config")]
    NoOutputPath,
}

/// Patterns per category plus an optional output path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    pub styles: Vec<String>,
    pub scripts: Vec<String>,
    pub random: Vec<String>,
    pub out: Option<String>,
}

impl AssetConfig {
    pub fn patterns(&self, category: Category) -> &[String] {
        match category {
            Category::Scripts => &self.scripts,
            Category::Styles => &self.styles,
            Category::Random => &self.random,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Toml,
        }
    }
}

pub fn parse_config(content: &str, format: ConfigFormat) -> Result<AssetConfig, ConfigError> {
    let config: AssetConfig = match format {
        ConfigFormat::Toml => toml::from_str(content)?,
        // An empty YAML document is `null`, not an empty mapping.
        ConfigFormat::Yaml if content.trim().is_empty() => AssetConfig::default(),
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// The first of [`DEFAULT_CONFIG_FILENAMES`] present in `dir`.
///
/// Falls back to `dir/assetgen.toml` when none exists, so the load error
/// names the preferred file.
pub fn find_config(dir: &Path) -> PathBuf {
    DEFAULT_CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .unwrap_or_else(|| dir.join(DEFAULT_CONFIG_FILENAMES[0]))
}

/// Read and parse the config file at `path`.
pub fn load_config(path: &Path) -> Result<AssetConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, ConfigFormat::from_path(path))
}

/// Pick the output directory.
///
/// `cwd` anchors a relative override; `config_dir` anchors a relative `out`.
pub fn resolve_output_dir(
    override_dir: Option<&Path>,
    config: &AssetConfig,
    config_dir: &Path,
    cwd: &Path,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = override_dir {
        return Ok(cwd.join(dir));
    }
    match config.out.as_deref() {
        Some(out) => Ok(config_dir.join(out)),
        None => Err(ConfigError::NoOutputPath),
    }
}

/// Returns a commented stock `assetgen.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# assetgen configuration
# ======================
#
# Patterns are resolved relative to the directory holding this file and may
# use `*`, `?`, `[...]` within a path segment and `**` across directories.
# Matched files are copied to the same relative path under `out`.

# Output directory. Relative paths are taken from this file's directory.
# Overridden by `assetgen generate --out <DIR>`.
out = "dist"

# JavaScript and other script files.
scripts = []

# Stylesheets.
styles = []

# Anything else: images, fonts, robots.txt, ...
random = []
"##
}
