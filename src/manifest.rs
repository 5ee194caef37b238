//! The asset manifest and its on-disk form.
//!
//! ## Format
//!
//! `manifest.json` is a JSON object with exactly three arrays, always in this
//! key order:
//!
//! ```json
//! {
//!   "styles": [{ "path": "css/site.css", "hash": "<64 lowercase hex chars>" }],
//!   "scripts": [],
//!   "random": []
//! }
//! ```
//!
//! `path` is relative to the directory holding the config file and always
//! uses `/`. `hash` is the SHA-256 digest of the file's bytes.
//!
//! ## Replacing the previous manifest
//!
//! The new manifest is written to a temporary sibling and renamed over
//! `manifest.json`. A failed write leaves any existing manifest untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the manifest file within the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

const TEMP_FILENAME: &str = ".manifest.json.tmp";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Asset category. Each maps to one config list and one manifest array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Scripts,
    Styles,
    Random,
}

impl Category {
    /// Processing order.
    pub const ALL: [Category; 3] = [Category::Scripts, Category::Styles, Category::Random];

    /// Key used in both the config file and the manifest.
    pub fn key(self) -> &'static str {
        match self {
            Category::Scripts => "scripts",
            Category::Styles => "styles",
            Category::Random => "random",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One copied (or hashed-only) file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Asset {
    pub path: String,
    pub hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub styles: Vec<Asset>,
    pub scripts: Vec<Asset>,
    pub random: Vec<Asset>,
}

impl Manifest {
    pub fn assets(&self, category: Category) -> &[Asset] {
        match category {
            Category::Scripts => &self.scripts,
            Category::Styles => &self.styles,
            Category::Random => &self.random,
        }
    }

    pub fn assets_mut(&mut self, category: Category) -> &mut Vec<Asset> {
        match category {
            Category::Scripts => &mut self.scripts,
            Category::Styles => &mut self.styles,
            Category::Random => &mut self.random,
        }
    }

    /// Total number of assets across all categories.
    pub fn len(&self) -> usize {
        self.styles.len() + self.scripts.len() + self.random.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Serialize and write `manifest.json` into `output_dir`, replacing any
    /// existing file. Returns the path written.
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf, ManifestError> {
        let json = self.to_json()?;
        let path = output_dir.join(MANIFEST_FILENAME);
        let temp = output_dir.join(TEMP_FILENAME);

        fs::write(&temp, json).map_err(|source| ManifestError::Io {
            path: temp.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&temp, &path) {
            fs::remove_file(&temp).ok();
            return Err(ManifestError::Io { path, source });
        }
        Ok(path)
    }
}
