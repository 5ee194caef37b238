//! Shared test utilities for the assetgen test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! write_files(tmp.path(), &[("extra/new.js", "console.log(1)")]);
//! assert_eq!(sha256_hex(b"abc").len(), 64);
//! ```

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::manifest::{Asset, Manifest};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// The fixture contains `assetgen.toml` (output `dist`) plus:
///
/// ```text
/// test.js  other.js  subdir/inner.js  test.css  random.txt
/// ```
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `(relative path, content)` pairs under `root`, creating parents.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let path = root.join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}

// =========================================================================
// Hashing and tree inspection
// =========================================================================

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Lowercase hex SHA-256 of the file at `path`.
pub fn hash_path(path: &Path) -> String {
    sha256_hex(&std::fs::read(path).unwrap())
}

/// All files below `root`, relative and slash-joined, sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| crate::paths::to_slash(e.path().strip_prefix(root).unwrap()))
        .collect();
    files.sort();
    files
}

/// Every asset in the manifest, in serialization order.
pub fn all_assets(manifest: &Manifest) -> Vec<&Asset> {
    manifest
        .styles
        .iter()
        .chain(&manifest.scripts)
        .chain(&manifest.random)
        .collect()
}

/// Paths of a category's assets, in manifest order.
pub fn asset_paths(assets: &[Asset]) -> Vec<&str> {
    assets.iter().map(|a| a.path.as_str()).collect()
}

/// Re-hash every asset's file under `root` and assert it matches.
pub fn assert_hashes_match(manifest: &Manifest, root: &Path) {
    for asset in all_assets(manifest) {
        let path: PathBuf = root.join(&asset.path);
        assert!(path.is_file(), "missing file for asset {}", asset.path);
        assert_eq!(
            hash_path(&path),
            asset.hash,
            "hash mismatch for {}",
            asset.path
        );
    }
}
