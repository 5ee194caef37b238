//! End-to-end tests for the `assetgen` binary.
//!
//! Each test copies `fixtures/site/` into a temp directory and runs the built
//! binary against it.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path());
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) {
    for entry in std::fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path).unwrap();
            copy_dir_recursive(&src_path, &dst_path);
        } else {
            std::fs::copy(&src_path, &dst_path).unwrap();
        }
    }
}

fn assetgen(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_assetgen"))
        .current_dir(cwd)
        .args(args)
        .output()
        .unwrap()
}

fn read_manifest(dir: &Path) -> Value {
    let content = std::fs::read_to_string(dir.join("manifest.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn paths(manifest: &Value, key: &str) -> Vec<String> {
    manifest[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["path"].as_str().unwrap().to_string())
        .collect()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn generate_copies_and_writes_manifest() {
    let site = setup_site();
    let out = assetgen(site.path(), &["generate"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let dist = site.path().join("dist");
    for file in ["test.js", "other.js", "subdir/inner.js", "test.css", "random.txt"] {
        assert!(dist.join(file).is_file(), "missing {file}");
    }

    let manifest = read_manifest(&dist);
    let keys: Vec<&String> = manifest.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 3);
    assert_eq!(
        paths(&manifest, "scripts"),
        vec!["other.js", "test.js", "subdir/inner.js"]
    );
    assert_eq!(paths(&manifest, "styles"), vec!["test.css"]);
    assert_eq!(paths(&manifest, "random"), vec!["random.txt"]);

    for key in ["styles", "scripts", "random"] {
        for asset in manifest[key].as_array().unwrap() {
            let hash = asset["hash"].as_str().unwrap();
            assert_eq!(hash.len(), 64);
            assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
            assert_eq!(asset.as_object().unwrap().len(), 2);
        }
    }

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("5 assets: 3 scripts, 1 style, 1 random"));
}

#[test]
fn generate_with_explicit_config_path() {
    let site = setup_site();
    let elsewhere = TempDir::new().unwrap();
    let config = site.path().join("assetgen.toml");

    let out = assetgen(
        elsewhere.path(),
        &["generate", "--config", config.to_str().unwrap()],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    // `out` in the config is relative to the config file, not the cwd
    assert!(site.path().join("dist/manifest.json").is_file());
    assert!(!elsewhere.path().join("dist").exists());
}

#[test]
fn no_copy_writes_only_manifest() {
    let site = setup_site();
    let out = assetgen(site.path(), &["generate", "--no-copy"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let dist = site.path().join("dist");
    let entries: Vec<PathBuf> = std::fs::read_dir(&dist)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries, vec![dist.join("manifest.json")]);
    assert_eq!(paths(&read_manifest(&dist), "scripts").len(), 3);
}

#[test]
fn no_manifest_still_copies() {
    let site = setup_site();
    let out = assetgen(site.path(), &["generate", "--no-manifest"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let dist = site.path().join("dist");
    assert!(dist.join("subdir/inner.js").is_file());
    assert!(!dist.join("manifest.json").exists());
}

#[test]
fn out_flag_is_relative_to_working_directory() {
    let site = setup_site();
    let cwd = TempDir::new().unwrap();
    let config = site.path().join("assetgen.toml");

    let out = assetgen(
        cwd.path(),
        &["generate", "--config", config.to_str().unwrap(), "--out", "build"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(cwd.path().join("build/manifest.json").is_file());
    assert!(!site.path().join("dist").exists());
}

#[test]
fn yaml_config_is_accepted() {
    let site = setup_site();
    std::fs::write(
        site.path().join("assetgen.yaml"),
        "out: public\nscripts:\n  - \"**/*.js\"\n",
    )
    .unwrap();

    let out = assetgen(site.path(), &["generate", "--config", "assetgen.yaml"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let manifest = read_manifest(&site.path().join("public"));
    assert_eq!(
        paths(&manifest, "scripts"),
        vec!["other.js", "subdir/inner.js", "test.js"]
    );
    assert!(paths(&manifest, "styles").is_empty());
}

#[test]
fn yaml_config_is_found_without_config_flag() {
    let site = setup_site();
    std::fs::remove_file(site.path().join("assetgen.toml")).unwrap();
    std::fs::write(
        site.path().join("assetgen.yaml"),
        "out: public\nstyles:\n  - \"*.css\"\n",
    )
    .unwrap();

    let out = assetgen(site.path(), &["generate"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let manifest = read_manifest(&site.path().join("public"));
    assert_eq!(paths(&manifest, "styles"), vec!["test.css"]);
    assert!(site.path().join("public/test.css").is_file());
}

#[test]
fn toml_config_wins_over_yaml() {
    let site = setup_site();
    std::fs::write(site.path().join("assetgen.yaml"), "out: public\n").unwrap();

    let out = assetgen(site.path(), &["generate"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(site.path().join("dist/manifest.json").is_file());
    assert!(!site.path().join("public").exists());
}

#[test]
fn rerun_produces_identical_manifest() {
    let site = setup_site();
    assert!(assetgen(site.path(), &["generate"]).status.success());
    let first = std::fs::read(site.path().join("dist/manifest.json")).unwrap();

    assert!(assetgen(site.path(), &["generate"]).status.success());
    let second = std::fs::read(site.path().join("dist/manifest.json")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn missing_output_path_fails() {
    let site = setup_site();
    std::fs::write(site.path().join("assetgen.toml"), "scripts = [\"*.js\"]\n").unwrap();

    let out = assetgen(site.path(), &["generate"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("no output path"));
}

#[test]
fn malformed_pattern_fails_without_manifest() {
    let site = setup_site();
    std::fs::write(
        site.path().join("assetgen.toml"),
        "out = \"dist\"\nscripts = [\"*.js\"]\nstyles = [\"[\"]\n",
    )
    .unwrap();

    let out = assetgen(site.path(), &["generate"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("pattern"));
    assert!(!site.path().join("dist/manifest.json").exists());
}

#[test]
fn missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let out = assetgen(tmp.path(), &["generate"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("assetgen.toml"));
}

#[cfg(target_os = "linux")]
#[test]
fn failed_progress_output_is_error() {
    let site = setup_site();
    let full = std::fs::OpenOptions::new()
        .write(true)
        .open("/dev/full")
        .unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_assetgen"))
        .current_dir(site.path())
        .arg("generate")
        .stdout(Stdio::from(full))
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("progress printer stopped"));
}

#[test]
fn unknown_flag_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    let out = assetgen(tmp.path(), &["generate", "--bogus"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn check_lists_matches_without_output() {
    let site = setup_site();
    let out = assetgen(site.path(), &["check"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("001 subdir/inner.js"));
    assert!(stdout.contains("5 files matched"));
    assert!(!site.path().join("dist").exists());
}

#[test]
fn gen_config_prints_valid_toml() {
    let tmp = TempDir::new().unwrap();
    let out = assetgen(tmp.path(), &["gen-config"]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let value: toml::Value = toml::from_str(&stdout).unwrap();
    assert_eq!(value["out"].as_str(), Some("dist"));
}
