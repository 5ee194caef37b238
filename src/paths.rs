//! Lexical path helpers shared by pattern resolution and the copy pipeline.
//!
//! Nothing here touches the filesystem: `..` is resolved against the path's
//! own components, never by following symlinks. Manifest paths always use `/`
//! regardless of platform.

use std::path::{Component, Path, PathBuf};

/// Remove `.` components and fold `..` into the preceding normal component.
///
/// A `..` directly below the root is dropped (`/..` is `/`). A `..` that
/// cannot be folded in a relative path is kept, so `../a` stays `../a`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Join the components of a relative path with `/`, replacing invalid
/// UTF-8. Suitable for matching and display, not for naming files.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Like [`to_slash`], but `None` when any component is not valid UTF-8.
pub fn try_to_slash(path: &Path) -> Option<String> {
    path.components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .map(|parts| parts.join("/"))
}

/// Express `path` relative to `base`.
///
/// Both sides are normalized first. Returns `None` when `path` is not inside
/// `base`.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path = normalize(path);
    let base = normalize(base);
    path.strip_prefix(&base).ok().map(Path::to_path_buf)
}
