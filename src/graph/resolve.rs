// src/graph/resolve.rs

//! Lexical path resolution for import references.
//!
//! Nothing here touches the disk: existence is always checked separately by
//! callers.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` at the root of an absolute path is dropped, like `path.normalize`
/// in most runtimes.
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
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Append `.{default_extension}` when `path` has no extension.
pub fn with_default_extension(path: &Path, default_extension: &str) -> PathBuf {
    if path.extension().is_some() {
        return path.to_path_buf();
    }
    let mut s = path.as_os_str().to_os_string();
    s.push(".");
    s.push(default_extension);
    PathBuf::from(s)
}

/// Resolve an import reference found in a file living in `importer_dir`.
///
/// References that carry any extension are used as written; bare references
/// get the default source extension. Absolute references ignore
/// `importer_dir`.
pub fn resolve_import(importer_dir: &Path, reference: &str, default_extension: &str) -> PathBuf {
    let reference = with_default_extension(Path::new(reference.trim()), default_extension);
    normalize(&importer_dir.join(reference))
}
