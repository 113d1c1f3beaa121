// src/compile/output.rs

//! Output naming and writing.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::compile::backend::CompiledArtifact;
use crate::config::Settings;
use crate::fs::FileSystem;

/// Output path for a compilation unit: the source's path relative to the
/// watch folder, re-rooted under the output folder, with the output
/// extension.
///
/// A source outside the watch folder (only possible for an odd main file)
/// lands directly in the output folder under its file name.
pub fn output_path_for(settings: &Settings, source: &Path) -> PathBuf {
    let relative = match source.strip_prefix(&settings.watch_folder) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => source
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| source.to_path_buf()),
    };
    settings
        .output_folder
        .join(relative)
        .with_extension(&settings.output_extension)
}

/// Path of the source map written next to `output`.
pub fn source_map_path(output: &Path) -> PathBuf {
    let mut s = output.as_os_str().to_os_string();
    s.push(".map");
    PathBuf::from(s)
}

/// Write a compiled artifact (and its source map, if any), returning the
/// paths written. Existing files are overwritten; nothing is deleted.
pub fn write_artifact(
    fs: &dyn FileSystem,
    output: &Path,
    artifact: &CompiledArtifact,
) -> Result<Vec<PathBuf>> {
    fs.write(output, artifact.css.as_bytes())?;
    let mut written = vec![output.to_path_buf()];

    if let Some(map) = &artifact.source_map {
        let map_path = source_map_path(output);
        fs.write(&map_path, map.as_bytes())?;
        written.push(map_path);
    }

    Ok(written)
}
