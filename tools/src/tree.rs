//! Walking source trees: finding proto files and rendering a listing that
//! helps the user see why none were found.

use std::{
    fmt::Write,
    io,
    path::{Path, PathBuf},
};

use protosync_core::Result;
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn walk(dir: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
}

/// Find every `.proto` file below `dir`, recursively.
///
/// Paths are returned relative to `dir` and sorted. Dotfiles and
/// dot-directories (such as `.git`) are skipped.
pub fn find_protos(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut protos = Vec::new();

    for entry in walk(dir) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.path().extension().map_or(false, |ext| ext == "proto") {
            // strip_prefix can't fail: walkdir yields paths below `dir`.
            if let Ok(rel) = entry.path().strip_prefix(dir) {
                protos.push(rel.to_path_buf());
            }
        }
    }

    Ok(protos)
}

/// Render a recursive listing of `dir` for diagnostics.
///
/// One entry per line, indented two spaces per level. Directories are shown
/// as `name/`, files as `- name (N bytes)`. Dotfiles are skipped.
pub fn render(dir: &Path) -> Result<String> {
    let mut out = String::new();

    for entry in walk(dir) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.depth() == 0 {
            continue;
        }

        let indent = "  ".repeat(entry.depth() - 1);
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() {
            let _ = writeln!(out, "{}{}/", indent, name);
        } else {
            let len = entry.metadata().map_err(io::Error::from)?.len();
            let _ = writeln!(out, "{}- {} ({} bytes)", indent, name, len);
        }
    }

    Ok(out)
}

/// Like `render`, but says so when `dir` is missing or holds nothing to
/// list instead of returning an empty string.
pub fn describe(dir: &Path) -> Result<String> {
    if !dir.is_dir() {
        return Ok("(directory does not exist)\n".to_string());
    }

    let listing = render(dir)?;
    if listing.is_empty() {
        Ok("(empty)\n".to_string())
    } else {
        Ok(listing)
    }
}
