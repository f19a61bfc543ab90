// src/discovery.rs
use crate::error::{ForgeError, ForgeResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds every HTML document beneath `root`.
///
/// Entries are visited depth-first in file-name order so reports are
/// reproducible across runs.
///
/// # Errors
/// Returns error if `root` or any directory beneath it cannot be read.
pub fn find_html_files(root: &Path) -> ForgeResult<Vec<PathBuf>> {
    // WalkDir reports a missing root lazily; surface it with a precise context.
    std::fs::read_dir(root)
        .map_err(|e| ForgeError::filesystem("failed to read site directory", root, e))?;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    let mut files = Vec::new();
    for item in walker {
        let entry = item?;
        // Symlinked documents count; linked directories are not descended.
        if !entry.file_type().is_dir() && is_html(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_html(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.ends_with(".html") || name.ends_with(".htm"))
}
