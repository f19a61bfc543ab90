// src/resolve.rs
//! Maps HTML asset references onto files in the site output directory.
//!
//! Root-relative URL paths are not filesystem-absolute: a site deployed under
//! a sub-path (`/my-site/images/a.jpg`) still keeps `images/` at the top of
//! its output directory, so known content roots are located inside the
//! reference and everything before them is discarded.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Content roots the build emits at the top of the output directory.
const CONTENT_ROOTS: &[&str] = &["/images/", "/_astro/"];

/// Syntactic shape of a reference string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetReference<'a> {
    /// Leading `/`, relative to an unknown site base path.
    UrlPath(&'a str),
    /// Leading `./`.
    DotRelative(&'a str),
    /// Anything else that is not inline data.
    Relative(&'a str),
    /// `data:` URI; never resolved.
    Inline,
}

impl<'a> AssetReference<'a> {
    #[must_use]
    pub fn classify(reference: &'a str) -> Self {
        if reference.starts_with("data:") {
            Self::Inline
        } else if reference.starts_with('/') {
            Self::UrlPath(reference)
        } else if reference.starts_with("./") {
            Self::DotRelative(reference)
        } else {
            Self::Relative(reference)
        }
    }
}

/// A reference paired with its candidate path and whether it exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub reference: String,
    pub path: PathBuf,
    pub exists: bool,
}

impl ResolvedAsset {
    #[must_use]
    pub fn resolve(root: &Path, reference: &str) -> Self {
        let path = candidate_path(root, reference);
        let exists = path_exists(&path);
        Self {
            reference: reference.to_string(),
            path,
            exists,
        }
    }
}

/// Computes the on-disk candidate for `reference` under `root`.
///
/// Inline references resolve to `root` itself.
#[must_use]
pub fn candidate_path(root: &Path, reference: &str) -> PathBuf {
    match AssetReference::classify(reference) {
        AssetReference::UrlPath(url) => {
            // String concatenation: joining an absolute-looking fragment would drop `root`.
            let mut joined = OsString::from(root.as_os_str());
            joined.push(strip_base_path(url));
            PathBuf::from(joined)
        }
        AssetReference::DotRelative(rel) => join_relative(root, &rel[1..]),
        AssetReference::Relative(rel) => join_relative(root, rel),
        AssetReference::Inline => root.to_path_buf(),
    }
}

/// Truncates a root-relative URL path to its first known content root.
#[must_use]
pub fn strip_base_path(url: &str) -> &str {
    CONTENT_ROOTS
        .iter()
        .find_map(|marker| url.find(marker))
        .map_or(url, |idx| &url[idx..])
}

/// Joins `rel` onto `root` lexically: `.` is dropped, `..` pops, and leading
/// separators do not replace the root.
fn join_relative(root: &Path, rel: &str) -> PathBuf {
    let mut out = root.to_path_buf();
    for component in Path::new(rel).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    out
}

/// Only a not-found probe counts as absent; a file used as a directory
/// (`/images/a.png/`) is not found either.
fn path_exists(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(_) => true,
        Err(e) => !matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory),
    }
}
