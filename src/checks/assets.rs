// src/checks/assets.rs
//! Referenced-asset existence check.

use crate::discovery;
use crate::error::ForgeResult;
use crate::html;
use crate::resolve::ResolvedAsset;
use crate::types::{AssetsResult, CheckStatus};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Verifies that every asset referenced by every document exists on disk.
///
/// Documents are parsed in parallel; results are folded in discovery order
/// so totals, the missing list and the reported parse error are stable.
#[must_use]
pub fn check_assets(root: &Path) -> AssetsResult {
    let files = match discovery::find_html_files(root) {
        Ok(files) => files,
        Err(e) => return AssetsResult::failed(format!("Error finding HTML files: {e}")),
    };
    if files.is_empty() {
        return AssetsResult::failed(format!(
            "No HTML files found (no documents found in {})",
            root.display()
        ));
    }
    tracing::debug!(documents = files.len(), "scanning documents for asset references");

    let scanned: Vec<(&PathBuf, ForgeResult<Vec<String>>)> = files
        .par_iter()
        .map(|file| (file, references_in(file)))
        .collect();

    let mut total = 0;
    let mut missing = Vec::new();
    for (file, refs) in scanned {
        let refs = match refs {
            Ok(refs) => refs,
            Err(e) => {
                return AssetsResult {
                    status: CheckStatus::Fail,
                    total,
                    missing,
                    details: format!("Error parsing {}: {e}", file.display()),
                }
            }
        };
        for reference in refs {
            total += 1;
            let asset = ResolvedAsset::resolve(root, &reference);
            if !asset.exists {
                tracing::debug!(reference = %asset.reference, path = %asset.path.display(), "missing asset");
                missing.push(asset.reference);
            }
        }
    }

    summarize(total, missing)
}

fn references_in(file: &Path) -> ForgeResult<Vec<String>> {
    let document = html::parse_document(file)?;
    Ok(html::extract_references(&document))
}

fn summarize(total: usize, missing: Vec<String>) -> AssetsResult {
    if !missing.is_empty() {
        let details = format!("Missing {} assets", missing.len());
        return AssetsResult {
            status: CheckStatus::Fail,
            total,
            missing,
            details,
        };
    }
    if total == 0 {
        return AssetsResult {
            status: CheckStatus::Fail,
            total,
            missing,
            details: "No asset references found".to_string(),
        };
    }
    AssetsResult {
        status: CheckStatus::Pass,
        total,
        missing,
        details: format!("{total}/{total} assets verified"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_wording() {
        let pass = summarize(3, Vec::new());
        assert_eq!(pass.status, CheckStatus::Pass);
        assert_eq!(pass.details, "3/3 assets verified");

        let fail = summarize(3, vec!["/a.css".into(), "/a.css".into()]);
        assert_eq!(fail.status, CheckStatus::Fail);
        assert_eq!(fail.details, "Missing 2 assets");
    }

    #[test]
    fn no_references_is_not_a_pass() {
        let r = summarize(0, Vec::new());
        assert_eq!(r.status, CheckStatus::Fail);
    }
}
