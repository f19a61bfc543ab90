// src/checks/build.rs
//! Structural check of the root document.

use crate::discovery;
use crate::html::{self, Structure};
use crate::types::{BuildResult, CheckStatus};
use std::path::Path;

const ROOT_DOCUMENT: &str = "index.html";

#[must_use]
pub fn check_build(root: &Path) -> BuildResult {
    let index = root.join(ROOT_DOCUMENT);
    if !index.is_file() {
        return BuildResult::failed("index.html not found");
    }

    let document = match html::parse_document(&index) {
        Ok(doc) => doc,
        Err(e) => return BuildResult::failed(format!("Error parsing index.html: {e}")),
    };

    let pages = match discovery::find_html_files(root) {
        Ok(files) => files.len(),
        Err(e) => return BuildResult::failed(format!("Error finding HTML files: {e}")),
    };

    let missing = Structure::scan(&document).missing();
    if !missing.is_empty() {
        return BuildResult {
            status: CheckStatus::Fail,
            pages,
            details: missing.join(", "),
        };
    }

    BuildResult {
        status: CheckStatus::Pass,
        pages,
        details: format!("Valid HTML, {pages} page(s), meta tags present"),
    }
}
