// src/html.rs
//! Document parsing and reference extraction.
//!
//! Parsing goes through the html5 tree builder, which recovers from unclosed
//! tags and stray markup. Bytes that are not UTF-8 decode to U+FFFD, so the
//! only unrecoverable input is a document that cannot be read.

use crate::error::{ForgeError, ForgeResult};
use scraper::{ElementRef, Html};
use std::fs;
use std::path::Path;

/// `rel` values whose `href` points at a local asset.
const ASSET_LINK_RELS: &[&str] = &["stylesheet", "icon", "shortcut"];

/// Reads and parses one HTML document.
///
/// # Errors
/// Returns `Filesystem` if the file cannot be read.
pub fn parse_document(path: &Path) -> ForgeResult<Html> {
    let bytes =
        fs::read(path).map_err(|e| ForgeError::filesystem("failed to read document", path, e))?;
    Ok(Html::parse_document(&String::from_utf8_lossy(&bytes)))
}

/// Collects asset references in document order. Duplicates are preserved.
#[must_use]
pub fn extract_references(document: &Html) -> Vec<String> {
    let mut refs = Vec::new();
    for element in elements(document) {
        let el = element.value();
        match el.name() {
            "img" => {
                if let Some(src) = non_empty(el.attr("src")) {
                    if !src.starts_with("data:") {
                        refs.push(src.to_string());
                    }
                }
            }
            "link" => {
                let is_asset = el
                    .attr("rel")
                    .is_some_and(|rel| ASSET_LINK_RELS.contains(&rel));
                if let (true, Some(href)) = (is_asset, non_empty(el.attr("href"))) {
                    refs.push(href.to_string());
                }
            }
            "script" => {
                if let Some(src) = non_empty(el.attr("src")) {
                    refs.push(src.to_string());
                }
            }
            "source" => {
                if let Some(srcset) = non_empty(el.attr("srcset")) {
                    refs.extend(srcset_urls(srcset));
                }
            }
            _ => {}
        }
    }
    refs
}

/// Splits a `srcset` into candidate URLs, dropping width/density descriptors.
pub fn srcset_urls(srcset: &str) -> impl Iterator<Item = String> + '_ {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .map(str::to_string)
}

/// Structural landmarks found in a document.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Structure {
    pub html: bool,
    pub head: bool,
    pub body: bool,
    pub title: bool,
    pub description: bool,
    pub og_title: bool,
}

impl Structure {
    #[must_use]
    pub fn scan(document: &Html) -> Self {
        let mut s = Self::default();
        for element in elements(document) {
            let el = element.value();
            match el.name() {
                "html" => s.html = true,
                "head" => s.head = true,
                "body" => s.body = true,
                "title" => s.title = true,
                "meta" => {
                    let has_content = non_empty(el.attr("content")).is_some();
                    if has_content && el.attr("name") == Some("description") {
                        s.description = true;
                    }
                    if has_content && el.attr("property") == Some("og:title") {
                        s.og_title = true;
                    }
                }
                _ => {}
            }
        }
        s
    }

    /// Messages for every missing landmark, in fixed order.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.html, "missing <html> tag"),
            (self.head, "missing <head> tag"),
            (self.body, "missing <body> tag"),
            (self.title, "missing <title> tag"),
            (self.description, "missing meta description"),
            (self.og_title, "missing og:title meta tag"),
        ]
        .into_iter()
        .filter_map(|(present, msg)| (!present).then_some(msg))
        .collect()
    }
}

fn elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.tree.root().descendants().filter_map(ElementRef::wrap)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(markup: &str) -> Vec<String> {
        extract_references(&Html::parse_document(markup))
    }

    #[test]
    fn extracts_in_document_order() {
        let markup = r#"<!DOCTYPE html>
<html>
<head>
    <link rel="stylesheet" href="style.css">
    <link rel="icon" href="favicon.ico">
    <link rel="preconnect" href="https://fonts.example">
</head>
<body>
    <img src="hero.jpg" alt="Hero">
    <img src="images/logo.svg" alt="Logo">
    <script src="app.js"></script>
    <script>console.log("inline")</script>
    <picture>
        <source srcset="banner.webp" type="image/webp">
        <source srcset="banner.jpg" type="image/jpeg">
        <img src="banner-fallback.jpg" alt="Banner">
    </picture>
</body>
</html>"#;
        assert_eq!(
            refs(markup),
            vec![
                "style.css",
                "favicon.ico",
                "hero.jpg",
                "images/logo.svg",
                "app.js",
                "banner.webp",
                "banner.jpg",
                "banner-fallback.jpg",
            ]
        );
    }

    #[test]
    fn skips_data_uris_and_empty_values() {
        let markup = r#"<img src="data:image/png;base64,AAAA"><img src=""><script src=""></script>"#;
        assert!(refs(markup).is_empty());
    }

    #[test]
    fn rel_must_match_exactly() {
        let markup = r#"<link rel="shortcut icon" href="a.ico"><link rel="shortcut" href="b.ico">"#;
        assert_eq!(refs(markup), vec!["b.ico"]);
    }

    #[test]
    fn srcset_drops_descriptors() {
        let urls: Vec<_> = srcset_urls("/img/a.webp 480w, /img/b.webp 960w,  ,c.png 2x").collect();
        assert_eq!(urls, vec!["/img/a.webp", "/img/b.webp", "c.png"]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let markup = r#"<img src="a.png"><img src="a.png">"#;
        assert_eq!(refs(markup), vec!["a.png", "a.png"]);
    }

    #[test]
    fn invalid_utf8_bytes_are_replaced() {
        let d = tempfile::tempdir().unwrap();
        let path = d.path().join("legacy.html");
        fs::write(&path, b"<p>na\xEFve</p><script src=\"app.js\"></script>").unwrap();
        let doc = parse_document(&path).unwrap();
        assert_eq!(extract_references(&doc), vec!["app.js"]);
    }

    #[test]
    fn malformed_markup_still_extracts() {
        let markup = r#"<div><p><img src="x.png"><span><script src="y.js">"#;
        assert_eq!(refs(markup), vec!["x.png", "y.js"]);
    }

    #[test]
    fn structure_reports_missing_meta_in_order() {
        let doc = Html::parse_document("<html><head><title>T</title></head><body></body></html>");
        let s = Structure::scan(&doc);
        assert_eq!(
            s.missing(),
            vec!["missing meta description", "missing og:title meta tag"]
        );
    }

    #[test]
    fn empty_meta_content_does_not_count() {
        let doc = Html::parse_document(
            r#"<head><title>T</title><meta name="description" content=""><meta property="og:title" content="T"></head>"#,
        );
        let s = Structure::scan(&doc);
        assert!(!s.description);
        assert!(s.og_title);
    }
}
