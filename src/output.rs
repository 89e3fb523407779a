//! CLI output formatting for discovery results.
//!
//! Output is page-centric: each discovered page leads with its positional
//! index, entry name and output document, with the source file, bundle
//! pattern and template shown as indented context lines. Paths are shown
//! relative to the scan root.
//!
//! ```text
//! Pages
//! 001 index → index.html
//!     Source: index.js
//!     Bundle: index-[contenthash].bundle.js
//!     Template: index.html
//! 002 about → about/index.html
//!     Source: about/about.js
//!     Bundle: about/about-[contenthash].bundle.js
//!     Template: about/about.html (entry)
//!
//! Shared
//!     shared: react, react-dom
//!
//! Discovered 2 pages
//! ```
//!
//! `format_*` functions are pure and return lines; `print_*` wrappers write
//! them to stdout.

use crate::manifest::Manifest;
use crate::pages::BundleEntry;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to `root` when possible, with forward slashes.
fn display_relative(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format the discovered pages as a readable inventory.
pub fn format_manifest_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();
    let root = manifest.root.as_path();

    lines.push("Pages".to_string());
    if manifest.pages.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }

    for (i, page) in manifest.pages.iter().enumerate() {
        let Some(name) = page.chunks.first() else {
            continue;
        };
        let Some(source) = manifest.entries.get(name) else {
            continue;
        };
        lines.push(format!("{} {} → {}", format_index(i + 1), name, page.filename));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            display_relative(source, root)
        ));
        if let Some(output) = manifest.outputs.get(name) {
            lines.push(format!("{}Bundle: {}", indent(1), output.filename));
        }

        let is_local = page.template.parent() == source.parent()
            && page.template.file_stem().is_some_and(|s| s == name.as_str());
        lines.push(format!(
            "{}Template: {}{}",
            indent(1),
            display_relative(&page.template, root),
            if is_local { " (entry)" } else { "" }
        ));
    }

    let shared: Vec<(&str, &Vec<String>)> = manifest
        .entry_descriptors
        .iter()
        .filter_map(|(name, entry)| match entry {
            BundleEntry::Shared(deps) => Some((name, deps)),
            BundleEntry::Page(_) => None,
        })
        .collect();
    if !shared.is_empty() {
        lines.push(String::new());
        lines.push("Shared".to_string());
        for (name, deps) in shared {
            let list = if deps.is_empty() {
                "(no dependencies)".to_string()
            } else {
                deps.join(", ")
            };
            lines.push(format!("{}{}: {}", indent(1), name, list));
        }
    }

    lines.push(String::new());
    lines.push(format!("Discovered {}", plural(manifest.pages.len(), "page")));
    lines
}

pub fn print_manifest_output(manifest: &Manifest) {
    for line in format_manifest_output(manifest) {
        println!("{}", line);
    }
}
