//! Shared test utilities for the page-scout test suite.
//!
//! Builds throwaway page trees on disk and provides lookup helpers that
//! panic with a readable message on a miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (_tmp, root) = page_tree(&["index.js", "about/about.js"]);
//! let entries = discover_entries(&root);
//! assert_eq!(sorted_names(&entries), vec!["about", "index"]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::entries::{EntryMap, select_entries};
use crate::pages::PageDescriptor;
use crate::tree::{TreeNode, scan};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding the given files (parent dirs included).
///
/// Returns the guard and the canonical root path, so assertions compare
/// against the same absolute paths the scanner produces.
pub fn page_tree(files: &[&str]) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, format!("// {file}\n")).unwrap();
    }
    (tmp, root)
}

/// Scan `root` and select entries with the default conventions.
pub fn discover_entries(root: &Path) -> EntryMap {
    let tree = scan(root).unwrap();
    select_entries(&tree, root)
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Find the page whose first chunk is `entry`. Panics if not found.
pub fn find_page<'a>(pages: &'a [PageDescriptor], entry: &str) -> &'a PageDescriptor {
    pages
        .iter()
        .find(|p| p.chunks.first().map(String::as_str) == Some(entry))
        .unwrap_or_else(|| {
            let names: Vec<&str> = pages
                .iter()
                .filter_map(|p| p.chunks.first().map(String::as_str))
                .collect();
            panic!("page '{entry}' not found. Available: {names:?}")
        })
}

/// Entry names in map order.
pub fn entry_names(entries: &EntryMap) -> Vec<&str> {
    entries.names().collect()
}

/// Entry names sorted, for assertions independent of listing order.
pub fn sorted_names(entries: &EntryMap) -> Vec<&str> {
    let mut names = entry_names(entries);
    names.sort_unstable();
    names
}

/// Names of a node's direct children, sorted.
pub fn child_names(node: &TreeNode) -> Vec<String> {
    let mut names: Vec<String> = node.children().iter().map(|c| c.name.clone()).collect();
    names.sort();
    names
}

pub fn sorted(names: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    names.sort();
    names
}
