//! Filesystem tree scanning.
//!
//! Stage 1 of discovery. Walks the pages directory and materializes every file
//! and directory below it as an in-memory [`TreeNode`] tree that the entry
//! selector consumes.
//!
//! ## Ordering
//!
//! Siblings keep the order the filesystem lists them in. Nothing here sorts:
//! downstream consumers key everything by entry name, so listing order only
//! matters for which file wins an entry-name collision.
//!
//! ## Symlinks
//!
//! By default symlinks are classified with `lstat` semantics and never
//! followed, so a link to a directory shows up as a file node. Setting
//! `scan.follow_symlinks = true` traverses linked directories instead; in that
//! mode a link cycle aborts the scan with [`ScanError::Walk`] rather than
//! recursing forever.
//!
//! ## Failure
//!
//! A scan either returns the whole tree or fails. Any unreadable directory or
//! failed stat aborts with [`ScanError`]; a partial tree would silently drop
//! entries.

use crate::config::ScanConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read scan root: {0}")]
    Io(#[from] std::io::Error),
    #[error("scan root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("filesystem error during scan: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One file or directory encountered during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Basename of the node (the key it is stored under in its parent).
    pub name: String,
    /// Absolute path, built by joining names onto the scan root.
    pub path: PathBuf,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    /// Children in filesystem listing order. Empty for an empty directory.
    Dir(Vec<TreeNode>),
}

impl TreeNode {
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
        }
    }

    pub fn dir(name: impl Into<String>, path: impl Into<PathBuf>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Dir(children),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Dir(_))
    }

    /// Direct children; always empty for files.
    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::Dir(children) => children,
            NodeKind::File => &[],
        }
    }

    /// Look up a direct child by basename.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children().iter().find(|c| c.name == name)
    }

    /// All nodes below this one, depth-first pre-order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&TreeNode> = self.children().iter().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Number of file nodes anywhere below this one.
    pub fn file_count(&self) -> usize {
        self.descendants().filter(|n| n.is_file()).count()
    }
}

/// Pre-order iterator returned by [`TreeNode::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Scan `root` with default options (symlinks not followed).
pub fn scan(root: &Path) -> Result<TreeNode, ScanError> {
    scan_with(root, &ScanConfig::default())
}

/// Scan `root` into a fully materialized tree.
///
/// The returned node is the root directory itself. Walkdir already yields a
/// depth-first pre-order stream, so the tree is rebuilt with an explicit
/// stack of open directories instead of recursion: when an entry arrives at
/// depth `d`, every open directory deeper than `d - 1` is complete and gets
/// attached to its parent.
pub fn scan_with(root: &Path, config: &ScanConfig) -> Result<TreeNode, ScanError> {
    let metadata = fs::metadata(root)?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut top = OpenDir::new(root_name, root.to_path_buf());
    let mut open: Vec<OpenDir> = Vec::new();

    for item in WalkDir::new(root).follow_links(config.follow_symlinks) {
        let entry = item?;
        let depth = entry.depth();
        if depth == 0 {
            continue;
        }

        while open.len() >= depth {
            close_last(&mut top, &mut open);
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path().to_path_buf();

        if entry.file_type().is_dir() {
            trace!(path = %path.display(), "dir");
            open.push(OpenDir::new(name, path));
        } else {
            trace!(path = %path.display(), "file");
            attach(&mut top, &mut open, TreeNode::file(name, path));
        }
    }

    while !open.is_empty() {
        close_last(&mut top, &mut open);
    }

    Ok(top.into_node())
}

/// A directory whose children are still being collected.
struct OpenDir {
    name: String,
    path: PathBuf,
    children: Vec<TreeNode>,
}

impl OpenDir {
    fn new(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            children: Vec::new(),
        }
    }

    fn into_node(self) -> TreeNode {
        TreeNode::dir(self.name, self.path, self.children)
    }
}

fn attach(top: &mut OpenDir, open: &mut [OpenDir], node: TreeNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.children.push(node),
    }
}

fn close_last(top: &mut OpenDir, open: &mut Vec<OpenDir>) {
    if let Some(done) = open.pop() {
        attach(top, open, done.into_node());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn scan_builds_nested_tree() {
        let (_tmp, root) = page_tree(&["index.js", "about/about.js", "blog/posts/posts.js"]);
        let tree = scan(&root).unwrap();

        assert!(tree.is_dir());
        assert_eq!(tree.path, root);
        assert_eq!(child_names(&tree), sorted(&["about", "blog", "index.js"]));

        let posts = tree.child("blog").unwrap().child("posts").unwrap();
        assert!(posts.is_dir());
        let file = posts.child("posts.js").unwrap();
        assert!(file.is_file());
        assert_eq!(file.path, root.join("blog/posts/posts.js"));
    }

    #[test]
    fn children_are_direct_descendants() {
        let (_tmp, root) = page_tree(&["a/b/c/d.js", "a/e.js", "f.js"]);
        let tree = scan(&root).unwrap();

        fn check(node: &TreeNode) {
            for child in node.children() {
                assert_eq!(child.path.parent(), Some(node.path.as_path()));
                assert_eq!(child.path.file_name().unwrap().to_string_lossy(), child.name);
                check(child);
            }
        }
        check(&tree);
    }

    #[test]
    fn empty_directory_has_empty_children() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        fs::create_dir(root.join("drafts")).unwrap();

        let tree = scan(&root).unwrap();
        let drafts = tree.child("drafts").unwrap();
        assert_eq!(drafts.kind, NodeKind::Dir(vec![]));
    }

    #[test]
    fn empty_root_is_empty_tree() {
        let tmp = TempDir::new().unwrap();
        let tree = scan(tmp.path()).unwrap();
        assert!(tree.is_dir());
        assert!(tree.children().is_empty());
        assert_eq!(tree.file_count(), 0);
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ScanError::Io(_))));
    }

    #[test]
    fn file_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("index.js");
        fs::write(&file, "").unwrap();
        let result = scan(&file);
        assert!(matches!(result, Err(ScanError::NotADirectory(p)) if p == file));
    }

    #[test]
    fn descendants_are_pre_order() {
        let tree = TreeNode::dir(
            "pages",
            "/pages",
            vec![
                TreeNode::dir(
                    "about",
                    "/pages/about",
                    vec![TreeNode::file("about.js", "/pages/about/about.js")],
                ),
                TreeNode::file("index.js", "/pages/index.js"),
            ],
        );
        let names: Vec<&str> = tree.descendants().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["about", "about.js", "index.js"]);
    }

    #[test]
    fn sibling_order_matches_directory_listing() {
        let (_tmp, root) = page_tree(&["c.js", "a.js", "b/b.js", "d/x.js"]);
        let tree = scan(&root).unwrap();

        let listed: Vec<String> = fs::read_dir(&root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        let scanned: Vec<String> = tree.children().iter().map(|c| c.name.clone()).collect();
        assert_eq!(scanned, listed);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dir_is_a_file_by_default() {
        let (_tmp, root) = page_tree(&["real/real.js"]);
        std::os::unix::fs::symlink(root.join("real"), root.join("linked")).unwrap();

        let tree = scan(&root).unwrap();
        assert!(tree.child("linked").unwrap().is_file());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycle_is_error_when_following() {
        let (_tmp, root) = page_tree(&["loop/loop.js"]);
        std::os::unix::fs::symlink(&root, root.join("loop/back")).unwrap();

        let config = ScanConfig {
            follow_symlinks: true,
        };
        let result = scan_with(&root, &config);
        assert!(matches!(result, Err(ScanError::Walk(_))));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dir_is_traversed_when_following() {
        let (_tmp, root) = page_tree(&["real/real.js"]);
        std::os::unix::fs::symlink(root.join("real"), root.join("linked")).unwrap();

        let config = ScanConfig {
            follow_symlinks: true,
        };
        let tree = scan_with(&root, &config).unwrap();
        let linked = tree.child("linked").unwrap();
        assert!(linked.is_dir());
        assert!(linked.child("real.js").unwrap().is_file());
    }
}
