//! Entry selection by naming convention.
//!
//! Stage 2 of discovery. Flattens a scanned [`TreeNode`] (depth-first,
//! pre-order) and decides which files are bundler entries. Nothing is
//! declared by hand: the location and name of a file make it an entry.
//!
//! ## Conventions
//!
//! Rules live in [`RULES`] and are tried in order, first match wins:
//!
//! | Rule | Matches | Entry name |
//! |------|---------|------------|
//! | `root-index` | `<root>/index.js` | `index` |
//! | `folder-namesake` | `<dir>/<dir>.js` at any depth | `<dir>` |
//!
//! ```text
//! src/pages/
//! ├── index.js              → entry "index"
//! ├── about/
//! │   ├── about.js          → entry "about"
//! │   └── helper.js         (no match)
//! └── blog/
//!     ├── index.js          (no match, not in the root)
//!     └── posts/
//!         └── posts.js      → entry "posts"
//! ```
//!
//! Directories are never entries; they are only traversed. Files matching no
//! rule are skipped silently.
//!
//! ## Name Collisions
//!
//! Two files that derive the same entry name (say `a/about/about.js` and
//! `b/about/about.js`) do not raise an error. The file visited later wins:
//! its path replaces the earlier one while the name keeps its original
//! position in the map.

use crate::config::EntriesConfig;
use crate::tree::TreeNode;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered mapping of entry name to absolute source path.
///
/// Iteration order is first-insertion order. Re-inserting an existing name
/// replaces its path in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMap {
    entries: Vec<(String, PathBuf)>,
}

impl EntryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the path it replaced.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Option<PathBuf> {
        let name = name.into();
        let path = path.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, path)),
            None => {
                self.entries.push((name, path));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_path())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

/// Iterator over `(name, path)` pairs in map order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, PathBuf)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Path);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(n, p)| (n.as_str(), p.as_path()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a EntryMap {
    type Item = (&'a str, &'a Path);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: Into<String>, P: Into<PathBuf>> FromIterator<(N, P)> for EntryMap {
    fn from_iter<I: IntoIterator<Item = (N, P)>>(iter: I) -> Self {
        let mut map = EntryMap::new();
        for (name, path) in iter {
            map.insert(name, path);
        }
        map
    }
}

impl Serialize for EntryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_ordered(&self.entries, serializer)
    }
}

/// Serialize `(key, value)` pairs as a map, keeping their order.
pub(crate) fn serialize_ordered<S, K, V>(pairs: &[(K, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    K: Serialize,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (k, v) in pairs {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

// ============================================================================
// Rule table
// ============================================================================

/// A file as seen by the convention rules.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub path: &'a Path,
    /// Basename with its last extension removed.
    pub stem: &'a str,
    pub extension: Option<&'a str>,
    /// Basename of the directory holding the file.
    pub parent_name: Option<&'a str>,
    /// The file sits directly in the scan root.
    pub in_root: bool,
}

impl<'a> Candidate<'a> {
    /// Describe a file node relative to the scan root. Returns `None` when any
    /// component of the path is not valid UTF-8: such a path has no URL
    /// segment and cannot be written into the JSON outputs.
    pub fn from_path(path: &'a Path, root: &Path) -> Option<Self> {
        path.to_str()?;
        let stem = path.file_stem()?.to_str()?;
        let extension = match path.extension() {
            Some(ext) => Some(ext.to_str()?),
            None => None,
        };
        let parent = path.parent();
        Some(Self {
            path,
            stem,
            extension,
            parent_name: parent.and_then(|p| p.file_name()).and_then(|n| n.to_str()),
            in_root: parent == Some(root),
        })
    }

    fn has_entry_extension(&self, config: &EntriesConfig) -> bool {
        self.extension
            .is_some_and(|ext| config.is_entry_extension(ext))
    }
}

/// One naming convention: a predicate and the entry name it derives.
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&Candidate<'_>, &EntriesConfig) -> bool,
    pub entry_name: fn(&Candidate<'_>) -> String,
}

/// Conventions in evaluation order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "root-index",
        matches: is_root_index,
        entry_name: stem_name,
    },
    Rule {
        name: "folder-namesake",
        matches: is_folder_namesake,
        entry_name: stem_name,
    },
];

fn is_root_index(c: &Candidate<'_>, config: &EntriesConfig) -> bool {
    c.in_root && c.stem == config.index_stem && c.has_entry_extension(config)
}

fn is_folder_namesake(c: &Candidate<'_>, config: &EntriesConfig) -> bool {
    c.parent_name == Some(c.stem) && c.has_entry_extension(config)
}

fn stem_name(c: &Candidate<'_>) -> String {
    c.stem.to_string()
}

/// Apply [`RULES`] to a candidate. Returns the matching rule and entry name.
pub fn match_rule(
    candidate: &Candidate<'_>,
    config: &EntriesConfig,
) -> Option<(&'static Rule, String)> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(candidate, config))
        .map(|rule| (rule, (rule.entry_name)(candidate)))
}

/// Select entries with the default conventions.
pub fn select_entries(tree: &TreeNode, root: &Path) -> EntryMap {
    select_entries_with(tree, root, &EntriesConfig::default())
}

/// Flatten `tree` and collect every file a convention selects.
pub fn select_entries_with(tree: &TreeNode, root: &Path, config: &EntriesConfig) -> EntryMap {
    let mut entries = EntryMap::new();

    for node in tree.descendants().filter(|n| n.is_file()) {
        let Some(candidate) = Candidate::from_path(&node.path, root) else {
            debug!(path = %node.path.display(), "skipping path that is not valid UTF-8");
            continue;
        };
        let Some((rule, name)) = match_rule(&candidate, config) else {
            continue;
        };

        debug!(entry = %name, rule = rule.name, path = %node.path.display(), "selected entry");
        if let Some(previous) = entries.insert(name.clone(), node.path.clone()) {
            debug!(
                entry = %name,
                replaced = %previous.display(),
                "entry name collision, later file wins"
            );
        }
    }

    entries
}
