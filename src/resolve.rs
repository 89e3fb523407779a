//! URL segments and output filenames for entries.
//!
//! A page's URL mirrors where its entry lives under the scan root:
//!
//! ```text
//! <root>/index.js              → ""            → index-[contenthash].bundle.js
//! <root>/about/about.js        → "about"       → about/about-[contenthash].bundle.js
//! <root>/blog/posts/posts.js   → "blog/posts"  → blog/posts/posts-[contenthash].bundle.js
//! ```
//!
//! Both lookups are pure functions of their arguments, so a bundler's
//! output-naming hook can call them once per chunk and always get the same
//! answer. A name missing from the entry map is not an error: it is echoed
//! back as its own URL segment, which keeps non-page chunks such as the
//! shared vendor chunk addressable.

use crate::entries::EntryMap;
use std::path::{Component, Path};

/// Placeholder the bundler substitutes with the chunk's content hash.
pub const CONTENT_HASH: &str = "[contenthash]";

/// Suffix appended to every bundle filename after the entry name.
pub const BUNDLE_SUFFIX: &str = "-[contenthash].bundle.js";

/// Convert a directory into a forward-slash URL segment relative to `root`.
///
/// Root prefix, root and drive components, and a leading `.` are dropped, and
/// the remaining components are joined with `/` whatever the platform
/// separator is. `dir == root` yields `""`. A `dir` outside `root` keeps its
/// own components.
pub fn url_segment(dir: &Path, root: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// URL segment of an entry's directory, or the name itself when unknown.
pub fn url_segment_of(entry_name: &str, entries: &EntryMap, root: &Path) -> String {
    match entries.get(entry_name) {
        Some(path) => {
            let dir = path.parent().unwrap_or(Path::new(""));
            url_segment(dir, root)
        }
        None => entry_name.to_string(),
    }
}

/// Bundle filename pattern for an entry, with the hash left as a placeholder.
pub fn output_filename_of(entry_name: &str, entries: &EntryMap, root: &Path) -> String {
    let segment = url_segment_of(entry_name, entries, root);
    join_segment(&segment, &format!("{entry_name}{BUNDLE_SUFFIX}"))
}

/// `file` placed under `segment`, or bare `file` for the site root.
pub fn join_segment(segment: &str, file: &str) -> String {
    if segment.is_empty() {
        file.to_string()
    } else {
        format!("{segment}/{file}")
    }
}
