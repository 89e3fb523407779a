//! HTML page descriptors and bundler entry descriptors.
//!
//! Stage 3 of discovery. Every entry becomes one HTML page, except an entry
//! named like the shared chunk, whose slot the shared entry takes:
//!
//! - **template**: `<entry dir>/<entry>.html` when that file exists, otherwise
//!   the shared default template
//! - **filename**: `index.html` under the entry's URL segment
//! - **chunks**: the entry's own chunk, plus the shared chunk unless disabled
//!
//! The same entries are also wrapped for the bundler's multi-entry
//! configuration: each entry imports its module and depends on the shared
//! chunk, and one synthetic shared entry lists the common dependencies so
//! they are bundled once instead of per page.

use crate::config::{ScoutConfig, SharedConfig};
use crate::entries::{self, EntryMap};
use crate::resolve::{join_segment, url_segment_of};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Output HTML document name inside every page's URL segment.
pub const PAGE_DOCUMENT: &str = "index.html";

/// One HTML document the bundler should emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    /// Absolute path of the template to render.
    pub template: PathBuf,
    /// Output path relative to the build directory, ending in `index.html`.
    pub filename: String,
    /// Chunks the page loads; always starts with the entry's own name.
    pub chunks: Vec<String>,
}

/// Builds [`PageDescriptor`]s for an entry map.
///
/// [`PageAssembler::pages`] returns a fresh lazy iterator on every call, so
/// the sequence can be restarted at will.
#[derive(Debug, Clone)]
pub struct PageAssembler<'a> {
    entries: &'a EntryMap,
    root: &'a Path,
    default_template: PathBuf,
    template_extension: String,
    shared_name: String,
    include_shared: bool,
}

impl<'a> PageAssembler<'a> {
    /// Assembler with `.html` overrides and a `shared` chunk on every page.
    pub fn new(entries: &'a EntryMap, root: &'a Path, default_template: impl Into<PathBuf>) -> Self {
        Self {
            entries,
            root,
            default_template: default_template.into(),
            template_extension: "html".to_string(),
            shared_name: "shared".to_string(),
            include_shared: true,
        }
    }

    pub fn from_config(entries: &'a EntryMap, root: &'a Path, config: &ScoutConfig) -> Self {
        Self::new(entries, root, config.pages.default_template_path(root))
            .template_extension(&config.pages.template_extension)
            .shared_name(&config.shared.name)
            .include_shared_chunk(config.pages.include_shared_chunk)
    }

    pub fn template_extension(mut self, ext: impl Into<String>) -> Self {
        self.template_extension = ext.into();
        self
    }

    /// Name of the shared chunk. An entry with this name gets no page, since
    /// the shared entry takes its slot in the bundler's entry mapping.
    pub fn shared_name(mut self, name: impl Into<String>) -> Self {
        self.shared_name = name.into();
        self
    }

    /// Append the shared chunk to every page, or emit entry-only pages.
    pub fn include_shared_chunk(mut self, include: bool) -> Self {
        self.include_shared = include;
        self
    }

    pub fn pages(&self) -> Pages<'_> {
        Pages {
            assembler: self,
            entries: self.entries.iter(),
        }
    }

    fn describe(&self, name: &str, source: &Path) -> PageDescriptor {
        let segment = url_segment_of(name, self.entries, self.root);
        let filename = join_segment(&segment, PAGE_DOCUMENT);

        let mut chunks = vec![name.to_string()];
        if self.include_shared {
            chunks.push(self.shared_name.clone());
        }

        PageDescriptor {
            template: self.select_template(name, source),
            filename,
            chunks,
        }
    }

    /// `<entry>.html` next to the entry source if present, else the default.
    fn select_template(&self, name: &str, source: &Path) -> PathBuf {
        let dir = source.parent().unwrap_or(self.root);
        let local = dir.join(format!("{name}.{}", self.template_extension));
        if local.is_file() {
            debug!(entry = %name, template = %local.display(), "using entry template");
            local
        } else {
            debug!(entry = %name, "no entry template, using default");
            self.default_template.clone()
        }
    }
}

/// Lazy page sequence in entry-map order.
#[derive(Debug, Clone)]
pub struct Pages<'a> {
    assembler: &'a PageAssembler<'a>,
    entries: entries::Iter<'a>,
}

impl Iterator for Pages<'_> {
    type Item = PageDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (name, source) = self.entries.next()?;
            if name == self.assembler.shared_name {
                warn!(
                    entry = %name,
                    path = %source.display(),
                    "no page for entry shadowed by the shared chunk"
                );
                continue;
            }
            return Some(self.assembler.describe(name, source));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // entry names are unique, so at most one is shadowed
        let (lower, upper) = self.entries.size_hint();
        (lower.saturating_sub(1), upper)
    }
}

// ============================================================================
// Entry descriptors
// ============================================================================

/// A page entry in the bundler's extended entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDescriptor {
    /// Absolute module path.
    pub import: PathBuf,
    /// Chunk this entry depends on.
    #[serde(rename = "dependOn")]
    pub depends_on: String,
}

/// Value of one key in the extended entry mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BundleEntry {
    Page(EntryDescriptor),
    /// The shared pseudo-entry: a plain list of modules.
    Shared(Vec<String>),
}

/// Extended entry mapping, serialized as an ordered object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDescriptors {
    entries: Vec<(String, BundleEntry)>,
}

impl EntryDescriptors {
    pub fn get(&self, name: &str) -> Option<&BundleEntry> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BundleEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }
}

impl Serialize for EntryDescriptors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        entries::serialize_ordered(&self.entries, serializer)
    }
}

/// Wrap every entry as `{import, dependOn}` and append the shared pseudo-entry.
///
/// A page entry whose name equals the shared chunk name is replaced by the
/// shared entry, mirroring the map's last-write-wins rule.
pub fn entry_descriptors(entries: &EntryMap, shared: &SharedConfig) -> EntryDescriptors {
    let mut out: Vec<(String, BundleEntry)> = entries
        .iter()
        .filter(|(name, path)| {
            if *name == shared.name {
                warn!(
                    entry = %name,
                    path = %path.display(),
                    "entry shadowed by the shared chunk of the same name"
                );
                false
            } else {
                true
            }
        })
        .map(|(name, path)| {
            (
                name.to_string(),
                BundleEntry::Page(EntryDescriptor {
                    import: path.to_path_buf(),
                    depends_on: shared.name.clone(),
                }),
            )
        })
        .collect();

    out.push((
        shared.name.clone(),
        BundleEntry::Shared(shared.dependencies.clone()),
    ));

    EntryDescriptors { entries: out }
}
