//! End-to-end discovery: scan → select → resolve → assemble.
//!
//! [`discover`] runs every stage once against the real filesystem and bundles
//! the results into a [`Manifest`], the JSON document handed to the bundler
//! configuration. Each call is an independent scan; nothing is cached between
//! calls, and an unchanged tree always yields an identical manifest.

use crate::config::{self, ConfigError, ScoutConfig};
use crate::entries::{self, EntryMap, select_entries_with};
use crate::pages::{EntryDescriptors, PageAssembler, PageDescriptor, entry_descriptors};
use crate::resolve::{output_filename_of, url_segment_of};
use crate::tree::{ScanError, scan_with};
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything the bundler configuration needs for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Canonical scan root.
    pub root: PathBuf,
    /// Simple entry form: name → module path.
    pub entries: EntryMap,
    /// Extended entry form with shared-chunk wiring.
    pub entry_descriptors: EntryDescriptors,
    /// Per-entry URL segment and bundle filename pattern.
    pub outputs: Outputs,
    pub pages: Vec<PageDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutput {
    pub url: String,
    pub filename: String,
}

/// Ordered entry name → [`EntryOutput`] mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outputs(Vec<(String, EntryOutput)>);

impl Outputs {
    pub fn get(&self, name: &str) -> Option<&EntryOutput> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntryOutput)> {
        self.0.iter().map(|(n, o)| (n.as_str(), o))
    }
}

impl Serialize for Outputs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        entries::serialize_ordered(&self.0, serializer)
    }
}

impl Manifest {
    /// URL segment of `name`, echoing unknown names back.
    pub fn url_of(&self, name: &str) -> String {
        url_segment_of(name, &self.entries, &self.root)
    }

    /// Bundle filename pattern of `name`, for the bundler's naming hook.
    pub fn filename_of(&self, name: &str) -> String {
        output_filename_of(name, &self.entries, &self.root)
    }
}

/// Discover with the config found in the scan root (or stock defaults).
pub fn discover(root: &Path) -> Result<Manifest, ManifestError> {
    let root = canonical_root(root)?;
    let config = config::load_config(&root)?;
    discover_with(&root, &config)
}

/// Run the full pipeline with an explicit config.
pub fn discover_with(root: &Path, config: &ScoutConfig) -> Result<Manifest, ManifestError> {
    let root = canonical_root(root)?;

    let tree = scan_with(&root, &config.scan)?;
    let entries = select_entries_with(&tree, &root, &config.entries);
    info!(
        root = %root.display(),
        files = tree.file_count(),
        entries = entries.len(),
        "discovered entries"
    );

    let default_template = config.pages.default_template_path(&root);
    if !entries.is_empty() && !default_template.is_file() {
        warn!(
            template = %default_template.display(),
            "default template does not exist"
        );
    }

    let outputs = Outputs(
        entries
            .iter()
            .map(|(name, _)| {
                (
                    name.to_string(),
                    EntryOutput {
                        url: url_segment_of(name, &entries, &root),
                        filename: output_filename_of(name, &entries, &root),
                    },
                )
            })
            .collect(),
    );

    let pages: Vec<PageDescriptor> = PageAssembler::from_config(&entries, &root, config)
        .pages()
        .collect();
    let entry_descriptors = entry_descriptors(&entries, &config.shared);

    Ok(Manifest {
        root,
        entries,
        entry_descriptors,
        outputs,
        pages,
    })
}

fn canonical_root(root: &Path) -> Result<PathBuf, ScanError> {
    Ok(fs::canonicalize(root)?)
}
