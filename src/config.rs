//! Discovery configuration.
//!
//! Handles loading, validating, and merging `page-scout.toml`. Stock defaults
//! reproduce the plain convention (`.js` entries, a `shared` chunk carrying
//! `react` and `react-dom`, a root-level `index.html` fallback template), so
//! the file is optional and sparse: override only the keys you need.
//!
//! ## Config File Location
//!
//! ```text
//! src/pages/
//! ├── page-scout.toml          # Optional, read from the scan root
//! ├── index.html               # Default template
//! ├── index.js                 # Root entry
//! └── about/
//!     ├── about.js             # Entry "about"
//!     └── about.html           # Template override for "about"
//! ```
//!
//! A config file elsewhere can be passed with `--config`.
//!
//! ## Configuration Options
//!
//! ```toml
//! [entries]
//! extensions = ["js"]       # Source extensions a convention may match
//! index_stem = "index"      # <root>/index.<ext> is the root entry
//!
//! [scan]
//! follow_symlinks = false   # Traverse symlinked directories (cycles are errors)
//!
//! [pages]
//! default_template = "index.html"   # Relative to the scan root, or absolute
//! template_extension = "html"       # <entry>/<entry>.html overrides the default
//! include_shared_chunk = true       # Page chunks are [entry, shared] instead of [entry]
//!
//! [shared]
//! name = "shared"
//! dependencies = ["react", "react-dom"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the scan root when no `--config` is given.
pub const CONFIG_FILE: &str = "page-scout.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full discovery configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoutConfig {
    /// Which files the naming conventions consider.
    pub entries: EntriesConfig,
    /// Tree scanner behavior.
    pub scan: ScanConfig,
    /// Page descriptor assembly.
    pub pages: PagesConfig,
    /// The synthetic shared chunk every page depends on.
    pub shared: SharedConfig,
}

impl ScoutConfig {
    /// Validate config values after merging.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "entries.extensions must not be empty".into(),
            ));
        }
        for ext in &self.entries.extensions {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "entries.extensions: '{ext}' must be a bare extension like \"js\""
                )));
            }
        }
        if self.entries.index_stem.is_empty() {
            return Err(ConfigError::Validation(
                "entries.index_stem must not be empty".into(),
            ));
        }
        if self.pages.default_template.is_empty() {
            return Err(ConfigError::Validation(
                "pages.default_template must not be empty".into(),
            ));
        }
        if self.pages.template_extension.is_empty() || self.pages.template_extension.starts_with('.')
        {
            return Err(ConfigError::Validation(
                "pages.template_extension must be a bare extension like \"html\"".into(),
            ));
        }
        if self.shared.name.is_empty() {
            return Err(ConfigError::Validation(
                "shared.name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntriesConfig {
    /// Extensions (without the dot) of files that can become entries.
    pub extensions: Vec<String>,
    /// Stem of the entry that lives directly in the scan root.
    pub index_stem: String,
}

impl EntriesConfig {
    pub fn is_entry_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }
}

impl Default for EntriesConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["js".to_string()],
            index_stem: "index".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Follow symlinks while scanning. Off by default; when on, a link cycle
    /// is reported as a scan error.
    pub follow_symlinks: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Template used when an entry has no `<entry>.html` of its own.
    pub default_template: String,
    /// Extension of per-entry template overrides.
    pub template_extension: String,
    /// Whether every page also loads the shared chunk.
    pub include_shared_chunk: bool,
}

impl PagesConfig {
    /// Absolute path of the default template for a given scan root.
    pub fn default_template_path(&self, root: &Path) -> PathBuf {
        root.join(&self.default_template)
    }
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            default_template: "index.html".to_string(),
            template_extension: "html".to_string(),
            include_shared_chunk: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
    /// Chunk name of the shared pseudo-entry.
    pub name: String,
    /// Modules bundled once into the shared chunk.
    pub dependencies: Vec<String>,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            name: "shared".to_string(),
            dependencies: vec!["react".to_string(), "react-dom".to_string()],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a TOML table, the bottom layer every config file is
/// laid over.
pub fn default_layer() -> toml::Table {
    toml::Table::try_from(ScoutConfig::default()).expect("default config must serialize")
}

/// Lay `layer` over `base` in place. Sections merge key by key, so a file
/// that sets only `[shared] name` keeps the stock `dependencies`; any other
/// value, arrays included, replaces the base value whole.
pub fn overlay(base: &mut toml::Table, layer: toml::Table) {
    for (key, value) in layer {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(section)), toml::Value::Table(nested)) => {
                overlay(section, nested)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Read one config file as an unvalidated layer.
pub fn read_layer(config_path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(config_path)?;
    Ok(toml::from_str(&content)?)
}

/// Lay `layers` over the stock defaults in order, then deserialize and
/// validate. Unknown keys surface here as parse errors.
pub fn resolve_config(
    layers: impl IntoIterator<Item = toml::Table>,
) -> Result<ScoutConfig, ConfigError> {
    let mut merged = default_layer();
    for layer in layers {
        overlay(&mut merged, layer);
    }
    let config: ScoutConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `page-scout.toml` from the scan root. Without one, the stock
/// defaults apply.
pub fn load_config(root: &Path) -> Result<ScoutConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    let layer = if config_path.is_file() {
        Some(read_layer(&config_path)?)
    } else {
        None
    };
    resolve_config(layer)
}

/// Load an explicitly named config file. A missing file is an error here.
pub fn load_config_file(config_path: &Path) -> Result<ScoutConfig, ConfigError> {
    resolve_config([read_layer(config_path)?])
}

/// Returns a fully-commented stock `page-scout.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# page-scout configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Place this file in the pages directory as page-scout.toml, or pass
# another file with --config. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Entry conventions
# ---------------------------------------------------------------------------
[entries]
# Extensions (no dot) of source files the conventions consider.
#   <root>/index.<ext>        -> entry "index"
#   <dir>/<dir>.<ext>         -> entry "<dir>"
extensions = ["js"]

# Stem of the root-level entry.
index_stem = "index"

# ---------------------------------------------------------------------------
# Scanning
# ---------------------------------------------------------------------------
[scan]
# Traverse symlinked directories. When enabled, a symlink cycle aborts the
# scan with an error instead of recursing forever.
follow_symlinks = false

# ---------------------------------------------------------------------------
# HTML pages
# ---------------------------------------------------------------------------
[pages]
# Template used by entries without their own <entry>.html.
# Relative paths are resolved against the pages directory.
default_template = "index.html"

# Extension of per-entry template overrides.
template_extension = "html"

# Pages load [entry, shared] when true, [entry] alone when false.
include_shared_chunk = true

# ---------------------------------------------------------------------------
# Shared chunk
# ---------------------------------------------------------------------------
[shared]
# Name of the synthetic entry every page depends on.
name = "shared"

# Modules bundled once into the shared chunk.
dependencies = ["react", "react-dom"]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_plain_convention() {
        let config = ScoutConfig::default();
        assert_eq!(config.entries.extensions, vec!["js"]);
        assert_eq!(config.entries.index_stem, "index");
        assert!(!config.scan.follow_symlinks);
        assert_eq!(config.pages.default_template, "index.html");
        assert!(config.pages.include_shared_chunk);
        assert_eq!(config.shared.name, "shared");
        assert_eq!(config.shared.dependencies, vec!["react", "react-dom"]);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[entries]
extensions = ["js", "jsx"]
"#;
        let config: ScoutConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.entries.extensions, vec!["js", "jsx"]);
        assert_eq!(config.entries.index_stem, "index");
        assert_eq!(config.shared.name, "shared");
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[pages]
default_templat = "base.html"
"#;
        let result: Result<ScoutConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn default_template_path_relative_to_root() {
        let pages = PagesConfig::default();
        assert_eq!(
            pages.default_template_path(Path::new("/site/pages")),
            PathBuf::from("/site/pages/index.html")
        );
    }

    #[test]
    fn default_template_path_absolute_kept() {
        let pages = PagesConfig {
            default_template: "/templates/base.html".to_string(),
            ..PagesConfig::default()
        };
        assert_eq!(
            pages.default_template_path(Path::new("/site/pages")),
            PathBuf::from("/templates/base.html")
        );
    }

    #[test]
    fn entry_extension_check() {
        let entries = EntriesConfig::default();
        assert!(entries.is_entry_extension("js"));
        assert!(!entries.is_entry_extension("html"));
        assert!(!entries.is_entry_extension(".js"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, ScoutConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[shared]
name = "vendor"

[pages]
include_shared_chunk = false
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.shared.name, "vendor");
        assert_eq!(config.shared.dependencies, vec!["react", "react-dom"]);
        assert!(!config.pages.include_shared_chunk);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_file_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("custom.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_file_reads_custom_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[entries]\nindex_stem = \"main\"\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.entries.index_stem, "main");
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn dotted_extension_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[entries]\nextensions = [\".js\"]\n",
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_extensions_rejected() {
        let mut config = ScoutConfig::default();
        config.entries.extensions.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_shared_name_rejected() {
        let mut config = ScoutConfig::default();
        config.shared.name = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_template_extension_rejected() {
        let mut config = ScoutConfig::default();
        config.pages.template_extension = String::new();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Merge tests
    // =========================================================================

    #[test]
    fn merge_overlay_replaces_arrays() {
        let layer: toml::Table = toml::from_str("[shared]\ndependencies = [\"preact\"]\n").unwrap();
        let config = resolve_config([layer]).unwrap();
        assert_eq!(config.shared.dependencies, vec!["preact"]);
        assert_eq!(config.shared.name, "shared");
    }

    #[test]
    fn merge_keeps_unrelated_sections() {
        let mut base: toml::Table = toml::from_str("[a]\nx = 1\ny = 2\n[b]\nz = 3\n").unwrap();
        let layer: toml::Table = toml::from_str("[a]\ny = 20\n").unwrap();
        overlay(&mut base, layer);
        assert_eq!(base["a"]["x"].as_integer(), Some(1));
        assert_eq!(base["a"]["y"].as_integer(), Some(20));
        assert_eq!(base["b"]["z"].as_integer(), Some(3));
    }

    #[test]
    fn later_layers_win() {
        let first: toml::Table = toml::from_str("[shared]\nname = \"vendor\"\n").unwrap();
        let second: toml::Table = toml::from_str("[shared]\nname = \"common\"\n").unwrap();
        let config = resolve_config([first, second]).unwrap();
        assert_eq!(config.shared.name, "common");
        assert_eq!(config.shared.dependencies, vec!["react", "react-dom"]);
    }

    #[test]
    fn no_layers_gives_defaults() {
        let config = resolve_config(None).unwrap();
        assert_eq!(config, ScoutConfig::default());
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ScoutConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ScoutConfig::default());
    }
}
