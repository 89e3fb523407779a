//! # page-scout
//!
//! Convention-based entry discovery for multi-page bundler builds. Point it at
//! a pages directory and it works out, without any hand-written entry list,
//! which files are entries, where each page's bundle and HTML document go,
//! and which template each page renders.
//!
//! # Conventions
//!
//! ```text
//! src/pages/
//! ├── index.html                 # Default template
//! ├── index.js                   # Entry "index"  → /index.html
//! ├── about/
//! │   ├── about.js               # Entry "about"  → /about/index.html
//! │   ├── about.html             # Template override for "about"
//! │   └── helper.js              # Not an entry (name ≠ folder)
//! └── blog/
//!     └── posts/
//!         └── posts.js           # Entry "posts"  → /blog/posts/index.html
//! ```
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan      pages/   →  TreeNode     (filesystem → in-memory tree)
//! 2. Select    tree     →  EntryMap     (naming conventions)
//! 3. Resolve   entries  →  URL segments, bundle filename patterns
//! 4. Assemble  entries  →  page descriptors, entry descriptors
//! ```
//!
//! Every stage is a synchronous pure function of its inputs. The bundler
//! consumes the results; hashing, bundling and HTML rendering stay on its
//! side, which is why bundle filenames carry a literal `[contenthash]`
//! placeholder.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`tree`] | Recursive directory scan into a [`tree::TreeNode`] tree |
//! | [`entries`] | Convention rule table and the ordered [`entries::EntryMap`] |
//! | [`resolve`] | Path → URL segment normalization, bundle filename patterns |
//! | [`pages`] | HTML page descriptors and shared-chunk entry descriptors |
//! | [`manifest`] | Runs all stages and collects one serializable manifest |
//! | [`config`] | `page-scout.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |

pub mod config;
pub mod entries;
pub mod manifest;
pub mod output;
pub mod pages;
pub mod resolve;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_helpers;
