//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `sample_shard`: the `all_63.js` shard checked in under `tests/fixtures/search`
//! - `site`: a temporary documentation tree with that shard and a second,
//!   hand-written one for `d`
//!
//! [`TempWorkspace`] provides the underlying temp directory abstraction.

use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns the project root directory (where Cargo.toml lives).
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Path of the checked-in `c` shard.
pub fn sample_shard_path() -> PathBuf {
    project_root().join("tests/fixtures/search/all_63.js")
}

/// A shard for `d`, written in the same layout Doxygen uses.
#[allow(dead_code)] // Used by some integration test crates only
pub const D_SHARD: &str = "var searchData=
[
  ['dnsquery',['DNSQuery',['../class_d_n_s_query.html',1,'']]],
  ['dnsrecord',['DNSRecord',['../class_d_n_s_record.html',1,'']]]
];
";

/// A temporary directory that is removed when dropped.
///
/// Use this as a building block for test fixtures that need filesystem
/// isolation.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Copies a file from the real filesystem into this workspace.
    ///
    /// # Panics
    /// Panics if copying fails.
    pub fn copy_file(&self, source: &Path, dest_relative: &str) {
        let dest = self.root.join(dest_relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!(
                    "Failed to create parent directory for '{}': {}",
                    dest_relative, e
                )
            });
        }
        std::fs::copy(source, &dest).unwrap_or_else(|e| {
            panic!(
                "Failed to copy '{}' to '{}': {}",
                source.display(),
                dest_relative,
                e
            )
        });
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Source text of the checked-in `c` shard.
#[fixture]
pub fn sample_shard() -> String {
    std::fs::read_to_string(sample_shard_path()).expect("Failed to read sample shard")
}

/// A documentation tree with `html/search/all_63.js` and `html/search/all_64.js`,
/// plus files that must not be picked up as shards.
#[fixture]
pub fn site() -> TempWorkspace {
    let workspace = TempWorkspace::new();
    workspace.copy_file(&sample_shard_path(), "html/search/all_63.js");
    workspace.create_file("html/search/all_64.js", D_SHARD);
    workspace.create_file(
        "html/search/classes_64.js",
        "var searchData=[['dnsloq',['DNSLoq',['../dnsloq.html',1,'']]]];",
    );
    workspace.create_file("html/search/search.js", "function convertToId(search) {}");
    workspace.create_file("html/index.html", "<html></html>");
    workspace
}
