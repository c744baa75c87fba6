//! Library side of the `membank-cli` binary: one module per maintenance
//! command, each exposing an `*Input` / `*Output` pair and keeping the
//! filesystem work at the edge so the text processing stays pure.

use std::path::{Path, PathBuf};

pub mod doc_index;
pub mod session_archive;
pub mod tech_debt;

/// Directory holding the project-internal documentation tree.
pub const DEVELOPMENT_DIR_NAME: &str = ".development";

/// Directory holding the public, committed documentation tree.
pub const DOCS_DIR_NAME: &str = "docs";

pub fn default_development_dir(root: &Path) -> PathBuf {
    root.join(DEVELOPMENT_DIR_NAME)
}

pub fn default_tech_debt_dir(root: &Path) -> PathBuf {
    default_development_dir(root).join("tech-debt")
}

pub fn default_docs_dir(root: &Path) -> PathBuf {
    root.join(DOCS_DIR_NAME)
}
