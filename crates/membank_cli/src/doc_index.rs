//! INDEX.md generation: scan the development tree and the public docs
//! tree for markdown files and render a navigable index.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, NaiveDateTime};
use serde::Serialize;

/// Files younger than this many whole days get the `**RECENT**` marker.
pub const DAYS_RECENT: i64 = 7;

/// Cap on the "Recently Modified" list.
const RECENT_LIST_LIMIT: usize = 10;

/// Directory names never descended into, on top of the dot-prefix rule.
pub const EXCLUDED_DIRS: [&str; 1] = ["scripts"];

/// Labels and development-relative targets highlighted at the top of the
/// index. Missing targets are still listed, annotated as not found.
pub const QUICK_LINKS: [(&str, &str); 4] = [
    ("Current Status", "CURRENT-STATUS.md"),
    ("Tech Debt", "tech-debt/README.md"),
    ("Specs", "specs/README.md"),
    ("ADR", "reference/decisions/README.md"),
];

/// Development folders listed first, in this order; anything else trails
/// lexicographically.
const FOLDER_ORDER: [&str; 5] = ["root", "specs", "tech-debt", "reference", "archive"];

/// One indexed markdown file. `rel_path` uses forward slashes and is
/// relative to the scan anchor, so it works as a markdown link target.
#[derive(Debug, Clone)]
pub struct DocFileEntry {
    pub name: String,
    pub rel_path: String,
    pub size_kb: u64,
    pub modified: NaiveDateTime,
}

/// Quick-link line resolved against the development tree.
#[derive(Debug, Clone)]
pub struct QuickLink {
    pub label: &'static str,
    pub target: &'static str,
    pub exists: bool,
}

#[derive(Debug)]
pub enum DocIndexError {
    ListDir { path: PathBuf, message: String },
    ReadEntry { path: PathBuf, message: String },
    WriteIndex { path: PathBuf, message: String },
}

impl fmt::Display for DocIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocIndexError::ListDir { path, message } => {
                write!(f, "list {}: {}", path.display(), message)
            }
            DocIndexError::ReadEntry { path, message } => {
                write!(f, "read {}: {}", path.display(), message)
            }
            DocIndexError::WriteIndex { path, message } => {
                write!(f, "write {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for DocIndexError {}

/// Recursively collects `.md` files under `dir`, grouped by the folder part
/// of their anchor-relative path (`"root"` for direct children).
///
/// Entries are visited in name order, so within a folder the files arrive
/// name-sorted. Dot-prefixed names and `excluded` directories are skipped.
/// A missing `dir` yields an empty map; an unreadable entry is fatal.
pub fn scan_markdown_tree(
    dir: &Path,
    prefix: &str,
    excluded: &[&str],
) -> Result<BTreeMap<String, Vec<DocFileEntry>>, DocIndexError> {
    let mut result = BTreeMap::new();
    if !dir.exists() {
        return Ok(result);
    }
    scan_into(dir, prefix, excluded, &mut result)?;
    Ok(result)
}

fn scan_into(
    dir: &Path,
    prefix: &str,
    excluded: &[&str],
    result: &mut BTreeMap<String, Vec<DocFileEntry>>,
) -> Result<(), DocIndexError> {
    let entries = fs::read_dir(dir).map_err(|err| DocIndexError::ListDir {
        path: dir.to_path_buf(),
        message: err.to_string(),
    })?;
    let mut entries: Vec<_> = entries
        .collect::<Result<_, _>>()
        .map_err(|err| DocIndexError::ListDir {
            path: dir.to_path_buf(),
            message: err.to_string(),
        })?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        if name.starts_with('.') || excluded.contains(&name.as_str()) {
            continue;
        }
        let path = entry.path();
        let rel_path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };

        if path.is_dir() {
            scan_into(&path, &rel_path, excluded, result)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("md") {
            let metadata = fs::metadata(&path).map_err(|err| DocIndexError::ReadEntry {
                path: path.clone(),
                message: err.to_string(),
            })?;
            let modified = metadata.modified().map_err(|err| DocIndexError::ReadEntry {
                path: path.clone(),
                message: err.to_string(),
            })?;
            let folder = if prefix.is_empty() {
                "root".to_string()
            } else {
                prefix.to_string()
            };
            result.entry(folder).or_default().push(DocFileEntry {
                name,
                rel_path,
                size_kb: metadata.len() / 1024,
                modified: DateTime::<Local>::from(modified).naive_local(),
            });
        }
    }
    Ok(())
}

/// Resolves the quick-link targets against the development tree.
pub fn resolve_quick_links(development_dir: &Path) -> Vec<QuickLink> {
    QUICK_LINKS
        .iter()
        .map(|(label, target)| QuickLink {
            label,
            target,
            exists: development_dir.join(target).exists(),
        })
        .collect()
}

fn format_file_entry(entry: &DocFileEntry, now: NaiveDateTime) -> String {
    let days_ago = (now - entry.modified).num_days();
    let recent_marker = if days_ago <= DAYS_RECENT {
        " **RECENT**"
    } else {
        ""
    };
    let size = if entry.size_kb > 0 {
        format!("{}KB", entry.size_kb)
    } else {
        "<1KB".to_string()
    };
    format!(
        "- [{}]({}) ({}, {}){}",
        entry.name,
        entry.rel_path,
        size,
        entry.modified.format("%Y-%m-%d"),
        recent_marker
    )
}

/// Development-section folder rank: first path component against the fixed
/// order list, unknown components rank 99, ties break lexicographically.
fn folder_rank(folder: &str) -> (usize, &str) {
    let head = folder.split('/').next().unwrap_or(folder);
    let rank = FOLDER_ORDER
        .iter()
        .position(|known| *known == head)
        .unwrap_or(99);
    (rank, folder)
}

/// Renders the whole INDEX.md document. Pure given the scanned entries and
/// a frozen clock; the result carries no trailing newline.
pub fn render_index(
    project_name: &str,
    quick_links: &[QuickLink],
    dev_files: &BTreeMap<String, Vec<DocFileEntry>>,
    docs_files: Option<&BTreeMap<String, Vec<DocFileEntry>>>,
    now: NaiveDateTime,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "# INDEX - {} Development Documentation",
        project_name
    ));
    lines.push(String::new());
    lines.push(format!("*Auto-generated: {}*", now.format("%Y-%m-%d %H:%M")));
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## Quick Links".to_string());
    lines.push(String::new());
    for link in quick_links {
        if link.exists {
            lines.push(format!("- [{}]({})", link.label, link.target));
        } else {
            lines.push(format!(
                "- {} *(file not found: {})*",
                link.label, link.target
            ));
        }
    }
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## Development Documentation (.development/)".to_string());
    lines.push(String::new());
    lines.push("*Not committed to git - specs, tech-debt, decisions*".to_string());
    lines.push(String::new());

    let mut dev_folders: Vec<&String> = dev_files.keys().collect();
    dev_folders.sort_by_key(|folder| folder_rank(folder));
    for folder in dev_folders {
        let files = &dev_files[folder];
        if files.is_empty() {
            continue;
        }
        let display = if folder == "root" { "(root)" } else { folder };
        lines.push(format!("### {}/ ({} files)", display, files.len()));
        lines.push(String::new());

        // Newest first; the stable sort keeps name order on mtime ties.
        let mut files: Vec<&DocFileEntry> = files.iter().collect();
        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        for file in files {
            lines.push(format_file_entry(file, now));
        }
        lines.push(String::new());
    }

    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## Public Documentation (docs/)".to_string());
    lines.push(String::new());
    lines.push("*Committed to git - user-facing documentation*".to_string());
    lines.push(String::new());

    match docs_files {
        Some(docs_files) => {
            for (folder, files) in docs_files {
                if files.is_empty() {
                    continue;
                }
                lines.push(format!("### {}/", folder));
                lines.push(String::new());
                for file in files {
                    lines.push(format_file_entry(file, now));
                }
                lines.push(String::new());
            }
        }
        None => {
            lines.push("*docs/ folder not found*".to_string());
            lines.push(String::new());
        }
    }

    lines.push("---".to_string());
    lines.push(String::new());

    lines.push(format!("## Recently Modified (last {} days)", DAYS_RECENT));
    lines.push(String::new());

    let cutoff = now - Duration::days(DAYS_RECENT);
    let mut recent: Vec<&DocFileEntry> = dev_files
        .values()
        .flatten()
        .filter(|file| file.modified > cutoff)
        .collect();
    recent.sort_by(|a, b| b.modified.cmp(&a.modified));
    if recent.is_empty() {
        lines.push(format!(
            "*No files modified in the last {} days*",
            DAYS_RECENT
        ));
    } else {
        for (i, file) in recent.iter().take(RECENT_LIST_LIMIT).enumerate() {
            let days = (now - file.modified).num_days();
            let age = if days == 0 {
                "today".to_string()
            } else {
                format!("{}d ago", days)
            };
            lines.push(format!(
                "{}. [{}]({}) ({})",
                i + 1,
                file.name,
                file.rel_path,
                age
            ));
        }
    }

    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("*Run `membank-cli generate-index` to regenerate*".to_string());

    lines.join("\n")
}

#[derive(Debug, Clone)]
pub struct GenerateIndexInput {
    pub root: PathBuf,
    pub development_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub output_path: PathBuf,
    pub project_name: String,
    pub now: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct GenerateIndexOutput {
    pub index_path: PathBuf,
    pub development_files: usize,
    pub docs_files: usize,
}

/// Scans both documentation trees and writes the rendered index.
///
/// Development paths are anchored at the development directory, docs paths
/// at the project root, so both link correctly from the index's location.
pub fn generate_index(input: GenerateIndexInput) -> Result<GenerateIndexOutput, DocIndexError> {
    let dev_files = scan_markdown_tree(&input.development_dir, "", &EXCLUDED_DIRS)?;

    let docs_files = if input.docs_dir.exists() {
        let prefix = docs_prefix(&input.root, &input.docs_dir);
        Some(scan_markdown_tree(&input.docs_dir, &prefix, &EXCLUDED_DIRS)?)
    } else {
        None
    };

    let quick_links = resolve_quick_links(&input.development_dir);
    let content = render_index(
        &input.project_name,
        &quick_links,
        &dev_files,
        docs_files.as_ref(),
        input.now,
    );
    fs::write(&input.output_path, &content).map_err(|err| DocIndexError::WriteIndex {
        path: input.output_path.clone(),
        message: err.to_string(),
    })?;

    Ok(GenerateIndexOutput {
        index_path: input.output_path,
        development_files: dev_files.values().map(Vec::len).sum(),
        docs_files: docs_files
            .as_ref()
            .map(|files| files.values().map(Vec::len).sum())
            .unwrap_or(0),
    })
}

/// Root-relative forward-slash prefix for docs entries; falls back to the
/// directory's own name when the docs dir does not sit under the root.
fn docs_prefix(root: &Path, docs_dir: &Path) -> String {
    let rel = docs_dir.strip_prefix(root).unwrap_or(docs_dir);
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|part| part.as_os_str().to_str())
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .expect("date")
            .and_hms_opt(12, 30, 0)
            .expect("time")
    }

    fn entry(name: &str, rel_path: &str, size_kb: u64, modified: NaiveDateTime) -> DocFileEntry {
        DocFileEntry {
            name: name.to_string(),
            rel_path: rel_path.to_string(),
            size_kb,
            modified,
        }
    }

    fn days_before(now: NaiveDateTime, days: i64) -> NaiveDateTime {
        now - Duration::days(days)
    }

    #[test]
    fn scan_groups_by_folder_and_skips_excluded() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dev = temp.path();
        std::fs::create_dir_all(dev.join("specs")).expect("create specs");
        std::fs::create_dir_all(dev.join("scripts")).expect("create scripts");
        std::fs::create_dir_all(dev.join(".cache")).expect("create dot dir");
        std::fs::write(dev.join("CURRENT-STATUS.md"), "# Status\n").expect("write");
        std::fs::write(dev.join("specs").join("api.md"), "# API\n").expect("write");
        std::fs::write(dev.join("scripts").join("note.md"), "skipped\n").expect("write");
        std::fs::write(dev.join(".cache").join("hidden.md"), "skipped\n").expect("write");
        std::fs::write(dev.join("notes.txt"), "not markdown\n").expect("write");

        let files = scan_markdown_tree(dev, "", &EXCLUDED_DIRS).expect("scan");
        let folders: Vec<&String> = files.keys().collect();
        assert_eq!(folders, ["root", "specs"]);
        assert_eq!(files["root"].len(), 1);
        assert_eq!(files["root"][0].name, "CURRENT-STATUS.md");
        assert_eq!(files["root"][0].rel_path, "CURRENT-STATUS.md");
        assert_eq!(files["specs"][0].rel_path, "specs/api.md");
    }

    #[test]
    fn scan_of_missing_directory_is_empty_not_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let files =
            scan_markdown_tree(&temp.path().join("absent"), "", &EXCLUDED_DIRS).expect("scan");
        assert!(files.is_empty());
    }

    #[test]
    fn file_entries_carry_size_floor_and_recent_marker() {
        let now = fixed_now();
        let small = entry("a.md", "a.md", 0, days_before(now, 2));
        assert_eq!(
            format_file_entry(&small, now),
            "- [a.md](a.md) (<1KB, 2024-04-29) **RECENT**"
        );
        let old = entry("b.md", "specs/b.md", 12, days_before(now, 30));
        assert_eq!(
            format_file_entry(&old, now),
            "- [b.md](specs/b.md) (12KB, 2024-04-01)"
        );
    }

    #[test]
    fn dev_folders_follow_the_fixed_order_then_lexicographic() {
        assert!(folder_rank("root") < folder_rank("specs"));
        assert!(folder_rank("specs") < folder_rank("tech-debt"));
        assert!(folder_rank("archive") < folder_rank("aaa-extra"));
        assert!(folder_rank("aaa-extra") < folder_rank("zzz-extra"));
        // Subfolders rank by their first component.
        assert!(folder_rank("reference/decisions") < folder_rank("archive"));
    }

    #[test]
    fn render_lists_missing_quick_links_and_missing_docs_tree() {
        let links = vec![
            QuickLink {
                label: "Current Status",
                target: "CURRENT-STATUS.md",
                exists: true,
            },
            QuickLink {
                label: "Specs",
                target: "specs/README.md",
                exists: false,
            },
        ];
        let index = render_index("sheet-atlas", &links, &BTreeMap::new(), None, fixed_now());
        assert!(index.starts_with("# INDEX - sheet-atlas Development Documentation\n"));
        assert!(index.contains("- [Current Status](CURRENT-STATUS.md)"));
        assert!(index.contains("- Specs *(file not found: specs/README.md)*"));
        assert!(index.contains("*docs/ folder not found*"));
        assert!(index.contains("*No files modified in the last 7 days*"));
        assert!(index.ends_with("*Run `membank-cli generate-index` to regenerate*"));
    }

    #[test]
    fn dev_section_sorts_newest_first_with_counts() {
        let now = fixed_now();
        let mut dev = BTreeMap::new();
        dev.insert(
            "root".to_string(),
            vec![
                entry("old.md", "old.md", 1, days_before(now, 20)),
                entry("new.md", "new.md", 1, days_before(now, 1)),
            ],
        );
        let index = render_index("p", &[], &dev, None, now);
        assert!(index.contains("### (root)/ (2 files)"));
        let new_at = index.find("- [new.md]").expect("new entry");
        let old_at = index.find("- [old.md]").expect("old entry");
        assert!(new_at < old_at, "newest first:\n{}", index);
    }

    #[test]
    fn recent_list_is_numbered_newest_first_with_today() {
        let now = fixed_now();
        let mut dev = BTreeMap::new();
        dev.insert(
            "root".to_string(),
            vec![
                entry("today.md", "today.md", 1, now),
                entry("older.md", "older.md", 1, days_before(now, 3)),
                entry("stale.md", "stale.md", 1, days_before(now, 7)),
            ],
        );
        let index = render_index("p", &[], &dev, None, now);
        assert!(index.contains("1. [today.md](today.md) (today)"));
        assert!(index.contains("2. [older.md](older.md) (3d ago)"));
        assert!(
            !index.contains("(7d ago)"),
            "files at the cutoff stay out of the recent list:\n{}",
            index
        );
        // The marker threshold is inclusive, the recent list is strict.
        assert!(index.contains("- [stale.md](stale.md) (1KB, 2024-04-24) **RECENT**\n"));
    }

    #[test]
    fn generate_index_writes_the_file_and_counts_both_trees() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        let dev = root.join(".development");
        std::fs::create_dir_all(dev.join("tech-debt")).expect("create dev");
        std::fs::write(dev.join("CURRENT-STATUS.md"), "# Status\n").expect("write");
        std::fs::write(dev.join("tech-debt").join("README.md"), "# Debt\n").expect("write");
        let docs = root.join("docs");
        std::fs::create_dir_all(&docs).expect("create docs");
        std::fs::write(docs.join("guide.md"), "# Guide\n").expect("write");

        let out = generate_index(GenerateIndexInput {
            root: root.to_path_buf(),
            development_dir: dev.clone(),
            docs_dir: docs,
            output_path: dev.join("INDEX.md"),
            project_name: "sheet-atlas".to_string(),
            now: fixed_now(),
        })
        .expect("generate");
        assert_eq!(out.development_files, 2);
        assert_eq!(out.docs_files, 1);

        let index = std::fs::read_to_string(out.index_path).expect("read index");
        assert!(index.contains("- [Current Status](CURRENT-STATUS.md)"));
        assert!(index.contains("- [Tech Debt](tech-debt/README.md)"));
        assert!(index.contains("- Specs *(file not found: specs/README.md)*"));
        assert!(index.contains("### docs/"));
        assert!(index.contains("(docs/guide.md)"));
        assert!(!index.ends_with('\n'), "no trailing newline");
    }
}
