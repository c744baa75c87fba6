//! Tech-debt README maintenance: scan the issue files, render the
//! "Current Issues by Priority" section, and splice it into README.md.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use membank_core::{extract_title, parse_frontmatter, replace_region};

/// Heading that opens the generated section; also the region marker the
/// replacer searches for.
pub const ISSUES_HEADING: &str = "## Current Issues by Priority";

/// Heading the generated section is inserted before when no region exists.
pub const INSERT_ANCHOR: &str = "## Integration";

/// Direct children of the issues directory that are never issues.
pub const EXCLUDED_FILES: [&str; 2] = ["README.md", "_TEMPLATE.md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityBucket {
    pub id: &'static str,
    pub label: &'static str,
}

/// Display order of the priority buckets. Unrecognized priorities fall
/// into the last (lowest) bucket.
pub const PRIORITY_BUCKETS: [PriorityBucket; 3] = [
    PriorityBucket {
        id: "high",
        label: "High",
    },
    PriorityBucket {
        id: "medium",
        label: "Medium",
    },
    PriorityBucket {
        id: "low",
        label: "Low",
    },
];

/// One scanned issue file. `priority` keeps the file's original casing;
/// grouping goes through [`bucket_for`].
#[derive(Debug, Clone, Serialize)]
pub struct IssueRecord {
    pub filename: String,
    pub title: String,
    pub priority: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub discovered: String,
}

#[derive(Debug)]
pub enum TechDebtError {
    ListDir { path: PathBuf, message: String },
    ReadIssue { path: PathBuf, message: String },
    ReadmeMissing { path: PathBuf },
    ReadReadme { path: PathBuf, message: String },
    WriteReadme { path: PathBuf, message: String },
}

impl fmt::Display for TechDebtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TechDebtError::ListDir { path, message } => {
                write!(f, "list {}: {}", path.display(), message)
            }
            TechDebtError::ReadIssue { path, message } => {
                write!(f, "read {}: {}", path.display(), message)
            }
            TechDebtError::ReadmeMissing { path } => {
                write!(f, "README not found at {}", path.display())
            }
            TechDebtError::ReadReadme { path, message } => {
                write!(f, "read {}: {}", path.display(), message)
            }
            TechDebtError::WriteReadme { path, message } => {
                write!(f, "write {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for TechDebtError {}

/// Bucket id a priority value groups under (case-folded, unknown -> low).
pub fn bucket_for(priority: &str) -> &'static str {
    let folded = priority.to_lowercase();
    PRIORITY_BUCKETS
        .iter()
        .find(|bucket| bucket.id == folded)
        .map(|bucket| bucket.id)
        .unwrap_or("low")
}

/// Reads every direct-child `*.md` file of `dir` not named in `excluded`
/// into an [`IssueRecord`].
///
/// Record order follows directory iteration and is unspecified; callers
/// sort. Any unreadable entry fails the whole scan.
pub fn scan_issues(dir: &Path, excluded: &[&str]) -> Result<Vec<IssueRecord>, TechDebtError> {
    let entries = fs::read_dir(dir).map_err(|err| TechDebtError::ListDir {
        path: dir.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut records = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| TechDebtError::ListDir {
            path: dir.to_path_buf(),
            message: err.to_string(),
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            continue;
        }
        let filename = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        if excluded.contains(&filename.as_str()) {
            continue;
        }

        let text = fs::read_to_string(&path).map_err(|err| TechDebtError::ReadIssue {
            path: path.clone(),
            message: err.to_string(),
        })?;
        let frontmatter = parse_frontmatter(&text);
        let field = |key: &str, default: &str| -> String {
            frontmatter
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        records.push(IssueRecord {
            filename,
            title: extract_title(&text),
            priority: field("priority", "low"),
            status: field("status", "open"),
            kind: field("type", "unknown"),
            discovered: field("discovered", ""),
        });
    }
    Ok(records)
}

/// Renders the generated section: heading, timestamp line, then one block
/// per priority bucket with records sorted by filename. Ends with exactly
/// one newline.
pub fn generate_issues_section(records: &[IssueRecord], now: NaiveDateTime) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(ISSUES_HEADING.to_string());
    lines.push(String::new());
    lines.push(format!("*Auto-updated: {}*", now.format("%Y-%m-%d %H:%M")));
    lines.push(String::new());

    for bucket in PRIORITY_BUCKETS {
        let mut grouped: Vec<&IssueRecord> = records
            .iter()
            .filter(|record| bucket_for(&record.priority) == bucket.id)
            .collect();
        grouped.sort_by(|a, b| a.filename.cmp(&b.filename));

        if grouped.is_empty() {
            lines.push(format!("**{} Priority:** None currently", bucket.label));
        } else {
            lines.push(format!("**{} Priority:**", bucket.label));
            for record in grouped {
                lines.push(format!("- `{}` - {}", record.filename, record.title));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[derive(Debug, Clone)]
pub struct UpdateReadmeInput {
    pub issues_dir: PathBuf,
    pub readme_path: PathBuf,
    pub now: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct UpdateReadmeOutput {
    pub readme_path: PathBuf,
    pub issues: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub changed: bool,
}

/// Scans the issues directory and rewrites the generated section of the
/// README in place. The README must already exist.
pub fn update_readme(input: UpdateReadmeInput) -> Result<UpdateReadmeOutput, TechDebtError> {
    let records = scan_issues(&input.issues_dir, &EXCLUDED_FILES)?;

    if !input.readme_path.exists() {
        return Err(TechDebtError::ReadmeMissing {
            path: input.readme_path,
        });
    }
    let document = fs::read_to_string(&input.readme_path).map_err(|err| {
        TechDebtError::ReadReadme {
            path: input.readme_path.clone(),
            message: err.to_string(),
        }
    })?;

    let fragment = generate_issues_section(&records, input.now);
    let updated = replace_region(&document, &fragment, Some(INSERT_ANCHOR));
    let changed = updated != document;
    fs::write(&input.readme_path, &updated).map_err(|err| TechDebtError::WriteReadme {
        path: input.readme_path.clone(),
        message: err.to_string(),
    })?;

    let mut high = 0;
    let mut medium = 0;
    let mut low = 0;
    for record in &records {
        match bucket_for(&record.priority) {
            "high" => high += 1,
            "medium" => medium += 1,
            _ => low += 1,
        }
    }

    Ok(UpdateReadmeOutput {
        readme_path: input.readme_path,
        issues: records.len(),
        high,
        medium,
        low,
        changed,
    })
}
