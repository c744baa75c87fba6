//! Session-transcript archiving. A session-end hook pipes a JSON payload
//! on stdin; the referenced transcript is copied into the project's
//! `.memory-bank/sessions/` directory under a timestamped name.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Directory whose presence marks the project root.
pub const MEMORY_BANK_DIR_NAME: &str = ".memory-bank";

/// Archive directory under the memory bank.
pub const SESSIONS_DIR_NAME: &str = "sessions";

/// Characters of the session id kept in the destination filename.
const SHORT_ID_LEN: usize = 8;

/// Hook payload read from stdin. Every field is optional; unknown fields
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionHookPayload {
    #[serde(default = "default_session_id")]
    pub session_id: String,
    #[serde(default)]
    pub transcript_path: PathBuf,
    #[serde(default = "default_cwd")]
    pub cwd: PathBuf,
    #[serde(default = "default_reason")]
    pub reason: String,
}

fn default_session_id() -> String {
    "unknown".to_string()
}

fn default_cwd() -> PathBuf {
    PathBuf::from(".")
}

fn default_reason() -> String {
    "unknown".to_string()
}

#[derive(Debug)]
pub enum ArchiveError {
    InvalidPayload { message: String },
    TranscriptMissing { path: PathBuf },
    CreateSessionsDir { path: PathBuf, message: String },
    CopyTranscript { from: PathBuf, to: PathBuf, message: String },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::InvalidPayload { message } => {
                write!(f, "parse session payload: {}", message)
            }
            ArchiveError::TranscriptMissing { path } => {
                write!(f, "transcript file not found: {}", path.display())
            }
            ArchiveError::CreateSessionsDir { path, message } => {
                write!(f, "create {}: {}", path.display(), message)
            }
            ArchiveError::CopyTranscript { from, to, message } => {
                write!(f, "copy {} to {}: {}", from.display(), to.display(), message)
            }
        }
    }
}

impl std::error::Error for ArchiveError {}

/// Decodes the stdin JSON payload.
pub fn parse_session_payload(raw: &str) -> Result<SessionHookPayload, ArchiveError> {
    serde_json::from_str(raw).map_err(|err| ArchiveError::InvalidPayload {
        message: err.to_string(),
    })
}

/// Nearest ancestor of `start` containing a `.memory-bank` entry.
///
/// The walk starts from the canonicalized path and stops before the
/// filesystem root; when nothing matches, the canonicalized `start` itself
/// is returned.
pub fn find_project_root(start: &Path) -> PathBuf {
    let resolved = start
        .canonicalize()
        .unwrap_or_else(|_| start.to_path_buf());
    let mut current = resolved.as_path();
    while let Some(parent) = current.parent() {
        if current.join(MEMORY_BANK_DIR_NAME).exists() {
            return current.to_path_buf();
        }
        current = parent;
    }
    resolved
}

#[derive(Debug, Clone)]
pub struct ArchiveSessionInput {
    pub payload: SessionHookPayload,
    pub now: NaiveDateTime,
}

#[derive(Debug, serde::Serialize)]
pub struct ArchiveSessionOutput {
    pub destination: PathBuf,
    pub project_root: PathBuf,
    pub filename: String,
    pub reason: String,
}

/// Copies the transcript into `{root}/.memory-bank/sessions/` as
/// `{YYYY-MM-DD_HHMM}_{short_id}.jsonl`.
///
/// The sessions directory is created (with parents) before the transcript
/// is checked, so a failed run still leaves the archive location in place.
pub fn archive_session(input: ArchiveSessionInput) -> Result<ArchiveSessionOutput, ArchiveError> {
    let payload = input.payload;
    let project_root = find_project_root(&payload.cwd);
    let sessions_dir = project_root
        .join(MEMORY_BANK_DIR_NAME)
        .join(SESSIONS_DIR_NAME);
    fs::create_dir_all(&sessions_dir).map_err(|err| ArchiveError::CreateSessionsDir {
        path: sessions_dir.clone(),
        message: err.to_string(),
    })?;

    if !payload.transcript_path.exists() {
        return Err(ArchiveError::TranscriptMissing {
            path: payload.transcript_path,
        });
    }

    let short_id: String = payload.session_id.chars().take(SHORT_ID_LEN).collect();
    let filename = format!("{}_{}.jsonl", input.now.format("%Y-%m-%d_%H%M"), short_id);
    let destination = sessions_dir.join(&filename);
    fs::copy(&payload.transcript_path, &destination).map_err(|err| {
        ArchiveError::CopyTranscript {
            from: payload.transcript_path.clone(),
            to: destination.clone(),
            message: err.to_string(),
        }
    })?;

    Ok(ArchiveSessionOutput {
        destination,
        project_root,
        filename,
        reason: payload.reason,
    })
}
