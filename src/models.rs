use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// --- Segments ---

/// One token of a conflict-marker document: either a run of lines outside
/// any conflict block, or the original/updated halves of one block.
///
/// Concatenating all segments' lines in order reproduces the input with the
/// marker lines removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Common {
        lines: Vec<String>,
    },
    Conflict {
        original_lines: Vec<String>,
        updated_lines: Vec<String>,
    },
}

// --- Response items ---

/// One logical file's full intended body (or patch-origin body) parsed out
/// of a response. Identity key is `(workspace_name, file_path)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileItem {
    pub file_path: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renamed_from: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_deleted: bool,
}

/// Prose interleaved between file blocks, preserved for instruction
/// extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextItem {
    pub content: String,
}

/// A file mentioned by header without any content block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineFileItem {
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseItem {
    File(FileItem),
    Text(TextItem),
    InlineFile(InlineFileItem),
}

impl ResponseItem {
    pub fn as_file(&self) -> Option<&FileItem> {
        match self {
            ResponseItem::File(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextItem> {
        match self {
            ResponseItem::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// How a repeated mention of the same file merges into the existing item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    #[default]
    Overwrite,
    Append,
}

/// Caller-supplied parsing configuration. No global state; plain parameters
/// only.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Known workspace names. A header path whose first component matches
    /// one is split into `(workspace_name, remainder)`.
    pub workspaces: Vec<String>,
    pub merge_mode: MergeMode,
}

// --- Snapshots ---

/// A file's content and existence flag captured before an edit is applied.
/// Rejection restores the filesystem from this; acceptance discards it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OriginalFileState {
    pub file_path: String,
    pub existed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub captured_at: OffsetDateTime,
}

// --- Edit formats ---

/// What kind of edit a parsed file body encodes, decided by
/// [`crate::reconcile::detect_edit_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditFormat {
    UnifiedDiff,
    ConflictMarkers,
    Truncated,
    FullBody,
}

impl std::fmt::Display for EditFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditFormat::UnifiedDiff => write!(f, "unified diff"),
            EditFormat::ConflictMarkers => write!(f, "conflict markers"),
            EditFormat::Truncated => write!(f, "truncated rewrite"),
            EditFormat::FullBody => write!(f, "full body"),
        }
    }
}
