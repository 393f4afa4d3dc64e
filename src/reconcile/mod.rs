pub mod cleanup;
pub mod diff;
pub mod diff_utils;
pub mod markers;
pub mod response;
pub mod segments;
pub mod truncate;

use std::sync::LazyLock;

use regex::Regex;

use crate::consts::{CONFLICT_SEPARATOR, CONFLICT_START, TRUNCATION_MARKER_PATTERN};
use crate::exceptions::RestitchError;
use crate::models::EditFormat;

static HUNK_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@@ -\d+(?:,\d+)? \+\d+(?:,\d+)? @@").unwrap());

static TRUNCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TRUNCATION_MARKER_PATTERN).unwrap());

/// Line-ending convention of a file, detected once and reused for all
/// inserted text.
pub(crate) fn detect_line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Decides which applier a parsed file body belongs to.
///
/// Order matters: a unified diff may legitimately contain conflict-marker
/// lines in its hunk bodies, so the diff check runs first, and truncation
/// markers inside a marker block never trigger reconstruction.
pub fn detect_edit_format(content: &str, has_original: bool) -> EditFormat {
    if looks_like_unified_diff(content) {
        return EditFormat::UnifiedDiff;
    }
    if has_conflict_block(content) {
        return EditFormat::ConflictMarkers;
    }
    if has_original && content.lines().any(|l| TRUNCATION_RE.is_match(l)) {
        return EditFormat::Truncated;
    }
    EditFormat::FullBody
}

fn looks_like_unified_diff(content: &str) -> bool {
    let trimmed = content.trim_start();
    if trimmed.starts_with("diff --git") {
        return true;
    }
    if HUNK_HEADER_RE.is_match(trimmed.lines().next().unwrap_or("")) {
        return true;
    }
    let mut has_old_header = false;
    let mut has_new_header = false;
    let mut has_hunk = false;
    for line in content.lines() {
        has_old_header |= line.starts_with("--- ");
        has_new_header |= line.starts_with("+++ ");
        has_hunk |= HUNK_HEADER_RE.is_match(line);
    }
    has_old_header && has_new_header && has_hunk
}

fn has_conflict_block(content: &str) -> bool {
    let mut opened = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(CONFLICT_START) {
            opened = true;
        } else if opened && trimmed.starts_with(CONFLICT_SEPARATOR) {
            return true;
        }
    }
    false
}

/// Reconstructs the final file body for one parsed item.
///
/// `original` is `None` when the file does not exist yet. The caller owns
/// the write to disk; this function is pure.
pub fn reconcile_content(
    original: Option<&str>,
    incoming: &str,
) -> Result<String, RestitchError> {
    match detect_edit_format(incoming, original.is_some()) {
        EditFormat::UnifiedDiff => diff::apply_unified_diff(original.unwrap_or(""), incoming),
        EditFormat::ConflictMarkers => {
            markers::apply_conflict_markers(original.unwrap_or(""), incoming)
        }
        EditFormat::Truncated => Ok(truncate::reconstruct_truncated(
            incoming,
            original.unwrap_or(""),
        )),
        EditFormat::FullBody => Ok(incoming.to_string()),
    }
}
