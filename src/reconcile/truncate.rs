use std::sync::LazyLock;

use regex::Regex;

use crate::consts::{MAX_RESYNC_LINES, TRUNCATION_MARKER_PATTERN};

use super::detect_line_ending;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TRUNCATION_MARKER_PATTERN).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Code,
    Truncation,
}

#[derive(Debug)]
struct Block<'a> {
    kind: BlockKind,
    lines: Vec<&'a str>,
}

/// Restores elided regions of a truncated rewrite by re-synchronizing
/// against the original file.
///
/// Literal code lines are emitted verbatim; each comment-style ellipsis
/// line is backfilled with the original's lines between the surrounding
/// anchors. Total: when an anchor cannot be located the affected span
/// falls back to file start/end, never an error.
pub fn reconstruct_truncated(new_text: &str, original_text: &str) -> String {
    let eol = detect_line_ending(original_text);
    let original_trailing_newline = original_text.ends_with('\n');

    let original_lines = content_lines(original_text);
    let new_lines = content_lines(new_text);
    let blocks = classify_blocks(&new_lines);

    let mut out: Vec<&str> = Vec::new();
    let mut cursor = 0usize;

    for (index, block) in blocks.iter().enumerate() {
        match block.kind {
            BlockKind::Code => {
                out.extend(&block.lines);
                if let Some(end) = match_suffix(&block.lines, &original_lines, cursor) {
                    cursor = end;
                }
            }
            BlockKind::Truncation => {
                let fill_end = blocks[index + 1..]
                    .iter()
                    .find(|b| b.kind == BlockKind::Code)
                    .and_then(|next| match_prefix(&next.lines, &original_lines, cursor))
                    .unwrap_or(original_lines.len());
                out.extend(&original_lines[cursor.min(fill_end)..fill_end]);
                cursor = fill_end;
            }
        }
    }

    let mut result = out.join(eol);
    if original_trailing_newline && !result.is_empty() {
        result.push_str(eol);
    }
    result
}

fn content_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    if text.ends_with('\n') {
        lines.pop();
    }
    lines
}

fn classify_blocks<'a>(lines: &[&'a str]) -> Vec<Block<'a>> {
    let mut blocks: Vec<Block<'a>> = Vec::new();
    for line in lines {
        if MARKER_RE.is_match(line) {
            blocks.push(Block {
                kind: BlockKind::Truncation,
                lines: vec![*line],
            });
        } else if let Some(last) = blocks.last_mut().filter(|b| b.kind == BlockKind::Code) {
            last.lines.push(*line);
        } else {
            blocks.push(Block {
                kind: BlockKind::Code,
                lines: vec![*line],
            });
        }
    }
    blocks
}

/// Finds where a code block's tail sits in the original, trying the
/// longest window first (up to [`MAX_RESYNC_LINES`] lines), exact match
/// before whitespace-trimmed. Returns the index just past the match.
fn match_suffix(block: &[&str], original: &[&str], from: usize) -> Option<usize> {
    let max = MAX_RESYNC_LINES.min(block.len());
    for len in (1..=max).rev() {
        let window = &block[block.len() - len..];
        for trimmed in [false, true] {
            if let Some(start) = find_window(original, window, from, trimmed) {
                return Some(start + len);
            }
        }
    }
    None
}

/// Finds where the next code block begins in the original. Returns the
/// match's start index, the exclusive end of the span to backfill.
fn match_prefix(block: &[&str], original: &[&str], from: usize) -> Option<usize> {
    let max = MAX_RESYNC_LINES.min(block.len());
    for len in (1..=max).rev() {
        let window = &block[..len];
        for trimmed in [false, true] {
            if let Some(start) = find_window(original, window, from, trimmed) {
                return Some(start);
            }
        }
    }
    None
}

fn find_window(lines: &[&str], window: &[&str], from: usize, trimmed: bool) -> Option<usize> {
    if window.is_empty() || from + window.len() > lines.len() {
        return None;
    }
    (from..=lines.len() - window.len()).find(|&start| {
        window.iter().enumerate().all(|(i, w)| {
            let line = lines[start + i];
            if trimmed { line.trim() == w.trim() } else { line == *w }
        })
    })
}
