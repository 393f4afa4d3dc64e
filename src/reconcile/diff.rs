use std::sync::LazyLock;

use regex::Regex;

use crate::consts::CONTEXT_ERROR_EXCERPT_CHARS;
use crate::exceptions::RestitchError;

use super::detect_line_ending;

static HUNK_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
enum HunkLine {
    Context(String),
    Remove(String),
    Add(String),
    NoNewline,
}

#[derive(Debug, Clone)]
struct Hunk {
    /// 1-based start line on the old side. A position hint only, used for
    /// insertion hunks with no old-side lines to anchor on.
    old_start: usize,
    lines: Vec<HunkLine>,
    old_remaining: usize,
    new_remaining: usize,
}

impl Hunk {
    fn old_side(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                HunkLine::Context(s) | HunkLine::Remove(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    fn complete(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }
}

/// Applies a unified diff to `original_code`.
///
/// Hunks are applied in file order. Each hunk's old-side line sequence is
/// located by searching the original from the offset where the previous
/// hunk finished (exact match first, whitespace-trimmed fallback); the
/// line numbers in hunk headers are hints, trusted only for hunks with no
/// old-side lines at all.
pub fn apply_unified_diff(original_code: &str, diff_patch: &str) -> Result<String, RestitchError> {
    let hunks = parse_hunks(diff_patch)?;

    let eol = detect_line_ending(original_code);
    let had_trailing_newline = original_code.ends_with('\n');
    let normalized = original_code.replace("\r\n", "\n");
    let mut lines: Vec<&str> = if normalized.is_empty() {
        Vec::new()
    } else {
        normalized.split('\n').collect()
    };
    if had_trailing_newline {
        lines.pop();
    }

    let mut out: Vec<String> = Vec::new();
    let mut cursor = 0usize;
    let mut suppress_trailing_newline = false;

    for hunk in &hunks {
        let old_side = hunk.old_side();

        let anchor = if old_side.is_empty() {
            hunk.old_start.clamp(cursor, lines.len())
        } else {
            locate_old_side(&lines, &old_side, cursor)
                .ok_or_else(|| diff_context_error(&old_side))?
        };

        out.extend(lines[cursor..anchor].iter().map(|l| l.to_string()));

        let mut old_offset = 0usize;
        for line in &hunk.lines {
            match line {
                HunkLine::Context(_) => {
                    // Emit the original's own line so whitespace the
                    // trimmed fallback tolerated survives unchanged.
                    out.push(lines[anchor + old_offset].to_string());
                    old_offset += 1;
                }
                HunkLine::Remove(_) => old_offset += 1,
                HunkLine::Add(content) => out.push(content.clone()),
                HunkLine::NoNewline => {}
            }
        }
        suppress_trailing_newline = hunk.lines.last() == Some(&HunkLine::NoNewline)
            && matches!(
                hunk.lines.iter().rev().find(|l| **l != HunkLine::NoNewline),
                Some(HunkLine::Add(_))
            );

        cursor = anchor + old_side.len();
    }

    out.extend(lines[cursor..].iter().map(|l| l.to_string()));
    if cursor < lines.len() {
        // An untouched tail keeps the original's trailing-newline state.
        suppress_trailing_newline = false;
    }

    let mut result = out.join(eol);
    let wants_newline = if suppress_trailing_newline {
        false
    } else {
        had_trailing_newline || original_code.is_empty()
    };
    if wants_newline && !result.is_empty() {
        result.push_str(eol);
    }
    Ok(result)
}

fn parse_hunks(diff_patch: &str) -> Result<Vec<Hunk>, RestitchError> {
    let normalized = diff_patch.replace("\r\n", "\n");
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut current: Option<Hunk> = None;

    for line in normalized.split('\n') {
        if let Some(caps) = HUNK_HEADER_RE.captures(line) {
            if let Some(hunk) = current.take() {
                hunks.push(hunk);
            }
            let old_start = caps[1]
                .parse::<usize>()
                .map_err(|_| RestitchError::InvalidInput(format!("Bad hunk header: {line}")))?;
            let old_count = parse_count(caps.get(2).map(|m| m.as_str()));
            let new_count = parse_count(caps.get(4).map(|m| m.as_str()));
            current = Some(Hunk {
                old_start,
                lines: Vec::new(),
                old_remaining: old_count,
                new_remaining: new_count,
            });
            continue;
        }

        if current.is_some() {
            let mut terminated = false;
            if let Some(hunk) = current.as_mut() {
                match classify_body_line(line) {
                    Some(HunkLine::Context(s)) => {
                        hunk.lines.push(HunkLine::Context(s));
                        hunk.old_remaining = hunk.old_remaining.saturating_sub(1);
                        hunk.new_remaining = hunk.new_remaining.saturating_sub(1);
                    }
                    Some(HunkLine::Remove(s)) => {
                        hunk.lines.push(HunkLine::Remove(s));
                        hunk.old_remaining = hunk.old_remaining.saturating_sub(1);
                    }
                    Some(HunkLine::Add(s)) => {
                        hunk.lines.push(HunkLine::Add(s));
                        hunk.new_remaining = hunk.new_remaining.saturating_sub(1);
                    }
                    Some(HunkLine::NoNewline) => hunk.lines.push(HunkLine::NoNewline),
                    None => terminated = true,
                }
                terminated = terminated || hunk.complete();
            }
            if terminated && let Some(hunk) = current.take() {
                hunks.push(hunk);
            }
        } else if line.starts_with('\\') {
            // A no-newline marker directly after a completed hunk belongs
            // to that hunk's final line.
            if let Some(last) = hunks.last_mut() {
                last.lines.push(HunkLine::NoNewline);
            }
        }
        // Anything else outside a hunk (file headers, prose) is skipped.
    }
    if let Some(hunk) = current.take() {
        hunks.push(hunk);
    }

    hunks.retain(|h| !h.lines.is_empty());
    if hunks.is_empty() {
        return Err(RestitchError::InvalidInput("No hunks found in diff".into()));
    }
    Ok(hunks)
}

fn parse_count(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse().ok()).unwrap_or(1)
}

fn classify_body_line(line: &str) -> Option<HunkLine> {
    if let Some(rest) = line.strip_prefix('+') {
        Some(HunkLine::Add(rest.to_string()))
    } else if let Some(rest) = line.strip_prefix('-') {
        Some(HunkLine::Remove(rest.to_string()))
    } else if let Some(rest) = line.strip_prefix(' ') {
        Some(HunkLine::Context(rest.to_string()))
    } else if line.starts_with('\\') {
        Some(HunkLine::NoNewline)
    } else if line.is_empty() {
        // Some producers emit blank context lines with the leading space
        // stripped.
        Some(HunkLine::Context(String::new()))
    } else {
        None
    }
}

fn locate_old_side(lines: &[&str], old_side: &[&str], from: usize) -> Option<usize> {
    find_window(lines, old_side, from, false).or_else(|| find_window(lines, old_side, from, true))
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

fn diff_context_error(old_side: &[&str]) -> RestitchError {
    let excerpt: String = old_side
        .join("\n")
        .chars()
        .take(CONTEXT_ERROR_EXCERPT_CHARS)
        .collect();
    RestitchError::DiffContext(excerpt)
}
