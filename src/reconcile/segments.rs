use crate::consts::{CONFLICT_END, CONFLICT_SEPARATOR, CONFLICT_START, HUNK_SPLIT_MARKER};
use crate::models::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InOriginal,
    InUpdated,
}

/// Tokenizes text containing conflict markers into alternating common and
/// conflict segments.
///
/// Markers are recognized after trimming the line. Unbalanced input degrades
/// gracefully: a `>>>>>>>` before any `=======` closes the block with empty
/// updated lines, and lines still buffered inside an unterminated block at
/// end of input are dropped.
pub fn parse_conflict_segments(text: &str) -> Vec<Segment> {
    let normalized = text.replace("\r\n", "\n");
    let mut segments = Vec::new();
    let mut state = State::Normal;
    let mut common: Vec<String> = Vec::new();
    let mut original: Vec<String> = Vec::new();
    let mut updated: Vec<String> = Vec::new();

    for line in normalized.split('\n') {
        let trimmed = line.trim();
        match state {
            State::Normal => {
                if trimmed.starts_with(CONFLICT_START) {
                    if !common.is_empty() {
                        segments.push(Segment::Common {
                            lines: std::mem::take(&mut common),
                        });
                    }
                    state = State::InOriginal;
                } else {
                    common.push(line.to_string());
                }
            }
            State::InOriginal => {
                if trimmed.starts_with(CONFLICT_SEPARATOR) {
                    state = State::InUpdated;
                } else if trimmed.starts_with(CONFLICT_END) {
                    segments.push(Segment::Conflict {
                        original_lines: std::mem::take(&mut original),
                        updated_lines: Vec::new(),
                    });
                    state = State::Normal;
                } else {
                    original.push(line.to_string());
                }
            }
            State::InUpdated => {
                if trimmed.starts_with(CONFLICT_END) {
                    segments.push(Segment::Conflict {
                        original_lines: std::mem::take(&mut original),
                        updated_lines: std::mem::take(&mut updated),
                    });
                    state = State::Normal;
                } else {
                    updated.push(line.to_string());
                }
            }
        }
    }

    if state == State::Normal && !common.is_empty() {
        segments.push(Segment::Common { lines: common });
    }

    segments
}

/// Expands conflict blocks whose halves are split into matching parts by
/// `...` lines into independent blocks sharing the same label, so one
/// marker can express several non-contiguous edits.
///
/// Blocks without a matching split count, and malformed blocks, pass
/// through untouched.
pub fn expand_multi_hunk_markers(content: &str) -> String {
    if !content.contains(CONFLICT_START) {
        return content.to_string();
    }

    let normalized = content.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut out: Vec<String> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();
        if let Some(label) = trimmed.strip_prefix(CONFLICT_START) {
            if let Some(block) = scan_block(&lines, i) {
                emit_block(&mut out, label.trim(), &block);
                i = block.end_index + 1;
                continue;
            }
        }
        out.push(lines[i].to_string());
        i += 1;
    }

    out.join("\n")
}

struct MarkerBlock<'a> {
    original: Vec<&'a str>,
    updated: Vec<&'a str>,
    end_label: String,
    end_index: usize,
}

fn scan_block<'a>(lines: &[&'a str], start: usize) -> Option<MarkerBlock<'a>> {
    let mut original = Vec::new();
    let mut updated = Vec::new();
    let mut separated = false;

    for (offset, line) in lines.iter().enumerate().skip(start + 1) {
        let trimmed = line.trim();
        if !separated && trimmed.starts_with(CONFLICT_SEPARATOR) {
            separated = true;
        } else if let Some(label) = trimmed.strip_prefix(CONFLICT_END) {
            if !separated {
                return None;
            }
            return Some(MarkerBlock {
                original,
                updated,
                end_label: label.trim().to_string(),
                end_index: offset,
            });
        } else if separated {
            updated.push(*line);
        } else {
            original.push(*line);
        }
    }
    None
}

fn emit_block(out: &mut Vec<String>, label: &str, block: &MarkerBlock<'_>) {
    let original_parts = split_on_marker(&block.original);
    let updated_parts = split_on_marker(&block.updated);

    let parts: Vec<(&[&str], &[&str])> =
        if original_parts.len() > 1 && original_parts.len() == updated_parts.len() {
            original_parts
                .iter()
                .zip(&updated_parts)
                .map(|(o, u)| (o.as_slice(), u.as_slice()))
                .collect()
        } else {
            vec![(block.original.as_slice(), block.updated.as_slice())]
        };

    for (original, updated) in parts {
        out.push(marker_line(CONFLICT_START, label));
        out.extend(original.iter().map(|l| l.to_string()));
        out.push(CONFLICT_SEPARATOR.to_string());
        out.extend(updated.iter().map(|l| l.to_string()));
        out.push(marker_line(CONFLICT_END, &block.end_label));
    }
}

fn marker_line(marker: &str, label: &str) -> String {
    if label.is_empty() {
        marker.to_string()
    } else {
        format!("{} {}", marker, label)
    }
}

fn split_on_marker<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut parts: Vec<Vec<&'a str>> = Vec::new();
    let mut current: Vec<&'a str> = Vec::new();
    for line in lines {
        if line.trim() == HUNK_SPLIT_MARKER {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(*line);
        }
    }
    parts.push(current);
    parts
}
