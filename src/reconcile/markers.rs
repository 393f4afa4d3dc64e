use regex::Regex;

use crate::consts::CONTEXT_ERROR_EXCERPT_CHARS;
use crate::exceptions::RestitchError;
use crate::models::Segment;

use super::detect_line_ending;
use super::segments::{expand_multi_hunk_markers, parse_conflict_segments};

/// Applies a conflict-marker document to `original_content` via
/// context-anchored search and replace.
///
/// Conflicts apply strictly left to right: a monotone cursor guarantees
/// already-replaced text is never matched again, while matched trailing
/// context stays available as the next conflict's leading anchor. The
/// original file's line-ending convention is detected once and used for all
/// inserted text.
pub fn apply_conflict_markers(
    original_content: &str,
    markers_content: &str,
) -> Result<String, RestitchError> {
    let expanded = expand_multi_hunk_markers(markers_content);
    let segments = parse_conflict_segments(&expanded);
    let eol = detect_line_ending(original_content);

    let mut result = original_content.to_string();
    let mut cursor = 0usize;

    for index in 0..segments.len() {
        let Segment::Conflict {
            original_lines,
            updated_lines,
        } = &segments[index]
        else {
            continue;
        };

        let leading = adjacent_common(&segments, index, Direction::Before);
        let trailing = adjacent_common(&segments, index, Direction::After);

        let search_lines: Vec<&str> = leading
            .iter()
            .chain(original_lines.iter())
            .chain(trailing.iter())
            .map(|s| s.as_str())
            .collect();
        let search_text = search_lines.join("\n");

        if search_text.trim().is_empty() {
            // No anchor at all. Valid only as whole-file creation.
            if result.trim().is_empty() {
                result = updated_lines.join(eol);
                if !result.is_empty() {
                    result.push_str(eol);
                }
                cursor = result.len();
                continue;
            }
            return Err(context_not_found(&search_text));
        }

        let pattern = build_search_pattern(&search_lines);
        let re = Regex::new(&pattern).map_err(|e| {
            RestitchError::InvalidInput(format!("Conflict search pattern failed to compile: {e}"))
        })?;

        let (found_start, found_end) = re
            .find(&result[cursor..])
            .map(|m| (m.start(), m.end()))
            .ok_or_else(|| context_not_found(&search_text))?;
        let match_start = cursor + found_start;
        let mut match_end = cursor + found_end;

        // The pattern's trailing `\r?` may have swallowed a CRLF's carriage
        // return; leave it in the document so the splice keeps clean CRLFs.
        if result[match_start..match_end].ends_with('\r') {
            match_end -= 1;
        }

        // Split the matched span back into its lines so the drifted
        // whitespace the pattern tolerated is preserved verbatim.
        let matched: Vec<&str> = result[match_start..match_end]
            .split('\n')
            .map(|l| l.trim_end_matches('\r'))
            .collect();
        let lead_matched = &matched[..leading.len().min(matched.len())];
        let trail_start = matched.len().saturating_sub(trailing.len());
        let trail_matched = &matched[trail_start..];

        let mut replacement_lines: Vec<&str> =
            Vec::with_capacity(lead_matched.len() + updated_lines.len() + trail_matched.len());
        replacement_lines.extend(lead_matched);
        replacement_lines.extend(updated_lines.iter().map(|s| s.as_str()));
        let consumed_lines = replacement_lines.len();
        replacement_lines.extend(trail_matched);

        let replacement = replacement_lines.join(eol);
        if replacement.is_empty() {
            // Whole-span deletion: also take the span's own line ending so
            // no blank line is left behind.
            if result[match_end..].starts_with(eol) {
                match_end += eol.len();
            }
        }

        let consumed: usize = replacement_lines[..consumed_lines]
            .iter()
            .map(|l| l.len())
            .sum::<usize>()
            + consumed_lines.saturating_sub(1) * eol.len();

        result.replace_range(match_start..match_end, &replacement);
        cursor = match_start + consumed;
    }

    Ok(result)
}

enum Direction {
    Before,
    After,
}

fn adjacent_common<'a>(
    segments: &'a [Segment],
    index: usize,
    direction: Direction,
) -> &'a [String] {
    let neighbor = match direction {
        Direction::Before => index.checked_sub(1),
        Direction::After => Some(index + 1),
    };
    match neighbor.and_then(|i| segments.get(i)) {
        Some(Segment::Common { lines }) => lines,
        _ => &[],
    }
}

/// One alternative per line, escaped and padded so leading/trailing
/// horizontal whitespace drift in the model's re-typed context still
/// matches. Inner newlines are explicit, the first and last lines are
/// anchored to line boundaries.
fn build_search_pattern(lines: &[&str]) -> String {
    let body = lines
        .iter()
        .map(|l| regex::escape(l.trim()))
        .collect::<Vec<_>>()
        .join(r"[ \t]*\r?\n[ \t]*");
    format!(r"(?m)^[ \t]*{}[ \t]*\r?$", body)
}

fn context_not_found(search_text: &str) -> RestitchError {
    let excerpt: String = search_text
        .chars()
        .take(CONTEXT_ERROR_EXCERPT_CHARS)
        .collect();
    RestitchError::ContextNotFound(excerpt)
}
