use restitch::models::Segment;
use restitch::reconcile::segments::{expand_multi_hunk_markers, parse_conflict_segments};

fn common(lines: &[&str]) -> Segment {
    Segment::Common {
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

fn conflict(original: &[&str], updated: &[&str]) -> Segment {
    Segment::Conflict {
        original_lines: original.iter().map(|s| s.to_string()).collect(),
        updated_lines: updated.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_text_without_markers_is_one_common_segment() {
    let segments = parse_conflict_segments("line1\nline2");
    assert_eq!(segments, vec![common(&["line1", "line2"])]);
}

#[test]
fn test_balanced_conflict_block() {
    let text = "before\n<<<<<<<\nold\n=======\nnew\n>>>>>>>\nafter";
    let segments = parse_conflict_segments(text);
    assert_eq!(
        segments,
        vec![
            common(&["before"]),
            conflict(&["old"], &["new"]),
            common(&["after"]),
        ]
    );
}

#[test]
fn test_markers_with_labels_and_indentation() {
    let text = "  <<<<<<< current\nold line\n  =======\nnew line\n  >>>>>>> updated";
    let segments = parse_conflict_segments(text);
    assert_eq!(segments, vec![conflict(&["old line"], &["new line"])]);
}

#[test]
fn test_end_marker_without_separator_yields_empty_updated_lines() {
    // GIVEN a block that closes before any =======
    let text = "<<<<<<<\nkept\n>>>>>>>";
    let segments = parse_conflict_segments(text);
    // THEN the conflict still emits, with nothing on the updated side
    assert_eq!(segments, vec![conflict(&["kept"], &[])]);
}

#[test]
fn test_unterminated_conflict_block_drops_buffered_lines() {
    // Lines buffered inside a block that never closes are dropped at end
    // of input; only the preceding common segment survives.
    let text = "before\n<<<<<<<\nlost one\nlost two";
    let segments = parse_conflict_segments(text);
    assert_eq!(segments, vec![common(&["before"])]);
}

#[test]
fn test_crlf_input_is_normalized() {
    let text = "a\r\n<<<<<<<\r\nold\r\n=======\r\nnew\r\n>>>>>>>\r\nb";
    let segments = parse_conflict_segments(text);
    assert_eq!(
        segments,
        vec![common(&["a"]), conflict(&["old"], &["new"]), common(&["b"])]
    );
}

#[test]
fn test_consecutive_conflicts_share_no_common_segment() {
    let text = "<<<<<<<\na\n=======\nA\n>>>>>>>\n<<<<<<<\nb\n=======\nB\n>>>>>>>";
    let segments = parse_conflict_segments(text);
    assert_eq!(
        segments,
        vec![conflict(&["a"], &["A"]), conflict(&["b"], &["B"])]
    );
}

#[test]
fn test_separator_outside_a_block_is_plain_content() {
    let text = "=======\nstill text";
    let segments = parse_conflict_segments(text);
    assert_eq!(segments, vec![common(&["=======", "still text"])]);
}

#[test]
fn test_expand_splits_matching_hunks_and_keeps_labels() {
    let text = "<<<<<<< SEARCH\na\n...\nb\n=======\nA\n...\nB\n>>>>>>> REPLACE";
    let expanded = expand_multi_hunk_markers(text);
    assert_eq!(
        expanded,
        "<<<<<<< SEARCH\na\n=======\nA\n>>>>>>> REPLACE\n\
         <<<<<<< SEARCH\nb\n=======\nB\n>>>>>>> REPLACE"
    );
}

#[test]
fn test_expand_leaves_mismatched_part_counts_alone() {
    // 2 original parts vs 1 updated part: no split.
    let text = "<<<<<<<\na\n...\nb\n=======\nA\n>>>>>>>";
    let expanded = expand_multi_hunk_markers(text);
    assert_eq!(expanded.matches("<<<<<<<").count(), 1);
    assert!(expanded.contains("..."));
}

#[test]
fn test_expand_without_markers_is_identity() {
    let text = "no markers\nhere at all\n";
    assert_eq!(expand_multi_hunk_markers(text), text);
}

#[test]
fn test_expand_preserves_surrounding_context_lines() {
    let text = "context above\n<<<<<<<\na\n...\nb\n=======\nA\n...\nB\n>>>>>>>\ncontext below";
    let expanded = expand_multi_hunk_markers(text);
    assert!(expanded.starts_with("context above\n"));
    assert!(expanded.ends_with("\ncontext below"));
    assert_eq!(expanded.matches("<<<<<<<").count(), 2);
}
