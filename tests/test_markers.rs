use restitch::exceptions::RestitchError;
use restitch::reconcile::markers::apply_conflict_markers;

#[test]
fn test_basic_replacement_leaves_other_lines_untouched() {
    let original = "Line A\nHello, world!\nLine C\n";
    let markers = "<<<<<<<\nHello, world!\n=======\nHello, universe!\n>>>>>>>";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "Line A\nHello, universe!\nLine C\n");
}

#[test]
fn test_missing_context_fails_with_descriptive_error() {
    let original = "Some random text";
    let markers = "<<<<<<<\nMissing\n=======\nFound\n>>>>>>>";

    let err = apply_conflict_markers(original, markers).unwrap_err();
    assert!(matches!(err, RestitchError::ContextNotFound(_)));
    let message = err.to_string();
    assert!(message.contains("Could not find content to replace"));
    assert!(message.contains("Missing"));
}

#[test]
fn test_error_excerpt_is_capped_at_100_chars() {
    let original = "short";
    let long_line = "x".repeat(300);
    let markers = format!("<<<<<<<\n{}\n=======\ny\n>>>>>>>", long_line);

    let err = apply_conflict_markers(original, &markers).unwrap_err();
    let RestitchError::ContextNotFound(excerpt) = err else {
        panic!("expected ContextNotFound");
    };
    assert_eq!(excerpt.chars().count(), 100);
}

#[test]
fn test_empty_updated_block_deletes_the_matched_span() {
    let original = "keep1\ndrop1\ndrop2\nkeep2\n";
    let markers = "keep1\n<<<<<<<\ndrop1\ndrop2\n=======\n>>>>>>>\nkeep2";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "keep1\nkeep2\n");
}

#[test]
fn test_deletion_without_context_leaves_no_blank_line() {
    let original = "a\nvictim\nb\n";
    let markers = "<<<<<<<\nvictim\n=======\n>>>>>>>";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "a\nb\n");
}

#[test]
fn test_surrounding_context_anchors_the_match() {
    // GIVEN a line that appears twice
    let original = "target\nmiddle\ntarget\nend\n";
    // AND context that only fits the second occurrence
    let markers = "middle\n<<<<<<<\ntarget\n=======\nreplaced\n>>>>>>>\nend";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "target\nmiddle\nreplaced\nend\n");
}

#[test]
fn test_multiple_conflicts_apply_left_to_right() {
    let original = "one\ntwo\nthree\nfour\n";
    let markers =
        "one\n<<<<<<<\ntwo\n=======\nTWO\n>>>>>>>\nthree\n<<<<<<<\nfour\n=======\nFOUR\n>>>>>>>";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "one\nTWO\nthree\nFOUR\n");
}

#[test]
fn test_shared_context_between_adjacent_conflicts_still_matches() {
    // The first conflict's trailing context is the second one's leading
    // context; the cursor must not consume it.
    let original = "alpha\nshared\nbeta\n";
    let markers = "<<<<<<<\nalpha\n=======\nALPHA\n>>>>>>>\nshared\n<<<<<<<\nbeta\n=======\nBETA\n>>>>>>>";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "ALPHA\nshared\nBETA\n");
}

#[test]
fn test_whitespace_drift_in_context_is_tolerated() {
    // Original is indented with four spaces, the model re-typed it with none.
    let original = "    indented();\nrest\n";
    let markers = "<<<<<<<\nindented();\n=======\n    replaced();\n>>>>>>>";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "    replaced();\nrest\n");
}

#[test]
fn test_crlf_original_keeps_crlf_output() {
    let original = "line1\r\nline2\r\nline3\r\n";
    let markers = "<<<<<<<\nline2\n=======\nreplacement\n>>>>>>>";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "line1\r\nreplacement\r\nline3\r\n");
}

#[test]
fn test_multi_line_updated_block_joins_with_detected_line_ending() {
    let original = "a\r\nb\r\n";
    let markers = "<<<<<<<\nb\n=======\nb1\nb2\n>>>>>>>";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "a\r\nb1\r\nb2\r\n");
}

#[test]
fn test_multi_hunk_marker_expands_into_independent_edits() {
    let original = "alpha\nbeta\ngamma\ndelta\n";
    let markers = "<<<<<<< fix\nalpha\n...\ngamma\n=======\nALPHA\n...\nGAMMA\n>>>>>>> fix";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "ALPHA\nbeta\nGAMMA\ndelta\n");
}

#[test]
fn test_application_is_deterministic() {
    let original = "x\ny\nz\n";
    let markers = "<<<<<<<\ny\n=======\nY\n>>>>>>>";

    let first = apply_conflict_markers(original, markers).unwrap();
    let second = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_creation_from_empty_original() {
    let markers = "<<<<<<<\n=======\nfresh line\n>>>>>>>";
    let result = apply_conflict_markers("", markers).unwrap();
    assert_eq!(result, "fresh line\n");
}

#[test]
fn test_empty_search_against_nonempty_original_fails() {
    let original = "existing content";
    let markers = "<<<<<<<\n=======\ninjected\n>>>>>>>";

    let err = apply_conflict_markers(original, markers).unwrap_err();
    assert!(matches!(err, RestitchError::ContextNotFound(_)));
}

#[test]
fn test_second_conflict_cannot_rematch_replaced_text() {
    // Both conflicts target the same line; the second must fail instead of
    // re-matching text before the cursor.
    let original = "only\nrest\n";
    let markers = "<<<<<<<\nonly\n=======\nchanged\n>>>>>>>\n<<<<<<<\nonly\n=======\nagain\n>>>>>>>";

    let err = apply_conflict_markers(original, markers).unwrap_err();
    assert!(matches!(err, RestitchError::ContextNotFound(_)));
}

#[test]
fn test_insertion_with_empty_original_lines_and_context() {
    // An empty original side with surrounding context inserts between the
    // context lines.
    let original = "head\ntail\n";
    let markers = "head\n<<<<<<<\n=======\ninserted\n>>>>>>>\ntail";

    let result = apply_conflict_markers(original, markers).unwrap();
    assert_eq!(result, "head\ninserted\ntail\n");
}
