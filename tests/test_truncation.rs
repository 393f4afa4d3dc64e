use restitch::reconcile::truncate::reconstruct_truncated;

fn numbered_lines(count: usize) -> String {
    (1..=count)
        .map(|i| format!("line {}", i))
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

#[test]
fn test_middle_marker_backfills_the_entire_original() {
    // GIVEN an original of ten lines
    let original = numbered_lines(10);
    // AND a rewrite that reproduces the edges verbatim around one marker
    let new_text = "line 1\nline 2\nline 3\n// ...\nline 8\nline 9\nline 10\n";

    // THEN the whole original is reproduced unchanged
    assert_eq!(reconstruct_truncated(new_text, &original), original);
}

#[test]
fn test_marker_as_first_block_resolves_against_file_start() {
    let original = numbered_lines(6);
    let new_text = "# ...\nline 5\nline 6\n";

    assert_eq!(reconstruct_truncated(new_text, &original), original);
}

#[test]
fn test_marker_as_last_block_resolves_against_file_end() {
    let original = numbered_lines(6);
    let new_text = "line 1\nline 2\n// ...";

    assert_eq!(reconstruct_truncated(new_text, &original), original);
}

#[test]
fn test_two_markers_backfill_independently() {
    let original = numbered_lines(9);
    let new_text = "line 1\n// ...\nline 5\n// ...\nline 9\n";

    assert_eq!(reconstruct_truncated(new_text, &original), original);
}

#[test]
fn test_changed_edge_lines_are_kept_verbatim() {
    let original = "fn a() {}\nfn b() {}\nfn c() {}\nfn d() {}\n";
    let new_text = "fn a() { changed }\nfn b() {}\n// ...\nfn d() {}\n";

    let result = reconstruct_truncated(new_text, &original);
    assert_eq!(result, "fn a() { changed }\nfn b() {}\nfn c() {}\nfn d() {}\n");
}

#[test]
fn test_trimmed_fallback_matches_drifted_whitespace() {
    // The model re-typed the anchor without its indentation.
    let original = "  spaced\nmiddle\ntail\n";
    let new_text = "spaced\n// ...\ntail\n";

    let result = reconstruct_truncated(new_text, &original);
    assert_eq!(result, "spaced\nmiddle\ntail\n");
}

#[test]
fn test_marker_styles_for_common_comment_syntaxes() {
    let original = numbered_lines(4);
    for marker in [
        "// ...",
        "# ...",
        "<!-- ... -->",
        "; ...",
        "\" ...",
        "' ...",
        "{/* ... */}",
        "/* ... */",
        "    // ....",
        "// ... existing code ...",
    ] {
        let new_text = format!("line 1\n{}\nline 4\n", marker);
        assert_eq!(
            reconstruct_truncated(&new_text, &original),
            original,
            "marker {:?} should be recognized",
            marker
        );
    }
}

#[test]
fn test_bare_ellipsis_is_not_a_marker() {
    // A plain `...` line is content (it splits conflict hunks elsewhere),
    // not a truncation marker.
    let original = "a\nb\nc\n";
    let new_text = "a\n...\nc\n";

    assert_eq!(reconstruct_truncated(new_text, &original), "a\n...\nc\n");
}

#[test]
fn test_unmatched_marker_fills_to_end_of_file() {
    // The code after the marker does not exist in the original, so the fill
    // runs to EOF and the trailing new code still appends.
    let original = "one\ntwo\n";
    let new_text = "one\n// ...\nbrand new\n";

    let result = reconstruct_truncated(new_text, &original);
    assert_eq!(result, "one\ntwo\nbrand new\n");
}

#[test]
fn test_original_without_trailing_newline_is_preserved() {
    let original = "a\nb\nc";
    let new_text = "a\n// ...\nc\n";

    assert_eq!(reconstruct_truncated(new_text, &original), "a\nb\nc");
}

#[test]
fn test_no_markers_passes_content_through() {
    let original = "old\n";
    let new_text = "entirely new\ncontent\n";

    assert_eq!(
        reconstruct_truncated(new_text, original),
        "entirely new\ncontent\n"
    );
}

#[test]
fn test_empty_original_leaves_markers_with_nothing_to_fill() {
    let new_text = "top\n// ...\nbottom\n";
    assert_eq!(reconstruct_truncated(new_text, ""), "top\nbottom");
}
