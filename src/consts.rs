// --- Conflict marker syntax ---

/// Opens the "original" half of a conflict block. A label may follow.
pub const CONFLICT_START: &str = "<<<<<<<";
/// Separates the original and updated halves.
pub const CONFLICT_SEPARATOR: &str = "=======";
/// Closes a conflict block. A label may follow.
pub const CONFLICT_END: &str = ">>>>>>>";

/// A line holding only this token splits a conflict block's halves into
/// independently applied sub-hunks.
pub const HUNK_SPLIT_MARKER: &str = "...";

// --- Truncation markers ---

/// A comment-styled ellipsis line standing in for elided original content.
/// Covers line comments (`//`, `#`, `;`), block/JSX openers (`/*`, `{/*`),
/// HTML comments, and string-style comments (`"`, `'`).
pub const TRUNCATION_MARKER_PATTERN: &str = r#"^\s*(//|#|<!--|;|"|'|\{/\*|/\*)\s*\.{3,}.*$"#;

// --- Reconciliation limits ---

/// Longest suffix/prefix window (in lines) used to re-synchronize a
/// truncated rewrite against the original file.
pub const MAX_RESYNC_LINES: usize = 10;

/// How much of the failed search text a context error message carries.
pub const CONTEXT_ERROR_EXCERPT_CHARS: usize = 100;

// --- Response format ---

/// Marks a path suffix as a deletion: `File: src/old.rs (deleted)`.
pub const DELETED_SUFFIX: &str = "(deleted)";

/// Marks a rename: `File: src/new.rs (renamed from src/old.rs)`.
pub const RENAMED_FROM_PREFIX: &str = "(renamed from ";
