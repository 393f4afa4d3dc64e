use std::borrow::Cow;

use similar::TextDiff;

/// Renders a unified diff between two versions of a file, for previews and
/// apply summaries. `None` marks a side that does not exist, producing
/// `/dev/null` headers for creations and deletions.
pub fn generate_diff(file_path: &str, old: Option<&str>, new: Option<&str>) -> String {
    let deletes_content = new == Some("") && !old.unwrap_or("").is_empty();

    let from_header = match old {
        None => Cow::Borrowed("/dev/null"),
        Some(_) => quote_header(&format!("a/{}", file_path)),
    };
    let to_header = if new.is_none() || deletes_content {
        Cow::Borrowed("/dev/null")
    } else {
        quote_header(&format!("b/{}", file_path))
    };

    let diff = TextDiff::from_lines(old.unwrap_or(""), new.unwrap_or(""))
        .unified_diff()
        .header(&from_header, &to_header)
        .missing_newline_hint(true)
        .to_string();

    // No hunks means no headers from `similar`; still emit them when an
    // empty file is created or deleted so the operation stays visible.
    if diff.is_empty() && old.is_none() != new.is_none() {
        return format!("--- {}\n+++ {}\n", from_header, to_header);
    }
    diff
}

fn quote_header(header: &str) -> Cow<'static, str> {
    if header.contains(' ') {
        Cow::Owned(format!("\"{}\"", header))
    } else {
        Cow::Owned(header.to_string())
    }
}
