use super::drop_emptied_lines;

/// Compacts CSS: strips comments and collapses declaration bodies to a
/// placeholder. At-rule bodies (`@media`, `@supports`, ...) are descended
/// into instead, so the nested rules inside them still compact one by one.
pub fn compact_css(content: &str) -> String {
    let stripped = strip_comments(content);
    let cleaned = drop_emptied_lines(content, &stripped);
    elide_rule_bodies(&cleaned)
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_comment = false;
    let mut string_quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if in_comment {
            if c == '\n' {
                out.push('\n');
            } else if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_comment = false;
            }
            continue;
        }
        if let Some(quote) = string_quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == quote || c == '\n' {
                string_quote = None;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_comment = true;
            }
            '\'' | '"' => {
                out.push(c);
                string_quote = Some(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn elide_rule_bodies(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copy_from = 0usize;
    let mut selector_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' => {
                let selector = text[selector_start..i].trim();
                if !selector.starts_with('@')
                    && let Some(close) = find_matching_brace(bytes, i)
                {
                    out.push_str(&text[copy_from..=i]);
                    out.push_str(" /* ... */ }");
                    i = close + 1;
                    copy_from = i;
                    selector_start = i;
                    continue;
                }
                selector_start = i + 1;
            }
            b'}' | b';' => selector_start = i + 1,
            _ => {}
        }
        i += 1;
    }

    out.push_str(&text[copy_from..]);
    out
}

fn skip_string(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn find_matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0u32;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}
