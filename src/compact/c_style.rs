use super::drop_emptied_lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    SingleQuote,
    DoubleQuote,
    Template,
    LineComment,
    BlockComment,
}

/// Compacts C-family / JS / TS source: strips comments (string- and
/// template-literal-aware), then replaces function and class bodies with a
/// one-line placeholder while keeping control-flow, type, interface,
/// namespace and object-literal bodies verbatim.
pub fn compact_c_style(content: &str) -> String {
    let stripped = strip_comments(content);
    let cleaned = drop_emptied_lines(content, &stripped);
    elide_bodies(&cleaned)
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = ScanState::Code;
    // Brace depths of nested `${}` interpolations inside template literals.
    let mut interpolation_depths: Vec<u32> = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            ScanState::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = ScanState::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = ScanState::BlockComment;
                }
                '\'' => {
                    out.push(c);
                    state = ScanState::SingleQuote;
                }
                '"' => {
                    out.push(c);
                    state = ScanState::DoubleQuote;
                }
                '`' => {
                    out.push(c);
                    state = ScanState::Template;
                }
                '{' => {
                    if let Some(depth) = interpolation_depths.last_mut() {
                        *depth += 1;
                    }
                    out.push(c);
                }
                '}' => {
                    if let Some(depth) = interpolation_depths.last_mut() {
                        if *depth == 0 {
                            interpolation_depths.pop();
                            state = ScanState::Template;
                        } else {
                            *depth -= 1;
                        }
                    }
                    out.push(c);
                }
                _ => out.push(c),
            },
            ScanState::SingleQuote | ScanState::DoubleQuote => {
                out.push(c);
                let quote = if state == ScanState::SingleQuote { '\'' } else { '"' };
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || c == '\n' {
                    // Newline ends an unterminated literal so a stray quote
                    // cannot swallow the rest of the file.
                    state = ScanState::Code;
                }
            }
            ScanState::Template => {
                if c == '\\' {
                    out.push(c);
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == '`' {
                    out.push(c);
                    state = ScanState::Code;
                } else if c == '$' && chars.peek() == Some(&'{') {
                    out.push(c);
                    out.push('{');
                    chars.next();
                    interpolation_depths.push(0);
                    state = ScanState::Code;
                } else {
                    out.push(c);
                }
            }
            ScanState::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = ScanState::Code;
                }
            }
            ScanState::BlockComment => {
                if c == '\n' {
                    out.push('\n');
                } else if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = ScanState::Code;
                }
            }
        }
    }
    out
}

const PRESERVED_CONTROL: [&str; 13] = [
    "if", "else", "for", "while", "switch", "do", "try", "catch", "finally", "return", "match",
    "loop", "unsafe",
];

const PRESERVED_TYPES: [&str; 6] = ["interface", "type", "enum", "namespace", "module", "declare"];

fn elide_bodies(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copy_from = 0usize;
    let mut statement_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' => {
                let head = &text[statement_start..i];
                if should_elide(head)
                    && let Some(close) = find_matching_brace(bytes, i)
                {
                    out.push_str(&text[copy_from..=i]);
                    let indent = line_indent(text, i);
                    out.push('\n');
                    out.push_str(&indent);
                    out.push_str("  // ...\n");
                    out.push_str(&indent);
                    out.push('}');
                    i = close + 1;
                    copy_from = i;
                    statement_start = i;
                    continue;
                }
                statement_start = i + 1;
            }
            b'}' | b';' => statement_start = i + 1,
            _ => {}
        }
        i += 1;
    }

    out.push_str(&text[copy_from..]);
    out
}

fn should_elide(head: &str) -> bool {
    let head = head.trim();
    let Some(last) = head.chars().last() else {
        return false;
    };
    // Object-literal openers.
    if matches!(last, '=' | '(' | ',' | '[' | ':' | '&' | '|') {
        return false;
    }
    if contains_keyword(head, &PRESERVED_CONTROL) || contains_keyword(head, &PRESERVED_TYPES) {
        return false;
    }
    if contains_keyword(head, &["function", "class"]) || head.ends_with("=>") {
        return true;
    }
    if last == ')' {
        return true;
    }
    // Return-type annotation between the parameter list and the brace,
    // e.g. `run(): Promise<void>`.
    head.contains('(') && head.contains(')') && !head.contains('=')
}

fn contains_keyword(head: &str, keywords: &[&str]) -> bool {
    head.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .any(|word| keywords.contains(&word))
}

/// Index just past the string literal opening at `open`. Unterminated
/// single-line literals stop at the newline.
fn skip_string(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if quote != b'`' => return i,
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
            b'\'' | b'"' | b'`' => {
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

fn line_indent(text: &str, at: usize) -> String {
    let line_start = text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
    text[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}
