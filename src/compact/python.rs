use super::drop_emptied_lines;

/// Compacts Python source: strips `#` comments (string-aware, including
/// triple-quoted strings) and elides `def`/`class` bodies by indentation,
/// keeping decorators, signatures and module-level code.
pub fn compact_python(content: &str) -> String {
    let stripped = strip_comments(content);
    let cleaned = drop_emptied_lines(content, &stripped);
    elide_bodies(&cleaned)
}

fn strip_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut copy_from = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                out.push_str(&source[copy_from..i]);
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                copy_from = i;
            }
            b'\'' | b'"' => i = skip_string(bytes, i),
            _ => i += 1,
        }
    }

    out.push_str(&source[copy_from..]);
    out
}

/// Index just past the string literal opening at `open`. Handles triple
/// quotes; unterminated single-line literals stop at the newline.
fn skip_string(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let triple = bytes.len() >= open + 3 && bytes[open + 1] == quote && bytes[open + 2] == quote;

    let mut i = open + if triple { 3 } else { 1 };
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if !triple => return i,
            b if b == quote => {
                if !triple {
                    return i + 1;
                }
                if bytes.len() >= i + 3 && bytes[i + 1] == quote && bytes[i + 2] == quote {
                    return i + 3;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

fn elide_bodies(text: &str) -> String {
    let had_trailing_newline = text.ends_with('\n');
    let mut lines: Vec<&str> = text.split('\n').collect();
    if had_trailing_newline {
        lines.pop();
    }

    let mut out: Vec<String> = Vec::new();
    let mut i = 0usize;

    while i < lines.len() {
        let line = lines[i];
        if !is_definition(line) {
            out.push(line.to_string());
            i += 1;
            continue;
        }

        let indent_len = line.len() - line.trim_start().len();
        let indent = &line[..indent_len];

        // Emit the signature, which may span lines until the `:` that
        // closes it at bracket depth zero.
        let mut depth = 0i32;
        while i < lines.len() {
            let signature_line = lines[i];
            out.push(signature_line.to_string());
            depth += bracket_delta(signature_line);
            i += 1;
            if depth <= 0 && signature_line.trim_end().ends_with(':') {
                break;
            }
        }

        // Consume the indented body, leaving trailing blank separators.
        let mut scan = i;
        let mut body_end = i;
        while scan < lines.len() {
            let body_line = lines[scan];
            if body_line.trim().is_empty() {
                scan += 1;
                continue;
            }
            if body_line.len() - body_line.trim_start().len() > indent_len {
                scan += 1;
                body_end = scan;
            } else {
                break;
            }
        }
        if body_end > i {
            out.push(format!("{}    # ...", indent));
            i = body_end;
        }
    }

    let mut result = out.join("\n");
    if had_trailing_newline && !result.is_empty() {
        result.push('\n');
    }
    result
}

fn is_definition(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("def ")
        || trimmed.starts_with("async def ")
        || trimmed.starts_with("class ")
}

fn bracket_delta(line: &str) -> i32 {
    line.chars()
        .map(|c| match c {
            '(' | '[' | '{' => 1,
            ')' | ']' | '}' => -1,
            _ => 0,
        })
        .sum()
}
