use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::consts::{DELETED_SUFFIX, RENAMED_FROM_PREFIX};
use crate::models::{
    FileItem, InlineFileItem, MergeMode, ParseOptions, ResponseItem, TextItem,
};

use super::segments::expand_multi_hunk_markers;

static FILE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*File:[ \t]*(?P<path>.+?)[ \t]*$").unwrap());

static FENCE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[A-Za-z0-9_+.-]*\s*$").unwrap());

static FENCE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*```\s*$").unwrap());

/// Splits a combined response/clipboard blob into an ordered sequence of
/// file and text items. Repeated mentions of the same file merge instead of
/// duplicating; renames and deletions arrive as explicit header suffixes.
pub fn parse_response(text: &str, options: &ParseOptions) -> Vec<ResponseItem> {
    let mut parser = ResponseParser::new(options);
    parser.feed(text);
    parser.into_items()
}

struct ResponseParser<'a> {
    options: &'a ParseOptions,
    items: Vec<ResponseItem>,
    /// Identity key `(workspace_name, file_path)` to position in `items`.
    file_index: HashMap<(Option<String>, String), usize>,
    text_buffer: Vec<String>,
}

impl<'a> ResponseParser<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
            file_index: HashMap::new(),
            text_buffer: Vec::new(),
        }
    }

    fn feed(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n");
        let ends_with_newline = normalized.ends_with('\n');
        let mut lines: Vec<&str> = normalized.split('\n').collect();
        if ends_with_newline {
            lines.pop();
        }

        let mut i = 0;
        while i < lines.len() {
            let Some(caps) = FILE_HEADER_RE.captures(lines[i]) else {
                self.text_buffer.push(lines[i].to_string());
                i += 1;
                continue;
            };
            self.flush_text_block();

            let header = parse_header_path(&caps["path"], self.options);
            let (body, next) = extract_body(&lines, i + 1, ends_with_newline);

            match body {
                None => {
                    if header.is_deleted || header.renamed_from.is_some() {
                        self.create_or_update(header.into_file_item(String::new()));
                    } else {
                        self.items.push(ResponseItem::InlineFile(InlineFileItem {
                            file_path: header.file_path.clone(),
                            workspace_name: header.workspace_name.clone(),
                        }));
                    }
                }
                Some(content) => {
                    let content = expand_multi_hunk_markers(&content);
                    self.create_or_update(header.into_file_item(content));
                }
            }
            i = next;
        }

        self.flush_text_block();
    }

    /// Appends the accumulated free text as a text item. Leading commentary
    /// before any other item is fully trimmed; later blocks only lose
    /// trailing whitespace so meaningful leading structure survives.
    fn flush_text_block(&mut self) {
        if self.text_buffer.is_empty() {
            return;
        }
        let joined = std::mem::take(&mut self.text_buffer).join("\n");
        let content = if self.items.is_empty() {
            joined.trim().to_string()
        } else {
            joined.trim_end().to_string()
        };
        if !content.is_empty() {
            self.items.push(ResponseItem::Text(TextItem { content }));
        }
    }

    fn create_or_update(&mut self, item: FileItem) {
        let key = (item.workspace_name.clone(), item.file_path.clone());
        let Some(&existing_idx) = self.file_index.get(&key) else {
            self.items.push(ResponseItem::File(item));
            self.file_index.insert(key, self.items.len() - 1);
            return;
        };

        match self.options.merge_mode {
            MergeMode::Overwrite => {
                if let Some(ResponseItem::File(existing)) = self.items.get_mut(existing_idx) {
                    existing.content = item.content;
                    existing.is_deleted |= item.is_deleted;
                    if item.renamed_from.is_some() {
                        existing.renamed_from = item.renamed_from;
                    }
                }
            }
            MergeMode::Append => {
                let idx = self.fold_interleaved_text(existing_idx, &key);
                if let Some(ResponseItem::File(existing)) = self.items.get_mut(idx) {
                    if !existing.content.is_empty() && !existing.content.ends_with('\n') {
                        existing.content.push('\n');
                    }
                    existing.content.push_str(&item.content);
                    existing.is_deleted |= item.is_deleted;
                    if item.renamed_from.is_some() {
                        existing.renamed_from = item.renamed_from;
                    }
                }
            }
        }
    }

    /// Collapses prose the model interleaved between a file's first mention
    /// and this continuation back into commentary preceding the file, and
    /// removes the now-redundant text items. Returns the file's position
    /// after the shuffle.
    fn fold_interleaved_text(
        &mut self,
        file_idx: usize,
        key: &(Option<String>, String),
    ) -> usize {
        let mut folded = String::new();
        let mut i = file_idx + 1;
        while i < self.items.len() {
            if matches!(self.items[i], ResponseItem::Text(_)) {
                if let ResponseItem::Text(text) = self.items.remove(i) {
                    if !folded.is_empty() {
                        folded.push('\n');
                    }
                    folded.push_str(&text.content);
                }
            } else {
                i += 1;
            }
        }

        if !folded.is_empty() {
            match self.items.get_mut(file_idx.wrapping_sub(1)) {
                Some(ResponseItem::Text(previous)) if file_idx > 0 => {
                    previous.content.push('\n');
                    previous.content.push_str(&folded);
                }
                _ => {
                    self.items
                        .insert(file_idx, ResponseItem::Text(TextItem { content: folded }));
                }
            }
        }

        self.rebuild_index();
        self.file_index.get(key).copied().unwrap_or(file_idx)
    }

    fn rebuild_index(&mut self) {
        self.file_index.clear();
        for (idx, item) in self.items.iter().enumerate() {
            if let ResponseItem::File(file) = item {
                self.file_index
                    .insert((file.workspace_name.clone(), file.file_path.clone()), idx);
            }
        }
    }

    fn into_items(mut self) -> Vec<ResponseItem> {
        self.flush_text_block();
        self.items
    }
}

struct ParsedHeader {
    file_path: String,
    workspace_name: Option<String>,
    renamed_from: Option<String>,
    is_deleted: bool,
}

impl ParsedHeader {
    fn into_file_item(self, content: String) -> FileItem {
        FileItem {
            file_path: self.file_path,
            content,
            workspace_name: self.workspace_name,
            renamed_from: self.renamed_from,
            is_deleted: self.is_deleted,
        }
    }
}

fn parse_header_path(raw: &str, options: &ParseOptions) -> ParsedHeader {
    // Models decorate paths with markdown emphasis; strip it first.
    let mut path = raw
        .trim()
        .trim_matches(|c| c == '*' || c == '`' || c == '"')
        .to_string();

    let mut is_deleted = false;
    let mut renamed_from = None;

    if let Some(stripped) = path.strip_suffix(DELETED_SUFFIX) {
        let remainder = stripped.trim_end().to_string();
        path = remainder;
        is_deleted = true;
    } else if path.ends_with(')')
        && let Some(open) = path.rfind(RENAMED_FROM_PREFIX)
    {
        let origin = path[open + RENAMED_FROM_PREFIX.len()..path.len() - 1]
            .trim()
            .to_string();
        if !origin.is_empty() {
            renamed_from = Some(origin);
        }
        let remainder = path[..open].trim_end().to_string();
        path = remainder;
    }

    let (workspace_name, file_path) = split_workspace(&path, &options.workspaces);

    ParsedHeader {
        file_path,
        workspace_name,
        renamed_from,
        is_deleted,
    }
}

fn split_workspace(path: &str, workspaces: &[String]) -> (Option<String>, String) {
    if let Some((first, rest)) = path.split_once('/')
        && !rest.is_empty()
        && workspaces.iter().any(|w| w == first)
    {
        return (Some(first.to_string()), rest.to_string());
    }
    (None, path.to_string())
}

/// Returns the file block's body starting at `start`, and the index of the
/// first line after it. `None` body means the header stood alone.
fn extract_body(
    lines: &[&str],
    start: usize,
    text_ends_with_newline: bool,
) -> (Option<String>, usize) {
    // A fenced block may open after blank separator lines.
    let mut probe = start;
    while probe < lines.len() && lines[probe].trim().is_empty() {
        probe += 1;
    }

    if probe < lines.len() && FENCE_OPEN_RE.is_match(lines[probe]) {
        let body_start = probe + 1;
        let mut end = body_start;
        while end < lines.len() && !FENCE_CLOSE_RE.is_match(lines[end]) {
            end += 1;
        }
        let body = lines[body_start..end].to_vec();
        let next = if end < lines.len() { end + 1 } else { end };
        let content = if body.is_empty() {
            String::new()
        } else {
            format!("{}\n", body.join("\n"))
        };
        return (Some(content), next);
    }

    // Plain body: everything up to the next file header.
    let mut end = start;
    while end < lines.len() && !FILE_HEADER_RE.is_match(lines[end]) {
        end += 1;
    }

    let body = &lines[start..end];
    if body.iter().all(|l| l.trim().is_empty()) {
        return (None, end);
    }

    let reached_eof = end == lines.len();
    let mut content = body.join("\n");
    if !reached_eof || text_ends_with_newline {
        content.push('\n');
    }
    (Some(content), end)
}
