use std::sync::LazyLock;

use regex::Regex;

/// Reasoning-block openers some providers leave in the response body.
const REASONING_BLOCKS: [(&str, &str); 2] =
    [("<think>", "</think>"), ("<thought>", "</thought>")];

static FENCED_WHOLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A```[^\n]*\r?\n(.*?)\r?\n?```\z").unwrap());

static OPENING_WRAPPERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\A```[^\n]*\n",
        r"\A<files(?:>|\s[^>]*>)\s*\n?",
        r"\A<file(?:>|\s[^>]*>)\s*\n?",
        r"\A<!\[CDATA\[\s*\n?",
        r"\A<!DOCTYPE[^>]*>\s*\n?",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static CLOSING_WRAPPERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"\n```\z", r"\n?</files>\z", r"\n?</file>\z", r"\n?\]\]>\z"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Strips wrapper markup (thinking blocks, code fences, CDATA, XML tags)
/// from raw model output. Total and idempotent; wrappers in the middle of
/// the content are never touched.
pub fn cleanup_response(content: &str) -> String {
    let mut text = content.trim().to_string();
    loop {
        let next = cleanup_pass(&text);
        if next == text {
            return text;
        }
        text = next;
    }
}

fn cleanup_pass(content: &str) -> String {
    let mut text = strip_reasoning_block(content).trim().to_string();

    // A response that is exactly one fenced block unwraps to its body.
    if text.matches("```").count() == 2 {
        let inner = FENCED_WHOLE_RE.captures(&text).map(|caps| caps[1].to_string());
        if let Some(inner) = inner {
            text = inner;
        }
    }

    // Peel prefix/suffix wrappers one layer at a time until stable.
    loop {
        let mut layer = text.trim().to_string();
        for re in OPENING_WRAPPERS.iter() {
            if let Some(end) = re.find(&layer).map(|m| m.end()) {
                layer.drain(..end);
                break;
            }
        }
        for re in CLOSING_WRAPPERS.iter() {
            if let Some(start) = re.find(&layer).map(|m| m.start()) {
                layer.truncate(start);
                break;
            }
        }
        if layer == text {
            break;
        }
        text = layer;
    }

    text.trim().to_string()
}

/// Removes a leading `<think>`/`<thought>` block. An opener with no
/// matching closer is left untouched.
fn strip_reasoning_block(content: &str) -> &str {
    for (opener, closer) in REASONING_BLOCKS {
        if let Some(rest) = content.strip_prefix(opener) {
            if let Some(end) = rest.find(closer) {
                return &rest[end + closer.len()..];
            }
            return content;
        }
    }
    content
}
