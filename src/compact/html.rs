use super::c_style::compact_c_style;
use super::css::compact_css;

/// Compacts HTML: strips `<!-- -->` comments and hands embedded
/// `<script>`/`<style>` bodies to the C-style and CSS compactors. All other
/// markup passes through verbatim.
pub fn compact_html(content: &str) -> String {
    let bytes = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut copy_from = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        if starts_with_ci(bytes, i, b"<!--") {
            let Some(end) = find_ci(bytes, i + 4, b"-->") else {
                // Unterminated comment: keep the rest untouched.
                break;
            };
            out.push_str(&content[copy_from..i]);
            i = end + 3;
            copy_from = i;
            continue;
        }
        if let Some(next) = delegate_element(content, bytes, i, &mut out, &mut copy_from) {
            i = next;
            continue;
        }
        i += 1;
    }

    out.push_str(&content[copy_from..]);
    out
}

/// Handles one `<script>` or `<style>` element at `i`, if present. Emits
/// the open tag, the compacted body and nothing else; the close tag is
/// copied by the main loop. Returns the next scan position.
fn delegate_element(
    content: &str,
    bytes: &[u8],
    i: usize,
    out: &mut String,
    copy_from: &mut usize,
) -> Option<usize> {
    let (open_tag, close_tag, compactor): (&[u8], &[u8], fn(&str) -> String) =
        if element_starts(bytes, i, b"<script") {
            (b"<script", b"</script", compact_c_style)
        } else if element_starts(bytes, i, b"<style") {
            (b"<style", b"</style", compact_css)
        } else {
            return None;
        };

    let open_end = find_byte(bytes, i + open_tag.len(), b'>')?;
    let close_start = find_ci(bytes, open_end + 1, close_tag)?;

    out.push_str(&content[*copy_from..=open_end]);
    let inner = &content[open_end + 1..close_start];
    out.push_str(&compactor(inner));
    *copy_from = close_start;
    Some(close_start)
}

fn element_starts(bytes: &[u8], at: usize, tag: &[u8]) -> bool {
    starts_with_ci(bytes, at, tag)
        && matches!(
            bytes.get(at + tag.len()),
            Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'>')
        )
}

fn starts_with_ci(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes.len() >= at + needle.len() && bytes[at..at + needle.len()].eq_ignore_ascii_case(needle)
}

fn find_ci(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    let last = bytes.len().checked_sub(needle.len())?;
    (from..=last).find(|&i| starts_with_ci(bytes, i, needle))
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    (from..bytes.len()).find(|&i| bytes[i] == needle)
}
