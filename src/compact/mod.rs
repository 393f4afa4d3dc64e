pub mod c_style;
pub mod css;
pub mod html;
pub mod python;

use std::path::Path;
use std::str::FromStr;

use crate::exceptions::RestitchError;

/// Language family a source file is compacted as. Families share a
/// comment/string-aware scanner; body elision differs per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    CStyle,
    Css,
    Html,
    Python,
}

impl LanguageFamily {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "rs" | "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" | "c" | "h" | "cc" | "cpp"
            | "hpp" | "cs" | "java" | "go" | "kt" | "swift" | "scala" | "php" => {
                Some(LanguageFamily::CStyle)
            }
            "css" | "scss" | "less" | "sass" => Some(LanguageFamily::Css),
            "html" | "htm" | "xhtml" | "vue" | "svelte" => Some(LanguageFamily::Html),
            "py" | "pyi" => Some(LanguageFamily::Python),
            _ => None,
        }
    }
}

impl FromStr for LanguageFamily {
    type Err = RestitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" | "c-style" | "cstyle" | "js" | "javascript" | "ts" | "typescript" | "rust" => {
                Ok(LanguageFamily::CStyle)
            }
            "css" | "scss" | "less" => Ok(LanguageFamily::Css),
            "html" => Ok(LanguageFamily::Html),
            "py" | "python" => Ok(LanguageFamily::Python),
            other => Err(RestitchError::InvalidInput(format!(
                "Unknown language '{}'. Use c-style, css, html or python.",
                other
            ))),
        }
    }
}

impl std::fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LanguageFamily::CStyle => write!(f, "c-style"),
            LanguageFamily::Css => write!(f, "css"),
            LanguageFamily::Html => write!(f, "html"),
            LanguageFamily::Python => write!(f, "python"),
        }
    }
}

/// Lossy compression of source text for prompt context: strips comments and
/// elides most bodies, per language family.
pub fn compact(content: &str, family: LanguageFamily) -> String {
    match family {
        LanguageFamily::CStyle => c_style::compact_c_style(content),
        LanguageFamily::Css => css::compact_css(content),
        LanguageFamily::Html => html::compact_html(content),
        LanguageFamily::Python => python::compact_python(content),
    }
}

/// Removes lines that held only comments before stripping. Compares the
/// stripped text line-by-line against the source; a line that became blank
/// but was not blank originally is dropped, and lines a comment was removed
/// from lose their trailing whitespace.
pub(crate) fn drop_emptied_lines(source: &str, stripped: &str) -> String {
    let source_lines: Vec<&str> = source.split('\n').collect();
    let stripped_lines: Vec<&str> = stripped.split('\n').collect();
    if source_lines.len() != stripped_lines.len() {
        return stripped.to_string();
    }

    let kept: Vec<&str> = source_lines
        .iter()
        .zip(&stripped_lines)
        .filter(|(src, st)| !(st.trim().is_empty() && !src.trim().is_empty()))
        .map(|(src, st)| if st == src { *st } else { st.trim_end() })
        .collect();
    kept.join("\n")
}
