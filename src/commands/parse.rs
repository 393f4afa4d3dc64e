use std::io::Write;
use std::path::PathBuf;

use crate::console::is_stdout_terminal;
use crate::exceptions::RestitchError;
use crate::models::{MergeMode, ParseOptions, ResponseItem};
use crate::reconcile::cleanup::cleanup_response;
use crate::reconcile::detect_edit_format;
use crate::reconcile::response::parse_response;

pub fn run(
    input: Option<PathBuf>,
    workspaces: Vec<String>,
    append: bool,
    json: bool,
) -> Result<(), RestitchError> {
    let raw = super::read_input(input)?;
    let cleaned = cleanup_response(&raw);

    let options = ParseOptions {
        workspaces,
        merge_mode: if append {
            MergeMode::Append
        } else {
            MergeMode::Overwrite
        },
    };
    let items = parse_response(&cleaned, &options);

    if json {
        let mut stdout = std::io::stdout();
        let res = if is_stdout_terminal() {
            serde_json::to_writer_pretty(&mut stdout, &items)
        } else {
            serde_json::to_writer(&mut stdout, &items)
        };
        if let Err(e) = res
            && !e.is_io()
        {
            return Err(RestitchError::Serialization(e));
        }
        let _ = writeln!(stdout);
        return Ok(());
    }

    for item in &items {
        println!("{}", describe(item));
    }
    Ok(())
}

fn describe(item: &ResponseItem) -> String {
    match item {
        ResponseItem::File(file) => {
            let mut line = format!("file     {}", qualified_path(&file.file_path, &file.workspace_name));
            if let Some(from) = &file.renamed_from {
                line.push_str(&format!(" (renamed from {})", from));
            }
            if file.is_deleted {
                line.push_str(" (deleted)");
            } else {
                line.push_str(&format!(
                    " [{} bytes, {}]",
                    file.content.len(),
                    detect_edit_format(&file.content, true)
                ));
            }
            line
        }
        ResponseItem::Text(text) => format!("text     [{} bytes]", text.content.len()),
        ResponseItem::InlineFile(inline) => format!(
            "mention  {}",
            qualified_path(&inline.file_path, &inline.workspace_name)
        ),
    }
}

fn qualified_path(path: &str, workspace: &Option<String>) -> String {
    match workspace {
        Some(ws) => format!("{}/{}", ws, path),
        None => path.to_string(),
    }
}
