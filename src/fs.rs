use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use time::OffsetDateTime;

use crate::exceptions::RestitchError;
use crate::models::OriginalFileState;

/// Atomically write text to a file using a temporary file + rename strategy.
pub fn atomic_write_text<P: AsRef<Path>>(path: P, text: &str) -> Result<(), RestitchError> {
    let path = path.as_ref();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    // Create the temp file next to the destination so the rename stays on
    // one filesystem.
    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(text.as_bytes())?;

    temp_file
        .persist(path)
        .map_err(|e| RestitchError::Io(e.error))?;

    Ok(())
}

pub fn atomic_write_json<T: serde::Serialize>(
    path: &Path,
    data: &T,
) -> Result<(), RestitchError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = std::io::BufWriter::new(&mut temp_file);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.flush()?;
    }

    temp_file
        .persist(path)
        .map_err(|e| RestitchError::Io(e.error))?;
    Ok(())
}

/// Resolves a model-named relative path inside `root`, rejecting absolute
/// paths and traversals that would escape it. The path does not have to
/// exist yet, so confinement is decided lexically, not by canonicalizing.
pub fn resolve_in_root(root: &Path, relative: &str) -> Option<PathBuf> {
    let candidate = Path::new(relative);
    if candidate.is_absolute() {
        return None;
    }

    let mut normalized = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if normalized.as_os_str().is_empty() {
        return None;
    }
    Some(root.join(normalized))
}

/// Captures a file's content and existence flag before an edit touches it.
pub fn snapshot_file(path: &Path, relative: &str) -> Result<OriginalFileState, RestitchError> {
    let existed = path.exists();
    let content = if existed {
        Some(fs::read_to_string(path)?)
    } else {
        None
    };
    Ok(OriginalFileState {
        file_path: relative.to_string(),
        existed,
        content,
        captured_at: OffsetDateTime::now_utc(),
    })
}

/// Puts the filesystem back the way a snapshot recorded it.
pub fn restore_snapshot(root: &Path, snapshot: &OriginalFileState) -> Result<(), RestitchError> {
    let path = resolve_in_root(root, &snapshot.file_path).ok_or_else(|| {
        RestitchError::InvalidInput(format!(
            "Snapshot path '{}' escapes the root directory.",
            snapshot.file_path
        ))
    })?;

    if snapshot.existed {
        atomic_write_text(&path, snapshot.content.as_deref().unwrap_or(""))
    } else {
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
