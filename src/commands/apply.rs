use std::path::{Path, PathBuf};

use crate::console;
use crate::exceptions::RestitchError;
use crate::fs::{atomic_write_json, atomic_write_text, resolve_in_root, snapshot_file};
use crate::models::{FileItem, MergeMode, OriginalFileState, ParseOptions};
use crate::reconcile::cleanup::cleanup_response;
use crate::reconcile::diff_utils::generate_diff;
use crate::reconcile::reconcile_content;
use crate::reconcile::response::parse_response;

pub fn run(
    input: Option<PathBuf>,
    root: PathBuf,
    dry_run: bool,
    backup: bool,
    append: bool,
    workspaces: Vec<String>,
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

    let files: Vec<&FileItem> = items.iter().filter_map(|i| i.as_file()).collect();
    if files.is_empty() {
        println!("No file changes found in response.");
        return Ok(());
    }

    let mut applied: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut snapshots: Vec<OriginalFileState> = Vec::new();

    for file in files {
        // One file's failure never aborts the rest of the batch.
        match apply_one(file, &root, dry_run, backup, &mut snapshots) {
            Ok(rel) => applied.push(rel),
            Err(warning) => warnings.push(warning),
        }
    }

    if backup && !dry_run && !snapshots.is_empty() {
        let manifest = root.join(".restitch").join("backups").join(format!(
            "backup-{}.json",
            time::OffsetDateTime::now_utc().unix_timestamp()
        ));
        atomic_write_json(&manifest, &snapshots)?;
        println!("Backup manifest written to {}", manifest.display());
    }

    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    let verb = if dry_run { "Would apply" } else { "Applied" };
    let mut summary = vec![format!("{} {} file(s)", verb, applied.len())];
    summary.extend(applied.iter().map(|p| format!("  {}", p)));
    if !warnings.is_empty() {
        summary.push(format!("Skipped {} file(s), see warnings", warnings.len()));
    }
    console::draw_panel(
        "restitch apply",
        &summary,
        console::get_terminal_width().min(100),
    );

    Ok(())
}

/// Applies one parsed file item. Returns the display path on success and a
/// warning message when the item had to be skipped.
fn apply_one(
    file: &FileItem,
    root: &Path,
    dry_run: bool,
    backup: bool,
    snapshots: &mut Vec<OriginalFileState>,
) -> Result<String, String> {
    let rel = disk_relative(&file.file_path, &file.workspace_name);
    let Some(target) = resolve_in_root(root, &rel) else {
        return Err(format!("Path '{}' escapes the root directory. Skipped.", rel));
    };

    // A rename reads its original from the old location.
    let origin = match &file.renamed_from {
        Some(from) => {
            let origin_rel = disk_relative(from, &file.workspace_name);
            let Some(origin_path) = resolve_in_root(root, &origin_rel) else {
                return Err(format!(
                    "Rename origin '{}' escapes the root directory. Skipped.",
                    origin_rel
                ));
            };
            Some((origin_rel, origin_path))
        }
        None => None,
    };

    let source_path = match &origin {
        Some((_, path)) if !target.exists() => path.clone(),
        _ => target.clone(),
    };
    let original = if source_path.exists() {
        match std::fs::read_to_string(&source_path) {
            Ok(content) => Some(content),
            Err(e) => return Err(format!("Could not read '{}': {}. Skipped.", rel, e)),
        }
    } else {
        None
    };

    if file.is_deleted {
        if original.is_none() {
            return Err(format!("'{}' is already absent, nothing to delete.", rel));
        }
        let diff = generate_diff(&rel, original.as_deref(), None);
        console::print_unified_diff(&diff);
        if !dry_run {
            if backup {
                record_snapshot(snapshots, &target, &rel)?;
            }
            std::fs::remove_file(&target)
                .map_err(|e| format!("Could not delete '{}': {}. Skipped.", rel, e))?;
        }
        return Ok(rel);
    }

    let reconciled = reconcile_content(original.as_deref(), &file.content)
        .map_err(|e| format!("{}: {}", rel, e))?;

    let diff = generate_diff(&rel, original.as_deref(), Some(&reconciled));
    console::print_unified_diff(&diff);

    if !dry_run {
        if backup {
            record_snapshot(snapshots, &target, &rel)?;
        }
        atomic_write_text(&target, &reconciled)
            .map_err(|e| format!("Could not write '{}': {}. Skipped.", rel, e))?;

        if let Some((origin_rel, origin_path)) = origin
            && origin_path != target
            && origin_path.exists()
        {
            if backup {
                record_snapshot(snapshots, &origin_path, &origin_rel)?;
            }
            std::fs::remove_file(&origin_path)
                .map_err(|e| format!("Could not remove rename origin '{}': {}.", origin_rel, e))?;
        }
    }

    Ok(rel)
}

fn record_snapshot(
    snapshots: &mut Vec<OriginalFileState>,
    path: &Path,
    rel: &str,
) -> Result<(), String> {
    let snapshot = snapshot_file(path, rel)
        .map_err(|e| format!("Could not snapshot '{}': {}. Skipped.", rel, e))?;
    snapshots.push(snapshot);
    Ok(())
}

fn disk_relative(path: &str, workspace: &Option<String>) -> String {
    match workspace {
        Some(ws) => format!("{}/{}", ws, path),
        None => path.to_string(),
    }
}
