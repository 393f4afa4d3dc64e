use std::path::PathBuf;

use crate::exceptions::RestitchError;
use crate::fs::restore_snapshot;
use crate::models::OriginalFileState;

pub fn run(manifest: PathBuf, root: PathBuf) -> Result<(), RestitchError> {
    let raw = std::fs::read_to_string(&manifest)?;
    let snapshots: Vec<OriginalFileState> = serde_json::from_str(&raw)?;

    if snapshots.is_empty() {
        println!("Nothing to restore.");
        return Ok(());
    }

    for snapshot in &snapshots {
        restore_snapshot(&root, snapshot)?;
        let action = if snapshot.existed { "Restored" } else { "Removed" };
        println!("{} {}", action, snapshot.file_path);
    }
    Ok(())
}
