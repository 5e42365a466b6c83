//! ---
//! sl_section: "06-orchestration"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Capture sessions and the per-run orchestration driver."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Local staging area for retrieved media.

use std::io;
use std::path::{Path, PathBuf};

/// Create the staging directory if it does not exist yet.
pub async fn ensure(dir: &Path) -> io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}

/// Regular files directly inside `dir`, sorted by path.
pub async fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
