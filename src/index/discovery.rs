use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Collect every regular file under `root`, recursively, sorted by path.
///
/// A `root` that is itself a file yields just that file.
pub fn discover_documents(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut files = Vec::new();

    if fs::metadata(root)?.is_file() {
        files.push(root.to_path_buf());
    } else {
        walk(root, &mut files)?;
    }

    files.sort();
    debug!(root = %root.display(), documents = files.len(), "discovered documents");
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            walk(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        } else if file_type.is_symlink() && fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
            files.push(path);
        }
    }
    Ok(())
}
