use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::index::InvertedIndex;

/// Write the index as one JSON object: term → array of document ids
pub fn save_json(index: &InvertedIndex, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, index)?;
    writer.flush()?;

    info!(path = %path.display(), terms = index.len(), "index saved");
    Ok(())
}

/// Read an index written by [`save_json`]
pub fn load_json(path: impl AsRef<Path>) -> Result<InvertedIndex> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let index: InvertedIndex = serde_json::from_reader(reader)?;

    info!(path = %path.display(), terms = index.len(), "index loaded");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InkdexError;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("index.json");
        let index: InvertedIndex = vec![
            ("dog".to_string(), vec!["doc1".to_string(), "doc2".to_string()]),
            ("cat".to_string(), vec!["doc1".to_string()]),
        ]
        .into_iter()
        .collect();

        save_json(&index, &path).unwrap();
        let loaded = load_json(&path).unwrap();

        assert_eq!(loaded, index);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"cat\": 5}").unwrap();

        assert!(matches!(
            load_json(&path),
            Err(InkdexError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_json("/no/such/inkdex/index.json"),
            Err(InkdexError::Io(_))
        ));
    }
}
