use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;

/// A document that can be opened for reading at any offset.
///
/// Every call to [`ChunkSource::open_at`] must return a reader with its own
/// position; concurrent chunk workers never share a cursor.
pub trait ChunkSource: Send + Sync {
    /// Document identifier stored in posting lists
    fn id(&self) -> &str;

    /// Current byte length of the document
    fn byte_len(&self) -> io::Result<u64>;

    /// Open an independent reader positioned at `offset`
    fn open_at(&self, offset: u64) -> io::Result<Box<dyn BufRead + Send>>;
}

/// A document on the local filesystem, identified by its path
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    id: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = path.to_string_lossy().into_owned();
        Self { path, id }
    }
}

impl ChunkSource for FileSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn byte_len(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    fn open_at(&self, offset: u64) -> io::Result<Box<dyn BufRead + Send>> {
        // A fresh handle per worker: no seek state is shared between threads.
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// An in-memory document
#[derive(Debug, Clone)]
pub struct MemorySource {
    id: String,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            id: id.into(),
            bytes: Arc::from(bytes),
        }
    }
}

impl ChunkSource for MemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn byte_len(&self) -> io::Result<u64> {
        Ok(self.bytes.len() as u64)
    }

    fn open_at(&self, offset: u64) -> io::Result<Box<dyn BufRead + Send>> {
        let mut cursor = Cursor::new(self.bytes.clone());
        cursor.set_position(offset);
        Ok(Box::new(cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::NamedTempFile;

    fn read_all(mut reader: Box<dyn BufRead + Send>) -> String {
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_memory_source_independent_readers() {
        let source = MemorySource::new("mem", "hello world");

        let first = source.open_at(6).unwrap();
        let second = source.open_at(0).unwrap();

        assert_eq!(read_all(first), "world");
        assert_eq!(read_all(second), "hello world");
        assert_eq!(source.byte_len().unwrap(), 11);
        assert_eq!(source.id(), "mem");
    }

    #[test]
    fn test_memory_source_offset_past_end() {
        let source = MemorySource::new("mem", "abc");
        assert_eq!(read_all(source.open_at(10).unwrap()), "");
    }

    #[test]
    fn test_file_source_reads_at_offset() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"alpha beta gamma").unwrap();
        file.flush().unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.byte_len().unwrap(), 16);
        assert_eq!(source.id(), file.path().to_string_lossy());
        assert_eq!(read_all(source.open_at(6).unwrap()), "beta gamma");
        assert_eq!(read_all(source.open_at(0).unwrap()), "alpha beta gamma");
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("/definitely/not/here.txt");
        assert!(source.byte_len().is_err());
        assert!(source.open_at(0).is_err());
    }
}
