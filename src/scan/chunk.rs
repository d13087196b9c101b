/// A candidate byte range of one document, scanned by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in the plan
    pub index: usize,
    /// Byte offset where the worker starts reading
    pub offset: u64,
    /// Bytes the worker consumes before it stops (checked between segments)
    pub limit: u64,
}

impl Chunk {
    pub fn is_first(&self) -> bool {
        self.offset == 0
    }
}

/// Plan the chunks for a document of `len` bytes.
///
/// Chunk `i` starts at `i * (chunk_size + 1)`. The one-byte gap keeps two
/// workers from both starting on a boundary byte; a word that begins exactly
/// after a boundary space is skipped by the next worker and lost. One extra
/// trailing chunk is always planned; it starts at or past the end of the
/// document and yields nothing.
pub fn plan_chunks(len: u64, chunk_size: u64) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1);
    let count = len.div_ceil(chunk_size) + 1;

    (0..count)
        .map(|i| Chunk {
            index: i as usize,
            offset: i * (chunk_size + 1),
            limit: chunk_size,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gets_one_chunk() {
        let chunks = plan_chunks(0, 1024);
        assert_eq!(
            chunks,
            vec![Chunk {
                index: 0,
                offset: 0,
                limit: 1024
            }]
        );
        assert!(chunks[0].is_first());
    }

    #[test]
    fn test_small_document_plans_trailing_chunk() {
        let chunks = plan_chunks(100, 1024);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].offset, 1025);
        assert!(!chunks[1].is_first());
    }

    #[test]
    fn test_offsets_skip_one_byte_per_boundary() {
        let chunks = plan_chunks(10, 4);
        let offsets: Vec<u64> = chunks.iter().map(|c| c.offset).collect();

        // ceil(10 / 4) = 3, plus the trailing chunk
        assert_eq!(offsets, vec![0, 5, 10, 15]);
        assert!(chunks.iter().all(|c| c.limit == 4));
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_exact_multiple_of_chunk_size() {
        let chunk_size = 1024 * 1024;
        let chunks = plan_chunks(2 * chunk_size, chunk_size);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].offset, 2 * (chunk_size + 1));
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let chunks = plan_chunks(3, 0);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[1].offset, 2);
    }
}
