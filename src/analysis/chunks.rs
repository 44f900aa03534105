//! Lazy fixed-size chunking of a byte stream.

use std::io::{self, ErrorKind, Read};
use std::iter::FusedIterator;

/// Default bytes per analysis chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Pull-based iterator over fixed-size chunks of a reader.
///
/// Every chunk holds exactly `chunk_size` bytes except possibly the
/// last. Short reads are accumulated until the chunk is full or the
/// reader reports end-of-stream. After an error the iterator is done.
pub struct ChunkReader<R> {
    reader: R,
    chunk_size: usize,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Wraps a reader. A chunk size of zero is treated as one.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
            done: false,
        }
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut chunk = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < self.chunk_size {
            match self.reader.read(&mut chunk[filled..]) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        if filled == 0 {
            return None;
        }
        chunk.truncate(filled);
        Some(Ok(chunk))
    }
}

impl<R: Read> FusedIterator for ChunkReader<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.step).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "device unplugged"))
        }
    }

    #[test]
    fn test_last_chunk_is_short() {
        let chunks: Vec<Vec<u8>> = ChunkReader::new(Cursor::new(vec![1u8; 25]), 10)
            .collect::<io::Result<_>>()
            .unwrap();

        let lens: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![10, 10, 5]);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let count = ChunkReader::new(Cursor::new(vec![0u8; 30]), 10).count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let mut reader = ChunkReader::new(Cursor::new(Vec::new()), 10);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_short_reads_are_accumulated() {
        let data: Vec<u8> = (0..=255).collect();
        let trickle = Trickle {
            data: data.clone(),
            pos: 0,
            step: 7,
        };
        let chunks: Vec<Vec<u8>> = ChunkReader::new(trickle, 100)
            .collect::<io::Result<_>>()
            .unwrap();

        assert_eq!(chunks[0], data[..100]);
        assert_eq!(chunks[1], data[100..200]);
        assert_eq!(chunks[2], data[200..]);
    }

    #[test]
    fn test_error_ends_iteration() {
        let mut reader = ChunkReader::new(Failing, 10);
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_zero_chunk_size_reads_single_bytes() {
        let lens: Vec<usize> = ChunkReader::new(Cursor::new(vec![9u8; 3]), 0)
            .map(|chunk| chunk.unwrap().len())
            .collect();
        assert_eq!(lens, vec![1, 1, 1]);
    }
}
