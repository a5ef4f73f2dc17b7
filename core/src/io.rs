//! io.rs
//! Byte sources for the manifest decoder.
//!
//! The decoder only needs "read N bytes, or tell me how many there were".
//! Everything here adapts a file, a buffer, or an arbitrary reader to that.

use std::io::{self, Read};
use std::path::PathBuf;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Normalize input source into a boxed reader
pub fn open_input(src: InputSource) -> io::Result<Box<dyn Read + Send>> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(io::BufReader::new(std::fs::File::open(p)?)),
        InputSource::Memory(b) => Box::new(io::Cursor::new(b)),
    };
    Ok(reader)
}

/// Forward-only reader that tracks how many bytes it has handed out.
#[derive(Debug)]
pub struct CountingReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes consumed since construction.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fill `buf` unless the source runs dry first.
    ///
    /// Returns the number of bytes placed in `buf`; anything short of
    /// `buf.len()` means end of input was reached. `Interrupted` is retried,
    /// every other error is returned as-is.
    pub fn read_exact_or_eof(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut off = 0;
        while off < buf.len() {
            match self.inner.read(&mut buf[off..]) {
                Ok(0) => break,
                Ok(n) => {
                    off += n;
                    self.position += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(off)
    }
}
