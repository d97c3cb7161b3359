//! Reader that insists on an exact length.

use std::io;
use std::io::Read;

/// Yields exactly `len` bytes from the inner reader.
///
/// A tar header records the entry size before the data is copied, so a file
/// that grows is cut at the recorded size and a file that shrinks is an
/// error rather than a corrupt archive. Read failures are remembered so the
/// caller can tell them apart from failures of the archive writer.
///
/// # Examples
///
/// ```
/// use sdist_core::io::SizedReader;
/// use std::io::Read;
///
/// let mut reader = SizedReader::new(&b"hello world"[..], 5);
/// let mut out = String::new();
/// reader.read_to_string(&mut out)?;
/// assert_eq!(out, "hello");
///
/// let mut short = SizedReader::new(&b"hi"[..], 5);
/// assert!(short.read_to_end(&mut Vec::new()).is_err());
/// assert!(short.failed());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct SizedReader<R> {
    inner: R,
    remaining: u64,
    failed: bool,
}

impl<R> SizedReader<R> {
    /// Wraps `inner`, expecting `len` bytes.
    #[must_use]
    pub fn new(inner: R, len: u64) -> Self {
        Self {
            inner,
            remaining: len,
            failed: false,
        }
    }

    /// Returns `true` if reading from the inner reader failed or ended early.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }
}

impl<R: Read> Read for SizedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let limit = usize::try_from(self.remaining).unwrap_or(usize::MAX).min(buf.len());
        let n = match self.inner.read(&mut buf[..limit]) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Err(e),
            Err(e) => {
                self.failed = true;
                return Err(e);
            }
        };

        if n == 0 {
            self.failed = true;
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file shrank while being archived ({} bytes missing)", self.remaining),
            ));
        }

        self.remaining -= n as u64;
        Ok(n)
    }
}
