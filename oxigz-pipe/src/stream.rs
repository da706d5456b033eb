//! Stream operations on an open handle.
//!
//! Bulk reads and chunked writes over the surviving pipe end, plus a lazy
//! line iterator for consuming decompressed text incrementally.

use crate::handle::GzPipe;
use log::debug;
use oxigz_core::{OxiGzError, Result};
use std::io::{self, BufRead, BufReader, PipeReader, Read, Write};

impl GzPipe {
    /// Read everything the child produces until end-of-stream.
    ///
    /// Blocks until the child closes its output, normally by exiting.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let chunk_size = self.buffer_size();
        let source = self.source("read from")?;

        let mut data = Vec::new();
        let mut buffer = vec![0u8; chunk_size];
        loop {
            match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => data.extend_from_slice(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(data)
    }

    /// Read everything as UTF-8 text.
    pub fn read_text(&mut self) -> Result<String> {
        let data = self.read_all()?;
        String::from_utf8(data).map_err(|e| OxiGzError::InvalidUtf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
        })
    }

    /// Write the whole payload to the child.
    ///
    /// The payload goes out in chunks of at most the buffer size. If the
    /// child stops accepting data before all of it is written, the short
    /// count is reported as [`OxiGzError::PartialWrite`].
    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let chunk_size = self.buffer_size();
        let sink = self.sink("write to")?;

        let expected = data.len();
        let mut written = 0;
        while written < expected {
            let end = (written + chunk_size).min(expected);
            match sink.write(&data[written..end]) {
                Ok(0) => return Err(OxiGzError::partial_write(written, expected)),
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("child closed its input after {written} of {expected} bytes");
                    return Err(OxiGzError::partial_write(written, expected));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Write a string.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.write_all(text.as_bytes())
    }

    /// Iterate over decompressed lines.
    ///
    /// The cursor is created on the first call and is forward-only: calling
    /// this again resumes where the previous iterator stopped.
    pub fn lines(&mut self) -> Result<Lines<'_>> {
        let cursor = self.cursor("iterate over")?;
        Ok(Lines { cursor })
    }
}

/// Lazy iterator over the lines of a decompressing handle.
///
/// Each line keeps its trailing `'\n'`; the final line may lack one.
#[derive(Debug)]
pub struct Lines<'a> {
    cursor: &'a mut BufReader<PipeReader>,
}

impl Iterator for Lines<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.cursor.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(String::from_utf8(line).map_err(|e| OxiGzError::InvalidUtf8 {
                valid_up_to: e.utf8_error().valid_up_to(),
            })),
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl Read for GzPipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.source("read from")?.read(buf)
    }
}

impl Write for GzPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink("write to")?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink("flush")?.flush()
    }
}
