//! Parallel gzip codec.
//!
//! Input is cut into fixed-size blocks that are compressed concurrently on a
//! rayon pool. Each block becomes an independent gzip member; members are
//! written in input order, so the output is a valid multi-member gzip stream
//! that any gzip decoder can read.

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use rayon::prelude::*;
use std::io::{self, BufReader, Read, Write};

/// Default block size (128KB), matching pigz.
pub const DEFAULT_BLOCK_SIZE: usize = 128 * 1024;

/// Default compression level.
pub const DEFAULT_LEVEL: u32 = 6;

/// Compression settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Compression level (0-9).
    pub level: u32,
    /// Uncompressed bytes per gzip member.
    pub block_size: usize,
    /// Worker threads.
    pub threads: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            block_size: DEFAULT_BLOCK_SIZE,
            threads: 1,
        }
    }
}

/// Byte counts of one codec run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecStats {
    /// Bytes read.
    pub bytes_in: u64,
    /// Bytes written.
    pub bytes_out: u64,
}

impl CodecStats {
    /// Space savings of the compressed side relative to the uncompressed
    /// side, in percent.
    pub fn savings(&self, compressed_is_output: bool) -> f64 {
        let (plain, packed) = if compressed_is_output {
            (self.bytes_in, self.bytes_out)
        } else {
            (self.bytes_out, self.bytes_in)
        };
        if plain == 0 {
            return 0.0;
        }
        (1.0 - packed as f64 / plain as f64) * 100.0
    }
}

/// Compress `input` into `output` as multi-member gzip.
///
/// Empty input still produces one (empty) member.
pub fn compress<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    options: &CodecOptions,
) -> io::Result<CodecStats> {
    let block_size = options.block_size.max(1);
    let threads = options.threads.max(1);
    let level = Compression::new(options.level.min(9));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(io::Error::other)?;

    let mut stats = CodecStats::default();
    let mut eof = false;
    let mut first = true;

    while !eof {
        let mut batch = Vec::with_capacity(threads);
        while batch.len() < threads {
            let block = read_block(&mut input, block_size)?;
            if block.len() < block_size {
                eof = true;
            }
            if !block.is_empty() || (first && batch.is_empty()) {
                batch.push(block);
            }
            if eof {
                break;
            }
        }
        first = false;

        let members: Vec<Vec<u8>> = pool.install(|| {
            batch
                .par_iter()
                .map(|block| gzip_member(block, level))
                .collect::<io::Result<_>>()
        })?;

        for (block, member) in batch.iter().zip(&members) {
            output.write_all(member)?;
            stats.bytes_in += block.len() as u64;
            stats.bytes_out += member.len() as u64;
        }
    }

    output.flush()?;
    Ok(stats)
}

/// Decompress a (possibly multi-member) gzip stream.
pub fn decompress<R: Read, W: Write>(input: R, mut output: W) -> io::Result<CodecStats> {
    let mut counted = Counted::new(input);
    let bytes_out = {
        let mut decoder = MultiGzDecoder::new(BufReader::new(&mut counted));
        io::copy(&mut decoder, &mut output)?
    };
    output.flush()?;
    Ok(CodecStats {
        bytes_in: counted.count,
        bytes_out,
    })
}

fn gzip_member(block: &[u8], level: Compression) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(block.len() / 2 + 64), level);
    encoder.write_all(block)?;
    encoder.finish()
}

/// Fill a block of up to `size` bytes; shorter only at end of input.
fn read_block<R: Read>(input: R, size: usize) -> io::Result<Vec<u8>> {
    let mut block = Vec::with_capacity(size);
    input.take(size as u64).read_to_end(&mut block)?;
    Ok(block)
}

/// Reader adapter counting the bytes passing through.
struct Counted<R> {
    inner: R,
    count: u64,
}

impl<R> Counted<R> {
    fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }
}

impl<R: Read> Read for Counted<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}
