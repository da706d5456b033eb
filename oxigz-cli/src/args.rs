//! Command-line arguments.

use crate::codec::{CodecOptions, DEFAULT_BLOCK_SIZE, DEFAULT_LEVEL};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "oxigz")]
#[command(author, version, about = "Parallel gzip compression - Pure Rust pigz work-alike")]
#[command(long_about = "
OxiGz compresses and decompresses gzip files using multiple threads.
Without FILE arguments, reads standard input and writes standard output.

Examples:
  oxigz notes.txt               # notes.txt -> notes.txt.gz
  oxigz -k -9 notes.txt         # keep notes.txt, best compression
  oxigz -d notes.txt.gz         # notes.txt.gz -> notes.txt
  oxigz -dc notes.txt.gz        # decompress to standard output
  tar cf - dir | oxigz -p 8 > dir.tar.gz
")]
pub struct Cli {
    /// Decompress
    #[arg(short, long)]
    pub decompress: bool,

    /// Write on standard output, keep original files unchanged
    #[arg(short = 'c', long = "stdout")]
    pub to_stdout: bool,

    /// Force overwrite of output files and compression to a terminal
    #[arg(short, long)]
    pub force: bool,

    /// Keep (don't delete) input files
    #[arg(short, long)]
    pub keep: bool,

    /// Suppress all warnings
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report compression ratio for each file
    #[arg(short, long)]
    pub verbose: bool,

    /// Compress faster (level 1)
    #[arg(short = '1', long, conflicts_with_all = ["best", "level"])]
    pub fast: bool,

    /// Compress better (level 9)
    #[arg(short = '9', long, conflicts_with = "level")]
    pub best: bool,

    /// Compression level
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: Option<u32>,

    /// Number of compression threads
    #[arg(short = 'p', long, default_value_t = default_processes())]
    pub processes: NonZeroUsize,

    /// Compression block size in KiB
    #[arg(short = 'b', long, default_value_t = default_blocksize())]
    pub blocksize: NonZeroUsize,

    /// Files to process ("-" is standard input)
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Effective compression level.
    pub fn compression_level(&self) -> u32 {
        match (self.level, self.fast, self.best) {
            (Some(level), _, _) => level,
            (None, true, _) => 1,
            (None, _, true) => 9,
            _ => DEFAULT_LEVEL,
        }
    }

    /// Codec settings derived from the flags.
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            level: self.compression_level(),
            block_size: self.blocksize.get() * 1024,
            threads: self.processes.get(),
        }
    }
}

fn default_processes() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

fn default_blocksize() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_BLOCK_SIZE / 1024).unwrap_or(NonZeroUsize::MIN)
}
