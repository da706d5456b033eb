//! Stream mode: a file or standard input to standard output.

use super::CmdResult;
use crate::args::Cli;
use crate::codec;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Read};
use std::path::Path;

const OUTPUT_BUFFER_SIZE: usize = 128 * 1024;

/// Compress or decompress `input` (standard input when `None`) to standard
/// output.
pub fn cmd_stream(cli: &Cli, input: Option<&Path>) -> CmdResult<()> {
    let stdout = io::stdout();
    if !cli.decompress && !cli.force && stdout.is_terminal() {
        return Err("compressed data not written to a terminal (use -f to force)".into());
    }
    if cli.decompress && !cli.force && input.is_none() && io::stdin().is_terminal() {
        return Err("compressed data not read from a terminal (use -f to force)".into());
    }

    let reader: Box<dyn Read> = match input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };
    let writer = BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, stdout.lock());

    let stats = if cli.decompress {
        codec::decompress(reader, writer)?
    } else {
        codec::compress(reader, writer, &cli.codec_options())?
    };

    let name = input.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    info!(
        "{}: {:.1}% ({} -> {} bytes)",
        name,
        stats.savings(!cli.decompress),
        stats.bytes_in,
        stats.bytes_out
    );
    Ok(())
}
