//! File mode: `name` <-> `name.gz` next to the input.

use super::CmdResult;
use crate::args::Cli;
use crate::codec::{self, CodecStats};
use crate::utils::{compressed_name, copy_times, decompressed_name};
use log::{info, warn};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Compress or decompress one file in place.
///
/// The input is removed after success unless `--keep` is given. A partially
/// written output is removed on failure.
pub fn cmd_file(cli: &Cli, input: &Path) -> CmdResult<()> {
    let metadata = fs::metadata(input)?;
    if !metadata.is_file() {
        return Err("not a regular file -- ignored".into());
    }

    let output = if cli.decompress {
        decompressed_name(input).ok_or("unknown suffix -- ignored")?
    } else {
        match compressed_name(input) {
            Some(path) => path,
            None => {
                warn!("{}: already has .gz suffix -- unchanged", input.display());
                return Ok(());
            }
        }
    };

    if output.exists() && !cli.force {
        return Err(format!("{} already exists (use -f to overwrite)", output.display()).into());
    }

    let stats = match transcode(cli, input, &output) {
        Ok(stats) => stats,
        Err(e) => {
            let _ = fs::remove_file(&output);
            return Err(e);
        }
    };

    if let Err(e) = copy_times(input, &output) {
        warn!("{}: could not copy file times: {}", output.display(), e);
    }
    if !cli.keep {
        fs::remove_file(input)?;
    }

    info!(
        "{}: {:.1}% -- {} {}",
        input.display(),
        stats.savings(!cli.decompress),
        if cli.keep { "created" } else { "replaced with" },
        output.display()
    );
    Ok(())
}

fn transcode(cli: &Cli, input: &Path, output: &Path) -> CmdResult<CodecStats> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    let stats = if cli.decompress {
        codec::decompress(reader, writer)?
    } else {
        codec::compress(reader, writer, &cli.codec_options())?
    };
    Ok(stats)
}
