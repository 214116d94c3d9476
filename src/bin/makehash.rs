use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use snag::hashfile;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Write the MD5 digest of each input line to an output file, one digest per line"
)]
struct Args {
    /// Text file whose lines are hashed
    source: PathBuf,

    /// File the digests are written to (created or truncated)
    destination: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let lines = hashfile::hash_lines(&args.source, &args.destination)?;
    println!("Hashed {} line(s) into {}", lines, args.destination.display());
    Ok(())
}
