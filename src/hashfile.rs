//! Line hashing behind the `makehash` tool: one MD5 digest per input line.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Lowercase hex MD5 digest of one line, terminator excluded.
pub fn digest_line(line: &str) -> String {
    format!("{:x}", md5::compute(line.as_bytes()))
}

/// Read `input` line by line and write one digest line per input line to
/// `output`, which is created or truncated. Returns the number of lines
/// hashed. `lines()` strips `\r\n` as well as `\n`, so CRLF input hashes
/// the bare line.
pub fn hash_lines(input: &Path, output: &Path) -> Result<u64> {
    let src = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let dst = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    let mut out = BufWriter::new(dst);

    let mut count = 0u64;
    for line in BufReader::new(src).lines() {
        let line = line.with_context(|| format!("reading {}", input.display()))?;
        writeln!(out, "{}", digest_line(&line))
            .with_context(|| format!("writing {}", output.display()))?;
        count += 1;
    }
    out.flush()
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_line_known_vectors() {
        assert_eq!(digest_line("abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(digest_line(""), "d41d8c98f00b204e9800998ecf8427e3");
    }

    #[test]
    fn test_hash_lines_writes_one_digest_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, "abc\n\nhello world\n").unwrap();

        let count = hash_lines(&input, &output).unwrap();
        assert_eq!(count, 3);

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(lines[1], "d41d8c98f00b204e9800998ecf8427e3");
        assert_eq!(lines[2], digest_line("hello world"));
    }

    #[test]
    fn test_hash_lines_crlf_input_hashes_bare_line() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, "abc\r\n").unwrap();

        assert_eq!(hash_lines(&input, &output).unwrap(), 1);
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.trim_end(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_hash_lines_missing_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = hash_lines(&dir.path().join("nope.txt"), &dir.path().join("out.txt"));
        assert!(result.is_err());
    }
}
