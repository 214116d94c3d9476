//! Single-file download: `SIZE` query, overwrite decision, `GET`, then a
//! length-prefixed body streamed to disk in bounded chunks.

use crate::channel::LineChannel;
use crate::error::{ClientError, Result};
use crate::protocol::{CHUNK_SIZE, CMD_GET, CMD_SIZE, MAX_LINE, STATUS_OK};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// How a fetch ended when it did not fail.
///
/// A declined overwrite is a successful skip, not a failure — and not a
/// transfer either. Callers that aggregate results must keep the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Transferred(u64),
    Skipped,
}

/// Progress hooks around the body phase. All methods default to no-ops so
/// implementations pick what they care about.
pub trait TransferObserver {
    fn begin(&mut self, _name: &str, _total: u64) {}
    fn progress(&mut self, _received: u64, _total: u64) {}
    fn done(&mut self, _name: &str, _total: u64) {}
    fn failed(&mut self, _name: &str) {}
}

pub struct NoopObserver;
impl TransferObserver for NoopObserver {}

/// Download `name` into `dest_dir`, using the server-provided name
/// verbatim. No path normalization happens here.
///
/// `confirm_overwrite` is consulted only when the destination already
/// exists; declining returns `Ok(FetchOutcome::Skipped)` without touching
/// the file or sending `GET`. Any error is terminal for this fetch only and
/// may leave a truncated destination behind — there is no resumption, so
/// callers must treat a failed transfer's file as corrupt.
pub fn fetch<S: Read + Write>(
    chan: &mut LineChannel<S>,
    name: &str,
    dest_dir: &Path,
    confirm_overwrite: &mut dyn FnMut(&str) -> bool,
    observer: &mut dyn TransferObserver,
) -> Result<FetchOutcome> {
    // Length-prefix framing: ask for the size before requesting the body
    chan.send_line(&format!("{CMD_SIZE} {name}"))?;
    let reply = chan.read_line(MAX_LINE)?;
    let size = parse_size_reply(&reply)?;

    let dest = dest_dir.join(name);
    if dest.exists() && !confirm_overwrite(name) {
        return Ok(FetchOutcome::Skipped);
    }

    chan.send_line(&format!("{CMD_GET} {name}"))?;
    let status = chan.read_line(MAX_LINE)?;
    if !status.starts_with(STATUS_OK) {
        return Err(ClientError::Protocol(status));
    }

    // The destination is only created once the server has committed to
    // sending a body.
    let mut out = File::create(&dest).map_err(ClientError::LocalWrite)?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut received: u64 = 0;
    observer.begin(name, size);
    while received < size {
        let want = (size - received).min(CHUNK_SIZE as u64) as usize;
        let n = match chan.read_body(&mut buf[..want]) {
            Ok(0) => {
                observer.failed(name);
                return Err(ClientError::ConnectionLost);
            }
            Ok(n) => n,
            Err(e) => {
                observer.failed(name);
                return Err(e);
            }
        };
        if let Err(e) = out.write_all(&buf[..n]) {
            observer.failed(name);
            return Err(ClientError::LocalWrite(e));
        }
        received += n as u64;
        observer.progress(received, size);
    }
    observer.done(name, size);
    Ok(FetchOutcome::Transferred(size))
}

/// Parse a `SIZE` reply. The line must start with `+OK` and the remainder
/// must be a strictly positive base-10 integer.
fn parse_size_reply(reply: &str) -> Result<u64> {
    let rest = reply
        .strip_prefix(STATUS_OK)
        .ok_or_else(|| ClientError::Protocol(reply.to_string()))?;
    let size: i64 = rest
        .trim()
        .parse()
        .map_err(|_| ClientError::InvalidSize(reply.to_string()))?;
    if size <= 0 {
        return Err(ClientError::InvalidSize(reply.to_string()));
    }
    Ok(size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_reply_ok() {
        assert_eq!(parse_size_reply("+OK 10").unwrap(), 10);
        assert_eq!(parse_size_reply("+OK 1048576").unwrap(), 1_048_576);
    }

    #[test]
    fn test_parse_size_reply_zero_and_negative_are_invalid() {
        assert!(matches!(
            parse_size_reply("+OK 0"),
            Err(ClientError::InvalidSize(_))
        ));
        assert!(matches!(
            parse_size_reply("+OK -4"),
            Err(ClientError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_parse_size_reply_unparsable_is_invalid() {
        assert!(matches!(
            parse_size_reply("+OK banana"),
            Err(ClientError::InvalidSize(_))
        ));
        assert!(matches!(
            parse_size_reply("+OK"),
            Err(ClientError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_parse_size_reply_err_status_is_protocol_error() {
        let err = parse_size_reply("-ERR not found").unwrap_err();
        match err {
            ClientError::Protocol(line) => assert_eq!(line, "-ERR not found"),
            other => panic!("expected Protocol, got {other:?}"),
        }
    }
}
