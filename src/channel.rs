//! Line-oriented control channel over a byte stream.
//!
//! Command/response exchanges are newline-terminated text, but `GET` bodies
//! are raw bytes on the same stream. The channel keeps one internal buffer
//! and drains it for body reads before touching the socket again, so the
//! text phase can never swallow body bytes.

use crate::error::{ClientError, Result};
use std::io::{ErrorKind, Read, Write};

const READ_BUF: usize = 4096;

pub struct LineChannel<S> {
    stream: S,
    buf: Vec<u8>,
    pos: usize,
}

impl<S: Read + Write> LineChannel<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buf: Vec::new(),
            pos: 0,
        }
    }

    /// Send one command line. A single `\n` terminator is appended here;
    /// callers pass the bare command text.
    pub fn send_line(&mut self, text: &str) -> Result<()> {
        let mut line = Vec::with_capacity(text.len() + 1);
        line.extend_from_slice(text.as_bytes());
        line.push(b'\n');
        self.stream.write_all(&line).map_err(ClientError::Write)?;
        self.stream.flush().map_err(ClientError::Write)?;
        Ok(())
    }

    /// Read one control line: up to `max_len` bytes or the first `\n`,
    /// whichever comes first. A trailing `\r\n` or `\n` is stripped. If the
    /// stream closes before a terminator arrives the line is lost and the
    /// read fails with `ConnectionLost`.
    pub fn read_line(&mut self, max_len: usize) -> Result<String> {
        let mut line: Vec<u8> = Vec::new();
        loop {
            while self.pos < self.buf.len() {
                let b = self.buf[self.pos];
                self.pos += 1;
                if b == b'\n' {
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                    return Ok(String::from_utf8_lossy(&line).into_owned());
                }
                line.push(b);
                if line.len() >= max_len {
                    return Ok(String::from_utf8_lossy(&line).into_owned());
                }
            }
            if self.fill()? == 0 {
                return Err(ClientError::ConnectionLost);
            }
        }
    }

    /// Raw chunk read for a binary body. Buffered bytes left over from line
    /// reads are handed out first; only then does the socket get read
    /// directly. `Ok(0)` means the peer closed the stream.
    pub fn read_body(&mut self, out: &mut [u8]) -> Result<usize> {
        if self.pos < self.buf.len() {
            let n = (self.buf.len() - self.pos).min(out.len());
            out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
            self.pos += n;
            return Ok(n);
        }
        loop {
            match self.stream.read(out) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => return Err(ClientError::ConnectionLost),
            }
        }
    }

    fn fill(&mut self) -> Result<usize> {
        self.buf.clear();
        self.pos = 0;
        let mut chunk = [0u8; READ_BUF];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => return Err(ClientError::ConnectionLost),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    // One-directional scripted stream: reads come from `input`, writes land
    // in `sent` for later inspection.
    struct Scripted {
        input: Cursor<Vec<u8>>,
        sent: Vec<u8>,
    }

    impl Scripted {
        fn new(input: &[u8]) -> Self {
            Self {
                input: Cursor::new(input.to_vec()),
                sent: Vec::new(),
            }
        }
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Scripted {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.sent.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_line_appends_terminator() {
        let mut chan = LineChannel::new(Scripted::new(b""));
        chan.send_line("LIST").unwrap();
        assert_eq!(chan.stream.sent, b"LIST\n");
    }

    #[test]
    fn test_read_line_strips_lf_and_crlf() {
        let mut chan = LineChannel::new(Scripted::new(b"+OK\r\nsecond line\n"));
        assert_eq!(chan.read_line(1024).unwrap(), "+OK");
        assert_eq!(chan.read_line(1024).unwrap(), "second line");
    }

    #[test]
    fn test_read_line_eof_before_terminator_is_lost_connection() {
        let mut chan = LineChannel::new(Scripted::new(b"partial"));
        assert!(matches!(
            chan.read_line(1024),
            Err(ClientError::ConnectionLost)
        ));
    }

    #[test]
    fn test_read_line_cut_at_max_len() {
        let mut chan = LineChannel::new(Scripted::new(b"abcdef\n"));
        assert_eq!(chan.read_line(4).unwrap(), "abcd");
        // the remainder of the line is still there
        assert_eq!(chan.read_line(1024).unwrap(), "ef");
    }

    #[test]
    fn test_read_body_drains_buffered_bytes_first() {
        // Status line and the first body bytes arrive in one segment; the
        // body read must get those bytes, not skip past them.
        let mut chan = LineChannel::new(Scripted::new(b"+OK\nBODYBYTES"));
        assert_eq!(chan.read_line(1024).unwrap(), "+OK");
        let mut out = [0u8; 4];
        assert_eq!(chan.read_body(&mut out).unwrap(), 4);
        assert_eq!(&out, b"BODY");
        let mut rest = [0u8; 16];
        let n = chan.read_body(&mut rest).unwrap();
        assert_eq!(&rest[..n], b"BYTES");
    }

    #[test]
    fn test_read_body_zero_on_closed_stream() {
        let mut chan = LineChannel::new(Scripted::new(b""));
        let mut out = [0u8; 8];
        assert_eq!(chan.read_body(&mut out).unwrap(), 0);
    }
}
