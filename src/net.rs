//! TCP transport: resolve a hostname and open the one connection a session
//! uses for its whole lifetime.

use crate::error::{ClientError, Result};
use std::net::{TcpStream, ToSocketAddrs};

/// Resolve `host` and connect on `port`. One attempt, no retries, no
/// timeout; the caller decides whether to try again.
pub fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|_| ClientError::Resolution(host.to_string()))?;
    let addr = addrs
        .next()
        .ok_or_else(|| ClientError::Resolution(host.to_string()))?;
    let stream = TcpStream::connect(addr).map_err(|source| ClientError::Connect {
        host: host.to_string(),
        port,
        source,
    })?;
    tune_socket(&stream);
    Ok(stream)
}

// Disable Nagle so flushed command lines go out immediately
fn tune_socket(stream: &TcpStream) {
    let _ = stream.set_nodelay(true);
}
