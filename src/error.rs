//! Error types for the snag client.

use std::io;
use thiserror::Error;

/// Failures the protocol client can report.
///
/// Everything here is terminal for the operation that raised it, never for
/// the session: the menu reports the error and keeps running. Only failures
/// during connect or the greeting handshake end the whole run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Hostname did not resolve to any address.
    #[error("could not resolve host {0}")]
    Resolution(String),

    /// TCP connect to the resolved address failed.
    #[error("connect to {host}:{port} failed: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// The stream rejected a command write.
    #[error("send failed: {0}")]
    Write(#[source] io::Error),

    /// The stream closed (or errored) while we were reading.
    #[error("connection lost")]
    ConnectionLost,

    /// The server answered with something other than `+OK`; the payload is
    /// the verbatim response line.
    #[error("server refused: {0}")]
    Protocol(String),

    /// A `SIZE` reply that is unparsable, zero, or negative.
    #[error("bad size in server reply: {0}")]
    InvalidSize(String),

    /// Writing the destination file failed.
    #[error("writing local file failed: {0}")]
    LocalWrite(#[source] io::Error),
}

/// Convenience result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
