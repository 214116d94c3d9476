//! Shared wire-protocol constants for the snag download service

/// Service port the server listens on.
pub const DEFAULT_PORT: u16 = 3456;

/// Longest control line we will accept before cutting it off.
pub const MAX_LINE: usize = 1024;

/// Listing entries retained per response; further entries are counted but
/// not stored (truncate-and-report).
pub const MAX_LIST_ENTRIES: usize = 200;

/// Longest file name a listing entry may carry.
pub const MAX_NAME_LEN: usize = 255;

/// Body transfer chunk size.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Success prefix on every status line.
pub const STATUS_OK: &str = "+OK";

/// Single-character line marking the end of a multi-line listing.
pub const END_OF_DATA: &str = ".";

// Command verbs (one command per round trip)
pub const CMD_LIST: &str = "LIST";
pub const CMD_SIZE: &str = "SIZE";
pub const CMD_GET: &str = "GET";
pub const CMD_QUIT: &str = "QUIT";
