// Parse errors raised by the container parsers

use thiserror::Error;

/// Failure raised while walking a container.
///
/// Parsers return this instead of stopping silently; only the top-level
/// entry points in `lib.rs` turn it into a best-effort result.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed data: {0}")]
    Malformed(&'static str),
    #[error("read of {len} bytes at offset {offset} is out of bounds")]
    OutOfBounds { offset: usize, len: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ParseError>;
