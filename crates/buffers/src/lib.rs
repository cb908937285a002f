//! Byte buffers for the MessagePack codec.
//!
//! - [`Writer`]: growable output buffer with big-endian primitive writers and
//!   marker-plus-length helpers.
//! - [`Reader`]: borrowing cursor over a byte slice. Every read is bounds
//!   checked and reports [`BufferError`] instead of panicking.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error raised by [`Reader`] when input is exhausted or malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer: needed {needed} bytes at offset {offset}, {remaining} left")]
    EndOfBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },
}
