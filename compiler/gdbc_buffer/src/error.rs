//! Buffer errors.

use std::io;

use gdbc_variant::{DecodeError, EncodeError};

use crate::format::{HEADER_SIZE, VERSION};

/// Failure while building, framing, or reading a token buffer.
///
/// Every variant aborts the whole pass; no partial buffer is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("buffer is {len} bytes, shorter than the {}-byte header", HEADER_SIZE)]
    TooShort { len: usize },

    #[error("buffer does not start with the GDSC magic")]
    BadMagic,

    #[error(
        "buffer was generated with a different format version ({found}, expected {})",
        VERSION
    )]
    UnsupportedVersion { found: u32 },

    #[error("failed to compress token buffer: {0}")]
    Compression(#[source] io::Error),

    #[error("failed to decompress token buffer: {0}")]
    Decompression(#[source] io::Error),

    #[error("payload decompressed to {actual} bytes, header declares {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("failed to encode constant: {0}")]
    Constant(#[from] EncodeError),

    #[error("failed to decode constant {index}: {source}")]
    ConstantDecode { index: usize, source: DecodeError },

    #[error("token buffer truncated in the {section} section")]
    Truncated { section: &'static str },

    #[error("invalid token tag {0}")]
    InvalidTokenTag(u32),

    #[error("identifier index {index} out of range ({count} identifiers)")]
    IdentifierIndex { index: u32, count: usize },

    #[error("constant index {index} out of range ({count} constants)")]
    ConstantIndex { index: u32, count: usize },

    #[error("identifier {index} contains an invalid character")]
    InvalidIdentifier { index: usize },

    #[error("{what} of {len} does not fit the buffer's 32-bit fields")]
    TooLarge { what: &'static str, len: usize },

    #[error("source code produced no tokens")]
    EmptySource,

    #[error("line {line}: {message}")]
    LexError { message: String, line: u32 },
}
