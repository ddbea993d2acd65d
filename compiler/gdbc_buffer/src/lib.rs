//! Compact binary token buffers.
//!
//! A token stream is stored as a versioned, optionally zstd-compressed
//! buffer: deduplicated identifier and constant tables, a sparse index of
//! where source lines change, and one short record per token. Newline and
//! indentation tokens are left out and rebuilt on replay.
//!
//! - [`encode_tokens`] / [`compile_tokens`]: token source to buffer
//! - [`TokenBuffer`]: buffer back to a token source
//! - [`compress_buffer`] / [`decompress_buffer`] / [`read_header`]: framing

mod compression;
mod decoder;
mod encoder;
mod error;
pub mod format;

pub use compression::{
    compress_buffer, decompress_buffer, CompressMode, CompressionConfig, PayloadCompressor,
    ZstdCompressor,
};
pub use decoder::TokenBuffer;
pub use encoder::{compile_tokens, encode_tokens};
pub use error::BufferError;
pub use format::{read_header, BufferHeader, PayloadHeader};
