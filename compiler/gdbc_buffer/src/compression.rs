//! Payload compression and whole-buffer recompression.
//!
//! The compressor is an explicit value threaded into every call that needs
//! one. There is no process-wide tuning state.

use std::borrow::Cow;

use zstd::zstd_safe::{CParameter, DParameter};

use crate::format::{read_header, to_u32, BufferHeader, HEADER_SIZE};
use crate::BufferError;

/// Whether a freshly encoded payload is stored verbatim or compressed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressMode {
    #[default]
    None,
    Zstd,
}

/// Tuning for [`ZstdCompressor`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompressionConfig {
    pub level: i32,
    pub long_distance_matching: bool,
    /// Only applied with long-distance matching enabled.
    pub window_log: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        CompressionConfig {
            level: 3,
            long_distance_matching: false,
            window_log: 27,
        }
    }
}

/// Opaque byte transform applied to a whole payload.
pub trait PayloadCompressor {
    /// Upper bound on the compressed size of `src_len` input bytes.
    fn max_compressed_len(&self, src_len: usize) -> usize;

    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, BufferError>;

    /// Inverse of [`compress`](Self::compress). `uncompressed_len` is the
    /// exact size recorded in the buffer header.
    fn decompress(&self, src: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, BufferError>;
}

/// Zstandard compressor.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZstdCompressor {
    config: CompressionConfig,
}

impl ZstdCompressor {
    pub fn new(config: CompressionConfig) -> Self {
        ZstdCompressor { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }
}

impl PayloadCompressor for ZstdCompressor {
    fn max_compressed_len(&self, src_len: usize) -> usize {
        zstd::zstd_safe::compress_bound(src_len)
    }

    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, BufferError> {
        let mut compressor =
            zstd::bulk::Compressor::new(self.config.level).map_err(BufferError::Compression)?;
        if self.config.long_distance_matching {
            compressor
                .set_parameter(CParameter::EnableLongDistanceMatching(true))
                .map_err(BufferError::Compression)?;
            compressor
                .set_parameter(CParameter::WindowLog(self.config.window_log))
                .map_err(BufferError::Compression)?;
        }

        let mut dst = Vec::with_capacity(self.max_compressed_len(src.len()));
        compressor
            .compress_to_buffer(src, &mut dst)
            .map_err(BufferError::Compression)?;
        Ok(dst)
    }

    fn decompress(&self, src: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, BufferError> {
        let mut decompressor =
            zstd::bulk::Decompressor::new().map_err(BufferError::Decompression)?;
        if self.config.long_distance_matching {
            decompressor
                .set_parameter(DParameter::WindowLogMax(self.config.window_log))
                .map_err(BufferError::Decompression)?;
        }

        let out = decompressor
            .decompress(src, uncompressed_len)
            .map_err(BufferError::Decompression)?;
        if out.len() != uncompressed_len {
            return Err(BufferError::SizeMismatch {
                expected: uncompressed_len,
                actual: out.len(),
            });
        }
        Ok(out)
    }
}

/// Compress an already encoded, uncompressed buffer.
///
/// The header is validated first. A buffer that is already compressed is
/// returned unchanged.
pub fn compress_buffer(
    buffer: &[u8],
    compressor: &(impl PayloadCompressor + ?Sized),
) -> Result<Vec<u8>, BufferError> {
    let header = read_header(buffer)?;
    if header.is_compressed() {
        tracing::warn!("token buffer is already compressed, returning it unchanged");
        return Ok(buffer.to_vec());
    }

    let payload = &buffer[HEADER_SIZE..];
    if payload.is_empty() {
        // A zero length field would read back as "stored".
        return Ok(buffer.to_vec());
    }
    let compressed = compressor.compress(payload)?;

    tracing::debug!(
        payload = payload.len(),
        compressed = compressed.len(),
        "compressed token buffer"
    );

    let mut out = Vec::with_capacity(HEADER_SIZE + compressed.len());
    BufferHeader {
        version: header.version,
        uncompressed_len: to_u32("payload length", payload.len())?,
    }
    .write(&mut out);
    out.extend_from_slice(&compressed);
    Ok(out)
}

/// Return the stored (uncompressed) form of `buffer`.
///
/// A buffer that is already stored verbatim is returned unchanged.
pub fn decompress_buffer(
    buffer: &[u8],
    compressor: &(impl PayloadCompressor + ?Sized),
) -> Result<Vec<u8>, BufferError> {
    let header = read_header(buffer)?;
    if !header.is_compressed() {
        return Ok(buffer.to_vec());
    }

    let payload = compressor.decompress(&buffer[HEADER_SIZE..], header.uncompressed_len as usize)?;
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    BufferHeader {
        version: header.version,
        uncompressed_len: 0,
    }
    .write(&mut out);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Payload bytes of `buffer`, decompressed if needed.
pub(crate) fn payload<'a>(
    buffer: &'a [u8],
    compressor: &(impl PayloadCompressor + ?Sized),
) -> Result<Cow<'a, [u8]>, BufferError> {
    let header = read_header(buffer)?;
    let body = &buffer[HEADER_SIZE..];
    if header.is_compressed() {
        let payload = compressor.decompress(body, header.uncompressed_len as usize)?;
        tracing::debug!(
            compressed = body.len(),
            payload = payload.len(),
            "decompressed token buffer"
        );
        Ok(Cow::Owned(payload))
    } else {
        Ok(Cow::Borrowed(body))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
