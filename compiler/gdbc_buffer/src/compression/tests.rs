use std::io;

use super::*;
use crate::format::{MAGIC, VERSION};
use pretty_assertions::assert_eq;

/// Compressor whose every operation fails.
struct Broken;

impl PayloadCompressor for Broken {
    fn max_compressed_len(&self, src_len: usize) -> usize {
        src_len
    }

    fn compress(&self, _src: &[u8]) -> Result<Vec<u8>, BufferError> {
        Err(BufferError::Compression(io::Error::other("out of memory")))
    }

    fn decompress(&self, _src: &[u8], _len: usize) -> Result<Vec<u8>, BufferError> {
        Err(BufferError::Decompression(io::Error::other("corrupt")))
    }
}

fn stored(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    BufferHeader {
        version: VERSION,
        uncompressed_len: 0,
    }
    .write(&mut out);
    out.extend_from_slice(payload);
    out
}

#[test]
fn config_defaults() {
    let config = CompressionConfig::default();
    assert_eq!(config.level, 3);
    assert!(!config.long_distance_matching);
    assert_eq!(config.window_log, 27);
    assert_eq!(CompressMode::default(), CompressMode::None);
}

#[test]
fn zstd_round_trip() {
    let zstd = ZstdCompressor::default();
    let payload: Vec<u8> = (0..4096u32).map(|i| (i % 7) as u8).collect();
    let compressed = zstd.compress(&payload).unwrap();
    assert!(compressed.len() < payload.len());
    assert!(compressed.len() <= zstd.max_compressed_len(payload.len()));
    assert_eq!(zstd.decompress(&compressed, payload.len()).unwrap(), payload);
}

#[test]
fn zstd_round_trip_empty_payload() {
    let zstd = ZstdCompressor::default();
    let compressed = zstd.compress(&[]).unwrap();
    assert_eq!(zstd.decompress(&compressed, 0).unwrap(), Vec::<u8>::new());
}

#[test]
fn zstd_round_trip_with_long_distance_matching() {
    let zstd = ZstdCompressor::new(CompressionConfig {
        level: 19,
        long_distance_matching: true,
        window_log: 20,
    });
    let payload = b"func _ready():\n\tpass\n".repeat(200);
    let compressed = zstd.compress(&payload).unwrap();
    assert_eq!(zstd.decompress(&compressed, payload.len()).unwrap(), payload);
}

#[test]
fn zstd_detects_declared_size_mismatch() {
    let zstd = ZstdCompressor::default();
    let compressed = zstd.compress(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert!(matches!(
        zstd.decompress(&compressed, 16),
        Err(BufferError::SizeMismatch {
            expected: 16,
            actual: 8
        })
    ));
}

#[test]
fn zstd_rejects_garbage() {
    let zstd = ZstdCompressor::default();
    assert!(matches!(
        zstd.decompress(&[0xde, 0xad, 0xbe, 0xef], 4),
        Err(BufferError::Decompression(_))
    ));
}

#[test]
fn compress_buffer_rewrites_length_field() {
    let payload = b"abcdefgh".repeat(32);
    let compressed = compress_buffer(&stored(&payload), &ZstdCompressor::default()).unwrap();

    assert_eq!(compressed[..4], MAGIC);
    let header = read_header(&compressed).unwrap();
    assert_eq!(header.uncompressed_len as usize, payload.len());

    let restored = decompress_buffer(&compressed, &ZstdCompressor::default()).unwrap();
    assert_eq!(restored, stored(&payload));
}

#[test]
fn compress_buffer_leaves_compressed_input_alone() {
    let zstd = ZstdCompressor::default();
    let once = compress_buffer(&stored(&[7; 100]), &zstd).unwrap();
    let twice = compress_buffer(&once, &zstd).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn compress_buffer_with_empty_payload_is_unchanged() {
    let buffer = stored(&[]);
    assert_eq!(
        compress_buffer(&buffer, &ZstdCompressor::default()).unwrap(),
        buffer
    );
}

#[test]
fn decompress_buffer_leaves_stored_input_alone() {
    let buffer = stored(&[1, 2, 3]);
    assert_eq!(
        decompress_buffer(&buffer, &ZstdCompressor::default()).unwrap(),
        buffer
    );
}

#[test]
fn compress_buffer_validates_header() {
    let mut buffer = stored(&[1, 2, 3]);
    buffer[4] = 99;
    assert!(matches!(
        compress_buffer(&buffer, &ZstdCompressor::default()),
        Err(BufferError::UnsupportedVersion { found: 99 })
    ));
    assert!(matches!(
        compress_buffer(b"GDSC", &ZstdCompressor::default()),
        Err(BufferError::TooShort { len: 4 })
    ));
}

#[test]
fn compressor_failure_produces_no_buffer() {
    assert!(matches!(
        compress_buffer(&stored(&[1, 2, 3, 4]), &Broken),
        Err(BufferError::Compression(_))
    ));
}

#[test]
fn payload_borrows_stored_buffers() {
    let buffer = stored(&[5, 6]);
    let payload = payload(&buffer, &Broken).unwrap();
    assert!(matches!(payload, Cow::Borrowed(&[5, 6])));
}

#[test]
fn compressor_is_usable_as_trait_object() {
    let zstd: &dyn PayloadCompressor = &ZstdCompressor::default();
    let compressed = compress_buffer(&stored(&[3; 64]), zstd).unwrap();
    assert_eq!(
        decompress_buffer(&compressed, zstd).unwrap(),
        stored(&[3; 64])
    );
}
