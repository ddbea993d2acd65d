use super::*;
use pretty_assertions::assert_eq;

fn header_bytes(version: u32, len: u32) -> Vec<u8> {
    let mut out = Vec::new();
    BufferHeader {
        version,
        uncompressed_len: len,
    }
    .write(&mut out);
    out
}

#[test]
fn token_word_constants() {
    assert_eq!(TOKEN_MASK, 0x7F);
    assert_eq!(TOKEN_BYTE_MASK & TOKEN_MASK, 0);
    assert_eq!(MAX_TABLE_INDEX, 0x00FF_FFFF);
}

#[test]
fn header_layout() {
    assert_eq!(
        header_bytes(VERSION, 0x0102_0304),
        [b'G', b'D', b'S', b'C', 100, 0, 0, 0, 4, 3, 2, 1]
    );
}

#[test]
fn read_header_accepts_written_header() {
    let header = read_header(&header_bytes(VERSION, 42)).unwrap();
    assert_eq!(header.version, VERSION);
    assert_eq!(header.uncompressed_len, 42);
    assert!(header.is_compressed());
}

#[test]
fn read_header_ignores_trailing_payload() {
    let mut bytes = header_bytes(VERSION, 0);
    bytes.extend_from_slice(&[9; 30]);
    assert!(!read_header(&bytes).unwrap().is_compressed());
}

#[test]
fn read_header_rejects_short_buffer() {
    assert!(matches!(
        read_header(b"GDSC\x64\0\0"),
        Err(BufferError::TooShort { len: 7 })
    ));
}

#[test]
fn read_header_rejects_bad_magic() {
    let mut bytes = header_bytes(VERSION, 0);
    bytes[3] = b'X';
    assert!(matches!(read_header(&bytes), Err(BufferError::BadMagic)));
}

#[test]
fn read_header_rejects_other_versions() {
    for version in [0, 99, 101] {
        assert!(matches!(
            read_header(&header_bytes(version, 0)),
            Err(BufferError::UnsupportedVersion { found }) if found == version
        ));
    }
}

#[test]
fn payload_header_round_trip() {
    let header = PayloadHeader {
        identifier_count: 3,
        constant_count: 2,
        position_count: 7,
        token_count: 40,
    };
    let mut out = Vec::new();
    header.write(&mut out);
    assert_eq!(out.len(), PAYLOAD_HEADER_SIZE);
    assert_eq!(&out[12..16], &[0, 0, 0, 0]);
    assert_eq!(PayloadHeader::read(&mut Reader::new(&out)).unwrap(), header);
}

#[test]
fn reader_reports_section_on_truncation() {
    let mut reader = Reader::new(&[1, 0, 0]);
    assert!(matches!(
        reader.u32("positions"),
        Err(BufferError::Truncated {
            section: "positions"
        })
    ));
}

#[test]
fn reader_capacity_is_clamped() {
    let data = [0u8; 16];
    let reader = Reader::new(&data);
    assert_eq!(reader.capacity(u32::MAX, 8), 2);
    assert_eq!(reader.capacity(1, 8), 1);
}
