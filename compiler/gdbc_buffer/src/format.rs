//! Buffer framing: the 12-byte outer header and the payload layout.
//!
//! ```text
//! [4: "GDSC"][4: version][4: uncompressed payload length, 0 = stored][payload]
//!
//! payload:
//! [4: identifiers][4: constants][4: positions][4: reserved][4: tokens]
//! [identifier section][constant section][line pairs][column pairs][token records]
//! ```
//!
//! All integers are little-endian.

use crate::BufferError;

pub const MAGIC: [u8; 4] = *b"GDSC";
pub const VERSION: u32 = 100;
pub const HEADER_SIZE: usize = 12;
pub const PAYLOAD_HEADER_SIZE: usize = 20;

/// Bits of a record's type word holding the tag; the index sits above them.
pub const TOKEN_BITS: u32 = 8;
/// Tag bits of a type word.
pub const TOKEN_MASK: u32 = (1 << (TOKEN_BITS - 1)) - 1;
/// Set on the first byte of an 8-byte record.
pub const TOKEN_BYTE_MASK: u32 = 0x80;
/// Largest table index a type word can carry.
pub const MAX_TABLE_INDEX: u32 = u32::MAX >> TOKEN_BITS;

/// XORed into every byte of an identifier's code units. Obfuscation only.
pub const IDENTIFIER_KEY: u8 = 0xB6;

/// Parsed outer header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BufferHeader {
    pub version: u32,
    /// Length of the payload before compression; 0 when stored verbatim.
    pub uncompressed_len: u32,
}

impl BufferHeader {
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.uncompressed_len > 0
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.uncompressed_len.to_le_bytes());
    }
}

/// Parse and validate the outer header of `buffer`.
pub fn read_header(buffer: &[u8]) -> Result<BufferHeader, BufferError> {
    if buffer.len() < HEADER_SIZE {
        return Err(BufferError::TooShort { len: buffer.len() });
    }
    if buffer[..4] != MAGIC {
        return Err(BufferError::BadMagic);
    }
    let mut reader = Reader::new(&buffer[4..HEADER_SIZE]);
    let version = reader.u32("header")?;
    if version != VERSION {
        return Err(BufferError::UnsupportedVersion { found: version });
    }
    let uncompressed_len = reader.u32("header")?;
    Ok(BufferHeader {
        version,
        uncompressed_len,
    })
}

/// Counts stored at the front of the payload.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PayloadHeader {
    pub identifier_count: u32,
    pub constant_count: u32,
    pub position_count: u32,
    pub token_count: u32,
}

impl PayloadHeader {
    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        for word in [
            self.identifier_count,
            self.constant_count,
            self.position_count,
            0,
            self.token_count,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self, BufferError> {
        let identifier_count = reader.u32("header")?;
        let constant_count = reader.u32("header")?;
        let position_count = reader.u32("header")?;
        reader.u32("header")?;
        let token_count = reader.u32("header")?;
        Ok(PayloadHeader {
            identifier_count,
            constant_count,
            position_count,
            token_count,
        })
    }
}

pub(crate) fn to_u32(what: &'static str, len: usize) -> Result<u32, BufferError> {
    u32::try_from(len).map_err(|_| BufferError::TooLarge { what, len })
}

/// Bounds-checked little-endian reader over a payload.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub(crate) fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.data.len());
    }

    pub(crate) fn bytes(&mut self, n: usize, section: &'static str) -> Result<&'a [u8], BufferError> {
        let rest = self.remaining();
        if n > rest.len() {
            return Err(BufferError::Truncated { section });
        }
        self.pos += n;
        Ok(&rest[..n])
    }

    pub(crate) fn u8(&mut self, section: &'static str) -> Result<u8, BufferError> {
        Ok(self.bytes(1, section)?[0])
    }

    pub(crate) fn peek_u8(&self, section: &'static str) -> Result<u8, BufferError> {
        self.remaining()
            .first()
            .copied()
            .ok_or(BufferError::Truncated { section })
    }

    pub(crate) fn u32(&mut self, section: &'static str) -> Result<u32, BufferError> {
        let b = self.bytes(4, section)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Capacity hint for `count` entries of at least `min_size` bytes each,
    /// clamped to what the remaining input could possibly hold.
    pub(crate) fn capacity(&self, count: u32, min_size: usize) -> usize {
        (count as usize).min(self.remaining().len() / min_size)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
