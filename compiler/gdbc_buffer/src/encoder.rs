//! Token stream encoder.
//!
//! One pass over a [`TokenSource`] builds the identifier and constant
//! tables, the sparse position index, and the token records, then the
//! sections are laid out in their fixed order and framed.

use std::collections::BTreeMap;

use gdbc_token::{Token, TokenSource, TokenTag, TokenVec};
use gdbc_variant::{encode_variant, ObjectMode, Variant};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::compression::{CompressMode, PayloadCompressor};
use crate::format::{
    to_u32, BufferHeader, PayloadHeader, HEADER_SIZE, IDENTIFIER_KEY, MAX_TABLE_INDEX,
    PAYLOAD_HEADER_SIZE, TOKEN_BITS, TOKEN_BYTE_MASK, TOKEN_MASK, VERSION,
};
use crate::BufferError;

/// Encode every token `source` yields into a framed buffer.
///
/// The source is switched to ignore-whitespace mode first; structural
/// whitespace tokens that still arrive are dropped, since the decoder
/// synthesizes them. Error tokens are stored like literals.
pub fn encode_tokens<S, C>(
    source: &mut S,
    mode: CompressMode,
    compressor: &C,
) -> Result<Vec<u8>, BufferError>
where
    S: TokenSource + ?Sized,
    C: PayloadCompressor + ?Sized,
{
    source.set_ignore_whitespace(true);

    let mut builder = PayloadBuilder::default();
    loop {
        let token = source.next_token();
        if token.is_eof() {
            break;
        }
        if token.tag.is_whitespace() {
            tracing::trace!(tag = %token.tag, "dropping structural token");
            continue;
        }
        builder.push(&token)?;
    }
    builder.drop_continuation_lines(source.continuation_lines());

    let payload = builder.finish()?;
    frame(&payload, mode, compressor)
}

/// Validating front end over [`encode_tokens`].
///
/// Fails with [`BufferError::LexError`] on the first error token and with
/// [`BufferError::EmptySource`] when the source yields nothing.
pub fn compile_tokens<S, C>(
    source: &mut S,
    mode: CompressMode,
    compressor: &C,
) -> Result<Vec<u8>, BufferError>
where
    S: TokenSource + ?Sized,
    C: PayloadCompressor + ?Sized,
{
    source.set_ignore_whitespace(true);

    let mut tokens = Vec::new();
    loop {
        let token = source.next_token();
        if token.is_eof() {
            break;
        }
        if token.tag == TokenTag::Error {
            let message = match token.literal_value() {
                Some(value) => value
                    .as_str()
                    .map_or_else(|| format!("{value:?}"), str::to_owned),
                None => String::from("scanner error"),
            };
            return Err(BufferError::LexError {
                message,
                line: token.span.start_line,
            });
        }
        tokens.push(token);
    }
    if tokens.is_empty() {
        return Err(BufferError::EmptySource);
    }

    let mut replay =
        TokenVec::new(tokens).with_continuation_lines(source.continuation_lines().to_vec());
    encode_tokens(&mut replay, mode, compressor)
}

fn frame<C>(payload: &[u8], mode: CompressMode, compressor: &C) -> Result<Vec<u8>, BufferError>
where
    C: PayloadCompressor + ?Sized,
{
    let mut out = Vec::new();
    match mode {
        CompressMode::None => {
            out.reserve_exact(HEADER_SIZE + payload.len());
            BufferHeader {
                version: VERSION,
                uncompressed_len: 0,
            }
            .write(&mut out);
            out.extend_from_slice(payload);
        }
        CompressMode::Zstd => {
            let compressed = compressor.compress(payload)?;
            tracing::debug!(
                payload = payload.len(),
                compressed = compressed.len(),
                "compressed token buffer"
            );
            out.reserve_exact(HEADER_SIZE + compressed.len());
            BufferHeader {
                version: VERSION,
                uncompressed_len: to_u32("payload length", payload.len())?,
            }
            .write(&mut out);
            out.extend_from_slice(&compressed);
        }
    }
    Ok(out)
}

/// First-seen-order intern table. Each key keeps the entry it was first
/// interned with.
struct Interner<K, E = K> {
    indices: FxHashMap<K, u32>,
    entries: Vec<E>,
    table: &'static str,
}

impl<K: std::hash::Hash + Eq, E> Interner<K, E> {
    fn new(table: &'static str) -> Self {
        Interner {
            indices: FxHashMap::default(),
            entries: Vec::new(),
            table,
        }
    }

    fn intern(&mut self, key: K, entry: impl FnOnce() -> E) -> Result<u32, BufferError> {
        if let Some(&index) = self.indices.get(&key) {
            return Ok(index);
        }
        let index = to_u32(self.table, self.entries.len())?;
        if index > MAX_TABLE_INDEX {
            return Err(BufferError::TooLarge {
                what: self.table,
                len: self.entries.len(),
            });
        }
        self.indices.insert(key, index);
        self.entries.push(entry());
        Ok(index)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

struct PayloadBuilder {
    identifiers: Interner<String>,
    /// Keyed by the encoding of the value with unsigned zeros, so values
    /// that compare equal share an entry. The entry holds the first value's
    /// own encoding.
    constants: Interner<Vec<u8>, Vec<u8>>,
    lines: BTreeMap<u32, u32>,
    columns: BTreeMap<u32, u32>,
    records: Vec<u8>,
    token_count: u32,
    last_end_line: u32,
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        PayloadBuilder {
            identifiers: Interner::new("identifier table"),
            constants: Interner::new("constant table"),
            lines: BTreeMap::new(),
            columns: BTreeMap::new(),
            records: Vec::new(),
            token_count: 0,
            last_end_line: 0,
        }
    }
}

impl PayloadBuilder {
    fn push(&mut self, token: &Token) -> Result<(), BufferError> {
        let mut word = u32::from(token.tag.as_u8()) & TOKEN_MASK;
        // A carrier without a payload stores the empty identifier or nil.
        let index = if token.tag.carries_identifier() {
            let name = token.name().unwrap_or_default();
            Some(self.identifiers.intern(name.to_owned(), || name.to_owned())?)
        } else if token.tag.carries_literal() {
            let value = token.literal_value().unwrap_or(&Variant::Nil);
            let bytes = encode_variant(value, ObjectMode::Reject)?;
            let key = encode_variant(&value.with_unsigned_zeros(), ObjectMode::Reject)?;
            Some(self.constants.intern(key, || bytes)?)
        } else {
            None
        };
        if let Some(index) = index {
            word |= index << TOKEN_BITS;
        }

        if word & !TOKEN_MASK != 0 {
            self.records
                .extend_from_slice(&(word | TOKEN_BYTE_MASK).to_le_bytes());
        } else {
            self.records.push(token.tag.as_u8());
        }
        self.records
            .extend_from_slice(&token.span.start_line.to_le_bytes());

        let ordinal = self.token_count;
        if ordinal > 0 && token.span.start_line > self.last_end_line {
            self.lines.insert(ordinal, token.span.start_line);
            self.columns.insert(ordinal, token.span.start_column);
        }
        self.last_end_line = token.span.end_line;
        self.token_count = ordinal
            .checked_add(1)
            .ok_or(BufferError::TooLarge {
                what: "token count",
                len: ordinal as usize,
            })?;
        Ok(())
    }

    /// Continuation lines get no indentation bookkeeping on decode, so
    /// their position entries are removed.
    fn drop_continuation_lines(&mut self, continuation: &[u32]) {
        if continuation.is_empty() {
            return;
        }
        let continuation: FxHashSet<u32> = continuation.iter().copied().collect();
        let columns = &mut self.columns;
        self.lines.retain(|ordinal, line| {
            let keep = !continuation.contains(line);
            if !keep {
                columns.remove(ordinal);
            }
            keep
        });
    }

    fn finish(self) -> Result<Vec<u8>, BufferError> {
        let header = PayloadHeader {
            identifier_count: to_u32("identifier table", self.identifiers.len())?,
            constant_count: to_u32("constant table", self.constants.len())?,
            position_count: to_u32("position index", self.lines.len())?,
            token_count: self.token_count,
        };

        let mut out = Vec::new();
        out.reserve_exact(PAYLOAD_HEADER_SIZE);
        header.write(&mut out);

        for name in &self.identifiers.entries {
            let chars = name.chars().count();
            out.reserve_exact(4 * (chars + 1));
            out.extend_from_slice(&to_u32("identifier", chars)?.to_le_bytes());
            for c in name.chars() {
                out.extend(u32::from(c).to_le_bytes().map(|b| b ^ IDENTIFIER_KEY));
            }
        }

        for bytes in &self.constants.entries {
            out.reserve_exact(bytes.len());
            out.extend_from_slice(bytes);
        }

        out.reserve_exact(16 * self.lines.len());
        for table in [&self.lines, &self.columns] {
            for (ordinal, value) in table {
                out.extend_from_slice(&ordinal.to_le_bytes());
                out.extend_from_slice(&value.to_le_bytes());
            }
        }

        out.reserve_exact(self.records.len());
        out.extend_from_slice(&self.records);

        tracing::debug!(
            identifiers = header.identifier_count,
            constants = header.constant_count,
            positions = header.position_count,
            tokens = header.token_count,
            payload = out.len(),
            "encoded token payload"
        );
        Ok(out)
    }
}
