//! Token buffer decoder.
//!
//! [`TokenBuffer::from_bytes`] parses every section into memory; after that
//! [`TokenBuffer::scan`] replays the stream one token at a time. Newline,
//! indent, and dedent tokens are not stored. They are rebuilt from the
//! position index: a token with an entry starts a new source line, and its
//! column is compared against the indent stack.
//!
//! ```text
//! token column   a:0  b:4  c:4  d:8  e:0
//! replay         a NEWLINE INDENT b NEWLINE c NEWLINE INDENT d
//!                NEWLINE DEDENT DEDENT e NEWLINE EOF
//! ```

use gdbc_token::{Span, Token, TokenSource, TokenTag, TokenValue};
use gdbc_variant::{decode_variant, Variant};
use rustc_hash::FxHashMap;

use crate::compression::{payload, PayloadCompressor, ZstdCompressor};
use crate::format::{
    PayloadHeader, Reader, IDENTIFIER_KEY, TOKEN_BITS, TOKEN_BYTE_MASK, TOKEN_MASK,
};
use crate::BufferError;

/// Decoded token buffer and its replay state.
#[derive(Clone, Debug)]
pub struct TokenBuffer {
    identifiers: Vec<String>,
    constants: Vec<Variant>,
    lines: FxHashMap<u32, u32>,
    columns: FxHashMap<u32, u32>,
    tokens: Vec<Token>,

    current: usize,
    current_line: u32,
    ignore_indentation: bool,
    indent_stack: Vec<u32>,
    /// Outer indent stacks saved while a nested indented region is open.
    saved_stacks: Vec<Vec<u32>>,
    /// Positive: indents still to emit. Negative: dedents.
    pending_indents: i32,
    last_was_newline: bool,
}

impl TokenBuffer {
    /// Parse a buffer, decompressing it with default zstd settings if needed.
    pub fn from_bytes(buffer: &[u8]) -> Result<Self, BufferError> {
        Self::from_bytes_with(buffer, &ZstdCompressor::default())
    }

    pub fn from_bytes_with<C>(buffer: &[u8], compressor: &C) -> Result<Self, BufferError>
    where
        C: PayloadCompressor + ?Sized,
    {
        let payload = payload(buffer, compressor)?;
        let mut reader = Reader::new(&payload);
        let header = PayloadHeader::read(&mut reader)?;

        tracing::debug!(
            identifiers = header.identifier_count,
            constants = header.constant_count,
            positions = header.position_count,
            tokens = header.token_count,
            "decoding token buffer"
        );

        let identifiers = read_identifiers(&mut reader, header.identifier_count)?;
        let constants = read_constants(&mut reader, header.constant_count)?;
        let lines = read_positions(&mut reader, header.position_count, "line table")?;
        let columns = read_positions(&mut reader, header.position_count, "column table")?;

        let mut tokens = Vec::with_capacity(reader.capacity(header.token_count, 5));
        for ordinal in 0..header.token_count {
            let (tag, index, line) = read_record(&mut reader)?;
            let value = if tag.carries_identifier() {
                let name = identifiers.get(index as usize).ok_or(BufferError::IdentifierIndex {
                    index,
                    count: identifiers.len(),
                })?;
                TokenValue::Identifier(name.clone())
            } else if tag.carries_literal() {
                let value = constants.get(index as usize).ok_or(BufferError::ConstantIndex {
                    index,
                    count: constants.len(),
                })?;
                TokenValue::Literal(value.clone())
            } else {
                TokenValue::None
            };
            let column = columns.get(&ordinal).copied().unwrap_or(0);
            tokens.push(Token {
                tag,
                value,
                span: Span::at(line, column),
            });
        }

        Ok(TokenBuffer {
            identifiers,
            constants,
            lines,
            columns,
            tokens,
            current: 0,
            current_line: 1,
            ignore_indentation: false,
            indent_stack: Vec::new(),
            saved_stacks: Vec::new(),
            pending_indents: 0,
            last_was_newline: false,
        })
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn constants(&self) -> &[Variant] {
        &self.constants
    }

    /// Number of stored (non-synthesized) tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn position_count(&self) -> usize {
        self.lines.len()
    }

    /// Produce the next token.
    pub fn scan(&mut self) -> Token {
        loop {
            // Streams without a trailing newline still end with one.
            if self.current >= self.tokens.len() && !self.last_was_newline {
                self.last_was_newline = true;
                return Token::synthetic(TokenTag::Newline, self.current_line);
            }

            if self.pending_indents > 0 {
                self.pending_indents -= 1;
                return Token::synthetic(TokenTag::Indent, self.current_line);
            }
            if self.pending_indents < 0 {
                self.pending_indents += 1;
                return Token::synthetic(TokenTag::Dedent, self.current_line);
            }

            if self.current >= self.tokens.len() {
                if self.indent_stack.is_empty() {
                    return Token::synthetic(TokenTag::Eof, self.current_line);
                }
                self.pending_indents -= i32::try_from(self.indent_stack.len()).unwrap_or(i32::MAX);
                self.indent_stack.clear();
                continue;
            }

            break;
        }

        let ordinal = u32::try_from(self.current).unwrap_or(u32::MAX);
        if !self.last_was_newline {
            if let Some(&line) = self.lines.get(&ordinal) {
                self.current_line = line;
                if !self.ignore_indentation {
                    let column = self.columns.get(&ordinal).copied().unwrap_or(0);
                    self.track_indentation(column);
                }
                self.last_was_newline = true;
                return Token::synthetic(TokenTag::Newline, line);
            }
        }

        self.last_was_newline = false;
        let token = self.tokens[self.current].clone();
        self.current += 1;
        token
    }

    fn track_indentation(&mut self, column: u32) {
        let mut previous = self.indent_stack.last().copied().unwrap_or(0);
        if column > previous {
            self.pending_indents += 1;
            self.indent_stack.push(column);
            return;
        }
        while column < previous {
            self.pending_indents -= 1;
            self.indent_stack.pop();
            match self.indent_stack.last() {
                Some(&top) => previous = top,
                None => break,
            }
        }
    }

    /// Line boundaries become plain newlines, without indent or dedent
    /// tokens, while this is set.
    pub fn set_ignore_indentation(&mut self, ignore: bool) {
        self.ignore_indentation = ignore;
    }

    /// Save the current indent stack and start an empty one for an
    /// indented block nested inside an expression.
    pub fn push_expression_indented_block(&mut self) {
        let outer = std::mem::take(&mut self.indent_stack);
        self.saved_stacks.push(outer);
    }

    /// Restore the indent stack saved by the matching push, discarding the
    /// nested one.
    ///
    /// # Panics
    ///
    /// Panics if no stack was saved.
    pub fn pop_expression_indented_block(&mut self) {
        let Some(outer) = self.saved_stacks.pop() else {
            panic!("pop_expression_indented_block called without a matching push");
        };
        self.indent_stack = outer;
    }

    /// Replay buffers carry no cursor; always 0.
    pub fn cursor_line(&self) -> u32 {
        0
    }

    /// Replay buffers carry no cursor; always 0.
    pub fn cursor_column(&self) -> u32 {
        0
    }

    /// No-op.
    pub fn set_cursor_position(&mut self, _line: u32, _column: u32) {}

    pub fn is_past_cursor(&self) -> bool {
        false
    }
}

impl TokenSource for TokenBuffer {
    fn next_token(&mut self) -> Token {
        self.scan()
    }

    fn set_ignore_whitespace(&mut self, ignore: bool) {
        self.set_ignore_indentation(ignore);
    }

    /// Continuation lines were folded away at encode time.
    fn continuation_lines(&self) -> &[u32] {
        &[]
    }
}

fn read_identifiers(reader: &mut Reader<'_>, count: u32) -> Result<Vec<String>, BufferError> {
    let mut identifiers = Vec::with_capacity(reader.capacity(count, 4));
    for index in 0..count as usize {
        let len = reader.u32("identifier table")?;
        let mut name = String::with_capacity(reader.capacity(len, 4));
        for _ in 0..len {
            let raw = reader.bytes(4, "identifier table")?;
            let code = u32::from_le_bytes([
                raw[0] ^ IDENTIFIER_KEY,
                raw[1] ^ IDENTIFIER_KEY,
                raw[2] ^ IDENTIFIER_KEY,
                raw[3] ^ IDENTIFIER_KEY,
            ]);
            name.push(char::from_u32(code).ok_or(BufferError::InvalidIdentifier { index })?);
        }
        identifiers.push(name);
    }
    Ok(identifiers)
}

fn read_constants(reader: &mut Reader<'_>, count: u32) -> Result<Vec<Variant>, BufferError> {
    let mut constants = Vec::with_capacity(reader.capacity(count, 4));
    for index in 0..count as usize {
        let (value, consumed) = decode_variant(reader.remaining(), false)
            .map_err(|source| BufferError::ConstantDecode { index, source })?;
        reader.skip(consumed);
        constants.push(value);
    }
    Ok(constants)
}

fn read_positions(
    reader: &mut Reader<'_>,
    count: u32,
    section: &'static str,
) -> Result<FxHashMap<u32, u32>, BufferError> {
    let mut map = FxHashMap::default();
    map.reserve(reader.capacity(count, 8));
    for _ in 0..count {
        let ordinal = reader.u32(section)?;
        let value = reader.u32(section)?;
        map.insert(ordinal, value);
    }
    Ok(map)
}

/// One token record: `(tag, table index, line)`.
fn read_record(reader: &mut Reader<'_>) -> Result<(TokenTag, u32, u32), BufferError> {
    let first = reader.peek_u8("token records")?;
    let (raw_tag, index) = if u32::from(first) & TOKEN_BYTE_MASK != 0 {
        let word = reader.u32("token records")?;
        (word & TOKEN_MASK, word >> TOKEN_BITS)
    } else {
        (u32::from(reader.u8("token records")?), 0)
    };
    let tag = u8::try_from(raw_tag)
        .ok()
        .and_then(TokenTag::from_u8)
        .ok_or(BufferError::InvalidTokenTag(raw_tag))?;
    let line = reader.u32("token records")?;
    Ok((tag, index, line))
}
