//! Pull-style token sources.

use crate::{Token, TokenTag};

/// Anything that yields tokens one at a time.
///
/// After the stream is exhausted, `next_token` keeps returning end-of-file
/// tokens.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;

    /// In ignore-whitespace mode the source does not produce indentation
    /// tokens, only plain newlines (or none at all).
    fn set_ignore_whitespace(&mut self, ignore: bool);

    /// Lines that continue the previous logical line, in ascending order.
    fn continuation_lines(&self) -> &[u32];
}

/// Replays an already-scanned token sequence.
///
/// A trailing end-of-file token is optional; one is synthesized after the
/// last stored token either way.
#[derive(Clone, Debug, Default)]
pub struct TokenVec {
    tokens: Vec<Token>,
    pos: usize,
    continuation_lines: Vec<u32>,
    ignore_whitespace: bool,
}

impl TokenVec {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenVec {
            tokens,
            ..TokenVec::default()
        }
    }

    #[must_use]
    pub fn with_continuation_lines(mut self, mut lines: Vec<u32>) -> Self {
        lines.sort_unstable();
        lines.dedup();
        self.continuation_lines = lines;
        self
    }

    pub fn ignores_whitespace(&self) -> bool {
        self.ignore_whitespace
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn eof(&self) -> Token {
        let line = self.tokens.last().map_or(1, |t| t.span.end_line);
        Token::synthetic(TokenTag::Eof, line)
    }
}

impl TokenSource for TokenVec {
    fn next_token(&mut self) -> Token {
        match self.tokens.get(self.pos) {
            Some(token) if !token.is_eof() => {
                self.pos += 1;
                token.clone()
            }
            Some(token) => token.clone(),
            None => self.eof(),
        }
    }

    fn set_ignore_whitespace(&mut self, ignore: bool) {
        self.ignore_whitespace = ignore;
    }

    fn continuation_lines(&self) -> &[u32] {
        &self.continuation_lines
    }
}

impl FromIterator<Token> for TokenVec {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        TokenVec::new(iter.into_iter().collect())
    }
}
