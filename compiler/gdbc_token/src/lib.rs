//! Token model shared by the token-stream encoder and decoder.
//!
//! Tokens come from a scanner that lives outside this workspace. The
//! [`TokenSource`] trait is the pull-style seam through which the encoder
//! consumes them, and the decoder implements it too, so a decoded buffer can
//! stand in anywhere a live scanner is accepted.

mod source;
mod span;
mod tag;

use std::fmt;

use gdbc_variant::Variant;

pub use source::{TokenSource, TokenVec};
pub use span::Span;
pub use tag::TokenTag;

/// Payload attached to a token.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TokenValue {
    #[default]
    None,
    /// Identifier or annotation name.
    Identifier(String),
    /// Literal value, or the message of an error token.
    Literal(Variant),
}

/// One lexical unit.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub tag: TokenTag,
    pub value: TokenValue,
    pub span: Span,
}

impl Token {
    /// Token with no payload.
    #[inline]
    pub fn new(tag: TokenTag, span: Span) -> Self {
        Token {
            tag,
            value: TokenValue::None,
            span,
        }
    }

    pub fn identifier(name: impl Into<String>, span: Span) -> Self {
        Token {
            tag: TokenTag::Identifier,
            value: TokenValue::Identifier(name.into()),
            span,
        }
    }

    pub fn annotation(name: impl Into<String>, span: Span) -> Self {
        Token {
            tag: TokenTag::Annotation,
            value: TokenValue::Identifier(name.into()),
            span,
        }
    }

    pub fn literal(value: impl Into<Variant>, span: Span) -> Self {
        Token {
            tag: TokenTag::Literal,
            value: TokenValue::Literal(value.into()),
            span,
        }
    }

    /// Scanner error; the message travels as a string literal.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Token {
            tag: TokenTag::Error,
            value: TokenValue::Literal(Variant::String(message.into())),
            span,
        }
    }

    /// Zero-width token placed on `line`, used for synthesized whitespace
    /// and end of file.
    #[inline]
    pub fn synthetic(tag: TokenTag, line: u32) -> Self {
        Token::new(tag, Span::at(line, 0))
    }

    /// Identifier string of an identifier or annotation token.
    pub fn name(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Value of a literal or error token.
    pub fn literal_value(&self) -> Option<&Variant> {
        match &self.value {
            TokenValue::Literal(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.tag == TokenTag::Eof
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::None => write!(f, "{:?} @ {:?}", self.tag, self.span),
            TokenValue::Identifier(name) => {
                write!(f, "{:?}({name}) @ {:?}", self.tag, self.span)
            }
            TokenValue::Literal(value) => {
                write!(f, "{:?}({value:?}) @ {:?}", self.tag, self.span)
            }
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5} {}", self.span.start_line, self.tag)?;
        match &self.value {
            TokenValue::None => Ok(()),
            TokenValue::Identifier(name) => write!(f, " {name}"),
            TokenValue::Literal(value) => write!(f, " {value:?}"),
        }
    }
}

#[cfg(test)]
mod tests;
