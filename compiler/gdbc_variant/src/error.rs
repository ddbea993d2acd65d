//! Codec errors.

use crate::VariantType;

/// Failure while encoding a value. Every variant aborts the whole encode,
/// including any enclosing container.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error(
        "potential infinite recursion detected: nesting depth {depth} exceeds {}",
        crate::MAX_RECURSION_DEPTH
    )]
    DepthExceeded { depth: usize },

    #[error("object values cannot be encoded in this context")]
    ObjectNotAllowed,

    #[error("class `{class}` cannot be instantiated and cannot be encoded as a full object")]
    ObjectNotInstantiable { class: String },

    #[error("failed to encode a path to a custom script: `{path}` is not a resource path")]
    InvalidScriptPath { path: String },

    #[error("{what} length {len} does not fit a 32-bit length field")]
    TooLarge { what: &'static str, len: usize },

    /// Internal invariant breach: an encoded value was not 4-byte aligned.
    #[error("encoded {ty} occupies {len} bytes, which is not a multiple of 4")]
    Misaligned { ty: VariantType, len: usize },
}

/// Failure while decoding a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of data: needed {needed} bytes, {available} available")]
    UnexpectedEnd { needed: usize, available: usize },

    #[error("unknown value type tag {0}")]
    UnknownType(u32),

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("nesting depth {depth} exceeds {}", crate::MAX_RECURSION_DEPTH)]
    DepthExceeded { depth: usize },

    #[error("object values are not allowed here")]
    ObjectNotAllowed,

    #[error("unknown array element type tag {0}")]
    InvalidArrayType(u32),
}
