//! Dynamic value model and its deterministic binary codec.
//!
//! A [`Variant`] is a closed tagged union covering scalars, strings,
//! fixed-shape math aggregates, containers, and object references. The
//! codec turns one value into a self-describing, 4-byte-aligned byte form
//! and back:
//!
//! ```text
//! [4: header = type tag | flags][payload ...][zero padding to 4]
//! ```
//!
//! Encoding is a pure function of the value, the [`ObjectMode`], and the
//! build's real-number width (`double-precision` feature). Nesting deeper
//! than [`MAX_RECURSION_DEPTH`] is refused in both directions.

mod decode;
mod encode;
mod error;
mod header;
pub mod math;
mod stack;
mod ty;
mod value;

#[cfg(test)]
pub(crate) mod strategies;

pub use decode::decode_variant;
pub use encode::{encode_variant, encode_variant_into, encoded_len, ObjectMode};
pub use error::{DecodeError, EncodeError};
pub use header::{ArrayTyping, Header, HeaderFlags, HEADER_TYPE_MASK};
pub use ty::VariantType;
pub use value::{
    Array, ElementType, NodePath, Object, Property, ScriptRef, Signal, Variant,
    ENCODED_OBJECT_ID_CLASS, RESOURCE_SCHEME, SCRIPT_PROPERTY,
};

/// Deepest nesting the codec accepts. The top-level value is depth 0.
pub const MAX_RECURSION_DEPTH: usize = 1024;
